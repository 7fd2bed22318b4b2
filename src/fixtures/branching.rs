//! Branching, boolean composition and small-integer arithmetic fixtures

use crate::error::{FixtureError, Result};
use crate::node::{NodeGraph, NodeId};

/// Returns 0, or the identity hash of a freshly allocated node when `a` holds
///
/// The node is allocated in `graph` on both branches.
pub fn conditional_call(graph: &mut NodeGraph, a: bool) -> Result<i32> {
    let fresh = graph.alloc_zeroed();
    let mut t: i32 = 0;
    if a {
        t = t.wrapping_add(hash_of(graph, Some(fresh))?);
    }
    Ok(t)
}

/// Identity hash of `obj`
pub fn hash_of(graph: &NodeGraph, obj: Option<NodeId>) -> Result<i32> {
    let id = obj.ok_or_else(|| FixtureError::null("obj"))?;
    graph.identity_hash(id)
}

/// Accumulates the non-negative operands into an `i8` and reports where
/// the accumulator first went negative
///
/// * `1` - negative after adding `a`
/// * `2` - negative after adding `b`
/// * `3` - never negative
///
/// Adding a non-negative `a` to zero cannot wrap, so `1` is never
/// returned; `2` needs `a + b > 127` with both operands non-negative.
pub fn byte_saturation_check(a: i8, b: i8) -> i32 {
    let mut acc: i8 = 0;
    if a >= 0 {
        acc = acc.wrapping_add(a);
    }
    if acc < 0 {
        return 1;
    }
    if b >= 0 {
        acc = acc.wrapping_add(b);
    }
    if acc < 0 {
        return 2;
    }
    3
}

/// Helper called from the `1` arm of [`switch_dispatch`]
pub fn take() -> &'static str {
    "Hello"
}

/// Early guards followed by a dense switch with a fall-through default
pub fn switch_dispatch(a: i32, b: i32) -> i32 {
    if a == 0 {
        return -1;
    }
    if a.wrapping_add(5) == b {
        return 0;
    }

    let c: i32;
    let mut _d: i32 = -1;
    match a {
        1 => {
            let _s = take();
            return 1;
        }
        2 => return 2,
        3 => return 3,
        _ => {
            c = 5;
            _d = b;
        }
    }

    // Same predicate as the `a + 5 == b` guard, so this arm is dead.
    if a.wrapping_add(c) == b {
        return 4;
    }
    if b.wrapping_add(a) == c {
        return 5;
    }
    6
}

/// `None` when `a == 1`, otherwise `"b"`
#[allow(unused_assignments)]
pub fn nullable_choice(a: i32) -> Option<&'static str> {
    let mut s = Some("a");
    if a == 1 {
        s = None;
    } else {
        s = Some("b");
    }
    s
}

/// Five independent flag tests feeding one accumulator
///
/// | flags set (b1..b5)   | result |
/// |----------------------|--------|
/// | b5 only              | 0      |
/// | none                 | 1      |
/// | b1, b2, b3 / b4 only | 2      |
/// | anything else        | 3      |
pub fn composite_flags(b1: bool, b2: bool, b3: bool, b4: bool, b5: bool) -> i32 {
    let mut c: i32 = i32::from(b5) - i32::from(b4);
    if b1 {
        c += 1;
    }
    if b2 {
        c += 2;
    }
    if b3 {
        c += 4;
    }
    if b4 {
        c += 8;
    }
    if b5 {
        c += 16;
    }
    if c == 17 {
        return 0;
    }
    if c == 0 {
        return 1;
    }
    c += 1;
    if c == 1 || c == 18 || c == 8 {
        return 2;
    }
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditional_call_false_returns_zero() {
        let mut graph = NodeGraph::new();
        assert_eq!(conditional_call(&mut graph, false).unwrap(), 0);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_conditional_call_true_hashes_fresh_node() {
        let mut graph = NodeGraph::new();
        graph.alloc_zeroed();
        let value = conditional_call(&mut graph, true).unwrap();
        assert_eq!(value, graph.identity_hash(NodeId::new(1)).unwrap());
        assert_eq!(graph.nodes()[1], crate::node::Node::default());
    }

    #[test]
    fn test_hash_of_null_faults() {
        let graph = NodeGraph::new();
        assert_eq!(hash_of(&graph, None).unwrap_err().category(), "NullReference");
    }

    #[test]
    fn test_byte_saturation_examples() {
        assert_eq!(byte_saturation_check(100, 100), 2);
        assert_eq!(byte_saturation_check(-5, -5), 3);
        assert_eq!(byte_saturation_check(127, 0), 3);
        assert_eq!(byte_saturation_check(127, 1), 2);
        assert_eq!(byte_saturation_check(-128, 127), 3);
        assert_eq!(byte_saturation_check(0, -1), 3);
    }

    #[test]
    fn test_byte_saturation_exhaustive() {
        for a in i8::MIN..=i8::MAX {
            for b in i8::MIN..=i8::MAX {
                let result = byte_saturation_check(a, b);
                let expected = if a >= 0 && b >= 0 && i16::from(a) + i16::from(b) > 127 {
                    2
                } else {
                    3
                };
                assert_eq!(result, expected, "a={} b={}", a, b);
            }
        }
    }

    #[test]
    fn test_take() {
        assert_eq!(take(), "Hello");
    }

    #[test]
    fn test_switch_dispatch_guards() {
        for b in [-100, 0, 5, i32::MAX] {
            assert_eq!(switch_dispatch(0, b), -1);
        }
        for a in [1, 2, 3, 4, -7, i32::MAX] {
            assert_eq!(switch_dispatch(a, a.wrapping_add(5)), 0);
        }
    }

    #[test]
    fn test_switch_dispatch_arms() {
        assert_eq!(switch_dispatch(1, 0), 1);
        assert_eq!(switch_dispatch(1, 7), 1);
        assert_eq!(switch_dispatch(2, 0), 2);
        assert_eq!(switch_dispatch(3, 0), 3);
        // default arm: b + a == 5
        assert_eq!(switch_dispatch(4, 1), 5);
        assert_eq!(switch_dispatch(-3, 8), 5);
        assert_eq!(switch_dispatch(4, 0), 6);
        assert_eq!(switch_dispatch(i32::MIN, 0), 6);
    }

    #[test]
    fn test_switch_dispatch_never_returns_four() {
        for a in -50..50 {
            for b in -50..60 {
                assert_ne!(switch_dispatch(a, b), 4);
            }
        }
    }

    #[test]
    fn test_nullable_choice() {
        assert_eq!(nullable_choice(1), None);
        for a in [i32::MIN, -1, 0, 2, i32::MAX] {
            assert_eq!(nullable_choice(a), Some("b"));
        }
    }

    #[test]
    fn test_composite_flags_table() {
        let mut by_result: [Vec<u8>; 4] = Default::default();
        for mask in 0u8..32 {
            let bit = |i: u8| mask & (1 << i) != 0;
            let result = composite_flags(bit(0), bit(1), bit(2), bit(3), bit(4));
            by_result[result as usize].push(mask);
        }

        assert_eq!(by_result[0], vec![0b10000]);
        assert_eq!(by_result[1], vec![0b00000]);
        assert_eq!(by_result[2], vec![0b00111, 0b01000]);
        assert_eq!(by_result[3].len(), 28);
    }
}
