//! Call-chain and recursion fixtures

use std::hint::black_box;

/// Recurses without a base case
///
/// Never returns: every call first calls itself, so the only outcome is
/// stack exhaustion. Callers must bound it externally (a child process, a
/// thread with a small stack, a timeout).
#[allow(unconditional_recursion)]
pub fn unbounded_recursion(x: i32) -> i32 {
    // black_box keeps the call a real, non-tail recursion in optimized builds
    foo(i64::from(black_box(unbounded_recursion(black_box(x)))));
    1
}

/// Ignores its argument and returns 1
pub fn foo(_x: i64) -> i8 {
    let t: i8 = 1;
    t
}

/// 1 when [`chain_b`] yields exactly 10, else 0
///
/// With 32-bit wraparound this holds for exactly two inputs,
/// `-2147483647` and `1171354718`.
pub fn chain_a(x: i32) -> i32 {
    if chain_b(x) == 10 {
        1
    } else {
        0
    }
}

/// 1 for `x == 1`, otherwise `chain_c(x - 1, 10) * x`
pub fn chain_b(x: i32) -> i32 {
    if x == 1 {
        return 1;
    }
    chain_c(x.wrapping_sub(1), 10).wrapping_mul(x)
}

/// `x % 2 + y`
///
/// The remainder truncates toward zero and takes the sign of `x`, so
/// negative odd `x` contributes `-1`.
pub fn chain_c(x: i32, y: i32) -> i32 {
    (x % 2).wrapping_add(y)
}

/// Returns `x` unchanged
pub fn identity(x: i32) -> i32 {
    x
}
