//! The fixture suite
//!
//! Each function exhibits one control-flow shape and is meant to be
//! explored by an external path-exploration engine. Integer arithmetic is
//! 32-bit (or 8-bit where noted) two's-complement with wraparound, so every
//! `+`, `-` and `*` below is spelled out as its `wrapping_*` form.

pub mod aliasing;
pub mod branching;
pub mod calls;

pub use aliasing::{alias_mutation, finalize_chain, mutate_chain};
pub use branching::{
    byte_saturation_check, composite_flags, conditional_call, hash_of, nullable_choice,
    switch_dispatch, take,
};
pub use calls::{chain_a, chain_b, chain_c, foo, identity, unbounded_recursion};
