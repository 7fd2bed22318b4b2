// Branch Fixtures: deterministic control-flow targets
//
// A suite of small functions with exactly specified branching, arithmetic
// and aliasing behavior, for path-exploration and symbolic-execution
// engines to be tested against.

pub mod catalog;
pub mod cli;
pub mod coverage;
pub mod error;
pub mod fixtures;
pub mod node;
pub mod output;

pub use catalog::{invoke, CatalogError, Fixture, Invocation, Outcome, Value};
pub use error::FixtureError;
pub use node::{Node, NodeGraph, NodeId};
