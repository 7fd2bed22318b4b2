//! Fault kinds raised by the fixtures

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::NodeId;

/// A fault a fixture raised while running
///
/// Faults are part of a fixture's observable contract: an input that
/// reaches one has reached a fault path. They are returned to the caller
/// unchanged and never recovered from inside the suite.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FixtureError {
    /// An unset node reference was dereferenced
    #[error("null reference: `{expr}` is unset")]
    NullReference {
        /// The dereferenced expression, e.g. `a.link`
        expr: String,
    },

    /// A node id that does not belong to the graph it was used with
    #[error("node {id} does not exist in this graph")]
    DanglingNode { id: NodeId },
}

impl FixtureError {
    pub(crate) fn null(expr: &str) -> Self {
        FixtureError::NullReference { expr: expr.to_string() }
    }

    /// Short category name used in reports
    pub fn category(&self) -> &'static str {
        match self {
            FixtureError::NullReference { .. } => "NullReference",
            FixtureError::DanglingNode { .. } => "DanglingNode",
        }
    }
}

/// Result alias for fixture calls
pub type Result<T> = std::result::Result<T, FixtureError>;
