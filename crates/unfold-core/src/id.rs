//! Strongly-typed identifiers for plan nodes.
//!
//! Strategies and the executor should *not* pass raw integers around for these.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a physical operator binding within one plan.
///
/// Assigned by resolution strategies; unique per `PlanGraph`, not globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd)]
#[serde(transparent)]
pub struct OpId(u64);

impl OpId {
    pub const fn new(v: u64) -> Self {
        Self(v)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpId({})", self.0)
    }
}

/// Index of a node inside its `PlanGraph`. Node identity is positional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd)]
#[serde(transparent)]
pub struct NodePosition(usize);

impl NodePosition {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for NodePosition {
    fn from(index: usize) -> Self {
        Self(index)
    }
}
