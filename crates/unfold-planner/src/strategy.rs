//! The rewrite strategy interface.

use std::fmt;

use serde::{Deserialize, Serialize};

use unfold_core::dag::PlanGraph;

use crate::error::PlanError;

/// Which half of lowering a strategy belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Logical → logical-with-placeholders.
    Insertion,
    /// Placeholders → physical operators.
    Resolution,
}

impl Phase {
    pub const ORDER: [Phase; 2] = [Phase::Insertion, Phase::Resolution];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Insertion => f.write_str("insertion"),
            Phase::Resolution => f.write_str("resolution"),
        }
    }
}

/// A single rewrite over a whole `PlanGraph`.
///
/// Contract:
/// - Nodes the strategy does not match pass through untouched; if nothing
///   matches, return `Transformed::no(graph)`.
/// - Re-applying a strategy to its own output must report no change.
/// - Declining a placeholder (no rule for its kind) is not an error; the
///   validator reports leftovers once the whole pipeline has run.
pub trait RewriteStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn phase(&self) -> Phase;

    fn apply(&self, graph: PlanGraph) -> Result<Transformed, PlanError>;
}

/// Output of one strategy application.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub graph: PlanGraph,
    pub changed: bool,
}

impl Transformed {
    pub fn yes(graph: PlanGraph) -> Self {
        Self {
            graph,
            changed: true,
        }
    }

    pub fn no(graph: PlanGraph) -> Self {
        Self {
            graph,
            changed: false,
        }
    }
}

/// One recorded strategy application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTrace {
    pub strategy: String,
    pub phase: Phase,
    /// Zero-based pass over the phase's strategy list.
    pub pass: usize,
    pub changed: bool,
    /// Plan rendering after the application.
    pub after: String,
}
