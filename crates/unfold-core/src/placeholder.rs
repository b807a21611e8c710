//! The placeholder marker node.
//!
//! An insertion-phase strategy puts a `PlaceholderNode` where it intends to
//! substitute a physical operator; a resolution-phase strategy replaces it.
//! The node itself does nothing but remember which step kind it stands in for.
//! Evaluating it is always a defect: it means lowering was skipped or the
//! validator was bypassed.

use serde::{Deserialize, Serialize};

use crate::error::ProgrammingError;
use crate::id::NodePosition;
use crate::kind::StepKind;
use crate::step::LogicalStep;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderNode {
    replaced_kind: StepKind,
    /// Logical steps absorbed by this marker, in plan order. May be empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    span: Vec<LogicalStep>,
}

impl PlaceholderNode {
    /// Accepts any kind, including ones no resolver knows about; whether the
    /// kind can be lowered is decided by the strategies, not here.
    pub fn new(replaced_kind: StepKind) -> Self {
        Self {
            replaced_kind,
            span: Vec::new(),
        }
    }

    pub fn with_span(replaced_kind: StepKind, span: Vec<LogicalStep>) -> Self {
        Self {
            replaced_kind,
            span,
        }
    }

    pub fn replaced_kind(&self) -> &StepKind {
        &self.replaced_kind
    }

    pub fn span(&self) -> &[LogicalStep] {
        &self.span
    }

    /// Never returns. Unwinds with a [`ProgrammingError`] payload carrying the
    /// replaced kind and, if known, the node's position.
    pub fn evaluate(&self, position: Option<NodePosition>) -> ! {
        std::panic::panic_any(ProgrammingError::new(self.replaced_kind.clone(), position))
    }
}
