//! Logical steps: the declarative units a traversal is made of.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kind::StepKind;

/// One declarative traversal step. `args` is opaque to the planner core;
/// resolution rules forward it into the physical operator's configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalStep {
    kind: StepKind,
    #[serde(default)]
    args: Value,
}

impl LogicalStep {
    pub fn new(kind: StepKind) -> Self {
        Self {
            kind,
            args: Value::Null,
        }
    }

    pub fn with_args(kind: StepKind, args: Value) -> Self {
        Self { kind, args }
    }

    pub fn kind(&self) -> &StepKind {
        &self.kind
    }

    pub fn args(&self) -> &Value {
        &self.args
    }
}

impl From<StepKind> for LogicalStep {
    fn from(kind: StepKind) -> Self {
        Self::new(kind)
    }
}
