//! Convenient re-exports for downstream crates.

pub use crate::config::PlannerConfig;
pub use crate::dag::{PhysicalOperator, PhysicalPlanGraph, PlanGraph, PlanNode};
pub use crate::error::{CompilationError, Error, ProgrammingError, Result, UnresolvedPlaceholder};
pub use crate::hash::PlanFingerprint;
pub use crate::id::{NodePosition, OpId};
pub use crate::kind::{CustomKind, StepKind};
pub use crate::placeholder::PlaceholderNode;
pub use crate::step::LogicalStep;
