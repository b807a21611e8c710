#![forbid(unsafe_code)]
//! unfold: placeholder-based lowering of graph-traversal plans.
//!
//! Facade over the workspace crates:
//! - [`core`]: step kinds, plan nodes, the placeholder marker, errors
//! - [`planner`]: rewrite strategies, the strategy pipeline, the lowering validator
//! - [`operators`] / [`exec`]: operator registry and the executor

pub use unfold_core as core;
pub use unfold_exec as exec;
pub use unfold_operators as operators;
pub use unfold_planner as planner;

pub mod prelude {
    pub use unfold_core::prelude::{
        CompilationError, LogicalStep, NodePosition, OpId, PhysicalOperator, PhysicalPlanGraph,
        PlaceholderNode, PlanGraph, PlanNode, PlannerConfig, ProgrammingError, StepKind,
        UnresolvedPlaceholder,
    };
    pub use unfold_exec::{guard_request, ExecError, Executor};
    pub use unfold_operators::{Batch, OpError, Operator, Registry};
    pub use unfold_planner::{
        compile, LoweringValidator, Phase, PlanError, ResolutionRule, ResolveStrategy, RewriteStrategy,
        StrategyPipeline, Transformed, UnfoldStrategy,
    };
}
