#![forbid(unsafe_code)]
//! unfold-planner: logical traversal → plan with placeholders → physical plan.
//!
//! Design:
//! - A `StrategyPipeline` is an explicitly built, ordered list of
//!   `RewriteStrategy` values. Nothing registers itself globally.
//! - Insertion strategies (`rules::UnfoldStrategy`) swap recognized step spans
//!   for `PlaceholderNode`s; resolution strategies (`lower::ResolveStrategy`)
//!   swap placeholders for physical operators.
//! - `validate::LoweringValidator` is the only gate between the two: it turns a
//!   `PlanGraph` into a `PhysicalPlanGraph` or reports every leftover marker.

pub mod dsl;
pub mod error;
pub mod lower;
pub mod pipeline;
pub mod rules;
pub mod strategy;
pub mod validate;

pub use dsl::yaml::{parse_yaml_pipeline, parse_yaml_traversal, PipelineConfig};
pub use error::PlanError;
pub use lower::{ResolutionRule, ResolveStrategy};
pub use pipeline::{PipelineOutcome, StrategyPipeline};
pub use rules::UnfoldStrategy;
pub use strategy::{Phase, RewriteStrategy, RuleTrace, Transformed};
pub use validate::{compile, LoweringValidator};
