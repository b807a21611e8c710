#![forbid(unsafe_code)]
//! unfold-core: the vocabulary shared by the planner and the executor.
//!
//! - `StepKind` / `LogicalStep`: the declarative traversal steps being rewritten.
//! - `PlaceholderNode`: an inert marker standing in for a span of steps until a
//!   resolution strategy lowers it.
//! - `PlanGraph` / `PhysicalPlanGraph`: the ordered plan before and after the
//!   placeholder check.
//!
//! No logging, I/O, or threading here; higher crates own those concerns.

pub mod config;
pub mod dag;
pub mod error;
pub mod hash;
pub mod id;
pub mod kind;
pub mod placeholder;
pub mod prelude;
pub mod step;
