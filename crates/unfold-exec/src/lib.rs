#![forbid(unsafe_code)]
//! unfold-exec: runs lowered plans.
//!
//! The executor walks a `PhysicalPlanGraph` in order, instantiating each node
//! from the operator `Registry`. A placeholder that somehow reaches it trips
//! the node's evaluation trap; `boundary::guard_request` reports that as
//! `ExecError::Programming` for the one request and nothing else.

pub mod boundary;
pub mod runtime;

pub use boundary::guard_request;
pub use runtime::{ExecError, Executor};
