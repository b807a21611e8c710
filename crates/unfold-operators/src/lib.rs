#![forbid(unsafe_code)]
//! unfold-operators: the operator surface the executor drives.
//!
//! Real graph operators live outside this workspace; they plug in through
//! `Registry` factories. The built-ins here exist for smoke runs and tests.

pub mod builtin;
pub mod registry;
pub mod traits;

pub use registry::{OperatorFactory, Registry};
pub use traits::{Batch, OpError, Operator};
