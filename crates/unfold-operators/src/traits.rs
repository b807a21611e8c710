//! Operator trait + common interfaces.

use thiserror::Error;

/// Ordered traversers flowing between operators.
pub type Batch = Vec<serde_json::Value>;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("execution error: {0}")]
    Exec(String),
}

/// Trait that all operators must implement.
///
/// `eval` must be deterministic given the same input and configuration.
pub trait Operator: Send + Sync {
    /// Human-readable operator name (stable).
    fn name(&self) -> &str;

    fn eval(&self, input: Batch) -> Result<Batch, OpError>;
}
