use thiserror::Error;

use unfold_core::error::CompilationError;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("strategy `{strategy}` failed: {reason}")]
    Strategy { strategy: String, reason: String },

    #[error("invalid pipeline definition: {0}")]
    Definition(String),

    #[error(transparent)]
    Compilation(#[from] CompilationError),

    #[error(transparent)]
    Core(#[from] unfold_core::error::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
