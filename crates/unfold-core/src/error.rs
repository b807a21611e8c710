use std::any::Any;

use thiserror::Error;

use crate::id::NodePosition;
use crate::kind::StepKind;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid step kind: {0}")]
    StepKind(String),

    #[error("Hashing error: {0}")]
    Hash(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}

/// A placeholder that was still present when lowering finished.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnresolvedPlaceholder {
    pub position: NodePosition,
    pub kind: StepKind,
}

/// Lowering left placeholders behind: a strategy that should resolve these
/// kinds is missing or broken. Always a compiler defect, never bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "compilation error: {} placeholder(s) left unresolved after lowering: {}",
    .unresolved.len(),
    render_unresolved(.unresolved)
)]
pub struct CompilationError {
    pub unresolved: Vec<UnresolvedPlaceholder>,
}

impl CompilationError {
    pub fn kinds(&self) -> impl Iterator<Item = &StepKind> {
        self.unresolved.iter().map(|u| &u.kind)
    }
}

fn render_unresolved(unresolved: &[UnresolvedPlaceholder]) -> String {
    unresolved
        .iter()
        .map(|u| format!("`{}` at {}", u.kind, u.position))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A placeholder reached evaluation. Raised only by
/// [`PlaceholderNode::evaluate`](crate::placeholder::PlaceholderNode::evaluate),
/// as the payload of an unwinding panic, so it cannot be mistaken for an
/// operator failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "programming error: placeholder for `{kind}` reached evaluation{}",
    render_position(.position)
)]
pub struct ProgrammingError {
    pub kind: StepKind,
    pub position: Option<NodePosition>,
}

impl ProgrammingError {
    pub fn new(kind: StepKind, position: Option<NodePosition>) -> Self {
        Self { kind, position }
    }

    /// Recover a `ProgrammingError` from a caught panic payload. Any other
    /// payload is handed back untouched so the caller can resume unwinding.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> std::result::Result<Self, Box<dyn Any + Send>> {
        payload.downcast::<ProgrammingError>().map(|e| *e)
    }
}

fn render_position(position: &Option<NodePosition>) -> String {
    match position {
        Some(p) => format!(" at {p}"),
        None => String::new(),
    }
}
