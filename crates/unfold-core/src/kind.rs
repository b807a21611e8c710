//! `StepKind`: the stable tag naming a class of logical step.
//!
//! Resolution strategies dispatch on this tag, so it is a plain value
//! (comparable, hashable, serializable) instead of a type relationship.
//! Kinds without a built-in tag are carried as `Other(CustomKind)`; a
//! `CustomKind` is only obtainable through `StepKind::named`/`FromStr`, so it is
//! never empty and never spells a built-in name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StepKind {
    /// Start of a traversal (vertex/edge lookup).
    Source,
    Filter,
    /// Neighbour expansion along edges.
    Expand,
    Project,
    Aggregate,
    Order,
    Limit,
    Dedup,
    Select,
    Other(CustomKind),
}

/// Name of a kind without a built-in tag. Non-empty, trimmed, and distinct
/// from every built-in name (case-insensitively).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomKind(String);

impl CustomKind {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StepKind {
    /// Parse-normalizing constructor: built-in names map to their tag,
    /// anything else becomes `Other`.
    pub fn named(name: &str) -> Result<Self, Error> {
        name.parse()
    }

    pub fn as_str(&self) -> &str {
        match self {
            StepKind::Source => "source",
            StepKind::Filter => "filter",
            StepKind::Expand => "expand",
            StepKind::Project => "project",
            StepKind::Aggregate => "aggregate",
            StepKind::Order => "order",
            StepKind::Limit => "limit",
            StepKind::Dedup => "dedup",
            StepKind::Select => "select",
            StepKind::Other(custom) => custom.as_str(),
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, StepKind::Other(_))
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(Error::StepKind("step kind must not be empty".into()));
        }
        let kind = match name.to_ascii_lowercase().as_str() {
            "source" => StepKind::Source,
            "filter" => StepKind::Filter,
            "expand" => StepKind::Expand,
            "project" => StepKind::Project,
            "aggregate" => StepKind::Aggregate,
            "order" => StepKind::Order,
            "limit" => StepKind::Limit,
            "dedup" => StepKind::Dedup,
            "select" => StepKind::Select,
            _ => StepKind::Other(CustomKind(name.to_string())),
        };
        Ok(kind)
    }
}

impl From<StepKind> for String {
    fn from(kind: StepKind) -> Self {
        kind.as_str().to_string()
    }
}

impl TryFrom<String> for StepKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
