//! Insertion-phase rules: replace recognized step spans with placeholders.

use std::collections::BTreeSet;

use tracing::debug;

use unfold_core::dag::{PlanGraph, PlanNode};
use unfold_core::kind::StepKind;
use unfold_core::placeholder::PlaceholderNode;

use crate::error::PlanError;
use crate::strategy::{Phase, RewriteStrategy, Transformed};

/// Replace every contiguous run of logical steps whose kinds equal `pattern`
/// with one `PlaceholderNode` tagged `replaced`. The run is kept as the
/// placeholder's span.
///
/// Matching is greedy, left to right, non-overlapping. Placeholders and
/// physical operators never match, which makes the rule idempotent.
#[derive(Debug, Clone)]
pub struct UnfoldStrategy {
    name: String,
    pattern: Vec<StepKind>,
    replaced: StepKind,
}

impl UnfoldStrategy {
    pub fn new(pattern: Vec<StepKind>, replaced: StepKind) -> Result<Self, PlanError> {
        if pattern.is_empty() {
            return Err(PlanError::Definition(format!(
                "unfold rule for `{replaced}` has an empty pattern"
            )));
        }
        let name = format!(
            "unfold({})",
            pattern
                .iter()
                .map(StepKind::as_str)
                .collect::<Vec<_>>()
                .join(",")
        );
        Ok(Self {
            name,
            pattern,
            replaced,
        })
    }

    /// The common case: each `kind` step becomes a `kind` placeholder.
    pub fn single(kind: StepKind) -> Self {
        Self {
            name: format!("unfold({kind})"),
            pattern: vec![kind.clone()],
            replaced: kind,
        }
    }

    pub fn pattern(&self) -> &[StepKind] {
        &self.pattern
    }

    pub fn replaced(&self) -> &StepKind {
        &self.replaced
    }

    fn matches_at(&self, nodes: &[PlanNode], start: usize) -> bool {
        let Some(window) = nodes.get(start..start + self.pattern.len()) else {
            return false;
        };
        window
            .iter()
            .zip(&self.pattern)
            .all(|(node, kind)| node.as_step().is_some_and(|s| s.kind() == kind))
    }

    fn match_starts(&self, nodes: &[PlanNode]) -> BTreeSet<usize> {
        let mut starts = BTreeSet::new();
        let mut i = 0;
        while i < nodes.len() {
            if self.matches_at(nodes, i) {
                starts.insert(i);
                i += self.pattern.len();
            } else {
                i += 1;
            }
        }
        starts
    }
}

impl RewriteStrategy for UnfoldStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn phase(&self) -> Phase {
        Phase::Insertion
    }

    fn apply(&self, graph: PlanGraph) -> Result<Transformed, PlanError> {
        let starts = self.match_starts(graph.nodes());
        if starts.is_empty() {
            return Ok(Transformed::no(graph));
        }

        let mut out = Vec::with_capacity(graph.len());
        let mut span = Vec::with_capacity(self.pattern.len());
        let mut remaining = 0usize;

        for (i, node) in graph.into_nodes().into_iter().enumerate() {
            if starts.contains(&i) {
                remaining = self.pattern.len();
            }
            if remaining == 0 {
                out.push(node);
                continue;
            }
            match node {
                PlanNode::Step(step) => span.push(step),
                other => {
                    return Err(PlanError::Strategy {
                        strategy: self.name.clone(),
                        reason: format!("matched span contains non-logical node `{other}` at #{i}"),
                    })
                }
            }
            remaining -= 1;
            if remaining == 0 {
                debug!(strategy = %self.name, kind = %self.replaced, steps = span.len(), "inserted placeholder");
                out.push(PlanNode::Placeholder(PlaceholderNode::with_span(
                    self.replaced.clone(),
                    std::mem::take(&mut span),
                )));
            }
        }

        Ok(Transformed::yes(PlanGraph::new(out)))
    }
}
