//! Plan representations shared across the rewrite passes.
//!
//! A `PlanGraph` is an ordered sequence of nodes; a node's identity is its
//! position. Between the insertion and resolution phases it may contain
//! `PlaceholderNode`s. A `PhysicalPlanGraph` is a `PlanGraph` that has been
//! checked to contain none, and it stays that way: it exposes no mutation.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CompilationError, UnresolvedPlaceholder};
use crate::hash::{fingerprint_serde, PlanFingerprint};
use crate::id::{NodePosition, OpId};
use crate::kind::StepKind;
use crate::placeholder::PlaceholderNode;
use crate::step::LogicalStep;

/// A concrete operator binding: the executor instantiates `key` from its
/// registry and hands it `config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalOperator {
    pub op: OpId,
    pub key: String,
    #[serde(default)]
    pub config: Value,
    /// Logical step kind this operator was lowered from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowers: Option<StepKind>,
}

impl PhysicalOperator {
    pub fn new(op: OpId, key: impl Into<String>, config: Value) -> Self {
        Self {
            op,
            key: key.into(),
            config,
            lowers: None,
        }
    }

    pub fn lowering(mut self, kind: StepKind) -> Self {
        self.lowers = Some(kind);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "node")]
pub enum PlanNode {
    Step(LogicalStep),
    Placeholder(PlaceholderNode),
    Physical(PhysicalOperator),
}

impl PlanNode {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, PlanNode::Placeholder(_))
    }

    pub fn as_placeholder(&self) -> Option<&PlaceholderNode> {
        match self {
            PlanNode::Placeholder(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_step(&self) -> Option<&LogicalStep> {
        match self {
            PlanNode::Step(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanNode::Step(s) => write!(f, "{}", s.kind()),
            PlanNode::Placeholder(p) => write!(f, "placeholder({})", p.replaced_kind()),
            PlanNode::Physical(op) => write!(f, "{}[{}]", op.key, op.op.get()),
        }
    }
}

impl From<LogicalStep> for PlanNode {
    fn from(step: LogicalStep) -> Self {
        PlanNode::Step(step)
    }
}

impl From<PlaceholderNode> for PlanNode {
    fn from(p: PlaceholderNode) -> Self {
        PlanNode::Placeholder(p)
    }
}

impl From<PhysicalOperator> for PlanNode {
    fn from(op: PhysicalOperator) -> Self {
        PlanNode::Physical(op)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanGraph {
    nodes: Vec<PlanNode>,
}

impl PlanGraph {
    pub fn new(nodes: Vec<PlanNode>) -> Self {
        Self { nodes }
    }

    /// Build the initial logical plan from an ordered step sequence.
    pub fn from_steps<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = LogicalStep>,
    {
        Self {
            nodes: steps.into_iter().map(PlanNode::Step).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[PlanNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<PlanNode> {
        self.nodes
    }

    pub fn get(&self, position: NodePosition) -> Option<&PlanNode> {
        self.nodes.get(position.index())
    }

    /// Nodes paired with their positions.
    pub fn positions(&self) -> impl Iterator<Item = (NodePosition, &PlanNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodePosition::new(i), n))
    }

    pub fn placeholders(&self) -> impl Iterator<Item = (NodePosition, &PlaceholderNode)> {
        self.positions()
            .filter_map(|(pos, n)| n.as_placeholder().map(|p| (pos, p)))
    }

    pub fn has_placeholders(&self) -> bool {
        self.nodes.iter().any(PlanNode::is_placeholder)
    }

    /// Every placeholder still present, in plan order.
    pub fn unresolved(&self) -> Vec<UnresolvedPlaceholder> {
        self.placeholders()
            .map(|(position, p)| UnresolvedPlaceholder {
                position,
                kind: p.replaced_kind().clone(),
            })
            .collect()
    }

    /// The next free operator id (one past the largest bound so far).
    pub fn next_op_id(&self) -> OpId {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                PlanNode::Physical(op) => Some(op.op.next()),
                _ => None,
            })
            .max()
            .unwrap_or(OpId::new(0))
    }

    pub fn fingerprint(&self) -> crate::error::Result<PlanFingerprint> {
        fingerprint_serde(self)
    }
}

impl fmt::Display for PlanGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{node}")?;
        }
        f.write_str("]")
    }
}

impl FromIterator<PlanNode> for PlanGraph {
    fn from_iter<T: IntoIterator<Item = PlanNode>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A plan with zero placeholders. Only obtainable through the
/// `TryFrom<PlanGraph>` check, which the lowering validator performs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PhysicalPlanGraph {
    graph: PlanGraph,
}

impl PhysicalPlanGraph {
    pub fn as_graph(&self) -> &PlanGraph {
        &self.graph
    }

    pub fn into_inner(self) -> PlanGraph {
        self.graph
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn nodes(&self) -> &[PlanNode] {
        self.graph.nodes()
    }

    pub fn fingerprint(&self) -> crate::error::Result<PlanFingerprint> {
        self.graph.fingerprint()
    }
}

impl TryFrom<PlanGraph> for PhysicalPlanGraph {
    type Error = CompilationError;

    fn try_from(graph: PlanGraph) -> Result<Self, Self::Error> {
        let unresolved = graph.unresolved();
        if unresolved.is_empty() {
            Ok(Self { graph })
        } else {
            Err(CompilationError { unresolved })
        }
    }
}

impl fmt::Display for PhysicalPlanGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.graph.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlanGraph {
        PlanGraph::new(vec![
            LogicalStep::new(StepKind::Filter).into(),
            PlaceholderNode::new(StepKind::Expand).into(),
            PhysicalOperator::new(OpId::new(4), "project_cols", Value::Null).into(),
        ])
    }

    #[test]
    fn display_lists_nodes_in_order() {
        assert_eq!(
            sample().to_string(),
            "[filter, placeholder(expand), project_cols[4]]"
        );
    }

    #[test]
    fn next_op_id_skips_bound_ids() {
        assert_eq!(sample().next_op_id(), OpId::new(5));
        assert_eq!(PlanGraph::default().next_op_id(), OpId::new(0));
    }

    #[test]
    fn unresolved_reports_positions() {
        let unresolved = sample().unresolved();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].position, NodePosition::new(1));
        assert_eq!(unresolved[0].kind, StepKind::Expand);
    }

    #[test]
    fn physical_check_rejects_placeholders() {
        let err = PhysicalPlanGraph::try_from(sample()).unwrap_err();
        assert_eq!(err.kinds().collect::<Vec<_>>(), vec![&StepKind::Expand]);

        let clean = PlanGraph::from_steps([LogicalStep::new(StepKind::Limit)]);
        let physical = PhysicalPlanGraph::try_from(clean.clone()).unwrap();
        assert_eq!(physical.as_graph(), &clean);
    }

    #[test]
    fn serializes_with_node_tags() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json[1]["node"], "placeholder");
        assert_eq!(json[1]["replaced_kind"], "expand");
        let back: PlanGraph = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }
}
