//! Resolution-phase lowering: placeholders → physical operator bindings.
//!
//! A `ResolveStrategy` holds one `ResolutionRule` per step kind. The rule's
//! `key` names the operator the executor will instantiate; its `config` is
//! merged with the args of the steps the placeholder absorbed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use unfold_core::dag::{PhysicalOperator, PlanGraph, PlanNode};
use unfold_core::kind::StepKind;
use unfold_core::placeholder::PlaceholderNode;
use unfold_core::step::LogicalStep;

use crate::error::PlanError;
use crate::strategy::{Phase, RewriteStrategy, Transformed};

/// How to lower one step kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionRule {
    pub key: String,
    #[serde(default)]
    pub config: Value,
}

impl ResolutionRule {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            config: Value::Null,
        }
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    /// Operator config for a placeholder. Always an object: the fields of an
    /// object rule config, a non-null scalar/array rule config under `rule`,
    /// and the absorbed steps under `steps` (empty when nothing was absorbed).
    fn bind(&self, span: &[LogicalStep]) -> Value {
        let mut obj = match &self.config {
            Value::Object(m) => m.clone(),
            Value::Null => Map::new(),
            other => {
                let mut m = Map::new();
                m.insert("rule".into(), other.clone());
                m
            }
        };
        let steps = span
            .iter()
            .map(|s| json!({ "kind": s.kind().as_str(), "args": s.args() }))
            .collect();
        obj.insert("steps".into(), Value::Array(steps));
        Value::Object(obj)
    }
}

/// Named after its rules, e.g. `resolve(expand:expand_out,dedup:dedup_hash)`,
/// so several instances stay distinguishable in traces.
#[derive(Debug, Clone)]
pub struct ResolveStrategy {
    name: String,
    rules: BTreeMap<StepKind, ResolutionRule>,
}

impl Default for ResolveStrategy {
    fn default() -> Self {
        Self {
            name: "resolve()".into(),
            rules: BTreeMap::new(),
        }
    }
}

impl ResolveStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the rule for `kind`.
    pub fn with_rule(mut self, kind: StepKind, rule: ResolutionRule) -> Self {
        self.insert(kind, rule);
        self
    }

    pub fn insert(&mut self, kind: StepKind, rule: ResolutionRule) -> Option<ResolutionRule> {
        let previous = self.rules.insert(kind, rule);
        self.name = self.describe();
        previous
    }

    fn describe(&self) -> String {
        let rules: Vec<String> = self.rules.iter().map(|(k, r)| format!("{k}:{}", r.key)).collect();
        format!("resolve({})", rules.join(","))
    }

    pub fn rule_for(&self, kind: &StepKind) -> Option<&ResolutionRule> {
        self.rules.get(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &StepKind> {
        self.rules.keys()
    }

    fn claims(&self, p: &PlaceholderNode) -> bool {
        self.rules.contains_key(p.replaced_kind())
    }
}

impl RewriteStrategy for ResolveStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn phase(&self) -> Phase {
        Phase::Resolution
    }

    fn apply(&self, graph: PlanGraph) -> Result<Transformed, PlanError> {
        for (position, p) in graph.placeholders() {
            if !self.claims(p) {
                debug!(kind = %p.replaced_kind(), %position, "no resolution rule; leaving placeholder");
            }
        }
        if !graph.placeholders().any(|(_, p)| self.claims(p)) {
            return Ok(Transformed::no(graph));
        }

        let mut next_op = graph.next_op_id();
        let nodes = graph
            .into_nodes()
            .into_iter()
            .map(|node| match node {
                PlanNode::Placeholder(p) => match self.rule_for(p.replaced_kind()) {
                    Some(rule) => {
                        let op = next_op;
                        next_op = next_op.next();
                        debug!(kind = %p.replaced_kind(), key = %rule.key, %op, "resolved placeholder");
                        PlanNode::Physical(
                            PhysicalOperator::new(op, rule.key.clone(), rule.bind(p.span()))
                                .lowering(p.replaced_kind().clone()),
                        )
                    }
                    None => PlanNode::Placeholder(p),
                },
                other => other,
            })
            .collect();

        Ok(Transformed::yes(nodes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unfold_core::id::{NodePosition, OpId};

    fn with_placeholder(kind: StepKind, span: Vec<LogicalStep>) -> PlanGraph {
        PlanGraph::new(vec![
            LogicalStep::new(StepKind::Filter).into(),
            PlaceholderNode::with_span(kind, span).into(),
            LogicalStep::new(StepKind::Project).into(),
        ])
    }

    #[test]
    fn matching_placeholder_becomes_physical() {
        let strategy = ResolveStrategy::new().with_rule(
            StepKind::Expand,
            ResolutionRule::new("expand_out").with_config(json!({"direction": "out"})),
        );
        let span = vec![LogicalStep::with_args(StepKind::Expand, json!({"label": "knows"}))];
        let out = strategy.apply(with_placeholder(StepKind::Expand, span)).unwrap();
        assert!(out.changed);
        assert!(!out.graph.has_placeholders());

        let Some(PlanNode::Physical(op)) = out.graph.get(NodePosition::new(1)) else {
            panic!("expected physical node");
        };
        assert_eq!(op.op, OpId::new(0));
        assert_eq!(op.key, "expand_out");
        assert_eq!(op.lowers, Some(StepKind::Expand));
        assert_eq!(op.config["direction"], "out");
        assert_eq!(op.config["steps"][0]["kind"], "expand");
        assert_eq!(op.config["steps"][0]["args"]["label"], "knows");
    }

    #[test]
    fn unknown_kind_is_declined_without_error() {
        let strategy = ResolveStrategy::new().with_rule(StepKind::Filter, ResolutionRule::new("filter_eval"));
        let graph = with_placeholder(StepKind::Expand, vec![]);
        let out = strategy.apply(graph.clone()).unwrap();
        assert!(!out.changed);
        assert_eq!(out.graph, graph);
    }

    #[test]
    fn config_layout_does_not_depend_on_span() {
        let rule = ResolutionRule::new("k").with_config(json!(7));
        assert_eq!(rule.bind(&[]), json!({"rule": 7, "steps": []}));
        let span = [LogicalStep::new(StepKind::Limit)];
        let bound = rule.bind(&span);
        assert_eq!(bound["rule"], 7);
        assert_eq!(bound["steps"][0]["kind"], "limit");

        let plain = ResolutionRule::new("k").with_config(json!({"batch": 8}));
        assert_eq!(plain.bind(&[]), json!({"batch": 8, "steps": []}));
        assert_eq!(ResolutionRule::new("k").bind(&[]), json!({"steps": []}));
    }

    #[test]
    fn name_lists_rule_keys() {
        let a = ResolveStrategy::new()
            .with_rule(StepKind::Expand, ResolutionRule::new("expand_out"))
            .with_rule(StepKind::Dedup, ResolutionRule::new("dedup_hash"));
        let b = ResolveStrategy::new().with_rule(StepKind::Expand, ResolutionRule::new("expand_in"));
        assert_eq!(a.name(), "resolve(expand:expand_out,dedup:dedup_hash)");
        assert_ne!(a.name(), b.name());
        assert_eq!(a.kinds().count(), 2);
    }

    #[test]
    fn rules_keyed_by_parsed_names_claim_builtin_placeholders() {
        let kind = StepKind::named("Expand").unwrap();
        let strategy = ResolveStrategy::new().with_rule(kind, ResolutionRule::new("expand_out"));
        let out = strategy.apply(with_placeholder(StepKind::Expand, vec![])).unwrap();
        assert!(out.changed);
        assert!(!out.graph.has_placeholders());
    }

    #[test]
    fn op_ids_continue_after_existing_bindings() {
        let graph = PlanGraph::new(vec![
            PhysicalOperator::new(OpId::new(3), "scan", Value::Null).into(),
            PlaceholderNode::new(StepKind::Dedup).into(),
            PlaceholderNode::new(StepKind::Dedup).into(),
        ]);
        let strategy = ResolveStrategy::new().with_rule(StepKind::Dedup, ResolutionRule::new("dedup_hash"));
        let out = strategy.apply(graph).unwrap();
        assert_eq!(out.graph.to_string(), "[scan[3], dedup_hash[4], dedup_hash[5]]");
        assert!(!strategy.apply(out.graph).unwrap().changed);
    }
}
