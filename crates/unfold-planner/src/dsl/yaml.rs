//! YAML documents for traversals and strategy pipelines.
//!
//! Traversal:
//! ```yaml
//! steps:
//!   - kind: source
//!     args: { label: person }
//!   - kind: filter
//!     args: { age: { gt: 30 } }
//!   - kind: expand
//!     args: { direction: out, label: knows }
//!   - kind: project
//! ```
//!
//! Pipeline:
//! ```yaml
//! config:
//!   max_strategy_passes: 2
//! unfold:
//!   - pattern: [expand, filter]
//!     replaces: expand
//!   - pattern: [dedup]
//! resolve:
//!   - kind: expand
//!     key: expand_out
//!     config: { batch: 1024 }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use unfold_core::config::PlannerConfig;
use unfold_core::kind::StepKind;
use unfold_core::step::LogicalStep;

use crate::error::PlanError;
use crate::lower::{ResolutionRule, ResolveStrategy};
use crate::pipeline::StrategyPipeline;
use crate::rules::UnfoldStrategy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Traversal {
    pub steps: Vec<StepDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDef {
    pub kind: StepKind,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineDoc {
    #[serde(default)]
    pub config: Option<PipelineConfig>,
    #[serde(default)]
    pub unfold: Vec<UnfoldDef>,
    #[serde(default)]
    pub resolve: Vec<ResolveDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnfoldDef {
    pub pattern: Vec<StepKind>,
    /// Defaults to the first kind of `pattern`.
    #[serde(default)]
    pub replaces: Option<StepKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveDef {
    pub kind: StepKind,
    pub key: String,
    #[serde(default)]
    pub config: Value,
}

/// Per-pipeline overrides of `PlannerConfig`; unset fields keep the base value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub max_strategy_passes: Option<usize>,
    pub trace_rules: Option<bool>,
    pub warn_unresolved: Option<bool>,
}

impl PipelineConfig {
    pub fn apply_to(&self, cfg: &mut PlannerConfig) {
        if let Some(v) = self.max_strategy_passes {
            cfg.max_strategy_passes = v;
        }
        if let Some(v) = self.trace_rules {
            cfg.trace_rules = v;
        }
        if let Some(v) = self.warn_unresolved {
            cfg.warn_unresolved = v;
        }
    }
}

/// Parse a traversal document into its ordered logical steps.
pub fn parse_yaml_traversal(yaml_src: &str) -> Result<Vec<LogicalStep>, PlanError> {
    let doc: Traversal = serde_yaml::from_str(yaml_src)?;
    if doc.steps.is_empty() {
        return Err(PlanError::Definition("traversal has no steps".into()));
    }
    Ok(doc
        .steps
        .into_iter()
        .map(|s| LogicalStep::with_args(s.kind, s.args))
        .collect())
}

/// Build a `StrategyPipeline` from a pipeline document.
///
/// Unfold rules are added in document order; all resolve entries go into one
/// `ResolveStrategy`. A kind listed twice under `resolve` is rejected.
pub fn parse_yaml_pipeline(yaml_src: &str, base: PlannerConfig) -> Result<StrategyPipeline, PlanError> {
    let doc: PipelineDoc = serde_yaml::from_str(yaml_src)?;
    build_pipeline(doc, base)
}

pub fn build_pipeline(doc: PipelineDoc, base: PlannerConfig) -> Result<StrategyPipeline, PlanError> {
    let mut cfg = base;
    if let Some(overrides) = &doc.config {
        overrides.apply_to(&mut cfg);
    }
    let mut pipeline = StrategyPipeline::new(cfg);

    for def in doc.unfold {
        let replaced = match def.replaces {
            Some(kind) => kind,
            None => def
                .pattern
                .first()
                .cloned()
                .ok_or_else(|| PlanError::Definition("unfold entry has an empty pattern".into()))?,
        };
        pipeline = pipeline.with(UnfoldStrategy::new(def.pattern, replaced)?);
    }

    if !doc.resolve.is_empty() {
        let mut resolve = ResolveStrategy::new();
        for def in doc.resolve {
            let rule = ResolutionRule::new(def.key).with_config(def.config);
            if resolve.insert(def.kind.clone(), rule).is_some() {
                return Err(PlanError::Definition(format!(
                    "duplicate resolve entry for `{}`",
                    def.kind
                )));
            }
        }
        pipeline = pipeline.with(resolve);
    }

    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Phase;

    #[test]
    fn duplicate_resolve_kinds_are_rejected() {
        let yaml = r#"
resolve:
  - { kind: expand, key: a }
  - { kind: Expand, key: b }
"#;
        let err = parse_yaml_pipeline(yaml, PlannerConfig::default()).unwrap_err();
        assert!(matches!(err, PlanError::Definition(_)));
    }

    #[test]
    fn replaces_defaults_to_first_pattern_kind() {
        let yaml = "unfold:\n  - pattern: [order, limit]\n";
        let pipeline = parse_yaml_pipeline(yaml, PlannerConfig::default()).unwrap();
        let names: Vec<_> = pipeline
            .strategies(Phase::Insertion)
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["unfold(order,limit)"]);
    }

    #[test]
    fn config_section_overrides_base() {
        let yaml = "config:\n  max_strategy_passes: 4\n  trace_rules: false\n";
        let pipeline = parse_yaml_pipeline(yaml, PlannerConfig::default()).unwrap();
        assert_eq!(pipeline.config().max_strategy_passes, 4);
        assert!(!pipeline.config().trace_rules);
        assert!(pipeline.config().warn_unresolved);
        assert!(pipeline.is_empty());
    }
}
