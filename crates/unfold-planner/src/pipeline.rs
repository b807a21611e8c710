//! Ordered application of rewrite strategies, phase by phase.
//!
//! Every insertion strategy runs (in registration order) before any
//! resolution strategy. Within a phase the list is re-run while something
//! changes, up to `PlannerConfig::max_strategy_passes`.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use unfold_core::config::PlannerConfig;
use unfold_core::dag::PlanGraph;
use unfold_core::error::UnresolvedPlaceholder;

use crate::error::PlanError;
use crate::strategy::{Phase, RewriteStrategy, RuleTrace};

/// Explicit, ordered strategy configuration for one kind of compilation.
///
/// Read-only once built, so one pipeline can serve concurrent compilations of
/// independent graphs.
#[derive(Clone, Default)]
pub struct StrategyPipeline {
    strategies: Vec<Arc<dyn RewriteStrategy>>,
    config: PlannerConfig,
}

/// Result of running a pipeline (before validation).
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub graph: PlanGraph,
    pub traces: Vec<RuleTrace>,
    /// Placeholders no resolution strategy claimed. Informational here; the
    /// validator turns them into a `CompilationError`.
    pub unresolved: Vec<UnresolvedPlaceholder>,
}

impl StrategyPipeline {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            strategies: Vec::new(),
            config: config.normalized(),
        }
    }

    /// Append a strategy. The same strategy may be added more than once.
    pub fn with<S: RewriteStrategy + 'static>(mut self, strategy: S) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    pub fn with_shared(mut self, strategy: Arc<dyn RewriteStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Strategies of one phase, in registration order.
    pub fn strategies(&self, phase: Phase) -> impl Iterator<Item = &Arc<dyn RewriteStrategy>> {
        self.strategies.iter().filter(move |s| s.phase() == phase)
    }

    pub fn run(&self, graph: PlanGraph) -> Result<PipelineOutcome, PlanError> {
        let mut graph = graph;
        let mut traces = Vec::new();

        for phase in Phase::ORDER {
            graph = self.run_phase(phase, graph, &mut traces)?;
        }

        let unresolved = graph.unresolved();
        for u in &unresolved {
            if self.config.warn_unresolved {
                warn!(kind = %u.kind, position = %u.position, "placeholder left unresolved after resolution phase");
            } else {
                debug!(kind = %u.kind, position = %u.position, "placeholder left unresolved after resolution phase");
            }
        }

        Ok(PipelineOutcome {
            graph,
            traces,
            unresolved,
        })
    }

    fn run_phase(
        &self,
        phase: Phase,
        mut graph: PlanGraph,
        traces: &mut Vec<RuleTrace>,
    ) -> Result<PlanGraph, PlanError> {
        for pass in 0..self.config.max_strategy_passes {
            let mut changed_any = false;
            for strategy in self.strategies(phase) {
                let out = strategy.apply(graph)?;
                trace!(strategy = strategy.name(), %phase, pass, changed = out.changed, "applied strategy");
                if out.changed {
                    debug!(strategy = strategy.name(), %phase, plan = %out.graph, "strategy rewrote plan");
                }
                if self.config.trace_rules {
                    traces.push(RuleTrace {
                        strategy: strategy.name().to_string(),
                        phase,
                        pass,
                        changed: out.changed,
                        after: out.graph.to_string(),
                    });
                }
                changed_any |= out.changed;
                graph = out.graph;
            }
            if !changed_any {
                break;
            }
        }
        Ok(graph)
    }
}

impl std::fmt::Debug for StrategyPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyPipeline")
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::{ResolutionRule, ResolveStrategy};
    use crate::rules::UnfoldStrategy;
    use crate::strategy::Transformed;
    use unfold_core::id::NodePosition;
    use unfold_core::kind::StepKind;
    use unfold_core::step::LogicalStep;

    fn steps(kinds: &[StepKind]) -> PlanGraph {
        PlanGraph::from_steps(kinds.iter().cloned().map(LogicalStep::new))
    }

    /// Resolution strategy that records how often it was called.
    struct Counting(std::sync::atomic::AtomicUsize);

    impl RewriteStrategy for Counting {
        fn name(&self) -> &str {
            "counting"
        }
        fn phase(&self) -> Phase {
            Phase::Resolution
        }
        fn apply(&self, graph: PlanGraph) -> Result<Transformed, PlanError> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(Transformed::no(graph))
        }
    }

    #[test]
    fn insertion_runs_before_resolution_regardless_of_registration() {
        // Resolver registered first still sees the placeholder.
        let pipeline = StrategyPipeline::default()
            .with(ResolveStrategy::new().with_rule(StepKind::Expand, ResolutionRule::new("expand_out")))
            .with(UnfoldStrategy::single(StepKind::Expand));
        let out = pipeline
            .run(steps(&[StepKind::Filter, StepKind::Expand]))
            .unwrap();
        assert_eq!(out.graph.to_string(), "[filter, expand_out[0]]");
        assert!(out.unresolved.is_empty());
        assert_eq!(out.traces[0].phase, Phase::Insertion);
        assert_eq!(out.traces[1].phase, Phase::Resolution);
        assert_eq!(out.traces[1].strategy, "resolve(expand:expand_out)");
    }

    #[test]
    fn unresolved_placeholders_are_reported_not_failed() {
        let pipeline = StrategyPipeline::default().with(UnfoldStrategy::single(StepKind::Expand));
        let out = pipeline
            .run(steps(&[StepKind::Filter, StepKind::Expand, StepKind::Project]))
            .unwrap();
        assert_eq!(out.unresolved.len(), 1);
        assert_eq!(out.unresolved[0].position, NodePosition::new(1));
    }

    #[test]
    fn passes_stop_once_nothing_changes() {
        let counting = Arc::new(Counting(Default::default()));
        let pipeline = StrategyPipeline::new(PlannerConfig {
            max_strategy_passes: 5,
            ..Default::default()
        })
        .with_shared(counting.clone());
        pipeline.run(steps(&[StepKind::Filter])).unwrap();
        assert_eq!(counting.0.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn tracing_can_be_disabled() {
        let pipeline = StrategyPipeline::new(PlannerConfig {
            trace_rules: false,
            ..Default::default()
        })
        .with(UnfoldStrategy::single(StepKind::Expand));
        let out = pipeline.run(steps(&[StepKind::Expand])).unwrap();
        assert!(out.traces.is_empty());
    }
}
