//! The lowering gate between compilation and execution.

use tracing::{error, info};

use unfold_core::dag::{PhysicalPlanGraph, PlanGraph};
use unfold_core::error::CompilationError;
use unfold_core::step::LogicalStep;

use crate::error::PlanError;
use crate::pipeline::StrategyPipeline;

/// Checks that lowering is complete. Run it once, after the whole pipeline,
/// before anything is executed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoweringValidator;

impl LoweringValidator {
    /// Return the same graph as a `PhysicalPlanGraph`, or a `CompilationError`
    /// listing every remaining placeholder's kind and position.
    pub fn validate(graph: PlanGraph) -> Result<PhysicalPlanGraph, CompilationError> {
        match PhysicalPlanGraph::try_from(graph) {
            Ok(physical) => {
                info!(nodes = physical.len(), "lowering validated");
                Ok(physical)
            }
            Err(e) => {
                error!(unresolved = e.unresolved.len(), "{e}");
                Err(e)
            }
        }
    }
}

/// Run `pipeline` over `steps`, then validate the result.
pub fn compile<I>(steps: I, pipeline: &StrategyPipeline) -> Result<PhysicalPlanGraph, PlanError>
where
    I: IntoIterator<Item = LogicalStep>,
{
    let outcome = pipeline.run(PlanGraph::from_steps(steps))?;
    Ok(LoweringValidator::validate(outcome.graph)?)
}
