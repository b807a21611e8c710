//! Runtime: execute a plan node by node.

use thiserror::Error;
use tracing::{debug, error, warn};

use unfold_core::dag::{PhysicalPlanGraph, PlanGraph, PlanNode};
use unfold_core::error::ProgrammingError;
use unfold_core::id::NodePosition;
use unfold_operators::{Batch, OpError, Operator, Registry};

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("operator registry at {position}: {source}")]
    Registry {
        position: NodePosition,
        #[source]
        source: OpError,
    },

    #[error("operator `{name}` at {position} failed: {source}")]
    Operator {
        position: NodePosition,
        name: String,
        #[source]
        source: OpError,
    },

    /// Internal-consistency violation; see `boundary::guard_request`.
    #[error(transparent)]
    Programming(#[from] ProgrammingError),
}

/// Executor owns the operator registry.
#[derive(Debug, Default)]
pub struct Executor {
    registry: Registry,
}

impl Executor {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Execute a validated plan.
    pub fn run(&self, plan: &PhysicalPlanGraph, input: Batch) -> Result<Batch, ExecError> {
        self.execute(plan.as_graph(), input)
    }

    /// Execute a plan that never went through the lowering validator.
    ///
    /// Only a broken pipeline would call this. If the plan still holds a
    /// placeholder, this unwinds with a `ProgrammingError` when execution
    /// reaches it; wrap the call in `guard_request` to report it.
    pub fn run_unchecked(&self, graph: &PlanGraph, input: Batch) -> Result<Batch, ExecError> {
        warn!(nodes = graph.len(), "executing a plan that bypassed lowering validation");
        self.execute(graph, input)
    }

    fn execute(&self, graph: &PlanGraph, input: Batch) -> Result<Batch, ExecError> {
        let mut batch = input;
        for (position, node) in graph.positions() {
            let op = self.instantiate(position, node)?;
            debug!(%position, op = op.name(), rows = batch.len(), "evaluating node");
            batch = op.eval(batch).map_err(|source| ExecError::Operator {
                position,
                name: op.name().to_string(),
                source,
            })?;
        }
        Ok(batch)
    }

    fn instantiate(&self, position: NodePosition, node: &PlanNode) -> Result<Box<dyn Operator>, ExecError> {
        let made = match node {
            PlanNode::Step(step) => self.registry.instantiate(step.kind().as_str(), step.args()),
            PlanNode::Physical(op) => self.registry.instantiate(&op.key, &op.config),
            PlanNode::Placeholder(p) => {
                error!(kind = %p.replaced_kind(), %position, "placeholder reached the executor");
                p.evaluate(Some(position))
            }
        };
        made.map_err(|source| ExecError::Registry { position, source })
    }
}
