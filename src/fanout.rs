//! Virtual-connection fan-out: worker-driven re-invocation of a downstream
//! subgraph, once per driven value, outside the static propagation graph.
//!
//! A component declares which of its socket keys are virtually wired
//! ([crate::component::VirtualSpec]); connections touching those keys are
//! tagged at creation and excluded from normal propagation. The worker then
//! drives each declared target explicitly through [VirtualTarget::process_one],
//! which clears the target's downstream caches, re-invokes it with a single
//! value, and forward-propagates — sequentially, in issue order.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::engine::{EngineInner, RunContext, WorkerContext};
use crate::error::EngineError;
use crate::types::{Data, NodeId};

/// Fan-out handle for one virtual output key of the running node.
pub struct VirtualOutput {
  targets: Vec<VirtualTarget>,
}

impl VirtualOutput {
  pub(crate) fn new(ctx: &WorkerContext, key: &str) -> Self {
    let targets = ctx
      .node
      .outputs
      .get(key)
      .map(|port| {
        port
          .virtual_connections
          .iter()
          .map(|link| VirtualTarget {
            engine: ctx.engine.clone(),
            run: ctx.run.clone(),
            node: link.node,
            input: link.input.clone(),
          })
          .collect()
      })
      .unwrap_or_default();
    Self { targets }
  }

  /// Declared virtual connections for the key, in creation order. One full
  /// driver iteration is expected per target.
  pub fn targets(&self) -> &[VirtualTarget] {
    &self.targets
  }

  pub fn is_empty(&self) -> bool {
    self.targets.is_empty()
  }
}

/// One declared virtual edge: the downstream node and the input key virtual
/// deliveries arrive on.
pub struct VirtualTarget {
  engine: Arc<EngineInner>,
  run: Arc<RunContext>,
  node: NodeId,
  input: String,
}

impl VirtualTarget {
  pub fn node_id(&self) -> NodeId {
    self.node
  }

  /// Re-invokes the target with `value` as one delivery on the connected
  /// input key, after recursively clearing cached output data for the whole
  /// downstream subtree, then forward-propagates from it.
  ///
  /// Each invocation starts the subtree from a clean cache; no residue from
  /// a prior iteration survives. A target deleted mid-pass is a no-op, since
  /// graph edits may race with in-flight passes. The value is passed through
  /// unchanged, whatever its shape; validation belongs to the downstream
  /// worker.
  pub async fn process_one(&self, value: Data) -> Result<(), EngineError> {
    if self.run.snapshot.node(self.node).is_none() {
      warn!(node = %self.node, "virtual target no longer in snapshot; skipping");
      return Ok(());
    }
    trace!(node = %self.node, input = %self.input, "virtual re-invocation");
    deep_clear_output_data(&self.run, self.node);
    self
      .engine
      .process_node(&self.run, self.node, Some((self.input.clone(), value)))
      .await?;
    self.engine.forward_process(&self.run, self.node).await
  }
}

/// Clears cached output data for every node reachable from `start` through
/// concrete and virtual connections, `start` included.
pub(crate) fn deep_clear_output_data(run: &RunContext, start: NodeId) {
  let mut visited = HashSet::new();
  let mut stack = vec![start];
  while let Some(id) = stack.pop() {
    if !visited.insert(id) {
      continue;
    }
    run.clear_node(id);
    if let Some(node) = run.snapshot.node(id) {
      for port in node.outputs.values() {
        for link in port.connections.iter().chain(port.virtual_connections.iter()) {
          stack.push(link.node);
        }
      }
    }
  }
}
