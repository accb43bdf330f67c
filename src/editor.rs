//! Editor facade: owns the live graph and drives the reactive loop.
//!
//! Every qualifying edit (node created/removed, connection created/removed,
//! explicit re-run) triggers `abort().await` then `process(snapshot).await`,
//! serialized so a new pass never starts while the previous one is still
//! winding down — at most one pass's results are ever visible
//! (last-edit-wins). Rendering, drag interactions and widgets live outside
//! this crate; the per-start-node re-run button is a control value here and
//! maps to [FlowEditor::process].

use std::sync::Arc;

use tracing::info;

use crate::component::ComponentRegistry;
use crate::engine::{Engine, PassOutcome};
use crate::error::{EditorError, EngineError, GraphError};
use crate::types::{Graph, NodeBuilder, NodeId};

/// Engine-side stand-in for the visual editor: graph construction plus the
/// reactive trigger protocol.
pub struct FlowEditor {
  registry: Arc<ComponentRegistry>,
  graph: Graph,
  engine: Engine,
}

impl FlowEditor {
  pub fn new(registry: Arc<ComponentRegistry>) -> Self {
    let engine = Engine::new(registry.clone());
    Self {
      registry,
      graph: Graph::new(),
      engine,
    }
  }

  pub fn graph(&self) -> &Graph {
    &self.graph
  }

  pub fn engine(&self) -> &Engine {
    &self.engine
  }

  /// Creates a node of the named component, letting the component's builder
  /// declare its sockets and controls, then triggers a pass.
  pub async fn add_node(&mut self, component: &str) -> Result<NodeId, EditorError> {
    let c = self
      .registry
      .get(component)
      .ok_or_else(|| GraphError::UnknownComponent(component.to_string()))?;
    let mut builder = NodeBuilder::default();
    c.builder(&mut builder);
    let spec = c.virtual_connections();
    let id = self
      .graph
      .add_node(c.name(), builder, spec.outputs, spec.inputs);
    info!(node = %id, component, "node created");
    self.trigger().await?;
    Ok(id)
  }

  /// Removes a node and everything connected to it, then triggers a pass.
  pub async fn remove_node(&mut self, id: NodeId) -> Result<(), EditorError> {
    self.graph.remove_node(id)?;
    info!(node = %id, "node removed");
    self.trigger().await?;
    Ok(())
  }

  /// Connects an output to an input (socket compatibility, occupancy and
  /// virtual tagging enforced by the graph), then triggers a pass.
  pub async fn connect(
    &mut self,
    source: NodeId,
    output: &str,
    target: NodeId,
    input: &str,
  ) -> Result<(), EditorError> {
    self.graph.connect(source, output, target, input)?;
    self.trigger().await?;
    Ok(())
  }

  /// Removes a connection, then triggers a pass.
  pub async fn disconnect(
    &mut self,
    source: NodeId,
    output: &str,
    target: NodeId,
    input: &str,
  ) -> Result<(), EditorError> {
    self.graph.disconnect(source, output, target, input)?;
    self.trigger().await?;
    Ok(())
  }

  /// Explicit re-run request — what the re-run control on a start node
  /// invokes programmatically.
  pub async fn process(&self) -> Result<PassOutcome, EngineError> {
    self.trigger().await
  }

  async fn trigger(&self) -> Result<PassOutcome, EngineError> {
    self.engine.abort().await;
    self.engine.process(self.graph.snapshot(), None).await
  }
}
