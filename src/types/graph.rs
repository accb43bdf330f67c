//! The live, editable node graph owned by the editor facade.

use std::collections::BTreeMap;

use tracing::debug;

use super::connection::Connection;
use super::node::{GraphNode, NodeBuilder, NodeId};
use super::snapshot::{
  GraphSnapshot, InboundLink, OutboundLink, SnapshotInput, SnapshotNode, SnapshotOutput,
};
use crate::error::GraphError;

/// Mutable node graph. Every mutation is expected to be followed by a
/// reactive trigger (snapshot + engine pass); the graph itself carries no
/// execution state.
#[derive(Debug, Default, Clone)]
pub struct Graph {
  nodes: BTreeMap<NodeId, GraphNode>,
  connections: Vec<Connection>,
  next_id: u64,
}

impl Graph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a node whose ports and controls were declared by a component
  /// builder. The virtual key sets come from the component's declaration and
  /// drive connection tagging in [Graph::connect].
  pub fn add_node(
    &mut self,
    component: impl Into<String>,
    builder: NodeBuilder,
    virtual_outputs: Vec<String>,
    virtual_inputs: Vec<String>,
  ) -> NodeId {
    self.next_id += 1;
    let id = NodeId(self.next_id);
    self.nodes.insert(
      id,
      GraphNode {
        id,
        component: component.into(),
        controls: builder.controls,
        inputs: builder.inputs,
        outputs: builder.outputs,
        virtual_outputs,
        virtual_inputs,
      },
    );
    id
  }

  /// Removes a node and every connection touching it.
  pub fn remove_node(&mut self, id: NodeId) -> Result<(), GraphError> {
    if self.nodes.remove(&id).is_none() {
      return Err(GraphError::NodeNotFound(id));
    }
    self.connections.retain(|c| c.source != id && c.target != id);
    Ok(())
  }

  /// Connects an output to an input.
  ///
  /// Rejected before the engine is ever involved when the sockets are
  /// incompatible or a singular input is already occupied by a concrete
  /// connection. The connection is tagged virtual at creation time when
  /// either endpoint key is in its node's declared virtual set; virtual
  /// connections are exempt from the occupancy rule.
  pub fn connect(
    &mut self,
    source: NodeId,
    output: &str,
    target: NodeId,
    input: &str,
  ) -> Result<(), GraphError> {
    let source_node = self.nodes.get(&source).ok_or(GraphError::NodeNotFound(source))?;
    let target_node = self.nodes.get(&target).ok_or(GraphError::NodeNotFound(target))?;
    let out_port = source_node
      .outputs
      .get(output)
      .ok_or_else(|| GraphError::UnknownOutput {
        node: source,
        key: output.to_string(),
      })?;
    let in_port = target_node
      .inputs
      .get(input)
      .ok_or_else(|| GraphError::UnknownInput {
        node: target,
        key: input.to_string(),
      })?;

    if !out_port.socket.is_compatible(&in_port.socket) {
      return Err(GraphError::IncompatibleSockets(
        out_port.socket.name.clone(),
        in_port.socket.name.clone(),
      ));
    }

    let is_virtual = source_node.virtual_outputs.iter().any(|k| k == output)
      || target_node.virtual_inputs.iter().any(|k| k == input);

    if !is_virtual
      && !in_port.multiple
      && self
        .connections
        .iter()
        .any(|c| !c.is_virtual && c.target == target && c.input == input)
    {
      return Err(GraphError::InputOccupied {
        node: target,
        input: input.to_string(),
      });
    }

    debug!(%source, output, %target, input, is_virtual, "connection created");
    self.connections.push(Connection {
      source,
      output: output.to_string(),
      target,
      input: input.to_string(),
      is_virtual,
    });
    Ok(())
  }

  /// Removes the connection joining the given endpoints.
  pub fn disconnect(
    &mut self,
    source: NodeId,
    output: &str,
    target: NodeId,
    input: &str,
  ) -> Result<(), GraphError> {
    let before = self.connections.len();
    self
      .connections
      .retain(|c| !c.joins(source, output, target, input));
    if self.connections.len() == before {
      return Err(GraphError::ConnectionNotFound);
    }
    Ok(())
  }

  pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
    self.nodes.get(&id)
  }

  pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
    self.nodes.values()
  }

  pub fn connections(&self) -> &[Connection] {
    &self.connections
  }

  /// Produces the serializable snapshot handed to the engine. Connection
  /// order within each port follows creation order.
  pub fn snapshot(&self) -> GraphSnapshot {
    let mut nodes: BTreeMap<NodeId, SnapshotNode> = self
      .nodes
      .values()
      .map(|n| {
        let inputs = n
          .inputs
          .iter()
          .map(|(k, p)| {
            (
              k.clone(),
              SnapshotInput {
                socket: p.socket.clone(),
                connections: Vec::new(),
                virtual_connections: Vec::new(),
              },
            )
          })
          .collect();
        let outputs = n
          .outputs
          .iter()
          .map(|(k, p)| {
            (
              k.clone(),
              SnapshotOutput {
                socket: p.socket.clone(),
                connections: Vec::new(),
                virtual_connections: Vec::new(),
              },
            )
          })
          .collect();
        (
          n.id,
          SnapshotNode {
            id: n.id,
            component: n.component.clone(),
            controls: n.controls.clone(),
            inputs,
            outputs,
          },
        )
      })
      .collect();

    for c in &self.connections {
      if let Some(out_port) = nodes
        .get_mut(&c.source)
        .and_then(|n| n.outputs.get_mut(&c.output))
      {
        let link = OutboundLink {
          node: c.target,
          input: c.input.clone(),
        };
        if c.is_virtual {
          out_port.virtual_connections.push(link);
        } else {
          out_port.connections.push(link);
        }
      }
      if let Some(in_port) = nodes
        .get_mut(&c.target)
        .and_then(|n| n.inputs.get_mut(&c.input))
      {
        let link = InboundLink {
          node: c.source,
          output: c.output.clone(),
        };
        if c.is_virtual {
          in_port.virtual_connections.push(link);
        } else {
          in_port.connections.push(link);
        }
      }
    }

    GraphSnapshot { nodes }
  }
}
