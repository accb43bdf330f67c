//! Serializable graph snapshots — the boundary artifact the editor hands to
//! the engine on every reactive trigger.
//!
//! A snapshot is a deep copy of the live graph, safe to read while further
//! edits happen. Per-port connection lists are partitioned into concrete and
//! virtual edges, so the engine never has to re-derive the virtual tagging.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::data::Data;
use super::node::NodeId;
use super::socket::{Socket, SocketKind};

/// Inbound edge reference on a snapshot input: peer node and its output key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundLink {
  pub node: NodeId,
  pub output: String,
}

/// Outbound edge reference on a snapshot output: peer node and its input key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundLink {
  pub node: NodeId,
  pub input: String,
}

/// An input of a snapshot node with its resolved connection lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotInput {
  pub socket: Socket,
  /// Concrete deliveries arrive along these, in connection order.
  pub connections: Vec<InboundLink>,
  /// Virtual deliveries are driven explicitly by the peer's worker.
  pub virtual_connections: Vec<InboundLink>,
}

/// An output of a snapshot node with its resolved connection lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotOutput {
  pub socket: Socket,
  pub connections: Vec<OutboundLink>,
  pub virtual_connections: Vec<OutboundLink>,
}

/// One node of a graph snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
  pub id: NodeId,
  pub component: String,
  pub controls: BTreeMap<String, Data>,
  pub inputs: BTreeMap<String, SnapshotInput>,
  pub outputs: BTreeMap<String, SnapshotOutput>,
}

impl SnapshotNode {
  /// True if any action input has a concrete connection. Nodes with an init
  /// task hook seed a pass only when this is false.
  pub fn has_inbound_action(&self) -> bool {
    self
      .inputs
      .values()
      .any(|i| i.socket.kind == SocketKind::Action && !i.connections.is_empty())
  }

  /// True if no input has any connection, concrete or virtual. Source nodes
  /// have no unresolved inputs and are processed at the start of a pass.
  pub fn is_source(&self) -> bool {
    self
      .inputs
      .values()
      .all(|i| i.connections.is_empty() && i.virtual_connections.is_empty())
  }
}

/// Immutable snapshot of a node graph, produced on demand from the live
/// graph on every reactive trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
  pub nodes: BTreeMap<NodeId, SnapshotNode>,
}

impl GraphSnapshot {
  pub fn node(&self, id: NodeId) -> Option<&SnapshotNode> {
    self.nodes.get(&id)
  }
}
