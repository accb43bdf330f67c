//! Directed edges of the live graph.

use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// A directed edge from an output to an input.
///
/// A connection is either *concrete* (declared by the user and part of the
/// static propagation graph) or *virtual* (tagged at creation because one of
/// its endpoint keys is in the owning component's declared virtual set;
/// driven explicitly by that node's worker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
  pub source: NodeId,
  pub output: String,
  pub target: NodeId,
  pub input: String,
  pub is_virtual: bool,
}

impl Connection {
  /// True if this connection joins the given endpoints, virtual or not.
  pub fn joins(&self, source: NodeId, output: &str, target: NodeId, input: &str) -> bool {
    self.source == source && self.output == output && self.target == target && self.input == input
  }
}
