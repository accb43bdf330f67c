//! Nodes of the live (editable) graph.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::data::Data;
use super::socket::Socket;

/// Identifier of a node, assigned by the graph in creation order.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// An input declared on a node by its component's builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputPort {
  pub socket: Socket,
  /// Whether more than one concrete connection may occupy this input.
  pub multiple: bool,
}

/// An output declared on a node by its component's builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputPort {
  pub socket: Socket,
}

/// A unit of computation in the live graph. Ports and controls are fixed by
/// the owning component at construction time.
#[derive(Debug, Clone)]
pub struct GraphNode {
  pub id: NodeId,
  /// Registered component name this node executes.
  pub component: String,
  pub controls: BTreeMap<String, Data>,
  pub inputs: BTreeMap<String, InputPort>,
  pub outputs: BTreeMap<String, OutputPort>,
  /// Output keys the component declared as virtually wired.
  pub virtual_outputs: Vec<String>,
  /// Input keys the component declared as virtually wired.
  pub virtual_inputs: Vec<String>,
}

/// Builder handed to [crate::component::Component::builder] to declare the
/// sockets and controls of a node instance.
#[derive(Debug, Default)]
pub struct NodeBuilder {
  pub(crate) controls: BTreeMap<String, Data>,
  pub(crate) inputs: BTreeMap<String, InputPort>,
  pub(crate) outputs: BTreeMap<String, OutputPort>,
}

impl NodeBuilder {
  pub fn add_input(&mut self, key: impl Into<String>, socket: Socket) -> &mut Self {
    self.inputs.insert(
      key.into(),
      InputPort {
        socket,
        multiple: false,
      },
    );
    self
  }

  pub fn add_multi_input(&mut self, key: impl Into<String>, socket: Socket) -> &mut Self {
    self.inputs.insert(
      key.into(),
      InputPort {
        socket,
        multiple: true,
      },
    );
    self
  }

  pub fn add_output(&mut self, key: impl Into<String>, socket: Socket) -> &mut Self {
    self.outputs.insert(key.into(), OutputPort { socket });
    self
  }

  pub fn add_control(&mut self, key: impl Into<String>, value: Data) -> &mut Self {
    self.controls.insert(key.into(), value);
    self
  }
}
