//! Graph model: sockets, nodes, connections, snapshots, and the value model.
//!
//! The live [Graph] is what the editor mutates; the engine only ever sees
//! immutable [GraphSnapshot]s derived from it.

mod connection;
mod data;
mod graph;
mod node;
mod snapshot;
#[cfg(test)]
mod snapshot_test;
mod socket;

pub use connection::Connection;
pub use data::{Data, InputData, OutputData};
pub use graph::Graph;
pub use node::{GraphNode, InputPort, NodeBuilder, NodeId, OutputPort};
pub use snapshot::{
  GraphSnapshot, InboundLink, OutboundLink, SnapshotInput, SnapshotNode, SnapshotOutput,
};
pub use socket::{
  Socket, SocketCategory, SocketKind, action_socket, primary_action_socket, value_socket,
};
