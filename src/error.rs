//! Error taxonomy: edit-time graph errors never reach the engine; pass-time
//! engine errors fail the pass and leave the previous pass's data visible.

use thiserror::Error;

use crate::types::NodeId;

/// Rejected graph edits. Raised at connection/node creation time, before any
/// snapshot is taken.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
  #[error("component not registered: {0}")]
  UnknownComponent(String),
  #[error("node not found: {0}")]
  NodeNotFound(NodeId),
  #[error("node {node} has no input named {key}")]
  UnknownInput { node: NodeId, key: String },
  #[error("node {node} has no output named {key}")]
  UnknownOutput { node: NodeId, key: String },
  #[error("sockets {0} and {1} are not compatible")]
  IncompatibleSockets(String, String),
  #[error("input {input} on node {node} already has a connection")]
  InputOccupied { node: NodeId, input: String },
  #[error("connection not found")]
  ConnectionNotFound,
}

/// Pass-level failures. A failed pass caches nothing visible; the reactive
/// loop's only recovery is the next edit-triggered pass.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
  #[error("node not found in snapshot: {0}")]
  NodeNotFound(NodeId),
  #[error("component not registered: {0}")]
  UnknownComponent(String),
  #[error("dependency cycle detected at node {0}")]
  Cycle(NodeId),
  #[error("worker failed: {0}")]
  WorkerFailed(String),
  /// The pass was superseded by [crate::engine::Engine::abort]. Mapped to
  /// [crate::engine::PassOutcome::Superseded] at the pass boundary; workers
  /// only ever observe it from an aborted sub-run.
  #[error("pass superseded by abort")]
  Superseded,
}

/// Either kind of failure, as surfaced by the editor facade whose edits both
/// mutate the graph and trigger passes.
#[derive(Debug, Error)]
pub enum EditorError {
  #[error(transparent)]
  Graph(#[from] GraphError),
  #[error(transparent)]
  Engine(#[from] EngineError),
}
