//! # nodeflow
//!
//! Reactive dataflow execution engine for node-graph editors.
//!
//! A mutable node graph (nodes, typed sockets, connections) is snapshotted
//! on every edit and handed to an execution engine that evaluates each
//! node's worker in dependency order, abort-and-restart style: a new edit
//! supersedes the in-flight pass, and only one pass's output cache is ever
//! visible.
//!
//! ## Architecture
//!
//! - `types`: live [Graph], sockets and compatibility, serializable
//!   [GraphSnapshot]s.
//! - `component`: the per-node computation contract ([Component]) and the
//!   name-keyed [ComponentRegistry].
//! - `engine`: the pass state machine — seeding, input gathering, worker
//!   invocation, closed-output suppression, abort supersession.
//! - `fanout`: virtual connections — worker-driven fan-out to a downstream
//!   subgraph, once per value, with recursive cache invalidation (the basis
//!   for loop constructs).
//! - `editor`: the [FlowEditor] facade owning the live graph and the
//!   reactive trigger protocol.
//! - `components`: the built-in palette (Start, Identity, Reverse, Log,
//!   ForEach, literal sources).

pub mod component;
pub mod components;
pub mod editor;
#[cfg(test)]
mod editor_test;
pub mod engine;
pub mod error;
pub mod fanout;
pub mod types;

pub use component::{Component, ComponentRegistry, OutputKind, TaskSpec, VirtualSpec, WorkerOutput};
pub use editor::FlowEditor;
pub use engine::{Engine, PassOutcome, UnreachablePolicy, WorkerContext};
pub use error::{EditorError, EngineError, GraphError};
pub use fanout::{VirtualOutput, VirtualTarget};
pub use types::{Data, Graph, GraphSnapshot, InputData, NodeBuilder, NodeId, OutputData, Socket};
