//! Per-node computation contract and the component registry.
//!
//! A component is registered once, under its name, in a [ComponentRegistry]
//! built at startup; the same registry is shared by the editor facade (graph
//! construction) and the engine (execution).

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;

use crate::engine::WorkerContext;
use crate::error::EngineError;
use crate::types::{Data, NodeBuilder, OutputData};

/// Closure category of a declared output.
///
/// `Output` outputs carry data that propagates whenever produced. `Option`
/// outputs are control-flow outputs whose propagation a worker may suppress
/// per pass by reporting the key as closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
  Output,
  Option,
}

/// A component's task declaration: output closure categories and whether the
/// engine should seed a pass with this node when it has no inbound action
/// connection.
#[derive(Debug, Clone, Default)]
pub struct TaskSpec {
  pub outputs: BTreeMap<String, OutputKind>,
  pub init: bool,
}

impl TaskSpec {
  pub fn new() -> Self {
    Self::default()
  }

  /// Declares a data-carrying output.
  pub fn output(mut self, key: impl Into<String>) -> Self {
    self.outputs.insert(key.into(), OutputKind::Output);
    self
  }

  /// Declares a control-flow output whose propagation can be closed per pass.
  pub fn option(mut self, key: impl Into<String>) -> Self {
    self.outputs.insert(key.into(), OutputKind::Option);
    self
  }

  /// Registers the init hook: the node seeds each pass with a synthetic
  /// trigger when it has no inbound action connection.
  pub fn with_init(mut self) -> Self {
    self.init = true;
    self
  }
}

/// Socket keys a component declares as virtually wired. Connections touching
/// these keys are tagged virtual at creation time and driven explicitly by
/// the worker instead of the static propagation graph.
#[derive(Debug, Clone, Default)]
pub struct VirtualSpec {
  pub outputs: Vec<String>,
  pub inputs: Vec<String>,
}

impl VirtualSpec {
  pub fn is_empty(&self) -> bool {
    self.outputs.is_empty() && self.inputs.is_empty()
  }
}

/// What a worker returns for one invocation: partial output data plus the
/// set of output keys closed for this pass. Closed keys never appear in
/// downstream-visible data, even if a value was computed for them.
#[derive(Debug, Clone, Default)]
pub struct WorkerOutput {
  pub data: OutputData,
  pub closed: Vec<String>,
}

impl WorkerOutput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, key: impl Into<String>, value: Data) -> Self {
    self.data.insert(key.into(), value);
    self
  }

  pub fn close(mut self, key: impl Into<String>) -> Self {
    self.closed.push(key.into());
    self
  }

  pub fn is_closed(&self, key: &str) -> bool {
    self.closed.iter().any(|k| k == key)
  }

  /// The value downstream nodes observe for `key`, if any.
  pub fn visible(&self, key: &str) -> Option<&Data> {
    if self.is_closed(key) {
      return None;
    }
    self.data.get(key)
  }

  /// Output data with closed keys removed.
  pub fn visible_data(&self) -> OutputData {
    self
      .data
      .iter()
      .filter(|(k, _)| !self.is_closed(k))
      .map(|(k, v)| (k.clone(), v.clone()))
      .collect()
  }
}

/// A node's computation contract.
///
/// `builder` declares sockets and controls on a node instance at creation
/// time; `worker` is invoked once per node per pass (and again per virtual
/// re-invocation) with all deliveries gathered per input key.
#[async_trait]
pub trait Component: Send + Sync {
  fn name(&self) -> &str;

  fn task(&self) -> TaskSpec {
    TaskSpec::default()
  }

  fn virtual_connections(&self) -> VirtualSpec {
    VirtualSpec::default()
  }

  fn builder(&self, node: &mut NodeBuilder);

  async fn worker(&self, ctx: WorkerContext) -> Result<WorkerOutput, EngineError>;
}

/// Name-keyed component lookup table, built once at startup and passed down.
#[derive(Default)]
pub struct ComponentRegistry {
  components: HashMap<String, Arc<dyn Component>>,
}

impl ComponentRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a component under its name; a later registration under the
  /// same name replaces the earlier one.
  pub fn register(&mut self, component: Arc<dyn Component>) {
    self.components.insert(component.name().to_string(), component);
  }

  pub fn get(&self, name: &str) -> Option<&Arc<dyn Component>> {
    self.components.get(name)
  }

  /// True if any registered component declares virtual wiring. Engines built
  /// over such a registry suppress default unreachable handling.
  pub fn has_virtual_components(&self) -> bool {
    self.components.values().any(|c| !c.virtual_connections().is_empty())
  }
}
