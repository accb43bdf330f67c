//! Logs each delivery on its data input, in delivery order.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::component::{Component, TaskSpec, WorkerOutput};
use crate::engine::WorkerContext;
use crate::error::EngineError;
use crate::types::{Data, NodeBuilder, primary_action_socket, value_socket};

/// Shared capture target so callers (and tests) can observe delivery order.
pub type LogSink = Arc<Mutex<Vec<Data>>>;

/// Side-effecting sink node. Emits every `inData` delivery via `tracing` and,
/// when a sink is attached, records it there as well.
pub struct LogComponent {
  name: String,
  sink: Option<LogSink>,
}

impl LogComponent {
  pub fn new() -> Self {
    Self {
      name: "Log".to_string(),
      sink: None,
    }
  }

  /// A second (or third...) palette entry; the original editor ships `Log`
  /// and `Log2` as distinct components.
  pub fn with_name(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      sink: None,
    }
  }

  pub fn with_sink(mut self, sink: LogSink) -> Self {
    self.sink = Some(sink);
    self
  }
}

impl Default for LogComponent {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Component for LogComponent {
  fn name(&self) -> &str {
    &self.name
  }

  fn task(&self) -> TaskSpec {
    TaskSpec::new().option("outAction")
  }

  fn builder(&self, node: &mut NodeBuilder) {
    node
      .add_input("inAction", primary_action_socket())
      .add_input("inData", value_socket())
      .add_output("outAction", primary_action_socket());
  }

  async fn worker(&self, ctx: WorkerContext) -> Result<WorkerOutput, EngineError> {
    for value in ctx.input("inData") {
      tracing::info!(target: "nodeflow::log", component = %self.name, %value, "log");
      if let Some(sink) = &self.sink {
        sink
          .lock()
          .unwrap_or_else(PoisonError::into_inner)
          .push(value.clone());
      }
    }
    Ok(WorkerOutput::new())
  }
}
