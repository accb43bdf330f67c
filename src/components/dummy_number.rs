//! Literal number source.

use async_trait::async_trait;
use serde_json::json;

use crate::component::{Component, TaskSpec, WorkerOutput};
use crate::engine::WorkerContext;
use crate::error::EngineError;
use crate::types::{NodeBuilder, value_socket};

pub struct DummyNumberComponent;

#[async_trait]
impl Component for DummyNumberComponent {
  fn name(&self) -> &str {
    "Dummy Number"
  }

  fn task(&self) -> TaskSpec {
    TaskSpec::new().output("outNumber")
  }

  fn builder(&self, node: &mut NodeBuilder) {
    node.add_output("outNumber", value_socket());
  }

  async fn worker(&self, _ctx: WorkerContext) -> Result<WorkerOutput, EngineError> {
    Ok(WorkerOutput::new().with("outNumber", json!(42)))
  }
}
