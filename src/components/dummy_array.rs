//! Literal array source.

use async_trait::async_trait;
use serde_json::json;

use crate::component::{Component, TaskSpec, WorkerOutput};
use crate::engine::WorkerContext;
use crate::error::EngineError;
use crate::types::{NodeBuilder, value_socket};

pub struct DummyArrayComponent;

#[async_trait]
impl Component for DummyArrayComponent {
  fn name(&self) -> &str {
    "Dummy Array"
  }

  fn task(&self) -> TaskSpec {
    TaskSpec::new().output("outArray")
  }

  fn builder(&self, node: &mut NodeBuilder) {
    node.add_output("outArray", value_socket());
  }

  async fn worker(&self, _ctx: WorkerContext) -> Result<WorkerOutput, EngineError> {
    tokio::task::yield_now().await;
    Ok(WorkerOutput::new().with("outArray", json!([1, 2, 3, 4, 5, 6, 7])))
  }
}
