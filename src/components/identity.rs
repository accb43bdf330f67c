//! Pass-through node: forwards its first delivery unchanged.

use async_trait::async_trait;
use serde_json::Value;

use crate::component::{Component, TaskSpec, WorkerOutput};
use crate::engine::WorkerContext;
use crate::error::EngineError;
use crate::types::{NodeBuilder, value_socket};

pub struct IdentityComponent;

#[async_trait]
impl Component for IdentityComponent {
  fn name(&self) -> &str {
    "Identity"
  }

  fn task(&self) -> TaskSpec {
    TaskSpec::new().output("outData")
  }

  fn builder(&self, node: &mut NodeBuilder) {
    node
      .add_input("inData", value_socket())
      .add_output("outData", value_socket());
  }

  async fn worker(&self, ctx: WorkerContext) -> Result<WorkerOutput, EngineError> {
    let value = ctx.first_input("inData").cloned().unwrap_or(Value::Null);
    Ok(WorkerOutput::new().with("outData", value))
  }
}
