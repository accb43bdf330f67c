//! Reverses array input; non-array values pass through unchanged.

use async_trait::async_trait;
use serde_json::Value;

use crate::component::{Component, TaskSpec, WorkerOutput};
use crate::engine::WorkerContext;
use crate::error::EngineError;
use crate::types::{NodeBuilder, value_socket};

pub struct ReverseComponent;

#[async_trait]
impl Component for ReverseComponent {
  fn name(&self) -> &str {
    "Reverse"
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
    let value = match ctx.first_input("inData") {
      Some(Value::Array(items)) => {
        Value::Array(items.iter().rev().cloned().collect())
      }
      Some(other) => other.clone(),
      None => Value::Null,
    };
    Ok(WorkerOutput::new().with("outData", value))
  }
}
