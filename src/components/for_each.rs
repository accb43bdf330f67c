//! Iteration construct: drives the subgraph behind its virtual `outElement`
//! output once per array element, then emits the whole array on `outArray`.

use async_trait::async_trait;
use serde_json::Value;

use crate::component::{Component, TaskSpec, VirtualSpec, WorkerOutput};
use crate::engine::WorkerContext;
use crate::error::EngineError;
use crate::types::{NodeBuilder, value_socket};

/// The virtual-connection loop. Anything wired to `outElement` is excluded
/// from static propagation and re-invoked per element, each invocation on a
/// freshly cleared downstream cache, strictly in element order.
pub struct ForEachComponent;

#[async_trait]
impl Component for ForEachComponent {
  fn name(&self) -> &str {
    "ForEach"
  }

  fn task(&self) -> TaskSpec {
    TaskSpec::new().output("outElement").output("outArray")
  }

  fn virtual_connections(&self) -> VirtualSpec {
    VirtualSpec {
      outputs: vec!["outElement".to_string()],
      inputs: vec![],
    }
  }

  fn builder(&self, node: &mut NodeBuilder) {
    node
      .add_input("inArray", value_socket())
      .add_output("outElement", value_socket())
      .add_output("outArray", value_socket());
  }

  async fn worker(&self, ctx: WorkerContext) -> Result<WorkerOutput, EngineError> {
    let items = match ctx.first_input("inArray") {
      Some(Value::Array(items)) => items.clone(),
      _ => Vec::new(),
    };

    let fan = ctx.virtual_output("outElement");
    for target in fan.targets() {
      for item in &items {
        target.process_one(item.clone()).await?;
      }
    }

    Ok(WorkerOutput::new().with("outArray", Value::Array(items)))
  }
}
