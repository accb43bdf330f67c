//! Pass entry point: fires its action output once per pass without any
//! upstream trigger.

use async_trait::async_trait;
use serde_json::json;

use crate::component::{Component, TaskSpec, WorkerOutput};
use crate::engine::WorkerContext;
use crate::error::EngineError;
use crate::types::{NodeBuilder, primary_action_socket};

/// Seeds a pass via its init hook and exposes a re-run control that maps to
/// the editor's explicit process trigger.
pub struct StartComponent;

#[async_trait]
impl Component for StartComponent {
  fn name(&self) -> &str {
    "Start"
  }

  fn task(&self) -> TaskSpec {
    TaskSpec::new().option("outAction").with_init()
  }

  fn builder(&self, node: &mut NodeBuilder) {
    node
      .add_control("re-run", json!({ "label": "Re-Run" }))
      .add_output("outAction", primary_action_socket());
  }

  async fn worker(&self, _ctx: WorkerContext) -> Result<WorkerOutput, EngineError> {
    // Suspension point so the trigger settles after the pass is underway.
    tokio::task::yield_now().await;
    Ok(WorkerOutput::new())
  }
}
