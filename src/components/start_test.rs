//! Tests for the Start component.

use std::sync::Arc;

use crate::component::{Component, ComponentRegistry, OutputKind};
use crate::engine::Engine;
use crate::types::{Graph, NodeBuilder, SocketKind};

use super::StartComponent;

#[test]
fn declares_an_init_task_with_an_option_output() {
  let spec = StartComponent.task();
  assert!(spec.init);
  assert_eq!(spec.outputs["outAction"], OutputKind::Option);
}

#[test]
fn builder_declares_the_re_run_control_and_action_output() {
  let mut b = NodeBuilder::default();
  StartComponent.builder(&mut b);
  assert_eq!(b.controls["re-run"]["label"], "Re-Run");
  assert_eq!(b.outputs["outAction"].socket.kind, SocketKind::Action);
  assert!(b.inputs.is_empty());
}

#[tokio::test]
async fn fires_once_per_pass_with_no_upstream_trigger() {
  let mut registry = ComponentRegistry::new();
  registry.register(Arc::new(StartComponent));
  let registry = Arc::new(registry);

  let mut g = Graph::new();
  let mut b = NodeBuilder::default();
  StartComponent.builder(&mut b);
  let s = g.add_node("Start", b, vec![], vec![]);

  let engine = Engine::new(registry);
  engine.process(g.snapshot(), None).await.unwrap();
  let out = engine.output_data(s).unwrap();
  // The trigger carries no data; the open action output is what propagates.
  assert!(out.is_empty());
}
