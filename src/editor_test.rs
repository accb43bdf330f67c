//! Tests for the editor facade: reactive triggers on every edit, edit-time
//! rejections, last-edit-wins visibility.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::component::ComponentRegistry;
use crate::components::{
  DummyNumberComponent, IdentityComponent, StartComponent, register_builtin,
};
use crate::editor::FlowEditor;
use crate::error::{EditorError, GraphError};

fn builtin_registry() -> Arc<ComponentRegistry> {
  let mut registry = ComponentRegistry::new();
  register_builtin(&mut registry);
  Arc::new(registry)
}

#[tokio::test]
async fn every_edit_triggers_a_pass() {
  let mut editor = FlowEditor::new(builtin_registry());
  let n = editor.add_node("Dummy Number").await.unwrap();
  let i = editor.add_node("Identity").await.unwrap();
  // The add itself already ran a pass; the orphan identity forwarded Null.
  assert_eq!(editor.engine().output_data(i).unwrap()["outData"], Value::Null);

  editor.connect(n, "outNumber", i, "inData").await.unwrap();
  assert_eq!(editor.engine().output_data(i).unwrap()["outData"], json!(42));
}

#[tokio::test]
async fn unknown_component_is_rejected() {
  let mut editor = FlowEditor::new(builtin_registry());
  let err = editor.add_node("No Such Component").await.unwrap_err();
  assert!(matches!(
    err,
    EditorError::Graph(GraphError::UnknownComponent(_))
  ));
}

#[tokio::test]
async fn incompatible_sockets_are_rejected_before_any_pass() {
  let mut editor = FlowEditor::new(builtin_registry());
  let s = editor.add_node("Start").await.unwrap();
  let i = editor.add_node("Identity").await.unwrap();
  let err = editor.connect(s, "outAction", i, "inData").await.unwrap_err();
  assert!(matches!(
    err,
    EditorError::Graph(GraphError::IncompatibleSockets(_, _))
  ));
  assert!(editor.graph().connections().is_empty());
}

#[tokio::test]
async fn occupied_singular_input_is_rejected() {
  let mut editor = FlowEditor::new(builtin_registry());
  let n = editor.add_node("Dummy Number").await.unwrap();
  let a = editor.add_node("Dummy Array").await.unwrap();
  let i = editor.add_node("Identity").await.unwrap();
  editor.connect(n, "outNumber", i, "inData").await.unwrap();
  let err = editor.connect(a, "outArray", i, "inData").await.unwrap_err();
  assert!(matches!(
    err,
    EditorError::Graph(GraphError::InputOccupied { .. })
  ));
}

#[tokio::test]
async fn disconnect_and_remove_retrigger_passes() {
  let mut editor = FlowEditor::new(builtin_registry());
  let n = editor.add_node("Dummy Number").await.unwrap();
  let i = editor.add_node("Identity").await.unwrap();
  editor.connect(n, "outNumber", i, "inData").await.unwrap();
  assert_eq!(editor.engine().output_data(i).unwrap()["outData"], json!(42));

  editor.disconnect(n, "outNumber", i, "inData").await.unwrap();
  assert_eq!(editor.engine().output_data(i).unwrap()["outData"], Value::Null);

  editor.remove_node(i).await.unwrap();
  assert!(editor.engine().output_data(i).is_none());
  assert!(editor.graph().node(i).is_none());
}

#[tokio::test]
async fn explicit_process_reruns_the_graph() {
  // A registry without virtual components, so untriggered nodes settle.
  let mut registry = ComponentRegistry::new();
  registry.register(Arc::new(StartComponent));
  registry.register(Arc::new(DummyNumberComponent));
  registry.register(Arc::new(IdentityComponent));
  let mut editor = FlowEditor::new(Arc::new(registry));

  let n = editor.add_node("Dummy Number").await.unwrap();
  let i = editor.add_node("Identity").await.unwrap();
  editor.connect(n, "outNumber", i, "inData").await.unwrap();

  let outcome = editor.process().await.unwrap();
  assert_eq!(outcome, crate::engine::PassOutcome::Completed);
  assert_eq!(editor.engine().output_data(i).unwrap()["outData"], json!(42));
}

#[test]
fn start_nodes_carry_a_re_run_control() {
  let mut editor = FlowEditor::new(builtin_registry());
  let s = tokio_test::block_on(editor.add_node("Start")).unwrap();
  let node = editor.graph().node(s).unwrap();
  assert_eq!(node.controls["re-run"]["label"], "Re-Run");
}
