//! Tests for the ForEach component. Fan-out behavior over a wired subtree is
//! covered with the engine in `fanout_test`.

use std::sync::Arc;

use serde_json::json;

use crate::component::{Component, ComponentRegistry};
use crate::components::{DummyArrayComponent, ForEachComponent};
use crate::engine::Engine;
use crate::types::{Graph, NodeBuilder, NodeId};

fn add(graph: &mut Graph, registry: &ComponentRegistry, name: &str) -> NodeId {
  let c = registry.get(name).unwrap();
  let mut b = NodeBuilder::default();
  c.builder(&mut b);
  let spec = c.virtual_connections();
  graph.add_node(c.name(), b, spec.outputs, spec.inputs)
}

#[test]
fn declares_out_element_as_virtually_wired() {
  let spec = ForEachComponent.virtual_connections();
  assert_eq!(spec.outputs, vec!["outElement".to_string()]);
  assert!(spec.inputs.is_empty());
}

#[tokio::test]
async fn emits_the_whole_array_after_iterating() {
  let mut registry = ComponentRegistry::new();
  registry.register(Arc::new(DummyArrayComponent));
  registry.register(Arc::new(ForEachComponent));
  let registry = Arc::new(registry);

  let mut g = Graph::new();
  let a = add(&mut g, &registry, "Dummy Array");
  let fe = add(&mut g, &registry, "ForEach");
  g.connect(a, "outArray", fe, "inArray").unwrap();

  let engine = Engine::new(registry);
  engine.process(g.snapshot(), None).await.unwrap();
  assert_eq!(
    engine.output_data(fe).unwrap()["outArray"],
    json!([1, 2, 3, 4, 5, 6, 7])
  );
}

#[tokio::test]
async fn missing_array_input_iterates_zero_times() {
  let mut registry = ComponentRegistry::new();
  registry.register(Arc::new(ForEachComponent));
  let registry = Arc::new(registry);

  let mut g = Graph::new();
  let fe = add(&mut g, &registry, "ForEach");

  let engine = Engine::new(registry);
  engine.process(g.snapshot(), None).await.unwrap();
  assert_eq!(engine.output_data(fe).unwrap()["outArray"], json!([]));
}
