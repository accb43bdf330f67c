//! Tests for the Log component.

use std::sync::Arc;

use serde_json::json;

use crate::component::{Component, ComponentRegistry};
use crate::components::{DummyArrayComponent, LogComponent, LogSink, StartComponent};
use crate::engine::Engine;
use crate::types::{Graph, NodeBuilder, NodeId};

fn add(graph: &mut Graph, registry: &ComponentRegistry, name: &str) -> NodeId {
  let c = registry.get(name).unwrap();
  let mut b = NodeBuilder::default();
  c.builder(&mut b);
  graph.add_node(c.name(), b, vec![], vec![])
}

#[test]
fn named_variants_register_separately() {
  assert_eq!(LogComponent::new().name(), "Log");
  assert_eq!(LogComponent::with_name("Log2").name(), "Log2");
}

#[tokio::test]
async fn records_deliveries_when_triggered() {
  let sink: LogSink = Arc::default();
  let mut registry = ComponentRegistry::new();
  registry.register(Arc::new(StartComponent));
  registry.register(Arc::new(DummyArrayComponent));
  registry.register(Arc::new(LogComponent::new().with_sink(sink.clone())));
  let registry = Arc::new(registry);

  let mut g = Graph::new();
  let s = add(&mut g, &registry, "Start");
  let a = add(&mut g, &registry, "Dummy Array");
  let l = add(&mut g, &registry, "Log");
  g.connect(s, "outAction", l, "inAction").unwrap();
  g.connect(a, "outArray", l, "inData").unwrap();

  let engine = Engine::new(registry);
  engine.process(g.snapshot(), None).await.unwrap();
  assert_eq!(*sink.lock().unwrap(), vec![json!([1, 2, 3, 4, 5, 6, 7])]);
}
