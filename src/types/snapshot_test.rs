//! Tests for snapshot derivation and the serializable boundary format.

use crate::types::{Graph, GraphSnapshot, NodeBuilder};

use super::socket::{primary_action_socket, value_socket};

fn sample_graph() -> Graph {
  let mut g = Graph::new();
  let mut start = NodeBuilder::default();
  start.add_output("outAction", primary_action_socket());
  let s = g.add_node("Start", start, vec![], vec![]);

  let mut log = NodeBuilder::default();
  log
    .add_input("inAction", primary_action_socket())
    .add_input("inData", value_socket())
    .add_output("outAction", primary_action_socket());
  let l = g.add_node("Log", log, vec![], vec![]);

  let mut arr = NodeBuilder::default();
  arr.add_output("outArray", value_socket());
  let a = g.add_node("Dummy Array", arr, vec![], vec![]);

  g.connect(s, "outAction", l, "inAction").unwrap();
  g.connect(a, "outArray", l, "inData").unwrap();
  g
}

#[test]
fn snapshot_references_peers_by_node_and_key() {
  let g = sample_graph();
  let snap = g.snapshot();
  assert_eq!(snap.nodes.len(), 3);

  let log = snap.nodes.values().find(|n| n.component == "Log").unwrap();
  let trigger = &log.inputs["inAction"].connections[0];
  assert_eq!(trigger.output, "outAction");
  let data = &log.inputs["inData"].connections[0];
  assert_eq!(data.output, "outArray");
}

#[test]
fn snapshot_serde_round_trip() {
  let snap = sample_graph().snapshot();
  let json = serde_json::to_string(&snap).unwrap();
  let back: GraphSnapshot = serde_json::from_str(&json).unwrap();
  assert_eq!(snap, back);
}

#[test]
fn snapshot_is_detached_from_later_edits() {
  let mut g = sample_graph();
  let snap = g.snapshot();
  let log = snap.nodes.values().find(|n| n.component == "Log").unwrap().id;
  g.remove_node(log).unwrap();
  // The earlier snapshot still holds the removed node and its links.
  assert!(snap.node(log).is_some());
  assert!(g.snapshot().node(log).is_none());
}

#[test]
fn inbound_action_and_source_classification() {
  let g = sample_graph();
  let snap = g.snapshot();
  let log = snap.nodes.values().find(|n| n.component == "Log").unwrap();
  assert!(log.has_inbound_action());
  assert!(!log.is_source());

  let start = snap.nodes.values().find(|n| n.component == "Start").unwrap();
  assert!(!start.has_inbound_action());
  assert!(start.is_source());
}

#[test]
fn virtual_inbound_connection_disqualifies_a_source() {
  let mut g = Graph::new();
  let mut fan = NodeBuilder::default();
  fan.add_output("outElement", value_socket());
  let f = g.add_node("Fan", fan, vec!["outElement".to_string()], vec![]);
  let mut sink = NodeBuilder::default();
  sink.add_input("in", value_socket());
  let s = g.add_node("Sink", sink, vec![], vec![]);
  g.connect(f, "outElement", s, "in").unwrap();

  let snap = g.snapshot();
  assert!(!snap.node(s).unwrap().is_source());
  assert!(!snap.node(s).unwrap().has_inbound_action());
}
