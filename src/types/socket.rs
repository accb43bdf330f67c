//! Typed connection points and the socket compatibility relation.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// What a socket carries: data values or control-flow triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketKind {
  Value,
  Action,
}

/// Socket category; `PrimaryFlowControl` marks the main trigger path of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketCategory {
  Default,
  PrimaryFlowControl,
}

/// A typed connection point kind. Two sockets may connect only if their
/// compatibility sets intersect; [Socket::combine] declares mutual
/// compatibility, so the relation is symmetric by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socket {
  pub name: String,
  pub kind: SocketKind,
  pub category: SocketCategory,
  /// Names of sockets this one may connect to, always including itself.
  compatible: BTreeSet<String>,
}

impl Socket {
  pub fn new(name: impl Into<String>, kind: SocketKind, category: SocketCategory) -> Self {
    let name = name.into();
    let mut compatible = BTreeSet::new();
    compatible.insert(name.clone());
    Self {
      name,
      kind,
      category,
      compatible,
    }
  }

  /// Declares `a` and `b` mutually compatible.
  pub fn combine(a: &mut Socket, b: &mut Socket) {
    a.compatible.insert(b.name.clone());
    b.compatible.insert(a.name.clone());
  }

  /// True if the two compatibility sets intersect.
  pub fn is_compatible(&self, other: &Socket) -> bool {
    self.compatible.intersection(&other.compatible).next().is_some()
  }
}

struct BuiltinSockets {
  value: Socket,
  action: Socket,
  primary_action: Socket,
}

fn builtin() -> &'static BuiltinSockets {
  static SOCKETS: OnceLock<BuiltinSockets> = OnceLock::new();
  SOCKETS.get_or_init(|| {
    let value = Socket::new("Value", SocketKind::Value, SocketCategory::Default);
    let mut action = Socket::new("Action", SocketKind::Action, SocketCategory::Default);
    let mut primary_action = Socket::new(
      "Action Primary",
      SocketKind::Action,
      SocketCategory::PrimaryFlowControl,
    );
    Socket::combine(&mut action, &mut primary_action);
    BuiltinSockets {
      value,
      action,
      primary_action,
    }
  })
}

/// The shared data socket.
pub fn value_socket() -> Socket {
  builtin().value.clone()
}

/// The shared control-flow socket.
pub fn action_socket() -> Socket {
  builtin().action.clone()
}

/// The primary-flow-control variant of the action socket; compatible with
/// [action_socket] in both directions.
pub fn primary_action_socket() -> Socket {
  builtin().primary_action.clone()
}
