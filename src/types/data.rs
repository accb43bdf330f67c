//! Value model shared by workers and the engine.
//!
//! Node data is untyped JSON; sockets carry the type discipline.

use std::collections::HashMap;

/// A single value travelling along a connection.
pub type Data = serde_json::Value;

/// Gathered worker input: every delivery per input key, in connection order.
/// Unconnected inputs resolve to an empty sequence.
pub type InputData = HashMap<String, Vec<Data>>;

/// Output values a worker produced for a pass, keyed by output key.
pub type OutputData = HashMap<String, Data>;
