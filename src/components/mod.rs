//! Built-in components: the stock palette of the editor.
//!
//! Each is an ordinary worker with no engine-level complexity; the engine
//! mechanics they lean on (closed outputs, init seeding, virtual fan-out)
//! live in [crate::engine] and [crate::fanout].

mod dummy_array;
mod dummy_number;
mod for_each;
#[cfg(test)]
mod for_each_test;
mod identity;
mod log;
#[cfg(test)]
mod log_test;
mod reverse;
mod start;
#[cfg(test)]
mod start_test;

pub use dummy_array::DummyArrayComponent;
pub use dummy_number::DummyNumberComponent;
pub use for_each::ForEachComponent;
pub use identity::IdentityComponent;
pub use log::{LogComponent, LogSink};
pub use reverse::ReverseComponent;
pub use start::StartComponent;

use std::sync::Arc;

use crate::component::ComponentRegistry;

/// Registers the whole built-in palette on a registry.
pub fn register_builtin(registry: &mut ComponentRegistry) {
  registry.register(Arc::new(StartComponent));
  registry.register(Arc::new(IdentityComponent));
  registry.register(Arc::new(ReverseComponent));
  registry.register(Arc::new(LogComponent::new()));
  registry.register(Arc::new(ForEachComponent));
  registry.register(Arc::new(DummyArrayComponent));
  registry.register(Arc::new(DummyNumberComponent));
}
