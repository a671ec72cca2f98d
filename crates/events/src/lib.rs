//! Change-notification events and their distribution.
//!
//! The board engine commits moves locally (optimistic update) and then hands a
//! notification to the host through this crate: the host subscribes and turns
//! each committed move into a persistence call. Nothing here stores events —
//! the partition itself is the source of truth.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::InMemoryEventBus;
