//! `partdesk-board` — the partitioned drag-and-drop reordering engine.
//!
//! One UI-framework-agnostic core behind both product boards (the CRM pipeline
//! lanes and the supplier export tiers):
//!
//! - [`registry`] — the flat set of draggable items and their identity
//! - [`partition`] — every item in exactly one named bucket, ordered within it
//! - [`drag`] — the transient per-gesture state machine
//! - [`resolve`] — pure translation of a finished gesture into a move intent
//! - [`project`] — derived per-bucket aggregates (counts, weighted sums,
//!   overflow against host-supplied limits)
//! - [`board`] — glue that owns the pieces, applies resolved intents
//!   atomically, and emits one [`board::MoveCommitted`] per committed move
//!
//! Geometry (which target the pointer is over) is a renderer concern: the host
//! feeds resolved hover targets into [`drag::HoverTarget`]; the engine never
//! guesses.

pub mod board;
pub mod drag;
pub mod partition;
pub mod project;
pub mod registry;
pub mod resolve;

pub use board::{Board, LoadRecord, MoveCommitted};
pub use drag::{DragSession, DragSnapshot, HoverTarget};
pub use partition::{Bucket, PartitionStore};
pub use project::{Aggregate, BucketLimits, project};
pub use registry::{Item, ItemRegistry};
pub use resolve::{MoveIntent, resolve};
