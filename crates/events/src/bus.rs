//! Event publishing/subscription abstraction (mechanics only).
//!
//! This module provides the pub/sub seam between the board engine and the host:
//! after every committed move the engine publishes one notification, and the
//! host's persistence layer consumes it (e.g. turns a status change into a
//! PATCH request).
//!
//! The bus is intentionally lightweight:
//!
//! - **Transport-agnostic**: works with in-memory channels or anything the host
//!   wires up behind the trait.
//! - **Broadcast semantics**: every subscriber gets a copy of every message.
//! - **No persistence**: the bus distributes notifications; the partition is
//!   the source of truth. A missed notification can always be reconstructed by
//!   reading the current partition.
//!
//! Consumers should be idempotent: re-applying a committed move notification
//! to the backend must be safe (the target state is absolute, not a delta).

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to a stream of published messages.
///
/// Each subscription receives a copy of every message published after it was
/// created. Subscriptions are designed for single-threaded consumption; the
/// host's persistence worker typically drains one in a loop.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// `publish()` can fail (e.g. a poisoned internal lock); failures are surfaced
/// to the caller. Since the local partition has already committed by the time
/// the engine publishes, the caller may re-publish or re-derive the
/// notification from current state.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
