//! # Event bus for runtime events.
//!
//! [`Bus`] is a thin wrapper around an unbounded [`tokio::sync::mpsc`] channel
//! that provides non-blocking event publishing from multiple sources
//! (admissions, barbers, the closing coordinator, subscriber workers) to the
//! shop's single event listener.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                 Consumer (one):
//!   admit()   ──┐
//!   Barber 1  ──┼──────► Bus ───────► event listener ────► SubscriberSet
//!   Barber N  ──┤   (mpsc queue)       (in Barbershop)
//!   close()   ──┘
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never waits; `admit` stays synchronous.
//! - **Total order**: sends are serialized, so the listener sees events in publish order.
//! - **Lossless**: nothing is dropped while the listener is attached; the queue
//!   absorbs bursts and the listener applies backpressure downstream.
//! - **Detached**: once the listener is gone, publishing is a no-op.

use tokio::sync::mpsc;

use super::event::Event;

/// Sending half of the shop's event queue.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately.
/// - **Cloneable**: every publisher holds its own handle.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: mpsc::UnboundedSender<Event>,
}

impl Bus {
    /// Creates a bus and the receiver its listener drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Publishes an event to the listener.
    ///
    /// If the listener has been detached, the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }
}
