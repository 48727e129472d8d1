//! Runtime events: types and the bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the shop, its barbers and
//! subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over an unbounded `tokio::sync::mpsc` queue
//!
//! ## Quick reference
//! - **Publishers**: `Barbershop::admit`, `Barbershop::close`, `Barber::run`,
//!   `SubscriberSet` workers (overflow/panic), `Simulation` (shutdown requests).
//! - **Consumer**: the shop's event listener, which fans out to `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
