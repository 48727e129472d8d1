//! # Event subscribers for the barbershop runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and built-in implementations for runtime events published on the bus.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   admit()/Barber/close() ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                                        │
//!                                                         ┌──────────────┼──────────┐
//!                                                         ▼              ▼          ▼
//!                                                     LogWriter        Tally      Custom
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers** - observe and react to events (logging)
//! - **Stateful subscribers** - maintain internal state based on events ([`Tally`])

mod log;
mod set;
mod subscriber;
mod tally;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub(crate) use set::panic_message;
pub use subscriber::Subscribe;
pub use tally::{Tally, TallySnapshot};
