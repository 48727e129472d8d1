//! Runtime core: the coordination engine.
//!
//! The public API from this module is [`Barbershop`] (admission + closing
//! protocol), its [`BarbershopBuilder`], [`Config`] and the small value types
//! exchanged with callers.
//!
//! Internal modules:
//! - [`waiting_area`]: bounded chairs with non-blocking admission and blocking take;
//! - [`ready`]: counting handshake used to drain the backlog;
//! - [`status`]: the lock ordering admissions against closing;
//! - [`barber`]: one worker loop;
//! - [`shop`]: wiring and the closing protocol;
//! - [`shutdown`]: cross-platform termination signal handling.

mod admission;
mod barber;
mod builder;
mod config;
mod ids;
mod ready;
mod shop;
pub(crate) mod shutdown;
mod status;
mod waiting_area;

pub use admission::{Admission, RejectReason};
pub use builder::BarbershopBuilder;
pub use config::Config;
pub use ids::{CustomerId, WorkerId};
pub use ready::ReadySignal;
pub use shop::{Barbershop, ClosingReport};
pub use status::Phase;
pub use waiting_area::{Seat, WaitingArea};
