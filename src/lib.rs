//! # barbershop
//!
//! **barbershop** is a coordination engine for the "sleeping barber" problem:
//! a bounded waiting area served by a fixed pool of workers, under random
//! arrivals, with a time-bounded working day and a shutdown that never abandons
//! an admitted customer.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   arrivals::generate ──► spawn per customer ──► Barbershop::admit(id)
//!                                                      │
//!                                     ┌────────────────┴────────────────┐
//!                                     │  status lock (Open/Closing/...) │
//!                                     │   ├─ closed?  → Rejected        │
//!                                     │   └─ try_admit → Admitted/Full  │
//!                                     └────────────────┬────────────────┘
//!                                                      ▼
//!                               ┌────────────────────────────────────────┐
//!                               │ WaitingArea (capacity = chairs)        │
//!                               └──────┬──────────────┬───────────────┬──┘
//!                                      ▼              ▼               ▼
//!                                  Barber 0       Barber 1   ...  Barber N-1
//!                                  take → serve → ServiceFinished → ready?
//!
//! Every step publishes an Event ──► Bus ──► listener ──► SubscriberSet
//!                                                        ├─► LogWriter (tracing)
//!                                                        ├─► Tally
//!                                                        └─► custom Subscribe
//! ```
//!
//! ### Closing
//! ```text
//! close():
//!   a. lock status; phase = Closing; backlog = area.seal(); unlock
//!   b. consume `backlog` ready signals       (every waiting customer served)
//!   c. area.close()                          (idle barbers observe closed+empty)
//!   d. join barbers; phase = Closed; publish ShopClosed
//! ```
//!
//! ## Guarantees
//! - The waiting area never holds more than `capacity` customers.
//! - Each customer gets exactly one [`Admission`]: admitted or rejected.
//! - After closing starts, every admission is `Rejected(ShopClosed)`.
//! - Every admitted customer is served before `ShopClosed`.
//! - Every barber publishes `WorkerTerminated` once the area is closed and empty.
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                    |
//! |-------------------|----------------------------------------------------------|---------------------------------------|
//! | **Core**          | Admission, barbers, draining shutdown.                   | [`Barbershop`], [`Admission`]         |
//! | **Subscriber API**| Observe every event (logging, counters, tests).          | [`Subscribe`], [`LogWriter`], [`Tally`] |
//! | **Services**      | What a barber does with a customer.                      | [`Service`], [`Haircut`], [`ServiceFn`] |
//! | **Simulation**    | Arrivals, working hours, termination signals.            | [`Simulation`]                        |
//! | **Errors**        | Typed runtime errors.                                    | [`RuntimeError`]                      |
//! | **Configuration** | Sizes and delays, YAML loadable.                         | [`Config`], [`DelayRange`]            |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use barbershop::{Config, DelayRange, Simulation, Subscribe, Tally};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config {
//!         operating: Duration::from_millis(50),
//!         service: DelayRange::up_to(Duration::from_millis(5)),
//!         arrival: DelayRange::up_to(Duration::from_millis(5)),
//!         ..Config::default()
//!     };
//!
//!     let tally = Arc::new(Tally::new());
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![tally.clone()];
//!
//!     let report = Simulation::new(cfg)
//!         .with_subscribers(subs)
//!         .without_signals()
//!         .run()
//!         .await?;
//!
//!     let snap = tally.snapshot();
//!     assert_eq!(snap.served, snap.admitted);
//!     assert_eq!(report.closing.workers, 2);
//!     Ok(())
//! }
//! ```
pub mod arrivals;
mod core;
mod delay;
mod error;
mod events;
mod service;
mod simulation;
mod subscribers;

// ---- Public re-exports ----

pub use core::{
    Admission, Barbershop, BarbershopBuilder, ClosingReport, Config, CustomerId, Phase,
    ReadySignal, RejectReason, Seat, WaitingArea, WorkerId,
};
pub use delay::DelayRange;
pub use error::RuntimeError;
pub use events::{Event, EventKind};
pub use service::{Haircut, Service, ServiceFn, ServiceRef};
pub use simulation::{Simulation, SimulationReport};
pub use subscribers::{LogWriter, Subscribe, Tally, TallySnapshot};
