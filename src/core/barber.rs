//! # Barber: one worker loop.
//!
//! ```text
//! loop {
//!   ├─► area.take()                      (suspends while open and empty)
//!   │     └─ None ──► publish WorkerTerminated, exit
//!   ├─► publish ServiceStarted{worker, customer}
//!   ├─► service.serve(worker, customer)  (panic caught → ServicePanicked)
//!   ├─► publish ServiceFinished{worker, customer}
//!   └─► seat.backlog? ──► ready.signal()
//! }
//! ```
//!
//! ## Rules
//! - A barber never fails: the only exit is a closed and empty waiting area.
//! - A panicking service still counts as served, so the drain can complete.

use std::sync::Arc;

use futures::FutureExt;

use crate::events::{Bus, Event, EventKind};
use crate::service::ServiceRef;
use crate::subscribers::panic_message;

use super::{ids::WorkerId, ready::ReadySignal, waiting_area::WaitingArea};

pub(crate) struct Barber {
    pub id: WorkerId,
    pub area: Arc<WaitingArea>,
    pub ready: Arc<ReadySignal>,
    pub service: ServiceRef,
    pub bus: Bus,
}

impl Barber {
    /// Runs until the waiting area is closed and empty.
    pub async fn run(self) {
        while let Some(seat) = self.area.take().await {
            let customer = seat.customer;
            self.bus.publish(
                Event::new(EventKind::ServiceStarted)
                    .with_worker(self.id)
                    .with_customer(customer),
            );

            let fut = self.service.serve(self.id, customer);
            if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                self.bus.publish(
                    Event::new(EventKind::ServicePanicked)
                        .with_worker(self.id)
                        .with_customer(customer)
                        .with_detail(panic_message(&*panic_err)),
                );
            }

            self.bus.publish(
                Event::new(EventKind::ServiceFinished)
                    .with_worker(self.id)
                    .with_customer(customer),
            );
            if seat.backlog {
                self.ready.signal();
            }
        }

        self.bus
            .publish(Event::new(EventKind::WorkerTerminated).with_worker(self.id));
    }
}
