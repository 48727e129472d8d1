//! # Barbershop: admission, barbers, and the draining shutdown.
//!
//! The [`Barbershop`] owns the status lock, the waiting area, the ready signal,
//! the barber tasks and the event bus. Customers enter through
//! [`Barbershop::admit`]; the lifecycle ends with one call to [`Barbershop::close`].
//!
//! ## Lifecycle
//! ```text
//! OPEN ──close()──► CLOSING ─────────────────────────────────────────► CLOSED
//!                     │
//!                     a. under status lock: phase = Closing,
//!                     │  backlog = area.seal(), publish ClosingStarted{backlog}
//!                     b. ready.consume(backlog)      → publish DrainCompleted
//!                     c. area.close()                (idle barbers wake up)
//!                     d. join every barber           (each publishes WorkerTerminated)
//!                        phase = Closed              → publish ShopClosed
//! ```
//!
//! The area is closed **before** barbers are joined: a barber only exits on a
//! closed and empty area, so the reverse order would wait forever.
//!
//! Step a runs in the caller; steps b through d run in a task of their own.
//! Once `close()` has been polled, dropping it only detaches the caller: the
//! shop still reaches `Closed`.
//!
//! ## Event wiring
//! ```text
//! admit()/Barber/close() ── publish ──► Bus ──► listener ──► SubscriberSet::emit
//!                                                  ▲
//!                          detach_subscribers() ───┘ (forward the rest, then stop)
//! ```
//!
//! ## Example
//! ```rust
//! use barbershop::{Admission, Barbershop, Config, CustomerId, ServiceFn, WorkerId};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), barbershop::RuntimeError> {
//!     let cfg = Config { workers: 1, capacity: 1, ..Config::default() };
//!     let shop = Barbershop::builder(cfg)
//!         .with_service(ServiceFn::arc(|_w: WorkerId, _c: CustomerId| async {}))
//!         .build()?;
//!
//!     assert_eq!(shop.admit(CustomerId(1)), Admission::Admitted);
//!     let report = shop.close().await?;
//!     assert_eq!(report.workers, 1);
//!     shop.detach_subscribers().await;
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::SubscriberSet;

use super::{
    admission::Admission,
    builder::BarbershopBuilder,
    config::Config,
    ids::CustomerId,
    ready::ReadySignal,
    status::{Phase, ShopStatus},
    waiting_area::WaitingArea,
};

/// Outcome of a completed [`Barbershop::close`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClosingReport {
    /// Customers waiting at the closing instant (ready signals consumed).
    pub backlog: usize,
    /// Barbers joined.
    pub workers: usize,
}

/// Coordinates admissions, barbers and the closing protocol.
pub struct Barbershop {
    status: ShopStatus,
    area: Arc<WaitingArea>,
    ready: Arc<ReadySignal>,
    bus: Bus,
    workers: Mutex<Option<JoinSet<()>>>,
    listener: Mutex<Option<JoinHandle<()>>>,
    listener_token: CancellationToken,
}

impl Barbershop {
    /// Starts building a shop with the given configuration.
    pub fn builder(cfg: Config) -> BarbershopBuilder {
        BarbershopBuilder::new(cfg)
    }

    pub(super) fn new_internal(
        bus: Bus,
        area: Arc<WaitingArea>,
        ready: Arc<ReadySignal>,
        workers: JoinSet<()>,
        listener: JoinHandle<()>,
        listener_token: CancellationToken,
    ) -> Self {
        Self {
            status: ShopStatus::new(),
            area,
            ready,
            bus,
            workers: Mutex::new(Some(workers)),
            listener: Mutex::new(Some(listener)),
            listener_token,
        }
    }

    /// Decides the fate of one arriving customer.
    ///
    /// Never blocks on barbers: the call only takes the status lock and the
    /// waiting-area lock. The matching `CustomerAdmitted` / `CustomerRejected`
    /// event is published before this returns.
    pub fn admit(&self, customer: CustomerId) -> Admission {
        self.status.admit(&self.area, customer, |outcome| {
            let ev = match outcome {
                Admission::Admitted => Event::new(EventKind::CustomerAdmitted),
                Admission::Rejected(reason) => {
                    Event::new(EventKind::CustomerRejected).with_reason(reason)
                }
            };
            self.bus.publish(ev.with_customer(customer));
        })
    }

    /// Runs the closing protocol: seal the backlog, drain it, close the area, join barbers.
    ///
    /// The closing instant is taken on the first poll; the rest runs in a spawned
    /// task, so the protocol completes even if the returned future is dropped.
    ///
    /// Returns [`RuntimeError::AlreadyClosing`] on a second call and
    /// [`RuntimeError::ClosingAborted`] if the runtime shut down before closing finished.
    pub async fn close(self: &Arc<Self>) -> Result<ClosingReport, RuntimeError> {
        let backlog = self
            .status
            .begin_closing(&self.area, |backlog| {
                self.bus
                    .publish(Event::new(EventKind::ClosingStarted).with_backlog(backlog));
            })
            .ok_or(RuntimeError::AlreadyClosing)?;

        let shop = Arc::clone(self);
        match tokio::spawn(async move { shop.finish_closing(backlog).await }).await {
            Ok(report) => Ok(report),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(RuntimeError::ClosingAborted),
        }
    }

    /// Keeps the shop open for `operating`, then runs [`close`](Self::close).
    pub async fn close_after(
        self: &Arc<Self>,
        operating: Duration,
    ) -> Result<ClosingReport, RuntimeError> {
        tokio::time::sleep(operating).await;
        self.close().await
    }

    async fn finish_closing(&self, backlog: usize) -> ClosingReport {
        self.ready.consume(backlog).await;
        debug_assert_eq!(self.ready.pending(), 0, "ready signals beyond the backlog");
        self.bus
            .publish(Event::new(EventKind::DrainCompleted).with_backlog(backlog));

        self.area.close();

        let workers = self
            .workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let mut joined = 0;
        if let Some(mut set) = workers {
            while let Some(res) = set.join_next().await {
                match res {
                    Ok(()) => joined += 1,
                    Err(err) => {
                        warn!(target: "barbershop", error = %err, "barber task ended abnormally");
                    }
                }
            }
        }

        self.status.finish();
        self.bus.publish(Event::new(EventKind::ShopClosed));

        ClosingReport {
            backlog,
            workers: joined,
        }
    }

    /// Forwards every event published so far to the subscribers, stops the
    /// listener and waits until each subscriber has processed its queue.
    ///
    /// Events published afterwards are not delivered.
    pub async fn detach_subscribers(&self) {
        self.listener_token.cancel();
        let listener = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = listener {
            let _ = handle.await;
        }
    }

    /// Publishes an event on the shop's bus.
    pub(crate) fn publish(&self, ev: Event) {
        self.bus.publish(ev);
    }

    pub fn phase(&self) -> Phase {
        self.status.phase()
    }

    pub fn is_open(&self) -> bool {
        self.phase() == Phase::Open
    }

    /// Customers currently waiting (not yet taken by a barber).
    pub fn waiting(&self) -> usize {
        self.area.len()
    }

    pub fn capacity(&self) -> usize {
        self.area.capacity()
    }
}

/// Forwards bus events to the subscriber set until cancelled, then drains what
/// is already queued and shuts the set down.
pub(super) async fn forward_events(
    mut rx: mpsc::UnboundedReceiver<Event>,
    set: SubscriberSet,
    token: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            msg = rx.recv() => match msg {
                Some(ev) => set.emit(ev).await,
                None => break,
            },
            _ = token.cancelled() => break,
        }
    }

    while let Ok(ev) = rx.try_recv() {
        set.emit(ev).await;
    }
    set.shutdown().await;
}
