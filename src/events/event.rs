//! # Runtime events emitted by the shop, its barbers and subscriber workers.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Admission events**: one per arriving customer (admitted or rejected)
//! - **Service events**: barber activity (started, finished, panicked, terminated)
//! - **Lifecycle events**: opening, closing, drain, closed
//! - **Subscriber events**: overflow and panic reports from the fan-out layer
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! customer and barber involved, the rejection reason and the closing backlog.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Within one shop, events are published in the order implied by the protocol:
//! `CustomerAdmitted(c)` precedes `ServiceStarted(_, c)`, every `WorkerTerminated`
//! precedes `ShopClosed`.
//!
//! ## Example
//! ```rust
//! use barbershop::{CustomerId, Event, EventKind, RejectReason};
//!
//! let ev = Event::new(EventKind::CustomerRejected)
//!     .with_customer(CustomerId(7))
//!     .with_reason(RejectReason::NoCapacity);
//!
//! assert_eq!(ev.kind, EventKind::CustomerRejected);
//! assert_eq!(ev.customer, Some(CustomerId(7)));
//! assert_eq!(ev.reason, Some(RejectReason::NoCapacity));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::core::{CustomerId, RejectReason, WorkerId};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Lifecycle events ===
    /// Shop opened; barbers spawned.
    ///
    /// Sets:
    /// - `detail`: "workers=N capacity=M"
    ShopOpened,

    /// Closing started; no further admissions.
    ///
    /// Sets:
    /// - `backlog`: customers waiting at the closing instant
    ClosingStarted,

    /// Every backlog customer has been served.
    ///
    /// Sets:
    /// - `backlog`: number of ready signals consumed
    DrainCompleted,

    /// All barbers went home; terminal event of a shop.
    ShopClosed,

    /// OS termination signal observed; closing is triggered early.
    ShutdownRequested,

    // === Admission events ===
    /// Customer took a chair.
    ///
    /// Sets:
    /// - `customer`
    CustomerAdmitted,

    /// Customer left without service.
    ///
    /// Sets:
    /// - `customer`
    /// - `reason`: [`RejectReason`]
    CustomerRejected,

    // === Service events ===
    /// Barber started serving a customer.
    ///
    /// Sets:
    /// - `worker`, `customer`
    ServiceStarted,

    /// Barber finished serving a customer.
    ///
    /// Sets:
    /// - `worker`, `customer`
    ServiceFinished,

    /// The service future panicked; the customer is considered served.
    ///
    /// Sets:
    /// - `worker`, `customer`
    /// - `detail`: panic message
    ServicePanicked,

    /// Barber observed a closed and empty waiting area and exited.
    ///
    /// Sets:
    /// - `worker`
    WorkerTerminated,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `detail`: "subscriber=<name> info=<panic>"
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `detail`: "subscriber=<name> reason=<full|closed>"
    SubscriberOverflow,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Customer involved, if any.
    pub customer: Option<CustomerId>,
    /// Barber involved, if any.
    pub worker: Option<WorkerId>,
    /// Rejection reason (only for `CustomerRejected`).
    pub reason: Option<RejectReason>,
    /// Closing backlog (only for `ClosingStarted` / `DrainCompleted`).
    pub backlog: Option<usize>,
    /// Free-form details (panic info, overflow reason, sizes).
    pub detail: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            customer: None,
            worker: None,
            reason: None,
            backlog: None,
            detail: None,
        }
    }

    #[inline]
    pub fn with_customer(mut self, customer: CustomerId) -> Self {
        self.customer = Some(customer);
        self
    }

    #[inline]
    pub fn with_worker(mut self, worker: WorkerId) -> Self {
        self.worker = Some(worker);
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: RejectReason) -> Self {
        self.reason = Some(reason);
        self
    }

    #[inline]
    pub fn with_backlog(mut self, backlog: usize) -> Self {
        self.backlog = Some(backlog);
        self
    }

    /// Attaches a human-readable detail string.
    #[inline]
    pub fn with_detail(mut self, detail: impl Into<Arc<str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_detail(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_detail(format!("subscriber={subscriber} info={info}"))
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}
