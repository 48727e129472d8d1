//! # LogWriter: structured event logger
//!
//! A subscriber that renders incoming [`Event`]s through `tracing`.
//! Install a `tracing` subscriber (e.g. `tracing_subscriber::fmt`) to see output.
//!
//! ## Example output (fmt layer)
//! ```text
//! INFO barbershop: shop opened detail="workers=2 capacity=5"
//! INFO barbershop: customer waiting customer=3
//! INFO barbershop: customer left reason=no_capacity customer=4
//! INFO barbershop: cutting hair worker=0 customer=3
//! INFO barbershop: finished worker=0 customer=3
//! INFO barbershop: closing backlog=2
//! INFO barbershop: going home worker=1
//! INFO barbershop: shop closed
//! ```

use async_trait::async_trait;
use tracing::{info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let customer = e.customer.map(|c| c.0);
        let worker = e.worker.map(|w| w.0);
        let detail = e.detail.as_deref().unwrap_or("");

        match e.kind {
            EventKind::ShopOpened => info!(target: "barbershop", detail, "shop opened"),
            EventKind::CustomerAdmitted => {
                info!(target: "barbershop", ?customer, "customer waiting")
            }
            EventKind::CustomerRejected => {
                let reason = e.reason.map(|r| r.as_label()).unwrap_or("unknown");
                info!(target: "barbershop", reason, ?customer, "customer left")
            }
            EventKind::ServiceStarted => {
                info!(target: "barbershop", ?worker, ?customer, "cutting hair")
            }
            EventKind::ServiceFinished => {
                info!(target: "barbershop", ?worker, ?customer, "finished")
            }
            EventKind::ServicePanicked => {
                warn!(target: "barbershop", ?worker, ?customer, detail, "service panicked")
            }
            EventKind::WorkerTerminated => info!(target: "barbershop", ?worker, "going home"),
            EventKind::ClosingStarted => {
                info!(target: "barbershop", backlog = ?e.backlog, "closing")
            }
            EventKind::DrainCompleted => {
                info!(target: "barbershop", backlog = ?e.backlog, "backlog served")
            }
            EventKind::ShopClosed => info!(target: "barbershop", "shop closed"),
            EventKind::ShutdownRequested => {
                warn!(target: "barbershop", "termination signal; closing early")
            }
            EventKind::SubscriberOverflow => warn!(target: "barbershop", detail, "subscriber overflow"),
            EventKind::SubscriberPanicked => warn!(target: "barbershop", detail, "subscriber panicked"),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
