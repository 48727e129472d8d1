//! # Tally – count outcomes and track customers inside the shop
//!
//! Maintains running counters and the set of customers currently **inside**
//! (admitted but not yet finished) by listening to admission and service events.
//!
//! ## Behavior
//! - Duplicate admission → tolerated, warn.
//! - Finish without prior admission → tolerated, warn.
//!
//! ## Internal scheme
//! ```text
//! on_event(ev):
//!   ├─ CustomerAdmitted  => admitted += 1; inside.insert(c)
//!   ├─ CustomerRejected  => rejected_{closed|full} += 1
//!   ├─ ServiceFinished   => served += 1; inside.remove(c)
//!   ├─ ServicePanicked   => panicked += 1
//!   ├─ WorkerTerminated  => workers_home += 1
//!   └─ otherwise: ignore
//!
//! snapshot() -> TallySnapshot  (copy with sorted `inside`)
//! ```

use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::warn;

use crate::core::{CustomerId, RejectReason};
use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Point-in-time copy of a [`Tally`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TallySnapshot {
    pub admitted: u64,
    pub rejected_closed: u64,
    pub rejected_full: u64,
    pub served: u64,
    pub panicked: u64,
    pub workers_home: u64,
    /// Customers admitted but not finished, sorted.
    pub inside: Vec<CustomerId>,
}

impl TallySnapshot {
    /// Total number of customers that received an outcome.
    pub fn arrivals(&self) -> u64 {
        self.admitted + self.rejected_closed + self.rejected_full
    }
}

#[derive(Default)]
struct State {
    admitted: u64,
    rejected_closed: u64,
    rejected_full: u64,
    served: u64,
    panicked: u64,
    workers_home: u64,
    inside: BTreeSet<CustomerId>,
}

/// Counts admissions, rejections and services.
pub struct Tally {
    inner: RwLock<State>,
    capacity: usize,
}

impl Tally {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(State::default()),
            capacity: 4096,
        }
    }

    /// Configure the queue capacity for this subscriber.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn snapshot(&self) -> TallySnapshot {
        let g = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        TallySnapshot {
            admitted: g.admitted,
            rejected_closed: g.rejected_closed,
            rejected_full: g.rejected_full,
            served: g.served,
            panicked: g.panicked,
            workers_home: g.workers_home,
            inside: g.inside.iter().copied().collect(),
        }
    }
}

#[async_trait]
impl Subscribe for Tally {
    async fn on_event(&self, ev: &Event) {
        let mut g = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        match ev.kind {
            EventKind::CustomerAdmitted => {
                g.admitted += 1;
                if let Some(c) = ev.customer {
                    if !g.inside.insert(c) {
                        warn!(customer = c.0, "tally: duplicate admission");
                    }
                }
            }
            EventKind::CustomerRejected => match ev.reason {
                Some(RejectReason::ShopClosed) => g.rejected_closed += 1,
                Some(RejectReason::NoCapacity) => g.rejected_full += 1,
                None => {}
            },
            EventKind::ServiceFinished => {
                g.served += 1;
                if let Some(c) = ev.customer {
                    if !g.inside.remove(&c) {
                        warn!(customer = c.0, "tally: finish without admission");
                    }
                }
            }
            EventKind::ServicePanicked => g.panicked += 1,
            EventKind::WorkerTerminated => g.workers_home += 1,
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "Tally"
    }

    fn queue_capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Tally {
    fn default() -> Self {
        Self::new()
    }
}
