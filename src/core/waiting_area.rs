//! # WaitingArea: bounded chairs shared by admissions and barbers.
//!
//! ```text
//! try_admit(c) ──► [ c1 c2 c3 _ _ ] ──► take() ──► Seat { customer, backlog }
//!  (non-blocking)     capacity = N       (suspends while empty and open)
//! ```
//!
//! ## Rules
//! - `try_admit` never blocks: it queues iff `len < capacity`, otherwise reports failure.
//! - `take` suspends until an item is available or the area is closed **and** empty.
//!   Once it returns `None` it returns `None` forever.
//! - `close` is idempotent; items queued before it are still handed out.
//! - `seal` counts the items present at the closing instant. Every item handed out
//!   after sealing carries `backlog = true`; since nothing can be queued after
//!   sealing, exactly `seal()` seats are tagged.
//!
//! Queue state lives behind one mutex; suspended barbers wait on a [`Notify`].

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use super::ids::CustomerId;

/// A customer handed to a barber.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seat {
    /// Customer to serve.
    pub customer: CustomerId,
    /// Retrieved after the area was sealed; its service must be reported on the ready signal.
    pub backlog: bool,
}

struct Chairs {
    queue: VecDeque<CustomerId>,
    sealed: bool,
    closed: bool,
}

/// Bounded FIFO of waiting customers.
pub struct WaitingArea {
    chairs: Mutex<Chairs>,
    capacity: usize,
    notify: Notify,
}

impl WaitingArea {
    /// Creates an empty area with `capacity` chairs (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            chairs: Mutex::new(Chairs {
                queue: VecDeque::with_capacity(capacity),
                sealed: false,
                closed: false,
            }),
            capacity,
            notify: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Chairs> {
        self.chairs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attempts to seat a customer without blocking.
    ///
    /// `on_seated` runs while the area is locked, before any barber can see the
    /// customer; use it to publish the admission so it precedes service events.
    pub fn try_admit_with(&self, customer: CustomerId, on_seated: impl FnOnce()) -> bool {
        {
            let mut chairs = self.lock();
            if chairs.sealed || chairs.closed || chairs.queue.len() >= self.capacity {
                return false;
            }
            on_seated();
            chairs.queue.push_back(customer);
        }
        self.notify.notify_one();
        true
    }

    /// Attempts to seat a customer without blocking.
    pub fn try_admit(&self, customer: CustomerId) -> bool {
        self.try_admit_with(customer, || {})
    }

    /// Hands out the next customer, suspending while the area is open and empty.
    ///
    /// Returns `None` once the area is closed and empty.
    pub async fn take(&self) -> Option<Seat> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut chairs = self.lock();
                if let Some(customer) = chairs.queue.pop_front() {
                    let backlog = chairs.sealed;
                    let more = !chairs.queue.is_empty();
                    drop(chairs);
                    if more {
                        // Pass the wakeup on; this barber is about to be busy.
                        self.notify.notify_one();
                    }
                    return Some(Seat { customer, backlog });
                }
                if chairs.closed {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Marks the closing instant and returns the number of customers waiting.
    ///
    /// After sealing no customer can be seated. Repeated calls return `0`.
    pub fn seal(&self) -> usize {
        let mut chairs = self.lock();
        if chairs.sealed {
            return 0;
        }
        chairs.sealed = true;
        chairs.queue.len()
    }

    /// Closes the area; suspended and future `take` calls drain what is left, then get `None`.
    pub fn close(&self) {
        self.lock().closed = true;
        self.notify.notify_waiters();
    }

    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
