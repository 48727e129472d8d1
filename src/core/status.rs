//! # ShopStatus: the single lock that orders admissions against closing.
//!
//! The open/closed phase is never exposed as a raw flag. Callers get two
//! atomic operations instead:
//!
//! ```text
//! admit(area, c):            begin_closing(area):
//!   lock ─┐                    lock ─┐
//!         ├─ phase != Open?          ├─ phase != Open? → None
//!         │    → Rejected            ├─ phase = Closing
//!         ├─ area.try_admit(c)       ├─ backlog = area.seal()
//!         │    → Admitted / Full     └─ Some(backlog)
//!   unlock┘                    unlock┘
//! ```
//!
//! Both run under the same mutex, so an admission is either fully before the
//! closing instant (and counted in the backlog, or already taken by a barber)
//! or fully after it (and rejected with `ShopClosed`).

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::admission::{Admission, RejectReason};
use super::ids::CustomerId;
use super::waiting_area::WaitingArea;

/// Lifecycle phase of a shop. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Accepting customers.
    Open,
    /// Closing started; draining the backlog and sending barbers home.
    Closing,
    /// Every barber went home.
    Closed,
}

pub(crate) struct ShopStatus {
    phase: Mutex<Phase>,
}

impl ShopStatus {
    pub(crate) fn new() -> Self {
        Self {
            phase: Mutex::new(Phase::Open),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Phase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn phase(&self) -> Phase {
        *self.lock()
    }

    /// Check-and-admit. `report` runs inside the critical section with the outcome;
    /// for admitted customers it runs before barbers can see them.
    pub(crate) fn admit(
        &self,
        area: &WaitingArea,
        customer: CustomerId,
        report: impl Fn(Admission),
    ) -> Admission {
        let phase = self.lock();
        if *phase != Phase::Open {
            let outcome = Admission::Rejected(RejectReason::ShopClosed);
            report(outcome);
            return outcome;
        }
        if area.try_admit_with(customer, || report(Admission::Admitted)) {
            return Admission::Admitted;
        }
        let outcome = Admission::Rejected(RejectReason::NoCapacity);
        report(outcome);
        outcome
    }

    /// Check-and-close. Returns the backlog, or `None` if closing already started.
    /// `report` runs inside the critical section with the backlog.
    pub(crate) fn begin_closing(
        &self,
        area: &WaitingArea,
        report: impl FnOnce(usize),
    ) -> Option<usize> {
        let mut phase = self.lock();
        if *phase != Phase::Open {
            return None;
        }
        *phase = Phase::Closing;
        let backlog = area.seal();
        report(backlog);
        Some(backlog)
    }

    /// Marks the shop closed. Only valid after `begin_closing`.
    pub(crate) fn finish(&self) {
        let mut phase = self.lock();
        if *phase == Phase::Closing {
            *phase = Phase::Closed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[test]
    fn test_admit_while_open() {
        let status = ShopStatus::new();
        let area = WaitingArea::new(1);
        let seen = StdMutex::new(Vec::new());

        let a = status.admit(&area, CustomerId(1), |o| seen.lock().unwrap().push(o));
        let b = status.admit(&area, CustomerId(2), |o| seen.lock().unwrap().push(o));

        assert_eq!(a, Admission::Admitted);
        assert_eq!(b, Admission::Rejected(RejectReason::NoCapacity));
        assert_eq!(*seen.lock().unwrap(), vec![a, b]);
    }

    #[test]
    fn test_closing_reports_backlog_once() {
        let status = ShopStatus::new();
        let area = WaitingArea::new(3);
        let _ = status.admit(&area, CustomerId(1), |_| {});
        let _ = status.admit(&area, CustomerId(2), |_| {});

        assert_eq!(status.begin_closing(&area, |_| {}), Some(2));
        assert_eq!(status.phase(), Phase::Closing);
        assert_eq!(status.begin_closing(&area, |_| panic!("not reported twice")), None);
    }

    #[test]
    fn test_rejects_after_closing_even_with_free_chairs() {
        let status = ShopStatus::new();
        let area = WaitingArea::new(5);
        assert_eq!(status.begin_closing(&area, |_| {}), Some(0));

        let outcome = status.admit(&area, CustomerId(1), |_| {});
        assert_eq!(outcome, Admission::Rejected(RejectReason::ShopClosed));
        assert!(area.is_empty());
    }

    #[test]
    fn test_phase_is_monotonic() {
        let status = ShopStatus::new();
        let area = WaitingArea::new(1);
        status.finish();
        assert_eq!(status.phase(), Phase::Open);

        let _ = status.begin_closing(&area, |_| {});
        status.finish();
        assert_eq!(status.phase(), Phase::Closed);
        assert_eq!(status.begin_closing(&area, |_| {}), None);
        assert_eq!(status.phase(), Phase::Closed);
    }
}
