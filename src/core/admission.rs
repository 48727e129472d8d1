//! # Admission outcomes
//!
//! Every arriving customer gets exactly **one** terminal outcome from
//! [`Barbershop::admit`](crate::Barbershop::admit):
//!
//! - `Admitted`: the customer took a chair and will be served.
//! - `Rejected(ShopClosed)`: closing had already started.
//! - `Rejected(NoCapacity)`: every chair was taken.
//!
//! Rejections are expected results, not errors.

use std::fmt;

/// Why a customer was turned away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// The shop was closing or closed when the customer arrived.
    ShopClosed,
    /// The waiting area was full.
    NoCapacity,
}

impl RejectReason {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RejectReason::ShopClosed => "shop_closed",
            RejectReason::NoCapacity => "no_capacity",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Result of one admission attempt.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Admission {
    /// Customer is waiting for a barber.
    Admitted,
    /// Customer left immediately.
    Rejected(RejectReason),
}

impl Admission {
    #[inline]
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}
