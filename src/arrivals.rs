//! # Arrival generator.
//!
//! Produces customers with increasing ids at random intervals and hands each one
//! to its own short-lived task, which calls [`Barbershop::admit`] and ends. The
//! generator stops once the shop is no longer open.
//!
//! ```text
//! loop {
//!   ├─► sleep(interval.sample())
//!   ├─► shop not open? ──► stop
//!   ├─► spawn(admit(next_id))        (nobody waits on the outcome)
//!   └─► reap finished arrival tasks
//! }
//! join the stragglers, so every outcome is published before returning
//! ```

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::core::{Barbershop, CustomerId};
use crate::delay::DelayRange;

/// Generates arrivals until the shop starts closing; returns how many were spawned.
pub async fn generate(shop: Arc<Barbershop>, interval: DelayRange) -> u64 {
    let mut next: u64 = 1;
    let mut customers = JoinSet::new();
    loop {
        tokio::time::sleep(interval.sample()).await;
        if !shop.is_open() {
            break;
        }

        let shop = Arc::clone(&shop);
        let customer = CustomerId(next);
        customers.spawn(async move {
            let _ = shop.admit(customer);
        });
        next += 1;

        while customers.try_join_next().is_some() {}
    }
    while customers.join_next().await.is_some() {}
    next - 1
}
