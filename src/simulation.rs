//! # Simulation: a full working day.
//!
//! Wires a [`Barbershop`] to the arrival generator and the closing trigger.
//!
//! ```text
//! Simulation::run()
//!   ├─► Barbershop::builder(cfg).with_subscribers(..).build()
//!   ├─► spawn arrivals::generate(shop, cfg.arrival)
//!   ├─► wait: cfg.operating elapsed  |  termination signal (→ ShutdownRequested)
//!   ├─► shop.close()                 (drain backlog, send barbers home)
//!   ├─► join generator               (stops once the shop is not open)
//!   └─► shop.detach_subscribers()    (every event delivered)
//! ```

use std::sync::Arc;

use tokio::task::JoinError;
use tracing::warn;

use crate::arrivals;
use crate::core::{Barbershop, ClosingReport, Config, shutdown};
use crate::error::RuntimeError;
use crate::events::{Event, EventKind};
use crate::service::ServiceRef;
use crate::subscribers::Subscribe;

/// One configured run of the shop.
pub struct Simulation {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    service: Option<ServiceRef>,
    listen_for_signals: bool,
}

/// Result of a completed simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationReport {
    /// Closing protocol outcome.
    pub closing: ClosingReport,
    /// Customers produced by the arrival generator.
    pub arrivals: u64,
    /// Closing was triggered by a termination signal rather than the timer.
    pub interrupted: bool,
}

impl Simulation {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            service: None,
            listen_for_signals: true,
        }
    }

    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    pub fn with_service(mut self, service: ServiceRef) -> Self {
        self.service = Some(service);
        self
    }

    /// Disables OS signal handling (closing is driven by the timer only).
    pub fn without_signals(mut self) -> Self {
        self.listen_for_signals = false;
        self
    }

    /// Runs the day to completion.
    pub async fn run(self) -> Result<SimulationReport, RuntimeError> {
        let operating = self.cfg.operating;
        let interval = self.cfg.arrival;

        let mut builder = Barbershop::builder(self.cfg).with_subscribers(self.subscribers);
        if let Some(service) = self.service {
            builder = builder.with_service(service);
        }
        let shop = builder.build()?;

        let generator = tokio::spawn(arrivals::generate(Arc::clone(&shop), interval));

        let listen = self.listen_for_signals;
        let signal = async {
            if !listen {
                return std::future::pending::<&'static str>().await;
            }
            match shutdown::wait_for_termination().await {
                Ok(name) => name,
                Err(_) => std::future::pending::<&'static str>().await,
            }
        };

        let interrupted = tokio::select! {
            _ = tokio::time::sleep(operating) => false,
            name = signal => {
                shop.publish(Event::new(EventKind::ShutdownRequested).with_detail(name));
                true
            }
        };

        let closing = shop.close().await;
        let arrivals = arrivals_or_warn(generator.await);
        shop.detach_subscribers().await;

        Ok(SimulationReport {
            closing: closing?,
            arrivals,
            interrupted,
        })
    }
}

/// Unwraps the generator's count; a failed generator is logged and counts as zero.
fn arrivals_or_warn(joined: Result<u64, JoinError>) -> u64 {
    match joined {
        Ok(n) => n,
        Err(err) => {
            warn!(target: "barbershop", error = %err, "arrival generator failed; arrivals unknown");
            0
        }
    }
}
