use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    error::RuntimeError,
    events::{Bus, Event, EventKind},
    service::{Haircut, ServiceRef},
    subscribers::{Subscribe, SubscriberSet},
};

use super::{
    barber::Barber,
    config::Config,
    ids::WorkerId,
    ready::ReadySignal,
    shop::{Barbershop, forward_events},
    waiting_area::WaitingArea,
};

/// Builder for constructing a [`Barbershop`].
pub struct BarbershopBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    service: Option<ServiceRef>,
}

impl BarbershopBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            service: None,
        }
    }

    /// Sets event subscribers for observability.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Replaces the default [`Haircut`] service (random duration from `cfg.service`).
    pub fn with_service(mut self, service: ServiceRef) -> Self {
        self.service = Some(service);
        self
    }

    /// Validates the configuration, opens the shop and spawns its barbers.
    ///
    /// Must be called from within a tokio runtime. Publishes `ShopOpened`.
    pub fn build(self) -> Result<Arc<Barbershop>, RuntimeError> {
        self.cfg.validate()?;

        let (bus, rx) = Bus::new();
        let subs = SubscriberSet::new(self.subscribers, bus.clone());
        let listener_token = CancellationToken::new();
        let listener = tokio::spawn(forward_events(rx, subs, listener_token.clone()));

        bus.publish(Event::new(EventKind::ShopOpened).with_detail(format!(
            "workers={} capacity={}",
            self.cfg.workers, self.cfg.capacity
        )));

        let area = Arc::new(WaitingArea::new(self.cfg.capacity));
        let ready = Arc::new(ReadySignal::new());
        let service = self
            .service
            .unwrap_or_else(|| Arc::new(Haircut::new(self.cfg.service)));

        let mut workers = JoinSet::new();
        for id in 0..self.cfg.workers {
            let barber = Barber {
                id: WorkerId(id),
                area: Arc::clone(&area),
                ready: Arc::clone(&ready),
                service: Arc::clone(&service),
                bus: bus.clone(),
            };
            workers.spawn(barber.run());
        }

        Ok(Arc::new(Barbershop::new_internal(
            bus,
            area,
            ready,
            workers,
            listener,
            listener_token,
        )))
    }
}
