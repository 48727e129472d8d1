//! # Service abstraction: what a barber does with a customer.
//!
//! A barber calls [`Service::serve`] once per seat. The runtime does not care how
//! long it takes or what it does; it only needs the future to complete.
//!
//! - [`Haircut`]: sleeps for a random duration drawn from a [`DelayRange`].
//! - [`ServiceFn`]: wraps a closure producing a fresh future per customer.
//!
//! The common handle type is [`ServiceRef`], an `Arc<dyn Service>` shared by all barbers.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{CustomerId, WorkerId};
use crate::delay::DelayRange;

/// Shared handle to a service.
pub type ServiceRef = Arc<dyn Service>;

/// # Asynchronous unit of work performed by a barber.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use barbershop::{CustomerId, Service, WorkerId};
///
/// struct Shave;
///
/// #[async_trait]
/// impl Service for Shave {
///     async fn serve(&self, _worker: WorkerId, _customer: CustomerId) {
///         tokio::time::sleep(std::time::Duration::from_millis(5)).await;
///     }
/// }
/// ```
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Serves one customer. Panics are caught by the barber and reported.
    async fn serve(&self, worker: WorkerId, customer: CustomerId);
}

/// Random-duration service.
#[derive(Clone, Copy, Debug)]
pub struct Haircut {
    duration: DelayRange,
}

impl Haircut {
    pub fn new(duration: DelayRange) -> Self {
        Self { duration }
    }
}

#[async_trait]
impl Service for Haircut {
    async fn serve(&self, _worker: WorkerId, _customer: CustomerId) {
        tokio::time::sleep(self.duration.sample()).await;
    }
}

/// Function-backed service.
///
/// ## Example
/// ```rust
/// use barbershop::{CustomerId, ServiceFn, ServiceRef, WorkerId};
///
/// let s: ServiceRef = ServiceFn::arc(|_w: WorkerId, _c: CustomerId| async {});
/// ```
pub struct ServiceFn<F> {
    f: F,
}

impl<F> ServiceFn<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the service and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Service for ServiceFn<F>
where
    F: Fn(WorkerId, CustomerId) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn serve(&self, worker: WorkerId, customer: CustomerId) {
        (self.f)(worker, customer).await
    }
}
