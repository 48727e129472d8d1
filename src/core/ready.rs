//! # ReadySignal: counting handshake between barbers and the closing coordinator.
//!
//! A barber calls [`ReadySignal::signal`] after serving a backlog seat; the
//! coordinator calls [`ReadySignal::consume`] with the backlog size and resumes
//! once that many signals have arrived. Backed by a [`Semaphore`] that starts
//! with zero permits.

use tokio::sync::Semaphore;

pub struct ReadySignal {
    permits: Semaphore,
}

impl ReadySignal {
    pub fn new() -> Self {
        Self {
            permits: Semaphore::new(0),
        }
    }

    /// Announces one completed backlog service.
    pub fn signal(&self) {
        self.permits.add_permits(1);
    }

    /// Waits for exactly `n` signals and consumes them.
    pub async fn consume(&self, n: usize) {
        for _ in 0..n {
            // The semaphore is private and never closed, so acquire cannot fail.
            if let Ok(permit) = self.permits.acquire().await {
                permit.forget();
            }
        }
    }

    /// Signals received but not yet consumed.
    pub fn pending(&self) -> usize {
        self.permits.available_permits()
    }
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::new()
    }
}
