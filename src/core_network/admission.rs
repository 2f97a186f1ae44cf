use log::{info, warn};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-wide count of live sessions.
#[derive(Debug, Default)]
pub struct ConnectionCounter {
    count: RwLock<usize>,
}

impl ConnectionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> usize {
        *self.count.read().await
    }

    pub async fn increment(&self) -> usize {
        let mut count = self.count.write().await;
        *count += 1;
        *count
    }

    pub async fn decrement(&self) -> usize {
        let mut count = self.count.write().await;
        *count = count.saturating_sub(1);
        *count
    }
}

/// Gates new command connections against `max_connections`.
///
/// The check and the increment take the lock separately, so two accepts
/// racing each other may briefly admit one session over the limit.
#[derive(Debug, Clone)]
pub struct AdmissionController {
    counter: Arc<ConnectionCounter>,
    max_connections: usize,
}

impl AdmissionController {
    pub fn new(counter: Arc<ConnectionCounter>, max_connections: usize) -> Self {
        Self {
            counter,
            max_connections,
        }
    }

    pub fn counter(&self) -> &Arc<ConnectionCounter> {
        &self.counter
    }

    /// Registers a new session if there is room for it.
    pub async fn admit(&self) -> bool {
        let live = self.counter.current().await;
        if live >= self.max_connections {
            warn!("Too many connections ({}), refusing", live);
            return false;
        }
        let live = self.counter.increment().await;
        info!("Connections: {}", live);
        true
    }
}
