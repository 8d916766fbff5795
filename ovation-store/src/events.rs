use ovation_shared::DomainEvent;
use tokio::sync::broadcast;

/// In-process fan-out for domain events.
///
/// Publishing never blocks and never fails: with no subscribers (or only
/// lagged ones) the event is simply dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: DomainEvent) {
        tracing::debug!(?event, "publishing domain event");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}
