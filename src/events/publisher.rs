use serde_json::Value;
use tokio::sync::broadcast;

/// Broadcast publisher for workflow lifecycle events
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
}

/// Event that has been published
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub name: String,
    /// Human-readable confirmation a UI would show
    pub message: String,
    pub context: Value,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event with the given name, message and context
    pub fn publish(&self, event_name: impl Into<String>, message: impl Into<String>, context: Value) {
        let event = PublishedEvent {
            name: event_name.into(),
            message: message.into(),
            context,
            published_at: chrono::Utc::now(),
        };

        tracing::debug!(event = %event.name, message = %event.message, "Publishing event");

        // No subscribers is fine; events are fire-and-forget
        let _ = self.sender.send(event);
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(crate::constants::system::EVENT_CHANNEL_CAPACITY)
    }
}
