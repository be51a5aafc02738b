use super::{MockBrokerPublisher, MockNotificationPublisher, MockQueueProvider};
use crate::library::communication::event::Notification;
use crate::library::communication::CommunicationFactory;
use crate::library::storage::memory::InMemoryExpiringStore;
use std::sync::Arc;

pub struct MockCommunicationFactory {
    publisher: Arc<MockNotificationPublisher>,
    broker: Arc<MockBrokerPublisher>,
    store: Arc<InMemoryExpiringStore>,
}

impl CommunicationFactory for MockCommunicationFactory {
    type QueueProvider = MockQueueProvider;
    type NotificationPublisher = Arc<MockNotificationPublisher>;
    type BrokerPublisher = Arc<MockBrokerPublisher>;
    type StatusStore = Arc<InMemoryExpiringStore>;

    fn queue_provider(&self) -> Self::QueueProvider {
        MockQueueProvider {}
    }

    fn notification_publisher(&self) -> Self::NotificationPublisher {
        self.publisher.clone()
    }

    fn broker_publisher(&self) -> Self::BrokerPublisher {
        self.broker.clone()
    }

    fn status_store(&self) -> Self::StatusStore {
        self.store.clone()
    }
}

impl Default for MockCommunicationFactory {
    fn default() -> Self {
        Self {
            publisher: Arc::new(MockNotificationPublisher::default()),
            broker: Arc::new(MockBrokerPublisher::default()),
            store: Arc::new(InMemoryExpiringStore::new()),
        }
    }
}

// Provide shorthands for the publisher / broker methods
impl MockCommunicationFactory {
    pub fn ignoring() -> Self {
        Self {
            publisher: Arc::new(MockNotificationPublisher::ignoring()),
            ..Self::default()
        }
    }

    pub fn expect<N: Notification + Send + Sync>(&self, notification: &N) -> &Self {
        self.publisher.expect(notification);
        self
    }

    pub fn broker(&self) -> &MockBrokerPublisher {
        &self.broker
    }
}
