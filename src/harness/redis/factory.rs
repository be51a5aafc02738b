use super::RedisConnectionFactory;
use crate::library::communication::implementation::redis::{
    RedisBrokerPublisher, RedisPublisher, RedisQueueProvider,
};
use crate::library::communication::CommunicationFactory;
use crate::library::storage::redis::RedisExpiringStore;

/// Communication factory based on [`RedisConnectionFactory`]
pub struct RedisCommunicationFactory {
    url: String,
}

impl RedisCommunicationFactory {
    /// Creates a new instance which connects to the given URL
    pub fn new(url: String) -> Self {
        Self { url }
    }

    fn factory(&self) -> RedisConnectionFactory {
        RedisConnectionFactory::new(self.url.clone())
    }
}

impl CommunicationFactory for RedisCommunicationFactory {
    type QueueProvider = RedisQueueProvider<RedisConnectionFactory>;
    type NotificationPublisher = RedisPublisher<RedisConnectionFactory>;
    type BrokerPublisher = RedisBrokerPublisher<RedisConnectionFactory>;
    type StatusStore = RedisExpiringStore<RedisConnectionFactory>;

    fn queue_provider(&self) -> Self::QueueProvider {
        Self::QueueProvider::new(self.factory())
    }

    fn notification_publisher(&self) -> Self::NotificationPublisher {
        Self::NotificationPublisher::new(self.factory())
    }

    fn broker_publisher(&self) -> Self::BrokerPublisher {
        Self::BrokerPublisher::new(self.factory())
    }

    fn status_store(&self) -> Self::StatusStore {
        Self::StatusStore::new(self.factory())
    }
}
