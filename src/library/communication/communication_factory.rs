use super::broker::BrokerPublisher;
use super::event::{NotificationPublisher, QueueProvider};
use crate::library::storage::ExpiringStore;

/// Factory to provide implementations for the traits from this module
pub trait CommunicationFactory {
    /// [`QueueProvider`] implementation type
    type QueueProvider: QueueProvider + Send + Sync;
    /// [`NotificationPublisher`] implementation type
    type NotificationPublisher: NotificationPublisher + Send + Sync;
    /// [`BrokerPublisher`] implementation type
    type BrokerPublisher: BrokerPublisher + Send + Sync;
    /// [`ExpiringStore`] implementation type used for instance status records
    type StatusStore: ExpiringStore + Send + Sync;

    /// Instantiates a new [`QueueProvider`]
    fn queue_provider(&self) -> Self::QueueProvider;
    /// Instantiates a new [`NotificationPublisher`]
    fn notification_publisher(&self) -> Self::NotificationPublisher;
    /// Instantiates a new [`BrokerPublisher`]
    fn broker_publisher(&self) -> Self::BrokerPublisher;
    /// Instantiates a new [`ExpiringStore`] for status records
    fn status_store(&self) -> Self::StatusStore;
}
