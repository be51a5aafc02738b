use super::super::super::EmptyResult;
use super::Notification;
use super::{ConsumerGroupDescriptor, DeliveryMode};
use super::{QueueEntry, QueueProvider, RawQueueEntry};
use async_trait::async_trait;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::any::type_name;
use std::time::Duration;
use tracing::warn;

const DEFAULT_BATCH_SIZE: usize = 10;
const DEFAULT_CONCURRENCY: usize = DEFAULT_BATCH_SIZE;
const DEFAULT_IDLE_TIMEOUT: Option<Duration> = Some(Duration::from_secs(5));

/// Entity which may consume and process [`Notifications`](Notification)
#[async_trait]
pub trait Consumer {
    /// Notification to consume
    type Notification: Notification;

    /// Processes an event notification and returns whether it succeeded or failed
    async fn consume(&self, notification: Self::Notification) -> EmptyResult;
}

/// Helper functions to aid the consumption of messages
#[async_trait]
pub trait ConsumerExt {
    /// Consumes notifications from a queue using the given provider.
    ///
    /// Entries are acknowledged right after they have been read, *before*
    /// parsing and processing. A structurally broken or undeliverable payload
    /// is thus handled exactly once and logged instead of being redelivered
    /// forever.
    async fn consume_queue<Q>(
        &self,
        provider: Q,
        group: &ConsumerGroupDescriptor,
        consumer: &str, // &ConsumerIdentifier
        delivery: DeliveryMode,
    ) -> EmptyResult
    where
        Q: QueueProvider + Send + Sync;
}

#[async_trait]
impl<C> ConsumerExt for C
where
    C: Consumer + Send + Sync,
    C::Notification: DeserializeOwned + Send + Sync,
{
    async fn consume_queue<Q>(
        &self,
        provider: Q,
        group: &ConsumerGroupDescriptor,
        consumer: &str, // &ConsumerIdentifier
        delivery: DeliveryMode,
    ) -> EmptyResult
    where
        Q: QueueProvider + Send + Sync,
    {
        let stream = provider
            .consume(
                C::Notification::queue(),
                group,
                consumer,
                DEFAULT_BATCH_SIZE,
                DEFAULT_IDLE_TIMEOUT,
                delivery,
            )
            .await?;

        stream
            .for_each_concurrent(Some(DEFAULT_CONCURRENCY), |item| async move {
                match item {
                    Ok(mut entry) => {
                        if let Err(e) = entry.acknowledge().await {
                            warn!(
                                "Failed to acknowledge {}: {}",
                                type_name::<C::Notification>(),
                                e
                            )
                        }

                        match entry.parse_payload::<C::Notification>() {
                            Ok(notification) => {
                                if let Err(e) = self.consume(notification).await {
                                    warn!(
                                        "Failed to consume {}: {}",
                                        type_name::<C::Notification>(),
                                        e
                                    )
                                }
                            }
                            Err(e) => warn!(
                                "Failed to deserialize {}: {}",
                                type_name::<C::Notification>(),
                                e
                            ),
                        }
                    }
                    Err(e) => warn!(
                        "Failed to receive notification {}: {}",
                        type_name::<C::Notification>(),
                        e
                    ),
                }
            })
            .await;

        Ok(())
    }
}
