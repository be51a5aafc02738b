use super::super::super::super::BoxedError;
use super::super::super::event::{LogEntryId, QueueDescriptor, RawNotificationPublisher};
use super::super::json::JsonNotificationPublisher;
use super::{RedisConnectionVariant, RedisFactory};
use super::{STREAM_ID_NEW, STREAM_PAYLOAD_KEY};
use async_trait::async_trait;
use redis::streams::StreamMaxlen;
use redis::AsyncCommands;

/// [`NotificationPublisher`](super::super::super::event::NotificationPublisher) implementation
/// using [Redis Streams](https://redis.io/topics/streams-intro)
///
/// Publishing first issues an [`XTRIM`](https://redis.io/commands/xtrim) that
/// shrinks the stream to one entry less than the queue limit and then appends
/// the new entry with [`XADD`](https://redis.io/commands/xadd). For a queue
/// with a limit of one this means slow readers only ever observe the most
/// recent notification, never a backlog.
#[derive(Clone)]
pub struct RedisPublisher<F: RedisFactory> {
    factory: F,
}

impl<F> RedisPublisher<F>
where
    F: RedisFactory,
{
    /// Creates a new instance with a given [`RedisFactory`]
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F> JsonNotificationPublisher for RedisPublisher<F> where F: RedisFactory + Send + Sync {}

#[async_trait]
impl<F> RawNotificationPublisher for RedisPublisher<F>
where
    F: RedisFactory + Send + Sync,
{
    async fn publish_raw(
        &self,
        data: &[u8],
        descriptor: QueueDescriptor,
    ) -> Result<LogEntryId, BoxedError> {
        let retained = descriptor.limit().saturating_sub(1);
        let key = descriptor.key().to_owned();

        let mut con = self
            .factory
            .connection(RedisConnectionVariant::Multiplexed)
            .await?;

        // Eviction has to complete before the append; the two commands are
        // deliberately not pipelined so a crash in between leaves the stream
        // empty rather than over-full.
        con.xtrim::<_, usize>(&key, StreamMaxlen::Equals(retained))
            .await?;

        let id = con
            .xadd::<_, _, _, _, String>(&key, STREAM_ID_NEW, &[(STREAM_PAYLOAD_KEY, data)])
            .await?;

        Ok(id)
    }
}
