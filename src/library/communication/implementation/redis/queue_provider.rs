use super::super::super::super::BoxedError;
use super::super::super::event::{
    ConsumerGroupDescriptor, DeliveryMode, QueueDescriptor, QueueLocation, QueueProvider,
};
use super::{
    RedisConnectionVariant, RedisFactory, RedisQueueEntry, STREAM_ID_ADDITIONS, STREAM_ID_HEAD,
    STREAM_ID_TAIL,
};
use crate::library::EmptyResult;
use async_trait::async_trait;
use futures::{
    stream::{self, BoxStream},
    StreamExt,
};
use redis::aio::ConnectionLike;
use redis::streams::StreamId;
use redis::streams::StreamReadOptions;
use redis::streams::StreamReadReply;
use redis::AsyncCommands;
use redis::RedisResult;
use std::convert::TryInto;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

const READ_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Queue provider implementation using [Redis Streams](https://redis.io/topics/streams-intro)
pub struct RedisQueueProvider<F: RedisFactory + Send + Sync> {
    factory: F,
}

impl<F: RedisFactory + Send + Sync> RedisQueueProvider<F> {
    /// Creates a new instance with a given [`RedisFactory`]
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl<F> QueueProvider for RedisQueueProvider<F>
where
    F: RedisFactory + Clone + Send + Sync + 'static,
{
    type Entry = RedisQueueEntry<F::Connection>;

    /// Consumes a redis stream data structure using the following steps:
    ///
    /// 1. Create the stream and/or consumer group if it does not exist
    /// 2. Wait for and stream new entries in a blocking manner, bounded per
    ///    cycle by `idle_timeout` (or indefinitely when it is absent)
    /// 3. Treat read errors as an empty cycle so the poll loop keeps running
    async fn consume(
        &self,
        queue: QueueDescriptor,
        group: &ConsumerGroupDescriptor,
        consumer: &str, // &ConsumerIdentifier
        batch_size: usize,
        idle_timeout: Option<Duration>,
        delivery: DeliveryMode,
    ) -> Result<BoxStream<'static, Result<Self::Entry, BoxedError>>, BoxedError> {
        let key = queue.key().to_owned();

        // Create a redis connection for the blocking XREADGROUP command
        let mut con = self
            .factory
            .connection(RedisConnectionVariant::Owned)
            .await?;

        // Create the group if it does not exist
        create_consumer_group(&mut con, &key, group).await?;

        // Create the options for reading from the stream
        let block_duration = idle_timeout
            .map(|d| d.as_millis().try_into().unwrap_or_default())
            .unwrap_or_default();

        let mut read_options = StreamReadOptions::default()
            .group(group.name(), consumer)
            .count(batch_size)
            .block(block_duration);

        if delivery == DeliveryMode::AutoAck {
            read_options = read_options.noack();
        }

        // Create a consumer for reading from the stream
        let entry_stream = xread_stream(con, read_options, key.clone());

        // Create an auxiliary stream that infinitely creates handles to a shared redis connection
        // It will be used to associate a connection with the QueueItems in order to acknowledge them
        let ack_con_stream = shared_redis_stream(self.factory.clone());

        // Combine the two streams and assemble the QueueItem from all the parts
        let requires_ack = delivery == DeliveryMode::Explicit;
        let stream = entry_stream
            .zip(ack_con_stream)
            .map(build_redis_queue_entry(key, group, requires_ack))
            .boxed();

        Ok(stream)
    }
}

fn build_redis_queue_entry<C>(
    key: String,
    group: &ConsumerGroupDescriptor,
    requires_ack: bool,
) -> impl Fn(
    (RedisResult<StreamId>, Result<C, BoxedError>),
) -> Result<RedisQueueEntry<C>, BoxedError>
where
    C: ConnectionLike + Send + Sync,
{
    let group = group.name().to_owned();

    move |(entry, con)| {
        let entry = entry?;
        let ack_con = con?;
        let entry = RedisQueueEntry::new(ack_con, entry, key.clone(), group.clone(), requires_ack)?;

        Ok(entry)
    }
}

/// Creates the consumer group starting at the configured queue location
///
/// A group that already exists (`BUSYGROUP`) is fine. Every other failure is
/// swallowed with a warning so the instance still comes up with a possibly
/// degraded control plane, unless the descriptor demands strict bootstrap
/// semantics in which case the error is escalated to the caller.
async fn create_consumer_group<C: ConnectionLike + Send>(
    con: &mut C,
    key: &str,
    group: &ConsumerGroupDescriptor,
) -> EmptyResult {
    let start_id = match group.start() {
        QueueLocation::Head => STREAM_ID_HEAD,
        QueueLocation::Tail => STREAM_ID_TAIL,
    };

    match con
        .xgroup_create_mkstream::<_, _, _, ()>(key, group.name(), start_id)
        .await
    {
        Ok(_) => Ok(()),
        Err(e) if e.code() == Some("BUSYGROUP") => Ok(()),
        Err(e) if group.strict() => {
            error!(
                "Failed to create consumer group {} on {}: {}",
                group.name(),
                key,
                e
            );
            Err(e.into())
        }
        Err(e) => {
            warn!(
                "Failed to create consumer group {} on {}, continuing without it: {}",
                group.name(),
                key,
                e
            );
            Ok(())
        }
    }
}

fn shared_redis_stream<F>(factory: F) -> BoxStream<'static, Result<F::Connection, BoxedError>>
where
    F: RedisFactory + Send + Sync + 'static,
{
    stream::unfold(factory, |factory| async move {
        let con = factory
            .connection(RedisConnectionVariant::Multiplexed)
            .await;

        Some((con, factory))
    })
    .boxed()
}

fn xread_stream<C: ConnectionLike + Send + Sync + 'static>(
    con: C,
    options: StreamReadOptions,
    key: String,
) -> BoxStream<'static, RedisResult<StreamId>> {
    let stream = stream::unfold((con, options, key), move |(mut con, options, key)| {
        async move {
            let result = con
                .xread_options::<_, _, StreamReadReply>(&[&key], &[STREAM_ID_ADDITIONS], &options)
                .await;

            let batch = match result {
                Ok(mut reply) => reply
                    .keys
                    .pop()
                    .map(|stream| stream.ids)
                    .unwrap_or_default(),
                Err(error) => {
                    // A failed poll becomes an empty cycle; the loop that owns
                    // this stream simply retries on its next tick.
                    warn!("Encountered error reading from redis stream: {}", error);
                    sleep(READ_ERROR_BACKOFF).await;
                    Vec::new()
                }
            };

            Some((batch, (con, options, key)))
        }
    });

    // It is possible to stream in batches (receiving multiple entries from the redis)
    // by setting the options.count value >1. The resulting stream will still yield
    // one at a time to make it easier to use.
    stream
        .flat_map(|batch| stream::iter(batch).map(Ok).boxed())
        .boxed()
}
