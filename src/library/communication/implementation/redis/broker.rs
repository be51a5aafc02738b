use super::super::super::broker::BrokerPublisher;
use super::{RedisConnectionVariant, RedisFactory};
use super::{STREAM_BROKER_KEY_FIELD, STREAM_ID_NEW, STREAM_PAYLOAD_KEY};
use crate::library::EmptyResult;
use async_trait::async_trait;
use redis::streams::StreamMaxlen;
use redis::AsyncCommands;

const TOPIC_RETENTION: usize = 10_000;

/// [`BrokerPublisher`] implementation using [`XADD`](https://redis.io/commands/xadd)
///
/// Messages land on a capped stream carrying the partitioning key and the
/// payload as separate fields, mirroring the key/value shape of a keyed
/// broker topic.
#[derive(Clone)]
pub struct RedisBrokerPublisher<F: RedisFactory> {
    factory: F,
}

impl<F> RedisBrokerPublisher<F>
where
    F: RedisFactory,
{
    /// Creates a new instance with a given [`RedisFactory`]
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl<F> BrokerPublisher for RedisBrokerPublisher<F>
where
    F: RedisFactory + Send + Sync,
{
    async fn send(&self, topic: &str, key: &str, payload: &[u8]) -> EmptyResult {
        let mut con = self
            .factory
            .connection(RedisConnectionVariant::Multiplexed)
            .await?;

        con.xadd_maxlen::<_, _, _, _, ()>(
            topic,
            StreamMaxlen::Approx(TOPIC_RETENTION),
            STREAM_ID_NEW,
            &[
                (STREAM_BROKER_KEY_FIELD, key.as_bytes()),
                (STREAM_PAYLOAD_KEY, payload),
            ],
        )
        .await?;

        Ok(())
    }
}
