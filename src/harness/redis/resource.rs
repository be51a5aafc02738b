use crate::library::communication::implementation::redis::{
    RedisConnectionVariant, RedisFactory,
};
use crate::library::BoxedError;
use async_trait::async_trait;
use futures::lock::Mutex;
use lazy_static::lazy_static;
use redis::aio::{Connection, ConnectionLike, MultiplexedConnection};
use redis::{Client, Cmd, Pipeline, RedisFuture, Value};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(4);

lazy_static! {
    static ref SHARED_CONNECTION: Mutex<Option<MultiplexedConnection>> = Mutex::new(None);
}

#[derive(Debug, Error)]
enum RedisResourceError {
    #[error("timed out connecting to redis")]
    ConnectTimeout,
}

/// Connection handed out by the [`RedisConnectionFactory`]
///
/// Owned connections permit blocking commands, shared ones are clones of a
/// process-wide multiplexed connection.
pub enum RedisResource {
    /// Dedicated connection, suitable for blocking commands
    Owned(Connection),
    /// Handle on the process-wide multiplexed connection
    Shared(MultiplexedConnection),
}

impl ConnectionLike for RedisResource {
    fn req_packed_command<'a>(&'a mut self, cmd: &'a Cmd) -> RedisFuture<'a, Value> {
        match self {
            RedisResource::Owned(con) => con.req_packed_command(cmd),
            RedisResource::Shared(con) => con.req_packed_command(cmd),
        }
    }

    fn req_packed_commands<'a>(
        &'a mut self,
        cmd: &'a Pipeline,
        offset: usize,
        count: usize,
    ) -> RedisFuture<'a, Vec<Value>> {
        match self {
            RedisResource::Owned(con) => con.req_packed_commands(cmd, offset, count),
            RedisResource::Shared(con) => con.req_packed_commands(cmd, offset, count),
        }
    }

    fn get_db(&self) -> i64 {
        match self {
            RedisResource::Owned(con) => con.get_db(),
            RedisResource::Shared(con) => con.get_db(),
        }
    }
}

/// [`RedisFactory`] implementation opening connections to a fixed server URL
///
/// Connection attempts are bounded by a timeout instead of retrying forever;
/// whether an unreachable server is fatal is a decision that belongs to the
/// caller (a command publish has to fail fast, a poll loop simply retries).
#[derive(Clone)]
pub struct RedisConnectionFactory {
    url: String,
}

impl RedisConnectionFactory {
    /// Creates a new factory opening connections to the given URL
    pub fn new(url: String) -> Self {
        Self { url }
    }

    async fn owned_connection(&self) -> Result<Connection, BoxedError> {
        debug!("Instantiating new standalone redis connection");

        let client = Client::open(self.url.as_str())?;
        let con = timeout(CONNECT_TIMEOUT, client.get_async_connection())
            .await
            .map_err(|_| RedisResourceError::ConnectTimeout)??;

        Ok(con)
    }

    async fn shared_connection(&self) -> Result<MultiplexedConnection, BoxedError> {
        let mut shared = SHARED_CONNECTION.lock().await;

        if let Some(con) = &*shared {
            return Ok(con.clone());
        }

        debug!("Instantiating shared redis connection");

        let client = Client::open(self.url.as_str())?;
        let con = timeout(CONNECT_TIMEOUT, client.get_multiplexed_tokio_connection())
            .await
            .map_err(|_| RedisResourceError::ConnectTimeout)??;

        // Only successful connections are retained, a failed attempt is
        // repeated by whoever asks next.
        *shared = Some(con.clone());

        Ok(con)
    }
}

#[async_trait]
impl RedisFactory for RedisConnectionFactory {
    type Connection = RedisResource;

    async fn connection(
        &self,
        variant: RedisConnectionVariant,
    ) -> Result<Self::Connection, BoxedError> {
        match variant {
            RedisConnectionVariant::Owned => {
                Ok(RedisResource::Owned(self.owned_connection().await?))
            }
            RedisConnectionVariant::Multiplexed => {
                Ok(RedisResource::Shared(self.shared_connection().await?))
            }
        }
    }
}
