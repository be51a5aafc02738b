use super::super::super::super::BoxedError;
use async_trait::async_trait;
use redis::aio::ConnectionLike;

/// Variant for redis connections
pub enum RedisConnectionVariant {
    /// Individual connection that may allow for blocking commands without disturbing other users.
    /// While it may be reused after going out-of-scope, this variant indicates that the consumer
    /// is operating long-running, blocking operations on the connection and the use of a shared
    /// connection is unadvisable as it would stall every other user.
    Owned,
    /// Connection that can be shared between multiple users and generally does not permit blocking commands
    Multiplexed,
}

/// Factory for redis connections of different [types](RedisConnectionVariant)
#[async_trait]
pub trait RedisFactory {
    /// Connection type handed out by this factory
    type Connection: ConnectionLike + Send + Sync + 'static;

    /// Establishes a new connection or clones a shared one
    async fn connection(
        &self,
        variant: RedisConnectionVariant,
    ) -> Result<Self::Connection, BoxedError>;
}
