//! Redis backed implementations of the communication seams

mod factory;
mod resource;

pub use factory::RedisCommunicationFactory;
pub use resource::{RedisConnectionFactory, RedisResource};
