//! Keyed storage of self-expiring entities
//!
//! Entities stored through this module disappear on their own once their
//! time-to-live elapses. This property is load-bearing: records written by a
//! crashed process vanish from aggregate reads without anybody having to
//! clean them up. Writers own exactly one key each and refresh it
//! periodically; readers only ever scan the whole keyspace.

mod store;

pub mod redis;

#[cfg(test)]
pub mod memory;

pub use store::*;
