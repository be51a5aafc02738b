//! Receivers and their remotely controllable lifecycle
//!
//! A receiver is an inbound-queue listening unit within an instance. All
//! receivers of an instance are started and stopped together through the
//! [`ReceiverLifecycle`] collaborator; each individual receiver observes its
//! own switch through a [`ReceiverGate`].

use super::status::{ReceiverState, ReceiverStatus};
use crate::library::EmptyResult;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::info;

/// Collaborator able to start and stop every receiver of this instance
///
/// Both operations are idempotent; applying a state that is already in
/// effect has no side effects beyond re-confirming it.
#[async_trait]
pub trait ReceiverLifecycle {
    /// Resumes consumption on every managed receiver
    async fn start_all(&self) -> EmptyResult;

    /// Suspends consumption on every managed receiver
    async fn stop_all(&self) -> EmptyResult;

    /// Current state of every managed receiver, in registration order
    fn statuses(&self) -> Vec<ReceiverStatus>;
}

struct ReceiverHandle {
    name: String,
    switch: watch::Sender<ReceiverState>,
}

/// Registry holding the switch of every inbound receiver of this instance
#[derive(Clone, Default)]
pub struct ReceiverRegistry {
    receivers: Arc<Mutex<Vec<ReceiverHandle>>>,
}

impl ReceiverRegistry {
    /// Creates a new, empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a receiver under the given name and returns its gate
    ///
    /// Receivers start out in the [`Up`](ReceiverState::Up) state.
    pub fn register(&self, name: &str) -> ReceiverGate {
        let (switch, gate) = watch::channel(ReceiverState::Up);

        self.receivers.lock().unwrap().push(ReceiverHandle {
            name: name.to_owned(),
            switch,
        });

        ReceiverGate { rx: gate }
    }

    fn apply(&self, state: ReceiverState) {
        for handle in self.receivers.lock().unwrap().iter() {
            let previous = handle.switch.send_replace(state);

            if previous != state {
                info!(receiver = %handle.name, ?state, "Receiver switched");
            }
        }
    }
}

#[async_trait]
impl ReceiverLifecycle for ReceiverRegistry {
    async fn start_all(&self) -> EmptyResult {
        self.apply(ReceiverState::Up);
        Ok(())
    }

    async fn stop_all(&self) -> EmptyResult {
        self.apply(ReceiverState::Down);
        Ok(())
    }

    fn statuses(&self) -> Vec<ReceiverStatus> {
        self.receivers
            .lock()
            .unwrap()
            .iter()
            .map(|handle| ReceiverStatus {
                name: handle.name.clone(),
                status: *handle.switch.borrow(),
            })
            .collect()
    }
}

/// Consumption switch observed by a single receiver
#[derive(Clone)]
pub struct ReceiverGate {
    rx: watch::Receiver<ReceiverState>,
}

impl ReceiverGate {
    /// Resolves once the receiver is (or becomes) started
    pub async fn started(&self) {
        self.wait_for(ReceiverState::Up).await
    }

    /// Resolves once the receiver is (or becomes) stopped
    pub async fn stopped(&self) {
        self.wait_for(ReceiverState::Down).await
    }

    /// Whether the receiver is currently started
    pub fn is_up(&self) -> bool {
        *self.rx.borrow() == ReceiverState::Up
    }

    async fn wait_for(&self, target: ReceiverState) {
        let mut rx = self.rx.clone();

        loop {
            if *rx.borrow_and_update() == target {
                return;
            }

            if rx.changed().await.is_err() {
                // Registry is gone, the state can never change again
                futures::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod does {
    use super::*;

    #[tokio::test]
    async fn start_receivers_in_up_state() {
        let registry = ReceiverRegistry::new();
        let gate = registry.register("wallet-expiration");

        assert!(gate.is_up());
        assert_eq!(
            registry.statuses(),
            vec![ReceiverStatus {
                name: "wallet-expiration".into(),
                status: ReceiverState::Up,
            }]
        );
    }

    #[tokio::test]
    async fn flip_every_receiver() {
        let registry = ReceiverRegistry::new();
        let expiration = registry.register("wallet-expiration");
        let cdc = registry.register("wallet-cdc");

        registry.stop_all().await.unwrap();

        assert!(!expiration.is_up());
        assert!(!cdc.is_up());

        registry.start_all().await.unwrap();

        assert!(expiration.is_up());
        assert!(cdc.is_up());
    }

    #[tokio::test]
    async fn treat_repeated_commands_as_noops() {
        let registry = ReceiverRegistry::new();
        let gate = registry.register("wallet-cdc");

        registry.start_all().await.unwrap();
        registry.start_all().await.unwrap();

        assert!(gate.is_up());

        registry.stop_all().await.unwrap();
        registry.stop_all().await.unwrap();

        assert!(!gate.is_up());
    }

    #[tokio::test]
    async fn unblock_gates_on_transitions() {
        let registry = ReceiverRegistry::new();
        let gate = registry.register("wallet-cdc");

        // Already up, resolves immediately
        gate.started().await;

        registry.stop_all().await.unwrap();
        gate.stopped().await;

        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.started().await })
        };

        registry.start_all().await.unwrap();
        waiter.await.unwrap();
    }
}
