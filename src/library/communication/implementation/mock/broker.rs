use crate::library::communication::broker::BrokerPublisher;
use crate::library::EmptyResult;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Broker double recording every send and failing a scripted number of times
#[derive(Default)]
pub struct MockBrokerPublisher {
    failures_left: AtomicUsize,
    sent: Mutex<Vec<(String, String)>>,
}

impl MockBrokerPublisher {
    /// Makes the next `count` sends fail before the broker "recovers"
    pub fn fail_times(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    /// Makes every send fail, no matter how often it is retried
    pub fn fail_always(&self) {
        self.fail_times(usize::MAX);
    }

    /// Total number of send attempts, including failed ones
    pub fn attempts(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Topic/key pairs of every attempt in order
    pub fn recorded(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrokerPublisher for Arc<MockBrokerPublisher> {
    async fn send(&self, topic: &str, key: &str, _payload: &[u8]) -> EmptyResult {
        self.sent
            .lock()
            .unwrap()
            .push((topic.to_owned(), key.to_owned()));

        let remaining = self.failures_left.load(Ordering::SeqCst);
        if remaining > 0 {
            if remaining != usize::MAX {
                self.failures_left.store(remaining - 1, Ordering::SeqCst);
            }
            return Err("broker unavailable".into());
        }

        Ok(())
    }
}
