use super::ExpectationMode;
use crate::library::communication::event::{
    LogEntryId, Notification, NotificationPublisher, QueueDescriptor,
};
use crate::library::BoxedError;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use std::any::type_name;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct ExpectedNotification {
    serialized: String,
    queue: QueueDescriptor,
}

impl ExpectedNotification {
    fn deserialized<'a, D: Deserialize<'a>>(&'a self) -> Result<D, String> {
        let message = format!(
            "failed to deserialize expected value to type {}: {}",
            type_name::<D>(),
            self.serialized
        );
        serde_json::from_str(&self.serialized).map_err(|_| message)
    }
}

impl Default for MockNotificationPublisher {
    fn default() -> Self {
        Self {
            remaining: AtomicUsize::new(0),
            published: AtomicUsize::new(0),
            expected: Mutex::new(VecDeque::new()),
            mode: ExpectationMode::ExpectOnlyProvided,
            fail_with: Mutex::new(None),
        }
    }
}

pub struct MockNotificationPublisher {
    remaining: AtomicUsize,
    published: AtomicUsize,
    expected: Mutex<VecDeque<ExpectedNotification>>,
    mode: ExpectationMode,
    fail_with: Mutex<Option<String>>,
}

#[async_trait]
impl NotificationPublisher for Arc<MockNotificationPublisher> {
    async fn publish<N: Notification + Send + Sync>(
        &self,
        notification: &N,
    ) -> Result<LogEntryId, BoxedError> {
        if let Some(error) = self.fail_with.lock().unwrap().clone() {
            return Err(error.into());
        }

        self.handle(notification).await;

        let sequence = self.published.fetch_add(1, Ordering::SeqCst);
        Ok(format!("0-{}", sequence + 1))
    }
}

impl MockNotificationPublisher {
    #[allow(clippy::field_reassign_with_default)]
    pub fn ignoring() -> Self {
        let mut instance = Self::default();
        instance.mode = ExpectationMode::Ignore;
        instance
    }

    /// Makes every subsequent publish fail with the given message
    pub fn fail_with(&self, error: &str) {
        *self.fail_with.lock().unwrap() = Some(error.to_owned());
    }

    pub fn expect<N: Notification + Send + Sync>(&self, notification: &N) -> &Self {
        self.add_expectation(notification).unwrap();
        self
    }

    fn add_expectation<N: Notification + Send + Sync>(
        &self,
        notification: &N,
    ) -> Result<(), BoxedError> {
        let serialized = serde_json::to_string(notification)?;
        let queue = N::queue();

        println!("EXP {} {}", queue.key(), serialized);

        self.expected
            .lock()
            .unwrap()
            .push_back(ExpectedNotification { serialized, queue });

        self.remaining.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }

    async fn handle<N: Notification + Send + Sync>(&self, notification: &N) {
        let queue = N::queue();
        let json = serde_json::to_string(&notification)
            .expect("Published value failed to convert to JSON");
        println!("PUB {} {}", queue.key(), json);

        match self.mode {
            ExpectationMode::Ignore => {}
            ExpectationMode::ExpectOnlyProvided => {
                match self.expected.lock().unwrap().pop_front() {
                    None => panic!(
                        "Unexpected notification was published to {:?}: {:?}",
                        queue.key(),
                        json
                    ),
                    Some(expected) => {
                        assert_eq!(
                            expected.queue, queue,
                            "Notification queue (right) did not match expectation (left)"
                        );
                        assert_eq!(expected.deserialized::<N>().unwrap(), *notification);
                    }
                }
            }
        };

        let new_length = self.expected.lock().unwrap().len();
        self.remaining.store(new_length, Ordering::SeqCst);
    }
}

impl Drop for MockNotificationPublisher {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            let remaining = self.remaining.load(Ordering::SeqCst);

            if self.mode != ExpectationMode::Ignore && remaining > 0 {
                panic!(
                    "MockNotificationPublisher was dropped with {} expected notifications remaining",
                    remaining
                );
            }
        }
    }
}

mod does {
    use super::*;
    use crate::library::communication::event::QueueDescriptor;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct MockNotification(usize);

    impl Notification for MockNotification {
        fn queue() -> QueueDescriptor {
            QueueDescriptor::new("mock".into(), 42)
        }
    }

    #[tokio::test]
    async fn fulfill_expectations() {
        let notification = MockNotification(42);
        let publisher = Arc::new(MockNotificationPublisher::default());

        publisher.expect(&notification);
        let id = publisher.publish(&notification).await.unwrap();
        assert_eq!(id, "0-1");
    }

    #[tokio::test]
    async fn assign_sequential_entry_ids() {
        let publisher = Arc::new(MockNotificationPublisher::ignoring());

        assert_eq!(publisher.publish(&MockNotification(1)).await.unwrap(), "0-1");
        assert_eq!(publisher.publish(&MockNotification(2)).await.unwrap(), "0-2");
    }

    #[tokio::test]
    #[should_panic]
    async fn fail_on_unexpected() {
        let publisher = Arc::new(MockNotificationPublisher::default());
        publisher.publish(&MockNotification(42)).await.unwrap();
    }

    #[tokio::test]
    #[should_panic]
    async fn fail_on_missing() {
        MockNotificationPublisher::default().expect(&MockNotification(42));
    }

    #[tokio::test]
    async fn surface_scripted_errors() {
        let publisher = Arc::new(MockNotificationPublisher::ignoring());
        publisher.fail_with("store unreachable");

        assert!(publisher.publish(&MockNotification(42)).await.is_err());
    }
}
