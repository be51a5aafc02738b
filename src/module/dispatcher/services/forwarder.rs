use crate::domain::event::LoggingEvent;
use crate::domain::warmup::is_warmup_wallet;
use crate::library::communication::broker::BrokerPublisher;
use crate::library::EmptyResult;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Fixed-delay retry policy for broker deliveries
#[derive(Debug, Clone)]
pub struct RetrySendPolicy {
    max_attempts: u32,
    interval: Duration,
}

impl RetrySendPolicy {
    /// Creates a policy performing at most `max_attempts` total deliveries
    /// with a fixed pause in between
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }
}

/// Forwards change events to the downstream broker topic with bounded retry
///
/// Delivery is keyed by the wallet id and at-least-once: a send that keeps
/// failing is retried with a fixed delay until the attempt budget is spent,
/// then the last error surfaces to the caller. Warmup traffic is the one
/// exception; its failures are suppressed on the first attempt so startup
/// probing can never raise an operational error.
pub struct CdcForwarder<B: BrokerPublisher> {
    broker: B,
    topic: String,
    policy: RetrySendPolicy,
}

impl<B> CdcForwarder<B>
where
    B: BrokerPublisher + Send + Sync,
{
    /// Creates a new forwarder delivering to the given topic
    pub fn new(broker: B, topic: String, policy: RetrySendPolicy) -> Self {
        Self {
            broker,
            topic,
            policy,
        }
    }

    /// Delivers a single event, retrying transient failures
    pub async fn forward(&self, event: &LoggingEvent) -> EmptyResult {
        let payload = serde_json::to_vec(event)?;
        let key = event.wallet_id();

        info!("Sending CDC event to broker: [{}]", event.id());

        let mut attempt = 1;

        loop {
            match self.broker.send(&self.topic, key, &payload).await {
                Ok(()) => {
                    info!(
                        "Successfully sent CDC event to broker. walletId: [{}], eventId: [{}]",
                        key,
                        event.id()
                    );
                    return Ok(());
                }
                Err(e) => {
                    error!(
                        "Failed to send CDC event to broker. walletId: [{}], eventId: [{}]: {}",
                        key,
                        event.id(),
                        e
                    );

                    if is_warmup_wallet(key) {
                        debug!("Warmup event failed to deliver, suppressing");
                        return Ok(());
                    }

                    if attempt >= self.policy.max_attempts {
                        return Err(e);
                    }

                    warn!(
                        "Retrying to send CDC event to broker. walletId: [{}], eventId: [{}], eventType: [{}], attempt: [{}/{}]",
                        key,
                        event.id(),
                        event.event_type(),
                        attempt,
                        self.policy.max_attempts
                    );

                    tokio::time::sleep(self.policy.interval).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use crate::domain::warmup::WARMUP_WALLET_ID;
    use crate::library::communication::implementation::mock::MockBrokerPublisher;
    use std::sync::Arc;

    fn event(wallet_id: &str) -> LoggingEvent {
        LoggingEvent::WalletAdded {
            id: "3d7b96b1-8c59-4f48-9b14-be2a17e4e0a1".into(),
            timestamp: "2024-05-02T09:30:00Z".into(),
            wallet_id: wallet_id.into(),
        }
    }

    fn forwarder(
        broker: Arc<MockBrokerPublisher>,
        max_attempts: u32,
    ) -> CdcForwarder<Arc<MockBrokerPublisher>> {
        CdcForwarder::new(
            broker,
            "wallet-cdc-topic".into(),
            RetrySendPolicy::new(max_attempts, Duration::from_millis(1)),
        )
    }

    #[tokio::test]
    async fn deliver_on_the_first_attempt() {
        let broker = Arc::new(MockBrokerPublisher::default());
        let forwarder = forwarder(broker.clone(), 3);

        forwarder.forward(&event("wallet-1")).await.unwrap();

        assert_eq!(broker.attempts(), 1);
        assert_eq!(
            broker.recorded(),
            vec![("wallet-cdc-topic".to_owned(), "wallet-1".to_owned())]
        );
    }

    #[tokio::test]
    async fn retry_until_the_broker_recovers() {
        let broker = Arc::new(MockBrokerPublisher::default());
        broker.fail_times(2);

        let forwarder = forwarder(broker.clone(), 5);
        forwarder.forward(&event("wallet-1")).await.unwrap();

        assert_eq!(broker.attempts(), 3);
    }

    #[tokio::test]
    async fn give_up_after_the_attempt_budget() {
        let broker = Arc::new(MockBrokerPublisher::default());
        broker.fail_always();

        let forwarder = forwarder(broker.clone(), 3);
        let result = forwarder.forward(&event("wallet-1")).await;

        assert!(result.is_err());
        assert_eq!(broker.attempts(), 3);
    }

    #[tokio::test]
    async fn never_fail_warmup_traffic() {
        let broker = Arc::new(MockBrokerPublisher::default());
        broker.fail_always();

        let forwarder = forwarder(broker.clone(), 3);
        let result = forwarder
            .forward(&event(&WARMUP_WALLET_ID.to_string()))
            .await;

        assert!(result.is_ok());
        // Sentinel traffic is not worth retrying either
        assert_eq!(broker.attempts(), 1);
    }
}
