use super::{CdcForwarder, RetrySendPolicy};
use crate::domain::event::{LoggingEvent, QueueEvent};
use crate::harness::Service;
use crate::library::communication::broker::BrokerPublisher;
use crate::library::communication::event::Consumer;
use crate::library::communication::CommunicationFactory;
use crate::library::tracing::{constants, in_span, remote_linked_context};
use crate::library::EmptyResult;
use crate::module::dispatcher::options::CdcOptions;
use async_trait::async_trait;
use opentelemetry::propagation::Extractor;
use opentelemetry::trace::TraceContextExt;
use std::time::Duration;
use tracing::error;

const SPAN_NAME: &str = "WalletCdcQueueConsumer";

/// Consumes the change-data-capture queue and forwards every event
///
/// Forwarding failures are logged with the event's identity and swallowed;
/// the inbound entry has already been acknowledged at this point and a
/// structurally valid but undeliverable event must not poison the queue.
pub struct CdcEventService<B: BrokerPublisher> {
    forwarder: CdcForwarder<B>,
}

impl<B> CdcEventService<B>
where
    B: BrokerPublisher + Send + Sync,
{
    /// Creates a new instance forwarding through the given broker
    pub fn new(broker: B, options: &CdcOptions) -> Self {
        let policy = RetrySendPolicy::new(
            options.cdc_retry_max_attempts,
            Duration::from_millis(options.cdc_retry_interval_ms),
        );

        Self {
            forwarder: CdcForwarder::new(broker, options.topic.clone(), policy),
        }
    }
}

impl<F> Service<F> for CdcEventService<F::BrokerPublisher>
where
    F: CommunicationFactory + Send + Sync,
{
    const NAME: &'static str = "CdcEventService";
    type Instance = CdcEventService<F::BrokerPublisher>;
    type Config = CdcOptions;

    fn instantiate(factory: F, config: &Self::Config) -> Self::Instance {
        Self::new(factory.broker_publisher(), config)
    }
}

#[async_trait]
impl<B> Consumer for CdcEventService<B>
where
    B: BrokerPublisher + Send + Sync,
{
    type Notification = QueueEvent<LoggingEvent>;

    async fn consume(&self, notification: Self::Notification) -> EmptyResult {
        let cx = remote_linked_context(
            SPAN_NAME,
            notification
                .tracing_info
                .as_ref()
                .map(|info| info as &dyn Extractor),
        );

        let event = notification.data;
        cx.span()
            .set_attribute(constants::CDC_EVENT_ID.string(event.id().to_owned()));
        cx.span()
            .set_attribute(constants::CDC_EVENT_TYPE.string(event.event_type()));

        let forwarder = &self.forwarder;
        in_span(cx, async move {
            if let Err(e) = forwarder.forward(&event).await {
                error!(
                    "Error while processing event with id [{}] of type [{}] with walletId [{}] published on [{}]: {}",
                    event.id(),
                    event.event_type(),
                    event.wallet_id(),
                    event.timestamp(),
                    e
                );
            }
        })
        .await;

        Ok(())
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use crate::domain::event::TracingInfo;
    use crate::domain::warmup::WARMUP_WALLET_ID;
    use crate::library::communication::implementation::mock::MockCommunicationFactory;

    fn envelope(wallet_id: &str) -> QueueEvent<LoggingEvent> {
        QueueEvent {
            data: LoggingEvent::WalletDeleted {
                id: "6c1c48d9-2f5e-4a26-9a57-f4509bcb211c".into(),
                timestamp: "2024-05-02T09:30:00Z".into(),
                wallet_id: wallet_id.into(),
            },
            tracing_info: Some(TracingInfo::default()),
        }
    }

    fn options() -> CdcOptions {
        CdcOptions {
            topic: "wallet-cdc-topic".into(),
            cdc_retry_max_attempts: 3,
            cdc_retry_interval_ms: 1,
        }
    }

    #[tokio::test]
    async fn forward_events_keyed_by_wallet() {
        let factory = MockCommunicationFactory::default();
        let broker = factory.broker_publisher();
        let service = CdcEventService::instantiate(factory, &options());

        service.consume(envelope("wallet-7")).await.unwrap();

        assert_eq!(broker.attempts(), 1);
        assert_eq!(
            broker.recorded(),
            vec![("wallet-cdc-topic".to_owned(), "wallet-7".to_owned())]
        );
    }

    #[tokio::test]
    async fn swallow_delivery_failures_after_exhausted_retries() {
        let factory = MockCommunicationFactory::default();
        let broker = factory.broker_publisher();
        broker.fail_always();

        let service = CdcEventService::instantiate(factory, &options());
        let result = service.consume(envelope("wallet-7")).await;

        assert!(result.is_ok());
        assert_eq!(broker.attempts(), 3);
    }

    #[tokio::test]
    async fn complete_warmup_against_a_dead_broker() {
        let factory = MockCommunicationFactory::default();
        let broker = factory.broker_publisher();
        broker.fail_always();

        let service = CdcEventService::instantiate(factory, &options());
        let result = service
            .consume(envelope(&WARMUP_WALLET_ID.to_string()))
            .await;

        assert!(result.is_ok());
        assert_eq!(broker.attempts(), 1);
    }
}
