use super::RedisCommunicationFactory;
use crate::domain::receiver::ReceiverGate;
use crate::library::communication::event::{
    ConsumerExt, ConsumerGroupDescriptor, DeliveryMode,
};
use crate::library::communication::CommunicationFactory;
use crate::library::EmptyResult;
use async_trait::async_trait;
use jatsl::{Job, JobManager};
use tracing::{debug, info};

/// Structure which can be instantiated with a [`CommunicationFactory`]
pub trait Service<F: CommunicationFactory + Send + Sync> {
    /// Name of the service displayed in log messages
    const NAME: &'static str;
    /// Instance type which will be instantiated
    type Instance: Send + Sync;
    /// Configuration type passed to the service
    type Config: Send + Sync;

    /// Creates a new instance which could be of a different type.
    fn instantiate(factory: F, config: &Self::Config) -> Self::Instance;
}

/// Runner for [`Service`] implementations where [`Service::Instance`] is conforming to the [`ConsumerExt`] trait
///
/// When constructed [`with_gate`](ServiceRunner::with_gate), the runner only
/// consumes while the linked receiver switch is up. Stopping tears the queue
/// stream (and its blocking connection) down between poll cycles; starting
/// attaches a fresh one, resuming from the consumer group's read position.
pub struct ServiceRunner<S: Service<RedisCommunicationFactory>> {
    redis_url: String,
    group: ConsumerGroupDescriptor,
    consumer: String,
    delivery: DeliveryMode,
    gate: Option<ReceiverGate>,
    config: <S as Service<RedisCommunicationFactory>>::Config,
}

impl<S> ServiceRunner<S>
where
    S: Service<RedisCommunicationFactory>,
    S::Instance: ConsumerExt + Send + Sync,
{
    /// Creates a new runner job which will connect to the given redis server and use the provided consumer group and name.
    pub fn new(
        redis_url: String,
        group: ConsumerGroupDescriptor,
        consumer: String,
        delivery: DeliveryMode,
        config: <S as Service<RedisCommunicationFactory>>::Config,
    ) -> Self {
        Self {
            redis_url,
            group,
            consumer,
            delivery,
            gate: None,
            config,
        }
    }

    /// Binds consumption to a receiver switch
    pub fn with_gate(mut self, gate: ReceiverGate) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl<S> Job for ServiceRunner<S>
where
    S: Service<RedisCommunicationFactory> + Send + Sync,
    S::Instance: ConsumerExt,
{
    const NAME: &'static str = "ServiceRunner";

    fn name(&self) -> String {
        format!("{}({})", Self::NAME, S::NAME)
    }

    async fn execute(&self, manager: JobManager) -> EmptyResult {
        let factory = RedisCommunicationFactory::new(self.redis_url.clone());
        let provider_factory = RedisCommunicationFactory::new(self.redis_url.clone());
        let service = S::instantiate(factory, &self.config);

        manager.ready().await;

        match &self.gate {
            None => {
                service
                    .consume_queue(
                        provider_factory.queue_provider(),
                        &self.group,
                        &self.consumer,
                        self.delivery,
                    )
                    .await
            }
            Some(gate) => loop {
                gate.started().await;
                debug!(service = S::NAME, "Receiver active, attaching to queue");

                let consumption = service.consume_queue(
                    provider_factory.queue_provider(),
                    &self.group,
                    &self.consumer,
                    self.delivery,
                );

                tokio::select! {
                    _ = gate.stopped() => {
                        info!(service = S::NAME, "Receiver stopped, detaching from queue");
                    }
                    result = consumption => return result,
                }
            },
        }
    }
}
