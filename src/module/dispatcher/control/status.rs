use crate::domain::receiver::ReceiverLifecycle;
use crate::domain::status::ReceiversStatus;
use crate::domain::DeploymentVersion;
use crate::harness::RedisCommunicationFactory;
use crate::library::communication::CommunicationFactory;
use crate::library::storage::ExpiringStore;
use crate::library::{BoxedError, EmptyResult};
use async_trait::async_trait;
use chrono::Utc;
use jatsl::{Job, JobManager};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::warn;

/// Errors raised while aggregating receiver statuses
#[derive(Debug, Error)]
pub enum StatusQueryError {
    /// No instance has a live status record (after filtering)
    ///
    /// Distinct from an empty fleet being a valid answer: either nothing has
    /// reported yet or every record expired, and the boundary layer should
    /// render a not-found response.
    #[error("no event receiver status found")]
    NoStatusFound,
    /// The status store could not be read
    #[error("status store unavailable")]
    StoreUnavailable(#[source] BoxedError),
}

/// Renders the live receiver status of the whole fleet
pub struct StatusAggregator<S: ExpiringStore> {
    store: S,
}

impl<S> StatusAggregator<S>
where
    S: ExpiringStore + Send + Sync,
{
    /// Creates a new instance reading from the given store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads every live status record, optionally keeping only one cohort
    pub async fn receivers_status(
        &self,
        version_filter: Option<DeploymentVersion>,
    ) -> Result<Vec<ReceiversStatus>, StatusQueryError> {
        let statuses = self
            .store
            .values::<ReceiversStatus>()
            .await
            .map_err(StatusQueryError::StoreUnavailable)?;

        let statuses: Vec<ReceiversStatus> = statuses
            .into_iter()
            .filter(|status| {
                version_filter
                    .map(|version| status.version == version)
                    .unwrap_or(true)
            })
            .collect();

        if statuses.is_empty() {
            return Err(StatusQueryError::NoStatusFound);
        }

        Ok(statuses)
    }
}

/// Periodically records this instance's receiver states with a bounded TTL
///
/// The record disappears on its own when the instance stops refreshing it, so
/// crashed instances vanish from aggregate views without explicit cleanup.
/// Failed writes are logged and retried on the next tick.
pub struct StatusReporterJob<L: ReceiverLifecycle> {
    redis_url: String,
    instance_id: String,
    version: DeploymentVersion,
    lifecycle: L,
    report_interval: Duration,
    ttl: Duration,
}

impl<L> StatusReporterJob<L>
where
    L: ReceiverLifecycle + Send + Sync,
{
    /// Creates a new reporter for the given instance identity
    pub fn new(
        redis_url: String,
        instance_id: String,
        version: DeploymentVersion,
        lifecycle: L,
        report_interval: Duration,
        ttl: Duration,
    ) -> Self {
        Self {
            redis_url,
            instance_id,
            version,
            lifecycle,
            report_interval,
            ttl,
        }
    }

    fn snapshot(&self) -> ReceiversStatus {
        ReceiversStatus {
            consumer_instance_id: self.instance_id.clone(),
            version: self.version,
            receiver_statuses: self.lifecycle.statuses(),
            queried_at: Utc::now(),
        }
    }
}

#[async_trait]
impl<L> Job for StatusReporterJob<L>
where
    L: ReceiverLifecycle + Send + Sync,
{
    const NAME: &'static str = module_path!();

    async fn execute(&self, manager: JobManager) -> EmptyResult {
        let factory = RedisCommunicationFactory::new(self.redis_url.clone());
        let store = factory.status_store();

        manager.ready().await;

        loop {
            if let Err(e) = store.put(&self.snapshot(), self.ttl).await {
                warn!("Failed to record receiver status: {}", e);
            }

            sleep(self.report_interval).await;
        }
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use crate::domain::status::{ReceiverState, ReceiverStatus};
    use crate::library::storage::memory::InMemoryExpiringStore;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn record(instance: &str, version: DeploymentVersion) -> ReceiversStatus {
        ReceiversStatus {
            consumer_instance_id: instance.into(),
            version,
            receiver_statuses: vec![
                ReceiverStatus {
                    name: "wallet-expiration".into(),
                    status: ReceiverState::Up,
                },
                ReceiverStatus {
                    name: "wallet-cdc".into(),
                    status: ReceiverState::Down,
                },
            ],
            queried_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn report_not_found_without_any_records() {
        let aggregator = StatusAggregator::new(Arc::new(InMemoryExpiringStore::new()));

        let result = aggregator.receivers_status(None).await;

        assert!(matches!(result, Err(StatusQueryError::NoStatusFound)));
    }

    #[tokio::test]
    async fn report_not_found_when_the_filter_drops_everything() {
        let store = Arc::new(InMemoryExpiringStore::new());
        store
            .put(&record("a", DeploymentVersion::Prod), Duration::from_secs(60))
            .await
            .unwrap();

        let aggregator = StatusAggregator::new(store);
        let result = aggregator
            .receivers_status(Some(DeploymentVersion::Staging))
            .await;

        assert!(matches!(result, Err(StatusQueryError::NoStatusFound)));
    }

    #[tokio::test]
    async fn preserve_record_content() {
        let store = Arc::new(InMemoryExpiringStore::new());
        let expected = record("a", DeploymentVersion::Prod);
        store.put(&expected, Duration::from_secs(60)).await.unwrap();

        let aggregator = StatusAggregator::new(store);
        let statuses = aggregator.receivers_status(None).await.unwrap();

        assert_eq!(statuses, vec![expected]);
    }

    #[tokio::test]
    async fn filter_by_cohort() {
        let store = Arc::new(InMemoryExpiringStore::new());
        store
            .put(&record("a", DeploymentVersion::Prod), Duration::from_secs(60))
            .await
            .unwrap();
        store
            .put(
                &record("b", DeploymentVersion::Staging),
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let aggregator = StatusAggregator::new(store);
        let statuses = aggregator
            .receivers_status(Some(DeploymentVersion::Staging))
            .await
            .unwrap();

        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].consumer_instance_id, "b");
    }

    #[tokio::test]
    async fn drop_expired_records_from_the_aggregate() {
        let store = Arc::new(InMemoryExpiringStore::new());
        store
            .put(&record("a", DeploymentVersion::Prod), Duration::from_secs(60))
            .await
            .unwrap();

        store.remove::<ReceiversStatus>("a");

        let aggregator = StatusAggregator::new(store);
        let result = aggregator.receivers_status(None).await;

        assert!(matches!(result, Err(StatusQueryError::NoStatusFound)));
    }
}
