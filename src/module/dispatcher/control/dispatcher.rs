use crate::domain::command::{DispatcherCommand, ReceiverCommandKind};
use crate::domain::receiver::ReceiverLifecycle;
use crate::domain::DeploymentVersion;
use crate::library::BoxedError;
use thiserror::Error;
use tracing::info;

/// Errors raised while applying a control command
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A command kind this build has no handling logic for
    #[error("unhandled command variant received")]
    UnhandledCommand,
    /// The receiver lifecycle collaborator failed
    #[error("receiver lifecycle invocation failed")]
    Lifecycle(#[source] BoxedError),
}

/// Decides whether a control command applies to this instance and executes it
///
/// The decision is purely local: a command targets this instance when it
/// names no cohort at all or names the instance's own. Lifecycle mutation is
/// delegated to the [`ReceiverLifecycle`] collaborator which is trusted to be
/// idempotent, so targeted commands are applied unconditionally.
pub struct CommandDispatcher<L: ReceiverLifecycle> {
    deployment_version: DeploymentVersion,
    lifecycle: L,
}

impl<L> CommandDispatcher<L>
where
    L: ReceiverLifecycle + Send + Sync,
{
    /// Creates a new dispatcher for an instance of the given cohort
    pub fn new(deployment_version: DeploymentVersion, lifecycle: L) -> Self {
        Self {
            deployment_version,
            lifecycle,
        }
    }

    /// Applies a single control command
    pub async fn dispatch(&self, command: &DispatcherCommand) -> Result<(), DispatchError> {
        match command {
            DispatcherCommand::ReceiverCommand {
                receiver_command,
                version,
            } => self.handle_receiver_command(*receiver_command, *version).await,
            DispatcherCommand::Unknown => Err(DispatchError::UnhandledCommand),
        }
    }

    async fn handle_receiver_command(
        &self,
        command: ReceiverCommandKind,
        target_version: Option<DeploymentVersion>,
    ) -> Result<(), DispatchError> {
        let current = self.deployment_version;
        let targeted = target_version.map(|target| target == current).unwrap_or(true);

        info!(
            "Receiver command received. Current deployment version: [{}], command deployment version: [{}] -> is this version targeted: [{}]",
            current,
            target_version
                .map(|version| version.to_string())
                .unwrap_or_else(|| "ALL".to_owned()),
            targeted
        );

        if !targeted {
            info!("Current deployment version not targeted by command, command will not be processed");
            return Ok(());
        }

        let result = match command {
            ReceiverCommandKind::Start => self.lifecycle.start_all().await,
            ReceiverCommandKind::Stop => self.lifecycle.stop_all().await,
        };

        result.map_err(DispatchError::Lifecycle)
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use crate::domain::status::ReceiverStatus;
    use crate::library::EmptyResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default, Clone)]
    struct CountingLifecycle {
        starts: Arc<AtomicUsize>,
        stops: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ReceiverLifecycle for CountingLifecycle {
        async fn start_all(&self) -> EmptyResult {
            self.starts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn stop_all(&self) -> EmptyResult {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn statuses(&self) -> Vec<ReceiverStatus> {
            Vec::new()
        }
    }

    fn start_command(version: Option<DeploymentVersion>) -> DispatcherCommand {
        DispatcherCommand::ReceiverCommand {
            receiver_command: ReceiverCommandKind::Start,
            version,
        }
    }

    fn stop_command(version: Option<DeploymentVersion>) -> DispatcherCommand {
        DispatcherCommand::ReceiverCommand {
            receiver_command: ReceiverCommandKind::Stop,
            version,
        }
    }

    #[tokio::test]
    async fn ignore_commands_for_other_cohorts() {
        let lifecycle = CountingLifecycle::default();
        let dispatcher = CommandDispatcher::new(DeploymentVersion::Staging, lifecycle.clone());

        dispatcher
            .dispatch(&start_command(Some(DeploymentVersion::Prod)))
            .await
            .unwrap();

        assert_eq!(lifecycle.starts.load(Ordering::SeqCst), 0);
        assert_eq!(lifecycle.stops.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn apply_commands_for_the_own_cohort_once() {
        let lifecycle = CountingLifecycle::default();
        let dispatcher = CommandDispatcher::new(DeploymentVersion::Prod, lifecycle.clone());

        dispatcher
            .dispatch(&start_command(Some(DeploymentVersion::Prod)))
            .await
            .unwrap();

        assert_eq!(lifecycle.starts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn apply_untargeted_commands_regardless_of_cohort() {
        for version in [DeploymentVersion::Prod, DeploymentVersion::Staging] {
            let lifecycle = CountingLifecycle::default();
            let dispatcher = CommandDispatcher::new(version, lifecycle.clone());

            dispatcher.dispatch(&stop_command(None)).await.unwrap();

            assert_eq!(lifecycle.stops.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn reject_unhandled_command_kinds() {
        let lifecycle = CountingLifecycle::default();
        let dispatcher = CommandDispatcher::new(DeploymentVersion::Prod, lifecycle.clone());

        let result = dispatcher.dispatch(&DispatcherCommand::Unknown).await;

        assert!(matches!(result, Err(DispatchError::UnhandledCommand)));
        assert_eq!(lifecycle.starts.load(Ordering::SeqCst), 0);
    }
}
