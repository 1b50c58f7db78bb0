mod apply;
mod helm_release;
mod wait;

pub use apply::handle_apply_command;
pub use helm_release::handle_helm_release_command;
pub use wait::handle_wait_command;

use std::sync::Arc;

use oprc_converge::{
    CancellationToken, Condition, ConditionStatus, ControlPlaneClient,
    DesiredResource, FailOnReasons, KindRegistry, MemoryControlPlane,
    PollSession, ReadinessPoller, ResourceHandle, ResourceId,
    ResourceSubmitter,
};
use tracing::{debug, info};

use crate::config::ConvergeConfig;
use crate::types::{GlobalArgs, OutputFormat};

/// Everything a command needs: the client plus resolved settings.
pub struct Converge {
    client: Arc<dyn ControlPlaneClient>,
    dry_run: Option<MemoryControlPlane>,
    config: ConvergeConfig,
    fail_on_reason: Vec<String>,
    output: OutputFormat,
    cancel: CancellationToken,
}

impl Converge {
    pub async fn connect(
        config: ConvergeConfig,
        args: &GlobalArgs,
        registry: KindRegistry,
        cancel: CancellationToken,
    ) -> anyhow::Result<Self> {
        if args.memory {
            return Ok(Self::in_memory(config, args, registry, cancel));
        }
        let client =
            oprc_converge::KubeControlPlane::try_default(registry).await?;
        Ok(Self {
            client: Arc::new(client),
            dry_run: None,
            config,
            fail_on_reason: args.fail_on_reason.clone(),
            output: args.output.clone(),
            cancel,
        })
    }

    /// Dry run: every accepted resource is immediately marked ready.
    pub fn in_memory(
        config: ConvergeConfig,
        args: &GlobalArgs,
        registry: KindRegistry,
        cancel: CancellationToken,
    ) -> Self {
        let memory = MemoryControlPlane::with_registry(registry);
        Self {
            client: Arc::new(memory.clone()),
            dry_run: Some(memory),
            config,
            fail_on_reason: args.fail_on_reason.clone(),
            output: args.output.clone(),
            cancel,
        }
    }

    pub fn config(&self) -> &ConvergeConfig {
        &self.config
    }

    pub fn output(&self) -> &OutputFormat {
        &self.output
    }

    /// Create `desired`. With `adopt_existing`, a resource that is already
    /// there counts as submitted; the flag says whether it was created now.
    pub async fn submit(
        &self,
        desired: &DesiredResource,
        adopt_existing: bool,
    ) -> anyhow::Result<(ResourceHandle, bool)> {
        let submitter = ResourceSubmitter::new(self.client.clone());
        match submitter.submit(desired).await {
            Ok(handle) => {
                self.mark_dry_run_ready(&handle.id).await?;
                Ok((handle, true))
            }
            Err(e) if adopt_existing && e.is_already_exists() => {
                info!(resource = %desired.id(), "already exists, adopting");
                Ok((ResourceHandle::new(desired.id().clone()), false))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn await_condition(
        &self,
        id: &ResourceId,
    ) -> anyhow::Result<Condition> {
        let session = PollSession::new(
            id.clone(),
            &self.config.condition,
            self.config.poll_interval(),
            self.config.poll_timeout(),
        )?;
        let mut poller = ReadinessPoller::new(self.client.clone());
        if !self.fail_on_reason.is_empty() {
            let reasons = FailOnReasons::new(self.fail_on_reason.clone());
            poller = poller.with_predicate(reasons);
        }
        info!(
            resource = %id,
            condition = %self.config.condition,
            timeout_secs = self.config.poll_timeout_secs,
            "waiting for condition"
        );
        Ok(poller.await_ready(session, &self.cancel).await?)
    }

    async fn mark_dry_run_ready(&self, id: &ResourceId) -> anyhow::Result<()> {
        let Some(memory) = &self.dry_run else {
            return Ok(());
        };
        debug!(resource = %id, "dry run, marking ready");
        memory
            .set_condition(
                id,
                Condition::new(&self.config.condition, ConditionStatus::True)
                    .with_reason("DryRun")
                    .with_message(format!("{id} accepted (dry run)")),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
