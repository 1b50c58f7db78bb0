use anyhow::Context;
use serde_json::Value;
use tracing::info;

use super::Converge;
use crate::flux::{ChartRef, helm_release, helm_repository};
use crate::output::{condition_report, print_output};
use crate::types::HelmReleaseOperation;

/// Create the repository and the release, then wait for the release.
/// Either object may already exist from an earlier run.
pub async fn handle_helm_release_command(
    cv: &Converge,
    op: &HelmReleaseOperation,
) -> anyhow::Result<()> {
    let report = install_release(cv, op).await?;
    print_output(&report, cv.output())
}

pub(crate) async fn install_release(
    cv: &Converge,
    op: &HelmReleaseOperation,
) -> anyhow::Result<Value> {
    let values: Value = serde_json::from_str(&op.values)
        .context("--values must be a JSON object")?;
    anyhow::ensure!(values.is_object(), "--values must be a JSON object");

    let ns = &cv.config().namespace;
    let repo = helm_repository(ns, &op.repo_name, &op.repo_url);
    let (_, created) = cv.submit(&repo, true).await?;
    info!(resource = %repo.id(), created, "helm repository submitted");

    let release = helm_release(
        ns,
        &op.release_name,
        ChartRef {
            chart: &op.chart,
            version: &op.chart_version,
            repository: &op.repo_name,
        },
        values,
    );
    let (handle, created) = cv.submit(&release, true).await?;
    info!(resource = %handle.id, created, "helm release submitted");

    let cond = cv.await_condition(&handle.id).await?;
    Ok(condition_report(&handle.id, &cond))
}
