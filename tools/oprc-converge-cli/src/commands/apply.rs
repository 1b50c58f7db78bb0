use anyhow::Context;
use serde_json::Value;

use super::Converge;
use crate::manifest::ManifestEntry;
use crate::output::{condition_report, print_output, submission_report};
use crate::types::ApplyOperation;

pub async fn handle_apply_command(
    cv: &Converge,
    op: &ApplyOperation,
    entries: &[ManifestEntry],
) -> anyhow::Result<()> {
    let report = apply_entries(cv, entries, op.wait, op.adopt_existing).await?;
    print_output(&report, cv.output())
}

/// Submit every entry in order, then optionally wait on the last one.
pub(crate) async fn apply_entries(
    cv: &Converge,
    entries: &[ManifestEntry],
    wait: bool,
    adopt_existing: bool,
) -> anyhow::Result<Value> {
    let mut submitted = Vec::with_capacity(entries.len());
    for entry in entries {
        let desired = entry.to_desired(&cv.config().namespace);
        let (handle, created) = cv
            .submit(&desired, adopt_existing)
            .await
            .with_context(|| format!("failed to submit {}", desired.id()))?;
        submitted.push((handle, created));
    }

    match submitted.last() {
        Some((last, _)) if wait => {
            let cond = cv.await_condition(&last.id).await?;
            Ok(condition_report(&last.id, &cond))
        }
        _ => Ok(Value::Array(
            submitted
                .iter()
                .map(|(h, created)| submission_report(h, *created))
                .collect(),
        )),
    }
}

