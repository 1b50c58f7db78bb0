use std::collections::HashMap;

use envconfig::Envconfig;
use oprc_converge::{ClientError, PollError, READY_CONDITION};

use super::apply::apply_entries;
use super::helm_release::install_release;
use super::*;
use crate::flux::flux_registry;
use crate::manifest;
use crate::types::HelmReleaseOperation;

const MANIFEST: &str = r#"
apiVersion: source.toolkit.fluxcd.io/v1beta1
kind: HelmRepository
metadata:
  name: bitnami
spec:
  url: https://charts.bitnami.com/bitnami
---
apiVersion: helm.toolkit.fluxcd.io/v2beta1
kind: HelmRelease
metadata:
  name: nginx
spec:
  releaseName: nginx
"#;

fn converge(args: GlobalArgs) -> Converge {
    let config = ConvergeConfig::init_from_hashmap(&HashMap::new())
        .unwrap()
        .with_overrides(&args);
    Converge::in_memory(
        config,
        &args,
        flux_registry(),
        CancellationToken::new(),
    )
}

fn default_release() -> HelmReleaseOperation {
    HelmReleaseOperation {
        repo_name: "bitnami".into(),
        repo_url: "https://charts.bitnami.com/bitnami".into(),
        release_name: "nginx".into(),
        chart: "nginx".into(),
        chart_version: "8.x".into(),
        values: r#"{"service":{"type":"ClusterIP"}}"#.into(),
    }
}

fn poll_error(err: &anyhow::Error) -> &PollError {
    err.downcast_ref::<PollError>()
        .unwrap_or_else(|| panic!("not a poll error: {err:#}"))
}

#[test_log::test(tokio::test)]
async fn apply_reports_each_submission() {
    let cv = converge(GlobalArgs::default());
    let entries = manifest::parse(MANIFEST).unwrap();

    let report = apply_entries(&cv, &entries, false, true).await.unwrap();
    let items = report.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["resource"], "HelmRepository default/bitnami");
    assert_eq!(items[0]["created"], true);
    assert_eq!(items[1]["uid"], "mem-1");
}

#[test_log::test(tokio::test)]
async fn reapply_adopts_existing_resources() {
    let cv = converge(GlobalArgs::default());
    let entries = manifest::parse(MANIFEST).unwrap();
    apply_entries(&cv, &entries, false, true).await.unwrap();

    let report = apply_entries(&cv, &entries, false, true).await.unwrap();
    assert!(
        report
            .as_array()
            .unwrap()
            .iter()
            .all(|item| item["created"] == false)
    );

    let err = apply_entries(&cv, &entries, false, false)
        .await
        .unwrap_err();
    let client_err = err.downcast_ref::<ClientError>().unwrap();
    assert!(client_err.is_already_exists());
}

#[test_log::test(tokio::test)]
async fn apply_with_wait_returns_last_condition() {
    let cv = converge(GlobalArgs::default());
    let entries = manifest::parse(MANIFEST).unwrap();

    let report = apply_entries(&cv, &entries, true, true).await.unwrap();
    assert_eq!(report["resource"], "HelmRelease default/nginx");
    assert_eq!(report["type"], READY_CONDITION);
    assert_eq!(report["status"], "True");
    assert_eq!(report["reason"], "DryRun");
}

#[test_log::test(tokio::test)]
async fn unregistered_kind_fails_the_apply() {
    let cv = converge(GlobalArgs::default());
    let entries = manifest::parse(
        r#"{"kind": "Bucket", "metadata": {"name": "b1"}, "spec": {}}"#,
    )
    .unwrap();
    let err = apply_entries(&cv, &entries, false, true).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ClientError>(),
        Some(ClientError::UnknownKind(kind)) if kind == "Bucket"
    ));
}

#[test_log::test(tokio::test)]
async fn helm_release_flow_prints_ready_message() {
    let cv = converge(GlobalArgs {
        namespace: Some("web".into()),
        ..Default::default()
    });
    let report = install_release(&cv, &default_release()).await.unwrap();
    assert_eq!(report["resource"], "HelmRelease web/nginx");
    assert_eq!(report["message"], "HelmRelease web/nginx accepted (dry run)");

    // second run finds both objects in place and still waits
    let report = install_release(&cv, &default_release()).await.unwrap();
    assert_eq!(report["status"], "True");

    let memory = cv.dry_run.as_ref().unwrap();
    assert_eq!(memory.len().await, 2);
    let stored = memory
        .get(&ResourceId::new("HelmRelease", "web", "nginx"))
        .await
        .unwrap();
    let source_ref = &stored.desired.spec()["chart"]["spec"]["sourceRef"];
    assert_eq!(source_ref["name"], "bitnami");
}

#[test_log::test(tokio::test)]
async fn helm_release_rejects_non_object_values() {
    let cv = converge(GlobalArgs::default());
    let op = HelmReleaseOperation {
        values: "[1, 2]".into(),
        ..default_release()
    };
    assert!(install_release(&cv, &op).await.is_err());
    assert_eq!(cv.dry_run.as_ref().unwrap().len().await, 0);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn wait_on_missing_resource_fails_fast() {
    let cv = converge(GlobalArgs::default());
    let err = cv
        .await_condition(&ResourceId::new("HelmRelease", "default", "ghost"))
        .await
        .unwrap_err();
    assert!(matches!(
        poll_error(&err),
        PollError::Failed {
            source: ClientError::NotFound(_),
            ..
        }
    ));
}

#[test_log::test(tokio::test(start_paused = true))]
async fn fail_on_reason_stops_the_wait() {
    let cv = converge(GlobalArgs {
        fail_on_reason: vec!["Stalled".into()],
        timeout: Some(30),
        ..Default::default()
    });
    let id = ResourceId::new("HelmRelease", "default", "nginx");
    // created behind the dry-run marker so it never turns ready
    cv.client
        .create(&DesiredResource::new(id.clone(), serde_json::json!({})))
        .await
        .unwrap();
    cv.dry_run
        .as_ref()
        .unwrap()
        .set_condition(
            &id,
            Condition::new(READY_CONDITION, ConditionStatus::False)
                .with_reason("Stalled")
                .with_message("install retries exhausted"),
        )
        .await
        .unwrap();

    let err = cv.await_condition(&id).await.unwrap_err();
    match poll_error(&err) {
        PollError::ConditionFailed { condition, .. } => {
            assert_eq!(condition.message, "install retries exhausted");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test_log::test(tokio::test(start_paused = true))]
async fn cancelled_wait_reports_cancellation() {
    let args = GlobalArgs::default();
    let config = ConvergeConfig::init_from_hashmap(&HashMap::new()).unwrap();
    let cancel = CancellationToken::new();
    let cv =
        Converge::in_memory(config, &args, flux_registry(), cancel.clone());
    let id = ResourceId::new("HelmRelease", "default", "nginx");
    cv.client
        .create(&DesiredResource::new(id.clone(), serde_json::json!({})))
        .await
        .unwrap();

    cancel.cancel();
    let err = cv.await_condition(&id).await.unwrap_err();
    assert!(matches!(poll_error(&err), PollError::Cancelled { .. }));
}
