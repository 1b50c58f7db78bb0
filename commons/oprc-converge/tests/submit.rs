use std::sync::Arc;
use std::time::Duration;

use oprc_converge::{
    CancellationToken, ClientError, Condition, ConditionStatus,
    DesiredResource, KindInfo, KindRegistry, MemoryControlPlane, PollSession,
    READY_CONDITION, ReadinessPoller, ResourceId, ResourceSubmitter,
};

fn bitnami() -> DesiredResource {
    DesiredResource::new(
        ResourceId::new("Repository", "default", "bitnami"),
        serde_json::json!({
            "url": "https://charts.bitnami.com/bitnami",
            "interval": "30m"
        }),
    )
}

#[test_log::test(tokio::test)]
async fn second_submit_reports_already_exists() {
    let cp = Arc::new(MemoryControlPlane::new());
    let submitter = ResourceSubmitter::new(cp.clone());

    let handle = submitter.submit(&bitnami()).await.unwrap();
    assert_eq!(handle.id.name, "bitnami");
    let first_uid = handle.uid.clone();

    let other_spec = DesiredResource::new(
        bitnami().id().clone(),
        serde_json::json!({"url": "https://example.invalid/charts"}),
    );
    let err = submitter.submit(&other_spec).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::AlreadyExists(ref id) if id.name == "bitnami"
    ));

    // the first resource is untouched
    let stored = cp.get(bitnami().id()).await.unwrap();
    assert_eq!(Some(stored.uid), first_uid);
    assert_eq!(stored.desired, bitnami());
    assert_eq!(cp.len().await, 1);
}

#[test_log::test(tokio::test)]
async fn unregistered_kind_is_rejected_before_create() {
    let registry = KindRegistry::new().with(KindInfo::new(
        "source.toolkit.fluxcd.io",
        "v1beta1",
        "HelmRepository",
        "helmrepositories",
    ));
    let cp = Arc::new(MemoryControlPlane::with_registry(registry));
    let err = ResourceSubmitter::new(cp.clone())
        .submit(&bitnami())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::UnknownKind(_)));
    assert_eq!(cp.len().await, 0);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn submit_then_await_readiness() {
    let cp = Arc::new(MemoryControlPlane::new());
    let release = DesiredResource::new(
        ResourceId::new("HelmRelease", "default", "nginx"),
        serde_json::json!({
            "releaseName": "nginx",
            "chart": {"spec": {"chart": "nginx", "version": "8.x"}}
        }),
    );
    let handle = ResourceSubmitter::new(cp.clone())
        .submit(&release)
        .await
        .unwrap();

    // stand-in for the remote reconciler
    let reconciler = {
        let cp = cp.clone();
        let id = handle.id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            cp.set_condition(
                &id,
                Condition::new(READY_CONDITION, ConditionStatus::Unknown)
                    .with_reason("Progressing"),
            )
            .await
            .unwrap();
            tokio::time::sleep(Duration::from_secs(6)).await;
            cp.set_condition(
                &id,
                Condition::new(READY_CONDITION, ConditionStatus::True)
                    .with_reason("ReconciliationSucceeded")
                    .with_message("release reconciled"),
            )
            .await
            .unwrap();
        })
    };

    let session = PollSession::new(
        handle.id,
        READY_CONDITION,
        Duration::from_secs(2),
        Duration::from_secs(60),
    )
    .unwrap();
    let cond = ReadinessPoller::new(cp)
        .await_ready(session, &CancellationToken::new())
        .await
        .unwrap();
    reconciler.await.unwrap();

    assert_eq!(cond.reason, "ReconciliationSucceeded");
    assert_eq!(cond.message, "release reconciled");
    assert!(cond.last_transition_time.is_some());
}
