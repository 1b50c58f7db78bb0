//! Flux source/helm kinds and builders for the two objects the
//! `helm-release` command creates.

use oprc_converge::{DesiredResource, KindInfo, KindRegistry, ResourceId};
use serde_json::{Value, json};

pub const HELM_REPOSITORY: &str = "HelmRepository";
pub const HELM_RELEASE: &str = "HelmRelease";

pub fn flux_registry() -> KindRegistry {
    KindRegistry::new()
        .with(KindInfo::new(
            "source.toolkit.fluxcd.io",
            "v1beta1",
            HELM_REPOSITORY,
            "helmrepositories",
        ))
        .with(KindInfo::new(
            "helm.toolkit.fluxcd.io",
            "v2beta1",
            HELM_RELEASE,
            "helmreleases",
        ))
}

pub fn helm_repository(
    namespace: &str,
    name: &str,
    url: &str,
) -> DesiredResource {
    DesiredResource::new(
        ResourceId::new(HELM_REPOSITORY, namespace, name),
        json!({
            "url": url,
            "interval": "30m",
        }),
    )
}

/// Chart to install from a previously created HelmRepository.
#[derive(Clone, Debug)]
pub struct ChartRef<'a> {
    pub chart: &'a str,
    pub version: &'a str,
    pub repository: &'a str,
}

pub fn helm_release(
    namespace: &str,
    name: &str,
    chart: ChartRef<'_>,
    values: Value,
) -> DesiredResource {
    DesiredResource::new(
        ResourceId::new(HELM_RELEASE, namespace, name),
        json!({
            "releaseName": name,
            "interval": "5m",
            "chart": {
                "spec": {
                    "chart": chart.chart,
                    "version": chart.version,
                    "sourceRef": {
                        "kind": HELM_REPOSITORY,
                        "name": chart.repository,
                    }
                }
            },
            "values": values,
        }),
    )
}
