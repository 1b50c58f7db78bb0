use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, bail};
use kube::{core::GroupVersionKind, discovery::ApiResource};
use oprc_converge::{DesiredResource, KindInfo, KindRegistry, ResourceId};
use serde::Deserialize;
use serde_json::Value;

/// One object of a manifest file, in Kubernetes shape.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    #[serde(default)]
    pub api_version: Option<String>,
    pub kind: String,
    pub metadata: ManifestMeta,
    #[serde(default)]
    pub spec: Value,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ManifestMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl ManifestEntry {
    pub fn to_desired(&self, default_namespace: &str) -> DesiredResource {
        let ns = self
            .metadata
            .namespace
            .as_deref()
            .unwrap_or(default_namespace);
        DesiredResource::new(
            ResourceId::new(&self.kind, ns, &self.metadata.name),
            self.spec.clone(),
        )
        .with_labels(self.metadata.labels.clone())
    }

    /// Kind info derived from `apiVersion`, with the plural guessed the
    /// way kube does for unknown resources.
    pub fn kind_info(&self) -> Option<KindInfo> {
        let api_version = self.api_version.as_deref()?;
        let (group, version) = api_version
            .split_once('/')
            .unwrap_or(("", api_version));
        let gvk = GroupVersionKind::gvk(group, version, &self.kind);
        let ar = ApiResource::from_gvk(&gvk);
        Some(KindInfo::new(group, version, &self.kind, ar.plural))
    }
}

/// Parse YAML (one or more documents) or JSON.
pub fn parse(content: &str) -> anyhow::Result<Vec<ManifestEntry>> {
    let mut entries = Vec::new();
    for (i, doc) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let value = serde_yaml::Value::deserialize(doc).with_context(|| {
            format!("manifest document {i} is not valid YAML")
        })?;
        if value.is_null() {
            continue;
        }
        let entry: ManifestEntry =
            serde_yaml::from_value(value).with_context(|| {
                format!("manifest document {i} is not a resource")
            })?;
        entries.push(entry);
    }
    if entries.is_empty() {
        bail!("manifest contains no resources");
    }
    Ok(entries)
}

pub fn load(path: &Path) -> anyhow::Result<Vec<ManifestEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&content)
        .with_context(|| format!("invalid manifest {}", path.display()))
}

/// Add kinds named by the manifest that `registry` does not know yet.
pub fn extend_registry(registry: &mut KindRegistry, entries: &[ManifestEntry]) {
    for entry in entries {
        if registry.contains(&entry.kind) {
            continue;
        }
        if let Some(info) = entry.kind_info() {
            registry.register(info);
        }
    }
}
