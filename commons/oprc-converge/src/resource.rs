use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::conditions::Condition;

/// Identity of a namespaced resource on the control plane.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceId {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl ResourceId {
    pub fn new(
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// A resource as the caller wants it to exist. The spec payload is opaque to
/// this crate; nothing is defaulted on the caller's behalf.
#[derive(Clone, Debug, PartialEq)]
pub struct DesiredResource {
    id: ResourceId,
    labels: BTreeMap<String, String>,
    spec: Value,
}

impl DesiredResource {
    pub fn new(id: ResourceId, spec: Value) -> Self {
        Self {
            id,
            labels: BTreeMap::new(),
            spec,
        }
    }

    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn spec(&self) -> &Value {
        &self.spec
    }
}

/// What a successful create hands back: enough to fetch status later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceHandle {
    pub id: ResourceId,
    pub uid: Option<String>,
    pub resource_version: Option<String>,
}

impl ResourceHandle {
    pub fn new(id: ResourceId) -> Self {
        Self {
            id,
            uid: None,
            resource_version: None,
        }
    }
}

/// Snapshot of a resource's `status` block.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct ObservedStatus {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub conditions: Vec<Condition>,
    #[serde(
        rename = "observedGeneration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub observed_generation: Option<i64>,
    /// Resource-specific status fields, kept as-is.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ObservedStatus {
    pub fn with_conditions(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            ..Default::default()
        }
    }

    /// Decode a `status` JSON value. A missing or null status means the
    /// controller has not reported anything yet.
    pub fn from_value(status: Option<&Value>) -> serde_json::Result<Self> {
        match status {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(v) => serde_json::from_value(v.clone()),
        }
    }
}

// some controllers publish `conditions: null` before the first reconcile
fn null_as_empty<'de, D>(d: D) -> Result<Vec<Condition>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Condition>>::deserialize(d)?.unwrap_or_default())
}
