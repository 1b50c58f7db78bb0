use std::collections::HashMap;

/// API coordinates of one resource kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KindInfo {
    pub group: String,
    pub version: String,
    pub kind: String,
    pub plural: String,
}

impl KindInfo {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
        plural: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
            plural: plural.into(),
        }
    }

    /// `group/version`, or just `version` for the core group.
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

/// Kinds a client is allowed to talk about, keyed by kind name.
///
/// Built by the caller and handed to a client at construction; there is no
/// process-wide registration.
#[derive(Clone, Debug, Default)]
pub struct KindRegistry {
    kinds: HashMap<String, KindInfo>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kind, replacing any previous entry with the same name.
    pub fn register(&mut self, info: KindInfo) -> &mut Self {
        self.kinds.insert(info.kind.clone(), info);
        self
    }

    pub fn with(mut self, info: KindInfo) -> Self {
        self.register(info);
        self
    }

    pub fn resolve(&self, kind: &str) -> Option<&KindInfo> {
        self.kinds.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
