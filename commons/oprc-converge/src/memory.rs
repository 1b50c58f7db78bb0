//! In-process control plane. Resources live in a map and never reconcile on
//! their own; tests and dry runs script their conditions explicitly.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::client::ControlPlaneClient;
use crate::conditions::{Condition, remove_condition, set_condition};
use crate::error::{ClientError, ClientResult};
use crate::registry::KindRegistry;
use crate::resource::{
    DesiredResource, ObservedStatus, ResourceHandle, ResourceId,
};

#[derive(Clone, Debug)]
pub struct StoredResource {
    pub desired: DesiredResource,
    pub uid: String,
    pub status: ObservedStatus,
}

#[derive(Clone, Default)]
pub struct MemoryControlPlane {
    store: Arc<RwLock<HashMap<ResourceId, StoredResource>>>,
    registry: Option<KindRegistry>,
    next_uid: Arc<AtomicU64>,
}

impl MemoryControlPlane {
    /// Accepts any kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects kinds missing from `registry`, like the Kubernetes client.
    pub fn with_registry(registry: KindRegistry) -> Self {
        Self {
            registry: Some(registry),
            ..Self::default()
        }
    }

    fn check_kind(&self, kind: &str) -> ClientResult<()> {
        match &self.registry {
            Some(reg) if !reg.contains(kind) => {
                Err(ClientError::UnknownKind(kind.to_string()))
            }
            _ => Ok(()),
        }
    }

    pub async fn get(&self, id: &ResourceId) -> Option<StoredResource> {
        self.store.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Upsert one condition on a stored resource.
    pub async fn set_condition(
        &self,
        id: &ResourceId,
        condition: Condition,
    ) -> ClientResult<()> {
        let mut store = self.store.write().await;
        let res = store
            .get_mut(id)
            .ok_or_else(|| ClientError::NotFound(id.clone()))?;
        set_condition(&mut res.status.conditions, condition);
        Ok(())
    }

    pub async fn clear_condition(
        &self,
        id: &ResourceId,
        type_: &str,
    ) -> ClientResult<()> {
        let mut store = self.store.write().await;
        let res = store
            .get_mut(id)
            .ok_or_else(|| ClientError::NotFound(id.clone()))?;
        remove_condition(&mut res.status.conditions, type_);
        Ok(())
    }

    /// Delete a resource. Returns the removed entry, if any.
    pub async fn remove(&self, id: &ResourceId) -> Option<StoredResource> {
        self.store.write().await.remove(id)
    }
}

#[async_trait]
impl ControlPlaneClient for MemoryControlPlane {
    async fn create(
        &self,
        desired: &DesiredResource,
    ) -> ClientResult<ResourceHandle> {
        self.check_kind(&desired.id().kind)?;
        let mut store = self.store.write().await;
        if store.contains_key(desired.id()) {
            return Err(ClientError::AlreadyExists(desired.id().clone()));
        }
        let seq = self.next_uid.fetch_add(1, Ordering::Relaxed);
        let uid = format!("mem-{seq}");
        store.insert(
            desired.id().clone(),
            StoredResource {
                desired: desired.clone(),
                uid: uid.clone(),
                status: ObservedStatus::default(),
            },
        );
        Ok(ResourceHandle {
            id: desired.id().clone(),
            uid: Some(uid),
            resource_version: Some("1".into()),
        })
    }

    async fn get_status(
        &self,
        id: &ResourceId,
    ) -> ClientResult<ObservedStatus> {
        self.check_kind(&id.kind)?;
        let store = self.store.read().await;
        store
            .get(id)
            .map(|r| r.status.clone())
            .ok_or_else(|| ClientError::NotFound(id.clone()))
    }
}
