use async_trait::async_trait;
use kube::{
    Client,
    api::{Api, PostParams},
    core::{DynamicObject, GroupVersionKind},
    discovery::ApiResource,
};
use tracing::debug;

use crate::client::ControlPlaneClient;
use crate::error::{ClientError, ClientResult};
use crate::registry::{KindInfo, KindRegistry};
use crate::resource::{
    DesiredResource, ObservedStatus, ResourceHandle, ResourceId,
};

/// [`ControlPlaneClient`] backed by the Kubernetes API server.
///
/// Every kind must be present in the registry handed over at construction;
/// objects are sent as `DynamicObject`s so no typed CRD bindings are needed.
#[derive(Clone)]
pub struct KubeControlPlane {
    client: Client,
    registry: KindRegistry,
}

impl KubeControlPlane {
    pub fn new(client: Client, registry: KindRegistry) -> Self {
        Self { client, registry }
    }

    /// Build a client from the ambient kubeconfig or in-cluster config.
    pub async fn try_default(registry: KindRegistry) -> ClientResult<Self> {
        let client = Client::try_default()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self::new(client, registry))
    }

    fn api_for(
        &self,
        id: &ResourceId,
    ) -> ClientResult<(Api<DynamicObject>, ApiResource)> {
        let info = self
            .registry
            .resolve(&id.kind)
            .ok_or_else(|| ClientError::UnknownKind(id.kind.clone()))?;
        let ar = api_resource(info);
        let api = Api::namespaced_with(self.client.clone(), &id.namespace, &ar);
        Ok((api, ar))
    }
}

pub(crate) fn api_resource(info: &KindInfo) -> ApiResource {
    let gvk = GroupVersionKind::gvk(&info.group, &info.version, &info.kind);
    ApiResource::from_gvk_with_plural(&gvk, &info.plural)
}

pub(crate) fn to_dynamic(
    desired: &DesiredResource,
    ar: &ApiResource,
) -> DynamicObject {
    let id = desired.id();
    let mut obj = DynamicObject::new(&id.name, ar)
        .within(&id.namespace)
        .data(serde_json::json!({ "spec": desired.spec() }));
    if !desired.labels().is_empty() {
        obj.metadata.labels = Some(desired.labels().clone());
    }
    obj
}

/// Map a kube error onto the client taxonomy.
pub(crate) fn classify(err: kube::Error, id: &ResourceId) -> ClientError {
    match err {
        kube::Error::Api(ae) => match ae.code {
            404 => ClientError::NotFound(id.clone()),
            409 => ClientError::AlreadyExists(id.clone()),
            400 | 422 => ClientError::Invalid {
                id: id.clone(),
                message: ae.message,
            },
            code => ClientError::Api {
                code,
                reason: ae.reason,
                message: ae.message,
            },
        },
        other => ClientError::Transport(other.to_string()),
    }
}

#[async_trait]
impl ControlPlaneClient for KubeControlPlane {
    async fn create(
        &self,
        desired: &DesiredResource,
    ) -> ClientResult<ResourceHandle> {
        let id = desired.id();
        let (api, ar) = self.api_for(id)?;
        let obj = to_dynamic(desired, &ar);
        let created = api
            .create(&PostParams::default(), &obj)
            .await
            .map_err(|e| classify(e, id))?;
        debug!(resource = %id, api_version = %ar.api_version, "created");
        Ok(ResourceHandle {
            id: id.clone(),
            uid: created.metadata.uid,
            resource_version: created.metadata.resource_version,
        })
    }

    async fn get_status(
        &self,
        id: &ResourceId,
    ) -> ClientResult<ObservedStatus> {
        let (api, _) = self.api_for(id)?;
        let obj = api.get(&id.name).await.map_err(|e| classify(e, id))?;
        ObservedStatus::from_value(obj.data.get("status")).map_err(|source| {
            ClientError::Decode {
                id: id.clone(),
                source,
            }
        })
    }
}
