use std::sync::Arc;

use tracing::{info, warn};

use crate::client::ControlPlaneClient;
use crate::error::ClientResult;
use crate::resource::{DesiredResource, ResourceHandle};

/// Issues exactly one create call per [`submit`](Self::submit).
///
/// There is no retry and no adopt-or-patch fallback: an existing resource
/// comes back as `ClientError::AlreadyExists` for the caller to decide on.
pub struct ResourceSubmitter<C: ?Sized> {
    client: Arc<C>,
}

impl<C: ?Sized> Clone for ResourceSubmitter<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<C> ResourceSubmitter<C>
where
    C: ControlPlaneClient + ?Sized,
{
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn submit(
        &self,
        desired: &DesiredResource,
    ) -> ClientResult<ResourceHandle> {
        match self.client.create(desired).await {
            Ok(handle) => {
                info!(
                    resource = %handle.id,
                    uid = ?handle.uid,
                    "resource created"
                );
                Ok(handle)
            }
            Err(e) => {
                warn!(resource = %desired.id(), error = %e, "create rejected");
                Err(e)
            }
        }
    }
}
