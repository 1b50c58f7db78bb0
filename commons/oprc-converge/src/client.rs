use async_trait::async_trait;

use crate::error::ClientResult;
use crate::resource::{
    DesiredResource, ObservedStatus, ResourceHandle, ResourceId,
};

/// The two remote operations the submit/await protocol needs.
///
/// Implementations are shared between concurrent poll sessions, so they
/// must be usable through `&self` from many tasks at once.
#[async_trait]
pub trait ControlPlaneClient: Send + Sync {
    /// Durably register a resource. Must report a conflicting identity as
    /// [`ClientError::AlreadyExists`](crate::ClientError::AlreadyExists).
    async fn create(
        &self,
        desired: &DesiredResource,
    ) -> ClientResult<ResourceHandle>;

    /// Fetch the current status of a resource. Must report a missing
    /// object as [`ClientError::NotFound`](crate::ClientError::NotFound).
    async fn get_status(&self, id: &ResourceId) -> ClientResult<ObservedStatus>;
}
