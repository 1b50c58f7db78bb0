//! Submit a desired resource to a control plane and wait for it to report a
//! readiness condition within a bounded time.

pub mod client;
pub mod conditions;
pub mod error;
pub mod poller;
pub mod predicate;
pub mod registry;
pub mod resource;
pub mod session;
pub mod submit;

#[cfg(feature = "kube")]
pub mod kube_client;

#[cfg(feature = "memory")]
pub mod memory;

pub use client::ControlPlaneClient;
pub use conditions::{
    Condition, ConditionStatus, READY_CONDITION, find_condition,
    is_condition_false, is_condition_true,
};
pub use error::{ClientError, ClientResult, PollError};
pub use poller::{ReadinessPoller, await_ready_with};
pub use predicate::{FailOnReasons, ReadinessPredicate, StatusTrue, Verdict};
pub use registry::{KindInfo, KindRegistry};
pub use resource::{DesiredResource, ObservedStatus, ResourceHandle, ResourceId};
pub use session::PollSession;
pub use submit::ResourceSubmitter;

#[cfg(feature = "kube")]
pub use kube_client::KubeControlPlane;

#[cfg(feature = "memory")]
pub use memory::MemoryControlPlane;

pub use tokio_util::sync::CancellationToken;
