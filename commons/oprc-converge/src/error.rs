use crate::conditions::Condition;
use crate::resource::ResourceId;

pub type ClientResult<T> = Result<T, ClientError>;

/// Failures reported by a control-plane client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("resource not found: {0}")]
    NotFound(ResourceId),

    #[error("resource already exists: {0}")]
    AlreadyExists(ResourceId),

    #[error("invalid resource {id}: {message}")]
    Invalid { id: ResourceId, message: String },

    #[error("kind not registered: {0}")]
    UnknownKind(String),

    #[error("API error ({code} {reason}): {message}")]
    Api {
        code: u16,
        reason: String,
        message: String,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("cannot decode status of {id}: {source}")]
    Decode {
        id: ResourceId,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, ClientError::AlreadyExists(_))
    }

    /// Errors that cannot clear up by asking again. Everything else is
    /// treated as transient while polling.
    pub fn is_permanent(&self) -> bool {
        matches!(self, ClientError::NotFound(_) | ClientError::UnknownKind(_))
    }
}

/// Terminal, non-ready outcomes of a readiness poll.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("polling {target} failed: {source}")]
    Failed {
        target: ResourceId,
        #[source]
        source: ClientError,
    },

    #[error(
        "{target} reported {} {}: {}",
        .condition.type_,
        .condition.status,
        .condition.reason
    )]
    ConditionFailed {
        target: ResourceId,
        condition: Condition,
    },

    #[error(
        "{target} not {condition_type}=True after {attempts} attempts{}",
        describe_last(.last_condition)
    )]
    TimedOut {
        target: ResourceId,
        condition_type: String,
        attempts: u32,
        last_condition: Option<Condition>,
        last_error: Option<String>,
    },

    #[error("polling {target} cancelled")]
    Cancelled {
        target: ResourceId,
        last_condition: Option<Condition>,
    },

    #[error("invalid poll session: {0}")]
    InvalidSession(String),
}

fn describe_last(last: &Option<Condition>) -> String {
    match last {
        Some(c) => format!(" (last: {} {}: {})", c.status, c.reason, c.message),
        None => String::new(),
    }
}

impl PollError {
    /// The last watched condition seen before the poll ended, if any.
    pub fn last_condition(&self) -> Option<&Condition> {
        match self {
            PollError::ConditionFailed { condition, .. } => Some(condition),
            PollError::TimedOut { last_condition, .. }
            | PollError::Cancelled { last_condition, .. } => {
                last_condition.as_ref()
            }
            PollError::Failed { .. } | PollError::InvalidSession(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PollError::TimedOut { .. })
    }
}
