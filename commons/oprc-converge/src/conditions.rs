use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Condition type that Flux and most Kubernetes controllers use to signal
/// that a resource has converged.
pub const READY_CONDITION: &str = "Ready";

/// K8s-style status condition as published under `status.conditions`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: ConditionStatus,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
    #[serde(
        rename = "lastTransitionTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_transition_time: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionStatus::True => write!(f, "True"),
            ConditionStatus::False => write!(f, "False"),
            ConditionStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Condition {
    pub fn new(type_: impl Into<String>, status: ConditionStatus) -> Self {
        Self {
            type_: type_.into(),
            status,
            reason: String::new(),
            message: String::new(),
            last_transition_time: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_transition_time(mut self, at: DateTime<Utc>) -> Self {
        self.last_transition_time = Some(at);
        self
    }

    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }
}

/// Look up a condition by type. Lookups never depend on list position.
pub fn find_condition<'a>(
    conditions: &'a [Condition],
    type_: &str,
) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.type_ == type_)
}

/// `true` only when the condition is present and its status is `True`.
pub fn is_condition_true(conditions: &[Condition], type_: &str) -> bool {
    is_condition_present_and_equal(conditions, type_, ConditionStatus::True)
}

/// `true` only when the condition is present and its status is `False`.
pub fn is_condition_false(conditions: &[Condition], type_: &str) -> bool {
    is_condition_present_and_equal(conditions, type_, ConditionStatus::False)
}

pub fn is_condition_present_and_equal(
    conditions: &[Condition],
    type_: &str,
    status: ConditionStatus,
) -> bool {
    find_condition(conditions, type_)
        .map(|c| c.status == status)
        .unwrap_or(false)
}

/// Upsert `incoming` by type, keeping at most one entry per type.
///
/// The existing `lastTransitionTime` survives when the status did not
/// change; a transition without a timestamp is stamped with `now`.
/// Returns `true` when the list changed.
pub fn set_condition(
    conditions: &mut Vec<Condition>,
    mut incoming: Condition,
) -> bool {
    let Some(existing) =
        conditions.iter_mut().find(|c| c.type_ == incoming.type_)
    else {
        if incoming.last_transition_time.is_none() {
            incoming.last_transition_time = Some(Utc::now());
        }
        conditions.push(incoming);
        return true;
    };

    if existing.status == incoming.status {
        incoming.last_transition_time = existing.last_transition_time;
    } else if incoming.last_transition_time.is_none() {
        incoming.last_transition_time = Some(Utc::now());
    }
    if *existing == incoming {
        return false;
    }
    *existing = incoming;
    true
}

/// Drop the condition of the given type. Returns `true` when one was removed.
pub fn remove_condition(conditions: &mut Vec<Condition>, type_: &str) -> bool {
    let before = conditions.len();
    conditions.retain(|c| c.type_ != type_);
    conditions.len() != before
}
