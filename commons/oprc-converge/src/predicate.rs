use crate::conditions::{Condition, ConditionStatus};

/// What a predicate concluded about the watched condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Readiness reached; stop polling successfully.
    Satisfied,
    /// Not there yet; poll again.
    Pending,
    /// The resource will not converge on its own; stop polling.
    Failed,
}

/// Decides when the watched condition counts as ready.
///
/// `None` means the condition is absent from the latest status.
pub trait ReadinessPredicate: Send + Sync {
    fn evaluate(&self, condition: Option<&Condition>) -> Verdict;
}

impl<F> ReadinessPredicate for F
where
    F: Fn(Option<&Condition>) -> Verdict + Send + Sync,
{
    fn evaluate(&self, condition: Option<&Condition>) -> Verdict {
        self(condition)
    }
}

/// Default rule: only `True` is ready. `False`, `Unknown` and absent all
/// keep polling.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusTrue;

impl ReadinessPredicate for StatusTrue {
    fn evaluate(&self, condition: Option<&Condition>) -> Verdict {
        match condition {
            Some(c) if c.is_true() => Verdict::Satisfied,
            _ => Verdict::Pending,
        }
    }
}

/// `True` is ready; `False` with one of the listed reasons (e.g. Flux's
/// `Stalled`-style reasons) fails the poll instead of waiting it out.
#[derive(Debug, Clone, Default)]
pub struct FailOnReasons {
    reasons: Vec<String>,
}

impl FailOnReasons {
    pub fn new<I, S>(reasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reasons: reasons.into_iter().map(Into::into).collect(),
        }
    }
}

impl ReadinessPredicate for FailOnReasons {
    fn evaluate(&self, condition: Option<&Condition>) -> Verdict {
        match condition {
            Some(c) if c.is_true() => Verdict::Satisfied,
            Some(c)
                if c.status == ConditionStatus::False
                    && self.reasons.iter().any(|r| *r == c.reason) =>
            {
                Verdict::Failed
            }
            _ => Verdict::Pending,
        }
    }
}
