use std::future::Future;
use std::sync::Arc;

use tokio::time::{Instant, sleep_until, timeout_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::ControlPlaneClient;
use crate::conditions::{Condition, ConditionStatus, find_condition};
use crate::error::{ClientResult, PollError};
use crate::predicate::{ReadinessPredicate, StatusTrue, Verdict};
use crate::resource::{ObservedStatus, ResourceId};
use crate::session::PollSession;

/// Polls a resource's status through a [`ControlPlaneClient`] until the
/// watched condition satisfies the predicate.
pub struct ReadinessPoller<C: ?Sized> {
    client: Arc<C>,
    predicate: Arc<dyn ReadinessPredicate>,
}

impl<C: ?Sized> Clone for ReadinessPoller<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            predicate: self.predicate.clone(),
        }
    }
}

impl<C> ReadinessPoller<C>
where
    C: ControlPlaneClient + ?Sized,
{
    /// Poller with the default True-only rule.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            predicate: Arc::new(StatusTrue),
        }
    }

    pub fn with_predicate(
        mut self,
        predicate: impl ReadinessPredicate + 'static,
    ) -> Self {
        self.predicate = Arc::new(predicate);
        self
    }

    pub async fn await_ready(
        &self,
        session: PollSession,
        cancel: &CancellationToken,
    ) -> Result<Condition, PollError> {
        let client = &self.client;
        await_ready_with(
            session,
            |id| async move { client.get_status(&id).await },
            self.predicate.as_ref(),
            cancel,
        )
        .await
    }
}

/// The polling loop, independent of any particular client.
///
/// The first fetch is issued immediately; afterwards one fetch per
/// interval until the predicate is satisfied or fails, a permanent fetch
/// error occurs, the deadline passes, or `cancel` fires. Fetches are never
/// overlapped. A `Satisfied` verdict while the condition is absent is
/// treated as pending, since there is no condition to hand back.
pub async fn await_ready_with<F, Fut, P>(
    mut session: PollSession,
    mut fetch: F,
    predicate: &P,
    cancel: &CancellationToken,
) -> Result<Condition, PollError>
where
    F: FnMut(ResourceId) -> Fut,
    Fut: Future<Output = ClientResult<ObservedStatus>>,
    P: ReadinessPredicate + ?Sized,
{
    let deadline = session.deadline();
    let target = session.target().clone();
    let mut last_condition: Option<Condition> = None;
    let mut last_error: Option<String> = None;

    loop {
        let attempt_started = Instant::now();
        if attempt_started >= deadline {
            return Err(timed_out(&session, last_condition, last_error));
        }
        let attempt = session.record_attempt();

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(PollError::Cancelled { target, last_condition });
            }
            res = timeout_at(deadline, fetch(target.clone())) => res,
        };
        let Ok(fetched) = fetched else {
            debug!(
                resource = %target,
                attempt,
                "fetch still in flight at deadline"
            );
            return Err(timed_out(&session, last_condition, last_error));
        };

        match fetched {
            Ok(status) => {
                last_error = None;
                let observed =
                    find_condition(&status.conditions, session.condition_type())
                        .cloned();
                let verdict = predicate.evaluate(observed.as_ref());
                debug!(
                    resource = %target,
                    attempt,
                    condition = session.condition_type(),
                    status = ?observed.as_ref().map(|c| c.status),
                    ?verdict,
                    "observed status"
                );
                if let Some(cond) = observed {
                    match verdict {
                        Verdict::Satisfied => {
                            info!(
                                resource = %target,
                                attempts = attempt,
                                elapsed = ?session.started_at().elapsed(),
                                message = %cond.message,
                                "resource ready"
                            );
                            return Ok(cond);
                        }
                        Verdict::Failed => {
                            warn!(
                                resource = %target,
                                reason = %cond.reason,
                                message = %cond.message,
                                "condition reported failure"
                            );
                            return Err(PollError::ConditionFailed {
                                target,
                                condition: cond,
                            });
                        }
                        Verdict::Pending => last_condition = Some(cond),
                    }
                } else if verdict == Verdict::Failed {
                    return Err(PollError::ConditionFailed {
                        target,
                        condition: Condition::new(
                            session.condition_type(),
                            ConditionStatus::Unknown,
                        )
                        .with_reason("ConditionAbsent"),
                    });
                }
            }
            Err(e) if e.is_permanent() => {
                warn!(
                    resource = %target,
                    attempt,
                    error = %e,
                    "permanent fetch error"
                );
                return Err(PollError::Failed { target, source: e });
            }
            Err(e) => {
                warn!(
                    resource = %target,
                    attempt,
                    error = %e,
                    "transient fetch error, will retry"
                );
                last_error = Some(e.to_string());
            }
        }

        let next = (attempt_started + session.interval()).min(deadline);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(PollError::Cancelled { target, last_condition });
            }
            _ = sleep_until(next) => {}
        }
    }
}

fn timed_out(
    session: &PollSession,
    last_condition: Option<Condition>,
    last_error: Option<String>,
) -> PollError {
    warn!(
        resource = %session.target(),
        attempts = session.attempts(),
        timeout = ?session.timeout(),
        "timed out waiting for readiness"
    );
    PollError::TimedOut {
        target: session.target().clone(),
        condition_type: session.condition_type().to_string(),
        attempts: session.attempts(),
        last_condition,
        last_error,
    }
}
