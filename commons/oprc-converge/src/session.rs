use std::time::Duration;

use tokio::time::Instant;

use crate::error::PollError;
use crate::resource::ResourceId;

/// Parameters of one await-readiness call.
///
/// The deadline is fixed when the session is created and the interval never
/// changes; the attempt counter is the only thing that moves.
#[derive(Debug, Clone)]
pub struct PollSession {
    target: ResourceId,
    condition_type: String,
    interval: Duration,
    timeout: Duration,
    started_at: Instant,
    attempts: u32,
}

impl PollSession {
    pub fn new(
        target: ResourceId,
        condition_type: impl Into<String>,
        interval: Duration,
        timeout: Duration,
    ) -> Result<Self, PollError> {
        let condition_type = condition_type.into();
        if condition_type.is_empty() {
            return Err(PollError::InvalidSession(
                "condition type must not be empty".into(),
            ));
        }
        if interval.is_zero() {
            return Err(PollError::InvalidSession(
                "poll interval must be greater than zero".into(),
            ));
        }
        if timeout.is_zero() {
            return Err(PollError::InvalidSession(
                "timeout must be greater than zero".into(),
            ));
        }
        Ok(Self {
            target,
            condition_type,
            interval,
            timeout,
            started_at: Instant::now(),
            attempts: 0,
        })
    }

    pub fn target(&self) -> &ResourceId {
        &self.target
    }

    pub fn condition_type(&self) -> &str {
        &self.condition_type
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn deadline(&self) -> Instant {
        self.started_at + self.timeout
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline()
    }

    pub(crate) fn record_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }
}
