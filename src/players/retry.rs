use std::fmt;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::game::rules::RuleViolation;
use crate::players::base::ProviderError;

/// Why one attempt at a decision was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error(transparent)]
    Rule(#[from] RuleViolation),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Action,
    Discard,
    Payment,
    Negation,
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Request::Action => "action",
            Request::Discard => "discard",
            Request::Payment => "payment",
            Request::Negation => "negation",
        };
        f.write_str(label)
    }
}

/// One retry policy for every call out to a decision provider. Rule
/// violations are retried immediately; provider failures back off first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub negation_attempts: u32,
    pub payment_attempts: u32,
    pub base_backoff_ms: u64,
    pub backoff_multiplier: u32,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            negation_attempts: 3,
            payment_attempts: 3,
            base_backoff_ms: 0,
            backoff_multiplier: 2,
            max_backoff_ms: 1000,
        }
    }
}

impl RetryPolicy {
    pub fn attempts_for(&self, request: Request) -> u32 {
        let attempts = match request {
            Request::Action | Request::Discard => self.max_attempts,
            Request::Payment => self.payment_attempts,
            Request::Negation => self.negation_attempts,
        };
        attempts.max(1)
    }

    /// Delay before retrying after the `failures`-th provider failure.
    pub fn backoff(&self, failures: u32) -> Duration {
        let factor = (self.backoff_multiplier.max(1) as u64).saturating_pow(failures);
        let millis = self
            .base_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(millis)
    }

    /// Calls `attempt` with 1, 2, ... until it succeeds or the attempts for
    /// `request` run out, returning the last rejection in that case.
    pub fn run<T, F>(&self, request: Request, mut attempt: F) -> Result<T, Rejection>
    where
        F: FnMut(u32) -> Result<T, Rejection>,
    {
        let attempts = self.attempts_for(request);
        let mut provider_failures = 0;
        let mut current = 1;
        loop {
            match attempt(current) {
                Ok(value) => return Ok(value),
                Err(rejection) => {
                    warn!(%request, attempt = current, %rejection, "decision rejected");
                    if current >= attempts {
                        return Err(rejection);
                    }
                    if let Rejection::Provider(_) = rejection {
                        let delay = self.backoff(provider_failures);
                        provider_failures += 1;
                        if !delay.is_zero() {
                            thread::sleep(delay);
                        }
                    }
                    current += 1;
                }
            }
        }
    }
}
