use crate::admission::ImagePayload;
use crate::error::AnalysisError;
use crate::providers::{ProviderError, VisionProvider};
use log::{debug, error, warn};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

/// How a remote call is retried: per-attempt timeout, attempt cap and the
/// base unit of the exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    /// Total attempts including the first one, never zero
    pub max_attempts: u32,
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    pub fn new(timeout: Duration, max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            timeout,
            max_attempts: max_attempts.max(1),
            backoff_unit,
        }
    }

    /// Delay inserted after failed attempt `attempt` (1-based): `unit * 2^(attempt - 1)`
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.backoff_unit.saturating_mul(factor)
    }

    /// Sum of every delay slept when all attempts fail
    pub fn total_backoff(&self) -> Duration {
        (1..self.max_attempts).map(|a| self.backoff_after(a)).sum()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(30), 3, Duration::from_secs(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    TimedOut(Duration),
    Failed(String),
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptOutcome::Success => write!(f, "succeeded"),
            AttemptOutcome::TimedOut(limit) => write!(f, "timed out after {:?}", limit),
            AttemptOutcome::Failed(cause) => write!(f, "failed: {}", cause),
        }
    }
}

/// Record of one attempt, kept only for the duration of a single invocation
#[derive(Debug, Clone)]
pub struct InvocationAttempt {
    pub attempt_number: u32,
    pub started_at: Instant,
    pub outcome: AttemptOutcome,
}

impl fmt::Display for InvocationAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempt {} {} ({:?} elapsed)",
            self.attempt_number,
            self.outcome,
            self.started_at.elapsed()
        )
    }
}

/// Every attempt failed
#[derive(Debug, Clone)]
pub struct RetryExhausted {
    pub attempts: Vec<InvocationAttempt>,
}

impl RetryExhausted {
    pub fn attempt_count(&self) -> u32 {
        self.attempts.len() as u32
    }

    /// Cause recorded by the final attempt
    pub fn last_cause(&self) -> String {
        match self.attempts.last().map(|attempt| &attempt.outcome) {
            Some(AttemptOutcome::TimedOut(limit)) => {
                format!("Model API timeout after {} seconds", limit.as_secs_f64())
            }
            Some(AttemptOutcome::Failed(cause)) => cause.clone(),
            Some(AttemptOutcome::Success) | None => "All retry attempts failed".to_string(),
        }
    }
}

impl fmt::Display for RetryExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempt(s) failed, last: {}",
            self.attempt_count(),
            self.last_cause()
        )
    }
}

/// Run `operation` until it succeeds, racing each attempt against
/// `policy.timeout` and sleeping `policy.backoff_after(n)` between attempts.
///
/// The operation receives the 1-based attempt number. Dropping the returned
/// future cancels the in-flight attempt or the pending backoff sleep.
pub async fn retry_with_timeout<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, RetryExhausted>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut attempts = Vec::with_capacity(policy.max_attempts as usize);

    for attempt in 1..=policy.max_attempts {
        debug!("Calling model (attempt {}/{})", attempt, policy.max_attempts);
        let started_at = Instant::now();

        let outcome = match timeout(policy.timeout, operation(attempt)).await {
            Ok(Ok(value)) => {
                let record = InvocationAttempt {
                    attempt_number: attempt,
                    started_at,
                    outcome: AttemptOutcome::Success,
                };
                debug!("{}", record);
                return Ok(value);
            }
            Ok(Err(e)) => {
                warn!(
                    "Error on attempt {}/{}: {}",
                    attempt, policy.max_attempts, e
                );
                AttemptOutcome::Failed(e.to_string())
            }
            Err(_) => {
                warn!(
                    "Timeout on attempt {}/{} after {:?}",
                    attempt, policy.max_attempts, policy.timeout
                );
                AttemptOutcome::TimedOut(policy.timeout)
            }
        };

        attempts.push(InvocationAttempt {
            attempt_number: attempt,
            started_at,
            outcome,
        });

        // Sleep only if we need to retry
        if attempt < policy.max_attempts {
            let delay = policy.backoff_after(attempt);
            debug!("Waiting {:?} before retry", delay);
            sleep(delay).await;
        }
    }

    Err(RetryExhausted { attempts })
}

/// Ask `provider` for a reply under `policy`.
///
/// An empty (or whitespace-only) reply counts as a failed attempt. Returns the
/// trimmed text of the first non-empty reply, or
/// [`AnalysisError::RemoteUnavailable`] once every attempt has failed.
pub async fn invoke(
    provider: &dyn VisionProvider,
    prompt: &str,
    image: &ImagePayload,
    policy: &RetryPolicy,
) -> Result<String, AnalysisError> {
    let result = retry_with_timeout(policy, |_| async move {
        let text = provider.generate(prompt, image).await?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok::<String, ProviderError>(trimmed.to_string())
    })
    .await;

    result.map_err(|exhausted| {
        error!(
            "{} ({}) unavailable: {}",
            provider.provider_name(),
            provider.model(),
            exhausted
        );
        AnalysisError::RemoteUnavailable {
            attempts: exhausted.attempt_count(),
            cause: exhausted.last_cause(),
        }
    })
}
