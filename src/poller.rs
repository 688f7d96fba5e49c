//! Job status polling
//!
//! Polls a job at a fixed interval until the server reports a terminal state.
//! The loop returning is the one and only cancellation point: once a
//! terminal response or an error is observed no further request is issued.
//! Requests never overlap, a slow response delays the next tick instead.

use async_trait::async_trait;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{JobState, TranscriptPair};

/// Shortest interval the timer accepts
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Source of job states, implemented by the HTTP client
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the current state of the job identified by `key`
    async fn check(&self, key: &str) -> Result<JobState, ClientError>;
}

/// Fixed-interval poll loop
#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    max_duration: Option<Duration>,
}

impl Poller {
    /// Intervals below one millisecond are raised to it
    pub fn new(interval: Duration, max_duration: Option<Duration>) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            max_duration,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.poll_interval, config.max_poll_duration)
    }

    /// Polls until the job completes, fails, or a request errors
    ///
    /// The first request is issued one interval after the call.
    pub async fn run<S>(&self, source: &S, key: &str) -> Result<TranscriptPair, ClientError>
    where
        S: StatusSource + ?Sized,
    {
        let started = Instant::now();
        let mut ticker = time::interval_at(started + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut attempt: u64 = 0;

        loop {
            ticker.tick().await;
            attempt += 1;
            debug!("Checking job {} (attempt {})", key, attempt);

            match source.check(key).await {
                Ok(JobState::Completed(pair)) => {
                    info!("Job {} completed after {} status checks", key, attempt);
                    return Ok(pair);
                }
                Ok(JobState::Failed(detail)) => {
                    warn!("Job {} failed: {}", key, detail);
                    return Err(ClientError::JobFailed(detail));
                }
                Ok(JobState::Processing(status)) => {
                    debug!("Job {} still {}", key, status);
                }
                Err(e) => {
                    warn!("Stopped polling job {}: {}", key, e);
                    return Err(e);
                }
            }

            if let Some(max) = self.max_duration {
                if started.elapsed() >= max {
                    warn!("Job {} exceeded the polling limit of {:?}", key, max);
                    return Err(ClientError::PollTimeout(max));
                }
            }
        }
    }
}
