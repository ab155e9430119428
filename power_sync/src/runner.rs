//! Whole-run retries and the cron trigger.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::{
    errors::PipelineError,
    pipeline::{Pipeline, RunReport},
    window::RunTrigger,
};

/// How often a failed run is started again, and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 1,
            retry_delay: Duration::from_secs(5 * 60),
        }
    }
}

impl RetryPolicy {
    /// Single attempt.
    pub fn none() -> Self {
        Self {
            retries: 0,
            retry_delay: Duration::ZERO,
        }
    }
}

/// Runs `pipeline` until it succeeds or the retries are used up.
///
/// Parameter errors are returned straight away. Otherwise the last error is
/// returned once `policy.retries` extra attempts have failed.
pub async fn run_with_retries(
    pipeline: &Pipeline,
    trigger: &RunTrigger,
    policy: RetryPolicy,
) -> Result<RunReport, PipelineError> {
    let mut attempt = 0;
    loop {
        match pipeline.run(trigger).await {
            Ok(report) => return Ok(report),
            Err(e) if e.is_retryable() && attempt < policy.retries => {
                attempt += 1;
                tracing::warn!(
                    attempt,
                    retries = policy.retries,
                    delay_secs = policy.retry_delay.as_secs(),
                    stage = e.stage(),
                    "run failed, retrying"
                );
                tokio::time::sleep(policy.retry_delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Starts a scheduler that fires a scheduled run on every `cron` tick.
///
/// Each tick uses the wall clock as its logical date. The returned scheduler
/// is already running; keep it alive and shut it down on exit.
pub async fn schedule(
    pipeline: Arc<Pipeline>,
    cron: &str,
    policy: RetryPolicy,
) -> Result<JobScheduler, JobSchedulerError> {
    let sched = JobScheduler::new().await?;

    let job = Job::new_async(cron, move |_uuid, _sched| {
        let pipeline = Arc::clone(&pipeline);
        Box::pin(async move {
            let trigger = RunTrigger::scheduled(Utc::now());
            match run_with_retries(&pipeline, &trigger, policy).await {
                Ok(report) => tracing::info!(
                    run_id = %report.run_id,
                    rows = report.rows_synced,
                    "scheduled run finished"
                ),
                Err(e) => tracing::error!(stage = e.stage(), error = %e, "scheduled run gave up"),
            }
        })
    })?;
    sched.add(job).await?;
    sched.start().await?;

    tracing::info!(cron, retries = policy.retries, "scheduler started");
    Ok(sched)
}
