//! One-shot deferred comment scheduling
//!
//! `JobScheduler` keeps an in-memory table of jobs, each a single comment
//! to be posted at a fixed time. A background worker wakes on a tick,
//! claims every job whose time has passed, and posts it through the
//! submitter. A job fires at most once: the claim happens under the table
//! lock, so a cancel racing the fire either wins (job cancelled, never
//! posted) or loses (job already claimed, cancel reports not-found).
//! Failed fires are logged and the job stays finished; there is no retry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::ScheduleError;
use crate::submit::ContentSubmitter;
use crate::types::{JobStatus, ScheduledJob};

/// Seconds between worker wake-ups when none is configured.
pub const DEFAULT_TICK_SECONDS: u64 = 60;

/// In-memory scheduler for deferred comments.
///
/// Cloning is cheap and clones share the same job table and worker.
#[derive(Clone)]
pub struct JobScheduler {
    submitter: ContentSubmitter,
    jobs: Arc<Mutex<Vec<ScheduledJob>>>,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
    shutdown: Arc<AtomicBool>,
    tick_seconds: u64,
}

impl JobScheduler {
    /// Create a scheduler with the default tick interval.
    pub fn new(submitter: ContentSubmitter) -> Self {
        Self::with_tick(submitter, DEFAULT_TICK_SECONDS)
    }

    /// Create a scheduler that wakes every `tick_seconds`.
    pub fn with_tick(submitter: ContentSubmitter, tick_seconds: u64) -> Self {
        Self {
            submitter,
            jobs: Arc::new(Mutex::new(Vec::new())),
            worker: Arc::new(Mutex::new(None)),
            shutdown: Arc::new(AtomicBool::new(false)),
            tick_seconds: tick_seconds.max(1),
        }
    }

    /// Register a comment to be posted at `fire_at`.
    ///
    /// The first successful call starts the background worker. The target
    /// URL is not validated here; a malformed URL surfaces when the job
    /// fires and is logged there.
    ///
    /// # Errors
    ///
    /// Returns `EmptyComment` for blank text and `Shutdown` once
    /// [`shutdown`](Self::shutdown) has been called.
    pub fn schedule(
        &self,
        account_ordinal: usize,
        target_url: &str,
        comment_text: &str,
        fire_at: DateTime<Utc>,
    ) -> std::result::Result<Uuid, ScheduleError> {
        if self.shutdown.load(Ordering::Relaxed) {
            return Err(ScheduleError::Shutdown);
        }
        if comment_text.trim().is_empty() {
            return Err(ScheduleError::EmptyComment);
        }

        let job = ScheduledJob::new(target_url, comment_text, account_ordinal, fire_at);
        let id = job.id;
        self.jobs.lock().unwrap().push(job);
        info!(
            job_id = %id,
            ordinal = account_ordinal,
            fire_at = %fire_at,
            "comment scheduled"
        );

        self.ensure_worker();
        Ok(id)
    }

    /// Cancel a pending job.
    ///
    /// Returns `true` when the job was still pending and is now cancelled.
    /// Returns `false` for unknown ids and for jobs that already fired or
    /// were cancelled before.
    pub fn cancel(&self, id: Uuid) -> bool {
        let mut jobs = self.jobs.lock().unwrap();
        match jobs
            .iter_mut()
            .find(|job| job.id == id && job.status == JobStatus::Pending)
        {
            Some(job) => {
                job.status = JobStatus::Cancelled;
                info!(job_id = %id, "job cancelled");
                true
            }
            None => false,
        }
    }

    /// Snapshot of jobs still waiting to fire, in schedule order.
    pub fn list_pending(&self) -> Vec<ScheduledJob> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|job| job.status == JobStatus::Pending)
            .cloned()
            .collect()
    }

    /// Fire every due job once.
    ///
    /// The worker calls this on each tick; it is public so a caller can
    /// drive the scheduler manually (a daemon's run-once mode, tests).
    pub async fn run_once(&self) {
        let due = {
            let mut jobs = self.jobs.lock().unwrap();
            let now = Utc::now();
            let mut claimed = Vec::new();
            for job in jobs.iter_mut() {
                if job.status == JobStatus::Pending && job.fire_at <= now {
                    job.status = JobStatus::Completed;
                    claimed.push(job.clone());
                }
            }
            claimed
        };

        for job in due {
            match self
                .submitter
                .comment(job.account_ordinal, &job.target_url, &job.comment_text)
                .await
            {
                Ok(published) => {
                    info!(
                        job_id = %job.id,
                        comment_id = %published.id,
                        ordinal = job.account_ordinal,
                        "scheduled comment posted"
                    );
                }
                Err(e) => {
                    error!(
                        job_id = %job.id,
                        ordinal = job.account_ordinal,
                        error = %e,
                        "scheduled comment failed"
                    );
                }
            }
        }
    }

    /// Stop the worker and refuse further scheduling.
    ///
    /// Pending jobs stay in the table but will never fire. The worker
    /// notices the flag within a second.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    fn ensure_worker(&self) {
        let mut worker = self.worker.lock().unwrap();
        if worker.is_some() {
            return;
        }

        let scheduler = self.clone();
        let tick = self.tick_seconds;
        *worker = Some(tokio::spawn(async move {
            info!(tick_seconds = tick, "scheduler worker started");
            loop {
                if scheduler.shutdown.load(Ordering::Relaxed) {
                    info!("scheduler worker stopping");
                    break;
                }

                scheduler.run_once().await;

                // Sleep in one-second slices so shutdown is prompt.
                for _ in 0..tick {
                    if scheduler.shutdown.load(Ordering::Relaxed) {
                        break;
                    }
                    sleep(Duration::from_secs(1)).await;
                }
            }
        }));
    }
}
