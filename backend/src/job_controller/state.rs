//! Shared state for long-running background jobs (batch generation).
//!
//! `JobsState` is injected into the Actix application state in `main.rs`.
//! Workers report progress by sending `JobUpdate` messages through the
//! MPSC channel; the `start_job_updater` task drains the channel into the
//! shared map, which the status endpoint reads.

use common::jobs::JobStatus;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// Thread-safe container for the status of all background jobs.
#[derive(Clone)]
pub struct JobsState {
    /// Job id → current status; the single source of truth polled by
    /// `GET /api/generate/status/{job_id}`.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,
    /// Sender used by workers (including blocking threads, via
    /// `blocking_send`) to push status updates without holding the lock.
    pub tx: mpsc::Sender<JobUpdate>,
}

#[derive(Debug)]
pub struct JobUpdate {
    pub job_id: String,
    pub status: JobStatus,
}

/// Drains `JobUpdate` messages into the shared map. Spawned once from
/// `main.rs` and runs for the lifetime of the server.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut jobs = state.jobs.write().await;
        jobs.insert(update.job_id, update.status);
    }
}
