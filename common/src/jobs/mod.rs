use serde::{Deserialize, Serialize};

/// Lifecycle of a background batch job, polled by the frontend.
///
/// `Completed` carries the JSON-serialized
/// [`crate::model::batch::BatchReport`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    InProgress { current: u32, total: u32 },
    Completed(String),
    Failed(String),
}
