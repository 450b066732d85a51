//! Certificate generation endpoints.
//!
//! *   **`POST /api/generate`** — `single::process`: render one
//!     certificate; persists and records it, or returns the PDF bytes
//!     for an ad-hoc download when `save` is false.
//! *   **`POST /api/generate/batch`** — `batch::process`: multipart
//!     roster upload; schedules a background job and returns its id.
//! *   **`GET /api/generate/status/{job_id}`** — `status::process`:
//!     poll a batch job.

mod batch;
pub(crate) mod roster;
pub(crate) mod single;
mod status;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/generate";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(single::process))
        .route("/batch", post().to(batch::process))
        .route("/status/{job_id}", get().to(status::process))
}
