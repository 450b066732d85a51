//! Generation-record endpoints: history listing, verification lookup,
//! and deletion.
//!
//! *   **`GET /api/records`** — `list::process`: all records, newest
//!     first, joined with their template's name.
//! *   **`GET /api/records/{record_id}`** — `get::process`: one record by
//!     verification id (the lookup behind `/verify/<id>` links).
//! *   **`DELETE /api/records/{record_id}`** — `delete::process`: removes
//!     the row. The stored document is retained for audit.

mod delete;
mod get;
mod list;

use actix_web::web::{delete, get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/records";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/{record_id}", get().to(get::process))
        .route("/{record_id}", delete().to(delete::process))
}
