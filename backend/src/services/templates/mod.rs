//! # Template Service Module
//!
//! Aggregates the API endpoints for managing certificate templates. It
//! acts as a router, directing requests under `/api/templates` to the
//! handler logic in its sub-modules.
//!
//! ## Registered routes
//!
//! *   **`GET /api/templates`** — `list::process`: all templates, newest
//!     first, with their parsed field lists.
//! *   **`POST /api/templates/create`** — `create::process`: multipart
//!     upload of a background image; stores the image, inserts a new
//!     template named after the file, and returns it.
//! *   **`POST /api/templates/save`** — `save::process`: wholesale
//!     replacement of a template's field list (last writer wins).
//! *   **`POST /api/templates/assets`** — `assets::process`: multipart
//!     upload of a signature/logo image; returns the stored asset URL for
//!     the editor to attach to a new field.
//! *   **`GET /api/templates/{template_id}`** — `get::process`: one
//!     template by id.
//! *   **`DELETE /api/templates/{template_id}`** — `delete::process`:
//!     removes the template row. Generation records keep their
//!     `template_id` and fall back to an unknown name in history.

mod assets;
mod create;
mod delete;
mod get;
mod list;
mod save;

pub(crate) use get::fetch_template;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/templates";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/create", post().to(create::process))
        .route("/save", post().to(save::process))
        .route("/assets", post().to(assets::process))
        .route("/{template_id}", get().to(get::process))
        .route("/{template_id}", delete().to(delete::process))
}
