//! Outbound certificate dispatch.
//!
//! Only email needs a server leg (SMTP); WhatsApp dispatch is a deep
//! link the frontend opens itself.

pub mod email;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/dispatch";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/email", post().to(email::process))
}
