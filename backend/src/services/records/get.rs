//! Verification lookup: the endpoint behind the QR payload's
//! `/verify/<id>` links.

use actix_web::{web, Responder};
use common::model::record::GenerationRecord;
use rusqlite::params;

use super::list::row_to_record;
use crate::db;

pub async fn process(record_id: web::Path<String>) -> impl Responder {
    match get_record(&record_id).await {
        Ok(record) => actix_web::HttpResponse::Ok().json(record),
        Err(e) => actix_web::HttpResponse::NotFound().body(e),
    }
}

async fn get_record(record_id: &str) -> Result<GenerationRecord, String> {
    let conn = db::open().map_err(|e| e.to_string())?;
    let mut stmt = conn
        .prepare(
            "SELECT g.id, g.recipient_name, g.recipient_email, g.recipient_phone,
                    g.template_id, g.category, g.file_url, g.metadata, g.created_at,
                    t.name
             FROM generated_certificates g
             LEFT JOIN templates t ON t.id = g.template_id
             WHERE g.id = ?1",
        )
        .map_err(|e| e.to_string())?;
    stmt.query_row(params![record_id], row_to_record)
        .map_err(|_| "Certificate not found".to_string())
}
