use actix_web::{web, Responder};
use rusqlite::params;

use crate::db;

pub async fn process(record_id: web::Path<String>) -> impl Responder {
    match delete_record(&record_id).await {
        Ok(_) => actix_web::HttpResponse::Ok().body("Record deleted"),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable().body(e),
    }
}

async fn delete_record(record_id: &str) -> Result<(), String> {
    let conn = db::open().map_err(|e| e.to_string())?;
    let deleted = conn
        .execute(
            "DELETE FROM generated_certificates WHERE id = ?1",
            params![record_id],
        )
        .map_err(|e| e.to_string())?;
    if deleted == 0 {
        return Err("Record not found".to_string());
    }
    // The stored document is kept on purpose: verification links that
    // were already dispatched keep resolving, and files stay auditable.
    Ok(())
}
