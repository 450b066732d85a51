use actix_web::{web, Responder};
use rusqlite::params;

use crate::db;

pub async fn process(template_id: web::Path<String>) -> impl Responder {
    match delete_template(&template_id).await {
        Ok(_) => actix_web::HttpResponse::Ok().body("Template deleted"),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable()
            .body(format!("Cannot delete: {}", e)),
    }
}

async fn delete_template(template_id: &str) -> Result<(), String> {
    let conn = db::open().map_err(|e| e.to_string())?;
    let deleted = conn
        .execute("DELETE FROM templates WHERE id = ?1", params![template_id])
        .map_err(|e| e.to_string())?;
    if deleted == 0 {
        return Err("Template not found".to_string());
    }
    // Generation records referencing this template survive; history shows
    // them with an unknown template name.
    Ok(())
}
