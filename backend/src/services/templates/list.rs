use actix_web::Responder;
use common::model::template::Template;
use rusqlite::Connection;

use crate::db;

pub async fn process() -> impl Responder {
    match list_templates().await {
        Ok(templates) => actix_web::HttpResponse::Ok().json(templates),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable()
            .body(format!("Error listing templates: {}", e)),
    }
}

async fn list_templates() -> Result<Vec<Template>, String> {
    let conn = db::open().map_err(|e| e.to_string())?;
    fetch_all(&conn)
}

pub(crate) fn fetch_all(conn: &Connection) -> Result<Vec<Template>, String> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, image_url, fields, created_at FROM templates ORDER BY created_at DESC, id DESC",
        )
        .map_err(|e| e.to_string())?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(|e| e.to_string())?;

    let mut templates = Vec::new();
    for row in rows {
        let (id, name, image_url, fields_json, created_at) = row.map_err(|e| e.to_string())?;
        // A row with an unreadable field column would otherwise poison the
        // whole listing; skip it and keep the library usable.
        let fields = match serde_json::from_str(&fields_json) {
            Ok(fields) => fields,
            Err(e) => {
                log::warn!("template {} has an unreadable field list: {}", id, e);
                continue;
            }
        };
        templates.push(Template {
            id,
            name,
            image_url,
            fields,
            created_at: Some(created_at),
        });
    }
    Ok(templates)
}
