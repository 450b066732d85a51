//! Retrieval of a single template, fields included.

use actix_web::web;
use common::model::template::Template;
use rusqlite::{params, Connection};

use crate::db;

pub async fn process(template_id: web::Path<String>) -> impl actix_web::Responder {
    match get_template(&template_id).await {
        Ok(template) => actix_web::HttpResponse::Ok().json(template),
        Err(e) => actix_web::HttpResponse::NotFound().body(format!("Error retrieving template: {}", e)),
    }
}

pub async fn get_template(template_id: &str) -> Result<Template, String> {
    let conn = db::open().map_err(|e| e.to_string())?;
    fetch_template(&conn, template_id)
}

/// Load a template row and deserialize its JSON field column.
pub(crate) fn fetch_template(conn: &Connection, template_id: &str) -> Result<Template, String> {
    let mut stmt = conn
        .prepare("SELECT id, name, image_url, fields, created_at FROM templates WHERE id = ?1")
        .map_err(|e| e.to_string())?;
    let template = stmt
        .query_row(params![template_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(|_| "Template not found".to_string())?;

    let (id, name, image_url, fields_json, created_at) = template;
    let fields = serde_json::from_str(&fields_json).map_err(|e| e.to_string())?;
    Ok(Template {
        id,
        name,
        image_url,
        fields,
        created_at: Some(created_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema_on;

    #[test]
    fn saved_field_lists_round_trip_identically() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema_on(&conn).unwrap();

        let mut template = Template {
            id: "t1".to_string(),
            name: "Excellence Award".to_string(),
            image_url: Some("/files/templates/bg.png".to_string()),
            fields: Vec::new(),
            created_at: None,
        };
        template.add_field("f1", "Recipient Name");
        template.add_field("f2", "Category");
        template.add_field("f3", common::model::field::QR_FIELD_LABEL);

        conn.execute(
            "INSERT INTO templates (id, name, image_url, fields) VALUES (?1, ?2, ?3, ?4)",
            params![
                template.id,
                template.name,
                template.image_url,
                serde_json::to_string(&template.fields).unwrap()
            ],
        )
        .unwrap();

        let loaded = fetch_template(&conn, "t1").unwrap();
        assert_eq!(loaded.fields, template.fields);
        assert_eq!(loaded.name, template.name);
        assert!(loaded.created_at.is_some());
    }

    #[test]
    fn missing_templates_are_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema_on(&conn).unwrap();
        assert!(fetch_template(&conn, "nope").is_err());
    }
}
