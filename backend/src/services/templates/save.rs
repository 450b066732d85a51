use actix_web::{web, Responder};
use common::requests::SaveFieldsRequest;
use rusqlite::{params, Connection};

use crate::db;

pub async fn process(payload: web::Json<SaveFieldsRequest>) -> impl Responder {
    match save_fields(&payload).await {
        Ok(_) => actix_web::HttpResponse::Ok().body("Template saved"),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable()
            .body(format!("Error saving template: {}", e)),
    }
}

pub async fn save_fields(payload: &SaveFieldsRequest) -> Result<(), String> {
    if payload.template_id.trim().is_empty() {
        return Err("Template id must not be empty".to_string());
    }
    let conn = db::open().map_err(|e| e.to_string())?;
    replace_fields(&conn, &payload.template_id, &payload.fields)
}

/// Wholesale replacement of the stored field list. No merge with
/// concurrent editors: the last writer wins.
pub(crate) fn replace_fields(
    conn: &Connection,
    template_id: &str,
    fields: &[common::model::field::Field],
) -> Result<(), String> {
    // Re-establish the coordinate/size invariants at the trust boundary.
    let mut fields = fields.to_vec();
    for field in &mut fields {
        field.clamp();
    }
    let json = serde_json::to_string(&fields).map_err(|e| e.to_string())?;

    let updated = conn
        .execute(
            "UPDATE templates SET fields = ?1 WHERE id = ?2",
            params![json, template_id],
        )
        .map_err(|e| e.to_string())?;
    if updated == 0 {
        return Err("Template not found".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema_on;
    use crate::services::templates::fetch_template;
    use common::model::field::FieldPatch;
    use common::model::template::Template;

    fn seeded_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema_on(&conn).unwrap();
        conn.execute(
            "INSERT INTO templates (id, name, fields) VALUES ('t1', 'Excellence Award', '[]')",
            [],
        )
        .unwrap();
        conn
    }

    #[test]
    fn replace_is_wholesale() {
        let conn = seeded_conn();
        let mut template = Template {
            id: "t1".to_string(),
            name: "Excellence Award".to_string(),
            image_url: None,
            fields: Vec::new(),
            created_at: None,
        };
        template.add_field("f1", "Recipient Name");
        replace_fields(&conn, "t1", &template.fields).unwrap();

        // Second save without f1 removes it: no merging.
        template.remove_field("f1");
        template.add_field("f2", "Category");
        replace_fields(&conn, "t1", &template.fields).unwrap();

        let loaded = fetch_template(&conn, "t1").unwrap();
        assert_eq!(loaded.fields.len(), 1);
        assert_eq!(loaded.fields[0].label, "Category");
    }

    #[test]
    fn out_of_range_coordinates_are_clamped_on_save() {
        let conn = seeded_conn();
        let mut template = Template {
            id: "t1".to_string(),
            name: "x".to_string(),
            image_url: None,
            fields: Vec::new(),
            created_at: None,
        };
        template.add_field("f1", "Recipient Name");
        // Bypass update_field clamping on purpose.
        template.fields[0].x = 250.0;
        template.fields[0].font_size = 1;
        replace_fields(&conn, "t1", &template.fields).unwrap();

        let loaded = fetch_template(&conn, "t1").unwrap();
        assert_eq!(loaded.fields[0].x, 100.0);
        assert_eq!(loaded.fields[0].font_size, 8);
        // But patched updates clamp at the source too.
        let mut t = loaded;
        t.update_field("f1", &FieldPatch { y: Some(-3.0), ..FieldPatch::default() });
        assert_eq!(t.fields[0].y, 0.0);
    }

    #[test]
    fn saving_to_a_missing_template_fails() {
        let conn = seeded_conn();
        assert!(replace_fields(&conn, "ghost", &[]).is_err());
    }
}
