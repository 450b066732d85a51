use std::collections::BTreeMap;

use actix_web::Responder;
use common::model::record::GenerationRecord;
use rusqlite::{Connection, Row};

use crate::db;

pub async fn process() -> impl Responder {
    match list_records().await {
        Ok(records) => actix_web::HttpResponse::Ok().json(records),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable()
            .body(format!("Error listing history: {}", e)),
    }
}

async fn list_records() -> Result<Vec<GenerationRecord>, String> {
    let conn = db::open().map_err(|e| e.to_string())?;
    fetch_all(&conn)
}

pub(crate) fn row_to_record(row: &Row<'_>) -> rusqlite::Result<GenerationRecord> {
    let metadata_json: String = row.get(7)?;
    let metadata: BTreeMap<String, String> =
        serde_json::from_str(&metadata_json).unwrap_or_default();
    Ok(GenerationRecord {
        id: row.get(0)?,
        recipient_name: row.get(1)?,
        recipient_email: row.get(2)?,
        recipient_phone: row.get(3)?,
        template_id: row.get(4)?,
        category: row.get(5)?,
        file_url: row.get(6)?,
        metadata,
        created_at: row.get(8)?,
        template_name: row.get(9)?,
    })
}

pub(crate) fn fetch_all(conn: &Connection) -> Result<Vec<GenerationRecord>, String> {
    let mut stmt = conn
        .prepare(
            "SELECT g.id, g.recipient_name, g.recipient_email, g.recipient_phone,
                    g.template_id, g.category, g.file_url, g.metadata, g.created_at,
                    t.name
             FROM generated_certificates g
             LEFT JOIN templates t ON t.id = g.template_id
             ORDER BY g.created_at DESC, g.id DESC",
        )
        .map_err(|e| e.to_string())?;
    let rows = stmt
        .query_map([], row_to_record)
        .map_err(|e| e.to_string())?;
    rows.collect::<Result<Vec<_>, _>>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema_on;
    use rusqlite::params;

    #[test]
    fn listing_joins_template_names_and_orders_newest_first() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema_on(&conn).unwrap();
        conn.execute(
            "INSERT INTO templates (id, name, fields) VALUES ('t1', 'Excellence Award', '[]')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO generated_certificates
                (id, recipient_name, template_id, category, file_url, metadata, created_at)
             VALUES ('r1', 'Ada', 't1', 'Default', '/files/certificates/a.pdf', '{}', '2026-01-01 10:00:00'),
                    ('r2', 'Grace', 'ghost', 'Research', '/files/certificates/b.pdf', '{\"k\":\"v\"}', '2026-01-02 10:00:00')",
            params![],
        )
        .unwrap();

        let records = fetch_all(&conn).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "r2");
        // Deleted/unknown templates surface as no name.
        assert_eq!(records[0].template_name, None);
        assert_eq!(records[1].template_name.as_deref(), Some("Excellence Award"));
        assert_eq!(records[0].metadata.get("k").map(String::as_str), Some("v"));
    }
}
