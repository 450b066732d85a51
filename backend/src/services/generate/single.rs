//! Single-certificate generation.
//!
//! The pipeline is strictly ordered: allocate the verification id, render
//! the bitmap (which embeds that id in the QR payload), export the PDF,
//! upload it, and only then write the generation record. A failure at any
//! step aborts before the record insert, so no record ever points at a
//! missing file.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use actix_web::{web, HttpResponse, Responder};
use common::model::record::{derive_category, derive_recipient_name};
use common::model::template::Template;
use common::requests::{ContactInfo, GenerateRequest, GenerateResponse};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::render::{compose::compose, pdf::export_pdf, RenderJob};
use crate::services::templates::fetch_template;
use crate::storage::{self, Bucket};
use crate::{config, db};

pub(crate) enum GenerateOutcome {
    Persisted { record_id: String, file_url: String },
    Download { filename: String, bytes: Vec<u8> },
}

pub(crate) async fn process(payload: web::Json<GenerateRequest>) -> impl Responder {
    let req = payload.into_inner();
    let blocking = web::block(move || generate_blocking(req)).await;
    match blocking {
        Ok(Ok(GenerateOutcome::Persisted { record_id, file_url })) => {
            HttpResponse::Ok().json(GenerateResponse {
                record_id,
                file_url: Some(file_url),
            })
        }
        Ok(Ok(GenerateOutcome::Download { filename, bytes })) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", filename),
            ))
            .body(bytes),
        Ok(Err(e)) => HttpResponse::InternalServerError().body(e),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

fn generate_blocking(req: GenerateRequest) -> Result<GenerateOutcome, String> {
    let conn = db::open().map_err(|e| e.to_string())?;
    let template = fetch_template(&conn, &req.template_id)?;
    generate_certificate(&conn, &template, req.values, &req.contact, req.save)
}

/// Render one certificate and either persist it (upload + record) or hand
/// the bytes back for download.
pub(crate) fn generate_certificate(
    conn: &Connection,
    template: &Template,
    values: HashMap<String, String>,
    contact: &ContactInfo,
    save: bool,
) -> Result<GenerateOutcome, String> {
    let verification_id = Uuid::new_v4().to_string();
    let job = RenderJob::new(template.clone(), values.clone(), verification_id.clone());
    let bitmap = compose(&job).map_err(|e| e.to_string())?;
    let bytes = export_pdf(&bitmap, job.scale).map_err(|e| e.to_string())?;

    if !save {
        let name = derive_recipient_name(&template.fields, &values);
        return Ok(GenerateOutcome::Download {
            filename: format!("{}.pdf", storage::sanitize_filename(&name)),
            bytes,
        });
    }

    let (record_id, file_url) = persist_document(
        conn,
        &config::data_dir(),
        template,
        &values,
        contact,
        &verification_id,
        &bytes,
    )?;
    Ok(GenerateOutcome::Persisted { record_id, file_url })
}

/// Upload the rendered document and write its generation record, in that
/// order.
pub(crate) fn persist_document(
    conn: &Connection,
    storage_root: &Path,
    template: &Template,
    values: &HashMap<String, String>,
    contact: &ContactInfo,
    verification_id: &str,
    pdf_bytes: &[u8],
) -> Result<(String, String), String> {
    let recipient_name = derive_recipient_name(&template.fields, values);
    let category = derive_category(&template.fields, values);
    let short_id = verification_id.get(..8).unwrap_or(verification_id);
    let filename = format!("cert_{}_{}.pdf", short_id, recipient_name);

    let file_url = storage::put_in(storage_root, Bucket::Certificates, &filename, pdf_bytes)?;

    let mut metadata = BTreeMap::new();
    for field in &template.fields {
        if let Some(value) = values.get(&field.id) {
            metadata.insert(field.label.clone(), value.clone());
        }
    }
    if !contact.email.trim().is_empty() {
        metadata.insert("recipient_email".to_string(), contact.email.trim().to_string());
    }
    if !contact.phone.trim().is_empty() {
        metadata.insert("recipient_phone".to_string(), contact.phone.trim().to_string());
    }
    let metadata_json = serde_json::to_string(&metadata).map_err(|e| e.to_string())?;

    conn.execute(
        "INSERT INTO generated_certificates
            (id, recipient_name, recipient_email, recipient_phone, template_id, category, file_url, metadata)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            verification_id,
            recipient_name,
            non_empty(&contact.email),
            non_empty(&contact.phone),
            template.id,
            category,
            file_url,
            metadata_json,
        ],
    )
    .map_err(|e| e.to_string())?;

    Ok((verification_id.to_string(), file_url))
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema_on;

    fn award_template() -> Template {
        let mut template = Template {
            id: "t1".to_string(),
            name: "Excellence Award".to_string(),
            image_url: None,
            fields: Vec::new(),
            created_at: None,
        };
        template.add_field("f1", "Recipient Name");
        template.add_field("f2", "Category");
        template.add_field("f3", common::model::field::QR_FIELD_LABEL);
        template
    }

    fn record_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM generated_certificates", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn excellence_award_scenario_writes_the_expected_record() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema_on(&conn).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let template = award_template();

        let mut values = HashMap::new();
        values.insert("f1".to_string(), "Jane Doe".to_string());
        values.insert("f2".to_string(), "Innovation".to_string());
        let contact = ContactInfo {
            email: "jane@x.org".to_string(),
            phone: String::new(),
        };

        let (record_id, file_url) = persist_document(
            &conn,
            dir.path(),
            &template,
            &values,
            &contact,
            "aaaabbbb-cccc-dddd-eeee-ffff00001111",
            b"%PDF-fake",
        )
        .unwrap();

        assert_eq!(record_id, "aaaabbbb-cccc-dddd-eeee-ffff00001111");
        let (name, category, email, phone, stored_url, metadata_json): (
            String,
            String,
            Option<String>,
            Option<String>,
            String,
            String,
        ) = conn
            .query_row(
                "SELECT recipient_name, category, recipient_email, recipient_phone, file_url, metadata
                 FROM generated_certificates WHERE id = ?1",
                params![record_id],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?)),
            )
            .unwrap();
        assert_eq!(name, "Jane Doe");
        assert_eq!(category, "Innovation");
        assert_eq!(email.as_deref(), Some("jane@x.org"));
        assert_eq!(phone, None);
        assert_eq!(stored_url, file_url);

        // The uploaded file really exists where the record points.
        let path = storage::resolve_in(dir.path(), &file_url).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF-fake");

        let metadata: BTreeMap<String, String> = serde_json::from_str(&metadata_json).unwrap();
        assert_eq!(metadata["Recipient Name"], "Jane Doe");
        assert_eq!(metadata["recipient_email"], "jane@x.org");
    }

    #[test]
    fn category_defaults_when_the_template_has_no_category_value() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema_on(&conn).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let template = award_template();

        let mut values = HashMap::new();
        values.insert("f1".to_string(), "Jane Doe".to_string());
        let (record_id, _) = persist_document(
            &conn,
            dir.path(),
            &template,
            &values,
            &ContactInfo::default(),
            "11112222-3333-4444-5555-666677778888",
            b"%PDF-fake",
        )
        .unwrap();
        let category: String = conn
            .query_row(
                "SELECT category FROM generated_certificates WHERE id = ?1",
                params![record_id],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(category, "Default");
    }

    #[test]
    fn a_failed_upload_leaves_no_record_behind() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema_on(&conn).unwrap();
        // Point storage at a path that is a file, so the upload fails.
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let template = award_template();

        let result = persist_document(
            &conn,
            blocker.path(),
            &template,
            &HashMap::new(),
            &ContactInfo::default(),
            "id-1",
            b"%PDF-fake",
        );
        assert!(result.is_err());
        assert_eq!(record_count(&conn), 0);
    }
}
