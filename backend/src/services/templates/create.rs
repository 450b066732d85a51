//! Template creation: a multipart background-image upload.
//!
//! A template comes into existence when its certificate face is uploaded.
//! The image lands in object storage, the template row is inserted with
//! an empty field list, and the new template is returned so the editor
//! can open immediately.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, Responder};
use common::model::template::Template;
use futures_util::StreamExt;
use rusqlite::params;
use uuid::Uuid;

use crate::services::{part_filename, part_name, read_part_bytes};
use crate::storage::{self, Bucket};
use crate::db;

const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

pub async fn process(payload: Multipart) -> impl Responder {
    match create_template(payload).await {
        Ok(template) => HttpResponse::Ok().json(template),
        Err(e) => HttpResponse::BadRequest().body(format!("Error: {}", e)),
    }
}

async fn create_template(mut payload: Multipart) -> Result<Template, String> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| e.to_string())?;
        if part_name(&field).as_deref() != Some("file") {
            continue;
        }
        let filename = part_filename(&field).unwrap_or_default();
        let extension = filename
            .rsplit('.')
            .next()
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err("The background must be a png/jpg/jpeg/webp image".to_string());
        }
        let bytes = read_part_bytes(&mut field).await?;
        if bytes.is_empty() {
            return Err("Empty upload".to_string());
        }
        upload = Some((filename, bytes));
    }

    let (filename, bytes) = upload.ok_or("Missing file")?;
    let image_url = storage::put(Bucket::Templates, &filename, &bytes)?;

    // Template name defaults to the filename stem, like the library shows.
    let name = filename
        .rsplit_once('.')
        .map(|(stem, _)| stem.to_string())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "New Template".to_string());

    let template = Template {
        id: Uuid::new_v4().to_string(),
        name,
        image_url: Some(image_url),
        fields: Vec::new(),
        created_at: None,
    };

    let conn = db::open().map_err(|e| e.to_string())?;
    conn.execute(
        "INSERT INTO templates (id, name, image_url, fields) VALUES (?1, ?2, ?3, '[]')",
        params![template.id, template.name, template.image_url],
    )
    .map_err(|e| e.to_string())?;

    Ok(template)
}
