//! Signature/logo asset uploads for the editor.
//!
//! The backend only stores the image and hands back its public URL; the
//! editor creates the field itself (default position, size, and suggested
//! font live in `common`).

use actix_multipart::Multipart;
use actix_web::{HttpResponse, Responder};
use futures_util::StreamExt;
use serde_json::json;

use crate::services::{part_filename, part_name, read_part_bytes};
use crate::storage::{self, Bucket};

pub async fn process(payload: Multipart) -> impl Responder {
    match upload_asset(payload).await {
        Ok(asset_url) => HttpResponse::Ok().json(json!({ "asset_url": asset_url })),
        Err(e) => HttpResponse::BadRequest().body(format!("Error: {}", e)),
    }
}

async fn upload_asset(mut payload: Multipart) -> Result<String, String> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| e.to_string())?;
        if part_name(&field).as_deref() != Some("file") {
            continue;
        }
        let filename = part_filename(&field).unwrap_or_else(|| "asset.png".to_string());
        let bytes = read_part_bytes(&mut field).await?;
        if bytes.is_empty() {
            return Err("Empty upload".to_string());
        }
        // Decode up front so a corrupt asset fails here, not at render time.
        image::load_from_memory(&bytes).map_err(|e| format!("Not a decodable image: {}", e))?;
        return storage::put(Bucket::Assets, &filename, &bytes);
    }
    Err("Missing file".to_string())
}
