pub mod dispatch;
pub mod generate;
pub mod qr;
pub mod records;
pub mod templates;

use actix_multipart::Field as MultipartField;
use futures_util::StreamExt;

/// Drain one multipart part into memory.
pub(crate) async fn read_part_bytes(field: &mut MultipartField) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| e.to_string())?;
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// The `name` from a part's Content-Disposition header, if any.
pub(crate) fn part_name(field: &MultipartField) -> Option<String> {
    field
        .content_disposition()
        .and_then(|cd| cd.get_name().map(|n| n.to_string()))
}

/// The original filename from a part's Content-Disposition header.
pub(crate) fn part_filename(field: &MultipartField) -> Option<String> {
    field
        .content_disposition()
        .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
}
