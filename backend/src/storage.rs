//! Local-disk object storage, served read-only under `/files`.
//!
//! Uploads are content-addressed: the stored name is the md5 of the bytes
//! followed by a sanitized version of the original filename, so re-uploads
//! of identical content are idempotent and names never collide.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Templates,
    Assets,
    Certificates,
}

impl Bucket {
    pub fn dir_name(self) -> &'static str {
        match self {
            Bucket::Templates => "templates",
            Bucket::Assets => "assets",
            Bucket::Certificates => "certificates",
        }
    }
}

pub fn ensure_dirs() -> std::io::Result<()> {
    for bucket in [Bucket::Templates, Bucket::Assets, Bucket::Certificates] {
        fs::create_dir_all(config::data_dir().join(bucket.dir_name()))?;
    }
    Ok(())
}

/// Store `bytes` and return the public URL path (`/files/...`).
pub fn put(bucket: Bucket, original_name: &str, bytes: &[u8]) -> Result<String, String> {
    put_in(&config::data_dir(), bucket, original_name, bytes)
}

pub fn put_in(
    root: &Path,
    bucket: Bucket,
    original_name: &str,
    bytes: &[u8],
) -> Result<String, String> {
    let digest = format!("{:x}", md5::compute(bytes));
    let file_name = format!("{}_{}", digest, sanitize_filename(original_name));
    let dir = root.join(bucket.dir_name());
    fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
    fs::write(dir.join(&file_name), bytes).map_err(|e| e.to_string())?;
    Ok(format!("/files/{}/{}", bucket.dir_name(), file_name))
}

/// Map a `/files/...` public URL back to the on-disk path. Rejects
/// anything outside the data directory.
pub fn resolve(public_url: &str) -> Option<PathBuf> {
    resolve_in(&config::data_dir(), public_url)
}

pub fn resolve_in(root: &Path, public_url: &str) -> Option<PathBuf> {
    let rest = public_url.strip_prefix("/files/")?;
    if rest.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return None;
    }
    Some(root.join(rest))
}

/// Collapse whitespace to underscores and strip path-significant
/// characters from a user-supplied filename.
pub fn sanitize_filename(name: &str) -> String {
    let ws = Regex::new(r"\s+").expect("static regex");
    let cleaned = ws.replace_all(name.trim(), "_");
    let cleaned: String = cleaned
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_returns_a_public_url_and_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = put_in(dir.path(), Bucket::Assets, "my logo.png", b"bytes").unwrap();
        assert!(url.starts_with("/files/assets/"));
        assert!(url.ends_with("_my_logo.png"));
        let path = resolve_in(dir.path(), &url).unwrap();
        assert_eq!(fs::read(path).unwrap(), b"bytes");
    }

    #[test]
    fn identical_content_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let a = put_in(dir.path(), Bucket::Certificates, "c.pdf", b"same").unwrap();
        let b = put_in(dir.path(), Bucket::Certificates, "c.pdf", b"same").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn resolve_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_in(dir.path(), "/files/assets/../../etc/passwd").is_none());
        assert!(resolve_in(dir.path(), "/elsewhere/a.png").is_none());
    }

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(sanitize_filename("  Award  2026 .png"), "Award_2026_.png");
        assert_eq!(sanitize_filename("../../x"), "....x");
        assert_eq!(sanitize_filename("///"), "file");
    }
}
