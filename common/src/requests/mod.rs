//! Request/response payloads exchanged between the Yew frontend and the
//! backend API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::field::Field;

/// Wholesale replacement of a template's field list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFieldsRequest {
    pub template_id: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Single-certificate generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub template_id: String,
    /// Field id → value.
    pub values: HashMap<String, String>,
    #[serde(default)]
    pub contact: ContactInfo,
    /// When false the rendered PDF is returned for download only; no
    /// upload, no generation record.
    #[serde(default = "default_save")]
    pub save: bool,
}

fn default_save() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub record_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

/// JSON part accompanying the roster upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartBatchRequest {
    pub template_id: String,
    /// Session-level fallback contact info; per-row roster columns
    /// override it.
    #[serde(default)]
    pub contact: ContactInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStartResponse {
    pub job_id: String,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub recipient_email: String,
    pub recipient_name: String,
    pub certificate_link: String,
    #[serde(default)]
    pub category: String,
}
