use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePdfResponse {
    #[serde(rename = "pdfId")]
    pub pdf_id: String,
}

/// Body of the add-text operation. `text` is required; the position fields
/// are optional and fall back to the service's fixed defaults.
#[derive(Debug, Deserialize)]
pub struct AddTextRequest {
    pub text: String,
    pub page: Option<u32>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub size: Option<f32>,
}
