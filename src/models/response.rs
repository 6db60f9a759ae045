use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::schema::VAT_FIELDS;
use crate::models::vat_return::VatReturn;

pub const DOCUMENT_TYPE: &str = "VAT Return";
pub const MOCK_CONFIDENCE: f64 = 0.92;
pub const EXAMPLE_CONFIDENCE: f64 = 0.95;

/// What the service learned about an upload without reading its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub filename: String,
    pub size_bytes: usize,
    pub content_type: Option<String>,
    pub is_pdf: bool,
    pub pages: Option<usize>,
}

/// One upload bound to the values reported for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub document: DocumentInfo,
    pub vat_return: VatReturn,
    pub confidence: f64,
    pub extracted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractedData {
    #[serde(flatten)]
    pub vat_return: VatReturn,
    pub extracted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub status: String,
    pub document_type: String,
    pub filename: String,
    pub size_bytes: usize,
    pub content_type: Option<String>,
    pub is_pdf: bool,
    pub pages: Option<usize>,
    pub extracted_data: ExtractedData,
    pub confidence: f64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ExtractResponse {
    pub fn from_record(record: ExtractionRecord) -> Self {
        let message = if record.document.is_pdf {
            "PDF processed successfully (mock data)".to_string()
        } else {
            "File received - values are placeholders, recognition is not implemented for this type"
                .to_string()
        };

        Self {
            status: "success".to_string(),
            document_type: DOCUMENT_TYPE.to_string(),
            filename: record.document.filename,
            size_bytes: record.document.size_bytes,
            content_type: record.document.content_type,
            is_pdf: record.document.is_pdf,
            pages: record.document.pages,
            extracted_data: ExtractedData {
                vat_return: record.vat_return,
                extracted_at: record.extracted_at,
            },
            confidence: record.confidence,
            message,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchExtractResponse {
    pub status: String,
    pub count: usize,
    pub results: Vec<ExtractionRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExampleVatReturn {
    #[serde(flatten)]
    pub vat_return: VatReturn,
    pub extracted_fields: usize,
    pub confidence: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExampleResponse {
    pub info: String,
    pub vat_return: ExampleVatReturn,
}

impl ExampleResponse {
    pub fn new() -> Self {
        Self {
            info: "This is what the API returns for a fully extracted VAT return".to_string(),
            vat_return: ExampleVatReturn {
                vat_return: VatReturn::mock(),
                extracted_fields: VAT_FIELDS.len(),
                confidence: EXAMPLE_CONFIDENCE,
            },
        }
    }
}

impl Default for ExampleResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}
