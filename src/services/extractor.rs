use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::models::{ExtractionRecord, UploadedFile, VatReturn, MOCK_CONFIDENCE};
use crate::services::document::DocumentInspector;

/// Binds uploads to VAT return values.
///
/// No field recognition happens here: every upload is reported with the
/// figures of [`VatReturn::mock`]. Batch rows only differ by filename and a
/// pseudo identifier derived from it.
#[derive(Debug, Clone, Default)]
pub struct VatExtractor {
    inspector: DocumentInspector,
}

impl VatExtractor {
    pub fn new() -> Self {
        Self {
            inspector: DocumentInspector::new(),
        }
    }

    pub fn extract(&self, file: &UploadedFile) -> ExtractionRecord {
        self.record(file, VatReturn::mock(), Utc::now())
    }

    /// One record per file, in upload order, sharing a single timestamp.
    pub fn extract_batch(&self, files: &[UploadedFile]) -> Vec<ExtractionRecord> {
        let extracted_at = Utc::now();
        files
            .iter()
            .map(|file| {
                let vat_return = VatReturn::mock().with_vat_number(pseudo_vat_number(&file.name));
                self.record(file, vat_return, extracted_at)
            })
            .collect()
    }

    fn record(
        &self,
        file: &UploadedFile,
        vat_return: VatReturn,
        extracted_at: DateTime<Utc>,
    ) -> ExtractionRecord {
        let document = self.inspector.inspect(file);

        tracing::info!(
            file_name = %document.filename,
            file_size = document.size_bytes,
            is_pdf = document.is_pdf,
            vat_number = %vat_return.vat_number,
            "Produced mock extraction record"
        );

        ExtractionRecord {
            document,
            vat_return,
            confidence: MOCK_CONFIDENCE,
            extracted_at,
        }
    }
}

/// `LU` followed by eight digits taken from the SHA-256 of the filename.
/// Stable across processes and platforms.
pub fn pseudo_vat_number(filename: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(filename.as_bytes());
    let digest = hasher.finalize();
    let prefix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    format!("LU{:08}", prefix % 100_000_000)
}
