use lopdf::Document;

use crate::models::{DocumentInfo, UploadedFile};

/// Reads what can be learned about an upload without field recognition.
#[derive(Debug, Clone, Copy)]
pub struct DocumentInspector;

impl DocumentInspector {
    pub fn new() -> Self {
        Self
    }

    pub fn inspect(&self, file: &UploadedFile) -> DocumentInfo {
        let is_pdf = file.is_pdf();
        let pages = if is_pdf {
            self.count_pages(&file.content)
        } else {
            None
        };

        tracing::debug!(
            file_name = %file.name,
            file_size = file.size,
            is_pdf,
            pages = ?pages,
            "Inspected uploaded document"
        );

        DocumentInfo {
            filename: file.name.clone(),
            size_bytes: file.size,
            content_type: file.content_type.clone(),
            is_pdf,
            pages,
        }
    }

    /// Page count from the PDF page tree, or `None` when the body does not
    /// parse. A `.pdf` name on a non-PDF body is not an error.
    pub fn count_pages(&self, pdf_content: &[u8]) -> Option<usize> {
        match Document::load_mem(pdf_content) {
            Ok(doc) => Some(doc.get_pages().len()),
            Err(e) => {
                tracing::debug!("PDF structure not readable: {}", e);
                None
            }
        }
    }
}

impl Default for DocumentInspector {
    fn default() -> Self {
        Self::new()
    }
}
