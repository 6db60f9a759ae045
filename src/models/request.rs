use bytes::Bytes;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Query parameters accepted by the extraction endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractParams {
    pub output_format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Excel,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "excel" | "xlsx" => Ok(OutputFormat::Excel),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(AppError::unsupported_format(other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::Excel => "excel",
            OutputFormat::Csv => "csv",
        };
        f.write_str(name)
    }
}

impl OutputFormat {
    /// Picks the format from an optional selector, falling back to `default`
    /// when it is absent or blank.
    pub fn resolve(selector: Option<&str>, default: OutputFormat) -> Result<Self, AppError> {
        match selector.map(str::trim) {
            Some(s) if !s.is_empty() => s.parse(),
            _ => Ok(default),
        }
    }
}

/// A file part read fully into memory from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub size: usize,
    pub content: Bytes,
    pub content_type: Option<String>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size: content.len(),
            content,
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| {
                ct.split(';')
                    .next()
                    .map(|essence| essence.trim().eq_ignore_ascii_case("application/pdf"))
                    .unwrap_or(false)
            })
            .unwrap_or(false)
            || self.name.to_lowercase().ends_with(".pdf")
            || self.content.starts_with(b"%PDF")
    }
}
