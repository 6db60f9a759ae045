use axum::{
    extract::{Multipart, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::middleware::request_id;
use crate::models::{BatchExtractResponse, ExtractParams, ExtractResponse, OutputFormat, UploadedFile};
use crate::services::{ExportFile, Table};

pub const SINGLE_SHEET: &str = "VAT Return";
pub const BATCH_SHEET: &str = "VAT Returns";

/// Multipart field that selects the output format.
const FORMAT_FIELD: &str = "output_format";

/// Parts collected from one multipart body.
#[derive(Debug, Default)]
struct MultipartUpload {
    files: Vec<UploadedFile>,
    output_format: Option<String>,
}

/// `POST /extract`: one file in, a VAT return out as JSON, xlsx or CSV.
pub async fn extract_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ExtractParams>,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let start = Instant::now();
    let request_id = request_id(&headers);

    info!(request_id = %request_id, "Starting VAT extraction request");

    let upload = read_multipart(&mut multipart, &["file"], state.config.max_file_size_mb).await?;
    let format = OutputFormat::resolve(
        upload.output_format.as_deref().or(params.output_format.as_deref()),
        OutputFormat::Json,
    )?;

    let file = upload.files.into_iter().next().ok_or_else(|| {
        warn!(request_id = %request_id, "No file part in request");
        AppError::MissingFile
    })?;

    info!(
        request_id = %request_id,
        file_name = %file.name,
        file_size = file.size,
        format = %format,
        "File extracted from multipart form"
    );

    let record = state.extractor.extract(&file);

    let response = match format {
        OutputFormat::Json => Json(ExtractResponse::from_record(record)).into_response(),
        OutputFormat::Excel => ExportFile::xlsx(
            "vat_extraction",
            &[Table::from_records(SINGLE_SHEET, &[record]), Table::field_codes()],
        )?
        .into_response(),
        OutputFormat::Csv => {
            ExportFile::csv("vat_extraction", &Table::from_records(SINGLE_SHEET, &[record]))?
                .into_response()
        }
    };

    info!(
        request_id = %request_id,
        total_time_ms = start.elapsed().as_millis() as u64,
        "Request completed successfully"
    );

    Ok(response)
}

/// `POST /extract-batch`: many files in, one row per file out.
pub async fn extract_batch_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ExtractParams>,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let start = Instant::now();
    let request_id = request_id(&headers);

    info!(request_id = %request_id, "Starting batch VAT extraction request");

    let upload =
        read_multipart(&mut multipart, &["files", "file"], state.config.max_file_size_mb).await?;
    let format = OutputFormat::resolve(
        upload.output_format.as_deref().or(params.output_format.as_deref()),
        OutputFormat::Excel,
    )?;

    if upload.files.is_empty() {
        warn!(request_id = %request_id, "Batch request carried no files");
        return Err(AppError::MissingFile);
    }

    info!(
        request_id = %request_id,
        file_count = upload.files.len(),
        total_bytes = upload.files.iter().map(|f| f.size).sum::<usize>(),
        format = %format,
        "Files extracted from multipart form"
    );

    let records = state.extractor.extract_batch(&upload.files);

    let response = match format {
        OutputFormat::Json => Json(BatchExtractResponse {
            status: "success".to_string(),
            count: records.len(),
            results: records,
        })
        .into_response(),
        OutputFormat::Excel => ExportFile::xlsx(
            "vat_batch_extraction",
            &[Table::from_records(BATCH_SHEET, &records), Table::field_codes()],
        )?
        .into_response(),
        OutputFormat::Csv => {
            ExportFile::csv("vat_batch_extraction", &Table::from_records(BATCH_SHEET, &records))?
                .into_response()
        }
    };

    info!(
        request_id = %request_id,
        total_time_ms = start.elapsed().as_millis() as u64,
        "Batch request completed successfully"
    );

    Ok(response)
}

/// Buffers every file part whose name is in `file_fields`, plus the
/// optional format selector. Other parts are skipped.
async fn read_multipart(
    multipart: &mut Multipart,
    file_fields: &[&str],
    limit_mb: usize,
) -> AppResult<MultipartUpload> {
    let mut upload = MultipartUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::from_multipart(e, limit_mb))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == FORMAT_FIELD {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::from_multipart(e, limit_mb))?;
            upload.output_format = Some(value);
            continue;
        }

        if !file_fields.contains(&field_name.as_str()) {
            debug!(field = %field_name, "Skipping unrecognised multipart field");
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(|ct| ct.to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::from_multipart(e, limit_mb))?;

        let mut file = UploadedFile::new(file_name, data);
        if let Some(mime_type) = content_type {
            file = file.with_content_type(mime_type);
        }

        debug!(
            "Buffered file: {} ({} bytes, type: {:?})",
            file.name,
            file.size,
            file.content_type
        );

        upload.files.push(file);
    }

    Ok(upload)
}
