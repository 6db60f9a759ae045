use axum::response::Json;

use crate::error::AppResult;
use crate::models::{ExampleResponse, VatReturn};
use crate::services::{ExportFile, Table};
use crate::services::export::FIELD_CODES_SHEET;

pub const EXAMPLE_SHEET: &str = "VAT Return";

/// Static payload documenting the JSON shape of a full extraction.
pub async fn example_handler() -> Json<ExampleResponse> {
    Json(ExampleResponse::new())
}

/// The example return as a workbook, with the field-code sheet.
pub async fn example_excel_handler() -> AppResult<ExportFile> {
    tracing::debug!(sheets = ?[EXAMPLE_SHEET, FIELD_CODES_SHEET], "Rendering example workbook");
    ExportFile::xlsx(
        "vat_example",
        &[
            Table::from_vat_return(EXAMPLE_SHEET, &VatReturn::mock()),
            Table::field_codes(),
        ],
    )
}
