//! Tabular export shaping.
//!
//! Extraction records are first shaped into a [`Table`] and then rendered
//! as an `.xlsx` workbook or a CSV document. Column order always follows
//! the field schema.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook};

use crate::error::{AppError, AppResult};
use crate::models::{CellValue, ExtractionRecord, VatReturn, VAT_FIELDS};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

pub const FIELD_CODES_SHEET: &str = "Field Codes";

const MIN_COLUMN_WIDTH: usize = 10;
const MAX_COLUMN_WIDTH: usize = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// One row per record: filename, every schema field, then the
    /// extraction timestamp.
    pub fn from_records(sheet_name: &str, records: &[ExtractionRecord]) -> Self {
        let mut headers = vec!["filename".to_string()];
        headers.extend(VAT_FIELDS.iter().map(|f| f.key.to_string()));
        headers.push("extracted_at".to_string());

        let rows = records
            .iter()
            .map(|record| {
                let mut row = vec![CellValue::Text(record.document.filename.clone())];
                row.extend(record.vat_return.cells().into_iter().map(|(_, v)| v));
                row.push(CellValue::Text(record.extracted_at.to_rfc3339()));
                row
            })
            .collect();

        Self {
            sheet_name: sheet_name.to_string(),
            headers,
            rows,
        }
    }

    /// A single row holding the schema fields of `vat_return` and nothing else.
    pub fn from_vat_return(sheet_name: &str, vat_return: &VatReturn) -> Self {
        let cells = vat_return.cells();
        Self {
            sheet_name: sheet_name.to_string(),
            headers: cells.iter().map(|(f, _)| f.key.to_string()).collect(),
            rows: vec![cells.into_iter().map(|(_, v)| v).collect()],
        }
    }

    /// The field-code lookup sheet.
    pub fn field_codes() -> Self {
        Self {
            sheet_name: FIELD_CODES_SHEET.to_string(),
            headers: ["code", "key", "description", "kind"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            rows: VAT_FIELDS
                .iter()
                .map(|f| {
                    vec![
                        CellValue::from(f.code),
                        CellValue::from(f.key),
                        CellValue::from(f.description),
                        CellValue::Text(f.kind.to_string()),
                    ]
                })
                .collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_width(&self, col: usize) -> f64 {
        let widest = self
            .rows
            .iter()
            .filter_map(|row| row.get(col))
            .map(|cell| cell.as_text().chars().count())
            .chain(self.headers.get(col).map(|h| h.chars().count()))
            .max()
            .unwrap_or(0);
        (widest + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH) as f64
    }
}

/// Renders each table as its own worksheet, in order.
pub fn to_xlsx(tables: &[Table]) -> AppResult<Vec<u8>> {
    if tables.is_empty() {
        return Err(AppError::export("workbook needs at least one sheet"));
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let amount_format = Format::new().set_num_format("#,##0.00");

    for table in tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(table.sheet_name.as_str())?;

        for (col, header) in table.headers.iter().enumerate() {
            let col = col as u16;
            worksheet.write_string_with_format(0, col, header.as_str(), &header_format)?;
            worksheet.set_column_width(col, table.column_width(col as usize))?;
        }

        for (idx, row) in table.rows.iter().enumerate() {
            let row_num = (idx + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    CellValue::Text(text) => {
                        worksheet.write_string(row_num, col, text.as_str())?;
                    }
                    CellValue::Number(n) => {
                        worksheet.write_number_with_format(row_num, col, *n, &amount_format)?;
                    }
                    CellValue::Date(_) => {
                        worksheet.write_string(row_num, col, cell.as_text())?;
                    }
                    CellValue::Empty => {}
                }
            }
        }
    }

    let buffer = workbook.save_to_buffer()?;
    tracing::debug!(
        sheets = tables.len(),
        size_bytes = buffer.len(),
        "Rendered xlsx workbook"
    );
    Ok(buffer)
}

/// Renders a table as CSV with a header line.
pub fn to_csv(table: &Table) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(CellValue::as_text))?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| AppError::export(format!("csv: {}", e)))
}

/// `<prefix>_<YYYYMMDD_HHMMSS>.<extension>`
pub fn attachment_filename(prefix: &str, extension: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}.{}", prefix, at.format("%Y%m%d_%H%M%S"), extension)
}

/// A rendered document served as a download.
#[derive(Debug)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn xlsx(prefix: &str, tables: &[Table]) -> AppResult<Self> {
        Ok(Self {
            filename: attachment_filename(prefix, "xlsx", Utc::now()),
            content_type: XLSX_CONTENT_TYPE,
            bytes: to_xlsx(tables)?,
        })
    }

    pub fn csv(prefix: &str, table: &Table) -> AppResult<Self> {
        Ok(Self {
            filename: attachment_filename(prefix, "csv", Utc::now()),
            content_type: CSV_CONTENT_TYPE,
            bytes: to_csv(table)?,
        })
    }
}

impl IntoResponse for ExportFile {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.filename);
        (
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}
