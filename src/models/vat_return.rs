use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::schema::{FieldSpec, VAT_FIELDS};

/// Values reported for one VAT return, one member per schema field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatReturn {
    pub vat_number: String,
    pub company_name: String,
    pub period: String,
    pub period_end: NaiveDate,
    pub total_sales: f64,
    pub vat_collected: f64,
    pub vat_paid: f64,
    pub net_vat: f64,
}

/// A single spreadsheet/CSV cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

impl CellValue {
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format!("{:.2}", n),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl VatReturn {
    /// The placeholder figures reported for every upload until real field
    /// recognition exists.
    pub fn mock() -> Self {
        let vat_collected = 25_500.00;
        let vat_paid = 12_000.00;
        Self {
            vat_number: "LU12345678".to_string(),
            company_name: "Example Company SA".to_string(),
            period: "Q3 2024".to_string(),
            period_end: NaiveDate::from_ymd_opt(2024, 9, 30).unwrap_or_default(),
            total_sales: 150_000.00,
            vat_collected,
            vat_paid,
            net_vat: vat_collected - vat_paid,
        }
    }

    pub fn with_vat_number(mut self, vat_number: impl Into<String>) -> Self {
        self.vat_number = vat_number.into();
        self
    }

    pub fn value_of(&self, field: &FieldSpec) -> CellValue {
        match field.key {
            "vat_number" => CellValue::Text(self.vat_number.clone()),
            "company_name" => CellValue::Text(self.company_name.clone()),
            "period" => CellValue::Text(self.period.clone()),
            "period_end" => CellValue::Date(self.period_end),
            "total_sales" => CellValue::Number(self.total_sales),
            "vat_collected" => CellValue::Number(self.vat_collected),
            "vat_paid" => CellValue::Number(self.vat_paid),
            "net_vat" => CellValue::Number(self.net_vat),
            _ => CellValue::Empty,
        }
    }

    /// Field values in schema order.
    pub fn cells(&self) -> Vec<(&'static FieldSpec, CellValue)> {
        VAT_FIELDS.iter().map(|f| (f, self.value_of(f))).collect()
    }
}
