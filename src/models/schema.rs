//! The VAT return field schema.
//!
//! Field codes follow the numbered boxes of the VAT return form. The table
//! is the single source for export column order and for the "Field Codes"
//! lookup sheet.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Currency,
    Identifier,
    Date,
    Text,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Currency => "currency",
            FieldKind::Identifier => "identifier",
            FieldKind::Date => "date",
            FieldKind::Text => "text",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub code: &'static str,
    pub key: &'static str,
    pub description: &'static str,
    pub kind: FieldKind,
}

pub static VAT_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        code: "001",
        key: "vat_number",
        description: "VAT identification number",
        kind: FieldKind::Identifier,
    },
    FieldSpec {
        code: "002",
        key: "company_name",
        description: "Name of the taxable person",
        kind: FieldKind::Text,
    },
    FieldSpec {
        code: "003",
        key: "period",
        description: "Tax period covered by the return",
        kind: FieldKind::Text,
    },
    FieldSpec {
        code: "004",
        key: "period_end",
        description: "Last day of the tax period",
        kind: FieldKind::Date,
    },
    FieldSpec {
        code: "012",
        key: "total_sales",
        description: "Overall turnover",
        kind: FieldKind::Currency,
    },
    FieldSpec {
        code: "046",
        key: "vat_collected",
        description: "Output VAT due on sales",
        kind: FieldKind::Currency,
    },
    FieldSpec {
        code: "093",
        key: "vat_paid",
        description: "Deductible input VAT",
        kind: FieldKind::Currency,
    },
    FieldSpec {
        code: "102",
        key: "net_vat",
        description: "VAT payable (+) or refundable (-)",
        kind: FieldKind::Currency,
    },
];

pub fn field_by_code(code: &str) -> Option<&'static FieldSpec> {
    VAT_FIELDS.iter().find(|f| f.code == code)
}

pub fn field_by_key(key: &str) -> Option<&'static FieldSpec> {
    VAT_FIELDS.iter().find(|f| f.key == key)
}
