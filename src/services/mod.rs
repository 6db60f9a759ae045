pub mod document;
pub mod export;
pub mod extractor;

pub use document::DocumentInspector;
pub use export::{ExportFile, Table};
pub use extractor::{pseudo_vat_number, VatExtractor};
