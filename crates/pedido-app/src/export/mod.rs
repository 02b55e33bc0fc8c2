//! Export of extracted rows and item totals

mod delimited;
mod excel;

pub use delimited::{export_to_csv, write_csv, CSV_HEADERS};
pub use excel::{export_to_excel, DETAILS_SHEET, SUMMARY_SHEET};

use pedido_domain::service::BatchExtraction;
use pedido_types::{ExportFormat, Result};
use std::path::Path;

/// Write the batch in `format` to `path`
pub fn export_batch(
    batch: &BatchExtraction,
    format: ExportFormat,
    path: &Path,
    csv_delimiter: u8,
) -> Result<()> {
    match format {
        ExportFormat::Xlsx => export_to_excel(batch, path),
        ExportFormat::Csv => export_to_csv(&batch.records, path, csv_delimiter),
    }
}
