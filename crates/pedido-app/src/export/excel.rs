//! Excel export functionality

use pedido_domain::model::{ORDER_HEADERS, SUMMARY_HEADERS};
use pedido_domain::service::BatchExtraction;
use pedido_types::{Error, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

pub const DETAILS_SHEET: &str = "Dados Extraídos";
pub const SUMMARY_SHEET: &str = "Resumo Quantidades";

fn excel_err(e: XlsxError) -> Error {
    Error::Excel(e.to_string())
}

/// Export rows and item totals to a two-sheet workbook
pub fn export_to_excel(batch: &BatchExtraction, output_path: &Path) -> Result<()> {
    let mut workbook = build_workbook(batch)?;
    workbook.save(output_path).map_err(excel_err)?;
    Ok(())
}

fn build_workbook(batch: &BatchExtraction) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let details_sheet = workbook.add_worksheet();
    write_details_sheet(details_sheet, batch, &header_format)?;

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, batch, &header_format)?;

    Ok(workbook)
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<()> {
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, format)
            .map_err(excel_err)?;
    }
    Ok(())
}

/// Blank values stay empty cells
fn write_text(sheet: &mut Worksheet, row: u32, col: u16, value: &str) -> Result<()> {
    if !value.is_empty() {
        sheet.write_string(row, col, value).map_err(excel_err)?;
    }
    Ok(())
}

fn write_details_sheet(
    sheet: &mut Worksheet,
    batch: &BatchExtraction,
    header_format: &Format,
) -> Result<()> {
    sheet.set_name(DETAILS_SHEET).map_err(excel_err)?;
    write_headers(sheet, &ORDER_HEADERS, header_format)?;

    for (row_idx, record) in batch.records.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col, value) in record.cells().iter().enumerate() {
            write_text(sheet, row, col as u16, value)?;
        }
    }

    // Description column is the widest
    sheet.set_column_width(5, 40).map_err(excel_err)?;
    sheet.set_column_width(9, 20).map_err(excel_err)?;

    Ok(())
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    batch: &BatchExtraction,
    header_format: &Format,
) -> Result<()> {
    sheet.set_name(SUMMARY_SHEET).map_err(excel_err)?;
    write_headers(sheet, &SUMMARY_HEADERS, header_format)?;

    for (row_idx, (key, entry)) in batch.summary.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        write_text(sheet, row, 0, &key.codigo_fab)?;
        write_text(sheet, row, 1, &key.descricao_resumida)?;
        sheet
            .write_number(row, 2, entry.total_quantity as f64)
            .map_err(excel_err)?;
        write_text(sheet, row, 3, &entry.qtde_emb)?;
        write_text(sheet, row, 4, &entry.ncm)?;
    }

    sheet.set_column_width(1, 40).map_err(excel_err)?;
    sheet.set_column_width(2, 12).map_err(excel_err)?;

    Ok(())
}
