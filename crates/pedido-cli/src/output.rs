//! Output formatting module

use pedido_domain::model::{ItemSummary, OrderRecord, ORDER_HEADERS, SUMMARY_HEADERS};
use pedido_domain::service::{BatchExtraction, FileFailure};
use pedido_types::{ExportFormat, OutputFormat, Result};

/// Message shown when a batch produced no rows
pub const NO_DATA_WARNING: &str = "Nenhum dado foi extraído dos arquivos XML.";

/// Report files that failed to parse, one line each on stderr
pub fn print_failures(failures: &[FileFailure]) {
    for failure in failures {
        eprintln!(
            "Erro ao processar o arquivo XML {}: {}",
            failure.source, failure.message
        );
    }
}

/// Print the batch on stdout, or warn on stderr when it has no rows
pub fn output_batch(
    output_format: OutputFormat,
    batch: &BatchExtraction,
    layout: ExportFormat,
    show_rows: bool,
) -> Result<()> {
    if !batch.has_data() {
        eprintln!("{}", NO_DATA_WARNING);
    }
    if let Some(content) = render_batch(output_format, batch, layout, show_rows)? {
        print!("{}", content);
    }
    Ok(())
}

/// Stdout text for a batch
///
/// JSON always yields the report, even an empty one. Tables yield nothing for
/// an empty batch. The summary columns follow the export layout: packaging
/// quantity and NCM are only shown for the spreadsheet variant.
fn render_batch(
    output_format: OutputFormat,
    batch: &BatchExtraction,
    layout: ExportFormat,
    show_rows: bool,
) -> Result<Option<String>> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(&batch.report())?;
        return Ok(Some(format!("{}\n", content)));
    }
    if !batch.has_data() {
        return Ok(None);
    }

    let mut out = String::new();
    if show_rows {
        out.push_str("\nDados Extraídos\n");
        out.push_str("===============\n");
        out.push_str(&render_records(&batch.records));
    }

    out.push_str("\nQuantidade Total por Item\n");
    out.push_str("=========================\n");
    out.push_str(&render_summary(&batch.summary, layout.carries_packaging()));

    out.push_str(&format!(
        "\n{} arquivo(s), {} linha(s), {} item(ns), quantidade total {}\n",
        batch.files_processed,
        batch.records.len(),
        batch.summary.len(),
        batch.summary.total_quantity()
    ));

    Ok(Some(out))
}

fn render_records(records: &[OrderRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| r.cells().iter().map(|c| c.to_string()).collect())
        .collect();
    render_table(&ORDER_HEADERS, &rows)
}

fn render_summary(summary: &ItemSummary, with_packaging: bool) -> String {
    let columns = if with_packaging { 5 } else { 3 };
    let rows: Vec<Vec<String>> = summary
        .iter()
        .map(|(key, entry)| {
            let mut row = vec![
                key.codigo_fab.clone(),
                key.descricao_resumida.clone(),
                entry.total_quantity.to_string(),
            ];
            if with_packaging {
                row.push(entry.qtde_emb.clone());
                row.push(entry.ncm.clone());
            }
            row
        })
        .collect();
    render_table(&SUMMARY_HEADERS[..columns], &rows)
}

/// Plain aligned text table
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut table = String::new();
    table.push_str(&format_line(headers.iter().copied(), &widths));
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    table.push_str(&format!("{}\n", rule.join("  ")));
    for row in rows {
        table.push_str(&format_line(row.iter().map(String::as_str), &widths));
    }
    table
}

fn format_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedido_domain::service::FileExtraction;

    fn record(codigo_fab: &str, qtde: &str, qtde_emb: &str) -> OrderRecord {
        OrderRecord {
            codigo_fab: codigo_fab.to_string(),
            descricao_resumida: "Porca".to_string(),
            qtde: qtde.to_string(),
            qtde_emb: qtde_emb.to_string(),
            ncm: "73181600".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_batch_rendering() {
        let batch = BatchExtraction::new();

        for show_rows in [true, false] {
            let json = render_batch(OutputFormat::Json, &batch, ExportFormat::Xlsx, show_rows)
                .unwrap()
                .unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["files_processed"], 0);
            assert!(value["rows"].as_array().unwrap().is_empty());

            let table =
                render_batch(OutputFormat::Table, &batch, ExportFormat::Xlsx, show_rows).unwrap();
            assert!(table.is_none());
        }
    }

    #[test]
    fn test_summary_only_table_skips_rows() {
        let mut batch = BatchExtraction::new();
        batch.absorb(FileExtraction::new("a.xml", vec![record("X", "10", "12")]));

        let full = render_batch(OutputFormat::Table, &batch, ExportFormat::Csv, true)
            .unwrap()
            .unwrap();
        assert!(full.contains("Dados Extraídos"));

        let summary = render_batch(OutputFormat::Table, &batch, ExportFormat::Csv, false)
            .unwrap()
            .unwrap();
        assert!(!summary.contains("Dados Extraídos"));
        assert!(summary.contains("1 arquivo(s), 1 linha(s), 1 item(ns), quantidade total 10"));
    }

    #[test]
    fn test_render_table_alignment() {
        let rows = vec![vec!["a".to_string(), "1".to_string()]];
        let table = render_table(&["Col", "N"], &rows);
        assert_eq!(table, "Col  N\n---  -\na    1\n");
    }

    #[test]
    fn test_summary_columns_follow_layout() {
        let summary = ItemSummary::from_records(&[record("X", "10", "12"), record("X", "5", "24")]);

        let full = render_summary(&summary, true);
        assert!(full.lines().next().unwrap().ends_with("NCM"));
        assert!(full.contains("24"));

        let short = render_summary(&summary, false);
        assert!(short.lines().next().unwrap().ends_with("Qtde Total"));
        assert!(!short.contains("73181600"));
        assert!(short.contains("15"));
    }

    #[test]
    fn test_render_records_has_all_headers() {
        let table = render_records(&[record("X", "1,234", "")]);
        let header = table.lines().next().unwrap();
        for h in ORDER_HEADERS {
            assert!(header.contains(h), "missing {}", h);
        }
        assert!(table.contains("1,234"));
    }
}
