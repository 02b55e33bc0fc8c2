//! Delimited-text export
//!
//! Carries the extracted rows only. Packaging quantity and NCM are not part
//! of this layout, and the item totals are shown on screen instead.

use pedido_domain::model::OrderRecord;
use pedido_types::{Error, Result};
use std::io::Write;
use std::path::Path;

pub const CSV_HEADERS: [&str; 8] = [
    "Grupo",
    "Entrega",
    "LojaCompradora",
    "Item",
    "CodigoFab",
    "DescricaoResumida",
    "Qtde",
    "CNPJLojaCompradora",
];

fn csv_err(e: impl std::fmt::Display) -> Error {
    Error::Csv(e.to_string())
}

/// Export rows to a delimited text file
pub fn export_to_csv(records: &[OrderRecord], output_path: &Path, delimiter: u8) -> Result<()> {
    let file = std::fs::File::create(output_path)?;
    write_csv(records, file, delimiter)
}

/// Write rows with a header line, quoting only where needed
pub fn write_csv<W: Write>(records: &[OrderRecord], writer: W, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    writer.write_record(CSV_HEADERS).map_err(csv_err)?;
    for record in records {
        writer
            .write_record([
                &record.grupo,
                &record.entrega,
                &record.loja_compradora,
                &record.item,
                &record.codigo_fab,
                &record.descricao_resumida,
                &record.qtde,
                &record.cnpj_loja_compradora,
            ])
            .map_err(csv_err)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> OrderRecord {
        OrderRecord {
            grupo: "10".to_string(),
            item: "1".to_string(),
            codigo_fab: "PRF-8".to_string(),
            descricao_resumida: "Parafuso; sextavado".to_string(),
            qtde: "1,234".to_string(),
            qtde_emb: "12".to_string(),
            ncm: "73181500".to_string(),
            cnpj_loja_compradora: "'12345678000199".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_semicolon_layout() {
        let mut out = Vec::new();
        write_csv(&[record()], &mut out, b';').unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Grupo;Entrega;LojaCompradora;Item;CodigoFab;DescricaoResumida;Qtde;CNPJLojaCompradora"
        );
        assert_eq!(
            lines.next().unwrap(),
            "10;;;1;PRF-8;\"Parafuso; sextavado\";1,234;'12345678000199"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_packaging_and_ncm_not_exported() {
        let mut out = Vec::new();
        write_csv(&[record()], &mut out, b';').unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("73181500"));
        assert!(!text.contains("QtdeEmb"));
    }

    #[test]
    fn test_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pedidos_extracao.csv");
        export_to_csv(&[record(), OrderRecord::default()], &path, b';').unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_path(&path)
            .unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][5], "Parafuso; sextavado");
        assert!(rows[1].iter().all(|cell| cell.is_empty()));
    }
}
