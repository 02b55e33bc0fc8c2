//! Batch extraction over several documents
//!
//! Files run one after another in the given order. A file that fails to read
//! or parse is recorded in the batch and skipped; it never aborts the batch.

use std::path::{Path, PathBuf};

use pedido_domain::service::{BatchExtraction, FileExtraction};
use pedido_infra::XmlOrderLoader;
use pedido_types::{Error, Result};
use tracing::{debug, warn};

/// Extract rows and per-item totals from one file
pub fn extract_file(loader: &XmlOrderLoader, path: &Path) -> Result<FileExtraction> {
    let records = loader.load_file(path)?;
    Ok(FileExtraction::new(path.display().to_string(), records))
}

/// Extract every file in order; `on_file` runs after each one
pub fn extract_batch<F>(
    loader: &XmlOrderLoader,
    paths: &[PathBuf],
    mut on_file: F,
) -> BatchExtraction
where
    F: FnMut(&Path),
{
    let mut batch = BatchExtraction::new();
    for path in paths {
        let source = path.display().to_string();
        debug!(file = %source, "extracting");
        absorb(&mut batch, &source, extract_file(loader, path));
        on_file(path);
    }
    batch
}

fn absorb(batch: &mut BatchExtraction, source: &str, result: Result<FileExtraction>) {
    match result {
        Ok(file) => {
            debug!(
                file = source,
                records = file.records.len(),
                items = file.summary.len(),
                "file extracted"
            );
            batch.absorb(file);
        }
        Err(e) => {
            warn!(file = source, error = %e, "file skipped");
            let message = match e {
                Error::XmlParse { message, .. } => message,
                other => other.to_string(),
            };
            batch.record_failure(source, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedido_domain::model::ItemKey;
    use tempfile::tempdir;

    fn order(codigo: &str, qtde: &str) -> String {
        format!(
            "<Pedidos><CodigoFab>{}</CodigoFab><DescricaoResumida>Item {}</DescricaoResumida><Qtde>{}</Qtde></Pedidos>",
            codigo, codigo, qtde
        )
    }

    #[test]
    fn test_files_merge_in_order() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.xml");
        let b = dir.path().join("b.xml");
        std::fs::write(&a, format!("<R>{}{}</R>", order("X", "10"), order("Z", "1"))).unwrap();
        std::fs::write(&b, format!("<R>{}</R>", order("X", "5"))).unwrap();

        let batch = extract_batch(&XmlOrderLoader::default(), &[a, b], |_| {});
        assert_eq!(batch.files_processed, 2);
        assert_eq!(batch.records.len(), 3);
        assert!(batch.failures.is_empty());
        let entry = batch.summary.get(&ItemKey::new("X", "Item X")).unwrap();
        assert_eq!(entry.total_quantity, 15);
    }

    #[test]
    fn test_broken_file_reported_and_skipped() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.xml");
        let ok = dir.path().join("ok.xml");
        std::fs::write(&broken, "<R><Pedidos></R>").unwrap();
        std::fs::write(&ok, format!("<R>{}</R>", order("X", "2"))).unwrap();

        let batch = extract_batch(&XmlOrderLoader::default(), &[broken.clone(), ok], |_| {});
        assert_eq!(batch.failures.len(), 1);
        let source = broken.display().to_string();
        assert_eq!(batch.failures[0].source, source);
        assert!(!batch.failures[0].message.starts_with(&source));
        assert_eq!(batch.records.len(), 1);
    }

    #[test]
    fn test_unreadable_path_is_file_scoped() {
        let loader = XmlOrderLoader::default();
        let mut seen = 0;
        let paths = [PathBuf::from("/nonexistent/pedido.xml")];
        let batch = extract_batch(&loader, &paths, |_| seen += 1);
        assert_eq!(seen, 1);
        assert_eq!(batch.failures.len(), 1);
        assert!(!batch.has_data());
    }
}
