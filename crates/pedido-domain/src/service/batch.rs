//! Multi-file batch accumulation
//!
//! Each file is reduced on its own into rows plus an [`ItemSummary`]; the batch
//! then concatenates rows and merges summaries in file order.

use serde::Serialize;

use crate::model::{ItemSummary, OrderRecord, SummaryRow};

/// Result of extracting a single file
#[derive(Debug, Clone)]
pub struct FileExtraction {
    pub source: String,
    pub records: Vec<OrderRecord>,
    pub summary: ItemSummary,
}

impl FileExtraction {
    pub fn new(source: impl Into<String>, records: Vec<OrderRecord>) -> Self {
        let summary = ItemSummary::from_records(&records);
        Self {
            source: source.into(),
            records,
            summary,
        }
    }
}

/// A file that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub source: String,
    pub message: String,
}

/// Accumulated rows and totals over every file of a batch
#[derive(Debug, Clone, Default)]
pub struct BatchExtraction {
    pub records: Vec<OrderRecord>,
    pub summary: ItemSummary,
    pub failures: Vec<FileFailure>,
    pub files_processed: usize,
}

impl BatchExtraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, file: FileExtraction) {
        self.files_processed += 1;
        self.records.extend(file.records);
        self.summary.merge(file.summary);
    }

    /// Record a file-scoped failure; the batch keeps going
    pub fn record_failure(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.files_processed += 1;
        self.failures.push(FileFailure {
            source: source.into(),
            message: message.into(),
        });
    }

    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn report(&self) -> BatchReport {
        BatchReport {
            files_processed: self.files_processed,
            rows: self.records.clone(),
            summary: self.summary.rows(),
            failures: self.failures.clone(),
        }
    }
}

/// Serializable view of a batch for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub files_processed: usize,
    pub rows: Vec<OrderRecord>,
    pub summary: Vec<SummaryRow>,
    pub failures: Vec<FileFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemKey;

    fn record(codigo_fab: &str, qtde: &str) -> OrderRecord {
        OrderRecord {
            codigo_fab: codigo_fab.to_string(),
            descricao_resumida: "Parafuso".to_string(),
            qtde: qtde.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_rows_concatenate_in_file_order() {
        let mut batch = BatchExtraction::new();
        batch.absorb(FileExtraction::new("a.xml", vec![record("X", "10"), record("Z", "1")]));
        batch.absorb(FileExtraction::new("b.xml", vec![record("X", "5")]));

        assert_eq!(batch.files_processed, 2);
        assert_eq!(batch.records.len(), 3);
        assert_eq!(batch.records[2].qtde, "5");
        let key = ItemKey::new("X", "Parafuso");
        assert_eq!(batch.summary.get(&key).unwrap().total_quantity, 15);
    }

    #[test]
    fn test_failure_does_not_drop_other_files() {
        let mut batch = BatchExtraction::new();
        batch.absorb(FileExtraction::new("a.xml", vec![record("X", "10")]));
        batch.record_failure("broken.xml", "mismatched tag");
        batch.absorb(FileExtraction::new("c.xml", vec![record("X", "2")]));

        assert_eq!(batch.files_processed, 3);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].source, "broken.xml");
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.summary.total_quantity(), 12);
    }

    #[test]
    fn test_empty_batch_has_no_data() {
        let mut batch = BatchExtraction::new();
        assert!(!batch.has_data());
        batch.absorb(FileExtraction::new("empty.xml", Vec::new()));
        assert!(!batch.has_data());
        assert_eq!(batch.report().files_processed, 1);
    }
}
