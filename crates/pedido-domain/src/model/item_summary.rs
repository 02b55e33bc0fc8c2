//! Per-item quantity totals

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::order_record::OrderRecord;

/// Column headers of the summary table, in export order
pub const SUMMARY_HEADERS: [&str; 5] = [
    "CodigoFab",
    "DescricaoResumida",
    "Qtde Total",
    "QtdeEmb",
    "NCM",
];

/// Identity of an item: manufacturer code plus short description
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub codigo_fab: String,
    pub descricao_resumida: String,
}

impl ItemKey {
    pub fn new(codigo_fab: &str, descricao_resumida: &str) -> Self {
        Self {
            codigo_fab: codigo_fab.to_string(),
            descricao_resumida: descricao_resumida.to_string(),
        }
    }
}

/// Running totals for one item
///
/// `qtde_emb` and `ncm` are not aggregated: each occurrence of the key
/// overwrites them, so they hold the last record processed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub total_quantity: i64,
    pub qtde_emb: String,
    pub ncm: String,
}

impl AggregateEntry {
    fn add(&mut self, quantity: i64, qtde_emb: &str, ncm: &str) {
        self.total_quantity = self.total_quantity.saturating_add(quantity);
        self.qtde_emb = qtde_emb.to_string();
        self.ncm = ncm.to_string();
    }
}

/// One line of the summary table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "CodigoFab")]
    pub codigo_fab: String,
    #[serde(rename = "DescricaoResumida")]
    pub descricao_resumida: String,
    #[serde(rename = "Qtde Total")]
    pub qtde_total: i64,
    #[serde(rename = "QtdeEmb")]
    pub qtde_emb: String,
    #[serde(rename = "NCM")]
    pub ncm: String,
}

/// Mapping from [`ItemKey`] to [`AggregateEntry`], iterated in first-seen order
#[derive(Debug, Clone, Default)]
pub struct ItemSummary {
    entries: Vec<(ItemKey, AggregateEntry)>,
    index: HashMap<ItemKey, usize>,
}

impl ItemSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a OrderRecord>) -> Self {
        let mut summary = Self::new();
        for record in records {
            summary.record(record);
        }
        summary
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &ItemKey) -> Option<&AggregateEntry> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Get the entry for `key`, inserting an empty one first if absent
    pub fn entry_mut(&mut self, key: ItemKey) -> &mut AggregateEntry {
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(key.clone(), i);
                self.entries.push((key, AggregateEntry::default()));
                i
            }
        };
        &mut self.entries[i].1
    }

    /// Fold one record into the totals
    pub fn record(&mut self, record: &OrderRecord) {
        let quantity = record.quantity_units();
        self.entry_mut(record.key())
            .add(quantity, &record.qtde_emb, &record.ncm);
    }

    /// Merge totals of a later file into this one
    ///
    /// Quantities sum per key; packaging quantity and NCM take `other`'s values.
    pub fn merge(&mut self, other: ItemSummary) {
        for (key, entry) in other.entries {
            self.entry_mut(key)
                .add(entry.total_quantity, &entry.qtde_emb, &entry.ncm);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemKey, &AggregateEntry)> {
        self.entries.iter().map(|(key, entry)| (key, entry))
    }

    /// Sum of all item totals
    pub fn total_quantity(&self) -> i64 {
        self.entries
            .iter()
            .fold(0i64, |acc, (_, entry)| acc.saturating_add(entry.total_quantity))
    }

    pub fn rows(&self) -> Vec<SummaryRow> {
        self.iter()
            .map(|(key, entry)| SummaryRow {
                codigo_fab: key.codigo_fab.clone(),
                descricao_resumida: key.descricao_resumida.clone(),
                qtde_total: entry.total_quantity,
                qtde_emb: entry.qtde_emb.clone(),
                ncm: entry.ncm.clone(),
            })
            .collect()
    }
}
