//! Order record (linha de pedido) type definitions

use serde::{Deserialize, Serialize};

use super::item_summary::ItemKey;
use super::quantity::{display_quantity, escape_tax_id, quantity_units};

/// Column headers of the extracted rows table, in export order
pub const ORDER_HEADERS: [&str; 10] = [
    "Grupo",
    "Entrega",
    "LojaCompradora",
    "Item",
    "CodigoFab",
    "DescricaoResumida",
    "Qtde",
    "QtdeEmb",
    "NCM",
    "CNPJLojaCompradora",
];

/// Child elements read from each order element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
    Grupo,
    Entrega,
    LojaCompradora,
    Item,
    CodigoFab,
    DescricaoResumida,
    Qtde,
    QtdeEmb,
    Ncm,
    CnpjLojaCompradora,
}

impl OrderField {
    pub const ALL: [OrderField; 10] = [
        OrderField::Grupo,
        OrderField::Entrega,
        OrderField::LojaCompradora,
        OrderField::Item,
        OrderField::CodigoFab,
        OrderField::DescricaoResumida,
        OrderField::Qtde,
        OrderField::QtdeEmb,
        OrderField::Ncm,
        OrderField::CnpjLojaCompradora,
    ];

    /// XML tag name of this field
    pub fn tag(&self) -> &'static str {
        ORDER_HEADERS[self.index()]
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.tag() == tag)
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Raw child texts of one order element, before normalization
///
/// Only the first occurrence of each child counts; later duplicates are ignored.
#[derive(Debug, Clone, Default)]
pub struct RawOrder {
    values: [Option<String>; 10],
}

impl RawOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a field as present. Returns false if it was already seen.
    pub fn open_field(&mut self, field: OrderField) -> bool {
        let slot = &mut self.values[field.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(String::new());
        true
    }

    /// Append character data to a field opened with [`RawOrder::open_field`]
    pub fn push_text(&mut self, field: OrderField, text: &str) {
        if let Some(value) = self.values[field.index()].as_mut() {
            value.push_str(text);
        }
    }

    pub fn get(&self, field: OrderField) -> &str {
        self.values[field.index()].as_deref().unwrap_or("")
    }

    pub fn into_record(self) -> OrderRecord {
        OrderRecord {
            grupo: self.get(OrderField::Grupo).to_string(),
            entrega: self.get(OrderField::Entrega).to_string(),
            loja_compradora: self.get(OrderField::LojaCompradora).to_string(),
            item: self.get(OrderField::Item).to_string(),
            codigo_fab: self.get(OrderField::CodigoFab).to_string(),
            descricao_resumida: self.get(OrderField::DescricaoResumida).to_string(),
            qtde: display_quantity(self.get(OrderField::Qtde)),
            qtde_emb: self.get(OrderField::QtdeEmb).to_string(),
            ncm: self.get(OrderField::Ncm).to_string(),
            cnpj_loja_compradora: escape_tax_id(self.get(OrderField::CnpjLojaCompradora)),
        }
    }
}

/// One extracted row per order element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(rename = "Grupo")]
    pub grupo: String,
    #[serde(rename = "Entrega")]
    pub entrega: String,
    /// Buyer store id
    #[serde(rename = "LojaCompradora")]
    pub loja_compradora: String,
    #[serde(rename = "Item")]
    pub item: String,
    /// Manufacturer code
    #[serde(rename = "CodigoFab")]
    pub codigo_fab: String,
    #[serde(rename = "DescricaoResumida")]
    pub descricao_resumida: String,
    /// Display quantity, decimal comma
    #[serde(rename = "Qtde")]
    pub qtde: String,
    /// Packaging quantity
    #[serde(rename = "QtdeEmb")]
    pub qtde_emb: String,
    /// Tariff code
    #[serde(rename = "NCM")]
    pub ncm: String,
    /// Buyer CNPJ, apostrophe-escaped
    #[serde(rename = "CNPJLojaCompradora")]
    pub cnpj_loja_compradora: String,
}

impl OrderRecord {
    /// Integer quantity used for aggregation
    pub fn quantity_units(&self) -> i64 {
        quantity_units(&self.qtde)
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(&self.codigo_fab, &self.descricao_resumida)
    }

    /// Cell values in [`ORDER_HEADERS`] order
    pub fn cells(&self) -> [&str; 10] {
        [
            self.grupo.as_str(),
            self.entrega.as_str(),
            self.loja_compradora.as_str(),
            self.item.as_str(),
            self.codigo_fab.as_str(),
            self.descricao_resumida.as_str(),
            self.qtde.as_str(),
            self.qtde_emb.as_str(),
            self.ncm.as_str(),
            self.cnpj_loja_compradora.as_str(),
        ]
    }
}
