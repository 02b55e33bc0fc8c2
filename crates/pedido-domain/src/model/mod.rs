//! Domain model types

pub mod item_summary;
pub mod order_record;
pub mod quantity;

pub use item_summary::{AggregateEntry, ItemKey, ItemSummary, SummaryRow, SUMMARY_HEADERS};
pub use order_record::{OrderField, OrderRecord, RawOrder, ORDER_HEADERS};
