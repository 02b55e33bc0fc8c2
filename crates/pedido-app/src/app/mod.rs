//! Application use cases

mod batch_service;

pub use batch_service::{extract_batch, extract_file};
