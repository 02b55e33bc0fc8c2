//! Domain services

pub mod batch;

pub use batch::{BatchExtraction, BatchReport, FileExtraction, FileFailure};
