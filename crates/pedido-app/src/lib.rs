//! Application service layer - config, scanning, batch extraction, export

pub mod app;
pub mod config;
pub mod export;
pub mod scanner;
