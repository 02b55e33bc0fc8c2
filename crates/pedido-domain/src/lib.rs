//! Domain models and services for order extraction

pub mod model;
pub mod service;
