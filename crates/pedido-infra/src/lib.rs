//! Infrastructure layer - document loaders

pub mod encoding;
pub mod xml_loader;

pub use xml_loader::{XmlOrderLoader, DEFAULT_ORDER_TAG};
