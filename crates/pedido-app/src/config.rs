//! Configuration management for pedido-xml
//!
//! Config stored at: ~/.config/pedido-xml/config.json

use pedido_infra::DEFAULT_ORDER_TAG;
use pedido_types::{ConfigError, ExportFormat, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base name of the exported artifact
pub const DEFAULT_EXPORT_STEM: &str = "pedidos_extracao";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Tag of the order element searched in each document
    #[serde(default = "default_order_tag")]
    pub order_tag: String,

    /// Default export artifact (xlsx, csv)
    #[serde(default)]
    pub export_format: ExportFormat,

    /// Default terminal output format (table, json)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Directory for exported files (current directory if unset)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Field delimiter of the delimited-text export
    #[serde(default = "default_csv_delimiter")]
    pub csv_delimiter: char,

    /// Log filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_order_tag() -> String {
    DEFAULT_ORDER_TAG.to_string()
}

fn default_csv_delimiter() -> char {
    ';'
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            order_tag: default_order_tag(),
            export_format: ExportFormat::default(),
            output_format: OutputFormat::default(),
            output_dir: None,
            csv_delimiter: default_csv_delimiter(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("pedido-xml");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the user config file, or defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the user config file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.order_tag.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "order_tag",
                value: self.order_tag.clone(),
            });
        }
        if !self.csv_delimiter.is_ascii() {
            return Err(ConfigError::InvalidValue {
                field: "csv_delimiter",
                value: self.csv_delimiter.to_string(),
            });
        }
        Ok(())
    }

    /// Delimiter as the single byte the CSV writer expects
    pub fn csv_delimiter_byte(&self) -> u8 {
        if self.csv_delimiter.is_ascii() {
            self.csv_delimiter as u8
        } else {
            b';'
        }
    }

    /// Where an export of `format` goes when no path is given
    pub fn default_export_path(&self, format: ExportFormat) -> PathBuf {
        let file_name = format!("{}.{}", DEFAULT_EXPORT_STEM, format.extension());
        match self.output_dir {
            Some(ref dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Pedido XML Configuration")?;
        writeln!(f, "========================")?;
        writeln!(f)?;
        writeln!(f, "Order tag:      {}", self.order_tag)?;
        writeln!(f, "Export format:  {}", self.export_format)?;
        writeln!(f, "Output format:  {}", self.output_format)?;
        writeln!(
            f,
            "Output dir:     {}",
            self.output_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(current directory)".to_string())
        )?;
        writeln!(f, "CSV delimiter:  {}", self.csv_delimiter)?;
        writeln!(f, "Log level:      {}", self.log_level)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.order_tag, "Pedidos");
        assert_eq!(config.export_format, ExportFormat::Xlsx);
        assert_eq!(config.csv_delimiter_byte(), b';');
        assert_eq!(
            config.default_export_path(ExportFormat::Xlsx),
            PathBuf::from("pedidos_extracao.xlsx")
        );
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"export_format": "csv", "order_tag": "Linha"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.export_format, ExportFormat::Csv);
        assert_eq!(config.order_tag, "Linha");
        assert_eq!(config.csv_delimiter, ';');
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            output_dir: Some(dir.path().join("out")),
            csv_delimiter: ',',
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.default_export_path(ExportFormat::Csv),
            dir.path().join("out").join("pedidos_extracao.csv")
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config {
            csv_delimiter: '§',
            ..Config::default()
        };
        assert!(config.save_to(&path).is_err());

        std::fs::write(&path, r#"{"order_tag": "  "}"#).unwrap();
        assert!(Config::load_from(&path).is_err());

        std::fs::write(&path, "{not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
