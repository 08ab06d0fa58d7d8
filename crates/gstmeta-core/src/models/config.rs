//! Configuration structures for the extraction pipeline and filing report.

use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{GstMetaError, Result};

/// Main configuration for gstmeta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GstMetaConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Filing report configuration.
    pub report: ReportConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Reject GSTINs whose check character does not match.
    pub validate_gstin: bool,

    /// Resolve numeric return periods such as `03/2024`.
    pub resolve_numeric_periods: bool,

    /// Fall back to the heading and topic title when no trade name is found.
    pub use_context_fallback: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            validate_gstin: false,
            resolve_numeric_periods: true,
            use_context_fallback: true,
        }
    }
}

/// Filing report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Legal name shown when none was extracted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_name_fallback: Option<String>,

    /// Trade name shown when none was extracted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_name_fallback: Option<String>,

    /// `strftime` format for display dates.
    pub date_format: String,

    /// Portal name used in the welcome banner.
    pub portal_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            legal_name_fallback: None,
            trade_name_fallback: None,
            date_format: "%d %b %Y".to_string(),
            portal_name: "GST Common Portal".to_string(),
        }
    }
}

impl GstMetaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.report.date_format.trim().is_empty() {
            return Err(GstMetaError::Config(
                "report.date_format must not be empty".to_string(),
            ));
        }
        if StrftimeItems::new(&self.report.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(GstMetaError::Config(format!(
                "invalid report.date_format: {}",
                self.report.date_format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = GstMetaConfig::default();
        assert!(!config.extraction.validate_gstin);
        assert!(config.extraction.resolve_numeric_periods);
        assert_eq!(config.report.date_format, "%d %b %Y");
        assert_eq!(config.report.legal_name_fallback, None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: GstMetaConfig =
            serde_json::from_str(r#"{"report": {"legal_name_fallback": "AKHIL VASUDEV"}}"#)
                .unwrap();
        assert_eq!(
            config.report.legal_name_fallback.as_deref(),
            Some("AKHIL VASUDEV")
        );
        assert_eq!(config.report.portal_name, "GST Common Portal");
        assert!(config.extraction.use_context_fallback);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = GstMetaConfig::default();
        config.extraction.validate_gstin = true;
        config.report.trade_name_fallback = Some("User".to_string());
        config.save(&path).unwrap();

        let loaded = GstMetaConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_rejects_bad_date_format() {
        let mut config = GstMetaConfig::default();
        config.report.date_format = "%Q".to_string();
        assert!(config.validate().is_err());

        config.report.date_format = "   ".to_string();
        assert!(config.validate().is_err());
    }
}
