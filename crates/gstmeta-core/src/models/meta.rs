//! Metadata record recovered from a task description.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fields recovered from one task description.
///
/// Every field is always present; an empty string means the extractor could
/// not resolve it. Serialized keys match the mapping the portal views read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractedMeta {
    /// GST identification number, 15 upper-case alphanumerics.
    #[serde(rename = "GSTIN", default)]
    pub gstin: String,

    /// Financial year in `YYYY-YYYY` form.
    #[serde(rename = "FY", default)]
    pub fy: String,

    /// Return period, `"<Month> <Year>"` once resolved.
    #[serde(rename = "ReturnPeriod", default)]
    pub return_period: String,

    /// Trade (business) name, upper-cased.
    #[serde(rename = "TradeName", default)]
    pub trade_name: String,

    /// Legal (proprietor) name, casing preserved.
    #[serde(rename = "LegalName", default)]
    pub legal_name: String,
}

impl ExtractedMeta {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a field, `None` when absent.
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Gstin => &self.gstin,
            Field::FinancialYear => &self.fy,
            Field::ReturnPeriod => &self.return_period,
            Field::TradeName => &self.trade_name,
            Field::LegalName => &self.legal_name,
        };
        (!value.is_empty()).then_some(value.as_str())
    }

    /// Whether a field has been resolved.
    pub fn has(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    pub(crate) fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Gstin => &mut self.gstin,
            Field::FinancialYear => &mut self.fy,
            Field::ReturnPeriod => &mut self.return_period,
            Field::TradeName => &mut self.trade_name,
            Field::LegalName => &mut self.legal_name,
        };
        *slot = value;
    }

    /// Fields that were not resolved.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL.into_iter().filter(|f| !self.has(*f)).collect()
    }

    /// True when no field was resolved.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| !self.has(*f))
    }
}

/// The five fields of an [`ExtractedMeta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "GSTIN")]
    Gstin,
    #[serde(rename = "FY")]
    FinancialYear,
    #[serde(rename = "ReturnPeriod")]
    ReturnPeriod,
    #[serde(rename = "TradeName")]
    TradeName,
    #[serde(rename = "LegalName")]
    LegalName,
}

impl Field {
    /// Order in which the line pass offers a line to each field.
    pub const ALL: [Field; 5] = [
        Field::Gstin,
        Field::FinancialYear,
        Field::ReturnPeriod,
        Field::TradeName,
        Field::LegalName,
    ];

    /// Key used in serialized output.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Gstin => "GSTIN",
            Field::FinancialYear => "FY",
            Field::ReturnPeriod => "ReturnPeriod",
            Field::TradeName => "TradeName",
            Field::LegalName => "LegalName",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_meta_serializes_every_key() {
        let json = serde_json::to_value(ExtractedMeta::new()).unwrap();
        for field in Field::ALL {
            assert_eq!(json[field.key()], "", "missing key {}", field);
        }
    }

    #[test]
    fn test_get_treats_empty_as_absent() {
        let mut meta = ExtractedMeta::new();
        assert_eq!(meta.get(Field::Gstin), None);

        meta.set(Field::Gstin, "27AAPFU0939F1ZV".to_string());
        assert_eq!(meta.get(Field::Gstin), Some("27AAPFU0939F1ZV"));
        assert_eq!(meta.missing_fields().len(), 4);
        assert!(!meta.is_empty());
    }
}
