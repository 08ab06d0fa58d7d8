//! WASM bindings for GST task-description metadata extraction.
//!
//! This crate provides WebAssembly bindings for the portal front end, so task
//! metadata and due dates can be computed in the browser.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use gstmeta_core::meta::rules::format_gstin;
use gstmeta_core::report::due_dates as period_due_dates;
use gstmeta_core::{
    ExtractedMeta, FilingReport, MetaExtractor, MetaParser, PeriodResolver, ReportConfig,
    TaskContext,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract task metadata from a description.
///
/// Returns an object with `GSTIN`, `FY`, `ReturnPeriod`, `TradeName` and
/// `LegalName`; missing fields are empty strings.
#[wasm_bindgen]
pub fn extract_meta_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&MetaParser::new().extract(text))
}

/// Same as [`extract_meta_from_text`], as a pretty-printed JSON string.
#[wasm_bindgen]
pub fn extract_meta_json(text: &str) -> Result<String, JsValue> {
    serde_json::to_string_pretty(&MetaParser::new().extract(text))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Build the filing report for metadata returned by the extractor.
#[wasm_bindgen]
pub fn build_report(meta: JsValue) -> Result<JsValue, JsValue> {
    let meta: ExtractedMeta =
        serde_wasm_bindgen::from_value(meta).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&FilingReport::build(&meta, &ReportConfig::default()))
}

#[derive(Serialize)]
struct PeriodJs {
    month: Option<u32>,
    month_name: Option<&'static str>,
    year: Option<i32>,
}

/// Resolve a return period against a financial year.
///
/// Returns `{ month, month_name, year }`; unresolved parts are `null`.
#[wasm_bindgen]
pub fn resolve_period(raw: &str, fy: &str) -> Result<JsValue, JsValue> {
    let (month, year) = gstmeta_core::resolve_period(raw, fy);
    to_js(&PeriodJs {
        month: month.map(|m| m.number_from_month()),
        month_name: month.map(|m| m.name()),
        year,
    })
}

/// GSTR-1 and GSTR-3B due dates for a return period.
///
/// Returns an empty array when the period has no month or year.
#[wasm_bindgen]
pub fn due_dates(raw: &str, fy: &str) -> Result<JsValue, JsValue> {
    let dates = PeriodResolver::new()
        .resolve_full(raw, fy)
        .map(|period| period_due_dates(period, &ReportConfig::default().date_format))
        .unwrap_or_default();
    to_js(&dates)
}

/// Whether a string reads as a person's name.
#[wasm_bindgen]
pub fn is_person(name: &str) -> bool {
    gstmeta_core::is_person(name)
}

/// Whether a string reads as a business name.
#[wasm_bindgen]
pub fn is_company(name: &str) -> bool {
    gstmeta_core::is_company(name)
}

/// Validate a GSTIN, including its check character.
#[wasm_bindgen]
pub fn validate_gstin(gstin: &str) -> bool {
    gstmeta_core::validate_gstin(gstin)
}

/// Normalize a GSTIN: upper-case, whitespace removed.
#[wasm_bindgen]
pub fn normalize_gstin(gstin: &str) -> String {
    format_gstin(gstin)
}

/// Metadata extractor class for browser use.
#[wasm_bindgen]
pub struct MetaExtractorJs {
    parser: MetaParser,
    report: ReportConfig,
    log_warnings: bool,
}

#[wasm_bindgen]
impl MetaExtractorJs {
    /// Create a new extractor with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: MetaParser::new(),
            report: ReportConfig::default(),
            log_warnings: false,
        }
    }

    /// Only accept GSTINs with a valid check character.
    #[wasm_bindgen]
    pub fn set_validate_gstin(&mut self, validate: bool) {
        self.parser = self.parser.clone().with_gstin_validation(validate);
    }

    /// Use the heading and topic title when the text names no business.
    #[wasm_bindgen]
    pub fn set_context_fallback(&mut self, enabled: bool) {
        self.parser = self.parser.clone().with_context_fallback(enabled);
    }

    /// Placeholder legal name used in reports when none is extracted.
    #[wasm_bindgen]
    pub fn set_legal_name_fallback(&mut self, name: Option<String>) {
        self.report.legal_name_fallback = name;
    }

    /// Log extraction warnings to the browser console.
    #[wasm_bindgen]
    pub fn set_log_warnings(&mut self, enabled: bool) {
        self.log_warnings = enabled;
    }

    /// Extract metadata from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.extract(text))
    }

    /// Extract metadata from text, with the task's heading and topic title.
    #[wasm_bindgen]
    pub fn extract_with_context(
        &self,
        text: &str,
        heading: &str,
        topic_title: &str,
    ) -> Result<JsValue, JsValue> {
        let context = TaskContext::new(heading, topic_title);
        to_js(&self.parser.extract_with_context(text, &context))
    }

    /// Get extraction result with provenance and warnings.
    #[wasm_bindgen]
    pub fn extract_with_details(
        &self,
        text: &str,
        heading: &str,
        topic_title: &str,
    ) -> Result<JsValue, JsValue> {
        let result = self
            .parser
            .parse_with_context(text, &TaskContext::new(heading, topic_title));

        if self.log_warnings {
            for warning in &result.warnings {
                web_sys::console::warn_1(&JsValue::from_str(warning));
            }
        }

        to_js(&result)
    }

    /// Extract metadata and build the filing report in one step.
    #[wasm_bindgen]
    pub fn report(&self, text: &str, heading: &str, topic_title: &str) -> Result<JsValue, JsValue> {
        let meta = self
            .parser
            .extract_with_context(text, &TaskContext::new(heading, topic_title));
        to_js(&FilingReport::build_with(
            &meta,
            &self.report,
            self.parser.resolver(),
        ))
    }

    /// Keys of the fields the text does not provide.
    #[wasm_bindgen]
    pub fn missing_fields(&self, text: &str) -> js_sys::Array {
        self.parser
            .extract(text)
            .missing_fields()
            .into_iter()
            .map(|field| JsValue::from_str(field.key()))
            .collect()
    }
}

impl Default for MetaExtractorJs {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical display string of a resolved period, e.g. `"March 2024"`.
#[wasm_bindgen]
pub fn format_period(raw: &str, fy: &str) -> Option<String> {
    PeriodResolver::new()
        .resolve_full(raw, fy)
        .map(|period| period.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const DESCRIPTION: &str = "Mr. Ravi Kumar has requested filing.\n\
        GSTIN: 27ABCDE1234F1Z5\nFY: 2023-24\nReturn Period: March";

    #[wasm_bindgen_test]
    fn test_classifiers() {
        assert!(is_person("Ravi Kumar"));
        assert!(!is_person("Jagadish Traders"));
        assert!(is_company("JAGADISH TRADERS"));
    }

    #[wasm_bindgen_test]
    fn test_normalize_gstin() {
        assert_eq!(normalize_gstin("27abcde1234f1z5"), "27ABCDE1234F1Z5");
    }

    #[wasm_bindgen_test]
    fn test_format_period() {
        assert_eq!(format_period("March", "2023-2024"), Some("March 2024".to_string()));
        assert_eq!(format_period("March", ""), None);
    }

    #[wasm_bindgen_test]
    fn test_extract_round_trip() {
        let value = extract_meta_from_text(DESCRIPTION).unwrap();
        let meta: ExtractedMeta = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(meta.legal_name, "Ravi Kumar");
        assert_eq!(meta.return_period, "March 2024");
    }

    #[wasm_bindgen_test]
    fn test_build_report() {
        let meta = extract_meta_from_text(DESCRIPTION).unwrap();
        let report: FilingReport =
            serde_wasm_bindgen::from_value(build_report(meta).unwrap()).unwrap();
        assert_eq!(report.gstr1_due_display, "11 Apr 2024");
        assert_eq!(report.gstr3b_due_iso, "2024-04-21");
    }

    #[wasm_bindgen_test]
    fn test_missing_fields() {
        let extractor = MetaExtractorJs::new();
        let missing = extractor.missing_fields(DESCRIPTION);
        assert_eq!(missing.length(), 1);
        assert_eq!(missing.get(0).as_string(), Some("TradeName".to_string()));
    }
}
