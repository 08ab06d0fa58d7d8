//! Rule-based task description parser.

use std::collections::BTreeSet;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::models::config::ExtractionConfig;
use crate::models::meta::{ExtractedMeta, Field};

use super::normalize::normalize;
use super::resolver::PeriodResolver;
use super::rules::{
    validate_gstin, ExtractionMatch, FieldExtractor, FyExtractor, GstinExtractor,
    LegalNameExtractor, PeriodExtractor, Scope, TradeNameExtractor,
};
use super::{MetaExtractor, TaskContext};

/// Where a field's value came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSource {
    pub field: Field,
    pub rule: &'static str,
    pub scope: Scope,
    /// Text the rule matched, before cleaning.
    pub matched: String,
}

/// Result of parsing one task description.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted fields.
    pub meta: ExtractedMeta,
    /// Provenance of each extracted field, in the order fields were found.
    pub sources: Vec<FieldSource>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Provenance of one field, if it was extracted.
    pub fn source(&self, field: Field) -> Option<&FieldSource> {
        self.sources.iter().find(|s| s.field == field)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn start_timer() -> Option<Instant> {
    Some(Instant::now())
}

#[cfg(target_arch = "wasm32")]
fn start_timer() -> Option<Instant> {
    None
}

/// Task description parser.
///
/// Runs the leading-line legal name rule, a line pass, a document pass and
/// the heading/topic fallback, then resolves the return period against the
/// financial year.
#[derive(Debug, Clone)]
pub struct MetaParser {
    gstin: GstinExtractor,
    fy: FyExtractor,
    period: PeriodExtractor,
    trade_name: TradeNameExtractor,
    legal_name: LegalNameExtractor,
    resolver: PeriodResolver,
    use_context_fallback: bool,
}

impl MetaParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            gstin: GstinExtractor::new(),
            fy: FyExtractor::new(),
            period: PeriodExtractor::new(),
            trade_name: TradeNameExtractor::new(),
            legal_name: LegalNameExtractor::new(),
            resolver: PeriodResolver::new(),
            use_context_fallback: true,
        }
    }

    /// Create a parser from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_gstin_validation(config.validate_gstin)
            .with_numeric_periods(config.resolve_numeric_periods)
            .with_context_fallback(config.use_context_fallback)
    }

    /// Set GSTIN checksum validation.
    pub fn with_gstin_validation(mut self, validate: bool) -> Self {
        self.gstin = self.gstin.with_validation(validate);
        self
    }

    /// Set whether numeric return periods are resolved.
    pub fn with_numeric_periods(mut self, numeric: bool) -> Self {
        self.resolver = self.resolver.with_numeric_periods(numeric);
        self
    }

    /// Set whether the heading and topic title are used for the trade name.
    pub fn with_context_fallback(mut self, enabled: bool) -> Self {
        self.use_context_fallback = enabled;
        self
    }

    /// The resolver used for return periods.
    pub fn resolver(&self) -> &PeriodResolver {
        &self.resolver
    }

    /// Parse a description with no heading or topic.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        self.parse_with_context(text, &TaskContext::default())
    }

    /// Parse a description belonging to a task with a heading and topic.
    pub fn parse_with_context(&self, text: &str, context: &TaskContext) -> ExtractionResult {
        let timer = start_timer();
        info!("Parsing task description from {} characters of text", text.len());

        let normalized = normalize(text);
        let mut meta = ExtractedMeta::new();
        let mut sources = Vec::new();

        if let Some(first) = normalized.first_line() {
            if let Some(found) = self.extract_field(Field::LegalName, first, Scope::Leading) {
                record(&mut meta, &mut sources, Field::LegalName, found);
            }
        }

        // One field per line: the first empty field that matches takes it.
        for line in &normalized.lines {
            for field in Field::ALL {
                if meta.has(field) {
                    continue;
                }
                if let Some(found) = self.extract_field(field, line, Scope::Line) {
                    record(&mut meta, &mut sources, field, found);
                    break;
                }
            }
        }

        for field in Field::ALL {
            if meta.has(field) {
                continue;
            }
            if let Some(found) = self.extract_field(field, &normalized.joined, Scope::Document) {
                record(&mut meta, &mut sources, field, found);
            }
        }

        if self.use_context_fallback && !meta.has(Field::TradeName) {
            for source in [&context.heading, &context.topic_title] {
                let source = normalize(source);
                if source.is_empty() {
                    continue;
                }
                if let Some(found) =
                    self.extract_field(Field::TradeName, &source.joined, Scope::Context)
                {
                    record(&mut meta, &mut sources, Field::TradeName, found);
                    break;
                }
            }
        }

        let mut warnings = Vec::new();

        let period = meta
            .get(Field::ReturnPeriod)
            .zip(meta.get(Field::FinancialYear))
            .map(|(raw, fy)| (raw.to_string(), self.resolver.resolve_full(raw, fy)));
        match period {
            Some((_, Some(resolved))) => {
                debug!("Resolved return period to {}", resolved);
                meta.return_period = resolved.to_string();
            }
            Some((raw, None)) => {
                warnings.push(format!("Could not resolve return period '{}'", raw));
            }
            None => {}
        }

        meta.trade_name = meta.trade_name.to_uppercase();

        warnings.extend(self.gstin_warnings(&meta, &normalized.joined));
        for field in meta.missing_fields() {
            warnings.push(format!("Could not extract {}", field));
        }

        debug!(
            "Extracted {} of {} fields",
            Field::ALL.len() - meta.missing_fields().len(),
            Field::ALL.len()
        );

        ExtractionResult {
            meta,
            sources,
            warnings,
            processing_time_ms: timer
                .map(|t| t.elapsed().as_millis() as u64)
                .unwrap_or_default(),
        }
    }

    fn extract_field(
        &self,
        field: Field,
        text: &str,
        scope: Scope,
    ) -> Option<ExtractionMatch<String>> {
        let found = match field {
            Field::Gstin => self.gstin.extract(text, scope),
            Field::FinancialYear => self
                .fy
                .extract(text, scope)
                .map(|m| m.map(|fy| fy.to_string())),
            Field::ReturnPeriod => self.period.extract(text, scope),
            Field::TradeName => self.trade_name.extract(text, scope),
            Field::LegalName => self.legal_name.extract(text, scope),
        };
        if let Some(found) = &found {
            trace!(field = %field, rule = found.rule, scope = %scope, "rule matched");
        }
        found
    }

    fn gstin_warnings(&self, meta: &ExtractedMeta, text: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        let distinct: BTreeSet<String> = self
            .gstin
            .extract_all(text, Scope::Document)
            .into_iter()
            .map(|m| m.value)
            .collect();
        if distinct.len() > 1 {
            warnings.push(format!(
                "Found {} different GSTINs, using {}",
                distinct.len(),
                meta.gstin
            ));
        }

        if let Some(gstin) = meta.get(Field::Gstin) {
            if !validate_gstin(gstin) {
                warnings.push(format!("GSTIN {} fails checksum validation", gstin));
            }
        }

        warnings
    }
}

fn record(
    meta: &mut ExtractedMeta,
    sources: &mut Vec<FieldSource>,
    field: Field,
    found: ExtractionMatch<String>,
) {
    debug!("{} = {:?} via {} ({})", field, found.value, found.rule, found.scope);
    sources.push(FieldSource {
        field,
        rule: found.rule,
        scope: found.scope,
        matched: found.source,
    });
    meta.set(field, found.value);
}

impl Default for MetaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MetaExtractor for MetaParser {
    fn extract(&self, text: &str) -> ExtractedMeta {
        self.parse(text).meta
    }

    fn extract_with_context(&self, text: &str, context: &TaskContext) -> ExtractedMeta {
        self.parse_with_context(text, context).meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_description() {
        let text = "Mr. Ravi Kumar has requested filing.\n\
                    GSTIN - 27ABCDE1234F1Z5\n\
                    FY: 2023-24\n\
                    Return Period: March";

        let result = MetaParser::new().parse(text);
        let meta = &result.meta;

        assert_eq!(meta.legal_name, "Ravi Kumar");
        assert_eq!(meta.gstin, "27ABCDE1234F1Z5");
        assert_eq!(meta.fy, "2023-2024");
        assert_eq!(meta.return_period, "March 2024");
        assert_eq!(meta.trade_name, "");

        assert_eq!(
            result.source(Field::LegalName).map(|s| s.rule),
            Some("legal_name.leading_line")
        );
        assert_eq!(result.source(Field::Gstin).map(|s| s.scope), Some(Scope::Line));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("fails checksum")));
    }

    #[test]
    fn test_trade_name_is_upper_cased() {
        let meta = MetaParser::new().extract("Jagadish Traders is operating since 2015.");
        assert_eq!(meta.trade_name, "JAGADISH TRADERS");
        assert_eq!(meta.legal_name, "");
    }

    #[test]
    fn test_one_field_per_line() {
        let text = "GSTIN: 27AAPFU0939F1ZV FY 2023-24";
        let result = MetaParser::new().parse(text);

        assert_eq!(result.meta.gstin, "27AAPFU0939F1ZV");
        assert_eq!(result.meta.fy, "2023-2024");
        assert_eq!(result.source(Field::Gstin).map(|s| s.scope), Some(Scope::Line));
        assert_eq!(
            result.source(Field::FinancialYear).map(|s| s.scope),
            Some(Scope::Document)
        );
    }

    #[test]
    fn test_line_pass_beats_document_rules() {
        let text = "please file for Dr. Sunil Rao's client\nLegal Name: Anita Desai";
        let meta = MetaParser::new().extract(text);
        assert_eq!(meta.legal_name, "Anita Desai");
    }

    #[test]
    fn test_dash_labels_on_first_line() {
        let parser = MetaParser::new();

        let meta = parser.extract("Legal Name - Anita Desai\nGSTIN - 27ABCDE1234F1Z5");
        assert_eq!(meta.legal_name, "Anita Desai");
        assert_eq!(meta.gstin, "27ABCDE1234F1Z5");

        let meta = parser.extract("Trade Name - Jagadish Traders\nGSTIN - 27ABCDE1234F1Z5");
        assert_eq!(meta.trade_name, "JAGADISH TRADERS");
        assert_eq!(meta.legal_name, "");
    }

    #[test]
    fn test_period_left_raw_without_fy() {
        let result = MetaParser::new().parse("Return Period: March");
        assert_eq!(result.meta.return_period, "March");
    }

    #[test]
    fn test_unresolved_period_warns() {
        let result = MetaParser::new().parse("FY 2023-24\nPeriod: 13/2024");
        assert_eq!(result.meta.return_period, "13/2024");
        assert!(result
            .warnings
            .iter()
            .any(|w| w == "Could not resolve return period '13/2024'"));
    }

    #[test]
    fn test_numeric_period_resolution_toggle() {
        let text = "FY 2023-24\nPeriod: 03/2024";
        assert_eq!(MetaParser::new().extract(text).return_period, "March 2024");
        assert_eq!(
            MetaParser::new()
                .with_numeric_periods(false)
                .extract(text)
                .return_period,
            "03/2024"
        );
    }

    #[test]
    fn test_context_fallback() {
        let context = TaskContext::new("Sunrise Electronics: GSTR-1 drill", "");
        let parser = MetaParser::new();

        let meta = parser.extract_with_context("file the monthly return", &context);
        assert_eq!(meta.trade_name, "SUNRISE ELECTRONICS");

        let meta = parser
            .clone()
            .with_context_fallback(false)
            .extract_with_context("file the monthly return", &context);
        assert_eq!(meta.trade_name, "");
    }

    #[test]
    fn test_topic_title_used_after_heading() {
        let context = TaskContext::new("monthly drill", "Nair Electricals Pvt Ltd");
        let meta = MetaParser::new().extract_with_context("", &context);
        assert_eq!(meta.trade_name, "NAIR ELECTRICALS PVT LTD");
    }

    #[test]
    fn test_multiple_gstins_warn() {
        let text = "GSTIN: 27AAPFU0939F1ZV\nOld GSTIN: 29ABCDE1234F1ZW";
        let result = MetaParser::new().parse(text);
        assert_eq!(result.meta.gstin, "27AAPFU0939F1ZV");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.starts_with("Found 2 different GSTINs")));
    }

    #[test]
    fn test_gstin_validation() {
        let text = "GSTIN: 27ABCDE1234F1Z5";
        assert_eq!(MetaParser::new().extract(text).gstin, "27ABCDE1234F1Z5");
        assert_eq!(
            MetaParser::new()
                .with_gstin_validation(true)
                .extract(text)
                .gstin,
            ""
        );
    }

    #[test]
    fn test_empty_input() {
        let result = MetaParser::new().parse("");
        assert!(result.meta.is_empty());
        assert!(result.sources.is_empty());
        assert_eq!(result.warnings.len(), Field::ALL.len());
    }
}
