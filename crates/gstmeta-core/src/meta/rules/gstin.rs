//! GSTIN (Goods and Services Tax Identification Number) extraction and validation.

use super::patterns::{GSTIN_LABELLED, GSTIN_SHAPE};
use super::{match_from, ExtractionMatch, FieldExtractor, Rule, Scope};
use crate::models::meta::Field;

const CHECK_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// GSTIN rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GstinRule {
    /// `GSTIN` label, optional separator, 15-character token.
    Labelled,
}

pub const GSTIN_RULES: &[GstinRule] = &[GstinRule::Labelled];

impl Rule for GstinRule {
    fn name(&self) -> &'static str {
        "gstin.labelled"
    }

    fn scopes(&self) -> &'static [Scope] {
        &[Scope::Line, Scope::Document]
    }
}

/// GSTIN field extractor.
#[derive(Debug, Clone, Default)]
pub struct GstinExtractor {
    validate: bool,
}

impl GstinExtractor {
    /// Create a new GSTIN extractor. Checksums are not validated.
    pub fn new() -> Self {
        Self { validate: false }
    }

    /// Set whether to validate the GSTIN check character.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

impl FieldExtractor for GstinExtractor {
    type Output = String;
    type Rule = GstinRule;

    fn field(&self) -> Field {
        Field::Gstin
    }

    fn rules(&self) -> &'static [GstinRule] {
        GSTIN_RULES
    }

    fn candidates(&self, rule: GstinRule, text: &str) -> Vec<ExtractionMatch<String>> {
        match rule {
            GstinRule::Labelled => GSTIN_LABELLED
                .captures_iter(text)
                .filter_map(|caps| {
                    let gstin = caps.get(1)?.as_str().to_ascii_uppercase();
                    if self.validate && !validate_gstin(&gstin) {
                        return None;
                    }
                    Some(match_from(gstin, caps.get(0)?))
                })
                .collect(),
        }
    }
}

/// Extract the first labelled GSTIN from text.
pub fn extract_gstin(text: &str) -> Option<String> {
    GstinExtractor::new()
        .extract(text, Scope::Document)
        .map(|m| m.value)
}

/// Validate a GSTIN.
///
/// Format: 2-digit state code, 10-character PAN, entity code, `Z`, and a
/// mod-36 check character computed over the first 14 characters with
/// alternating weights 1 and 2.
pub fn validate_gstin(gstin: &str) -> bool {
    let gstin = format_gstin(gstin);
    if !GSTIN_SHAPE.is_match(&gstin) {
        return false;
    }
    gstin_check_char(&gstin[..14]) == gstin.chars().nth(14)
}

/// Compute the check character for the first 14 characters of a GSTIN.
pub fn gstin_check_char(body: &str) -> Option<char> {
    if body.len() != 14 {
        return None;
    }

    let mut sum = 0u32;
    for (i, c) in body.chars().enumerate() {
        let value = CHECK_ALPHABET.iter().position(|&a| a as char == c)? as u32;
        let product = value * if i % 2 == 0 { 1 } else { 2 };
        sum += product / 36 + product % 36;
    }

    let check = ((36 - sum % 36) % 36) as usize;
    Some(CHECK_ALPHABET[check] as char)
}

/// Normalize a GSTIN: upper-case, whitespace removed.
pub fn format_gstin(gstin: &str) -> String {
    gstin
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase()
}
