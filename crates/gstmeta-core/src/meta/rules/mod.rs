//! Rule-based field extractors for GST task descriptions.
//!
//! Every field has an ordered list of named rules. Each rule declares the
//! scopes it may run in; an extractor asked for a scope tries only the rules
//! that declare it, in order, and the first accepted candidate wins.

pub mod fiscal_year;
pub mod gstin;
pub mod legal_name;
pub mod patterns;
pub mod period;
pub mod trade_name;

pub use fiscal_year::{extract_fy, normalize_fy, FinancialYear, FyExtractor, FyRule};
pub use gstin::{extract_gstin, format_gstin, validate_gstin, GstinExtractor, GstinRule};
pub use legal_name::{extract_legal_name, LegalNameExtractor, LegalNameRule};
pub use period::{extract_return_period, is_period_value, PeriodExtractor, PeriodRule};
pub use trade_name::{extract_trade_name, TradeNameExtractor, TradeNameRule};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::meta::Field;

/// The slice of input a rule is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// First line of the description only.
    Leading,
    /// A single normalized line.
    Line,
    /// All lines joined with `\n`.
    Document,
    /// The task heading or topic title.
    Context,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scope::Leading => "leading",
            Scope::Line => "line",
            Scope::Document => "document",
            Scope::Context => "context",
        };
        f.write_str(name)
    }
}

/// A named extraction rule.
pub trait Rule: Copy + fmt::Debug + PartialEq + 'static {
    /// Stable identifier, e.g. `"gstin.labelled"`.
    fn name(&self) -> &'static str;

    /// Scopes this rule participates in.
    fn scopes(&self) -> &'static [Scope];

    fn applies_to(&self, scope: Scope) -> bool {
        self.scopes().contains(&scope)
    }
}

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// The rule set this extractor runs.
    type Rule: Rule;

    /// Field this extractor fills.
    fn field(&self) -> Field;

    /// Rules in priority order.
    fn rules(&self) -> &'static [Self::Rule];

    /// Accepted candidates for one rule, in text order.
    fn candidates(&self, rule: Self::Rule, text: &str) -> Vec<ExtractionMatch<Self::Output>>;

    /// First accepted candidate of the first rule that yields one.
    fn extract(&self, text: &str, scope: Scope) -> Option<ExtractionMatch<Self::Output>> {
        self.rules()
            .iter()
            .filter(|rule| rule.applies_to(scope))
            .find_map(|rule| {
                self.candidates(*rule, text)
                    .into_iter()
                    .next()
                    .map(|m| m.with_rule(rule.name(), scope))
            })
    }

    /// Every accepted candidate of every rule for the scope.
    fn extract_all(&self, text: &str, scope: Scope) -> Vec<ExtractionMatch<Self::Output>> {
        self.rules()
            .iter()
            .filter(|rule| rule.applies_to(scope))
            .flat_map(|rule| {
                self.candidates(*rule, text)
                    .into_iter()
                    .map(move |m| m.with_rule(rule.name(), scope))
            })
            .collect()
    }
}

/// A candidate value and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Rule that produced the value.
    pub rule: &'static str,
    /// Scope the rule ran in.
    pub scope: Scope,
    /// Byte span of the match in the scanned text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            rule: "",
            scope: Scope::Document,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    pub fn with_rule(mut self, rule: &'static str, scope: Scope) -> Self {
        self.rule = rule;
        self.scope = scope;
        self
    }

    /// Convert the value, keeping the provenance.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExtractionMatch<U> {
        ExtractionMatch {
            value: f(self.value),
            rule: self.rule,
            scope: self.scope,
            position: self.position,
            source: self.source,
        }
    }
}

/// Build a match from the whole-pattern span of a capture set.
pub(crate) fn match_from<T>(value: T, whole: regex::Match<'_>) -> ExtractionMatch<T> {
    ExtractionMatch::new(value, whole.as_str()).with_position(whole.start(), whole.end())
}
