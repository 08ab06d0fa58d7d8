//! Trade (business) name extraction.

use super::patterns::{CONTEXT_NAME, TRADE_NAME_LABELLED, TRADE_NAME_PHRASE, TRADE_NAME_SUBJECT};
use super::{match_from, ExtractionMatch, FieldExtractor, Rule, Scope};
use crate::meta::classify::{is_company, starts_with_honorific};
use crate::meta::normalize::{clean_candidate, scrub_credentials, strip_quotes};
use crate::models::meta::Field;

/// Trade name rules, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeNameRule {
    /// `Trade Name: ...`, `Business Name - ...`
    Labelled,
    /// `... named "Sai Ram Stores"`, `trading as ...`, `d/b/a ...`
    NamedPhrase,
    /// `Jagadish Traders is operating since 2015.`
    LeadingSubject,
    /// Capitalised run of the task heading or topic title.
    Context,
}

pub const TRADE_NAME_RULES: &[TradeNameRule] = &[
    TradeNameRule::Labelled,
    TradeNameRule::NamedPhrase,
    TradeNameRule::LeadingSubject,
    TradeNameRule::Context,
];

impl Rule for TradeNameRule {
    fn name(&self) -> &'static str {
        match self {
            TradeNameRule::Labelled => "trade_name.labelled",
            TradeNameRule::NamedPhrase => "trade_name.named_phrase",
            TradeNameRule::LeadingSubject => "trade_name.leading_subject",
            TradeNameRule::Context => "trade_name.context",
        }
    }

    fn scopes(&self) -> &'static [Scope] {
        match self {
            TradeNameRule::Labelled => &[Scope::Line, Scope::Document],
            TradeNameRule::NamedPhrase | TradeNameRule::LeadingSubject => &[Scope::Document],
            TradeNameRule::Context => &[Scope::Context],
        }
    }
}

/// Clean a raw capture and keep it only if it reads as a business name.
fn accept(raw: &str) -> Option<String> {
    let candidate = strip_quotes(&clean_candidate(raw));
    is_company(&candidate).then_some(candidate)
}

/// Trade name field extractor.
///
/// Values keep their original casing here; the aggregator upper-cases the
/// final trade name.
#[derive(Debug, Clone, Default)]
pub struct TradeNameExtractor;

impl TradeNameExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for TradeNameExtractor {
    type Output = String;
    type Rule = TradeNameRule;

    fn field(&self) -> Field {
        Field::TradeName
    }

    fn rules(&self) -> &'static [TradeNameRule] {
        TRADE_NAME_RULES
    }

    fn candidates(&self, rule: TradeNameRule, text: &str) -> Vec<ExtractionMatch<String>> {
        match rule {
            TradeNameRule::Labelled => TRADE_NAME_LABELLED
                .captures_iter(text)
                .filter_map(|caps| {
                    let value = accept(caps.get(1)?.as_str())?;
                    Some(match_from(value, caps.get(0)?))
                })
                .collect(),
            TradeNameRule::NamedPhrase => {
                let scrubbed = scrub_credentials(text);
                TRADE_NAME_PHRASE
                    .captures_iter(&scrubbed)
                    .filter_map(|caps| {
                        let value = accept(caps.get(1)?.as_str())?;
                        Some(match_from(value, caps.get(0)?))
                    })
                    .collect()
            }
            TradeNameRule::LeadingSubject => {
                let scrubbed = scrub_credentials(text);
                let scrubbed = scrubbed.trim_start();
                TRADE_NAME_SUBJECT
                    .captures(scrubbed)
                    .and_then(|caps| {
                        let subject = caps.get(1)?;
                        if starts_with_honorific(subject.as_str()) {
                            return None;
                        }
                        let value = accept(subject.as_str())?;
                        Some(match_from(value, caps.get(0)?))
                    })
                    .into_iter()
                    .collect()
            }
            TradeNameRule::Context => CONTEXT_NAME
                .captures_iter(text)
                .filter_map(|caps| {
                    let value = accept(caps.get(1)?.as_str())?;
                    Some(match_from(value, caps.get(0)?))
                })
                .collect(),
        }
    }
}

/// Extract a trade name from a whole description, original casing.
pub fn extract_trade_name(text: &str) -> Option<String> {
    TradeNameExtractor::new()
        .extract(text, Scope::Document)
        .map(|m| m.value)
}
