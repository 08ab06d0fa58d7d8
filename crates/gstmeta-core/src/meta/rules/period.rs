//! Return period extraction.
//!
//! Values are kept as written (`Mar'24`, `03/2024`); turning them into a
//! month and year is the resolver's job.

use super::patterns::{
    PERIOD_MONTH_WORD, PERIOD_MONTH_YEAR, PERIOD_OR_MONTH_LABELLED, PERIOD_YEAR_MONTH,
    RETURN_PERIOD_LABELLED,
};
use super::{match_from, ExtractionMatch, FieldExtractor, Rule, Scope};
use crate::meta::normalize::clean_value;
use crate::meta::resolver::parse_month;
use crate::models::meta::Field;

/// Return period rules, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodRule {
    /// `Return Period: March 2024`
    ReturnPeriodLabel,
    /// `Period - Mar'24`, `Month: 03/2024`
    PeriodOrMonthLabel,
}

pub const PERIOD_RULES: &[PeriodRule] = &[
    PeriodRule::ReturnPeriodLabel,
    PeriodRule::PeriodOrMonthLabel,
];

impl Rule for PeriodRule {
    fn name(&self) -> &'static str {
        match self {
            PeriodRule::ReturnPeriodLabel => "return_period.return_period_label",
            PeriodRule::PeriodOrMonthLabel => "return_period.period_or_month_label",
        }
    }

    fn scopes(&self) -> &'static [Scope] {
        &[Scope::Line, Scope::Document]
    }
}

/// True if `value` is a month word (with optional year) or a numeric
/// `MM/YYYY` / `YYYY/MM` period.
pub fn is_period_value(value: &str) -> bool {
    if let Some(caps) = PERIOD_MONTH_WORD.captures(value) {
        return parse_month(&caps[1]).is_some();
    }
    PERIOD_MONTH_YEAR.is_match(value) || PERIOD_YEAR_MONTH.is_match(value)
}

/// Return period field extractor.
#[derive(Debug, Clone, Default)]
pub struct PeriodExtractor;

impl PeriodExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for PeriodExtractor {
    type Output = String;
    type Rule = PeriodRule;

    fn field(&self) -> Field {
        Field::ReturnPeriod
    }

    fn rules(&self) -> &'static [PeriodRule] {
        PERIOD_RULES
    }

    fn candidates(&self, rule: PeriodRule, text: &str) -> Vec<ExtractionMatch<String>> {
        let pattern = match rule {
            PeriodRule::ReturnPeriodLabel => &*RETURN_PERIOD_LABELLED,
            PeriodRule::PeriodOrMonthLabel => &*PERIOD_OR_MONTH_LABELLED,
        };

        pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let value = clean_value(caps.get(1)?.as_str());
                if !is_period_value(&value) {
                    return None;
                }
                Some(match_from(value, caps.get(0)?))
            })
            .collect()
    }
}

/// Extract the first labelled return period from text.
pub fn extract_return_period(text: &str) -> Option<String> {
    PeriodExtractor::new()
        .extract(text, Scope::Document)
        .map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rule_order() {
        assert_eq!(
            PERIOD_RULES,
            &[PeriodRule::ReturnPeriodLabel, PeriodRule::PeriodOrMonthLabel]
        );
    }

    #[test]
    fn test_extract_month_word_forms() {
        assert_eq!(extract_return_period("Return Period: March"), Some("March".into()));
        assert_eq!(extract_return_period("Period - Mar'24"), Some("Mar'24".into()));
        assert_eq!(extract_return_period("month = sept 2023"), Some("sept 2023".into()));
        assert_eq!(extract_return_period("Return Period Dec-2023"), Some("Dec-2023".into()));
    }

    #[test]
    fn test_extract_numeric_forms() {
        assert_eq!(extract_return_period("Period: 03/2024"), Some("03/2024".into()));
        assert_eq!(extract_return_period("Month: 2024-03"), Some("2024-03".into()));
    }

    #[test]
    fn test_return_period_label_wins() {
        let text = "Month: April\nReturn Period: March 2024";
        let found = PeriodExtractor::new().extract(text, Scope::Document).unwrap();
        assert_eq!(found.value, "March 2024");
        assert_eq!(found.rule, "return_period.return_period_label");
    }

    #[test]
    fn test_skips_non_month_words() {
        assert_eq!(
            extract_return_period("Period from April 2024"),
            None
        );
        assert_eq!(
            extract_return_period("for the period from X. Month: June"),
            Some("June".into())
        );
    }

    #[test]
    fn test_is_period_value() {
        assert!(is_period_value("March 2024"));
        assert!(is_period_value("Sep"));
        assert!(is_period_value("12/23"));
        assert!(!is_period_value("Quarter"));
        assert!(!is_period_value("2024"));
    }
}
