//! Legal (proprietor) name extraction.

use regex::Regex;

use super::patterns::{
    HONORIFIC_NAME, LEGAL_LEADING_HONORIFIC, LEGAL_LEADING_PLAIN, LEGAL_NAME_LABELLED,
    LEGAL_NAME_SUBJECT, OWNER_LABELLED,
};
use super::{match_from, ExtractionMatch, FieldExtractor, Rule, Scope};
use crate::meta::classify::{contains_company_suffix, is_person, starts_with_honorific};
use crate::meta::normalize::clean_person_candidate;
use crate::models::meta::Field;

/// Separators that turn a leading capitalized phrase into a field label.
const LABEL_SEPARATORS: [char; 5] = [':', '=', '-', '\u{2013}', '\u{2014}'];

/// Legal name rules, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegalNameRule {
    /// Name at the very start of the description, with or without an honorific.
    LeadingLine,
    /// `Legal Name: ...`
    Labelled,
    /// `Owner: ...`, `Proprietor name - ...`, `Managing Partner = ...`
    OwnerLabel,
    /// `Mr. Ravi Kumar` anywhere.
    Honorific,
    /// `Ravi Kumar has requested ...` at the start of the description.
    LeadingSubject,
}

pub const LEGAL_NAME_RULES: &[LegalNameRule] = &[
    LegalNameRule::LeadingLine,
    LegalNameRule::Labelled,
    LegalNameRule::OwnerLabel,
    LegalNameRule::Honorific,
    LegalNameRule::LeadingSubject,
];

impl Rule for LegalNameRule {
    fn name(&self) -> &'static str {
        match self {
            LegalNameRule::LeadingLine => "legal_name.leading_line",
            LegalNameRule::Labelled => "legal_name.labelled",
            LegalNameRule::OwnerLabel => "legal_name.owner_label",
            LegalNameRule::Honorific => "legal_name.honorific",
            LegalNameRule::LeadingSubject => "legal_name.leading_subject",
        }
    }

    fn scopes(&self) -> &'static [Scope] {
        match self {
            LegalNameRule::LeadingLine => &[Scope::Leading],
            LegalNameRule::Labelled => &[Scope::Line],
            LegalNameRule::OwnerLabel
            | LegalNameRule::Honorific
            | LegalNameRule::LeadingSubject => &[Scope::Document],
        }
    }
}

fn accept(raw: &str) -> Option<String> {
    let candidate = clean_person_candidate(raw);
    is_person(&candidate).then_some(candidate)
}

fn person_captures(pattern: &Regex, text: &str) -> Vec<ExtractionMatch<String>> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let value = accept(caps.get(1)?.as_str())?;
            Some(match_from(value, caps.get(0)?))
        })
        .collect()
}

/// Legal name field extractor.
#[derive(Debug, Clone, Default)]
pub struct LegalNameExtractor;

impl LegalNameExtractor {
    pub fn new() -> Self {
        Self
    }

    fn leading_line(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let first = text.lines().next()?;

        // An honorific at the start decides on its own.
        if let Some(caps) = LEGAL_LEADING_HONORIFIC.captures(first) {
            let value = accept(caps.get(1)?.as_str())?;
            return Some(match_from(value, caps.get(0)?));
        }

        // "Trade Name: ..." and "Legal Name - ..." are labels, not names
        let caps = LEGAL_LEADING_PLAIN.captures(first)?;
        let whole = caps.get(0)?;
        if first[whole.end()..]
            .trim_start()
            .starts_with(LABEL_SEPARATORS)
        {
            return None;
        }
        let value = accept(caps.get(1)?.as_str())?;
        Some(match_from(value, whole))
    }

    fn leading_subject(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let caps = LEGAL_NAME_SUBJECT.captures(text.trim_start())?;
        let subject = caps.get(1)?.as_str();
        if starts_with_honorific(subject) || contains_company_suffix(subject) {
            return None;
        }
        let value = accept(subject)?;
        Some(match_from(value, caps.get(0)?))
    }
}

impl FieldExtractor for LegalNameExtractor {
    type Output = String;
    type Rule = LegalNameRule;

    fn field(&self) -> Field {
        Field::LegalName
    }

    fn rules(&self) -> &'static [LegalNameRule] {
        LEGAL_NAME_RULES
    }

    fn candidates(&self, rule: LegalNameRule, text: &str) -> Vec<ExtractionMatch<String>> {
        match rule {
            LegalNameRule::LeadingLine => self.leading_line(text).into_iter().collect(),
            LegalNameRule::Labelled => person_captures(&LEGAL_NAME_LABELLED, text),
            LegalNameRule::OwnerLabel => person_captures(&OWNER_LABELLED, text),
            LegalNameRule::Honorific => person_captures(&HONORIFIC_NAME, text),
            LegalNameRule::LeadingSubject => self.leading_subject(text).into_iter().collect(),
        }
    }
}

/// Extract a legal name from a whole description.
///
/// Runs the leading-line rule on the first line, then the labelled rule on
/// every line, then the document rules.
pub fn extract_legal_name(text: &str) -> Option<String> {
    let extractor = LegalNameExtractor::new();
    extractor
        .extract(text, Scope::Leading)
        .or_else(|| text.lines().find_map(|line| extractor.extract(line, Scope::Line)))
        .or_else(|| extractor.extract(text, Scope::Document))
        .map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rule_order() {
        assert_eq!(
            LEGAL_NAME_RULES,
            &[
                LegalNameRule::LeadingLine,
                LegalNameRule::Labelled,
                LegalNameRule::OwnerLabel,
                LegalNameRule::Honorific,
                LegalNameRule::LeadingSubject,
            ]
        );
    }

    #[test]
    fn test_leading_line_with_honorific() {
        let text = "Mr. Ravi Kumar has requested filing.\nGSTIN: 27ABCDE1234F1Z5";
        let found = LegalNameExtractor::new().extract(text, Scope::Leading).unwrap();
        assert_eq!(found.value, "Ravi Kumar");
        assert_eq!(found.rule, "legal_name.leading_line");
    }

    #[test]
    fn test_leading_line_plain() {
        assert_eq!(extract_legal_name("Meera Nair\nFY 2023-24"), Some("Meera Nair".into()));
        assert_eq!(extract_legal_name("Ravi K. owns a shop"), Some("Ravi K.".into()));
    }

    #[test]
    fn test_leading_line_honorific_decides_alone() {
        // "Dr. Apex Labs" fails the person check; the plain form is not tried
        let extractor = LegalNameExtractor::new();
        assert!(extractor.extract("Dr. Apex Labs", Scope::Leading).is_none());
    }

    #[test]
    fn test_leading_label_is_not_a_name() {
        let extractor = LegalNameExtractor::new();
        assert!(extractor.extract("Trade Name: Apex Infotech", Scope::Leading).is_none());
        assert!(extractor.extract("Return Period = March", Scope::Leading).is_none());
    }

    #[test]
    fn test_leading_dash_label_is_not_a_name() {
        let extractor = LegalNameExtractor::new();
        assert!(extractor.extract("Legal Name - Anita Desai", Scope::Leading).is_none());
        assert!(extractor.extract("Trade Name \u{2013} Apex Infotech", Scope::Leading).is_none());
        assert!(extractor.extract("Owner Name \u{2014} Ravi Kumar", Scope::Leading).is_none());
        assert_eq!(
            extract_legal_name("Legal Name - Anita Desai\nGSTIN - 27ABCDE1234F1Z5"),
            Some("Anita Desai".to_string())
        );
    }

    #[test]
    fn test_lone_honorific_is_rejected() {
        assert_eq!(extract_legal_name("Mr. has filed a return."), None);
    }

    #[test]
    fn test_apostrophe_in_surname() {
        assert_eq!(
            extract_legal_name("Mr. Arun D'souza has requested filing."),
            Some("Arun D'souza".to_string())
        );
    }

    #[test]
    fn test_labelled() {
        let text = "task details\nLegal Name: Anita Desai.";
        assert_eq!(extract_legal_name(text), Some("Anita Desai".into()));
    }

    #[test]
    fn test_owner_label() {
        let text = "the shop is run by\nProprietor name - Suresh Menon";
        assert_eq!(extract_legal_name(text), Some("Suresh Menon".into()));

        let text = "details follow\nManaging Partner: Kavita Rao";
        assert_eq!(extract_legal_name(text), Some("Kavita Rao".into()));
    }

    #[test]
    fn test_honorific_anywhere() {
        let text = "please file for Smt. Lakshmi Iyer today";
        assert_eq!(extract_legal_name(text), Some("Lakshmi Iyer".into()));
    }

    #[test]
    fn test_honorific_is_case_sensitive() {
        assert_eq!(extract_legal_name("the mr Ravi case"), None);
    }

    #[test]
    fn test_company_names_are_not_legal_names() {
        assert_eq!(extract_legal_name("Jagadish Traders is operating since 2015."), None);
        assert_eq!(extract_legal_name("Legal Name: Apex Infotech"), None);
    }

    #[test]
    fn test_labelled_only_in_line_scope() {
        let extractor = LegalNameExtractor::new();
        assert!(extractor
            .extract("Legal Name: Anita Desai", Scope::Document)
            .is_none());
        assert!(extractor
            .extract("Legal Name: Anita Desai", Scope::Line)
            .is_some());
    }
}
