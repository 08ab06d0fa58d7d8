//! Text normalization and candidate cleaning.

use super::rules::patterns::{CREDENTIAL_LINE, DATE_LIKE_TAIL, HORIZONTAL_SPACE};

/// Description text split into trimmed, non-empty lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    pub lines: Vec<String>,
    pub joined: String,
}

impl NormalizedText {
    pub fn first_line(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Normalize a raw description.
///
/// Unifies line endings, maps en/em dashes and the minus sign to `-`, trims
/// each line and drops blank ones. `joined` is the surviving lines joined
/// with `\n`.
pub fn normalize(text: &str) -> NormalizedText {
    let unified = text
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace(['\u{2013}', '\u{2014}', '\u{2212}'], "-");

    let lines: Vec<String> = unified
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    let joined = lines.join("\n");

    NormalizedText { lines, joined }
}

const VALUE_TRIM: &[char] = &[' ', '\t', '\r', '\n', '-', ':', '=', '\u{2022}'];
const CANDIDATE_TRIM: &[char] = &[
    ' ', '\t', '\r', '\n', '-', '\u{2013}', '\u{2014}', ':', '.', ',', '\'', '\u{2022}',
];

/// Trim whitespace and separator debris from a labelled value.
pub fn clean_value(value: &str) -> String {
    value.trim_matches(VALUE_TRIM).to_string()
}

/// Remove one pair of matching quotes around a value.
pub fn strip_quotes(value: &str) -> String {
    let trimmed = value.trim();
    let mut chars = trimmed.chars();
    let pair = (chars.next(), chars.next_back());
    match pair {
        (Some(open), Some(close))
            if (open == close && (open == '"' || open == '\''))
                || (open == '\u{201C}' && close == '\u{201D}') =>
        {
            chars.as_str().trim().to_string()
        }
        _ => trimmed.to_string(),
    }
}

/// Clean a company-name candidate.
///
/// Strips separator and quote debris from both ends, then drops a trailing
/// date clause such as `since 2015` or `, 12th March 2020`.
pub fn clean_candidate(value: &str) -> String {
    let trimmed = value.trim_matches(CANDIDATE_TRIM);
    let without_tail = DATE_LIKE_TAIL.replace(trimmed, "");
    without_tail.trim_matches(CANDIDATE_TRIM).to_string()
}

/// Clean a person-name candidate.
///
/// Same as [`clean_candidate`] except that the period of a trailing initial
/// (`Ravi K.`) survives; a sentence period after a full word does not.
pub fn clean_person_candidate(value: &str) -> String {
    let cleaned = clean_candidate(value);
    let raw = value.trim_end();
    let last_token = raw.rsplit([' ', '\t']).next().unwrap_or_default();
    let ends_with_initial = last_token.len() == 2
        && last_token.ends_with('.')
        && last_token.starts_with(|c: char| c.is_ascii_uppercase());

    if ends_with_initial && raw.ends_with(&format!("{cleaned}.")) {
        format!("{cleaned}.")
    } else {
        cleaned
    }
}

/// Remove credential lines (`User ID:`, `Password =`, `GSTIN:` ...) and
/// collapse runs of horizontal whitespace.
pub fn scrub_credentials(text: &str) -> String {
    let scrubbed = CREDENTIAL_LINE.replace_all(text, "");
    HORIZONTAL_SPACE.replace_all(&scrubbed, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_lines() {
        let text = "  GSTIN \u{2013} 27AAPFU0939F1ZV \r\n\r\n\tFY 2023-24  \rdone ";
        let normalized = normalize(text);

        assert_eq!(
            normalized.lines,
            vec!["GSTIN - 27AAPFU0939F1ZV", "FY 2023-24", "done"]
        );
        assert_eq!(normalized.joined, "GSTIN - 27AAPFU0939F1ZV\nFY 2023-24\ndone");
        assert_eq!(normalized.first_line(), Some("GSTIN - 27AAPFU0939F1ZV"));
    }

    #[test]
    fn test_normalize_blank_input() {
        let normalized = normalize(" \n\t\r\n ");
        assert!(normalized.is_empty());
        assert_eq!(normalized.joined, "");
    }

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value(" : Mar'24 "), "Mar'24");
        assert_eq!(clean_value("= March 2024 -"), "March 2024");
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"Sai Ram Stores\""), "Sai Ram Stores");
        assert_eq!(strip_quotes("\u{201C}Sai Ram\u{201D}"), "Sai Ram");
        assert_eq!(strip_quotes("'Sai Ram\""), "'Sai Ram\"");
        assert_eq!(strip_quotes("\""), "\"");
    }

    #[test]
    fn test_clean_candidate_drops_date_tail() {
        assert_eq!(clean_candidate("Jagadish Traders since 2015."), "Jagadish Traders");
        assert_eq!(clean_candidate("Sai Ram Stores, 12th March 2020"), "Sai Ram Stores");
        assert_eq!(clean_candidate("Apex Labs established 2001"), "Apex Labs");
        assert_eq!(clean_candidate("- Apex Labs 2001 -"), "Apex Labs");
    }

    #[test]
    fn test_clean_candidate_keeps_words_starting_like_clauses() {
        assert_eq!(clean_candidate("Gordon Infotech"), "Gordon Infotech");
        assert_eq!(clean_candidate("Sinha Onions Mart"), "Sinha Onions Mart");
    }

    #[test]
    fn test_clean_person_candidate() {
        assert_eq!(clean_person_candidate("Ravi Kumar."), "Ravi Kumar");
        assert_eq!(clean_person_candidate("Ravi K."), "Ravi K.");
        assert_eq!(clean_person_candidate("Ravi K. "), "Ravi K.");
        assert_eq!(clean_person_candidate("Meera Nair since 2019"), "Meera Nair");
    }

    #[test]
    fn test_scrub_credentials() {
        let text = "User ID: ravi01\nPassword = secret\nGSTIN: 27AAPFU0939F1ZV\nShop  named\tApex";
        assert_eq!(scrub_credentials(text), "\n\n\nShop named Apex");
    }
}
