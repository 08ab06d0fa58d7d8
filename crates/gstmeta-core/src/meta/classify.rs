//! Person and company name classifiers.
//!
//! Both are shape heuristics over whitespace-separated tokens. They are
//! mutually exclusive: anything that looks like a person is never a company.

use std::collections::HashSet;

use lazy_static::lazy_static;

use super::rules::patterns::COMPANY_SUFFIX;

/// Honorifics recognised before a person's name (case-sensitive).
pub const HONORIFICS: [&str; 8] = ["Mr", "Mrs", "Ms", "Miss", "Dr", "Shri", "Smt", "Sri"];

lazy_static! {
    /// Words that mark a name as a business rather than a person.
    pub static ref BUSINESS_TOKENS: HashSet<&'static str> = [
        "World", "Stores", "Store", "Shop", "Shops", "Traders", "Trader",
        "Dealers", "Dealer", "Enterprises", "Enterprise", "Associates",
        "Agency", "Agencies", "Electronics", "Electricals", "Solutions",
        "Systems", "Technologies", "Technology", "Industries", "Industry",
        "International", "Corporation", "Company", "Corp", "Labs", "Ltd",
        "LLP", "Pvt", "Private", "Limited", "Enterprizes", "Group", "Mart",
        "Bazaar", "Center", "Centre", "Supermarket", "Mega", "Hyper",
        "Retail", "Wholesale", "Wholesalers", "Wholesaler", "Distributors",
        "Distributor", "Logistics", "Foods", "Food", "Cafe", "Caf\u{e9}",
        "Restaurant", "Builders", "Constructions", "Construction", "Interio",
        "Designs", "Design", "Studios", "Studio", "Marketing", "Services",
        "Service",
    ]
    .into_iter()
    .collect();
}

/// True if `token`, with one trailing period removed, is an honorific.
pub fn is_honorific(token: &str) -> bool {
    let bare = token.strip_suffix('.').unwrap_or(token);
    HONORIFICS.contains(&bare)
}

/// Case-insensitive honorific check for the first token of a subject phrase.
pub(crate) fn starts_with_honorific(phrase: &str) -> bool {
    phrase
        .split_whitespace()
        .next()
        .map(|first| {
            let bare = first.trim_end_matches('.');
            HONORIFICS.iter().any(|h| h.eq_ignore_ascii_case(bare))
        })
        .unwrap_or(false)
}

/// `A.`, `Kr.`, `Mr.`: at most three characters ending in a period, the rest
/// alphabetic and the first upper-case.
fn is_initial(token: &str) -> bool {
    let Some(stem) = token.strip_suffix('.') else {
        return false;
    };
    token.chars().count() <= 3
        && !stem.is_empty()
        && stem.chars().all(char::is_alphabetic)
        && stem.chars().next().is_some_and(char::is_uppercase)
}

/// Upper-case first character; the cased characters after it are all
/// lower-case, and there is at least one. Uncased characters such as `'`
/// are skipped, so "D'souza" qualifies.
fn is_capitalized(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            let rest = chars.as_str();
            rest.chars().any(char::is_lowercase) && !rest.chars().any(char::is_uppercase)
        }
        _ => false,
    }
}

/// Heuristic: does `candidate` look like a person's name?
///
/// Accepts one to four tokens, each either an initial or a Capitalized word,
/// none of which is a business token. A lone honorific is rejected.
pub fn is_person(candidate: &str) -> bool {
    let tokens: Vec<&str> = candidate.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        return false;
    };

    if is_honorific(first) && tokens.len() < 2 {
        return false;
    }
    if tokens.len() > 4 {
        return false;
    }

    tokens.iter().all(|token| {
        if is_initial(token) {
            return true;
        }
        is_capitalized(token)
            && !token
                .chars()
                .any(|c| c.is_ascii_digit() || matches!(c, '@' | '_' | '-' | '/' | '&'))
            && !BUSINESS_TOKENS.contains(*token)
    })
}

/// True if `candidate` contains a company-suffix word such as `Ltd` or `LLP`.
pub fn contains_company_suffix(candidate: &str) -> bool {
    COMPANY_SUFFIX.is_match(candidate)
}

/// Heuristic: does `candidate` look like a business name?
///
/// Never true for something [`is_person`] accepts.
pub fn is_company(candidate: &str) -> bool {
    let candidate = candidate.trim();
    if candidate.is_empty() || is_person(candidate) {
        return false;
    }
    if contains_company_suffix(candidate) {
        return true;
    }

    let words: Vec<&str> = candidate.split_whitespace().collect();
    if words
        .iter()
        .map(|w| w.trim_matches([' ', '.', ',', '&', '-']))
        .any(|w| BUSINESS_TOKENS.contains(w))
    {
        return true;
    }

    words.len() >= 2
        && words[..2]
            .iter()
            .all(|w| w.chars().next().is_some_and(char::is_uppercase))
}
