//! Regex patterns for task-description field extraction.
//!
//! Each pattern is shared by every scope a rule runs in; only the text it
//! is matched against changes between the line and document passes.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // GSTIN: label, optional separator, one 15-character token
    pub static ref GSTIN_LABELLED: Regex = Regex::new(
        r"(?i:\bGSTIN\b)\s*[:=\-\u{2013}\u{2014}]?\s*([0-9A-Za-z]{15})\b"
    ).unwrap();

    pub static ref GSTIN_SHAPE: Regex = Regex::new(
        r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$"
    ).unwrap();

    // Financial year: "FY 2023-24", "F.Y.: 2023/2024", "Financial Year (2023 to 24)"
    pub static ref FY_LABELLED: Regex = Regex::new(
        r"(?i)\b(?:financial\s*year|fin\.?\s*y(?:ea)?r|f\.?\s*y)\.?\s*[:=\-\u{2013}\u{2014}]?\s*\(?\s*([12]\d{3})\s*(?:[/\-]|\s+to\s+|\s+)(\d{4}|\d{2})\b\)?"
    ).unwrap();

    pub static ref FY_CANONICAL: Regex = Regex::new(
        r"^\s*([12]\d{3})\s*-\s*([12]\d{3})\s*$"
    ).unwrap();

    // Return period labels; value is a month word (+ year) or a numeric month
    pub static ref RETURN_PERIOD_LABELLED: Regex = Regex::new(
        r"(?i)\breturn\s*period\b\s*[:=\-\u{2013}\u{2014}]?\s*([A-Za-z]{3,12}(?:[ '\-]?\d{2,4})?|\d{1,2}[/\-]\d{2,4}|\d{4}[/\-]\d{1,2})"
    ).unwrap();

    pub static ref PERIOD_OR_MONTH_LABELLED: Regex = Regex::new(
        r"(?i)\b(?:period|month)\b\s*[:=\-\u{2013}\u{2014}]?\s*([A-Za-z]{3,12}(?:[ '\-]?\d{2,4})?|\d{1,2}[/\-]\d{2,4}|\d{4}[/\-]\d{1,2})"
    ).unwrap();

    pub static ref PERIOD_MONTH_WORD: Regex = Regex::new(
        r"^([A-Za-z]{3,12})(?:[ '\-]?(\d{2,4}))?$"
    ).unwrap();

    pub static ref PERIOD_MONTH_YEAR: Regex = Regex::new(
        r"^(\d{1,2})[/\-](\d{2,4})$"
    ).unwrap();

    pub static ref PERIOD_YEAR_MONTH: Regex = Regex::new(
        r"^(\d{4})[/\-](\d{1,2})$"
    ).unwrap();

    // Trade name
    pub static ref TRADE_NAME_LABELLED: Regex = Regex::new(
        r"(?im)\b(?:trade|business)\s*name\b\s*[:=\-\u{2013}\u{2014}]?\s*(.+)$"
    ).unwrap();

    pub static ref TRADE_NAME_PHRASE: Regex = Regex::new(
        r#"(?i:\b(?:named|called|trading\s+as|doing\s+business\s+as|d/b/a))\s*["']?([A-Z][A-Za-z0-9& .'\-]{1,100})"#
    ).unwrap();

    pub static ref TRADE_NAME_SUBJECT: Regex = Regex::new(
        r"^\s*([A-Z][\w&.'\-]+(?:[ \t]+[A-Z][\w&.'\-]+){0,6})\s+(?i:is|was|has|have|operates|operated|runs|owned|registered)\b"
    ).unwrap();

    pub static ref CONTEXT_NAME: Regex = Regex::new(
        r"\b([A-Z][A-Za-z0-9& .'\-]{2,100})\b"
    ).unwrap();

    // Legal name
    pub static ref LEGAL_LEADING_HONORIFIC: Regex = Regex::new(
        r"^\s*(?:Mr|Mrs|Ms|Miss|Dr|Shri|Smt|Sri)\.?\s+([A-Z][A-Za-z.'\-]+(?:[ \t]+[A-Z][A-Za-z.'\-]+){0,3})"
    ).unwrap();

    pub static ref LEGAL_LEADING_PLAIN: Regex = Regex::new(
        r"^\s*([A-Z][A-Za-z.'\-]+(?:[ \t]+[A-Z][A-Za-z.'\-]+){0,3})"
    ).unwrap();

    pub static ref LEGAL_NAME_LABELLED: Regex = Regex::new(
        r"(?im)\blegal\s*name\b\s*[:=\-\u{2013}\u{2014}]?\s*(.+)$"
    ).unwrap();

    pub static ref OWNER_LABELLED: Regex = Regex::new(
        r"(?im)\b(?:owner|proprietor|proprietrix|managing\s+partner|partner|director)\s*(?:name)?\s*[:=\-\u{2013}\u{2014}]\s*((?-i:[A-Z])[A-Za-z .'\-]{1,80})"
    ).unwrap();

    // Case-sensitive: a lower-case "mr" in running text is not an honorific
    pub static ref HONORIFIC_NAME: Regex = Regex::new(
        r"\b(?:Mr|Mrs|Ms|Miss|Dr|Shri|Smt|Sri)\.?[ \t]+([A-Z][A-Za-z.'\-]+(?:[ \t]+[A-Z][A-Za-z.'\-]+){0,3})"
    ).unwrap();

    pub static ref LEGAL_NAME_SUBJECT: Regex = Regex::new(
        r"^\s*([A-Z][A-Za-z.'\-]+(?:[ \t]+[A-Z][A-Za-z.'\-]+){0,3})\s+(?i:started|commenced|has\s+requested|requested|is|was|has|have|asked|authori[sz]ed|applied)\b"
    ).unwrap();

    // Company-suffix terms, case-sensitive whole words
    pub static ref COMPANY_SUFFIX: Regex = Regex::new(
        r"\b(?:Infotech|Technologies|Technology|Enterprises?|Associates|Agencies|Solutions?|Systems?|Labs?|Industr(?:y|ies)|International|Corporation|Corp\.?|Ltd\.?|Limited|Pvt\.?\s*Ltd\.?|LLP|Company|Enterprizes)\b"
    ).unwrap();

    // Cleaning
    pub static ref DATE_LIKE_TAIL: Regex = Regex::new(
        r"(?i)(?:\s+|\s*,\s*)(?:(?:on|since|from|in|as\s+of|established|started|commenced)\b.*|\d{1,2}\s*(?:st|nd|rd|th)?\s+[A-Za-z]{3,9}\s*,?\s*\d{2,4}.*|[A-Za-z]{3,9}\s+\d{1,2},?\s*\d{2,4}.*|\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4}.*|\d{4}.*)$"
    ).unwrap();

    pub static ref CREDENTIAL_LINE: Regex = Regex::new(
        r"(?im)^[ \t]*(?:user\s*id|password|gstin|email|mobile|pan)\s*[:=].*$"
    ).unwrap();

    pub static ref HORIZONTAL_SPACE: Regex = Regex::new(r"[ \t]+").unwrap();
}
