//! Financial year extraction.

use std::fmt;
use std::str::FromStr;

use chrono::Month;
use serde::{Deserialize, Serialize};

use super::patterns::{FY_CANONICAL, FY_LABELLED};
use super::{match_from, ExtractionMatch, FieldExtractor, Rule, Scope};
use crate::error::ExtractionError;
use crate::models::meta::Field;

/// An April-to-March financial year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FinancialYear {
    pub start: i32,
    pub end: i32,
}

impl FinancialYear {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Build from a 4-digit start year and a 2- or 4-digit end year.
    ///
    /// A 2-digit end year takes the start year's century, moving to the next
    /// century when that would put it before the start: `("2099", "00")` is
    /// 2099-2100.
    pub fn from_parts(start: &str, end: &str) -> Option<Self> {
        let start_year: i32 = start.trim().parse().ok()?;
        let end = end.trim();
        let end_year = match end.len() {
            2 => {
                let tail: i32 = end.parse().ok()?;
                let mut year = (start_year / 100) * 100 + tail;
                if year < start_year {
                    year += 100;
                }
                year
            }
            4 => end.parse().ok()?,
            _ => return None,
        };
        Some(Self::new(start_year, end_year))
    }

    /// Calendar year a month falls in: April to December belong to the start
    /// year, January to March to the end year.
    pub fn year_of(&self, month: Month) -> i32 {
        if month.number_from_month() >= 4 {
            self.start
        } else {
            self.end
        }
    }
}

impl fmt::Display for FinancialYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for FinancialYear {
    type Err = ExtractionError;

    /// Parse the canonical `YYYY-YYYY` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = FY_CANONICAL
            .captures(s)
            .ok_or_else(|| ExtractionError::parse("financial year", s))?;
        let start = caps[1]
            .parse()
            .map_err(|_| ExtractionError::parse("financial year", s))?;
        let end = caps[2]
            .parse()
            .map_err(|_| ExtractionError::parse("financial year", s))?;
        Ok(Self::new(start, end))
    }
}

/// Canonical `YYYY-YYYY` string for a start/end pair, or the pair joined
/// with `-` if it cannot be read as years.
pub fn normalize_fy(start: &str, end: &str) -> String {
    FinancialYear::from_parts(start, end)
        .map(|fy| fy.to_string())
        .unwrap_or_else(|| format!("{}-{}", start.trim(), end.trim()))
}

/// Financial year rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FyRule {
    /// `FY`, `F.Y.`, `Fin Year`, `Financial Year` ... followed by a year pair.
    Labelled,
}

pub const FY_RULES: &[FyRule] = &[FyRule::Labelled];

impl Rule for FyRule {
    fn name(&self) -> &'static str {
        "fy.labelled"
    }

    fn scopes(&self) -> &'static [Scope] {
        &[Scope::Line, Scope::Document]
    }
}

/// Financial year field extractor.
#[derive(Debug, Clone, Default)]
pub struct FyExtractor;

impl FyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for FyExtractor {
    type Output = FinancialYear;
    type Rule = FyRule;

    fn field(&self) -> Field {
        Field::FinancialYear
    }

    fn rules(&self) -> &'static [FyRule] {
        FY_RULES
    }

    fn candidates(&self, rule: FyRule, text: &str) -> Vec<ExtractionMatch<FinancialYear>> {
        match rule {
            FyRule::Labelled => FY_LABELLED
                .captures_iter(text)
                .filter_map(|caps| {
                    let start = caps.get(1)?.as_str();
                    let end = caps.get(2)?.as_str();
                    let fy = FinancialYear::from_parts(start, end)?;
                    Some(match_from(fy, caps.get(0)?))
                })
                .collect(),
        }
    }
}

/// Extract the first labelled financial year from text.
pub fn extract_fy(text: &str) -> Option<FinancialYear> {
    FyExtractor::new()
        .extract(text, Scope::Document)
        .map(|m| m.value)
}
