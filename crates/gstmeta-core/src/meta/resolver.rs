//! Return period resolution and statutory due dates.
//!
//! A return period is resolved to a calendar month and year using the
//! financial year as context. Due dates fall in the month after the period:
//! GSTR-1 on the 11th, GSTR-3B on the 21st.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Month, NaiveDate};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::rules::fiscal_year::FinancialYear;
use super::rules::patterns::{PERIOD_MONTH_WORD, PERIOD_MONTH_YEAR, PERIOD_YEAR_MONTH};
use crate::error::ExtractionError;

/// Calendar months, January first.
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

lazy_static! {
    static ref MONTH_TOKENS: HashMap<&'static str, Month> = {
        let mut table = HashMap::new();
        for (month, name) in MONTHS.into_iter().zip(MONTH_NAMES) {
            table.insert(name, month);
            table.insert(&name[..3], month);
        }
        table.insert("sept", Month::September);
        table
    };
}

/// Map a month token (full name, 3-letter form or `sept`) to a month,
/// ignoring case.
pub fn parse_month(token: &str) -> Option<Month> {
    MONTH_TOKENS
        .get(token.trim().to_ascii_lowercase().as_str())
        .copied()
}

/// Month from its 1-based number.
pub fn month_from_number(number: u32) -> Option<Month> {
    let index = usize::try_from(number).ok()?.checked_sub(1)?;
    MONTHS.get(index).copied()
}

/// Expand a 2-digit year against a reference year.
///
/// The result takes the reference year's century, moving forward a century
/// when it would land more than 20 years before the reference. Without a
/// reference, 2-digit years are read as 20xx. Years of three or more digits
/// are taken as written.
pub fn expand_year(year: &str, reference: Option<i32>) -> Option<i32> {
    let value: i32 = year.trim().parse().ok()?;
    if value >= 100 {
        return Some(value);
    }
    let expanded = match reference {
        Some(reference) => {
            let candidate = (reference / 100) * 100 + value;
            if candidate < reference - 20 {
                candidate + 100
            } else {
                candidate
            }
        }
        None => 2000 + value,
    };
    Some(expanded)
}

/// Resolves raw return periods to calendar months.
#[derive(Debug, Clone)]
pub struct PeriodResolver {
    numeric: bool,
}

impl Default for PeriodResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PeriodResolver {
    /// Create a resolver that also accepts numeric periods.
    pub fn new() -> Self {
        Self { numeric: true }
    }

    /// Set whether `MM/YYYY` and `YYYY/MM` periods are resolved.
    pub fn with_numeric_periods(mut self, numeric: bool) -> Self {
        self.numeric = numeric;
        self
    }

    /// Resolve `raw` to a month and, when determinable, a year.
    ///
    /// `fy` is a canonical `YYYY-YYYY` financial year or empty. Unknown
    /// month words resolve to nothing; a month without a year or usable FY
    /// resolves to the month alone.
    pub fn resolve(&self, raw: &str, fy: &str) -> (Option<Month>, Option<i32>) {
        let raw = raw.trim();
        if raw.is_empty() {
            return (None, None);
        }
        let fy = fy.parse::<FinancialYear>().ok();

        if let Some(caps) = PERIOD_MONTH_WORD.captures(raw) {
            let Some(month) = parse_month(&caps[1]) else {
                trace!(period = raw, "unrecognized month token");
                return (None, None);
            };
            let year = match caps.get(2) {
                Some(year) => expand_year(year.as_str(), fy.map(|fy| fy.end)),
                None => fy.map(|fy| fy.year_of(month)),
            };
            return (Some(month), year);
        }

        if !self.numeric {
            return (None, None);
        }

        let numeric = PERIOD_MONTH_YEAR
            .captures(raw)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .or_else(|| {
                PERIOD_YEAR_MONTH
                    .captures(raw)
                    .map(|caps| (caps[2].to_string(), caps[1].to_string()))
            });

        match numeric {
            Some((month, year)) => {
                let month = month.parse().ok().and_then(month_from_number);
                match month {
                    Some(month) => (Some(month), expand_year(&year, fy.map(|fy| fy.end))),
                    None => (None, None),
                }
            }
            None => (None, None),
        }
    }

    /// Resolve to a [`ResolvedPeriod`] when both month and year are known.
    pub fn resolve_full(&self, raw: &str, fy: &str) -> Option<ResolvedPeriod> {
        match self.resolve(raw, fy) {
            (Some(month), Some(year)) => Some(ResolvedPeriod::new(month, year)),
            _ => None,
        }
    }
}

/// Resolve a return period with the default resolver.
pub fn resolve_period(raw: &str, fy: &str) -> (Option<Month>, Option<i32>) {
    PeriodResolver::new().resolve(raw, fy)
}

/// A calendar month a return covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedPeriod {
    pub month: Month,
    pub year: i32,
}

impl ResolvedPeriod {
    pub fn new(month: Month, year: i32) -> Self {
        Self { month, year }
    }

    /// Due date of a return for this period.
    pub fn due_date(&self, kind: ReturnType) -> Option<NaiveDate> {
        due_date(kind, self.month, self.year)
    }
}

impl fmt::Display for ResolvedPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month.name(), self.year)
    }
}

impl FromStr for ResolvedPeriod {
    type Err = ExtractionError;

    /// Parse `"<Month> <Year>"`, e.g. `"March 2024"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (month, year) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| ExtractionError::parse("return period", s))?;
        let month =
            parse_month(month).ok_or_else(|| ExtractionError::InvalidMonth(month.to_string()))?;
        let year = year
            .trim()
            .parse()
            .map_err(|_| ExtractionError::parse("return period", s))?;
        Ok(Self::new(month, year))
    }
}

/// GST return types with a monthly due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnType {
    #[serde(rename = "GSTR1")]
    Gstr1,
    #[serde(rename = "GSTR3B")]
    Gstr3b,
}

impl ReturnType {
    pub const ALL: [ReturnType; 2] = [ReturnType::Gstr1, ReturnType::Gstr3b];

    /// Day of the following month the return is due.
    pub fn due_day(&self) -> u32 {
        match self {
            ReturnType::Gstr1 => 11,
            ReturnType::Gstr3b => 21,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReturnType::Gstr1 => "GSTR-1",
            ReturnType::Gstr3b => "GSTR-3B",
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReturnType {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "gstr1" => Ok(ReturnType::Gstr1),
            "gstr3b" => Ok(ReturnType::Gstr3b),
            _ => Err(ExtractionError::parse("return type", s)),
        }
    }
}

/// Due date of `kind` for the return covering `month` of `year`.
///
/// December rolls over to January of the next year.
pub fn due_date(kind: ReturnType, month: Month, year: i32) -> Option<NaiveDate> {
    let next = month.succ();
    let due_year = if month == Month::December { year.checked_add(1)? } else { year };
    NaiveDate::from_ymd_opt(due_year, next.number_from_month(), kind.due_day())
}

pub fn gstr1_due_date(month: Month, year: i32) -> Option<NaiveDate> {
    due_date(ReturnType::Gstr1, month, year)
}

pub fn gstr3b_due_date(month: Month, year: i32) -> Option<NaiveDate> {
    due_date(ReturnType::Gstr3b, month, year)
}
