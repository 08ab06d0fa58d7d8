//! Filing report: the mapping the portal views render for one task.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::meta::resolver::{PeriodResolver, ResolvedPeriod, ReturnType};
use crate::models::config::ReportConfig;
use crate::models::meta::ExtractedMeta;

/// A due date in both ISO and display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueDate {
    pub kind: ReturnType,
    pub date: NaiveDate,
    pub iso: String,
    pub display: String,
}

impl DueDate {
    pub fn new(kind: ReturnType, date: NaiveDate, format: &str) -> Self {
        Self {
            kind,
            date,
            iso: date.format("%Y-%m-%d").to_string(),
            display: format_date(date, format),
        }
    }
}

/// Format `date` with a strftime pattern, falling back to ISO form when the
/// pattern is invalid.
pub fn format_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_err() {
        warn!("Invalid date format {:?}, using ISO dates", format);
        return date.format("%Y-%m-%d").to_string();
    }
    out
}

/// Both monthly due dates for a resolved period.
pub fn due_dates(period: ResolvedPeriod, format: &str) -> Vec<DueDate> {
    ReturnType::ALL
        .into_iter()
        .filter_map(|kind| {
            period
                .due_date(kind)
                .map(|date| DueDate::new(kind, date, format))
        })
        .collect()
}

/// Presentation mapping for one extracted task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingReport {
    #[serde(rename = "GSTIN")]
    pub gstin: String,
    #[serde(rename = "FY")]
    pub fy: String,
    #[serde(rename = "ReturnPeriod")]
    pub return_period: String,
    #[serde(rename = "TradeName")]
    pub trade_name: String,
    #[serde(rename = "LegalName")]
    pub legal_name: String,
    #[serde(rename = "DueDateISO")]
    pub gstr1_due_iso: String,
    #[serde(rename = "DueDatePretty")]
    pub gstr1_due_display: String,
    #[serde(rename = "GSTR3BDueDateISO")]
    pub gstr3b_due_iso: String,
    #[serde(rename = "GSTR3BDueDatePretty")]
    pub gstr3b_due_display: String,
    #[serde(rename = "WelcomeTitle")]
    pub welcome_title: String,
}

impl FilingReport {
    /// Build a report with the default resolver.
    pub fn build(meta: &ExtractedMeta, config: &ReportConfig) -> Self {
        Self::build_with(meta, config, &PeriodResolver::new())
    }

    /// Build a report, resolving the period with `resolver`.
    ///
    /// Names fall back to the configured placeholders; the trade name is
    /// upper-cased. Due dates are empty unless the period resolves to both a
    /// month and a year.
    pub fn build_with(meta: &ExtractedMeta, config: &ReportConfig, resolver: &PeriodResolver) -> Self {
        let trade_name = non_empty(&meta.trade_name)
            .or(config.trade_name_fallback.as_deref())
            .unwrap_or_default()
            .to_uppercase();
        let legal_name = non_empty(&meta.legal_name)
            .or(config.legal_name_fallback.as_deref())
            .unwrap_or_default()
            .to_string();

        let welcome_title = if trade_name.is_empty() {
            String::new()
        } else {
            format!("Welcome {} to {}", trade_name, config.portal_name)
        };

        let mut report = Self {
            gstin: meta.gstin.clone(),
            fy: meta.fy.clone(),
            return_period: meta.return_period.clone(),
            trade_name,
            legal_name,
            welcome_title,
            ..Self::default()
        };

        if let Some(period) = resolver.resolve_full(&meta.return_period, &meta.fy) {
            for due in due_dates(period, &config.date_format) {
                match due.kind {
                    ReturnType::Gstr1 => {
                        report.gstr1_due_iso = due.iso;
                        report.gstr1_due_display = due.display;
                    }
                    ReturnType::Gstr3b => {
                        report.gstr3b_due_iso = due.iso;
                        report.gstr3b_due_display = due.display;
                    }
                }
            }
        }

        report
    }

    /// True when both due dates are filled.
    pub fn has_due_dates(&self) -> bool {
        !self.gstr1_due_iso.is_empty() && !self.gstr3b_due_iso.is_empty()
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn meta(period: &str, fy: &str) -> ExtractedMeta {
        ExtractedMeta {
            gstin: "27ABCDE1234F1Z5".into(),
            fy: fy.into(),
            return_period: period.into(),
            trade_name: "".into(),
            legal_name: "Ravi Kumar".into(),
        }
    }

    #[test]
    fn test_report_due_dates() {
        let report = FilingReport::build(&meta("March 2024", "2023-2024"), &ReportConfig::default());

        assert_eq!(report.gstr1_due_iso, "2024-04-11");
        assert_eq!(report.gstr1_due_display, "11 Apr 2024");
        assert_eq!(report.gstr3b_due_iso, "2024-04-21");
        assert_eq!(report.gstr3b_due_display, "21 Apr 2024");
        assert!(report.has_due_dates());
    }

    #[test]
    fn test_report_resolves_raw_period_without_fy() {
        let report = FilingReport::build(&meta("Dec 2023", ""), &ReportConfig::default());
        assert_eq!(report.gstr1_due_iso, "2024-01-11");
        assert_eq!(report.gstr3b_due_iso, "2024-01-21");
    }

    #[test]
    fn test_report_without_year_has_no_due_dates() {
        let report = FilingReport::build(&meta("March", ""), &ReportConfig::default());
        assert_eq!(report.gstr1_due_iso, "");
        assert_eq!(report.gstr1_due_display, "");
        assert!(!report.has_due_dates());
    }

    #[test]
    fn test_report_fallbacks() {
        let mut empty = meta("", "");
        empty.legal_name.clear();

        let report = FilingReport::build(&empty, &ReportConfig::default());
        assert_eq!(report.legal_name, "");
        assert_eq!(report.trade_name, "");
        assert_eq!(report.welcome_title, "");

        let config = ReportConfig {
            legal_name_fallback: Some("AKHIL VASUDEV".into()),
            trade_name_fallback: Some("User".into()),
            ..ReportConfig::default()
        };
        let report = FilingReport::build(&empty, &config);
        assert_eq!(report.legal_name, "AKHIL VASUDEV");
        assert_eq!(report.trade_name, "USER");
        assert_eq!(report.welcome_title, "Welcome USER to GST Common Portal");
    }

    #[test]
    fn test_report_keys() {
        let json = serde_json::to_value(FilingReport::default()).unwrap();
        for key in [
            "GSTIN",
            "FY",
            "ReturnPeriod",
            "TradeName",
            "LegalName",
            "DueDateISO",
            "DueDatePretty",
            "GSTR3BDueDateISO",
            "GSTR3BDueDatePretty",
            "WelcomeTitle",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 11).unwrap();
        assert_eq!(format_date(date, "%d %b %Y"), "11 Apr 2024");
        assert_eq!(format_date(date, "%d/%m/%Y"), "11/04/2024");
        assert_eq!(format_date(date, "%Q"), "2024-04-11");
    }
}
