//! End-to-end extraction scenarios.

use std::sync::Arc;

use chrono::{Month, NaiveDate};
use pretty_assertions::assert_eq;

use gstmeta_core::{
    resolve_period, ExtractedMeta, Field, FilingReport, MetaExtractor, MetaParser, ReportConfig,
    ReturnType, Scope, TaskContext,
};

const RAVI_KUMAR: &str = "Mr. Ravi Kumar has requested filing of monthly returns.\n\
GSTIN: 27ABCDE1234F1Z5\n\
FY: 2023-24\n\
Return Period: March";

#[test]
fn test_full_description() {
    let parser = MetaParser::new();
    let result = parser.parse(RAVI_KUMAR);

    assert_eq!(
        result.meta,
        ExtractedMeta {
            gstin: "27ABCDE1234F1Z5".into(),
            fy: "2023-2024".into(),
            return_period: "March 2024".into(),
            trade_name: "".into(),
            legal_name: "Ravi Kumar".into(),
        }
    );

    let legal = result.source(Field::LegalName).unwrap();
    assert_eq!(legal.rule, "legal_name.leading_line");
    assert_eq!(legal.scope, Scope::Leading);
    assert_eq!(result.source(Field::Gstin).unwrap().scope, Scope::Line);

    let report = FilingReport::build(&result.meta, &ReportConfig::default());
    assert_eq!(report.gstr1_due_iso, "2024-04-11");
    assert_eq!(report.gstr1_due_display, "11 Apr 2024");
    assert_eq!(report.gstr3b_due_iso, "2024-04-21");
    assert_eq!(report.gstr3b_due_display, "21 Apr 2024");
}

#[test]
fn test_trade_name_from_subject() {
    let meta = MetaParser::new().extract("Jagadish Traders is operating since 2015.");
    assert_eq!(meta.trade_name, "JAGADISH TRADERS");
    assert_eq!(meta.legal_name, "");
}

#[test]
fn test_lone_honorific() {
    let meta = MetaParser::new().extract("Mr. has filed a return.");
    assert_eq!(meta.legal_name, "");
}

#[test]
fn test_fiscal_year_inference() {
    assert_eq!(
        resolve_period("March", "2023-2024"),
        (Some(Month::March), Some(2024))
    );
    assert_eq!(
        resolve_period("April", "2023-2024"),
        (Some(Month::April), Some(2023))
    );
}

#[test]
fn test_fy_century_rollover() {
    let meta = MetaParser::new().extract("FY 2099-00");
    assert_eq!(meta.fy, "2099-2100");
}

#[test]
fn test_december_rolls_into_january() {
    let meta = ExtractedMeta {
        return_period: "December 2023".into(),
        ..ExtractedMeta::default()
    };
    let report = FilingReport::build(&meta, &ReportConfig::default());
    assert_eq!(report.gstr1_due_iso, "2024-01-11");
    assert_eq!(report.gstr3b_due_iso, "2024-01-21");

    assert_eq!(
        gstmeta_core::due_date(ReturnType::Gstr1, Month::December, 2023),
        NaiveDate::from_ymd_opt(2024, 1, 11)
    );
}

#[test]
fn test_labelled_description_with_heading() {
    let parser = MetaParser::new();
    let context = TaskContext::new("Sunrise Electronics: GSTR-3B drill", "");
    let text = "Legal Name: Anita Desai\nGSTIN - 29AAGCS1234K1Z2\nFinancial Year 2024-25\nPeriod: Dec";

    let meta = parser.extract_with_context(text, &context);
    assert_eq!(meta.legal_name, "Anita Desai");
    assert_eq!(meta.gstin, "29AAGCS1234K1Z2");
    assert_eq!(meta.fy, "2024-2025");
    assert_eq!(meta.return_period, "December 2024");
    assert_eq!(meta.trade_name, "SUNRISE ELECTRONICS");

    let report = FilingReport::build(&meta, &ReportConfig::default());
    assert_eq!(report.welcome_title, "Welcome SUNRISE ELECTRONICS to GST Common Portal");
    assert_eq!(report.gstr1_due_display, "11 Jan 2025");
}

#[test]
fn test_report_serializes_with_portal_keys() {
    let meta = MetaParser::new().extract(RAVI_KUMAR);
    let report = FilingReport::build(&meta, &ReportConfig::default());
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["LegalName"], "Ravi Kumar");
    assert_eq!(json["ReturnPeriod"], "March 2024");
    assert_eq!(json["DueDateISO"], "2024-04-11");
    assert_eq!(json["GSTR3BDueDatePretty"], "21 Apr 2024");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parser_is_deterministic_across_threads() {
    let parser = Arc::new(MetaParser::new());
    let expected = parser.extract(RAVI_KUMAR);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let parser = Arc::clone(&parser);
            tokio::spawn(async move { parser.extract(RAVI_KUMAR) })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), expected);
    }
}
