//! Core library for GST task-description metadata extraction.
//!
//! This crate provides:
//! - Text normalization and candidate cleaning
//! - Person and company name classifiers
//! - Rule-based extractors for GSTIN, financial year, return period, trade
//!   name and legal name
//! - Return period resolution and GSTR-1 / GSTR-3B due dates
//! - The filing report mapping consumed by the portal views

pub mod error;
pub mod meta;
pub mod models;
pub mod report;

pub use error::{ExtractionError, GstMetaError, Result};
pub use meta::classify::{is_company, is_person};
pub use meta::resolver::{due_date, resolve_period, PeriodResolver, ResolvedPeriod, ReturnType};
pub use meta::rules::{validate_gstin, FinancialYear, Scope};
pub use meta::{ExtractionResult, FieldSource, MetaExtractor, MetaParser, TaskContext};
pub use models::config::{ExtractionConfig, GstMetaConfig, ReportConfig};
pub use models::meta::{ExtractedMeta, Field};
pub use report::{DueDate, FilingReport};
