//! Task description metadata extraction.

pub mod classify;
pub mod normalize;
mod parser;
pub mod resolver;
pub mod rules;

pub use parser::{ExtractionResult, FieldSource, MetaParser};

use serde::{Deserialize, Serialize};

use crate::models::meta::ExtractedMeta;

/// Heading and topic title of the task a description belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskContext {
    pub heading: String,
    pub topic_title: String,
}

impl TaskContext {
    pub fn new(heading: impl Into<String>, topic_title: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            topic_title: topic_title.into(),
        }
    }
}

/// Trait for task metadata extractors.
pub trait MetaExtractor {
    /// Extract metadata from a description.
    fn extract(&self, text: &str) -> ExtractedMeta;

    /// Extract metadata, falling back to the task's heading and topic title
    /// for the trade name.
    fn extract_with_context(&self, text: &str, context: &TaskContext) -> ExtractedMeta;
}
