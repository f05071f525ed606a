//! Report types produced by the extraction pass.
//!
//! Field names and nesting of [`AnalysisResult`] and everything it contains
//! are a stable contract consumed by export tooling; do not rename them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::Category;

/// A contrast pairing recorded against a color entry: the other color's
/// normalized hex and the WCAG contrast ratio between the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastContext {
    pub color: String,
    pub ratio: f64,
}

/// Everything known about one normalized color.
///
/// `selectors`, `properties`, and `css_variables` keep first-seen order;
/// `value` is the first raw spelling observed for this color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub value: String,
    pub normalized: String,
    pub selectors: Vec<String>,
    pub properties: Vec<String>,
    pub frequency: u64,
    pub css_variables: Vec<String>,
    pub contrast_contexts: Vec<ContrastContext>,
}

impl ColorEntry {
    pub fn new(value: impl Into<String>, normalized: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            normalized: normalized.into(),
            selectors: Vec::new(),
            properties: Vec::new(),
            frequency: 0,
            css_variables: Vec::new(),
            contrast_contexts: Vec::new(),
        }
    }
}

/// One categorized (selector, property, color) occurrence inside a category
/// bucket. `frequency` counts repeats of this exact occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedColor {
    pub color: String,
    pub normalized: String,
    pub selector: String,
    pub property: String,
    pub frequency: u64,
}

/// Aggregated usage of one font family stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontEntry {
    pub family: String,
    pub sizes: BTreeMap<String, u64>,
    pub weights: BTreeMap<String, u64>,
    pub line_heights: BTreeMap<String, u64>,
    pub selectors: Vec<String>,
    pub frequency: u64,
}

impl FontEntry {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            sizes: BTreeMap::new(),
            weights: BTreeMap::new(),
            line_heights: BTreeMap::new(),
            selectors: Vec::new(),
            frequency: 0,
        }
    }
}

/// Headline counts derived from the maps at finalize time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_unique_colors: usize,
    pub total_unique_fonts: usize,
    pub total_css_variables: usize,
    pub colors_by_category: BTreeMap<Category, usize>,
}

/// The immutable outcome of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub url: String,
    pub summary: Summary,
    pub colors: BTreeMap<String, ColorEntry>,
    pub colors_by_category: BTreeMap<Category, Vec<CategorizedColor>>,
    pub fonts: BTreeMap<String, FontEntry>,
    pub css_variables: BTreeMap<String, String>,
}

/// Tallies of locally recovered failures and overall input size for one run.
/// Reported next to the result, never inside it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionStats {
    pub declarations: u64,
    pub sources: u64,
    pub invalid_colors: u64,
    pub cyclic_references: u64,
    pub unresolved_references: u64,
    pub malformed_declarations: u64,
}
