//! The mutable accumulator behind one analysis run.
//!
//! [`StyleCollector`] has exclusive mutation rights during the extraction
//! pass; [`StyleCollector::finalize`] consumes it by value, so the produced
//! [`AnalysisResult`] can never be mutated afterwards.

use std::collections::BTreeMap;

use crate::analysis::category::{Categorizer, Category};
use crate::analysis::contrast;
use crate::analysis::fonts::{self, FontScan};
use crate::config::KeywordConfig;
use crate::types::{
    AnalysisResult, CategorizedColor, ColorEntry, ContrastContext, FontEntry, Summary,
};

pub struct StyleCollector {
    categorizer: Categorizer,
    text_properties: Vec<String>,
    colors: BTreeMap<String, ColorEntry>,
    buckets: BTreeMap<Category, Vec<CategorizedColor>>,
    fonts: BTreeMap<String, FontEntry>,
    variables: BTreeMap<String, String>,
    /// First background-property color per selector, for contrast pairing.
    backgrounds: BTreeMap<String, String>,
    /// Text-property color occurrences in document order.
    text_occurrences: Vec<(String, String)>,
}

impl StyleCollector {
    pub fn new(keywords: &KeywordConfig) -> Self {
        Self {
            categorizer: Categorizer::from_config(keywords),
            text_properties: keywords
                .text_color_properties
                .iter()
                .map(|p| p.to_ascii_lowercase())
                .collect(),
            colors: BTreeMap::new(),
            buckets: BTreeMap::new(),
            fonts: BTreeMap::new(),
            variables: BTreeMap::new(),
            backgrounds: BTreeMap::new(),
            text_occurrences: Vec::new(),
        }
    }

    /// Record one color occurrence. Two raw spellings with the same
    /// normalized hex land in the same entry; `via_variable` names the CSS
    /// variable whose resolved value supplied the color, if any.
    pub fn record_color(
        &mut self,
        raw: &str,
        normalized: &str,
        selector: &str,
        property: &str,
        via_variable: Option<&str>,
    ) {
        let entry = self
            .colors
            .entry(normalized.to_string())
            .or_insert_with(|| ColorEntry::new(raw.trim(), normalized));
        entry.frequency += 1;
        push_unique(&mut entry.selectors, selector);
        push_unique(&mut entry.properties, property);
        if let Some(variable) = via_variable {
            push_unique(&mut entry.css_variables, variable);
        }

        let category = self.categorizer.categorize(selector, property);
        if category != Category::Other {
            let bucket = self.buckets.entry(category).or_default();
            match bucket.iter_mut().find(|occurrence| {
                occurrence.normalized == normalized
                    && occurrence.selector == selector
                    && occurrence.property == property
            }) {
                Some(occurrence) => occurrence.frequency += 1,
                None => bucket.push(CategorizedColor {
                    color: raw.trim().to_string(),
                    normalized: normalized.to_string(),
                    selector: selector.to_string(),
                    property: property.to_string(),
                    frequency: 1,
                }),
            }
        }

        let property_lower = property.to_ascii_lowercase();
        if property_lower.starts_with("background") {
            self.backgrounds
                .entry(selector.to_string())
                .or_insert_with(|| normalized.to_string());
        }
        if self.text_properties.iter().any(|p| *p == property_lower) {
            self.text_occurrences
                .push((selector.to_string(), normalized.to_string()));
        }
    }

    /// Merge one block's font scan into the entry keyed by its family stack.
    pub fn record_fonts(&mut self, selector: &str, scan: FontScan) {
        let Some(family) = scan.family else {
            return;
        };
        let key = fonts::family_key(&family);
        if key.is_empty() {
            return;
        }
        let entry = self
            .fonts
            .entry(key)
            .or_insert_with(|| FontEntry::new(family.trim()));
        entry.frequency += 1;
        push_unique(&mut entry.selectors, selector);
        for size in scan.sizes {
            *entry.sizes.entry(size).or_insert(0) += 1;
        }
        for weight in scan.weights {
            *entry.weights.entry(weight).or_insert(0) += 1;
        }
        for line_height in scan.line_heights {
            *entry.line_heights.entry(line_height).or_insert(0) += 1;
        }
    }

    pub fn set_variables(&mut self, variables: BTreeMap<String, String>) {
        self.variables = variables;
    }

    /// Close the run: pair text colors with backgrounds, derive the summary,
    /// and produce the immutable result.
    pub fn finalize(mut self, url: &str) -> AnalysisResult {
        let pairings = self.detect_contrast_pairs();
        for (text_color, background, ratio) in pairings {
            add_context(&mut self.colors, &text_color, &background, ratio);
            add_context(&mut self.colors, &background, &text_color, ratio);
        }

        let colors_by_category: BTreeMap<Category, usize> = self
            .buckets
            .iter()
            .map(|(category, bucket)| (*category, bucket.len()))
            .collect();
        let summary = Summary {
            total_unique_colors: self.colors.len(),
            total_unique_fonts: self.fonts.len(),
            total_css_variables: self.variables.len(),
            colors_by_category,
        };

        AnalysisResult {
            url: url.to_string(),
            summary,
            colors: self.colors,
            colors_by_category: self.buckets,
            fonts: self.fonts,
            css_variables: self.variables,
        }
    }

    /// Pair each text occurrence with the background of the same selector,
    /// or failing that the nearest recorded ancestor selector.
    fn detect_contrast_pairs(&self) -> Vec<(String, String, f64)> {
        let mut pairs = Vec::new();
        for (selector, text_color) in &self.text_occurrences {
            let background = self
                .backgrounds
                .get(selector)
                .or_else(|| self.nearest_ancestor_background(selector));
            let Some(background) = background else {
                continue;
            };
            if let Some(ratio) = contrast::contrast_between(text_color, background) {
                let rounded = (ratio * 100.0).round() / 100.0;
                pairs.push((text_color.clone(), background.clone(), rounded));
            }
        }
        pairs
    }

    fn nearest_ancestor_background(&self, selector: &str) -> Option<&String> {
        self.backgrounds
            .iter()
            .filter(|(candidate, _)| is_ancestor_selector(candidate, selector))
            .max_by_key(|(candidate, _)| candidate.len())
            .map(|(_, color)| color)
    }
}

/// True when `candidate` prefixes `selector` at a descendant or child
/// combinator boundary (".card" is an ancestor of ".card p" and ".card > p",
/// not of ".cardinal p").
fn is_ancestor_selector(candidate: &str, selector: &str) -> bool {
    let Some(rest) = selector.strip_prefix(candidate) else {
        return false;
    };
    rest.starts_with(' ') || rest.starts_with('>')
}

fn add_context(colors: &mut BTreeMap<String, ColorEntry>, hex: &str, other: &str, ratio: f64) {
    let Some(entry) = colors.get_mut(hex) else {
        return;
    };
    if entry
        .contrast_contexts
        .iter()
        .any(|context| context.color == other)
    {
        return;
    }
    entry.contrast_contexts.push(ContrastContext {
        color: other.to_string(),
        ratio,
    });
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}
