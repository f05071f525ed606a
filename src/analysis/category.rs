//! Semantic color categorization.
//!
//! Every (selector, property) occurrence gets exactly one [`Category`],
//! decided by an ordered rule table evaluated top to bottom. Rules match
//! keywords as case-insensitive substrings of `"{selector} {property}"`,
//! plus optional property-exact and property-prefix checks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::KeywordConfig;
use crate::error::PsaError;

/// Usage intent assigned to a color occurrence.
///
/// Declared in rule-priority order; `Other` is retained in the global color
/// map but never appears in a category bucket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SemanticSuccess,
    SemanticError,
    SemanticWarning,
    SemanticInfo,
    Interactive,
    Border,
    Background,
    Text,
    Other,
}

impl Category {
    /// The categories that appear in report buckets, in priority order.
    pub const fn reportable() -> [Category; 8] {
        [
            Category::SemanticSuccess,
            Category::SemanticError,
            Category::SemanticWarning,
            Category::SemanticInfo,
            Category::Interactive,
            Category::Border,
            Category::Background,
            Category::Text,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SemanticSuccess => "semantic_success",
            Category::SemanticError => "semantic_error",
            Category::SemanticWarning => "semantic_warning",
            Category::SemanticInfo => "semantic_info",
            Category::Interactive => "interactive",
            Category::Border => "border",
            Category::Background => "background",
            Category::Text => "text",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = PsaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "semantic_success" => Ok(Category::SemanticSuccess),
            "semantic_error" => Ok(Category::SemanticError),
            "semantic_warning" => Ok(Category::SemanticWarning),
            "semantic_info" => Ok(Category::SemanticInfo),
            "interactive" => Ok(Category::Interactive),
            "border" => Ok(Category::Border),
            "background" => Ok(Category::Background),
            "text" => Ok(Category::Text),
            "other" => Ok(Category::Other),
            _ => Err(PsaError::Config(format!("Unknown category: {}", s))),
        }
    }
}

/// One row of the rule table.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: Category,
    /// Substring matches against `"{selector} {property}"`, lowercased.
    pub keywords: Vec<String>,
    /// Property-name prefix matches (e.g. `background` for `background-*`).
    pub property_prefixes: Vec<String>,
    /// Property-name exact matches (e.g. `color` for text).
    pub property_equals: Vec<String>,
}

impl CategoryRule {
    fn keyword_rule(category: Category, keywords: &[String]) -> Self {
        Self {
            category,
            keywords: keywords.to_vec(),
            property_prefixes: Vec::new(),
            property_equals: Vec::new(),
        }
    }

    fn matches(&self, haystack: &str, property: &str) -> bool {
        self.keywords.iter().any(|kw| haystack.contains(kw.as_str()))
            || self
                .property_prefixes
                .iter()
                .any(|p| property.starts_with(p.as_str()))
            || self.property_equals.iter().any(|p| property == p.as_str())
    }
}

/// Assigns categories by evaluating its rule table top to bottom.
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<CategoryRule>,
}

impl Categorizer {
    /// A categorizer with a custom rule table (evaluated in the given order).
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// The standard table: semantic sub-categories first, then interactive,
    /// border, background, text. Keyword sets come from the configuration.
    pub fn from_config(keywords: &KeywordConfig) -> Self {
        let rules = vec![
            CategoryRule::keyword_rule(Category::SemanticSuccess, &keywords.success),
            CategoryRule::keyword_rule(Category::SemanticError, &keywords.error),
            CategoryRule::keyword_rule(Category::SemanticWarning, &keywords.warning),
            CategoryRule::keyword_rule(Category::SemanticInfo, &keywords.info),
            CategoryRule::keyword_rule(Category::Interactive, &keywords.interactive),
            CategoryRule::keyword_rule(Category::Border, &keywords.border),
            CategoryRule {
                category: Category::Background,
                keywords: keywords.background.clone(),
                property_prefixes: vec!["background".to_string()],
                property_equals: Vec::new(),
            },
            CategoryRule {
                category: Category::Text,
                keywords: keywords.text.clone(),
                property_prefixes: Vec::new(),
                property_equals: keywords.text_color_properties.clone(),
            },
        ];
        Self::new(rules)
    }

    pub fn categorize(&self, selector: &str, property: &str) -> Category {
        let property = property.to_lowercase();
        let haystack = format!("{} {}", selector.to_lowercase(), property);
        for rule in &self.rules {
            if rule.matches(&haystack, &property) {
                return rule.category;
            }
        }
        Category::Other
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::from_config(&KeywordConfig::default())
    }
}
