//! Declaration records: the ordered input stream the parser adapter hands to
//! the extraction pass.

use serde::{Deserialize, Serialize};

/// Where a declaration was found in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// `style="..."` attribute on an element
    Inline,
    /// `<style>` block in the document
    StyleTag,
    /// Same-origin stylesheet referenced via `<link>` or `@import`
    ExternalStylesheet,
}

/// A single property:value pair attributed to a selector.
///
/// Declarations arrive in document order, rule by rule; consecutive records
/// sharing a selector belong to the same rule block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub selector: String,
    pub property: String,
    pub raw_value: String,
    pub source_kind: SourceKind,
}

impl Declaration {
    pub fn new(
        selector: impl Into<String>,
        property: impl Into<String>,
        raw_value: impl Into<String>,
        source_kind: SourceKind,
    ) -> Self {
        Self {
            selector: selector.into(),
            property: property.into(),
            raw_value: raw_value.into(),
            source_kind,
        }
    }

    /// Custom properties (`--name`) define variables rather than styles.
    pub fn is_custom_property(&self) -> bool {
        self.property.starts_with("--")
    }
}
