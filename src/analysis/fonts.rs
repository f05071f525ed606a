//! Font usage scanning.
//!
//! Declarations arrive rule block by rule block; a block's `font-size`,
//! `font-weight`, and `line-height` attach to the family declared in the
//! same block. The `font` shorthand is split into its parts (optional
//! style/variant/weight, then size with optional `/line-height`, then the
//! family stack). A block without a family contributes nothing.

/// Font-relevant values found in one declaration block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontScan {
    pub family: Option<String>,
    pub sizes: Vec<String>,
    pub weights: Vec<String>,
    pub line_heights: Vec<String>,
}

impl FontScan {
    pub fn is_empty(&self) -> bool {
        self.family.is_none()
    }
}

const SIZE_KEYWORDS: [&str; 9] = [
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "smaller", "larger",
];

// Whole-value shorthands that carry no extractable parts.
const OPAQUE_SHORTHANDS: [&str; 10] = [
    "inherit",
    "initial",
    "unset",
    "revert",
    "caption",
    "icon",
    "menu",
    "message-box",
    "small-caption",
    "status-bar",
];

/// Scan one block's (property, value) pairs for font usage.
/// Values are expected to be variable-substituted already.
pub fn scan_block<'a, I>(declarations: I) -> FontScan
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut scan = FontScan::default();
    for (property, value) in declarations {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match property.to_ascii_lowercase().as_str() {
            "font-family" => scan.family = Some(value.to_string()),
            "font-size" => scan.sizes.push(normalize_token(value)),
            "font-weight" => scan.weights.push(normalize_token(value)),
            "line-height" => scan.line_heights.push(normalize_token(value)),
            "font" => {
                if let Some(parts) = split_shorthand(value) {
                    if let Some(weight) = parts.weight {
                        scan.weights.push(weight);
                    }
                    scan.sizes.push(parts.size);
                    if let Some(line_height) = parts.line_height {
                        scan.line_heights.push(line_height);
                    }
                    scan.family = Some(parts.family);
                }
            }
            _ => {}
        }
    }
    scan
}

/// Deduplication key for a family stack: quotes stripped per family,
/// whitespace collapsed, lowercased, comma-joined. `"Arial", sans-serif`
/// and `Arial,sans-serif` share a key; different fallback stacks do not.
pub fn family_key(raw: &str) -> String {
    split_families(raw)
        .iter()
        .map(|family| family.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Individual family names in a stack. Commas inside quoted names do not
/// split; the quotes themselves are dropped.
pub fn split_families(raw: &str) -> Vec<String> {
    let mut families = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for ch in raw.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                ',' => {
                    push_family(&mut families, &current);
                    current.clear();
                }
                _ => current.push(ch),
            },
        }
    }
    push_family(&mut families, &current);
    families
}

fn push_family(families: &mut Vec<String>, segment: &str) {
    let collapsed = segment.split_whitespace().collect::<Vec<_>>().join(" ");
    if !collapsed.is_empty() {
        families.push(collapsed);
    }
}

fn normalize_token(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

#[derive(Debug, PartialEq)]
struct Shorthand {
    weight: Option<String>,
    size: String,
    line_height: Option<String>,
    family: String,
}

fn split_shorthand(value: &str) -> Option<Shorthand> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if OPAQUE_SHORTHANDS.contains(&collapsed.to_ascii_lowercase().as_str()) {
        return None;
    }
    // Join "14px / 1.5" into one token so the slash split below sees it.
    let compact = collapsed.replace(" /", "/").replace("/ ", "/");
    let tokens: Vec<&str> = compact.split(' ').collect();

    let size_idx = tokens.iter().position(|t| looks_like_size(t))?;
    let family = tokens[size_idx + 1..].join(" ");
    if family.is_empty() {
        return None;
    }

    let (size, line_height) = match tokens[size_idx].split_once('/') {
        Some((size, lh)) => (size, Some(lh.to_ascii_lowercase())),
        None => (tokens[size_idx], None),
    };

    let mut weight = None;
    for token in &tokens[..size_idx] {
        if let Some(w) = weight_token(token) {
            weight = Some(w);
        }
    }

    Some(Shorthand {
        weight,
        size: size.to_ascii_lowercase(),
        line_height,
        family,
    })
}

fn looks_like_size(token: &str) -> bool {
    let size = token.split('/').next().unwrap_or(token);
    let lower = size.to_ascii_lowercase();
    if SIZE_KEYWORDS.contains(&lower.as_str()) {
        return true;
    }
    if !lower.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return false;
    }
    // A bare integer in front of the family is a weight, not a size.
    token.contains('/') || lower.chars().any(|c| c.is_ascii_alphabetic() || c == '%')
}

fn weight_token(token: &str) -> Option<String> {
    let lower = token.to_ascii_lowercase();
    match lower.as_str() {
        "bold" | "bolder" | "lighter" => Some(lower),
        _ if !lower.is_empty() && lower.chars().all(|c| c.is_ascii_digit()) => Some(lower),
        _ => None,
    }
}
