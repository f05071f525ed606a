//! CSS rule scanning: stylesheet text in, declaration records out.
//!
//! A hand scanner, not a grammar-complete CSS parser. It strips comments,
//! walks rule blocks by brace depth, recurses into grouping at-rules, drops
//! the non-style ones, and splits declarations on semicolons that sit outside
//! quotes and parentheses. Odd input degrades to a malformed-declaration
//! tally, never a failure.

use crate::error::ParseIssue;
use crate::types::{Declaration, SourceKind};

/// Everything one stylesheet scan produces.
#[derive(Debug, Default)]
pub struct RuleScan {
    /// Declarations in document order.
    pub declarations: Vec<Declaration>,
    /// `@import` targets in document order, not yet resolved against a base.
    pub imports: Vec<String>,
    /// Recovered parse failures.
    pub issues: Vec<ParseIssue>,
}

/// At-rules whose bodies hold ordinary style rules.
const GROUPING_AT_RULES: [&str; 4] = ["media", "supports", "layer", "container"];

/// Scans one stylesheet body into declaration records.
pub fn scan_stylesheet(css: &str, source_kind: SourceKind) -> RuleScan {
    let mut scan = RuleScan::default();
    scan_rules(&strip_comments(css), source_kind, &mut scan);
    scan
}

/// Splits a bare declaration list, as found in a `style` attribute.
pub fn split_declaration_list(text: &str) -> (Vec<(String, String)>, Vec<ParseIssue>) {
    let stripped = strip_comments(text);
    let mut pairs = Vec::new();
    let mut issues = Vec::new();
    for segment in split_segments(&stripped) {
        match split_declaration(segment) {
            Some(pair) => pairs.push(pair),
            None => issues.push(ParseIssue::malformed(segment)),
        }
    }
    (pairs, issues)
}

/// Walks rules at one nesting level. Grouping at-rule bodies recurse here;
/// recursion depth is the at-rule nesting depth of the input.
fn scan_rules(css: &str, source_kind: SourceKind, scan: &mut RuleScan) {
    let bytes = css.as_bytes();
    let mut prelude_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(css, i);
            }
            b';' => {
                scan_statement(&css[prelude_start..i], scan);
                i += 1;
                prelude_start = i;
            }
            b'{' => {
                let close = matching_brace(css, i + 1);
                let prelude = css[prelude_start..i].trim();
                let body = &css[i + 1..close];
                if let Some(at_rule) = prelude.strip_prefix('@') {
                    if is_grouping_at_rule(at_rule) {
                        scan_rules(body, source_kind, scan);
                    }
                } else if !prelude.is_empty() {
                    scan_block(prelude, body, source_kind, scan);
                }
                i = (close + 1).min(bytes.len());
                prelude_start = i;
            }
            b'}' => {
                // Stray close brace; drop whatever preceded it.
                i += 1;
                prelude_start = i;
            }
            _ => i += 1,
        }
    }
    scan_statement(&css[prelude_start..], scan);
}

/// Handles a semicolon-terminated statement. Only `@import` carries anything
/// we want; `@charset`, `@namespace` and stray text are dropped.
fn scan_statement(prelude: &str, scan: &mut RuleScan) {
    let Some(at_rule) = prelude.trim().strip_prefix('@') else {
        return;
    };
    if let Some(head) = at_rule.get(..6) {
        if head.eq_ignore_ascii_case("import") {
            if let Some(target) = import_target(&at_rule[6..]) {
                scan.imports.push(target);
            }
        }
    }
}

/// Pulls the URL out of an `@import` argument list, dropping any trailing
/// media query.
fn import_target(rest: &str) -> Option<String> {
    let rest = rest.trim();
    let body = match rest.get(..4) {
        Some(head) if head.eq_ignore_ascii_case("url(") => {
            let inner = &rest[4..];
            inner[..inner.find(')')?].trim()
        }
        _ => rest,
    };
    let target = if let Some(after) = body.strip_prefix('"') {
        after.split('"').next()?
    } else if let Some(after) = body.strip_prefix('\'') {
        after.split('\'').next()?
    } else {
        body.split_whitespace().next()?
    };
    (!target.is_empty()).then(|| target.to_string())
}

/// One style rule: selector prelude plus declaration body.
fn scan_block(prelude: &str, body: &str, source_kind: SourceKind, scan: &mut RuleScan) {
    let selector = normalize_selector(prelude);
    for segment in split_segments(body) {
        match split_declaration(segment) {
            Some((property, value)) => {
                scan.declarations
                    .push(Declaration::new(selector.clone(), property, value, source_kind));
            }
            None => scan.issues.push(ParseIssue::malformed(segment)),
        }
    }
}

fn is_grouping_at_rule(at_rule: &str) -> bool {
    let name: String = at_rule
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_ascii_lowercase();
    GROUPING_AT_RULES.contains(&name.as_str())
}

/// Selector text with whitespace runs collapsed, so multi-line selectors
/// render on one line in the report.
fn normalize_selector(selector: &str) -> String {
    selector.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a declaration body on semicolons, honoring strings, parentheses
/// (`url(data:...;base64,...)`) and nested braces. Empty segments vanish.
fn split_segments(body: &str) -> Vec<&str> {
    let bytes = body.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut parens = 0usize;
    let mut braces = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(body, i);
                continue;
            }
            b'(' => parens += 1,
            b')' => parens = parens.saturating_sub(1),
            b'{' => braces += 1,
            b'}' => braces = braces.saturating_sub(1),
            b';' if parens == 0 && braces == 0 => {
                segments.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&body[start..]);
    segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Splits one segment at its first colon. `None` means the segment is not a
/// declaration: no colon, an empty side, or a property that is not a CSS
/// ident (nested rules land here).
fn split_declaration(segment: &str) -> Option<(String, String)> {
    let (property, value) = segment.split_once(':')?;
    let property = property.trim();
    let value = value.trim();
    if property.is_empty() || value.is_empty() || !is_property_name(property) {
        return None;
    }
    Some((property.to_string(), value.to_string()))
}

fn is_property_name(property: &str) -> bool {
    property
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Removes `/* ... */` comments outside strings. An unterminated comment
/// swallows the rest of the input, matching how browsers recover.
fn strip_comments(css: &str) -> String {
    let bytes = css.as_bytes();
    let mut out = String::with_capacity(css.len());
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => i = skip_string(css, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                out.push_str(&css[start..i]);
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
                out.push(' ');
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        out.push_str(&css[start..]);
    }
    out
}

/// Index just past the closing quote, skipping backslash escapes.
fn skip_string(text: &str, open: usize) -> usize {
    let bytes = text.as_bytes();
    let quote = bytes[open];
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Index of the brace closing the block opened just before `from`, or the
/// end of input when the block never closes.
fn matching_brace(text: &str, from: usize) -> usize {
    let bytes = text.as_bytes();
    let mut depth = 1u32;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(text, i);
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}
