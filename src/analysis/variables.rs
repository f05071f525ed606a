//! CSS custom-property (variable) resolution and `var()` substitution.
//!
//! Resolution runs as an explicit frame stack over the variable graph: a
//! name is "in progress" while any frame for it is on the stack, so a
//! reference back into the stack is a cycle, reported as a
//! [`ParseIssue::CyclicVariableReference`] and healed with the reference's
//! fallback (or nothing). Stack depth is bounded by the number of distinct
//! variable names; no recursion over the graph happens anywhere.

use std::collections::BTreeMap;

use crate::error::ParseIssue;
use crate::types::Declaration;

/// Collects raw custom-property declarations in document order.
#[derive(Debug, Default, Clone)]
pub struct VariableResolver {
    raw: BTreeMap<String, String>,
}

impl VariableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gather every `--name: value` declaration. Last one wins per name.
    pub fn collect<'a>(declarations: impl IntoIterator<Item = &'a Declaration>) -> Self {
        let mut resolver = Self::new();
        for decl in declarations {
            if decl.is_custom_property() {
                resolver.define(&decl.property, &decl.raw_value);
            }
        }
        resolver
    }

    pub fn define(&mut self, name: &str, value: &str) {
        self.raw
            .insert(name.trim().to_string(), value.trim().to_string());
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Resolve every variable to a literal value, reporting cycles and
    /// unresolved references as issues rather than failures.
    pub fn resolve(self) -> (ResolvedVariables, Vec<ParseIssue>) {
        let mut issues = Vec::new();
        let mut done: BTreeMap<String, String> = BTreeMap::new();

        for name in self.raw.keys() {
            if done.contains_key(name) {
                continue;
            }
            resolve_name(name, &self.raw, &mut done, &mut issues);
        }

        (ResolvedVariables { map: done }, issues)
    }
}

struct Frame {
    name: String,
    out: String,
    rest: String,
}

enum Step {
    Finished,
    Reference(VarRef),
}

/// Drive one name (and anything it depends on) to completion.
fn resolve_name(
    start: &str,
    raw: &BTreeMap<String, String>,
    done: &mut BTreeMap<String, String>,
    issues: &mut Vec<ParseIssue>,
) {
    let Some(initial) = raw.get(start) else {
        return;
    };
    let mut stack: Vec<Frame> = vec![Frame {
        name: start.to_string(),
        out: String::new(),
        rest: initial.clone(),
    }];

    loop {
        let step = match stack.last_mut() {
            None => break,
            Some(frame) => match next_var_ref(&frame.rest) {
                None => Step::Finished,
                Some(var_ref) => {
                    // Consume text up to the reference; the reference itself
                    // stays in `rest` so a suspended frame re-parses it.
                    frame.out.push_str(&frame.rest[..var_ref.start]);
                    frame.rest = frame.rest[var_ref.start..].to_string();
                    Step::Reference(var_ref)
                }
            },
        };

        match step {
            Step::Finished => {
                if let Some(finished) = stack.pop() {
                    let mut value = finished.out;
                    value.push_str(&finished.rest);
                    done.insert(finished.name, value);
                }
            }
            Step::Reference(var_ref) => {
                let ref_len = var_ref.end - var_ref.start;
                let resolved = done.get(&var_ref.name).cloned();
                let on_path =
                    resolved.is_none() && stack.iter().any(|f| f.name == var_ref.name);

                if let Some(value) = resolved {
                    if let Some(frame) = stack.last_mut() {
                        frame.out.push_str(&value);
                        frame.rest = frame.rest[ref_len..].to_string();
                    }
                } else if on_path {
                    // Reference back into the active path: cycle. Heal with
                    // the fallback (or nothing) and keep going.
                    let path: Vec<String> = stack.iter().map(|f| f.name.clone()).collect();
                    issues.push(ParseIssue::cycle(&var_ref.name, &path));
                    if let Some(frame) = stack.last_mut() {
                        let after = frame.rest[ref_len..].to_string();
                        frame.rest = match var_ref.fallback {
                            Some(fallback) => format!("{fallback}{after}"),
                            None => after,
                        };
                    }
                } else if let Some(dep_value) = raw.get(&var_ref.name).cloned() {
                    // Suspend with the reference unconsumed; once the
                    // dependency lands in `done` it splices on re-parse.
                    stack.push(Frame {
                        name: var_ref.name,
                        out: String::new(),
                        rest: dep_value,
                    });
                } else if let Some(frame) = stack.last_mut() {
                    let after = frame.rest[ref_len..].to_string();
                    frame.rest = match var_ref.fallback {
                        Some(fallback) => format!("{fallback}{after}"),
                        None => {
                            issues.push(ParseIssue::unresolved(&var_ref.name));
                            after
                        }
                    };
                }
            }
        }
    }
}

/// The fully resolved variable map plus the substitution function over it.
#[derive(Debug, Clone, Default)]
pub struct ResolvedVariables {
    map: BTreeMap<String, String>,
}

impl ResolvedVariables {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.map
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.map
    }

    /// Replace every `var(--name[, fallback])` in `value`.
    ///
    /// Defined names splice their resolved text and record a span for
    /// attribution. Undefined names splice their fallback (which may itself
    /// contain `var()` calls and is processed the same way) or, with no
    /// fallback, splice nothing and land in `missing`. Fallback literals get
    /// no span: the variable did not supply that text.
    pub fn substitute(&self, value: &str) -> Substitution {
        let mut result = Substitution {
            text: String::new(),
            spans: Vec::new(),
            missing: Vec::new(),
        };
        self.substitute_into(value, &mut result);
        result
    }

    fn substitute_into(&self, value: &str, result: &mut Substitution) {
        let mut rest = value;
        while let Some(var_ref) = next_var_ref(rest) {
            result.text.push_str(&rest[..var_ref.start]);

            if let Some(resolved) = self.map.get(&var_ref.name) {
                let start = result.text.len();
                result.text.push_str(resolved);
                result.spans.push(VarSpan {
                    start,
                    end: result.text.len(),
                    name: var_ref.name,
                });
            } else if let Some(fallback) = var_ref.fallback {
                // Depth is bounded by the literal nesting of the declaration
                // text, not by the variable graph.
                self.substitute_into(&fallback, result);
            } else {
                result.missing.push(var_ref.name);
            }

            rest = &rest[var_ref.end..];
        }
        result.text.push_str(rest);
    }
}

/// Result of substituting `var()` references in one value string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    pub spans: Vec<VarSpan>,
    pub missing: Vec<String>,
}

impl Substitution {
    /// False when any reference had no definition and no fallback.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// The variable whose spliced text covers `range`, if any.
    pub fn var_covering(&self, start: usize, end: usize) -> Option<&str> {
        self.spans
            .iter()
            .find(|span| start < span.end && end > span.start)
            .map(|span| span.name.as_str())
    }
}

/// A byte range of substituted text traceable to one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSpan {
    pub start: usize,
    pub end: usize,
    pub name: String,
}

struct VarRef {
    /// Byte offset of `var(` in the scanned text.
    start: usize,
    /// Byte offset just past the matching `)`.
    end: usize,
    name: String,
    fallback: Option<String>,
}

/// Find the next well-formed `var(--name[, fallback])` reference.
///
/// Malformed references (bad name, unbalanced parens) are left in place as
/// opaque text, matching how a browser's fallback path treats them.
fn next_var_ref(text: &str) -> Option<VarRef> {
    let bytes = text.as_bytes();
    let mut search_from = 0;

    while let Some(found) = text[search_from..].find("var(") {
        let start = search_from + found;
        search_from = start + 4;

        // Reject matches inside longer identifiers, e.g. "invar(".
        if start > 0 {
            let prev = bytes[start - 1] as char;
            if prev.is_ascii_alphanumeric() || prev == '-' || prev == '_' {
                continue;
            }
        }

        let inner_start = start + 4;
        let Some(inner_end) = matching_paren(text, inner_start) else {
            continue;
        };
        let inner = &text[inner_start..inner_end];

        let (name, fallback) = match top_level_comma(inner) {
            Some(comma) => (
                inner[..comma].trim(),
                Some(inner[comma + 1..].trim().to_string()),
            ),
            None => (inner.trim(), None),
        };
        if !name.starts_with("--") || name.len() <= 2 {
            continue;
        }

        return Some(VarRef {
            start,
            end: inner_end + 1,
            name: name.to_string(),
            fallback,
        });
    }

    None
}

/// Index of the `)` matching an opening paren just before `from`, honoring
/// nesting and quoted strings.
pub(crate) fn matching_paren(text: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;

    for (offset, ch) in text[from..].char_indices() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(from + offset);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

/// First comma at paren depth zero, outside quotes.
fn top_level_comma(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (offset, ch) in text.char_indices() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => return Some(offset),
                _ => {}
            },
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceKind;

    fn resolver(pairs: &[(&str, &str)]) -> VariableResolver {
        let mut r = VariableResolver::new();
        for (name, value) in pairs {
            r.define(name, value);
        }
        r
    }

    #[test]
    fn collects_custom_properties_last_wins() {
        let decls = vec![
            Declaration::new(":root", "--accent", "#ff0000", SourceKind::StyleTag),
            Declaration::new(".btn", "color", "blue", SourceKind::StyleTag),
            Declaration::new(":root", "--accent", "#00ff00", SourceKind::StyleTag),
        ];
        let resolver = VariableResolver::collect(&decls);
        let (vars, issues) = resolver.resolve();
        assert!(issues.is_empty());
        assert_eq!(vars.get("--accent"), Some("#00ff00"));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn resolves_chained_references() {
        let (vars, issues) = resolver(&[
            ("--base", "#112233"),
            ("--primary", "var(--base)"),
            ("--emphasis", "var(--primary)"),
        ])
        .resolve();
        assert!(issues.is_empty());
        assert_eq!(vars.get("--emphasis"), Some("#112233"));
        assert_eq!(vars.get("--primary"), Some("#112233"));
    }

    #[test]
    fn resolves_references_embedded_in_longer_values() {
        let (vars, issues) = resolver(&[
            ("--w", "1px"),
            ("--edge", "var(--w) solid var(--c, black)"),
        ])
        .resolve();
        assert!(issues.is_empty());
        assert_eq!(vars.get("--edge"), Some("1px solid black"));
    }

    #[test]
    fn two_name_cycle_reports_and_terminates() {
        let (vars, issues) = resolver(&[("--a", "var(--b)"), ("--b", "var(--a)")]).resolve();

        assert!(
            issues
                .iter()
                .any(|i| matches!(i, ParseIssue::CyclicVariableReference { .. })),
            "expected a cycle issue, got {issues:?}"
        );
        // Both names still land in the map, healed to empty.
        assert_eq!(vars.get("--a"), Some(""));
        assert_eq!(vars.get("--b"), Some(""));
    }

    #[test]
    fn self_cycle_uses_fallback() {
        let (vars, issues) = resolver(&[("--a", "var(--a, #abcdef)")]).resolve();
        assert_eq!(
            issues
                .iter()
                .filter(|i| matches!(i, ParseIssue::CyclicVariableReference { .. }))
                .count(),
            1
        );
        assert_eq!(vars.get("--a"), Some("#abcdef"));
    }

    #[test]
    fn undefined_reference_without_fallback_is_reported() {
        let (vars, issues) = resolver(&[("--x", "var(--missing)")]).resolve();
        assert!(issues
            .iter()
            .any(|i| matches!(i, ParseIssue::UnresolvedVariable { name } if name == "--missing")));
        assert_eq!(vars.get("--x"), Some(""));
    }

    #[test]
    fn nested_fallbacks_resolve_innermost_first() {
        let (vars, issues) =
            resolver(&[("--deep", "var(--m1, var(--m2, var(--m3, #010203)))")]).resolve();
        assert!(issues.is_empty());
        assert_eq!(vars.get("--deep"), Some("#010203"));
    }

    #[test]
    fn resolution_is_idempotent() {
        let (first, _) = resolver(&[("--base", "#112233"), ("--primary", "var(--base)")]).resolve();

        let mut again = VariableResolver::new();
        for (name, value) in first.as_map() {
            again.define(name, value);
        }
        let (second, issues) = again.resolve();
        assert!(issues.is_empty());
        assert_eq!(first.as_map(), second.as_map());
    }

    #[test]
    fn substitute_replaces_and_records_spans() {
        let (vars, _) = resolver(&[("--primary", "#007bff")]).resolve();
        let sub = vars.substitute("1px solid var(--primary)");
        assert_eq!(sub.text, "1px solid #007bff");
        assert!(sub.is_complete());
        assert_eq!(sub.spans.len(), 1);
        assert_eq!(sub.spans[0].name, "--primary");
        assert_eq!(&sub.text[sub.spans[0].start..sub.spans[0].end], "#007bff");
    }

    #[test]
    fn substitute_uses_fallback_without_attribution() {
        let (vars, _) = VariableResolver::new().resolve();
        let sub = vars.substitute("var(--missing, rebeccapurple)");
        assert_eq!(sub.text, "rebeccapurple");
        assert!(sub.spans.is_empty());
        assert!(sub.is_complete());
    }

    #[test]
    fn substitute_reports_missing_without_fallback() {
        let (vars, _) = VariableResolver::new().resolve();
        let sub = vars.substitute("var(--missing)");
        assert_eq!(sub.text, "");
        assert_eq!(sub.missing, vec!["--missing".to_string()]);
        assert!(!sub.is_complete());
    }

    #[test]
    fn substitute_handles_nested_fallback_references() {
        let (vars, _) = resolver(&[("--b", "#222222")]).resolve();
        let sub = vars.substitute("var(--a, var(--b))");
        assert_eq!(sub.text, "#222222");
        assert_eq!(sub.spans.len(), 1);
        assert_eq!(sub.spans[0].name, "--b");
    }

    #[test]
    fn substitute_ignores_malformed_references() {
        let (vars, _) = resolver(&[("--a", "#111111")]).resolve();
        // No name marker and an unbalanced paren: both stay as opaque text.
        assert_eq!(vars.substitute("var(nope)").text, "var(nope)");
        assert_eq!(vars.substitute("var(--a").text, "var(--a");
        // But a well-formed reference later in the value still resolves.
        let sub = vars.substitute("invar(--a) var(--a)");
        assert_eq!(sub.text, "invar(--a) #111111");
    }

    #[test]
    fn fallback_may_contain_commas() {
        let (vars, _) = VariableResolver::new().resolve();
        let sub = vars.substitute("var(--stack, Arial, sans-serif)");
        assert_eq!(sub.text, "Arial, sans-serif");
    }

    #[test]
    fn var_covering_maps_ranges_to_names() {
        let (vars, _) = resolver(&[("--fg", "#0000ff")]).resolve();
        let sub = vars.substitute("var(--fg) on white");
        let span = &sub.spans[0];
        assert_eq!(sub.var_covering(span.start, span.end), Some("--fg"));
        assert_eq!(sub.var_covering(span.end + 1, span.end + 3), None);
    }
}
