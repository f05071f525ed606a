//! The extraction pass: declaration records in, analysis result out.
//!
//! One linear walk over the ordered declarations. Variables resolve first
//! (they can be referenced before their definition in document order), then
//! every value is substituted once and shared by the color scanner and the
//! block-wise font scanner. Recovered failures tally into
//! [`ExtractionStats`]; nothing here aborts the run.

use crate::analysis::collector::StyleCollector;
use crate::analysis::color;
use crate::analysis::fonts;
use crate::analysis::variables::{self, Substitution, VariableResolver};
use crate::config::AnalyzerConfig;
use crate::error::ParseIssue;
use crate::progress::ProgressCallback;
use crate::types::{AnalysisResult, Declaration, ExtractionStats};

/// The result of one run plus its recovered-failure tallies.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub stats: ExtractionStats,
}

/// Runs the extraction pipeline over materialized declarations.
pub struct Analyzer {
    config: AnalyzerConfig,
    progress: Option<ProgressCallback>,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    fn report(&self, message: &str) {
        if let Some(callback) = &self.progress {
            callback(message);
        }
    }

    fn tally(&self, stats: &mut ExtractionStats, issue: &ParseIssue) {
        match issue {
            ParseIssue::InvalidColorValue { .. } => stats.invalid_colors += 1,
            ParseIssue::CyclicVariableReference { .. } => stats.cyclic_references += 1,
            ParseIssue::UnresolvedVariable { .. } => stats.unresolved_references += 1,
            ParseIssue::MalformedDeclaration { .. } => stats.malformed_declarations += 1,
        }
        self.report(&issue.to_string());
    }

    /// Run the full pass over `declarations`, attributed to `url`.
    pub fn analyze(&self, url: &str, declarations: &[Declaration]) -> Analysis {
        let mut stats = ExtractionStats {
            declarations: declarations.len() as u64,
            ..ExtractionStats::default()
        };

        let (resolved, resolution_issues) = VariableResolver::collect(declarations).resolve();
        for issue in &resolution_issues {
            self.tally(&mut stats, issue);
        }
        if !resolved.is_empty() {
            self.report(&format!("resolved {} css variables", resolved.len()));
        }

        let mut collector = StyleCollector::new(&self.config.keywords);
        collector.set_variables(resolved.as_map().clone());

        // Consecutive declarations with one selector form a rule block; the
        // font scanner needs the whole block at once.
        let mut block_selector: Option<&str> = None;
        let mut block: Vec<(String, String)> = Vec::new();

        for declaration in declarations {
            if block_selector != Some(declaration.selector.as_str()) {
                if let Some(selector) = block_selector {
                    flush_fonts(&mut collector, selector, &mut block);
                }
                block_selector = Some(declaration.selector.as_str());
            }

            let substitution = resolved.substitute(&declaration.raw_value);
            for name in &substitution.missing {
                let issue = ParseIssue::unresolved(name.as_str());
                self.tally(&mut stats, &issue);
            }

            block.push((declaration.property.clone(), substitution.text.clone()));

            // A value with an unresolved reference is dropped from color
            // extraction; the block still sees whatever text remains.
            if substitution.is_complete() {
                self.extract_colors(&mut collector, &mut stats, declaration, &substitution);
            }
        }
        if let Some(selector) = block_selector {
            flush_fonts(&mut collector, selector, &mut block);
        }

        Analysis {
            result: collector.finalize(url),
            stats,
        }
    }

    fn extract_colors(
        &self,
        collector: &mut StyleCollector,
        stats: &mut ExtractionStats,
        declaration: &Declaration,
        substitution: &Substitution,
    ) {
        let (found, issues) = scan_color_tokens(&substitution.text);
        for issue in &issues {
            self.tally(stats, issue);
        }
        for token in found {
            let via = substitution.var_covering(token.start, token.end);
            collector.record_color(
                &token.raw,
                &token.normalized,
                &declaration.selector,
                &declaration.property,
                via,
            );
        }
    }
}

fn flush_fonts(collector: &mut StyleCollector, selector: &str, block: &mut Vec<(String, String)>) {
    if block.is_empty() {
        return;
    }
    let scan = fonts::scan_block(block.iter().map(|(p, v)| (p.as_str(), v.as_str())));
    collector.record_fonts(selector, scan);
    block.clear();
}

/// One color token found in a substituted value, with its byte range for
/// variable attribution.
#[derive(Debug)]
struct FoundColor {
    start: usize,
    end: usize,
    raw: String,
    normalized: String,
}

const COLOR_FUNCTIONS: [&str; 4] = ["rgb", "rgba", "hsl", "hsla"];

/// Scan a value for color tokens: hex literals, color function calls, and
/// color-keyword identifiers.
///
/// Quoted strings and `url(...)` arguments never yield tokens; other
/// functions (gradients, `calc`) are scanned inside their parentheses.
/// Color-shaped tokens that fail to parse become issues; identifier probes
/// that miss the keyword table are silently skipped.
fn scan_color_tokens(text: &str) -> (Vec<FoundColor>, Vec<ParseIssue>) {
    let mut found = Vec::new();
    let mut issues = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;

    // Dispatching on single bytes is safe: every trigger is ASCII, and
    // UTF-8 continuation bytes only ever hit the skip arm.
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                let quote = bytes[i];
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                i = (i + 1).min(bytes.len());
            }
            b'#' => {
                let start = i;
                let mut j = i + 1;
                while j < bytes.len() && (bytes[j] as char).is_ascii_hexdigit() {
                    j += 1;
                }
                if j > i + 1 {
                    push_token(&mut found, &mut issues, text, start, j);
                }
                i = j.max(i + 1);
            }
            b if (b as char).is_ascii_alphabetic() => {
                let start = i;
                let mut j = i + 1;
                while j < bytes.len() && is_ident_byte(bytes[j]) {
                    j += 1;
                }
                let ident = &text[start..j];

                if j < bytes.len() && bytes[j] == b'(' {
                    let close = variables::matching_paren(text, j + 1);
                    let lower = ident.to_ascii_lowercase();
                    if COLOR_FUNCTIONS.contains(&lower.as_str()) {
                        let end = close.map(|c| c + 1).unwrap_or(text.len());
                        push_token(&mut found, &mut issues, text, start, end);
                        i = end;
                    } else if lower == "url" {
                        i = close.map(|c| c + 1).unwrap_or(text.len());
                    } else {
                        i = j + 1;
                    }
                } else {
                    if let Some(rgb) = color::named_color(ident) {
                        found.push(FoundColor {
                            start,
                            end: j,
                            raw: ident.to_string(),
                            normalized: color::to_hex(rgb),
                        });
                    }
                    i = j;
                }
            }
            _ => i += 1,
        }
    }

    (found, issues)
}

fn push_token(
    found: &mut Vec<FoundColor>,
    issues: &mut Vec<ParseIssue>,
    text: &str,
    start: usize,
    end: usize,
) {
    let raw = &text[start..end];
    match color::normalize_color(raw) {
        Ok(normalized) => found.push(FoundColor {
            start,
            end,
            raw: raw.to_string(),
            normalized,
        }),
        Err(issue) => issues.push(issue),
    }
}

fn is_ident_byte(b: u8) -> bool {
    (b as char).is_ascii_alphanumeric() || b == b'-' || b == b'_'
}
