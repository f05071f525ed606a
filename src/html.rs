//! HTML document scanning: inline styles, `<style>` blocks, and the external
//! stylesheet references left for the fetcher.

use scraper::{Html, Selector};

use crate::cssrules;
use crate::error::ParseIssue;
use crate::types::{Declaration, SourceKind};

/// What one pass over the document HTML yields.
#[derive(Debug, Default)]
pub struct DocumentScan {
    /// Inline-style declarations first, then `<style>` blocks in document
    /// order. External stylesheets append after fetching.
    pub declarations: Vec<Declaration>,
    /// `<link rel="stylesheet">` hrefs, then `@import` targets from `<style>`
    /// blocks. Unresolved; the fetcher joins them against the document URL.
    pub stylesheet_refs: Vec<String>,
    /// Recovered parse failures.
    pub issues: Vec<ParseIssue>,
}

/// Scans the document markup for styling.
pub fn scan_document(html: &str) -> DocumentScan {
    let document = Html::parse_document(html);
    let mut scan = DocumentScan::default();
    collect_inline_styles(&document, &mut scan);
    collect_stylesheet_links(&document, &mut scan);
    collect_style_blocks(&document, &mut scan);
    scan
}

/// Elements carrying a `style` attribute, attributed to a synthesized
/// `tag.class1.class2` selector.
fn collect_inline_styles(document: &Html, scan: &mut DocumentScan) {
    let Ok(selector) = Selector::parse("[style]") else {
        return;
    };
    for element in document.select(&selector) {
        let Some(style) = element.value().attr("style") else {
            continue;
        };
        let target = inline_selector(element.value().name(), element.value().classes());
        let (pairs, issues) = cssrules::split_declaration_list(style);
        for (property, value) in pairs {
            scan.declarations
                .push(Declaration::new(target.clone(), property, value, SourceKind::Inline));
        }
        scan.issues.extend(issues);
    }
}

fn inline_selector<'a>(tag: &str, classes: impl Iterator<Item = &'a str>) -> String {
    let mut selector = tag.to_string();
    for class in classes {
        selector.push('.');
        selector.push_str(class);
    }
    selector
}

fn collect_stylesheet_links(document: &Html, scan: &mut DocumentScan) {
    let Ok(selector) = Selector::parse("link[href]") else {
        return;
    };
    for element in document.select(&selector) {
        let rel = element.value().attr("rel").unwrap_or("").to_ascii_lowercase();
        if !rel.split_whitespace().any(|token| token == "stylesheet") {
            continue;
        }
        if let Some(href) = element.value().attr("href") {
            let href = href.trim();
            if !href.is_empty() {
                scan.stylesheet_refs.push(href.to_string());
            }
        }
    }
}

fn collect_style_blocks(document: &Html, scan: &mut DocumentScan) {
    let Ok(selector) = Selector::parse("style") else {
        return;
    };
    for node in document.select(&selector) {
        let css: String = node.text().collect();
        if css.trim().is_empty() {
            continue;
        }
        let block = cssrules::scan_stylesheet(&css, SourceKind::StyleTag);
        scan.declarations.extend(block.declarations);
        scan.stylesheet_refs.extend(block.imports);
        scan.issues.extend(block.issues);
    }
}
