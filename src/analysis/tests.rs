use super::*;
use crate::config::AnalyzerConfig;
use crate::types::{Declaration, SourceKind};

fn decl(selector: &str, property: &str, value: &str) -> Declaration {
    Declaration::new(selector, property, value, SourceKind::StyleTag)
}

fn run(declarations: &[Declaration]) -> Analysis {
    Analyzer::new(AnalyzerConfig::default()).analyze("https://example.com", declarations)
}

#[test]
fn white_spellings_merge_into_one_entry() {
    let declarations = vec![
        decl(".a", "color", "#fff"),
        decl(".b", "color", "#ffffff"),
        decl(".c", "color", "white"),
        decl(".d", "border-color", "rgb(255, 255, 255)"),
        decl(".e", "color", "rgba(255, 255, 255, 0.4)"),
    ];

    let analysis = run(&declarations);
    assert_eq!(analysis.result.summary.total_unique_colors, 1);
    let entry = &analysis.result.colors["#ffffff"];
    assert_eq!(entry.frequency, 5);
    assert_eq!(entry.value, "#fff");
    assert_eq!(entry.selectors, vec![".a", ".b", ".c", ".d", ".e"]);
    assert_eq!(analysis.stats.declarations, 5);
    assert_eq!(analysis.stats.invalid_colors, 0);
}

#[test]
fn variable_use_attributes_color_to_its_name() {
    let declarations = vec![
        decl(":root", "--primary-color", "#007bff"),
        decl(".btn", "color", "var(--primary-color)"),
    ];

    let analysis = run(&declarations);
    let entry = &analysis.result.colors["#007bff"];
    assert_eq!(entry.css_variables, vec!["--primary-color"]);
    assert_eq!(entry.selectors, vec![":root", ".btn"]);
    assert_eq!(entry.properties, vec!["--primary-color", "color"]);
    assert_eq!(entry.frequency, 2);
    assert_eq!(
        analysis.result.css_variables["--primary-color"],
        "#007bff"
    );
    assert_eq!(analysis.result.summary.total_css_variables, 1);
}

#[test]
fn fallback_literals_are_not_attributed() {
    let declarations = vec![decl(".x", "color", "var(--missing, rebeccapurple)")];

    let analysis = run(&declarations);
    let entry = &analysis.result.colors["#663399"];
    assert_eq!(entry.frequency, 1);
    assert!(entry.css_variables.is_empty());
    assert_eq!(analysis.stats.unresolved_references, 0);
}

#[test]
fn cyclic_definitions_terminate_and_tally() {
    let declarations = vec![
        decl(":root", "--a", "var(--b)"),
        decl(":root", "--b", "var(--a)"),
        decl(".x", "color", "var(--a)"),
    ];

    let analysis = run(&declarations);
    assert!(analysis.stats.cyclic_references >= 1);
    // Both names resolve (to empty) and the use site yields no color.
    assert_eq!(analysis.result.summary.total_css_variables, 2);
    assert!(analysis.result.colors.is_empty());
}

#[test]
fn unresolved_reference_skips_color_but_not_fonts() {
    let declarations = vec![
        decl(".y", "color", "var(--missing)"),
        decl(".y", "font-family", "Arial, sans-serif"),
        decl(".y", "font-size", "14px"),
    ];

    let analysis = run(&declarations);
    assert_eq!(analysis.stats.unresolved_references, 1);
    assert!(analysis.result.colors.is_empty());
    let font = &analysis.result.fonts["arial, sans-serif"];
    assert_eq!(font.sizes["14px"], 1);
    assert_eq!(font.selectors, vec![".y"]);
}

#[test]
fn btn_success_lands_in_semantic_success_only() {
    let declarations = vec![decl(".btn-success", "background-color", "#28a745")];

    let analysis = run(&declarations);
    let buckets = &analysis.result.colors_by_category;
    assert_eq!(buckets[&Category::SemanticSuccess].len(), 1);
    assert!(!buckets.contains_key(&Category::Background));
    assert!(!buckets.contains_key(&Category::Interactive));
    assert_eq!(
        buckets[&Category::SemanticSuccess][0].normalized,
        "#28a745"
    );
    assert_eq!(
        analysis.result.summary.colors_by_category[&Category::SemanticSuccess],
        1
    );
}

#[test]
fn custom_property_definitions_feed_the_color_map() {
    let declarations = vec![decl(":root", "--brand", "#00ff00")];

    let analysis = run(&declarations);
    let entry = &analysis.result.colors["#00ff00"];
    assert_eq!(entry.properties, vec!["--brand"]);
    assert_eq!(entry.selectors, vec![":root"]);
    // Attribution happens at use sites, not at the definition.
    assert!(entry.css_variables.is_empty());
}

#[test]
fn same_selector_contrast_pair_is_recorded() {
    let declarations = vec![
        decl(".hero", "background-color", "#000000"),
        decl(".hero", "color", "#ffffff"),
    ];

    let analysis = run(&declarations);
    let contexts = &analysis.result.colors["#ffffff"].contrast_contexts;
    assert_eq!(contexts.len(), 1);
    assert_eq!(contexts[0].color, "#000000");
    assert!((contexts[0].ratio - 21.0).abs() < 0.01);
}

#[test]
fn font_shorthand_flows_through_the_pipeline() {
    let declarations = vec![
        decl(".title", "font", "bold 24px/1.2 \"Display Sans\", sans-serif"),
        decl(".title", "color", "#333333"),
    ];

    let analysis = run(&declarations);
    let font = &analysis.result.fonts["display sans, sans-serif"];
    assert_eq!(font.family, "\"Display Sans\", sans-serif");
    assert_eq!(font.sizes["24px"], 1);
    assert_eq!(font.weights["bold"], 1);
    assert_eq!(font.line_heights["1.2"], 1);
    assert_eq!(analysis.result.summary.total_unique_fonts, 1);
}

#[test]
fn variable_backed_fonts_aggregate_after_substitution() {
    let declarations = vec![
        decl(":root", "--stack", "Georgia, serif"),
        decl("p", "font-family", "var(--stack)"),
        decl("p", "font-size", "18px"),
    ];

    let analysis = run(&declarations);
    let font = &analysis.result.fonts["georgia, serif"];
    assert_eq!(font.family, "Georgia, serif");
    assert_eq!(font.sizes["18px"], 1);
}

#[test]
fn two_runs_over_identical_input_agree() {
    let declarations = vec![
        decl(":root", "--primary", "#007bff"),
        decl(".btn", "background-color", "var(--primary)"),
        decl(".btn", "color", "white"),
        decl(".btn", "font-family", "Arial, sans-serif"),
        decl(".alert", "border", "1px solid red"),
    ];

    let first = run(&declarations);
    let second = run(&declarations);
    assert_eq!(first.result, second.result);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn invalid_color_values_tally_without_aborting() {
    let declarations = vec![
        decl(".x", "color", "#zz0011"),
        decl(".x", "background", "rgb(nope)"),
        decl(".y", "color", "#123456"),
    ];

    let analysis = run(&declarations);
    // "#zz0011" never forms a hex token ('z' stops the digit run), so the
    // malformed rgb() is the color-shaped garbage here.
    assert!(analysis.stats.invalid_colors >= 1);
    assert!(analysis.result.colors.contains_key("#123456"));
}
