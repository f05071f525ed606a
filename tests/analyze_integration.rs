use std::path::PathBuf;
use std::process::Command;

use psa_lib::output::PSA_OUTPUT_VERSION;
use psa_lib::PsaOutput;
use tempfile::TempDir;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<style>
:root {
    --brand: #007bff;
}
body {
    color: #333333;
    background-color: #ffffff;
    font-family: Arial, sans-serif;
    font-size: 16px;
    font-weight: 400;
}
.panel {
    background-color: var(--brand);
}
p {
    color: #333;
}
</style>
</head>
<body>
<div class="hero" style="color: tomato"></div>
<p>hello</p>
</body>
</html>
"#;

fn write_page(dir: &TempDir, name: &str, html: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, html).expect("write page");
    path
}

fn run_psa(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_psa"))
        .args(args)
        .output()
        .expect("run psa")
}

fn analyze_json(path: &std::path::Path) -> serde_json::Value {
    let output = run_psa(&["analyze", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0), "analyze should succeed");
    serde_json::from_slice(&output.stdout).expect("analyze output should be JSON")
}

#[test]
fn analyze_reports_normalized_colors_for_local_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_page(&dir, "page.html", PAGE);
    let json = analyze_json(&path);

    assert_eq!(json["mode"], "analyze");
    assert_eq!(json["version"], PSA_OUTPUT_VERSION);
    assert_eq!(json["url"], path.display().to_string());

    assert_eq!(json["summary"]["total_unique_colors"], 4);
    assert_eq!(json["summary"]["total_css_variables"], 1);

    // "#333333" and "#333" merge; first spelling wins.
    let gray = &json["colors"]["#333333"];
    assert_eq!(gray["value"], "#333333");
    assert_eq!(gray["frequency"], 2);

    // Named colors normalize to hex but keep their spelling.
    let tomato = &json["colors"]["#ff6347"];
    assert_eq!(tomato["value"], "tomato");
    assert_eq!(tomato["selectors"][0], "div.hero");
}

#[test]
fn analyze_resolves_variables_and_attributes_uses() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_page(&dir, "page.html", PAGE);
    let json = analyze_json(&path);

    assert_eq!(json["css_variables"]["--brand"], "#007bff");

    let brand = &json["colors"]["#007bff"];
    assert_eq!(brand["frequency"], 2, "definition plus one use site");
    assert_eq!(brand["css_variables"][0], "--brand");
    let selectors: Vec<&str> = brand["selectors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(selectors.contains(&".panel"), "got {selectors:?}");
}

#[test]
fn analyze_buckets_colors_by_category() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_page(&dir, "page.html", PAGE);
    let json = analyze_json(&path);

    assert_eq!(json["summary"]["colors_by_category"]["text"], 3);
    assert_eq!(json["summary"]["colors_by_category"]["background"], 2);

    let backgrounds = json["colors_by_category"]["background"]
        .as_array()
        .expect("background bucket");
    assert!(backgrounds
        .iter()
        .any(|entry| entry["selector"] == ".panel" && entry["normalized"] == "#007bff"));

    let texts = json["colors_by_category"]["text"]
        .as_array()
        .expect("text bucket");
    assert!(texts
        .iter()
        .any(|entry| entry["color"] == "#333" && entry["normalized"] == "#333333"));
}

#[test]
fn analyze_pairs_text_and_background_on_one_selector() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_page(&dir, "page.html", PAGE);
    let json = analyze_json(&path);

    let contexts = json["colors"]["#333333"]["contrast_contexts"]
        .as_array()
        .expect("contrast contexts");
    let against_white = contexts
        .iter()
        .find(|ctx| ctx["color"] == "#ffffff")
        .expect("body text should pair with body background");
    let ratio = against_white["ratio"].as_f64().unwrap();
    assert!(
        (ratio - 12.63).abs() < 0.05,
        "expected ~12.63:1 for #333333 on #ffffff, got {ratio}"
    );
}

#[test]
fn analyze_aggregates_fonts_blockwise() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_page(
        &dir,
        "fonts.html",
        r#"<html><head><style>
        body { font-family: Arial, sans-serif; font-size: 16px; font-weight: 400; }
        h1 { font: bold 24px/1.2 "Display Sans", sans-serif; }
        </style></head><body></body></html>"#,
    );
    let json = analyze_json(&path);

    assert_eq!(json["summary"]["total_unique_fonts"], 2);

    let arial = &json["fonts"]["arial, sans-serif"];
    assert_eq!(arial["family"], "Arial, sans-serif");
    assert_eq!(arial["sizes"]["16px"], 1);
    assert_eq!(arial["weights"]["400"], 1);
    assert_eq!(arial["selectors"][0], "body");

    let display = &json["fonts"]["display sans, sans-serif"];
    assert_eq!(display["sizes"]["24px"], 1);
    assert_eq!(display["weights"]["bold"], 1);
    assert_eq!(display["line_heights"]["1.2"], 1);
}

#[test]
fn analyze_counts_declarations_in_stats() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_page(&dir, "page.html", PAGE);
    let json = analyze_json(&path);

    // 8 from the style block plus 1 inline.
    assert_eq!(json["stats"]["declarations"], 9);
    assert_eq!(json["stats"]["sources"], 1);
    assert_eq!(json["stats"]["invalidColors"], 0);
    assert_eq!(json["stats"]["malformedDeclarations"], 0);
}

#[test]
fn analyze_tallies_malformed_declarations_and_continues() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_page(
        &dir,
        "broken.html",
        "<html><head><style>p { color: red; oops }</style></head><body></body></html>",
    );

    let output = run_psa(&["analyze", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("analyze output should be JSON");
    assert_eq!(json["stats"]["malformedDeclarations"], 1);
    assert!(json["colors"].get("#ff0000").is_some(), "red still extracted");
}

#[test]
fn analyze_writes_report_to_file() {
    let dir = TempDir::new().expect("tempdir");
    let page = write_page(&dir, "page.html", PAGE);
    let report = dir.path().join("report.json");

    let output = run_psa(&[
        "analyze",
        page.to_str().unwrap(),
        "--output",
        report.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(0));
    assert!(
        output.stdout.is_empty(),
        "when writing to file, stdout should stay empty"
    );

    let content = std::fs::read_to_string(&report).expect("read report");
    let json: serde_json::Value = serde_json::from_str(&content).expect("report should be JSON");
    assert_eq!(json["mode"], "analyze");
    assert_eq!(json["summary"]["total_unique_colors"], 4);
}

#[test]
fn analyze_quiet_suppresses_stdout() {
    let dir = TempDir::new().expect("tempdir");
    let page = write_page(&dir, "page.html", PAGE);

    let output = run_psa(&["analyze", page.to_str().unwrap(), "--quiet"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[test]
fn analyze_output_deserializes_into_typed_envelope() {
    let dir = TempDir::new().expect("tempdir");
    let page = write_page(&dir, "page.html", PAGE);

    let output = run_psa(&["analyze", page.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let body: PsaOutput =
        serde_json::from_slice(&output.stdout).expect("analyze output should deserialize");
    match body {
        PsaOutput::Analyze(out) => {
            assert_eq!(out.version, PSA_OUTPUT_VERSION);
            assert_eq!(out.result.summary.total_unique_colors, 4);
            assert_eq!(out.stats.declarations, 9);
            assert!(out.result.fonts.contains_key("arial, sans-serif"));
        }
        other => panic!("expected analyze output, got {:?}", other),
    }
}

#[test]
fn analyze_respects_config_keyword_overrides() {
    let dir = TempDir::new().expect("tempdir");
    let page = write_page(
        &dir,
        "page.html",
        r#"<html><head><style>.panel { background-color: #112233; }</style></head><body></body></html>"#,
    );
    let cfg = dir.path().join("psa.toml");
    std::fs::write(
        &cfg,
        "[keywords]\nborder = [\"panel\"]\n",
    )
    .expect("write config");

    let output = run_psa(&[
        "analyze",
        page.to_str().unwrap(),
        "--config",
        cfg.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("analyze output should be JSON");
    // ".panel" now matches the border keyword list, which outranks the
    // background property prefix.
    assert_eq!(json["summary"]["colors_by_category"]["border"], 1);
    assert!(json["summary"]["colors_by_category"].get("background").is_none());
}
