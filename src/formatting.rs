use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use psa_lib::output::PSA_OUTPUT_VERSION;
use psa_lib::{AnalyzeOutput, ContrastOutput, ErrorOutput, PsaError, PsaOutput};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &PsaOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: PsaError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let payload = PsaOutput::Error(ErrorOutput {
        version: PSA_OUTPUT_VERSION.to_string(),
        error: err.to_payload(),
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    // Reserve exit code 2 for fatal errors; unmet contrast thresholds use 1.
    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(
    body: &PsaOutput,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &PsaOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content = serde_json::to_string_pretty(body)
        .unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &PsaOutput, colorize: bool) -> String {
    match body {
        PsaOutput::Analyze(out) => format_analyze(out),
        PsaOutput::Contrast(out) => format_contrast(out, colorize),
        PsaOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            writeln!(buf, "{} {}", header, out.error.message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

const VARIABLE_DISPLAY_CAP: usize = 20;

fn format_analyze(out: &AnalyzeOutput) -> String {
    let mut buf = String::new();
    let rule = "=".repeat(70);
    let report = &out.result;

    writeln!(buf, "{rule}").ok();
    writeln!(buf, "COLOR AND FONT ANALYSIS REPORT").ok();
    writeln!(buf, "{rule}").ok();
    writeln!(buf).ok();
    writeln!(buf, "URL: {}", report.url).ok();

    writeln!(buf).ok();
    writeln!(buf, "--- SUMMARY ---").ok();
    writeln!(
        buf,
        "Total unique colors: {}",
        report.summary.total_unique_colors
    )
    .ok();
    writeln!(
        buf,
        "Total unique fonts: {}",
        report.summary.total_unique_fonts
    )
    .ok();
    writeln!(
        buf,
        "CSS variables defined: {}",
        report.summary.total_css_variables
    )
    .ok();

    writeln!(buf).ok();
    writeln!(buf, "--- COLORS BY CATEGORY ---").ok();
    for (category, colors) in &report.colors_by_category {
        let heading = category.as_str().to_uppercase().replace('_', " ");
        writeln!(buf).ok();
        writeln!(buf, "{} ({} colors):", heading, colors.len()).ok();
        let mut ranked: Vec<_> = colors.iter().collect();
        ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        for entry in ranked.into_iter().take(5) {
            writeln!(buf, "  • {} ({})", entry.normalized, entry.color).ok();
            writeln!(buf, "    Property: {}", entry.property).ok();
            writeln!(buf, "    Selector: {}", truncate_selector(&entry.selector)).ok();
        }
    }

    writeln!(buf).ok();
    writeln!(buf, "--- FONT FAMILIES ---").ok();
    let mut fonts: Vec<_> = report.fonts.values().collect();
    fonts.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    for font in fonts.into_iter().take(10) {
        writeln!(buf).ok();
        writeln!(buf, "{} (used {} times)", font.family, font.frequency).ok();
        if !font.sizes.is_empty() {
            writeln!(buf, "  Sizes: {}", top_counts(&font.sizes)).ok();
        }
        if !font.weights.is_empty() {
            writeln!(buf, "  Weights: {}", top_counts(&font.weights)).ok();
        }
    }

    if !report.css_variables.is_empty() {
        writeln!(buf).ok();
        writeln!(buf, "--- CSS VARIABLES ---").ok();
        for (name, value) in report.css_variables.iter().take(VARIABLE_DISPLAY_CAP) {
            writeln!(buf, "  {}: {}", name, value).ok();
        }
        let remaining = report.css_variables.len().saturating_sub(VARIABLE_DISPLAY_CAP);
        if remaining > 0 {
            writeln!(buf, "  (+ {} more)", remaining).ok();
        }
    }

    writeln!(buf).ok();
    writeln!(buf, "{rule}").ok();
    buf
}

fn format_contrast(out: &ContrastOutput, colorize: bool) -> String {
    let mut buf = String::new();
    let header = color("[CONTRAST]", "36", colorize);
    writeln!(buf, "{} {} on {}", header, out.foreground, out.background).ok();
    writeln!(buf, "Ratio: {:.2}:1", out.verdict.ratio).ok();
    writeln!(
        buf,
        "AA:  normal {}  large {}",
        pass_fail(out.verdict.aa_normal, colorize),
        pass_fail(out.verdict.aa_large, colorize)
    )
    .ok();
    writeln!(
        buf,
        "AAA: normal {}  large {}",
        pass_fail(out.verdict.aaa_normal, colorize),
        pass_fail(out.verdict.aaa_large, colorize)
    )
    .ok();
    if let (Some(min_ratio), Some(passed)) = (out.min_ratio, out.passed) {
        let status = if passed {
            color("met", "32", colorize)
        } else {
            color("not met", "31", colorize)
        };
        writeln!(buf, "Minimum {:.2}:1: {}", min_ratio, status).ok();
    }
    buf
}

/// Top three entries by count, formatted `value (Nx)`.
fn top_counts(counts: &BTreeMap<String, u64>) -> String {
    let mut ranked: Vec<_> = counts.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1));
    ranked
        .into_iter()
        .take(3)
        .map(|(value, count)| format!("{} ({}x)", value, count))
        .collect::<Vec<_>>()
        .join(", ")
}

fn truncate_selector(selector: &str) -> String {
    let mut short: String = selector.chars().take(60).collect();
    if short.chars().count() < selector.chars().count() {
        short.push_str("...");
    }
    short
}

fn pass_fail(passed: bool, colorize: bool) -> String {
    if passed {
        color("pass", "32", colorize)
    } else {
        color("fail", "31", colorize)
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Determine exit code for the contrast command.
pub fn exit_code_for_contrast(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
