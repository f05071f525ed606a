use std::process::ExitCode;

use psa_lib::analysis::color::{parse_color, to_hex};
use psa_lib::analysis::contrast::contrast_ratio;
use psa_lib::output::PSA_OUTPUT_VERSION;
use psa_lib::{ContrastOutput, ContrastVerdict, PsaError, PsaOutput};

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for_contrast, render_error, write_output};

/// Run the contrast command.
pub async fn run_contrast(
    verbose: bool,
    foreground: String,
    background: String,
    min_ratio: Option<f64>,
    format: OutputFormat,
) -> ExitCode {
    let fg = match parse_color(&foreground) {
        Ok(rgb) => rgb,
        Err(issue) => {
            return render_error(PsaError::Config(format!("foreground: {issue}")), format, None)
        }
    };
    let bg = match parse_color(&background) {
        Ok(rgb) => rgb,
        Err(issue) => {
            return render_error(PsaError::Config(format!("background: {issue}")), format, None)
        }
    };

    let ratio = contrast_ratio(fg, bg);
    let passed = min_ratio.map(|min| ratio >= min);

    if verbose {
        eprintln!("contrast {} on {} = {ratio:.4}", to_hex(fg), to_hex(bg));
    }

    let body = PsaOutput::Contrast(ContrastOutput {
        version: PSA_OUTPUT_VERSION.to_string(),
        foreground: to_hex(fg),
        background: to_hex(bg),
        verdict: ContrastVerdict::for_ratio(ratio),
        min_ratio,
        passed,
    });
    if let Err(err) = write_output(&body, format, None) {
        return render_error(PsaError::Config(err.to_string()), format, None);
    }
    exit_code_for_contrast(passed.unwrap_or(true))
}
