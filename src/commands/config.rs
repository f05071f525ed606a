use std::path::{Path, PathBuf};
use std::process::ExitCode;

use psa_lib::config::AnalyzerConfig;
use psa_lib::PsaError;

use crate::cli::OutputFormat;
use crate::formatting::render_error;
use crate::settings::load_config;

/// Run the config command: print the effective configuration as TOML,
/// prefixed with a comment naming where it came from.
pub async fn run_config(config_path: Option<PathBuf>) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, OutputFormat::Json, None),
    };

    match describe_provenance(config_path.as_deref()) {
        Some(origin) => println!("# loaded from {origin}"),
        None => println!("# built-in defaults (no config file found)"),
    }

    match toml::to_string_pretty(&config) {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(err) => render_error(
            PsaError::Config(format!("failed to render config: {err}")),
            OutputFormat::Json,
            None,
        ),
    }
}

fn describe_provenance(explicit: Option<&Path>) -> Option<String> {
    if let Some(path) = explicit {
        return Some(path.display().to_string());
    }
    AnalyzerConfig::central_config_path()
        .filter(|path| path.exists())
        .map(|path| path.display().to_string())
}
