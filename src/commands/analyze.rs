use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use psa_lib::output::PSA_OUTPUT_VERSION;
use psa_lib::types::SourceKind;
use psa_lib::{
    cssrules, html, parse_source, AnalyzeOutput, Analyzer, PageFetcher, ProgressCallback,
    PsaError, PsaOutput, Source,
};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::{
    format_effective_config, load_config, resolve_analyze_settings, AnalyzeFlagSources,
};

/// Run the analyze command.
#[allow(clippy::too_many_arguments)]
pub async fn run_analyze(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    verbose: bool,
    source: String,
    output: Option<PathBuf>,
    format: OutputFormat,
    timeout: u64,
    max_stylesheets: usize,
    no_external_css: bool,
    user_agent: Option<String>,
    quiet: bool,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let flag_sources = AnalyzeFlagSources::from_args(raw_args);
    let resolved = resolve_analyze_settings(
        Duration::from_secs(timeout),
        max_stylesheets,
        user_agent,
        no_external_css,
        &config,
        &flag_sources,
    );

    if verbose {
        eprintln!(
            "{}",
            format_effective_config(&resolved, &config.keywords, config_path.as_deref())
        );
    }

    let source = match parse_source(&source) {
        Ok(source) => source,
        Err(err) => {
            return render_error(PsaError::source(err.to_string()), format, output.clone())
        }
    };

    let progress: Option<ProgressCallback> = if verbose {
        Some(Arc::new(|msg: &str| eprintln!("{msg}")))
    } else {
        None
    };

    let mut fetcher = match PageFetcher::new(resolved.fetch_config()) {
        Ok(fetcher) => fetcher,
        Err(err) => return render_error(err, format, output.clone()),
    };
    if let Some(progress) = progress.clone() {
        fetcher = fetcher.with_progress(progress);
    }

    let markup = match fetcher.load_document(&source).await {
        Ok(text) => text,
        Err(err) => return render_error(err, format, output.clone()),
    };

    if verbose {
        eprintln!("Scanning document markup\u{2026}");
    }
    let mut scan = html::scan_document(&markup);

    // External stylesheets only make sense for URL sources; a local file has
    // no origin to resolve them against.
    let mut source_count: u64 = 1;
    if resolved.fetch_external {
        if let Source::Url(base) = &source {
            let sheets = fetcher.fetch_stylesheets(base, &scan.stylesheet_refs).await;
            source_count += sheets.len() as u64;
            for (_, body) in &sheets {
                let rules = cssrules::scan_stylesheet(body, SourceKind::ExternalStylesheet);
                scan.declarations.extend(rules.declarations);
                scan.issues.extend(rules.issues);
            }
        }
    }

    if scan.declarations.is_empty() {
        return render_error(
            PsaError::EmptyDocument(source.label()),
            format,
            output.clone(),
        );
    }

    if let Some(callback) = &progress {
        for issue in &scan.issues {
            callback(&issue.to_string());
        }
    }

    let mut analyzer = Analyzer::new(config);
    if let Some(progress) = progress {
        analyzer = analyzer.with_progress(progress);
    }
    let mut analysis = analyzer.analyze(&source.label(), &scan.declarations);
    analysis.stats.sources = source_count;
    analysis.stats.malformed_declarations += scan.issues.len() as u64;

    let body = PsaOutput::Analyze(AnalyzeOutput {
        version: PSA_OUTPUT_VERSION.to_string(),
        result: analysis.result,
        stats: analysis.stats,
    });

    if quiet && output.is_none() {
        return ExitCode::SUCCESS;
    }
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(PsaError::Config(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
