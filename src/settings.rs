use std::path::Path;
use std::time::Duration;

use psa_lib::config::{AnalyzerConfig, FetchConfig, KeywordConfig};
use psa_lib::PsaError;

/// Tracks which CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct AnalyzeFlagSources {
    pub timeout: bool,
    pub max_stylesheets: bool,
}

impl AnalyzeFlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            timeout: flag_present(args, "--timeout") || flag_present(args, "-t"),
            max_stylesheets: flag_present(args, "--max-stylesheets"),
        }
    }
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Resolved fetch settings after merging CLI args and config file.
#[derive(Debug, Clone)]
pub struct ResolvedAnalyzeSettings {
    pub timeout: Duration,
    pub max_stylesheets: usize,
    pub user_agent: String,
    pub fetch_external: bool,
}

impl ResolvedAnalyzeSettings {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: self.timeout,
            user_agent: self.user_agent.clone(),
            max_stylesheets: self.max_stylesheets,
            fetch_external: self.fetch_external,
        }
    }
}

/// Merge CLI arguments with config file, preferring CLI when flags are present.
pub fn resolve_analyze_settings(
    cli_timeout: Duration,
    cli_max_stylesheets: usize,
    cli_user_agent: Option<String>,
    cli_no_external_css: bool,
    config: &AnalyzerConfig,
    flags: &AnalyzeFlagSources,
) -> ResolvedAnalyzeSettings {
    ResolvedAnalyzeSettings {
        timeout: if flags.timeout {
            cli_timeout
        } else {
            config.fetch.timeout
        },
        max_stylesheets: if flags.max_stylesheets {
            cli_max_stylesheets
        } else {
            config.fetch.max_stylesheets
        },
        user_agent: cli_user_agent.unwrap_or_else(|| config.fetch.user_agent.clone()),
        fetch_external: if cli_no_external_css {
            false
        } else {
            config.fetch.fetch_external
        },
    }
}

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/psa/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig, PsaError> {
    let cfg = AnalyzerConfig::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| AnalyzerConfig::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        PsaError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        PsaError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(
    settings: &ResolvedAnalyzeSettings,
    keywords: &KeywordConfig,
    config_source: Option<&Path>,
) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    format!(
        "Effective config [{source}]: timeout={:?}, max-stylesheets={}, external-css={}, user-agent={}, keywords: success={}, error={}, warning={}, info={}, interactive={}, border={}, background={}, text={}",
        settings.timeout,
        settings.max_stylesheets,
        settings.fetch_external,
        settings.user_agent,
        keywords.success.len(),
        keywords.error.len(),
        keywords.warning.len(),
        keywords.info.len(),
        keywords.interactive.len(),
        keywords.border.len(),
        keywords.background.len(),
        keywords.text.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_analyze_settings_prefers_config_when_flags_absent() {
        let mut cfg = AnalyzerConfig::default();
        cfg.fetch.timeout = Duration::from_secs(25);
        cfg.fetch.max_stylesheets = 7;
        cfg.fetch.user_agent = "configured-agent".to_string();
        let flags = AnalyzeFlagSources::default();

        let resolved = resolve_analyze_settings(
            Duration::from_secs(10),
            20,
            None,
            false,
            &cfg,
            &flags,
        );

        assert_eq!(resolved.timeout, Duration::from_secs(25));
        assert_eq!(resolved.max_stylesheets, 7);
        assert_eq!(resolved.user_agent, "configured-agent");
        assert!(resolved.fetch_external);
    }

    #[test]
    fn resolve_analyze_settings_prefers_cli_when_flags_present() {
        let cfg = AnalyzerConfig::default();
        let flags = AnalyzeFlagSources {
            timeout: true,
            max_stylesheets: true,
        };

        let resolved = resolve_analyze_settings(
            Duration::from_secs(3),
            2,
            Some("cli-agent".to_string()),
            true,
            &cfg,
            &flags,
        );

        assert_eq!(resolved.timeout, Duration::from_secs(3));
        assert_eq!(resolved.max_stylesheets, 2);
        assert_eq!(resolved.user_agent, "cli-agent");
        assert!(!resolved.fetch_external);
    }

    #[test]
    fn no_external_css_overrides_an_enabling_config() {
        let cfg = AnalyzerConfig::default();
        assert!(cfg.fetch.fetch_external);
        let resolved = resolve_analyze_settings(
            Duration::from_secs(10),
            20,
            None,
            true,
            &cfg,
            &AnalyzeFlagSources::default(),
        );
        assert!(!resolved.fetch_external);
    }

    #[test]
    fn flag_present_detects_both_spellings() {
        let args: Vec<String> = ["psa", "analyze", "--timeout=30", "x.html"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(flag_present(&args, "--timeout"));
        assert!(!flag_present(&args, "--max-stylesheets"));

        let sources = AnalyzeFlagSources::from_args(&args);
        assert!(sources.timeout);
        assert!(!sources.max_stylesheets);
    }

    #[test]
    fn load_config_names_the_failing_path() {
        let err = load_config(Some(Path::new("/no/such/psa.toml"))).unwrap_err();
        assert!(err.to_string().contains("/no/such/psa.toml"));
    }

    #[test]
    fn format_effective_config_includes_all_fields() {
        let settings = ResolvedAnalyzeSettings {
            timeout: Duration::from_secs(12),
            max_stylesheets: 5,
            user_agent: "psa/test".to_string(),
            fetch_external: true,
        };
        let summary = format_effective_config(
            &settings,
            &KeywordConfig::default(),
            Some(Path::new("psa.toml")),
        );
        assert!(summary.contains("psa.toml"));
        assert!(summary.contains("timeout=12s"));
        assert!(summary.contains("max-stylesheets=5"));
        assert!(summary.contains("external-css=true"));
        assert!(summary.contains("user-agent=psa/test"));
        assert!(summary.contains("interactive=6"));
    }
}
