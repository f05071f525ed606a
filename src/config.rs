use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PsaError, Result};

/// Analyzer configuration: every option the pipeline recognizes, in one
/// object. Loaded from TOML and merged with CLI flags in `settings.rs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    pub fetch: FetchConfig,
    pub keywords: KeywordConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Per-request timeout, humantime syntax in TOML (e.g. `"10s"`).
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub user_agent: String,
    /// Cap on external stylesheet fetches per page.
    pub max_stylesheets: usize,
    /// Whether `<link rel="stylesheet">` / `@import` references are fetched.
    pub fetch_external: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: format!("psa/{}", env!("CARGO_PKG_VERSION")),
            max_stylesheets: 20,
            fetch_external: true,
        }
    }
}

/// Keyword sets driving the categorizer's rule table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeywordConfig {
    pub success: Vec<String>,
    pub error: Vec<String>,
    pub warning: Vec<String>,
    pub info: Vec<String>,
    pub interactive: Vec<String>,
    pub border: Vec<String>,
    pub background: Vec<String>,
    pub text: Vec<String>,
    /// Property names that count as text color when matched exactly.
    pub text_color_properties: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            success: words(&["success", "positive", "green", "valid"]),
            error: words(&["error", "danger", "red", "invalid", "alert"]),
            warning: words(&["warning", "caution", "yellow", "orange"]),
            info: words(&["info", "information", "blue", "notice"]),
            interactive: words(&["button", "link", "input", "focus", "hover", "active"]),
            border: words(&["border", "outline", "divider", "separator"]),
            background: words(&["background", "bg", "surface", "card", "modal"]),
            text: words(&["text", "font", "heading", "paragraph"]),
            text_color_properties: words(&["color"]),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a TOML file.
    /// Priority: explicit path > ~/.config/psa/config.toml > defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let candidate = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::central_config_path().filter(|p| p.exists()),
        };
        match candidate {
            Some(p) => {
                let text = fs::read_to_string(&p)?;
                let cfg: AnalyzerConfig = toml::from_str(&text)?;
                Ok(cfg)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn central_config_path() -> Option<PathBuf> {
        env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("psa")
                .join("config.toml")
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch.timeout.is_zero() {
            return Err(PsaError::Config(
                "fetch.timeout must be greater than zero".to_string(),
            ));
        }
        if self.fetch.max_stylesheets == 0 {
            return Err(PsaError::Config(
                "fetch.max_stylesheets must be at least 1".to_string(),
            ));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(PsaError::Config(
                "fetch.user_agent must not be empty".to_string(),
            ));
        }
        let keyword_lists: [(&str, &[String]); 8] = [
            ("success", &self.keywords.success),
            ("error", &self.keywords.error),
            ("warning", &self.keywords.warning),
            ("info", &self.keywords.info),
            ("interactive", &self.keywords.interactive),
            ("border", &self.keywords.border),
            ("background", &self.keywords.background),
            ("text", &self.keywords.text),
        ];
        for (name, list) in keyword_lists {
            if list.is_empty() {
                return Err(PsaError::Config(format!(
                    "keywords.{} must not be empty",
                    name
                )));
            }
        }
        if self.keywords.text_color_properties.is_empty() {
            return Err(PsaError::Config(
                "keywords.text_color_properties must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_values_match_expected() {
        let cfg = AnalyzerConfig::default();

        assert_eq!(cfg.fetch.timeout, Duration::from_secs(10));
        assert_eq!(cfg.fetch.max_stylesheets, 20);
        assert!(cfg.fetch.fetch_external);
        assert!(cfg.fetch.user_agent.starts_with("psa/"));
        assert!(cfg.keywords.success.contains(&"valid".to_string()));
        assert!(cfg.keywords.border.contains(&"divider".to_string()));
        assert_eq!(cfg.keywords.text_color_properties, vec!["color"]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn load_parses_toml_overrides() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[fetch]
timeout = "30s"
max_stylesheets = 5

[keywords]
interactive = ["btn", "cta"]
"#
        )
        .unwrap();

        let cfg = AnalyzerConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.fetch.timeout, Duration::from_secs(30));
        assert_eq!(cfg.fetch.max_stylesheets, 5);
        assert_eq!(cfg.keywords.interactive, vec!["btn", "cta"]);
        // Untouched sections keep their defaults.
        assert!(cfg.fetch.fetch_external);
        assert!(cfg.keywords.border.contains(&"outline".to_string()));
    }

    #[test]
    fn load_rejects_unknown_fields() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[fetch]\nretries = 3").unwrap();

        assert!(AnalyzerConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout_and_empty_lists() {
        let mut cfg = AnalyzerConfig::default();
        cfg.fetch.timeout = Duration::ZERO;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalyzerConfig::default();
        cfg.fetch.max_stylesheets = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalyzerConfig::default();
        cfg.keywords.warning.clear();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("keywords.warning"));

        let mut cfg = AnalyzerConfig::default();
        cfg.keywords.text_color_properties.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn central_config_path_lives_under_home() {
        if let Some(path) = AnalyzerConfig::central_config_path() {
            assert!(path.ends_with(".config/psa/config.toml"));
        }
    }
}
