use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum PsaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Fetch error (status: {status:?}): {message}")]
    Fetch {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid config file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("No declarations obtained from {0}")]
    EmptyDocument(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl PsaError {
    pub fn fetch(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        PsaError::Fetch {
            status,
            message: message.into(),
        }
    }

    pub fn source(message: impl Into<String>) -> Self {
        PsaError::Source(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            PsaError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            PsaError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and retry; increase --timeout for slow pages.",
            ),
            PsaError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Source,
                e.to_string(),
                "Verify URL/format (e.g., https://example.com).",
            ),
            PsaError::Fetch { status, message } => {
                let remediation = match status {
                    Some(s) if s.as_u16() == 404 => {
                        "The page was not found; verify the URL path."
                    }
                    Some(s) if s.as_u16() == 403 || s.as_u16() == 401 => {
                        "The server refused the request; the page may require authentication or block non-browser agents (try --user-agent)."
                    }
                    Some(s) if s.is_server_error() => {
                        "The server reported an error; retry later."
                    }
                    _ => "Check the URL and that the server returns an HTML page.",
                };
                ErrorPayload::new(
                    ErrorCategory::Network,
                    format!("Fetch error (status {:?}): {}", status, message),
                    remediation,
                )
            }
            PsaError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check JSON/serialization inputs; run with --verbose for details.",
            ),
            PsaError::Source(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("not found") {
                    ErrorPayload::new(
                        ErrorCategory::Source,
                        msg.to_string(),
                        "Verify the file exists; use an absolute path or run from the working directory.",
                    )
                } else if lower.contains("extension") {
                    ErrorPayload::new(
                        ErrorCategory::Source,
                        msg.to_string(),
                        "Use an http(s) URL or a local HTML file (.html, .htm).",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Source,
                        msg.to_string(),
                        "Pass a web URL (https://example.com) or a local HTML file path.",
                    )
                }
            }
            PsaError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("content-type") || lower.contains("content type") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "The URL did not return an HTML document; point psa at a page, not an asset or API endpoint.",
                    )
                } else if lower.contains("timeout") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Increase --timeout (or `timeout` in the config file) for slow pages.",
                    )
                } else if lower.contains("keyword") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Keyword lists in the config file must be non-empty; remove the override to fall back to defaults.",
                    )
                } else if lower.contains("color") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Pass colors as hex (#1a2b3c), rgb()/hsl() functions, or CSS color names.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths and the config file; run with --verbose for details.",
                    )
                }
            }
            PsaError::ConfigFile(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Fix the TOML syntax in the config file, or delete it to fall back to defaults.",
            ),
            PsaError::EmptyDocument(source) => ErrorPayload::new(
                ErrorCategory::Document,
                format!("No declarations obtained from {}", source),
                "The page yielded no styles at all; verify it is an HTML document and that stylesheets are reachable.",
            ),
            PsaError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, PsaError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Network,
    Source,
    Document,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

/// Locally recovered extraction failures.
///
/// None of these abort a run: the affected occurrence is dropped and the
/// issue is tallied into the run's stats. Fatal conditions use [`PsaError`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseIssue {
    #[error("invalid color value '{value}'")]
    InvalidColorValue { value: String },

    #[error("cyclic variable reference resolving '{name}' (path: {path})")]
    CyclicVariableReference { name: String, path: String },

    #[error("unresolved variable '{name}' (no fallback)")]
    UnresolvedVariable { name: String },

    #[error("malformed declaration '{segment}'")]
    MalformedDeclaration { segment: String },
}

impl ParseIssue {
    pub fn invalid_color(value: impl Into<String>) -> Self {
        ParseIssue::InvalidColorValue {
            value: value.into(),
        }
    }

    pub fn cycle(name: impl Into<String>, path: &[String]) -> Self {
        ParseIssue::CyclicVariableReference {
            name: name.into(),
            path: path.join(" -> "),
        }
    }

    pub fn unresolved(name: impl Into<String>) -> Self {
        ParseIssue::UnresolvedVariable { name: name.into() }
    }

    pub fn malformed(segment: &str) -> Self {
        // Echo at most 80 chars of the offending segment.
        let mut short: String = segment.trim().chars().take(80).collect();
        if short.len() < segment.trim().len() {
            short.push('…');
        }
        ParseIssue::MalformedDeclaration { segment: short }
    }
}
