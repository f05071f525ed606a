//! Analyze-target classification: web URL or local HTML file.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

/// A classified analyze target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Remote page, fetched over HTTP(S).
    Url(Url),
    /// Local HTML file. There is no base origin, so its external stylesheet
    /// references are skipped.
    File(PathBuf),
}

impl Source {
    /// Display form, used as the `url` field of the report.
    pub fn label(&self) -> String {
        match self {
            Source::Url(url) => url.to_string(),
            Source::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceParseError {
    #[error("Invalid URL '{value}': {message}. Hint: include http(s):// and ensure the URL is well-formed.")]
    InvalidUrl { value: String, message: String },
    #[error("Local file not found: {path}. Hint: check the path relative to the current working directory or use an absolute path.")]
    FileNotFound { path: String },
    #[error("Unsupported file extension '{extension}'. Supported extensions: {supported}.")]
    UnsupportedExtension {
        extension: String,
        supported: String,
    },
}

const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Classifies the analyze argument.
///
/// Values with an explicit scheme are URLs. Values with an `.html`/`.htm`
/// extension are local files and must exist. Anything else that exists on
/// disk has the wrong extension; the rest is taken for a bare domain and
/// gets an `https://` prefix, so `example.com` works the way people type it.
pub fn parse_source(value: &str) -> Result<Source, SourceParseError> {
    let trimmed = value.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return parse_url_source(trimmed);
    }

    let path = Path::new(trimmed);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if HTML_EXTENSIONS.contains(&extension.as_str()) {
        return parse_file_source(path);
    }
    if path.exists() {
        return Err(SourceParseError::UnsupportedExtension {
            extension: if extension.is_empty() {
                "no extension".to_string()
            } else {
                extension
            },
            supported: HTML_EXTENSIONS.join(", "),
        });
    }

    parse_url_source(&format!("https://{trimmed}"))
}

fn parse_url_source(value: &str) -> Result<Source, SourceParseError> {
    let url = Url::parse(value).map_err(|e| SourceParseError::InvalidUrl {
        value: value.to_string(),
        message: e.to_string(),
    })?;
    Ok(Source::Url(url))
}

fn parse_file_source(path: &Path) -> Result<Source, SourceParseError> {
    let missing = || SourceParseError::FileNotFound {
        path: path.to_string_lossy().into_owned(),
    };
    let metadata = fs::metadata(path).map_err(|_| missing())?;
    if !metadata.is_file() {
        return Err(missing());
    }
    Ok(Source::File(path.to_path_buf()))
}
