//! Page and stylesheet fetching.

use std::fs;

use futures::future::join_all;
use reqwest::{header, Client};
use url::Url;

use crate::config::FetchConfig;
use crate::error::{PsaError, Result};
use crate::progress::ProgressCallback;
use crate::source::Source;

/// HTTP front end for the analyze pipeline.
pub struct PageFetcher {
    http: Client,
    config: FetchConfig,
    progress: Option<ProgressCallback>,
}

impl PageFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(PsaError::Network)?;
        Ok(Self {
            http,
            config,
            progress: None,
        })
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    fn report(&self, message: &str) {
        if let Some(callback) = &self.progress {
            callback(message);
        }
    }

    /// Document text for either source kind.
    pub async fn load_document(&self, source: &Source) -> Result<String> {
        match source {
            Source::Url(url) => self.fetch_document(url).await,
            Source::File(path) => {
                self.report(&format!("reading {}", path.display()));
                Ok(fs::read_to_string(path)?)
            }
        }
    }

    /// Fetches the page markup. A non-success status or a non-HTML
    /// `Content-Type` is fatal.
    pub async fn fetch_document(&self, url: &Url) -> Result<String> {
        self.report(&format!("fetching {url}"));
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(PsaError::Network)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PsaError::fetch(
                Some(status),
                format!("request for {url} failed: {}", snippet(&body)),
            ));
        }
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.contains("text/html") {
            return Err(PsaError::Config(format!(
                "{url} returned Content-Type '{content_type}', expected an HTML document"
            )));
        }
        response.text().await.map_err(PsaError::Network)
    }

    /// Resolves and fetches same-origin stylesheet references concurrently.
    /// Individual failures downgrade to a progress warning and are skipped.
    pub async fn fetch_stylesheets(&self, base: &Url, refs: &[String]) -> Vec<(Url, String)> {
        let urls = resolve_stylesheet_refs(base, refs, self.config.max_stylesheets);
        if urls.is_empty() {
            return Vec::new();
        }
        self.report(&format!(
            "fetching {} of {} stylesheet references",
            urls.len(),
            refs.len()
        ));
        let fetches = urls.iter().map(|url| self.fetch_stylesheet(url));
        let outcomes = join_all(fetches).await;

        let mut sheets = Vec::with_capacity(urls.len());
        for (url, outcome) in urls.into_iter().zip(outcomes) {
            match outcome {
                Ok(body) => sheets.push((url, body)),
                Err(err) => self.report(&format!("warning: skipping stylesheet {url}: {err}")),
            }
        }
        sheets
    }

    async fn fetch_stylesheet(&self, url: &Url) -> Result<String> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(PsaError::Network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(PsaError::fetch(
                Some(status),
                format!("stylesheet request for {url} failed"),
            ));
        }
        response.text().await.map_err(PsaError::Network)
    }
}

/// Joins stylesheet references against the document URL, keeping same-origin
/// targets only, deduplicated, capped at `max`.
pub(crate) fn resolve_stylesheet_refs(base: &Url, refs: &[String], max: usize) -> Vec<Url> {
    let mut resolved = Vec::new();
    for reference in refs {
        let Ok(target) = base.join(reference) else {
            continue;
        };
        if !same_origin(base, &target) || resolved.contains(&target) {
            continue;
        }
        resolved.push(target);
        if resolved.len() == max {
            break;
        }
    }
    resolved
}

fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    let mut short: String = trimmed.chars().take(200).collect();
    if short.len() < trimmed.len() {
        short.push('…');
    }
    short
}
