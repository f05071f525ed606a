//! Page Style Audit (PSA) Library
//!
//! A library for extracting and semantically classifying the colors and
//! typography a webpage actually uses. Styling is collected from inline
//! `style` attributes, `<style>` blocks, and same-origin external stylesheets,
//! normalized to canonical forms, and aggregated into a deduplicated report
//! suitable for design-system audits and accessibility checks.
//!
//! # Module Overview
//!
//! - [`source`] - Source classification (URL vs local HTML file)
//! - [`fetch`] - Page and stylesheet fetching
//! - [`html`] - HTML document scanning (inline styles, style blocks, links)
//! - [`cssrules`] - CSS rule scanning into declaration records
//! - [`analysis`] - Color normalization, variables, categorization, contrast, fonts
//! - [`config`] - Configuration file support
//! - [`types`] - Core data types and structures
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use psa_lib::{Analyzer, AnalyzerConfig, PageFetcher, Source};
//! use url::Url;
//!
//! # async fn example() -> psa_lib::Result<()> {
//! let config = AnalyzerConfig::default();
//! let fetcher = PageFetcher::new(config.fetch.clone())?;
//!
//! let url: Url = "https://example.com".parse()?;
//! let source = Source::Url(url);
//! let markup = fetcher.load_document(&source).await?;
//!
//! let scan = psa_lib::html::scan_document(&markup);
//! let analysis = Analyzer::new(config).analyze(&source.label(), &scan.declarations);
//! println!("{} unique colors", analysis.result.summary.total_unique_colors);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod cssrules;
pub mod error;
pub mod fetch;
pub mod html;
pub mod output;
pub mod progress;
pub mod source;
pub mod types;

// Analysis module re-exports
pub use analysis::{Analysis, Analyzer, Categorizer, ContrastVerdict, StyleCollector};
pub use config::{AnalyzerConfig, FetchConfig, KeywordConfig};
pub use cssrules::{scan_stylesheet, RuleScan};
pub use error::{ErrorCategory, ErrorPayload, ParseIssue, PsaError, Result};
pub use fetch::PageFetcher;
pub use html::{scan_document, DocumentScan};
pub use output::{
    AnalyzeOutput, ContrastOutput, ErrorOutput, PsaOutput, PSA_OUTPUT_VERSION,
};
pub use progress::ProgressCallback;
pub use source::{parse_source, Source, SourceParseError};
pub use types::{
    AnalysisResult, CategorizedColor, ColorEntry, ContrastContext, Declaration, ExtractionStats,
    FontEntry, SourceKind, Summary,
};
