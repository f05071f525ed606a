use serde::{Deserialize, Serialize};

use crate::analysis::ContrastVerdict;
use crate::error::ErrorPayload;
use crate::types::{AnalysisResult, ExtractionStats};

/// Schema version for output payloads.
pub const PSA_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum PsaOutput {
    Analyze(AnalyzeOutput),
    Contrast(ContrastOutput),
    Error(ErrorOutput),
}

/// Analyze envelope. The report fields sit at the top level, next to
/// `mode`, `version` and `stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeOutput {
    pub version: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub stats: ExtractionStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastOutput {
    pub version: String,
    /// Normalized foreground hex.
    pub foreground: String,
    /// Normalized background hex.
    pub background: String,
    #[serde(flatten)]
    pub verdict: ContrastVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(flatten)]
    pub error: ErrorPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCategory, PsaError};
    use crate::types::Summary;
    use std::collections::BTreeMap;

    fn empty_result(url: &str) -> AnalysisResult {
        AnalysisResult {
            url: url.to_string(),
            summary: Summary {
                total_unique_colors: 0,
                total_unique_fonts: 0,
                total_css_variables: 0,
                colors_by_category: BTreeMap::new(),
            },
            colors: BTreeMap::new(),
            colors_by_category: BTreeMap::new(),
            fonts: BTreeMap::new(),
            css_variables: BTreeMap::new(),
        }
    }

    #[test]
    fn analyze_output_flattens_the_report_next_to_the_envelope() {
        let output = PsaOutput::Analyze(AnalyzeOutput {
            version: PSA_OUTPUT_VERSION.to_string(),
            result: empty_result("https://example.com/"),
            stats: ExtractionStats::default(),
        });

        let value = serde_json::to_value(&output).expect("serialize analyze output");
        assert_eq!(value["mode"], "analyze");
        assert_eq!(value["version"], PSA_OUTPUT_VERSION);
        assert_eq!(value["url"], "https://example.com/");
        assert_eq!(value["summary"]["total_unique_colors"], 0);
        assert_eq!(value["stats"]["declarations"], 0);
    }

    #[test]
    fn contrast_output_reports_verdicts_and_the_threshold_check() {
        let output = PsaOutput::Contrast(ContrastOutput {
            version: PSA_OUTPUT_VERSION.to_string(),
            foreground: "#000000".to_string(),
            background: "#ffffff".to_string(),
            verdict: ContrastVerdict::for_ratio(21.0),
            min_ratio: Some(4.5),
            passed: Some(true),
        });

        let value = serde_json::to_value(&output).expect("serialize contrast output");
        assert_eq!(value["mode"], "contrast");
        assert_eq!(value["ratio"], 21.0);
        assert_eq!(value["aaNormal"], true);
        assert_eq!(value["minRatio"], 4.5);
        assert_eq!(value["passed"], true);
    }

    #[test]
    fn contrast_output_omits_the_threshold_when_not_requested() {
        let output = PsaOutput::Contrast(ContrastOutput {
            version: PSA_OUTPUT_VERSION.to_string(),
            foreground: "#336699".to_string(),
            background: "#ffffff".to_string(),
            verdict: ContrastVerdict::for_ratio(5.0),
            min_ratio: None,
            passed: None,
        });

        let json = serde_json::to_string(&output).expect("serialize contrast output");
        assert!(!json.contains("minRatio"));
        assert!(!json.contains("passed"));
    }

    #[test]
    fn error_output_flattens_the_payload() {
        let payload = PsaError::Source("Local file not found: x.html".to_string()).to_payload();
        let output = PsaOutput::Error(ErrorOutput {
            version: PSA_OUTPUT_VERSION.to_string(),
            error: payload,
        });

        let value = serde_json::to_value(&output).expect("serialize error output");
        assert_eq!(value["mode"], "error");
        assert_eq!(
            value["category"],
            serde_json::to_value(ErrorCategory::Source).unwrap()
        );
        assert!(value["message"]
            .as_str()
            .unwrap_or_default()
            .contains("x.html"));
        assert!(value["remediation"].is_string());
    }

    #[test]
    fn analyze_output_round_trips() {
        let output = PsaOutput::Analyze(AnalyzeOutput {
            version: PSA_OUTPUT_VERSION.to_string(),
            result: empty_result("page.html"),
            stats: ExtractionStats::default(),
        });
        let json = serde_json::to_string(&output).expect("serialize");
        let back: PsaOutput = serde_json::from_str(&json).expect("deserialize");
        let PsaOutput::Analyze(parsed) = back else {
            panic!("expected analyze mode");
        };
        assert_eq!(parsed.result.url, "page.html");
    }
}
