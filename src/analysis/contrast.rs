//! WCAG relative luminance and contrast ratio.

use palette::Srgb;
use serde::{Deserialize, Serialize};

use super::color::rgb_from_hex;

/// Relative luminance of an sRGB color, per the WCAG formula.
///
/// Channels are companded to linear light (threshold 0.03928, gamma 2.4),
/// then weighted 0.2126/0.7152/0.0722.
pub fn relative_luminance(rgb: Srgb<u8>) -> f64 {
    let r = linearize(rgb.red);
    let g = linearize(rgb.green);
    let b = linearize(rgb.blue);
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

fn linearize(channel: u8) -> f64 {
    let v = channel as f64 / 255.0;
    if v <= 0.03928 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Contrast ratio between two colors, in [1.0, 21.0]. Symmetric.
pub fn contrast_ratio(a: Srgb<u8>, b: Srgb<u8>) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Contrast ratio between two normalized `#rrggbb` strings.
pub fn contrast_between(hex_a: &str, hex_b: &str) -> Option<f64> {
    Some(contrast_ratio(rgb_from_hex(hex_a)?, rgb_from_hex(hex_b)?))
}

/// WCAG 2.x pass/fail verdicts for a ratio.
///
/// AA requires 4.5:1 for normal text and 3:1 for large text; AAA requires
/// 7:1 and 4.5:1 respectively.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastVerdict {
    pub ratio: f64,
    pub aa_normal: bool,
    pub aa_large: bool,
    pub aaa_normal: bool,
    pub aaa_large: bool,
}

impl ContrastVerdict {
    pub fn for_ratio(ratio: f64) -> Self {
        Self {
            ratio,
            aa_normal: ratio >= 4.5,
            aa_large: ratio >= 3.0,
            aaa_normal: ratio >= 7.0,
            aaa_large: ratio >= 4.5,
        }
    }
}
