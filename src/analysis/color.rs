//! Color value normalization.
//!
//! Every supported syntax (hex in 3/4/6/8-digit forms, `rgb()`/`rgba()`,
//! `hsl()`/`hsla()`, named colors) collapses to a canonical lowercase
//! 6-digit hex string. Alpha channels are parsed so the syntax validates,
//! then discarded: `rgba(255,0,0,0.5)` and `red` are the same color here.

use palette::Srgb;

use crate::error::ParseIssue;

/// Normalize a raw color string to canonical `#rrggbb` form.
pub fn normalize_color(raw: &str) -> Result<String, ParseIssue> {
    parse_color(raw).map(to_hex)
}

/// Parse a raw color string into 8-bit sRGB channels.
pub fn parse_color(raw: &str) -> Result<Srgb<u8>, ParseIssue> {
    let value = raw.trim().to_ascii_lowercase();
    if value.is_empty() {
        return Err(ParseIssue::invalid_color(raw));
    }

    if let Some(rest) = function_args(&value, &["rgba", "rgb"]) {
        return parse_rgb_function(rest).ok_or_else(|| ParseIssue::invalid_color(raw));
    }
    if let Some(rest) = function_args(&value, &["hsla", "hsl"]) {
        return parse_hsl_function(rest).ok_or_else(|| ParseIssue::invalid_color(raw));
    }
    if value.starts_with('#') || value.chars().all(|c| c.is_ascii_hexdigit()) {
        if let Some(rgb) = parse_hex(&value) {
            return Ok(rgb);
        }
        // A bare token like "abc" is valid hex but could also be a name;
        // fall through to the named table before giving up.
    }
    named_color(&value).ok_or_else(|| ParseIssue::invalid_color(raw))
}

/// Look up a CSS color keyword. Quiet: a miss means "not a color", not an
/// error, so identifier scanning can probe freely.
pub fn named_color(name: &str) -> Option<Srgb<u8>> {
    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let lower = name.to_ascii_lowercase();
    // palette's table is the SVG 1.1 keyword list; rebeccapurple came later.
    if lower == "rebeccapurple" {
        return Some(Srgb::new(102, 51, 153));
    }
    palette::named::from_str(&lower)
}

/// Format 8-bit channels as lowercase `#rrggbb`.
pub fn to_hex(rgb: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

/// Parse an already-normalized `#rrggbb` string back into channels.
pub fn rgb_from_hex(hex: &str) -> Option<Srgb<u8>> {
    parse_hex(hex.trim())
}

fn parse_hex(value: &str) -> Option<Srgb<u8>> {
    let digits = value.strip_prefix('#').unwrap_or(value);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    // 4- and 8-digit forms carry alpha in the trailing digit(s); drop it.
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        4 => digits[..3].chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        8 => digits[..6].to_string(),
        _ => return None,
    };

    let r = u8::from_str_radix(&expanded[0..2], 16).ok()?;
    let g = u8::from_str_radix(&expanded[2..4], 16).ok()?;
    let b = u8::from_str_radix(&expanded[4..6], 16).ok()?;
    Some(Srgb::new(r, g, b))
}

/// If `value` is `name(args)` for one of `names`, return the args slice.
fn function_args<'a>(value: &'a str, names: &[&str]) -> Option<&'a str> {
    for name in names {
        if let Some(rest) = value.strip_prefix(name) {
            let rest = rest.trim_start();
            if let Some(inner) = rest.strip_prefix('(') {
                return inner.trim_end().strip_suffix(')').map(str::trim);
            }
        }
    }
    None
}

/// Split function arguments: legacy comma syntax, or the whitespace syntax
/// with an optional `/ alpha` tail.
fn split_args(args: &str) -> (Vec<&str>, Option<&str>) {
    if args.contains(',') {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() == 4 {
            return (parts[..3].to_vec(), Some(parts[3]));
        }
        return (parts, None);
    }
    let (channels, alpha) = match args.split_once('/') {
        Some((left, right)) => (left, Some(right.trim())),
        None => (args, None),
    };
    (channels.split_whitespace().collect(), alpha)
}

fn parse_rgb_function(args: &str) -> Option<Srgb<u8>> {
    let (channels, alpha) = split_args(args);
    if channels.len() != 3 {
        return None;
    }
    if let Some(alpha) = alpha {
        parse_alpha(alpha)?;
    }
    let r = parse_rgb_channel(channels[0])?;
    let g = parse_rgb_channel(channels[1])?;
    let b = parse_rgb_channel(channels[2])?;
    Some(Srgb::new(r, g, b))
}

fn parse_rgb_channel(value: &str) -> Option<u8> {
    if let Some(pct) = value.strip_suffix('%') {
        let pct: f64 = pct.trim().parse().ok()?;
        if !pct.is_finite() {
            return None;
        }
        let pct = pct.clamp(0.0, 100.0);
        return Some((pct * 255.0 / 100.0).round() as u8);
    }
    let n: f64 = value.parse().ok()?;
    if !n.is_finite() {
        return None;
    }
    Some(n.clamp(0.0, 255.0).round() as u8)
}

fn parse_alpha(value: &str) -> Option<f64> {
    let (n, scale) = match value.strip_suffix('%') {
        Some(pct) => (pct.trim().parse::<f64>().ok()?, 100.0),
        None => (value.parse::<f64>().ok()?, 1.0),
    };
    if !n.is_finite() {
        return None;
    }
    Some((n / scale).clamp(0.0, 1.0))
}

fn parse_hsl_function(args: &str) -> Option<Srgb<u8>> {
    let (channels, alpha) = split_args(args);
    if channels.len() != 3 {
        return None;
    }
    if let Some(alpha) = alpha {
        parse_alpha(alpha)?;
    }

    let hue_text = channels[0].strip_suffix("deg").unwrap_or(channels[0]);
    let hue: f64 = hue_text.trim().parse().ok()?;
    if !hue.is_finite() {
        return None;
    }
    let h = hue.rem_euclid(360.0);
    let s = parse_percentage(channels[1])? / 100.0;
    let l = parse_percentage(channels[2])? / 100.0;

    Some(hsl_to_rgb(h, s, l))
}

fn parse_percentage(value: &str) -> Option<f64> {
    let n: f64 = value.strip_suffix('%').unwrap_or(value).trim().parse().ok()?;
    if !n.is_finite() {
        return None;
    }
    Some(n.clamp(0.0, 100.0))
}

/// Standard HSL→RGB transform: chroma, intermediate X, and match-lightness
/// offset chosen per 60° sextant of hue. `h` in [0,360), `s`/`l` in [0,1].
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Srgb<u8> {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r1, g1, b1) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Srgb::new(
        ((r1 + m) * 255.0).round() as u8,
        ((g1 + m) * 255.0).round() as u8,
        ((b1 + m) * 255.0).round() as u8,
    )
}
