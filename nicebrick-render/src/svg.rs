//! Default SVG BearBrick renderer.

use nicebrick_core::{RenderError, SubjectId};

use crate::renderer::{BearBrickOptions, BearBrickRenderer};

const FONT: &str = "'Space Grotesk', 'Inter', sans-serif";

/// Escape text for use in XML character data and attribute values.
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Two-letter badge text: first letters of the first two words of the
/// display name, username or `FID n`, uppercased and padded with `B`.
pub fn initials(options: &BearBrickOptions) -> String {
    let label = options
        .display_name()
        .or(options.username())
        .map(str::to_string)
        .unwrap_or_else(|| format!("FID {}", options.subject_id));

    let mut initials: String = label
        .split(' ')
        .filter(|word| !word.is_empty())
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();

    while initials.chars().count() < 2 {
        initials.push('B');
    }
    initials
}

/// The built-in 360x420 BearBrick preview.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgBearBrickRenderer;

impl SvgBearBrickRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl BearBrickRenderer for SvgBearBrickRenderer {
    fn render(&self, options: &BearBrickOptions) -> Result<String, RenderError> {
        let primary = options.primary_color.as_str();
        let secondary = options.secondary_color.as_str();
        let fid_text = format!("FID {}", options.subject_id);
        let subtitle = escape_xml(
            options
                .username()
                .or(options.display_name())
                .unwrap_or("Farcaster"),
        );
        let initials = escape_xml(&initials(options));

        tracing::trace!(subject_id = %options.subject_id, "Rendering BearBrick SVG");

        Ok(format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg width="360" height="420" viewBox="0 0 360 420" xmlns="http://www.w3.org/2000/svg" role="img" aria-labelledby="bearbrickTitle bearbrickSubtitle">
  <title id="bearbrickTitle">BearBrick preview</title>
  <desc id="bearbrickSubtitle">Personalised BearBrick generated for {subtitle} ({fid_text}).</desc>
  <defs>
    <linearGradient id="bearGradient" x1="0" y1="0" x2="1" y2="1">
      <stop offset="0%" stop-color="{primary}" />
      <stop offset="100%" stop-color="{secondary}" />
    </linearGradient>
  </defs>
  <rect x="0" y="0" width="360" height="420" rx="42" fill="rgba(12, 10, 25, 0.82)" />
  <rect x="18" y="18" width="324" height="384" rx="36" fill="rgba(22, 18, 48, 0.75)" stroke="rgba(255, 255, 255, 0.08)" />
  <g transform="translate(80, 60)">
    <ellipse cx="50" cy="38" rx="38" ry="40" fill="{secondary}" opacity="0.85" />
    <ellipse cx="150" cy="38" rx="38" ry="40" fill="{secondary}" opacity="0.85" />
    <path d="M40 90C40 58 66 32 98 32H102C134 32 160 58 160 90V210C160 238 138 260 110 260H90C62 260 40 238 40 210V90Z" fill="url(#bearGradient)" />
    <ellipse cx="80" cy="118" rx="18" ry="22" fill="#fff" opacity="0.92" />
    <ellipse cx="120" cy="118" rx="18" ry="22" fill="#fff" opacity="0.92" />
    <circle cx="80" cy="118" r="7" fill="#1b133f" />
    <circle cx="120" cy="118" r="7" fill="#1b133f" />
    <ellipse cx="100" cy="148" rx="30" ry="24" fill="#fdf6ff" opacity="0.95" />
    <circle cx="100" cy="146" r="8" fill="#1b133f" />
    <path d="M78 174C82 184 90 190 100 190C110 190 118 184 122 174" stroke="#1b133f" stroke-width="6" stroke-linecap="round" />
  </g>
  <text x="180" y="332" text-anchor="middle" font-family="{FONT}" font-size="22" fill="#f7f7ff" font-weight="600">{fid_text}</text>
  <text x="180" y="360" text-anchor="middle" font-family="{FONT}" font-size="16" fill="rgba(247,247,255,0.72)">{subtitle}</text>
  <g transform="translate(140, 260)">
    <circle cx="40" cy="40" r="36" fill="rgba(0,0,0,0.25)" />
    <circle cx="40" cy="40" r="32" fill="rgba(255,255,255,0.08)" stroke="rgba(255,255,255,0.22)" />
    <text x="40" y="48" text-anchor="middle" font-family="{FONT}" font-size="26" fill="#f7f7ff" font-weight="600">{initials}</text>
  </g>
</svg>"##
        ))
    }

    fn name(&self) -> &'static str {
        "svg"
    }
}

/// Neutral image served when no renderer is configured.
pub fn placeholder_svg(subject_id: SubjectId) -> String {
    format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg width="360" height="420" viewBox="0 0 360 420" xmlns="http://www.w3.org/2000/svg" role="img">
  <title>BearBrick preview unavailable</title>
  <rect x="0" y="0" width="360" height="420" rx="42" fill="#16122f" />
  <text x="180" y="200" text-anchor="middle" font-family="{FONT}" font-size="22" fill="#f7f7ff" font-weight="600">FID {subject_id}</text>
  <text x="180" y="232" text-anchor="middle" font-family="{FONT}" font-size="14" fill="rgba(247,247,255,0.6)">Preview unavailable</text>
</svg>"##
    )
}
