//! Share card for the daily wish.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::svg::escape_xml;

/// Characters of content shown on the card before truncation.
pub const SHARE_TEXT_LIMIT: usize = 50;

/// Inputs to a share card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareCard<'a> {
    pub content_text: &'a str,
    pub date_key: &'a str,
    pub username: Option<&'a str>,
}

/// Truncate to [`SHARE_TEXT_LIMIT`] characters, appending `...` when cut.
///
/// Counts Unicode scalar values, so text outside the Basic Multilingual
/// Plane keeps more visible characters than a UTF-16 length check would.
pub fn truncate_for_share(text: &str) -> String {
    if text.chars().count() > SHARE_TEXT_LIMIT {
        let head: String = text.chars().take(SHARE_TEXT_LIMIT).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

impl ShareCard<'_> {
    /// 800x600 SVG card.
    pub fn render(&self) -> String {
        let text = escape_xml(&truncate_for_share(self.content_text));
        let date = escape_xml(self.date_key);
        let byline = self
            .username
            .filter(|u| !u.trim().is_empty())
            .map(|u| {
                format!(
                    "\n  <text x=\"400\" y=\"510\" font-family=\"system-ui, sans-serif\" font-size=\"14\" fill=\"#888888\" font-style=\"italic\" text-anchor=\"middle\">@{}</text>",
                    escape_xml(u)
                )
            })
            .unwrap_or_default();

        format!(
            r##"<svg width="800" height="600" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="bg" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:#FFD700" />
      <stop offset="100%" style="stop-color:#FFA500" />
    </linearGradient>
  </defs>
  <rect width="800" height="600" fill="url(#bg)"/>
  <text x="400" y="100" font-family="system-ui, sans-serif" font-size="32" font-weight="bold" fill="#FF6B35" text-anchor="middle">Your Daily Wish</text>
  <rect x="150" y="150" width="500" height="200" rx="20" fill="rgba(255,255,255,0.9)" stroke="rgba(255,165,0,0.3)" stroke-width="2"/>
  <text x="400" y="220" font-family="system-ui, sans-serif" font-size="24" font-weight="600" fill="#333333" text-anchor="middle">"{text}"</text>
  <text x="400" y="450" font-family="system-ui, sans-serif" font-size="20" font-weight="bold" fill="#FF8C00" text-anchor="middle">nice</text>
  <text x="400" y="480" font-family="system-ui, sans-serif" font-size="16" fill="#666666" text-anchor="middle">{date}</text>{byline}
</svg>"##
        )
    }
}

/// `data:image/svg+xml;base64,..` URL for inline embedding.
pub fn svg_data_url(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg.as_bytes()))
}
