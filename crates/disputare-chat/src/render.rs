//! Escape-by-default rendering of assistant text.
//!
//! Remote output is never treated as markup. Bullet markers (`•`) are the one
//! recognised formatting cue: each one starts a new line.

use std::fmt;

const BULLET: char = '\u{2022}';

/// One display line of a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Plain(String),
    Bullet(String),
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Plain(text) => f.write_str(text),
            Line::Bullet(text) => write!(f, "{BULLET} {text}"),
        }
    }
}

/// Strip control characters other than newline and tab.
///
/// Removes ESC and friends so a reply cannot drive the terminal.
pub fn to_terminal(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Split sanitized text into plain and bullet lines.
pub fn render_lines(text: &str) -> Vec<Line> {
    let clean = to_terminal(text);
    let mut lines = Vec::new();

    for source in clean.lines() {
        let mut pieces = source.split(BULLET);
        let lead = pieces.next().unwrap_or_default().trim();
        let mut bullets = pieces.map(str::trim).peekable();

        if !lead.is_empty() || bullets.peek().is_none() {
            lines.push(Line::Plain(lead.to_string()));
        }
        lines.extend(bullets.map(|b| Line::Bullet(b.to_string())));
    }

    lines
}

/// HTML-escape `text`, then break before each bullet marker.
pub fn to_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            BULLET => {
                escaped.push_str("<br>");
                escaped.push(BULLET);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
