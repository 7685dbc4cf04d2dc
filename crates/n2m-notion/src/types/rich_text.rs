//! Notion rich text spans.

use serde::Deserialize;

/// One styled run of text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RichText {
    /// Span kind: `"text"`, `"mention"` or `"equation"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Unstyled text content.
    pub plain_text: String,
    /// Style flags.
    pub annotations: Annotations,
    /// Hyperlink target.
    pub href: Option<String>,
    /// Math expression, present on equation spans.
    pub equation: Option<Expression>,
}

impl RichText {
    /// Plain text span without styling, mostly useful for fixtures.
    #[must_use]
    pub fn plain(text: &str) -> Self {
        Self {
            kind: "text".to_owned(),
            plain_text: text.to_owned(),
            ..Self::default()
        }
    }

    /// The math expression if this span is an equation.
    #[must_use]
    pub fn expression(&self) -> Option<&str> {
        if self.kind != "equation" {
            return None;
        }
        self.equation.as_ref().map(|e| e.expression.as_str())
    }
}

/// Style flags on a [`RichText`] span.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    /// Text color; not rendered.
    pub color: String,
}

impl Annotations {
    /// Whether no rendered style flag is set.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        !(self.bold || self.italic || self.strikethrough || self.underline || self.code)
    }
}

/// Math expression source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Expression {
    /// `KaTeX` source.
    pub expression: String,
}

/// Concatenate the plain text of every span, ignoring styling.
#[must_use]
pub fn plain_text(spans: &[RichText]) -> String {
    spans.iter().map(|s| s.plain_text.as_str()).collect()
}
