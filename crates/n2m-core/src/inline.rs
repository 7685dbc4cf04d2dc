//! Rich text span rendering.

use n2m_markdown::format;
use n2m_notion::types::{Annotations, RichText};

/// Render a run of rich text spans as one Markdown string.
///
/// Equation spans become inline equations and ignore their styling. Other
/// spans are styled, then wrapped in a link when they carry an `href`.
#[must_use]
pub fn rich_text_to_markdown(spans: &[RichText]) -> String {
    spans.iter().map(span_to_markdown).collect()
}

fn span_to_markdown(span: &RichText) -> String {
    if let Some(expression) = span.expression() {
        return format::inline_equation(expression);
    }

    let text = annotate(&span.plain_text, &span.annotations);
    match span.href.as_deref() {
        Some(href) if !href.is_empty() => format::link(&text, href),
        _ => text,
    }
}

/// Apply style flags to `text`.
///
/// Wrapping order, innermost first: code, bold, italic, strikethrough,
/// underline. Leading and trailing whitespace stays outside the markers,
/// otherwise `** bold**` would not parse as emphasis.
#[must_use]
pub fn annotate(text: &str, annotations: &Annotations) -> String {
    if annotations.is_plain() {
        return text.to_owned();
    }

    let without_leading = text.trim_start();
    let leading = &text[..text.len() - without_leading.len()];
    let core = without_leading.trim_end();
    let trailing = &without_leading[core.len()..];

    if core.is_empty() {
        return text.to_owned();
    }

    let mut styled = if annotations.code {
        format::inline_code(core)
    } else {
        core.to_owned()
    };
    if annotations.bold {
        styled = format::bold(&styled);
    }
    if annotations.italic {
        styled = format::italic(&styled);
    }
    if annotations.strikethrough {
        styled = format::strikethrough(&styled);
    }
    if annotations.underline {
        styled = format::underline(&styled);
    }

    format!("{leading}{styled}{trailing}")
}
