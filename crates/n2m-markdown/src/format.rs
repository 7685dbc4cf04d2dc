//! Pure Markdown fragment builders.
//!
//! None of these escape their input: block text arrives from Notion already
//! meant to be read as Markdown, and plain text must pass through unchanged.

/// `# text`
#[must_use]
pub fn heading1(text: &str) -> String {
    format!("# {text}")
}

/// `## text`
#[must_use]
pub fn heading2(text: &str) -> String {
    format!("## {text}")
}

/// `### text`
#[must_use]
pub fn heading3(text: &str) -> String {
    format!("### {text}")
}

/// `[text](href)`
#[must_use]
pub fn link(text: &str, href: &str) -> String {
    format!("[{text}]({href})")
}

/// `![alt](src)`
#[must_use]
pub fn image(alt: &str, src: &str) -> String {
    format!("![{alt}]({src})")
}

/// Fenced code block tagged with `language` (may be empty).
///
/// The fence is one backtick longer than the longest backtick run in `code`.
#[must_use]
pub fn code_block(code: &str, language: &str) -> String {
    let fence = "`".repeat(fence_length(code));
    format!("{fence}{language}\n{code}\n{fence}")
}

/// Inline code span.
#[must_use]
pub fn inline_code(text: &str) -> String {
    let ticks = "`".repeat(longest_run(text, '`') + 1);
    // A leading or trailing backtick would merge with the delimiter
    if text.starts_with('`') || text.ends_with('`') {
        format!("{ticks} {text} {ticks}")
    } else {
        format!("{ticks}{text}{ticks}")
    }
}

/// `$expression$`
#[must_use]
pub fn inline_equation(expression: &str) -> String {
    format!("${expression}$")
}

/// Display equation on its own lines.
#[must_use]
pub fn equation(expression: &str) -> String {
    format!("$$\n{expression}\n$$")
}

/// Horizontal rule.
#[must_use]
pub fn divider() -> String {
    "---".to_owned()
}

#[must_use]
pub fn bold(text: &str) -> String {
    format!("**{text}**")
}

#[must_use]
pub fn italic(text: &str) -> String {
    format!("_{text}_")
}

#[must_use]
pub fn strikethrough(text: &str) -> String {
    format!("~~{text}~~")
}

/// Markdown has no underline; use the HTML element.
#[must_use]
pub fn underline(text: &str) -> String {
    format!("<u>{text}</u>")
}

/// Markdown table with the first row as header.
///
/// Rows shorter than the widest row are padded with empty cells. Pipes in
/// cells are escaped and line breaks become `<br>`. Returns an empty string
/// when there are no cells at all.
#[must_use]
pub fn table(rows: &[Vec<String>]) -> String {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return String::new();
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (index, row) in rows.iter().enumerate() {
        let cells: Vec<String> = (0..width)
            .map(|col| row.get(col).map_or_else(String::new, |c| escape_cell(c)))
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));

        if index == 0 {
            lines.push(format!("|{}", " --- |".repeat(width)));
        }
    }
    lines.join("\n")
}

/// Collapsible section. Without a summary only the children are returned.
#[must_use]
pub fn toggle(summary: &str, children: &str) -> String {
    if summary.is_empty() {
        return children.to_owned();
    }
    format!("<details><summary>{summary}</summary>{children}</details>\n\n")
}

/// Indent every line of `text` by `level` tabs.
///
/// A trailing newline does not start a new (indented) line.
#[must_use]
pub fn add_tab_space(text: &str, level: usize) -> String {
    if level == 0 {
        return text.to_owned();
    }
    let tabs = "\t".repeat(level);
    let mut result = String::with_capacity(text.len() + tabs.len());
    for line in text.split_inclusive('\n') {
        result.push_str(&tabs);
        result.push_str(line);
    }
    result
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', "<br>")
}

/// Smallest fence (at least 3) longer than any backtick run in `content`.
fn fence_length(content: &str) -> usize {
    longest_run(content, '`').max(2) + 1
}

fn longest_run(content: &str, target: char) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;

    for c in content.chars() {
        if c == target {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }

    max_run
}
