//! Terminal output for the converter CLI.
//!
//! Status lines go to stderr so that Markdown written to stdout can be piped
//! into a file or another tool.

use console::{Style, Term};

/// Status lines on stderr, documents on stdout.
pub(crate) struct Output {
    status: Term,
    documents: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            documents: Term::stdout(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        self.status_line(&Style::new(), msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.status_line(&Style::new().green(), msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.status_line(&Style::new().yellow(), msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.status_line(&Style::new().red(), msg);
    }

    /// Write converted Markdown to stdout, unstyled.
    pub(crate) fn document(&self, markdown: &str) -> std::io::Result<()> {
        self.documents.write_str(markdown)?;
        self.documents.flush()
    }

    // Best effort: status lines never fail a conversion
    fn status_line(&self, style: &Style, msg: &str) {
        let _ = self.status.write_line(&style.apply_to(msg).to_string());
    }
}
