//! Colored terminal output on stderr.

use console::{Style, Term};

/// Presentation of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    Plain,
    Detail,
    Success,
    Warning,
    Error,
    Heading,
}

impl Tone {
    fn style(self) -> Option<Style> {
        match self {
            Self::Plain => None,
            Self::Detail => Some(Style::new().dim()),
            Self::Success => Some(Style::new().green()),
            Self::Warning => Some(Style::new().yellow()),
            Self::Error => Some(Style::new().red()),
            Self::Heading => Some(Style::new().cyan().bold()),
        }
    }
}

/// Width of report rules, capped by the terminal.
const RULE_WIDTH: usize = 70;

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Write one line in `tone`. Write errors are ignored.
    pub(crate) fn line(&self, tone: Tone, msg: &str) {
        let _ = match tone.style() {
            Some(style) => self.term.write_line(&style.apply_to(msg).to_string()),
            None => self.term.write_line(msg),
        };
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(Tone::Plain, msg);
    }

    pub(crate) fn detail(&self, msg: &str) {
        self.line(Tone::Detail, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(Tone::Success, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.line(Tone::Warning, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(Tone::Error, msg);
    }

    pub(crate) fn highlight(&self, msg: &str) {
        self.line(Tone::Heading, msg);
    }

    /// Horizontal rule framing the final report.
    pub(crate) fn rule(&self) {
        let width = match self.term.size_checked() {
            Some((_, cols)) => usize::from(cols).min(RULE_WIDTH),
            None => RULE_WIDTH,
        };
        self.info(&"=".repeat(width));
    }
}
