use codespan_reporting::diagnostic as cr;

use crate::location::SourceLocation;

/// Severity levels a diagnostic can carry — spec.md §4.A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
    Remark,
    Help,
    Fatal,
}

impl Severity {
    fn to_codespan(self) -> cr::Severity {
        match self {
            Severity::Error | Severity::Fatal => cr::Severity::Error,
            Severity::Warning => cr::Severity::Warning,
            Severity::Note => cr::Severity::Note,
            Severity::Remark => cr::Severity::Note,
            Severity::Help => cr::Severity::Help,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Remark => "remark",
            Severity::Help => "help",
            Severity::Fatal => "fatal error",
        }
    }
}

/// A single diagnostic: a severity, a primary location, a message, and an
/// optional fix-it replacement hint (spec.md §4.A's "fix-it primitive").
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: SourceLocation,
    pub message: String,
    pub fix_it: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, location: SourceLocation, message: impl Into<String>) -> Self {
        Self {
            severity,
            location,
            message: message.into(),
            fix_it: None,
        }
    }

    pub fn error(location: SourceLocation, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, location, message)
    }

    pub fn warning(location: SourceLocation, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, location, message)
    }

    pub fn fatal(location: SourceLocation, message: impl Into<String>) -> Self {
        Self::new(Severity::Fatal, location, message)
    }

    /// Attach a fix-it hint: a suggested replacement printed on the line
    /// after the snippet.
    pub fn with_fix_it(mut self, hint: impl Into<String>) -> Self {
        self.fix_it = Some(hint.into());
        self
    }

    /// Render this diagnostic's severity + message line without the snippet,
    /// in the exact `<severity>: <msg>` shape spec.md §6.5 describes for the
    /// label portion (the file:line:col prefix is added by
    /// [`crate::Emitter`], which has access to the source map for filenames).
    pub fn label_line(&self) -> String {
        format!("{}: {}", self.severity.label(), self.message)
    }

    pub(crate) fn to_codespan(&self, span: std::ops::Range<usize>) -> cr::Diagnostic<usize> {
        let mut diag = cr::Diagnostic::new(self.severity.to_codespan())
            .with_message(self.message.clone())
            .with_labels(vec![cr::Label::primary(self.location.file_id, span)]);
        if let Some(hint) = &self.fix_it {
            diag = diag.with_notes(vec![format!("fix-it: replace with `{hint}`")]);
        }
        diag
    }
}
