use codespan_reporting::term::{self, termcolor::{ColorChoice, StandardStream}};

use crate::diagnostic::{Diagnostic, Severity};
use crate::source_map::SourceMap;

/// Renders [`Diagnostic`]s against a [`SourceMap`] and tracks the running
/// error/warning counts spec.md §4.A calls "global counters."
///
/// One `Emitter` is created per compilation and threaded through the lexer,
/// parser, and lowering stages (spec.md never has these own their own
/// counters independently — diagnostics from every stage accumulate on the
/// same totals so the driver can derive a single exit code at the end, per
/// spec.md §7's propagation policy).
pub struct Emitter {
    writer: StandardStream,
    config: term::Config,
    errors: u32,
    warnings: u32,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
            errors: 0,
            warnings: 0,
        }
    }

    pub fn error_count(&self) -> u32 {
        self.errors
    }

    pub fn warning_count(&self) -> u32 {
        self.warnings
    }

    pub fn had_errors(&self) -> bool {
        self.errors > 0
    }

    /// Emit one diagnostic against `sources`, rendering the offending line
    /// and a caret when the diagnostic's location is not synthetic.
    pub fn emit(&mut self, sources: &SourceMap, diag: &Diagnostic) {
        match diag.severity {
            Severity::Error | Severity::Fatal => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Note | Severity::Remark | Severity::Help => {}
        }

        if diag.location.is_synthetic() {
            eprintln!("{}", diag.label_line());
        } else {
            let span = diag.location.offset as usize..diag.location.offset as usize + 1;
            let cr_diag = diag.to_codespan(span);
            let _ = term::emit(&mut self.writer.lock(), &self.config, sources.inner(), &cr_diag);
        }

        if diag.severity == Severity::Fatal {
            std::process::exit(1);
        }
    }

    /// Convenience for reporting N diagnostics at once (e.g. a parser's
    /// accumulated error list at the end of a compilation).
    pub fn emit_all<'a>(&mut self, sources: &SourceMap, diags: impl IntoIterator<Item = &'a Diagnostic>) {
        for d in diags {
            self.emit(sources, d);
        }
    }

    /// Exit code derived solely from the error count, per spec.md §7.
    pub fn exit_code(&self) -> i32 {
        if self.had_errors() { 1 } else { 0 }
    }
}
