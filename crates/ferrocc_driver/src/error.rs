use ferrocc_codegen::LowerError;
use ferrocc_lexer::LexError;
use ferrocc_parser::ParseError;

/// One error kind per pipeline stage — spec.md §7's four error kinds,
/// composed at the point where the driver has to decide whether to keep
/// going or stop (generalizing the teacher's `llts_driver::pipeline::
/// compile::CompileError`, which enumerates the same shape for its own
/// parse/semantic/analysis/codegen/link stages).
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{} lexical error(s)", .0.len())]
    Lex(Vec<LexError>),

    #[error("{} parse error(s)", .0.len())]
    Parse(Vec<ParseError>),

    #[error("{} lowering error(s)", .0.len())]
    Lower(Vec<LowerError>),

    #[error("LLVM module verification failed: {0}")]
    Verify(String),

    #[error("link error: {0}")]
    Link(String),

    #[error("{0}")]
    Unsupported(String),
}
