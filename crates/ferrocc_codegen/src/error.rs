use ferrocc_diag::SourceLocation;

/// A single lowering failure (spec.md §7: "lowering: abandon sub-expression"
/// — callers accumulate these rather than aborting the whole function, the
/// same recovery shape `ferrocc_parser::ParseError` gives the parser).
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum LowerError {
    #[error("undefined identifier `{name}`")]
    UndefinedIdentifier { name: String, location: SourceLocation },

    #[error("undefined type `{name}`")]
    UndefinedType { name: String, location: SourceLocation },

    #[error("`{field}` is not a member of `{of}`")]
    UnknownField {
        field: String,
        of: String,
        location: SourceLocation,
    },

    #[error("expression is not assignable")]
    InvalidLValue { location: SourceLocation },

    #[error("`break` outside a loop or switch")]
    BreakOutsideLoop { location: SourceLocation },

    #[error("`continue` outside a loop")]
    ContinueOutsideLoop { location: SourceLocation },

    #[error("`goto` to undefined label `{label}`")]
    UndefinedLabel { label: String, location: SourceLocation },

    #[error("cannot convert between `{from}` and `{to}`")]
    InvalidConversion {
        from: String,
        to: String,
        location: SourceLocation,
    },

    #[error("{context}: {reason}")]
    Unsupported {
        context: &'static str,
        reason: String,
        location: SourceLocation,
    },

    #[error("LLVM module verification failed: {0}")]
    Verification(String),
}

impl LowerError {
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            LowerError::UndefinedIdentifier { location, .. }
            | LowerError::UndefinedType { location, .. }
            | LowerError::UnknownField { location, .. }
            | LowerError::InvalidLValue { location }
            | LowerError::BreakOutsideLoop { location }
            | LowerError::ContinueOutsideLoop { location }
            | LowerError::UndefinedLabel { location, .. }
            | LowerError::InvalidConversion { location, .. }
            | LowerError::Unsupported { location, .. } => Some(*location),
            LowerError::Verification(_) => None,
        }
    }
}
