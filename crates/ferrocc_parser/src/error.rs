use ferrocc_diag::SourceLocation;

/// A single parse failure (spec.md §5's panic-mode recovery: the parser
/// collects these rather than aborting on the first one).
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected {expected}, found `{found}`")]
    Expected {
        expected: String,
        found: String,
        location: SourceLocation,
    },

    #[error("unexpected token `{found}`")]
    UnexpectedToken {
        found: String,
        location: SourceLocation,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof {
        expected: String,
        location: SourceLocation,
    },

    #[error("invalid declaration: {reason}")]
    InvalidDeclaration {
        reason: String,
        location: SourceLocation,
    },

    #[error("recursion limit exceeded while parsing {context}")]
    RecursionLimit {
        context: &'static str,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::Expected { location, .. }
            | ParseError::UnexpectedToken { location, .. }
            | ParseError::UnexpectedEof { location, .. }
            | ParseError::InvalidDeclaration { location, .. }
            | ParseError::RecursionLimit { location, .. } => *location,
        }
    }
}
