//! Codec error types.
//!
//! Parse and generation failures are stop-the-world: one cause is surfaced
//! and the whole operation aborts, unlike validation which accumulates.

use thiserror::Error;

/// Low-level cursor failure, tagged with the source line it happened on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CursorError {
    #[error("unexpected end of input after line {line}")]
    UnexpectedEof { line: u32 },

    #[error("token {token:?} on line {line} is not a valid {wanted}")]
    Malformed {
        line: u32,
        token: String,
        wanted: &'static str,
    },
}

impl CursorError {
    pub fn line(&self) -> u32 {
        match self {
            CursorError::UnexpectedEof { line } | CursorError::Malformed { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCause {
    UnexpectedEof,
    Malformed { token: String, wanted: &'static str },
    NegativeCount { what: &'static str, value: i64 },
}

impl std::fmt::Display for ParseCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseCause::UnexpectedEof => write!(f, "unexpected end of input"),
            ParseCause::Malformed { token, wanted } => {
                write!(f, "token {token:?} is not a valid {wanted}")
            }
            ParseCause::NegativeCount { what, value } => {
                write!(f, "negative {what} count: {value}")
            }
        }
    }
}

/// Fatal parse failure with the line it was detected on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("WAM parse error at line {line}: {cause}")]
pub struct ParseError {
    pub line: u32,
    pub cause: ParseCause,
}

impl From<CursorError> for ParseError {
    fn from(e: CursorError) -> Self {
        let line = e.line();
        let cause = match e {
            CursorError::UnexpectedEof { .. } => ParseCause::UnexpectedEof,
            CursorError::Malformed { token, wanted, .. } => ParseCause::Malformed { token, wanted },
        };
        ParseError { line, cause }
    }
}

/// Fatal generation failure: the model handed in is malformed and emitting
/// WAM text would corrupt the output stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("component {component_id}: section arrays do not match n_tramos")]
    MismatchedSections { component_id: String },

    #[error("component {component_id}: wall layer list does not match num_capas")]
    MismatchedLayers { component_id: String },

    #[error("component {component_id}: properties are not of the {expected} category")]
    WrongProperties {
        component_id: String,
        expected: wam_core::Category,
    },

    #[error("atmosphere composition needs {expected} values, got {actual}")]
    BadAtmosphere { expected: usize, actual: usize },

    #[error("component {component_id}: non-finite value in field {field}")]
    NonFinite {
        component_id: String,
        field: &'static str,
    },
}
