use crate::point::Position;
use crate::token::TokenType;

/// Why a compilation run was aborted.
///
/// None of these are recoverable mid-run: the event stream is assumed to
/// come from a conforming tokenizer, so every variant points at either a
/// tokenizer bug or an extension whose handlers do not pair up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("Cannot close `{token}` ({position}): it's not open")]
    UnopenedToken { token: TokenType, position: Position },

    #[error(
        "Cannot close `{closing}` ({closing_position}): a different token (`{open}`, {open_position}) is open"
    )]
    MismatchedToken {
        closing: TokenType,
        closing_position: Position,
        open: TokenType,
        open_position: Position,
    },

    #[error("Cannot close document, a token (`{token}`, {position}) is still open")]
    UnclosedToken { token: TokenType, position: Position },

    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Cannot decode character reference `&{reference};`")]
    Decode { reference: String },

    /// Raised by extension handlers for their own failures.
    #[error("{0}")]
    Handler(String),
}

impl CompileError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
