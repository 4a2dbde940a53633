//! Error handling for plox

use thiserror::Error;

/// Lexical errors. Neither kind stops the scan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("Unexpected character: {ch}")]
    UnexpectedCharacter { ch: char, line: usize },

    #[error("Unterminated string.")]
    UnterminatedString { line: usize },
}

impl LexError {
    /// Get the line the error was reported at
    pub fn line(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { line, .. } => *line,
            Self::UnterminatedString { line } => *line,
        }
    }

    /// Stable diagnostic code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnexpectedCharacter { .. } => "E0001",
            Self::UnterminatedString { .. } => "E0002",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = LexError::UnexpectedCharacter { ch: '@', line: 4 };
        assert_eq!(err.to_string(), "Unexpected character: @");
        assert_eq!(err.line(), 4);
        assert_eq!(err.code(), "E0001");

        let err = LexError::UnterminatedString { line: 2 };
        assert_eq!(err.to_string(), "Unterminated string.");
        assert_eq!(err.line(), 2);
        assert_eq!(err.code(), "E0002");
    }
}
