//! Structured Feedback Module
//!
//! Machine-readable output of one scan:
//! - every token with its kind, lexeme, literal and line
//! - every lexical error with a stable code

use serde::Serialize;

use crate::frontend::scanner::ScanOutput;
use crate::frontend::token::Token;
use crate::utils::LexError;

// ==================== Diagnostics ====================

/// One lexical error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Error code (e.g., "E0001")
    pub code: String,

    /// Line the error was reported at
    pub line: usize,

    /// Human-readable message
    pub message: String,
}

impl From<&LexError> for Diagnostic {
    fn from(error: &LexError) -> Self {
        Self {
            code: error.code().to_string(),
            line: error.line(),
            message: error.to_string(),
        }
    }
}

// ==================== Scan Report ====================

/// Complete report for one scanned source
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport<'a> {
    /// True when no lexical error was reported
    pub success: bool,

    /// Source name (file path or `<stdin>`)
    pub source: String,

    /// Tokens in source order
    pub tokens: &'a [Token],

    /// All lexical errors
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> ScanReport<'a> {
    pub fn new(source: &str, output: &'a ScanOutput) -> Self {
        Self {
            success: !output.had_error(),
            source: source.to_string(),
            tokens: &output.tokens,
            diagnostics: output.errors.iter().map(Diagnostic::from).collect(),
        }
    }

    /// Convert to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to compact JSON (single line)
    pub fn to_json_compact(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
