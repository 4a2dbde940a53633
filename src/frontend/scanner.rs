//! Scanner for Lox
//!
//! Converts source text into a flat sequence of tokens in one pass.
//! Malformed lexemes are reported and skipped; the scan always runs to
//! the end of the input and finishes with exactly one `Eof` token.

use crate::frontend::token::{Literal, Token, TokenKind};
use crate::utils::{LexError, Reporter};

/// Result of scanning one compilation unit
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutput {
    /// Tokens in source order, terminated by `Eof`
    pub tokens: Vec<Token>,
    /// Every lexical error reported during the scan, in order
    pub errors: Vec<LexError>,
}

impl ScanOutput {
    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Scan `source` without reporting errors anywhere but the output
#[cfg(test)]
pub fn scan(source: &str) -> ScanOutput {
    Scanner::new(source).scan_tokens(&mut crate::utils::SilentReporter)
}

/// Classification of the first character of a lexeme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    /// Always a one-character token
    Punctuation(TokenKind),
    /// `!`, `=`, `<`, `>`: may absorb a following `=`
    OperatorPrefix { single: TokenKind, double: TokenKind },
    /// `/`: division or the start of a line comment
    Slash,
    Quote,
    Digit,
    IdentStart,
    Whitespace,
    Newline,
    Other,
}

fn classify(c: char) -> CharClass {
    match c {
        '(' => CharClass::Punctuation(TokenKind::LeftParen),
        ')' => CharClass::Punctuation(TokenKind::RightParen),
        '{' => CharClass::Punctuation(TokenKind::LeftBrace),
        '}' => CharClass::Punctuation(TokenKind::RightBrace),
        ',' => CharClass::Punctuation(TokenKind::Comma),
        '.' => CharClass::Punctuation(TokenKind::Dot),
        '-' => CharClass::Punctuation(TokenKind::Minus),
        '+' => CharClass::Punctuation(TokenKind::Plus),
        ';' => CharClass::Punctuation(TokenKind::Semicolon),
        '*' => CharClass::Punctuation(TokenKind::Star),
        '!' => CharClass::OperatorPrefix {
            single: TokenKind::Bang,
            double: TokenKind::BangEqual,
        },
        '=' => CharClass::OperatorPrefix {
            single: TokenKind::Equal,
            double: TokenKind::EqualEqual,
        },
        '<' => CharClass::OperatorPrefix {
            single: TokenKind::Less,
            double: TokenKind::LessEqual,
        },
        '>' => CharClass::OperatorPrefix {
            single: TokenKind::Greater,
            double: TokenKind::GreaterEqual,
        },
        '/' => CharClass::Slash,
        '"' => CharClass::Quote,
        '0'..='9' => CharClass::Digit,
        'a'..='z' | 'A'..='Z' | '_' => CharClass::IdentStart,
        ' ' | '\r' | '\t' => CharClass::Whitespace,
        '\n' => CharClass::Newline,
        _ => CharClass::Other,
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// The scanner state
pub struct Scanner<'a> {
    source: &'a str,
    /// Byte offset where the current lexeme began
    start: usize,
    /// Byte offset of the next unread character
    current: usize,
    /// Current 1-based line
    line: usize,
    /// Line the current lexeme began on
    start_line: usize,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
            start_line: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Scan the whole source, handing each lexical error to `reporter`
    pub fn scan_tokens<R: Reporter + ?Sized>(mut self, reporter: &mut R) -> ScanOutput {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_line = self.line;
            self.scan_token(reporter);
            debug_assert!(self.start <= self.current && self.current <= self.source.len());
        }

        self.tokens.push(Token::eof(self.line));

        log::debug!(
            "scanned {} bytes into {} tokens ({} errors, {} lines)",
            self.source.len(),
            self.tokens.len(),
            self.errors.len(),
            self.line
        );

        ScanOutput {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    /// Get the current character without advancing
    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    /// Get the character after the current one without advancing
    fn peek_next(&self) -> Option<char> {
        self.source[self.current..].chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += c.len_utf8();
        Some(c)
    }

    /// Consume the next character only if it is `expected`
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.current]
    }

    fn add_token(&mut self, kind: TokenKind, literal: Option<Literal>) {
        let lexeme = self.lexeme();
        self.tokens.push(Token::new(kind, lexeme, literal, self.start_line));
    }

    fn error<R: Reporter + ?Sized>(&mut self, reporter: &mut R, error: LexError) {
        log::debug!("lexical error at line {}: {}", error.line(), error);
        reporter.report(error.line(), &error.to_string());
        self.errors.push(error);
    }

    fn scan_token<R: Reporter + ?Sized>(&mut self, reporter: &mut R) {
        let Some(c) = self.advance() else {
            return;
        };

        match classify(c) {
            CharClass::Punctuation(kind) => self.add_token(kind, None),
            CharClass::OperatorPrefix { single, double } => {
                let kind = if self.match_char('=') { double } else { single };
                self.add_token(kind, None);
            }
            CharClass::Slash => {
                if self.match_char('/') {
                    self.skip_line_comment();
                } else {
                    self.add_token(TokenKind::Slash, None);
                }
            }
            CharClass::Quote => self.string(reporter),
            CharClass::Digit => self.number(),
            CharClass::IdentStart => self.identifier(),
            CharClass::Whitespace => {}
            CharClass::Newline => self.line += 1,
            CharClass::Other => {
                let line = self.line;
                self.error(reporter, LexError::UnexpectedCharacter { ch: c, line });
            }
        }
    }

    /// Skip to the end of the line, leaving the newline unread
    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn string<R: Reporter + ?Sized>(&mut self, reporter: &mut R) {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        // Reported at the line the input ran out on
        if self.is_at_end() {
            let line = self.line;
            self.error(reporter, LexError::UnterminatedString { line });
            return;
        }

        // closing quote
        self.advance();

        let value = &self.source[self.start + 1..self.current - 1];
        self.add_token(TokenKind::String, Some(Literal::String(value.to_string())));
    }

    fn number(&mut self) {
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // A '.' only belongs to the number when a digit follows it
        if self.peek() == Some('.') && self.peek_next().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Digits with at most one interior '.' always parse; overflow yields inf.
        let value = self.lexeme().parse().unwrap_or(f64::NAN);
        self.add_token(TokenKind::Number, Some(Literal::Number(value)));
    }

    fn identifier(&mut self) {
        while self.peek().map_or(false, is_ident_char) {
            self.advance();
        }

        let kind = TokenKind::keyword_from_str(self.lexeme()).unwrap_or(TokenKind::Identifier);
        self.add_token(kind, None);
    }
}
