use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::LexError;
use crate::utils::quote;

lazy_static! {
    // One structural symbol, one quoted literal, or a run of whitespace.
    static ref TOKEN_REGEX: Regex = Regex::new(r"^(?s:[{}\[\]:,]|'(?:[^'\\]|\\.)*'|[ \t\r\n]+)").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Colon,
    Comma,
    /// Text between single quotes, verbatim.
    Literal(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LeftBrace    => f.write_str("\"{\""),
            TokenKind::RightBrace   => f.write_str("\"}\""),
            TokenKind::LeftBracket  => f.write_str("\"[\""),
            TokenKind::RightBracket => f.write_str("\"]\""),
            TokenKind::Colon        => f.write_str("\":\""),
            TokenKind::Comma        => f.write_str("\",\""),
            TokenKind::Literal(text) => write!(f, "literal {}", quote(text)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind:   TokenKind,
    pub line:   usize,
    pub column: usize,
}

/// Lazy token stream over schema text.
///
/// Cloning a tokenizer restarts nothing but copies its position, so a
/// fresh `Tokenizer::new` over the same text yields the same sequence.
/// Iteration stops after the first error.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    text:   &'a str,
    offset: usize,
    line:   usize,
    column: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::starting_at_line(text, 1)
    }

    /// Tokenizer whose reported positions start at `line`, for text cut out
    /// of a larger file.
    pub fn starting_at_line(text: &'a str, line: usize) -> Self {
        Tokenizer {
            text,
            offset: 0,
            line,
            column: 1,
            failed: false,
        }
    }

    fn advance(&mut self, part: &str) {
        let newline_count = part.matches('\n').count();
        if newline_count > 0 {
            self.line += newline_count;
            if let Some(last_line_part) = part.rsplit('\n').next() {
                self.column = last_line_part.chars().count() + 1;
            }
        } else {
            self.column += part.chars().count();
        }
        self.offset += part.len();
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while self.offset < self.text.len() {
            let rest = &self.text[self.offset..];
            let (line, column) = (self.line, self.column);

            let part = match TOKEN_REGEX.find(rest) {
                Some(mat) => mat.as_str(),
                None => {
                    self.failed = true;
                    if rest.starts_with('\'') {
                        return Some(Err(LexError::UnterminatedLiteral { line, column }));
                    }
                    let found = rest.chars().next().map(String::from).unwrap_or_default();
                    return Some(Err(LexError::UnexpectedCharacter {
                        found: quote(&found),
                        line,
                        column,
                    }));
                }
            };
            self.advance(part);

            let kind = match part {
                "{" => TokenKind::LeftBrace,
                "}" => TokenKind::RightBrace,
                "[" => TokenKind::LeftBracket,
                "]" => TokenKind::RightBracket,
                ":" => TokenKind::Colon,
                "," => TokenKind::Comma,
                _ if part.starts_with('\'') => TokenKind::Literal(part[1..part.len() - 1].to_string()),
                _ => continue, // whitespace
            };
            return Some(Ok(Token { kind, line, column }));
        }
        None
    }
}

/// Tokenizes a whole schema expression.
pub fn tokenize_schema(text: &str) -> Result<Vec<Token>, LexError> {
    Tokenizer::new(text).collect()
}
