use indexmap::IndexMap;
use tracing::debug;

use crate::{
    error::{GenError, ParseError},
    tokenizer::{Token, TokenKind, Tokenizer},
    types::Document,
};

fn split_first<'a>(tokens: &'a [Token], expected: &str) -> Result<(&'a Token, &'a [Token]), ParseError> {
    tokens.split_first().ok_or_else(|| ParseError::UnmatchedBracket {
        expected: expected.to_string(),
    })
}

fn unexpected_token(tok: &Token, expected: &str) -> ParseError {
    ParseError::UnexpectedToken {
        expected: expected.to_string(),
        found:    tok.kind.to_string(),
        line:     tok.line,
        column:   tok.column,
    }
}

fn skip_comma(tokens: &[Token]) -> &[Token] {
    match tokens.first() {
        Some(Token { kind: TokenKind::Comma, .. }) => &tokens[1..],
        _ => tokens,
    }
}

/// Parses one document off the front of `tokens`, returning it together
/// with the tokens that follow it.
pub fn parse(tokens: &[Token]) -> Result<(Document, &[Token]), ParseError> {
    let (first, rest) = split_first(tokens, "a document")?;
    match &first.kind {
        TokenKind::LeftBrace => parse_object(rest),
        TokenKind::LeftBracket => parse_array(rest),
        TokenKind::Literal(text) => Ok((Document::Literal(text.clone()), rest)),
        _ => Err(unexpected_token(first, "a document")),
    }
}

fn parse_object(mut tokens: &[Token]) -> Result<(Document, &[Token]), ParseError> {
    let mut members = IndexMap::new();
    loop {
        let (tok, rest) = split_first(tokens, "\"}\"")?;
        let key = match &tok.kind {
            TokenKind::RightBrace => return Ok((Document::Object(members), rest)),
            TokenKind::Literal(key) => key.clone(),
            _ => return Err(unexpected_token(tok, "a key or \"}\"")),
        };

        let (colon, rest) = split_first(rest, "\":\"")?;
        if colon.kind != TokenKind::Colon {
            return Err(unexpected_token(colon, "\":\""));
        }

        let (value, rest) = parse(rest)?;
        tokens = skip_comma(rest);
        // Repeated keys overwrite in place.
        members.insert(key, value);
    }
}

fn parse_array(mut tokens: &[Token]) -> Result<(Document, &[Token]), ParseError> {
    let mut items = Vec::new();
    loop {
        let (tok, rest) = split_first(tokens, "\"]\"")?;
        if tok.kind == TokenKind::RightBracket {
            return Ok((Document::Array(items), rest));
        }
        let (value, rest) = parse(tokens)?;
        tokens = skip_comma(rest);
        items.push(value);
    }
}

/// Parses a single expression whose first line is `line` of its file.
pub fn evaluate(text: &str, line: usize) -> Result<Document, GenError> {
    let tokens = Tokenizer::starting_at_line(text, line).collect::<Result<Vec<_>, _>>()?;
    let (document, rest) = parse(&tokens)?;
    if let Some(tok) = rest.first() {
        return Err(ParseError::TrailingTokens {
            found:  tok.kind.to_string(),
            line:   tok.line,
            column: tok.column,
        }
        .into());
    }
    Ok(document)
}

fn is_skipped(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Splits a schema file into its top-level expressions and parses each.
///
/// An expression starts on a non-indented line and continues over every
/// following indented line. Blank and `#` comment lines never start or end
/// an expression.
pub fn parse_schema(text: &str) -> Result<Vec<Document>, GenError> {
    let mut exprs     = Vec::new();
    let mut expr      = String::new();
    let mut expr_line = 1;

    for (index, line) in text.lines().enumerate() {
        if is_skipped(line) {
            // Keep line numbers of the open expression aligned with the file.
            if !expr.is_empty() {
                expr.push('\n');
            }
            continue;
        }

        let continues = line.starts_with(char::is_whitespace);
        if !continues && !expr.is_empty() {
            exprs.push(evaluate(&expr, expr_line)?);
            expr.clear();
        }
        if expr.is_empty() {
            expr_line = index + 1;
        }
        expr.push_str(line);
        expr.push('\n');
    }

    if !expr.is_empty() {
        exprs.push(evaluate(&expr, expr_line)?);
    }

    debug!(expressions = exprs.len(), "parsed schema");
    Ok(exprs)
}
