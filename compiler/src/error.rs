use thiserror::Error;

/// Failures while splitting schema text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unterminated literal starting at line {line}, column {column}")]
    UnterminatedLiteral {
        line:   usize,
        column: usize,
    },

    #[error("Unexpected character {found} at line {line}, column {column}")]
    UnexpectedCharacter {
        found:  String,
        line:   usize,
        column: usize,
    },
}

/// Failures while turning tokens into documents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The token stream ended while a `{` or `[` was still open.
    #[error("Unmatched bracket: input ended while expecting {expected}")]
    UnmatchedBracket { expected: String },

    #[error("Expected {expected} but found {found} at line {line}, column {column}")]
    UnexpectedToken {
        expected: String,
        found:    String,
        line:     usize,
        column:   usize,
    },

    #[error("Unexpected {found} after the end of the expression at line {line}, column {column}")]
    TrailingTokens {
        found:  String,
        line:   usize,
        column: usize,
    },
}

/// Failures while classifying documents into declarations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Top-level expression #{index} is not an object")]
    NotAnObject { index: usize },

    #[error("Top-level expression #{index} must carry exactly one of \"type\", \"enum\" or \"union\" (found {found})")]
    AmbiguousDeclaration { index: usize, found: String },

    #[error("The type \"{name}\" is referenced by \"{used_by}\" but never declared")]
    UnresolvedTypeReference { name: String, used_by: String },

    #[error("The type \"{0}\" is defined twice")]
    DuplicateDeclarationName(String),

    #[error("Malformed declaration \"{name}\": {msg}")]
    MalformedDeclaration { name: String, msg: String },

    #[error("Invalid list type for \"{used_by}\": a list holds exactly one type name")]
    InvalidListType { used_by: String },

    #[error("The value \"{value}\" appears twice in enum \"{name}\"")]
    DuplicateEnumValue { name: String, value: String },

    /// Two distinct schema names that mangle to the same C identifier.
    #[error("\"{first}\" and \"{second}\" in \"{owner}\" both become the C name \"{c_name}\"")]
    CollidingNames {
        owner:  String,
        first:  String,
        second: String,
        c_name: String,
    },
}

/// Any failure of a generator run.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lex error: {0}")]
    Lex(#[from] LexError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl GenError {
    /// True for errors caused by the schema text rather than the environment.
    pub fn is_schema_failure(&self) -> bool {
        !matches!(self, GenError::Io(_))
    }
}
