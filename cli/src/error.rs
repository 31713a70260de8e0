use std::path::PathBuf;

use visitgen_compiler::GenError;

/// Exit codes for the CLI process.
///
/// - 0: success
/// - 1: invalid flags
/// - 2: I/O failure (unreadable input, unwritable output)
/// - 3: schema failure (lex, parse or validation)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    InvalidArguments = 1,
    IoError = 2,
    SchemaError = 3,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{source_name}: {source}")]
    Generate {
        source_name: String,
        source:      GenError,
    },

    #[error("IO error for {path}: {source}")]
    Io {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("cannot render the registry: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io { path: path.into(), source }
    }

    /// Maps this error to the appropriate exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Generate { source, .. } if source.is_schema_failure() => ExitCode::SchemaError,
            Self::Generate { .. } | Self::Io { .. } | Self::Json(_) => ExitCode::IoError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visitgen_compiler::error::SchemaError;

    #[test]
    fn schema_failures_exit_three() {
        let err = CliError::Generate {
            source_name: "<stdin>".into(),
            source:      SchemaError::DuplicateDeclarationName("A".into()).into(),
        };
        assert_eq!(err.exit_code(), ExitCode::SchemaError);
        assert_eq!(err.to_string(), "<stdin>: Schema error: The type \"A\" is defined twice");
    }

    #[test]
    fn io_failures_exit_two() {
        let err = CliError::io("out", std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(err.exit_code() as i32, 2);
        assert!(err.to_string().starts_with("IO error for out"));
    }
}
