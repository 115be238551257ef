//! CLI errors.
//!
//! [`CliError`] wraps everything that can stop a run. Messages say what went
//! wrong and, where there is one, how to fix it.

use std::fmt;
use std::io;

/// Everything that can make the CLI exit with status 1.
#[derive(Debug)]
pub enum CliError {
    /// Reading or writing a file failed.
    Io {
        /// The underlying I/O error.
        source: io::Error,
        /// Path involved, if known.
        path: Option<String>,
    },
    /// The bar CSV could not be understood.
    CsvParse {
        /// What was wrong.
        message: String,
        /// 1-based line number, if known.
        line: Option<usize>,
    },
    /// The indicator rejected its inputs or failed.
    Indicator {
        /// The underlying library error.
        source: lazy_ta::Error,
    },
    /// A command-line argument is malformed.
    InvalidArgument {
        /// The argument.
        argument: String,
        /// Why it is invalid.
        reason: String,
        /// What would be valid.
        suggestion: Option<String>,
    },
}

impl CliError {
    /// A CSV error at `line`.
    pub fn csv(message: impl Into<String>, line: Option<usize>) -> Self {
        Self::CsvParse {
            message: message.into(),
            line,
        }
    }

    /// Attaches `path` to an I/O error.
    #[must_use]
    pub fn io(source: io::Error, path: &str) -> Self {
        Self::Io {
            source,
            path: Some(path.to_string()),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { source, path } => match path {
                Some(p) => write!(
                    f,
                    "I/O error with file '{p}': {source}. Check that the path exists and is accessible."
                ),
                None => write!(f, "I/O error: {source}"),
            },
            Self::CsvParse { message, line } => {
                match line {
                    Some(l) => write!(f, "CSV parse error on line {l}: {message}. ")?,
                    None => write!(f, "CSV parse error: {message}. ")?,
                }
                write!(
                    f,
                    "Expected a header with open, high, low, close and optional time and volume columns."
                )
            }
            Self::Indicator { source } => match source {
                lazy_ta::Error::UnknownIndicator { .. } => {
                    write!(f, "{source}. Run `lazy-ta list` to see the available indicators.")
                }
                lazy_ta::Error::UnknownInput { .. } | lazy_ta::Error::InvalidInput { .. } => {
                    write!(f, "{source}. Run `lazy-ta describe <indicator>` to see its inputs.")
                }
                other => write!(f, "Indicator error: {other}"),
            },
            Self::InvalidArgument {
                argument,
                reason,
                suggestion,
            } => {
                write!(f, "Invalid argument '{argument}': {reason}")?;
                if let Some(s) = suggestion {
                    write!(f, ". {s}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Indicator { source } => Some(source),
            Self::CsvParse { .. } | Self::InvalidArgument { .. } => None,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(source: io::Error) -> Self {
        Self::Io { source, path: None }
    }
}

impl From<lazy_ta::Error> for CliError {
    fn from(source: lazy_ta::Error) -> Self {
        Self::Indicator { source }
    }
}

impl From<csv::Error> for CliError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            if let csv::ErrorKind::Io(source) = err.into_kind() {
                return Self::Io { source, path: None };
            }
            return Self::csv("I/O failure", None);
        }
        let line = err
            .position()
            .and_then(|p| usize::try_from(p.line()).ok());
        Self::CsvParse {
            message: err.to_string(),
            line,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io {
            source: io::Error::other(err),
            path: None,
        }
    }
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = CliError::io(io::Error::new(io::ErrorKind::NotFound, "missing"), "bars.csv");
        let msg = err.to_string();
        assert!(msg.contains("bars.csv"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_csv_error_with_line() {
        let msg = CliError::csv("bad number 'x'", Some(3)).to_string();
        assert!(msg.starts_with("CSV parse error on line 3: bad number 'x'."));
    }

    #[test]
    fn test_unknown_indicator_points_at_list() {
        let err: CliError = lazy_ta::Error::UnknownIndicator {
            name: "foo".to_string(),
        }
        .into();
        assert!(err.to_string().contains("lazy-ta list"));
    }

    #[test]
    fn test_invalid_input_points_at_describe() {
        let err: CliError = lazy_ta::Error::InvalidInput {
            id: "length".to_string(),
            reason: "0 is below the minimum 1".to_string(),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("invalid input 'length'"));
        assert!(msg.contains("lazy-ta describe"));
    }

    #[test]
    fn test_invalid_argument_with_suggestion() {
        let err = CliError::InvalidArgument {
            argument: "--set".to_string(),
            reason: "expected id=value".to_string(),
            suggestion: Some("Use -s length=20".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Invalid argument '--set': expected id=value. Use -s length=20"
        );
    }

    #[test]
    fn test_error_sources() {
        use std::error::Error as _;
        let err: CliError = io::Error::new(io::ErrorKind::Other, "x").into();
        assert!(err.source().is_some());
        assert!(CliError::csv("x", None).source().is_none());
    }
}
