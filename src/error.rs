use std::io;
use std::result;

/// Ways a quoted field can be malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A quote character appeared inside an unquoted field.
    StrayQuote,
    /// Something other than a separator followed the closing quote of a field.
    TrailingGarbage,
}

/// An error found somewhere in the processing chain.
#[derive(Debug)]
pub enum Error {
    /// User provided headers and headers in the file have different sizes.
    HeaderSizeMismatch { expected: usize, found: usize },
    /// There is no header in the file and none was given.
    HeadersNotProvided,
    /// Malformed quoting in the record that starts at `line`.
    Parse { line: usize, kind: ParseErrorKind },
    /// The `csv` reader rejected the record that starts at `line`.
    Csv { line: usize, source: csv::Error },
    /// A quoted field was never closed.
    UnclosedQuote { line: usize },
    /// Only raised when `strict_field_count` is set.
    FieldCountMismatch { line: usize, expected: usize, found: usize },
    InvalidOption(String),
    Io(io::Error),
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
    /// Line where the error happened, if it is tied to a record.
    pub fn line(&self) -> Option<usize> {
        match *self {
            Error::Parse { line, .. }
            | Error::Csv { line, .. }
            | Error::UnclosedQuote { line }
            | Error::FieldCountMismatch { line, .. } => Some(line),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Error {
        Error::Io(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Csv { ref source, .. } => Some(source),
            Error::Io(ref e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Error::HeaderSizeMismatch { expected, found } => write!(
                f,
                "user provided headers define {} headers but the file has {}",
                expected, found
            ),
            Error::HeadersNotProvided => write!(f, "headers are not provided"),
            Error::Parse { line, kind } => {
                let what = match kind {
                    ParseErrorKind::StrayQuote => "illegal quoting",
                    ParseErrorKind::TrailingGarbage => "unexpected text after closing quote",
                };

                write!(f, "{} [line {}]", what, line)
            }
            Error::Csv { line, ref source } => write!(f, "CSV error: {} [line {}]", source, line),
            Error::UnclosedQuote { line } => write!(f, "unclosed quoted field [line {}]", line),
            Error::FieldCountMismatch {
                line,
                expected,
                found,
            } => write!(
                f,
                "expected {} fields but found {} [line {}]",
                expected, found, line
            ),
            Error::InvalidOption(ref msg) => write!(f, "invalid option: {}", msg),
            Error::Io(ref e) => write!(f, "I/O error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ParseErrorKind};

    #[test]
    fn display_carries_line_number() {
        let err = Error::Parse {
            line: 7,
            kind: ParseErrorKind::StrayQuote,
        };

        assert_eq!(err.to_string(), "illegal quoting [line 7]");
        assert_eq!(err.line(), Some(7));
        assert_eq!(Error::HeadersNotProvided.line(), None);
    }
}
