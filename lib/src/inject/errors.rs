use crate::jvm;
use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// Mapping or archive file could not be opened, read, or written
    Io {
        context: String,
        error: std::io::Error,
    },

    /// Archive container is malformed
    Zip(zip::result::ZipError),

    /// Malformed line in a mapping file (line numbers start at 1)
    Format { line: usize, message: String },

    /// Number of parameter names doesn't match the number of argument slots
    ArgumentCountMismatch { expected: usize, found: usize },

    /// Class bytes couldn't be decoded or re-encoded
    ClassFile(jvm::Error),

    /// Failure while processing one method, tagged with the method's signature key
    InMethod { signature: String, source: Box<Error> },
}

impl Error {
    pub fn io(context: impl Into<String>, error: std::io::Error) -> Error {
        Error::Io {
            context: context.into(),
            error,
        }
    }

    pub(crate) fn in_method(self, signature: impl fmt::Display) -> Error {
        Error::InMethod {
            signature: signature.to_string(),
            source: Box::new(self),
        }
    }
}

impl From<jvm::Error> for Error {
    fn from(err: jvm::Error) -> Error {
        Error::ClassFile(err)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Error {
        Error::Zip(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { context, error } => write!(f, "{}: {}", context, error),
            Error::Zip(err) => write!(f, "Bad archive: {}", err),
            Error::Format { line, message } => {
                write!(f, "Bad mapping on line {}: {}", line, message)
            }
            Error::ArgumentCountMismatch { expected, found } => write!(
                f,
                "Incorrect argument count (expected {}, found {})",
                expected, found
            ),
            Error::ClassFile(err) => write!(f, "{}", err),
            Error::InMethod { signature, source } => write!(f, "{} in {}", source, signature),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { error, .. } => Some(error),
            Error::Zip(err) => Some(err),
            Error::ClassFile(err) => Some(err),
            Error::InMethod { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
