use super::class_file::{Constant, ConstantPoolOverflow};
use std::fmt;

/// Things that can go wrong reading, editing, or writing a class file
#[derive(Debug)]
pub enum Error {
    ConstantPoolOverflow {
        constant: Constant,
        offset: u16,
    },

    /// Covers both I/O failures and malformed/truncated class file bytes
    IoError(std::io::Error),

    /// Index doesn't land on a constant (zero, past the end, or the dead slot after a wide
    /// constant)
    InvalidConstantIndex(u16),

    /// Index lands on a constant of the wrong kind
    UnexpectedConstant {
        index: u16,
        expected: &'static str,
    },

    BadDescriptor(String),
    BadName(String),
}

impl From<ConstantPoolOverflow> for Error {
    fn from(overflow: ConstantPoolOverflow) -> Error {
        Error::ConstantPoolOverflow {
            constant: overflow.constant,
            offset: overflow.offset,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConstantPoolOverflow { constant, offset } => {
                write!(f, "Constant pool overflow at {} adding {:?}", offset, constant)
            }
            Error::IoError(err) => write!(f, "Malformed class file: {}", err),
            Error::InvalidConstantIndex(index) => write!(f, "Invalid constant index #{}", index),
            Error::UnexpectedConstant { index, expected } => {
                write!(f, "Constant #{} is not a {} constant", index, expected)
            }
            Error::BadDescriptor(msg) => write!(f, "Bad descriptor: {}", msg),
            Error::BadName(msg) => write!(f, "Bad name: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}
