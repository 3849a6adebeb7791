//! Error types for the text engine.

use std::fmt;

/// Text encodings understood by the transcoding functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// ISO-8859-1: one byte per code point, U+0000 to U+00FF.
    Latin1,
    /// UTF-8.
    Utf8,
    /// UTF-16 in native code units.
    Utf16,
    /// UTF-32 in native code units.
    Utf32,
}

impl Encoding {
    /// Returns the conventional name of this encoding.
    pub const fn as_str(self) -> &'static str {
        match self {
            Encoding::Latin1 => "Latin-1",
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16 => "UTF-16",
            Encoding::Utf32 => "UTF-32",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors reported by transcoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The input is not valid in its declared encoding.
    Malformed {
        /// Encoding of the input.
        encoding: Encoding,
        /// Index of the first offending code unit in the input.
        position: usize,
    },

    /// A code point cannot be expressed in the target encoding.
    Unrepresentable {
        /// Target encoding.
        encoding: Encoding,
        /// Index of the offending code unit in the source string.
        position: usize,
        /// The offending code unit or code point.
        unit: u32,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Malformed { encoding, position } => {
                write!(f, "malformed {encoding} input at position {position}")
            }
            Error::Unrepresentable {
                encoding,
                position,
                unit,
            } => write!(
                f,
                "U+{unit:04X} at position {position} cannot be represented in {encoding}"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Result type for text operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let malformed = Error::Malformed {
            encoding: Encoding::Utf8,
            position: 3,
        };
        assert_eq!(malformed.to_string(), "malformed UTF-8 input at position 3");

        let unrepresentable = Error::Unrepresentable {
            encoding: Encoding::Latin1,
            position: 0,
            unit: 0x20AC,
        };
        assert_eq!(
            unrepresentable.to_string(),
            "U+20AC at position 0 cannot be represented in Latin-1"
        );
    }
}
