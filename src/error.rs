use core::fmt;

/// Errors that can occur while parsing an identifier from its textual form.
///
/// Generation itself is infallible; parsing is the only fallible surface.
/// This is returned by the `FromStr` impls of [`SessionId`] and
/// [`RequestId`] when input read back from logs or wire payloads does not
/// match the documented format.
///
/// [`SessionId`]: crate::SessionId
/// [`RequestId`]: crate::RequestId
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ParseIdError {
    /// The input length does not match the fixed encoded length.
    Length {
        /// Required encoded length in bytes.
        expected: usize,
        /// Length of the rejected input.
        found: usize,
    },
    /// The input does not start with the required prefix.
    Prefix {
        /// The prefix the identifier type requires.
        expected: &'static str,
    },
    /// A character outside the identifier's alphabet was found.
    Character {
        /// The offending character.
        found: char,
        /// Byte offset of the offending character.
        index: usize,
    },
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Length { expected, found } => {
                write!(f, "invalid length: expected {expected} bytes, found {found}")
            }
            Self::Prefix { expected } => {
                write!(f, "missing required prefix `{expected}`")
            }
            Self::Character { found, index } => {
                write!(f, "invalid character `{found}` at index {index}")
            }
        }
    }
}

impl core::error::Error for ParseIdError {}
