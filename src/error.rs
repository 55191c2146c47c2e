//! Error classification for failed parses.

use core::fmt;

/// The reason the reader stopped processing a document.
///
/// After [`XmlReader::parse`][crate::XmlReader::parse] has returned
/// [`ParsingResult::Error`][crate::ParsingResult::Error], the classifying
/// value is available through [`XmlReader::error`][crate::XmlReader::error].
/// The reader stays in the error state until it is cleared.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Malformed UTF-8: a bad continuation byte, an overlong encoding, a
    /// surrogate, or a value above U+10FFFF.
    InvalidEncoding,
    /// A scalar outside the XML `Char` production appeared in a context that
    /// does not allow it.
    IllegalCharacter,
    /// The input does not match any XML production at the current position.
    SyntaxError,
    /// A named well-formedness constraint was violated, such as a duplicate
    /// attribute, a reserved processing instruction target, `--` inside a
    /// comment, `]]>` inside character data, or a mismatched end tag.
    WellFormednessError,
    /// A token which is valid in isolation appeared in a document phase that
    /// does not allow it, such as CDATA outside of an element.
    UnexpectedToken,
    /// A single indivisible token does not fit into the internal buffer.
    CapacityExceeded,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidEncoding => write!(f, "malformed UTF-8 in input"),
            Error::IllegalCharacter => write!(f, "character not allowed in this context"),
            Error::SyntaxError => write!(f, "input does not match an XML production"),
            Error::WellFormednessError => write!(f, "well-formedness constraint violated"),
            Error::UnexpectedToken => write!(f, "token not allowed in the current document phase"),
            Error::CapacityExceeded => write!(f, "token does not fit into the internal buffer"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
