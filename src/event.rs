//! Event payloads handed out by the reader.

use alloc::string::String;
use alloc::vec::Vec;

use crate::syntax;

/// The standalone flag of an XML declaration.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Standalone {
    /// No `standalone` pseudo-attribute was declared.
    Unset,
    /// `standalone='yes'`
    Yes,
    /// `standalone='no'`
    No,
}

/// The quotation style delimiting an attribute value.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum QuotationMark {
    /// `"` delimiters.
    Quote,
    /// `'` delimiters.
    Apostrophe,
}

/// A parsed `<?xml ... ?>` declaration.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct XmlDeclaration {
    version: (u8, u8),
    encoding: String,
    standalone: Standalone,
}

impl XmlDeclaration {
    pub(crate) fn new(version: (u8, u8), encoding: String, standalone: Standalone) -> Self {
        Self {
            version,
            encoding,
            standalone,
        }
    }

    /// The declared `(major, minor)` version.
    #[must_use]
    pub fn version(&self) -> (u8, u8) {
        self.version
    }

    /// The declared encoding name, or an empty string if none was declared.
    #[must_use]
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// The declared standalone flag.
    #[must_use]
    pub fn standalone(&self) -> Standalone {
        self.standalone
    }

    /// Whether the declaration satisfies the XML 1.0 constraints: a `1.0` or
    /// `1.1` version and an encoding which is either absent or a valid
    /// `EncName`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self.version, (1, 0) | (1, 1))
            && (self.encoding.is_empty() || syntax::is_valid_enc_name(&self.encoding))
    }
}

/// A parsed processing instruction.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ProcessingInstruction {
    target: String,
    data: String,
}

impl ProcessingInstruction {
    pub(crate) fn new(target: String, data: String) -> Self {
        Self { target, data }
    }

    /// The instruction target.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The instruction data: everything between the whitespace after the
    /// target and the closing `?>`, verbatim. Empty if no data was given.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Whether the target is a valid, non-reserved processing instruction
    /// target.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        syntax::is_valid_pi_target(&self.target)
    }
}

/// A parsed `<!DOCTYPE ...>` declaration.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DocumentType {
    name: String,
}

impl DocumentType {
    pub(crate) fn new(name: String) -> Self {
        Self { name }
    }

    /// The declared document type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One attribute of a start tag.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Attribute {
    name: String,
    value: String,
    raw_value: String,
    quotation: QuotationMark,
}

impl Attribute {
    pub(crate) fn new(
        name: String,
        value: String,
        raw_value: String,
        quotation: QuotationMark,
    ) -> Self {
        Self {
            name,
            value,
            raw_value,
            quotation,
        }
    }

    /// The attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute value with entity and character references expanded.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The attribute value exactly as it appeared between the quotes.
    #[must_use]
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// The quotation style that delimited the value.
    #[must_use]
    pub fn quotation(&self) -> QuotationMark {
        self.quotation
    }
}

/// A parsed start tag.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ElementStart {
    name: String,
    attributes: Vec<Attribute>,
    empty: bool,
}

impl ElementStart {
    pub(crate) fn new(name: String, attributes: Vec<Attribute>, empty: bool) -> Self {
        Self {
            name,
            attributes,
            empty,
        }
    }

    /// The element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attributes in document order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Whether the tag was the empty-element form `<name/>`. The reader
    /// reports the matching end of element on the next `parse()` call.
    #[must_use]
    pub fn is_empty_element(&self) -> bool {
        self.empty
    }
}

/// A parsed end tag.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ElementEnd {
    name: String,
}

impl ElementEnd {
    pub(crate) fn new(name: String) -> Self {
        Self { name }
    }

    /// The element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
