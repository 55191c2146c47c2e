//! `embedded-stax` is a streaming pull XML reader for memory constrained
//! environments.
//!
//! Bytes are pushed into a bounded buffer in arbitrarily sized chunks and the
//! caller repeatedly asks the reader for the next syntactic event. All
//! suspension is expressed through [`ParsingResult::NeedMoreData`]: the reader
//! never blocks, never invokes callbacks, and never allocates beyond the
//! capacities chosen at construction plus the event payloads it hands out.
//!
//! # Examples
//!
//! ```
//! use embedded_stax::{ParsingResult, XmlReader};
//!
//! let mut reader = XmlReader::new();
//!
//! let input = "<?xml version='1.0'?><greeting>Hello</greeting>";
//! assert_eq!(input.len(), reader.write_data(input.as_bytes()));
//!
//! assert_eq!(ParsingResult::XmlDeclaration, reader.parse());
//! let decl = reader.xml_declaration().unwrap();
//! assert_eq!((1, 0), decl.version());
//!
//! assert_eq!(ParsingResult::StartOfElement, reader.parse());
//! assert_eq!("greeting", reader.start_of_element().unwrap().name());
//!
//! assert_eq!(ParsingResult::TextNode, reader.parse());
//! assert_eq!(Some("Hello"), reader.text_node());
//!
//! assert_eq!(ParsingResult::EndOfElement, reader.parse());
//! assert_eq!(ParsingResult::EndOfDocument, reader.parse());
//! ```
//!
//! # Suspension
//!
//! A [`ParsingResult::NeedMoreData`] result is idempotent. It means the bytes
//! received so far do not complete the current syntactic item; the caller
//! should push more bytes with [`XmlReader::write_data`] and call
//! [`XmlReader::parse`] again. The reader resumes exactly where it left off,
//! no matter where in the document (even in the middle of a multi-byte UTF-8
//! sequence) the previous chunk ended.
//!
//! ```
//! use embedded_stax::{ParsingResult, XmlReader};
//!
//! let mut reader = XmlReader::new();
//!
//! reader.write_data(b"<?xml ver");
//! assert_eq!(ParsingResult::NeedMoreData, reader.parse());
//!
//! reader.write_data(b"sion='1.0'?>");
//! assert_eq!(ParsingResult::XmlDeclaration, reader.parse());
//! ```
//!
//! # Errors
//!
//! The reader does not recover from a malformed document. Once `parse()` has
//! returned [`ParsingResult::Error`], every subsequent call returns `Error`
//! again ([`XmlReader::error`] reports the classification) until
//! [`XmlReader::clear`] resets the reader for a new document.
//!
//! # Limitations & non-goals
//!
//! - UTF-8 content only (the declaration may advertise another encoding, but
//!   bytes are always interpreted as UTF-8)
//! - no DTD validation and no internal subset
//! - no namespace processing
//! - no entity replacement beyond the five predefined entities and numeric
//!   character references
//! - a single indivisible token has to fit inside the internal buffer

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

extern crate alloc;

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::trace!($($arg)*);
    };
}

mod buffer;
mod decode;
mod error;
mod event;
mod parser;
mod reader;
mod sink;
pub mod syntax;

pub use error::Error;
pub use event::{
    Attribute, DocumentType, ElementEnd, ElementStart, ProcessingInstruction, QuotationMark,
    Standalone, XmlDeclaration,
};
pub use reader::{ParsingResult, XmlReader};
