//! Resumable recognizers for the individual XML items.
//!
//! Each parser owns its accumulated value and a small explicit sub-state so
//! that it can suspend at any scalar boundary and resume without replaying.
//! The parsers never look at a scalar without confirming it is available and
//! never advance the buffer cursor past what they have examined.

mod attribute;
mod cdata;
mod comment;
mod doctype;
mod element;
mod name;
mod pi;
mod text;
mod token_type;

pub(crate) use cdata::CdataParser;
pub(crate) use comment::CommentParser;
pub(crate) use doctype::DoctypeParser;
pub(crate) use element::{ElementEndParser, ElementStartParser};
pub(crate) use pi::{PiToken, ProcessingInstructionParser};
pub(crate) use text::TextNodeParser;
pub(crate) use token_type::{TokenTy, TokenTypeParser};

use crate::buffer::ParsingBuffer;
use crate::error::Error;

/// Result of driving a parser one step.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Outcome {
    /// The buffered scalars do not complete the item; the parser's sub-state
    /// is preserved for the next call.
    NeedMoreData,
    /// The item was recognized; the recognized value can be taken from the
    /// parser.
    Success,
    /// The input cannot form the item being parsed.
    Failed(Error),
}

/// The one active recognizer, dispatched by tag.
#[derive(Clone, Debug)]
pub(crate) enum ItemParser {
    TokenType(TokenTypeParser),
    ProcessingInstruction(ProcessingInstructionParser),
    DocumentType(DoctypeParser),
    Comment(CommentParser),
    Cdata(CdataParser),
    ElementStart(ElementStartParser),
    ElementEnd(ElementEndParser),
    Text(TextNodeParser),
}

impl ItemParser {
    pub(crate) fn parse(&mut self, buffer: &mut ParsingBuffer) -> Outcome {
        match self {
            ItemParser::TokenType(parser) => parser.parse(buffer),
            ItemParser::ProcessingInstruction(parser) => parser.parse(buffer),
            ItemParser::DocumentType(parser) => parser.parse(buffer),
            ItemParser::Comment(parser) => parser.parse(buffer),
            ItemParser::Cdata(parser) => parser.parse(buffer),
            ItemParser::ElementStart(parser) => parser.parse(buffer),
            ItemParser::ElementEnd(parser) => parser.parse(buffer),
            ItemParser::Text(parser) => parser.parse(buffer),
        }
    }
}

/// Advances the cursor past any buffered whitespace.
fn skip_whitespace(buffer: &mut ParsingBuffer) {
    while matches!(buffer.at(0), Some(ch) if crate::syntax::is_whitespace(ch)) {
        buffer.advance(1);
    }
}

#[cfg(test)]
pub(crate) fn buffer_with(input: &str) -> ParsingBuffer {
    let mut buffer = ParsingBuffer::new(1024, 1024);
    assert_eq!(input.len(), buffer.write_data(input.as_bytes()));
    buffer.pump();
    buffer
}
