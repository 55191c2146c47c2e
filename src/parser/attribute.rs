//! Attribute value recognition with reference expansion.

use alloc::string::String;

use crate::buffer::ParsingBuffer;
use crate::error::Error;
use crate::event::QuotationMark;
use crate::parser::{skip_whitespace, Outcome};
use crate::syntax;

/// References never exceed `&#x10FFFF;`; anything longer cannot resolve.
const MAX_REFERENCE_LEN: usize = 16;

#[derive(Copy, Clone, Debug)]
enum State {
    Equals,
    OpeningQuote,
    Value,
    Reference,
}

/// Parses `Eq S? ('...' | "...")` starting at the scalar after the attribute
/// name.
///
/// Literal `<` and bare `&` are rejected inside the value. The five
/// predefined entity references and numeric character references are
/// expanded into the logical value; the escaped form is retained verbatim
/// alongside it.
#[derive(Clone, Debug)]
pub(crate) struct AttributeValueParser {
    state: State,
    quotation: QuotationMark,
    value: String,
    raw_value: String,
    reference: String,
}

impl AttributeValueParser {
    pub(crate) fn new() -> Self {
        Self {
            state: State::Equals,
            quotation: QuotationMark::Quote,
            value: String::new(),
            raw_value: String::new(),
            reference: String::new(),
        }
    }

    /// The expanded value, the raw escaped value and the quotation style.
    /// Meaningful only after [`parse`][Self::parse] returned
    /// [`Outcome::Success`].
    pub(crate) fn take_value(&mut self) -> (String, String, QuotationMark) {
        (
            core::mem::take(&mut self.value),
            core::mem::take(&mut self.raw_value),
            self.quotation,
        )
    }

    pub(crate) fn parse(&mut self, buffer: &mut ParsingBuffer) -> Outcome {
        loop {
            match self.state {
                State::Equals => {
                    skip_whitespace(buffer);
                    match buffer.at(0) {
                        None => return Outcome::NeedMoreData,
                        Some('=') => {
                            buffer.advance(1);
                            self.state = State::OpeningQuote;
                        }
                        Some(_) => return Outcome::Failed(Error::SyntaxError),
                    }
                }
                State::OpeningQuote => {
                    skip_whitespace(buffer);
                    match buffer.at(0) {
                        None => return Outcome::NeedMoreData,
                        Some('"') => {
                            self.quotation = QuotationMark::Quote;
                            buffer.advance(1);
                            self.state = State::Value;
                        }
                        Some('\'') => {
                            self.quotation = QuotationMark::Apostrophe;
                            buffer.advance(1);
                            self.state = State::Value;
                        }
                        Some(_) => return Outcome::Failed(Error::SyntaxError),
                    }
                }
                State::Value => {
                    let Some(ch) = buffer.at(0) else {
                        return Outcome::NeedMoreData;
                    };
                    match ch {
                        '"' if matches!(self.quotation, QuotationMark::Quote) => {
                            buffer.advance(1);
                            return Outcome::Success;
                        }
                        '\'' if matches!(self.quotation, QuotationMark::Apostrophe) => {
                            buffer.advance(1);
                            return Outcome::Success;
                        }
                        '<' => return Outcome::Failed(Error::WellFormednessError),
                        '&' => {
                            buffer.advance(1);
                            self.raw_value.push('&');
                            self.reference.clear();
                            self.state = State::Reference;
                        }
                        ch if syntax::is_char(ch) => {
                            buffer.advance(1);
                            self.value.push(ch);
                            self.raw_value.push(ch);
                        }
                        _ => return Outcome::Failed(Error::IllegalCharacter),
                    }
                }
                State::Reference => {
                    let Some(ch) = buffer.at(0) else {
                        return Outcome::NeedMoreData;
                    };
                    match ch {
                        ';' => {
                            let Some(expanded) = syntax::resolve_reference(&self.reference) else {
                                return Outcome::Failed(Error::WellFormednessError);
                            };
                            buffer.advance(1);
                            self.raw_value.push_str(&self.reference);
                            self.raw_value.push(';');
                            self.value.push(expanded);
                            self.state = State::Value;
                        }
                        ch if ch.is_ascii_alphanumeric() || ch == '#' => {
                            if self.reference.len() >= MAX_REFERENCE_LEN {
                                return Outcome::Failed(Error::SyntaxError);
                            }
                            buffer.advance(1);
                            self.reference.push(ch);
                        }
                        _ => return Outcome::Failed(Error::SyntaxError),
                    }
                }
            }
        }
    }
}
