//! Start tag and end tag recognition.

use alloc::string::String;
use alloc::vec::Vec;

use crate::buffer::ParsingBuffer;
use crate::error::Error;
use crate::event::{Attribute, ElementEnd, ElementStart};
use crate::parser::attribute::AttributeValueParser;
use crate::parser::name::NameParser;
use crate::parser::Outcome;
use crate::syntax;

#[derive(Clone, Debug)]
enum StartState {
    Name,
    AfterName,
    BetweenAttributes,
    AttributeName,
    AttributeValue,
    AfterAttribute,
}

/// Parses `Name (S Attribute)* S? ('>' | '/>')`, entered after the
/// classifier consumed the opening `<`.
///
/// Attribute names have to be unique within the tag. The empty-element form
/// is reported through [`ElementStart::is_empty_element`]; synthesizing the
/// matching end of element is the reader's job.
#[derive(Clone, Debug)]
pub(crate) struct ElementStartParser {
    state: StartState,
    name: NameParser,
    value: AttributeValueParser,
    element_name: String,
    attribute_name: String,
    attributes: Vec<Attribute>,
    element: Option<ElementStart>,
}

impl ElementStartParser {
    pub(crate) fn new() -> Self {
        Self {
            state: StartState::Name,
            name: NameParser::new(),
            value: AttributeValueParser::new(),
            element_name: String::new(),
            attribute_name: String::new(),
            attributes: Vec::new(),
            element: None,
        }
    }

    /// The recognized start tag. Meaningful only after
    /// [`parse`][Self::parse] returned [`Outcome::Success`].
    pub(crate) fn take_element(&mut self) -> Option<ElementStart> {
        self.element.take()
    }

    pub(crate) fn parse(&mut self, buffer: &mut ParsingBuffer) -> Outcome {
        loop {
            match self.state {
                StartState::Name => match self.name.parse(buffer) {
                    Outcome::Success => {
                        self.element_name = self.name.take_name();
                        self.state = StartState::AfterName;
                    }
                    outcome => return outcome,
                },
                StartState::AfterName | StartState::AfterAttribute => {
                    let Some(ch) = buffer.at(0) else {
                        return Outcome::NeedMoreData;
                    };
                    if syntax::is_whitespace(ch) {
                        buffer.advance(1);
                        self.state = StartState::BetweenAttributes;
                    } else {
                        return self.close(buffer);
                    }
                }
                StartState::BetweenAttributes => {
                    let Some(ch) = buffer.at(0) else {
                        return Outcome::NeedMoreData;
                    };
                    if syntax::is_whitespace(ch) {
                        buffer.advance(1);
                    } else if syntax::is_name_start_char(ch) {
                        self.name = NameParser::new();
                        self.state = StartState::AttributeName;
                    } else {
                        return self.close(buffer);
                    }
                }
                StartState::AttributeName => match self.name.parse(buffer) {
                    Outcome::Success => {
                        self.attribute_name = self.name.take_name();
                        if self
                            .attributes
                            .iter()
                            .any(|attribute| attribute.name() == self.attribute_name)
                        {
                            return Outcome::Failed(Error::WellFormednessError);
                        }
                        self.value = AttributeValueParser::new();
                        self.state = StartState::AttributeValue;
                    }
                    outcome => return outcome,
                },
                StartState::AttributeValue => match self.value.parse(buffer) {
                    Outcome::Success => {
                        let (value, raw_value, quotation) = self.value.take_value();
                        self.attributes.push(Attribute::new(
                            core::mem::take(&mut self.attribute_name),
                            value,
                            raw_value,
                            quotation,
                        ));
                        self.state = StartState::AfterAttribute;
                    }
                    outcome => return outcome,
                },
            }
        }
    }

    /// Recognizes `>` or `/>` at the cursor; anything else cannot continue a
    /// tag here.
    fn close(&mut self, buffer: &mut ParsingBuffer) -> Outcome {
        match buffer.at(0) {
            Some('>') => {
                buffer.advance(1);
                self.finish(false)
            }
            Some('/') => match buffer.at(1) {
                None => Outcome::NeedMoreData,
                Some('>') => {
                    buffer.advance(2);
                    self.finish(true)
                }
                Some(_) => Outcome::Failed(Error::SyntaxError),
            },
            _ => Outcome::Failed(Error::SyntaxError),
        }
    }

    fn finish(&mut self, empty: bool) -> Outcome {
        self.element = Some(ElementStart::new(
            core::mem::take(&mut self.element_name),
            core::mem::take(&mut self.attributes),
            empty,
        ));
        Outcome::Success
    }
}

#[derive(Copy, Clone, Debug)]
enum EndState {
    Name,
    AfterName,
}

/// Parses `Name S? '>'`, entered after the classifier consumed the opening
/// `</`. Matching the name against the open element is the reader's job.
#[derive(Clone, Debug)]
pub(crate) struct ElementEndParser {
    state: EndState,
    name: NameParser,
    element: Option<ElementEnd>,
}

impl ElementEndParser {
    pub(crate) fn new() -> Self {
        Self {
            state: EndState::Name,
            name: NameParser::new(),
            element: None,
        }
    }

    /// The recognized end tag. Meaningful only after [`parse`][Self::parse]
    /// returned [`Outcome::Success`].
    pub(crate) fn take_element(&mut self) -> Option<ElementEnd> {
        self.element.take()
    }

    pub(crate) fn parse(&mut self, buffer: &mut ParsingBuffer) -> Outcome {
        loop {
            match self.state {
                EndState::Name => match self.name.parse(buffer) {
                    Outcome::Success => {
                        self.element = Some(ElementEnd::new(self.name.take_name()));
                        self.state = EndState::AfterName;
                    }
                    outcome => return outcome,
                },
                EndState::AfterName => {
                    let Some(ch) = buffer.at(0) else {
                        return Outcome::NeedMoreData;
                    };
                    if syntax::is_whitespace(ch) {
                        buffer.advance(1);
                    } else if ch == '>' {
                        buffer.advance(1);
                        return Outcome::Success;
                    } else {
                        return Outcome::Failed(Error::SyntaxError);
                    }
                }
            }
        }
    }
}
