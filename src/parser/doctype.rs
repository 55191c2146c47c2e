//! Document type declaration recognition.

use crate::buffer::ParsingBuffer;
use crate::error::Error;
use crate::event::DocumentType;
use crate::parser::name::NameParser;
use crate::parser::{skip_whitespace, Outcome};
use crate::syntax;

#[derive(Copy, Clone, Debug)]
enum State {
    Separator,
    SeparatorRest,
    Name,
    AfterName,
}

/// Parses `S Name S? >`, entered after the classifier consumed `<!DOCTYPE`.
///
/// External identifiers and the internal subset are not processed; a
/// declaration carrying either is rejected.
#[derive(Clone, Debug)]
pub(crate) struct DoctypeParser {
    state: State,
    name: NameParser,
    document_type: Option<DocumentType>,
}

impl DoctypeParser {
    pub(crate) fn new() -> Self {
        Self {
            state: State::Separator,
            name: NameParser::new(),
            document_type: None,
        }
    }

    /// The declaration. Meaningful only after [`parse`][Self::parse]
    /// returned [`Outcome::Success`].
    pub(crate) fn take_document_type(&mut self) -> Option<DocumentType> {
        self.document_type.take()
    }

    pub(crate) fn parse(&mut self, buffer: &mut ParsingBuffer) -> Outcome {
        loop {
            match self.state {
                State::Separator => {
                    let Some(ch) = buffer.at(0) else {
                        return Outcome::NeedMoreData;
                    };
                    if !syntax::is_whitespace(ch) {
                        return Outcome::Failed(Error::SyntaxError);
                    }
                    buffer.advance(1);
                    self.state = State::SeparatorRest;
                }
                State::SeparatorRest => {
                    let Some(ch) = buffer.at(0) else {
                        return Outcome::NeedMoreData;
                    };
                    if syntax::is_whitespace(ch) {
                        buffer.advance(1);
                    } else {
                        self.state = State::Name;
                    }
                }
                State::Name => match self.name.parse(buffer) {
                    Outcome::Success => {
                        self.document_type = Some(DocumentType::new(self.name.take_name()));
                        self.state = State::AfterName;
                    }
                    outcome => return outcome,
                },
                State::AfterName => {
                    skip_whitespace(buffer);
                    match buffer.at(0) {
                        None => return Outcome::NeedMoreData,
                        Some('>') => {
                            buffer.advance(1);
                            return Outcome::Success;
                        }
                        Some(_) => return Outcome::Failed(Error::SyntaxError),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::buffer_with;

    #[test]
    fn name_only() {
        let mut buffer = buffer_with(" greeting >");
        let mut parser = DoctypeParser::new();
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!(
            Some("greeting"),
            parser.take_document_type().as_ref().map(DocumentType::name)
        );
    }

    #[test]
    fn requires_whitespace_before_the_name() {
        let mut buffer = buffer_with("greeting>");
        let mut parser = DoctypeParser::new();
        assert_eq!(Outcome::Failed(Error::SyntaxError), parser.parse(&mut buffer));
    }

    #[test]
    fn rejects_external_identifiers() {
        let mut buffer = buffer_with(" svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\">");
        let mut parser = DoctypeParser::new();
        assert_eq!(Outcome::Failed(Error::SyntaxError), parser.parse(&mut buffer));
    }

    #[test]
    fn rejects_internal_subset() {
        let mut buffer = buffer_with(" greeting [<!ELEMENT greeting ANY>]>");
        let mut parser = DoctypeParser::new();
        assert_eq!(Outcome::Failed(Error::SyntaxError), parser.parse(&mut buffer));
    }

    #[test]
    fn suspends_mid_name() {
        let mut buffer = buffer_with(" gree");
        let mut parser = DoctypeParser::new();
        assert_eq!(Outcome::NeedMoreData, parser.parse(&mut buffer));
        buffer.write_data(b"ting>");
        buffer.pump();
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
    }
}
