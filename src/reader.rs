//! The top-level reader state machine.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::buffer::ParsingBuffer;
use crate::error::Error;
use crate::event::{
    DocumentType, ElementEnd, ElementStart, ProcessingInstruction, XmlDeclaration,
};
use crate::parser::{
    CdataParser, CommentParser, DoctypeParser, ElementEndParser, ElementStartParser, ItemParser,
    Outcome, PiToken, ProcessingInstructionParser, TextNodeParser, TokenTy, TokenTypeParser,
};

const DEFAULT_BYTE_CAPACITY: usize = 4096;
const DEFAULT_SCALAR_CAPACITY: usize = 1024;

/// What a call to [`XmlReader::parse`] produced.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum ParsingResult {
    /// No `parse()` call has been made yet.
    None,
    /// The buffered input does not complete the current item. Push more
    /// bytes and call `parse()` again; the result is idempotent until then.
    NeedMoreData,
    /// An XML declaration was read; see [`XmlReader::xml_declaration`].
    XmlDeclaration,
    /// A processing instruction was read; see
    /// [`XmlReader::processing_instruction`].
    ProcessingInstruction,
    /// A document type declaration was read; see
    /// [`XmlReader::document_type`].
    DocumentType,
    /// A comment was read; see [`XmlReader::comment`].
    Comment,
    /// A CDATA section was read; see [`XmlReader::cdata`].
    CData,
    /// A start tag was read; see [`XmlReader::start_of_element`].
    StartOfElement,
    /// An end tag was read; see [`XmlReader::end_of_element`].
    EndOfElement,
    /// Character data was read; see [`XmlReader::text_node`].
    TextNode,
    /// The root element is closed and no input is pending.
    EndOfDocument,
    /// The document is malformed; see [`XmlReader::error`]. Terminal until
    /// [`XmlReader::clear`].
    Error,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum DocumentPhase {
    /// Nothing has been examined yet; the only phase in which `<?xml ...?>`
    /// is the XML declaration rather than a reserved-target error.
    PrologWaitForXmlDeclaration,
    PrologWaitForDocumentType,
    Element,
    Epilog,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ParsingState {
    BetweenTokens,
    ReadingTokenType,
    ReadingProcessingInstruction,
    ReadingDocumentType,
    ReadingComment,
    ReadingCData,
    ReadingStartOfElement,
    ReadingEndOfElement,
    ReadingTextNode,
}

/// A streaming pull XML reader over caller-pushed bytes.
///
/// See the [crate documentation](crate) for an overview and examples.
#[derive(Clone, Debug)]
pub struct XmlReader {
    buffer: ParsingBuffer,
    phase: DocumentPhase,
    state: ParsingState,
    parser: Option<ItemParser>,
    open_elements: Vec<String>,
    pending_end: Option<String>,
    seen_doctype: bool,
    last_result: ParsingResult,
    error: Option<Error>,
    xml_declaration: Option<XmlDeclaration>,
    processing_instruction: Option<ProcessingInstruction>,
    document_type: Option<DocumentType>,
    comment: Option<String>,
    cdata: Option<String>,
    element_start: Option<ElementStart>,
    element_end: Option<ElementEnd>,
    text: Option<String>,
}

impl XmlReader {
    /// Instantiates a reader with the default capacities.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BYTE_CAPACITY, DEFAULT_SCALAR_CAPACITY)
    }

    /// Instantiates a reader with explicit capacities: `byte_capacity` bytes
    /// of pushed-but-undecoded input and `scalar_capacity` decoded scalars.
    ///
    /// Neither buffer grows. `scalar_capacity` bounds the size of a single
    /// token; a longer indivisible token fails with
    /// [`Error::CapacityExceeded`]. A floor of 256 scalars handles every
    /// prolog production without the caller having to mind chunk boundaries.
    #[must_use]
    pub fn with_capacity(byte_capacity: usize, scalar_capacity: usize) -> Self {
        Self {
            buffer: ParsingBuffer::new(byte_capacity, scalar_capacity),
            phase: DocumentPhase::PrologWaitForXmlDeclaration,
            state: ParsingState::BetweenTokens,
            parser: None,
            open_elements: Vec::new(),
            pending_end: None,
            seen_doctype: false,
            last_result: ParsingResult::None,
            error: None,
            xml_declaration: None,
            processing_instruction: None,
            document_type: None,
            comment: None,
            cdata: None,
            element_start: None,
            element_end: None,
            text: None,
        }
    }

    /// Pushes bytes into the reader and returns how many were accepted.
    ///
    /// A return value smaller than `bytes.len()` means the byte buffer is
    /// full; drain it by calling [`parse`][Self::parse] before offering the
    /// remainder again.
    pub fn write_data(&mut self, bytes: &[u8]) -> usize {
        self.buffer.write_data(bytes)
    }

    /// Drives the reader to the next event, suspension or error.
    pub fn parse(&mut self) -> ParsingResult {
        if self.error.is_some() {
            return self.finish_with(ParsingResult::Error);
        }

        self.reset_event_payloads();

        if let Some(name) = self.pending_end.take() {
            return self.close_element(ElementEnd::new(name));
        }

        self.buffer.pump();

        if self.phase == DocumentPhase::Epilog
            && self.state == ParsingState::BetweenTokens
            && !self.buffer.has_pending_input()
        {
            return self.finish_with(ParsingResult::EndOfDocument);
        }

        loop {
            match self.state {
                ParsingState::BetweenTokens => {
                    let ignore_whitespace = matches!(
                        self.phase,
                        DocumentPhase::PrologWaitForDocumentType | DocumentPhase::Epilog
                    );
                    self.install(
                        ItemParser::TokenType(TokenTypeParser::new(ignore_whitespace)),
                        ParsingState::ReadingTokenType,
                    );
                }
                ParsingState::ReadingTokenType => match self.drive() {
                    Outcome::NeedMoreData => {
                        // Whitespace skipped by the classifier produces no
                        // event; reclaim it so a long run cannot fill the
                        // window.
                        self.buffer.erase_to_current_position();
                        if self.phase == DocumentPhase::Epilog
                            && !self.buffer.has_pending_input()
                        {
                            return self.finish_with(ParsingResult::EndOfDocument);
                        }
                        return self.suspend();
                    }
                    Outcome::Failed(error) => return self.fail(error),
                    Outcome::Success => {
                        let Some(ItemParser::TokenType(classifier)) = self.parser.as_ref() else {
                            return self.fail(Error::SyntaxError);
                        };
                        let Some(token) = classifier.token_found() else {
                            return self.fail(Error::SyntaxError);
                        };
                        let token_start = classifier.token_start();
                        trace!("classified {:?} at offset {}", token, token_start);
                        if let Some(result) = self.dispatch_token(token, token_start) {
                            return result;
                        }
                    }
                },
                ParsingState::ReadingProcessingInstruction => match self.drive() {
                    Outcome::NeedMoreData => return self.suspend_or_overflow(),
                    Outcome::Failed(error) => return self.fail(error),
                    Outcome::Success => {
                        let Some(ItemParser::ProcessingInstruction(parser)) =
                            self.parser.as_mut()
                        else {
                            return self.fail(Error::SyntaxError);
                        };
                        match parser.take_token() {
                            Some(PiToken::XmlDeclaration(declaration)) => {
                                self.phase = DocumentPhase::PrologWaitForDocumentType;
                                self.xml_declaration = Some(declaration);
                                return self.emit(ParsingResult::XmlDeclaration);
                            }
                            Some(PiToken::ProcessingInstruction(instruction)) => {
                                if self.phase == DocumentPhase::PrologWaitForXmlDeclaration {
                                    self.phase = DocumentPhase::PrologWaitForDocumentType;
                                }
                                self.processing_instruction = Some(instruction);
                                return self.emit(ParsingResult::ProcessingInstruction);
                            }
                            None => return self.fail(Error::SyntaxError),
                        }
                    }
                },
                ParsingState::ReadingDocumentType => match self.drive() {
                    Outcome::NeedMoreData => return self.suspend_or_overflow(),
                    Outcome::Failed(error) => return self.fail(error),
                    Outcome::Success => {
                        let Some(ItemParser::DocumentType(parser)) = self.parser.as_mut() else {
                            return self.fail(Error::SyntaxError);
                        };
                        let Some(document_type) = parser.take_document_type() else {
                            return self.fail(Error::SyntaxError);
                        };
                        self.seen_doctype = true;
                        self.document_type = Some(document_type);
                        return self.emit(ParsingResult::DocumentType);
                    }
                },
                ParsingState::ReadingComment => match self.drive() {
                    Outcome::NeedMoreData => return self.suspend_or_overflow(),
                    Outcome::Failed(error) => return self.fail(error),
                    Outcome::Success => {
                        let Some(ItemParser::Comment(parser)) = self.parser.as_mut() else {
                            return self.fail(Error::SyntaxError);
                        };
                        self.comment = Some(parser.take_text());
                        return self.emit(ParsingResult::Comment);
                    }
                },
                ParsingState::ReadingCData => match self.drive() {
                    Outcome::NeedMoreData => return self.suspend_or_overflow(),
                    Outcome::Failed(error) => return self.fail(error),
                    Outcome::Success => {
                        let Some(ItemParser::Cdata(parser)) = self.parser.as_mut() else {
                            return self.fail(Error::SyntaxError);
                        };
                        self.cdata = Some(parser.take_data());
                        return self.emit(ParsingResult::CData);
                    }
                },
                ParsingState::ReadingStartOfElement => match self.drive() {
                    Outcome::NeedMoreData => return self.suspend_or_overflow(),
                    Outcome::Failed(error) => return self.fail(error),
                    Outcome::Success => {
                        let Some(ItemParser::ElementStart(parser)) = self.parser.as_mut() else {
                            return self.fail(Error::SyntaxError);
                        };
                        let Some(element) = parser.take_element() else {
                            return self.fail(Error::SyntaxError);
                        };
                        self.phase = DocumentPhase::Element;
                        self.open_elements.push(element.name().to_string());
                        if element.is_empty_element() {
                            self.pending_end = Some(element.name().to_string());
                        }
                        self.element_start = Some(element);
                        return self.emit(ParsingResult::StartOfElement);
                    }
                },
                ParsingState::ReadingEndOfElement => match self.drive() {
                    Outcome::NeedMoreData => return self.suspend_or_overflow(),
                    Outcome::Failed(error) => return self.fail(error),
                    Outcome::Success => {
                        let Some(ItemParser::ElementEnd(parser)) = self.parser.as_mut() else {
                            return self.fail(Error::SyntaxError);
                        };
                        let Some(element) = parser.take_element() else {
                            return self.fail(Error::SyntaxError);
                        };
                        if self.open_elements.last().map(String::as_str) != Some(element.name())
                        {
                            return self.fail(Error::WellFormednessError);
                        }
                        self.buffer.erase_to_current_position();
                        self.parser = None;
                        self.state = ParsingState::BetweenTokens;
                        return self.close_element(element);
                    }
                },
                ParsingState::ReadingTextNode => match self.drive() {
                    Outcome::NeedMoreData => return self.suspend_or_overflow(),
                    Outcome::Failed(error) => return self.fail(error),
                    Outcome::Success => {
                        let Some(ItemParser::Text(parser)) = self.parser.as_mut() else {
                            return self.fail(Error::SyntaxError);
                        };
                        self.text = Some(parser.take_text());
                        return self.emit(ParsingResult::TextNode);
                    }
                },
            }
        }
    }

    /// The result of the most recent [`parse`][Self::parse] call, without
    /// driving the reader.
    #[must_use]
    pub fn last_parsing_result(&self) -> ParsingResult {
        self.last_result
    }

    /// The error classification, if the reader is in the error state.
    #[must_use]
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    /// The XML declaration. `Some` only immediately after
    /// [`ParsingResult::XmlDeclaration`] was reported.
    #[must_use]
    pub fn xml_declaration(&self) -> Option<&XmlDeclaration> {
        self.xml_declaration.as_ref()
    }

    /// The processing instruction. `Some` only immediately after
    /// [`ParsingResult::ProcessingInstruction`] was reported.
    #[must_use]
    pub fn processing_instruction(&self) -> Option<&ProcessingInstruction> {
        self.processing_instruction.as_ref()
    }

    /// The document type declaration. `Some` only immediately after
    /// [`ParsingResult::DocumentType`] was reported.
    #[must_use]
    pub fn document_type(&self) -> Option<&DocumentType> {
        self.document_type.as_ref()
    }

    /// The comment text. `Some` only immediately after
    /// [`ParsingResult::Comment`] was reported.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// The CDATA content. `Some` only immediately after
    /// [`ParsingResult::CData`] was reported.
    #[must_use]
    pub fn cdata(&self) -> Option<&str> {
        self.cdata.as_deref()
    }

    /// The start tag. `Some` only immediately after
    /// [`ParsingResult::StartOfElement`] was reported.
    #[must_use]
    pub fn start_of_element(&self) -> Option<&ElementStart> {
        self.element_start.as_ref()
    }

    /// The end tag. `Some` only immediately after
    /// [`ParsingResult::EndOfElement`] was reported.
    #[must_use]
    pub fn end_of_element(&self) -> Option<&ElementEnd> {
        self.element_end.as_ref()
    }

    /// The expanded character data. `Some` only immediately after
    /// [`ParsingResult::TextNode`] was reported.
    #[must_use]
    pub fn text_node(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Drops all buffered input and state and prepares for a new document.
    pub fn clear(&mut self) {
        trace!("clearing reader state");
        self.buffer.clear();
        self.phase = DocumentPhase::PrologWaitForXmlDeclaration;
        self.state = ParsingState::BetweenTokens;
        self.parser = None;
        self.open_elements.clear();
        self.pending_end = None;
        self.seen_doctype = false;
        self.last_result = ParsingResult::None;
        self.error = None;
        self.reset_event_payloads();
    }

    fn dispatch_token(&mut self, token: TokenTy, token_start: u64) -> Option<ParsingResult> {
        match token {
            TokenTy::Whitespace => {
                if self.phase == DocumentPhase::Element {
                    self.install(
                        ItemParser::Text(TextNodeParser::new()),
                        ParsingState::ReadingTextNode,
                    );
                } else {
                    if self.phase == DocumentPhase::PrologWaitForXmlDeclaration {
                        // The first scalar cannot start an XML declaration
                        // anymore.
                        self.phase = DocumentPhase::PrologWaitForDocumentType;
                    }
                    if let Some(ItemParser::TokenType(classifier)) = self.parser.as_mut() {
                        classifier.set_ignore_leading_whitespace(true);
                    }
                }
                None
            }
            TokenTy::ProcessingInstruction => {
                let xml_declaration_allowed =
                    self.phase == DocumentPhase::PrologWaitForXmlDeclaration && token_start == 0;
                self.install(
                    ItemParser::ProcessingInstruction(ProcessingInstructionParser::new(
                        xml_declaration_allowed,
                    )),
                    ParsingState::ReadingProcessingInstruction,
                );
                None
            }
            TokenTy::DocumentType => match self.phase {
                DocumentPhase::PrologWaitForXmlDeclaration
                | DocumentPhase::PrologWaitForDocumentType => {
                    if self.seen_doctype {
                        return Some(self.fail(Error::WellFormednessError));
                    }
                    self.phase = DocumentPhase::PrologWaitForDocumentType;
                    self.install(
                        ItemParser::DocumentType(DoctypeParser::new()),
                        ParsingState::ReadingDocumentType,
                    );
                    None
                }
                DocumentPhase::Element | DocumentPhase::Epilog => {
                    Some(self.fail(Error::UnexpectedToken))
                }
            },
            TokenTy::Comment => {
                if self.phase == DocumentPhase::PrologWaitForXmlDeclaration {
                    self.phase = DocumentPhase::PrologWaitForDocumentType;
                }
                self.install(
                    ItemParser::Comment(CommentParser::new()),
                    ParsingState::ReadingComment,
                );
                None
            }
            TokenTy::Cdata => {
                if self.phase == DocumentPhase::Element {
                    self.install(
                        ItemParser::Cdata(CdataParser::new()),
                        ParsingState::ReadingCData,
                    );
                    None
                } else {
                    Some(self.fail(Error::UnexpectedToken))
                }
            }
            TokenTy::StartOfElement => {
                if self.phase == DocumentPhase::Epilog {
                    Some(self.fail(Error::UnexpectedToken))
                } else {
                    self.install(
                        ItemParser::ElementStart(ElementStartParser::new()),
                        ParsingState::ReadingStartOfElement,
                    );
                    None
                }
            }
            TokenTy::EndOfElement => {
                if self.phase == DocumentPhase::Element {
                    self.install(
                        ItemParser::ElementEnd(ElementEndParser::new()),
                        ParsingState::ReadingEndOfElement,
                    );
                    None
                } else {
                    Some(self.fail(Error::UnexpectedToken))
                }
            }
            TokenTy::TextNode => {
                if self.phase == DocumentPhase::Element {
                    self.install(
                        ItemParser::Text(TextNodeParser::new()),
                        ParsingState::ReadingTextNode,
                    );
                    None
                } else {
                    Some(self.fail(Error::UnexpectedToken))
                }
            }
        }
    }

    fn drive(&mut self) -> Outcome {
        match self.parser.as_mut() {
            Some(parser) => parser.parse(&mut self.buffer),
            None => Outcome::Failed(Error::SyntaxError),
        }
    }

    /// Installing a new parser releases the previous one on every path.
    fn install(&mut self, parser: ItemParser, state: ParsingState) {
        self.parser = Some(parser);
        self.state = state;
    }

    fn emit(&mut self, result: ParsingResult) -> ParsingResult {
        trace!("event: {:?}", result);
        self.buffer.erase_to_current_position();
        self.parser = None;
        self.state = ParsingState::BetweenTokens;
        self.finish_with(result)
    }

    fn close_element(&mut self, element: ElementEnd) -> ParsingResult {
        trace!("event: {:?} ({})", ParsingResult::EndOfElement, element.name());
        let closed = self.open_elements.pop();
        debug_assert_eq!(closed.as_deref(), Some(element.name()));
        if self.open_elements.is_empty() {
            self.phase = DocumentPhase::Epilog;
        }
        self.element_end = Some(element);
        self.finish_with(ParsingResult::EndOfElement)
    }

    fn suspend(&mut self) -> ParsingResult {
        if let Some(error) = self.buffer.decode_error() {
            return self.fail(error);
        }
        self.finish_with(ParsingResult::NeedMoreData)
    }

    fn suspend_or_overflow(&mut self) -> ParsingResult {
        if let Some(error) = self.buffer.decode_error() {
            self.fail(error)
        } else if self.buffer.is_full() {
            self.fail(Error::CapacityExceeded)
        } else {
            self.suspend()
        }
    }

    fn fail(&mut self, error: Error) -> ParsingResult {
        trace!("failing with {:?}", error);
        self.error = Some(error);
        self.parser = None;
        self.finish_with(ParsingResult::Error)
    }

    fn finish_with(&mut self, result: ParsingResult) -> ParsingResult {
        self.last_result = result;
        result
    }

    fn reset_event_payloads(&mut self) {
        self.xml_declaration = None;
        self.processing_instruction = None;
        self.document_type = None;
        self.comment = None;
        self.cdata = None;
        self.element_start = None;
        self.element_end = None;
        self.text = None;
    }
}

impl Default for XmlReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_with(input: &str) -> XmlReader {
        let mut reader = XmlReader::new();
        assert_eq!(input.len(), reader.write_data(input.as_bytes()));
        reader
    }

    #[test]
    fn last_parsing_result_starts_as_none() {
        let reader = XmlReader::new();
        assert_eq!(ParsingResult::None, reader.last_parsing_result());
        assert_eq!(None, reader.error());
    }

    #[test]
    fn need_more_data_is_idempotent() {
        let mut reader = reader_with("<?pi");
        assert_eq!(ParsingResult::NeedMoreData, reader.parse());
        assert_eq!(ParsingResult::NeedMoreData, reader.parse());
        assert_eq!(ParsingResult::NeedMoreData, reader.last_parsing_result());
    }

    #[test]
    fn error_state_is_terminal_until_cleared() {
        let mut reader = reader_with("<?XML version='1.0'?>");
        assert_eq!(ParsingResult::Error, reader.parse());
        assert_eq!(Some(Error::WellFormednessError), reader.error());
        reader.write_data(b"<?ok?>");
        assert_eq!(ParsingResult::Error, reader.parse());

        reader.clear();
        assert_eq!(None, reader.error());
        reader.write_data(b"<?ok?>");
        assert_eq!(ParsingResult::ProcessingInstruction, reader.parse());
    }

    #[test]
    fn payloads_are_defined_only_immediately_after_their_event() {
        let mut reader = reader_with("<?a?><?b?>");
        assert_eq!(ParsingResult::ProcessingInstruction, reader.parse());
        assert_eq!(Some("a"), reader.processing_instruction().map(|pi| pi.target()));
        assert_eq!(ParsingResult::ProcessingInstruction, reader.parse());
        assert_eq!(Some("b"), reader.processing_instruction().map(|pi| pi.target()));
        assert_eq!(ParsingResult::NeedMoreData, reader.parse());
        assert_eq!(None, reader.processing_instruction());
    }

    #[test]
    fn empty_element_reports_synthesized_end() {
        let mut reader = reader_with("<a><b x='1'/></a>");
        assert_eq!(ParsingResult::StartOfElement, reader.parse());
        assert_eq!(ParsingResult::StartOfElement, reader.parse());
        let element = reader.start_of_element().unwrap();
        assert!(element.is_empty_element());
        assert_eq!(ParsingResult::EndOfElement, reader.parse());
        assert_eq!(Some("b"), reader.end_of_element().map(ElementEnd::name));
        assert_eq!(ParsingResult::EndOfElement, reader.parse());
        assert_eq!(Some("a"), reader.end_of_element().map(ElementEnd::name));
        assert_eq!(ParsingResult::EndOfDocument, reader.parse());
    }

    #[test]
    fn mismatched_end_tag_is_rejected() {
        let mut reader = reader_with("<a></b>");
        assert_eq!(ParsingResult::StartOfElement, reader.parse());
        assert_eq!(ParsingResult::Error, reader.parse());
        assert_eq!(Some(Error::WellFormednessError), reader.error());
    }

    #[test]
    fn cdata_outside_an_element_is_rejected() {
        let mut reader = reader_with("<![CDATA[x]]>");
        assert_eq!(ParsingResult::Error, reader.parse());
        assert_eq!(Some(Error::UnexpectedToken), reader.error());
    }

    #[test]
    fn second_doctype_is_rejected() {
        let mut reader = reader_with("<!DOCTYPE a><!DOCTYPE b><a/>");
        assert_eq!(ParsingResult::DocumentType, reader.parse());
        assert_eq!(ParsingResult::Error, reader.parse());
        assert_eq!(Some(Error::WellFormednessError), reader.error());
    }

    #[test]
    fn token_larger_than_the_window_overflows() {
        let mut reader = XmlReader::with_capacity(64, 16);
        reader.write_data(b"<!-- a comment much longer than the window -->");
        let mut result = reader.parse();
        while result == ParsingResult::NeedMoreData {
            result = reader.parse();
        }
        assert_eq!(ParsingResult::Error, result);
        assert_eq!(Some(Error::CapacityExceeded), reader.error());
    }

    #[test]
    fn backpressure_is_reported_through_write_data() {
        let mut reader = XmlReader::with_capacity(16, 16);
        let input = b"<a>0123456789</a>";
        let mut offset = 0;
        let mut saw_partial_write = false;
        let mut events = alloc::vec::Vec::new();
        loop {
            let accepted = reader.write_data(&input[offset..]);
            if accepted < input.len() - offset {
                saw_partial_write = true;
            }
            offset += accepted;
            match reader.parse() {
                ParsingResult::NeedMoreData => {}
                ParsingResult::EndOfDocument => break,
                result => events.push(result),
            }
        }
        assert!(saw_partial_write);
        assert_eq!(
            alloc::vec![
                ParsingResult::StartOfElement,
                ParsingResult::TextNode,
                ParsingResult::EndOfElement,
            ],
            events
        );
    }
}
