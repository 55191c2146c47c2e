//! Processing instruction and XML declaration recognition.

use alloc::string::String;

use crate::buffer::ParsingBuffer;
use crate::error::Error;
use crate::event::{ProcessingInstruction, Standalone, XmlDeclaration};
use crate::parser::name::NameParser;
use crate::parser::Outcome;
use crate::syntax;

/// Which of the two items the parser produced.
///
/// The same `<?...?>` syntax covers both; the distinction is made once the
/// terminator has been read, and the reader recovers the produced value by
/// matching on this tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum PiToken {
    XmlDeclaration(XmlDeclaration),
    ProcessingInstruction(ProcessingInstruction),
}

#[derive(Clone, Debug)]
enum State {
    Target,
    AfterTarget,
    Separator,
    Data,
}

/// Parses the remainder of a `<?...?>` item, entered after the classifier
/// consumed the opening `<?`.
///
/// The target `xml` (exact casing) opening at document offset 0 while the
/// document still waits for its declaration is parsed as the XML
/// declaration. Every other target matching `[Xx][Mm][Ll]` is rejected as
/// reserved, wherever it occurs.
#[derive(Clone, Debug)]
pub(crate) struct ProcessingInstructionParser {
    state: State,
    name: NameParser,
    target: String,
    data: String,
    xml_declaration_allowed: bool,
    token: Option<PiToken>,
}

impl ProcessingInstructionParser {
    /// `xml_declaration_allowed` is true only when the `<?` opened at
    /// document offset 0 in the phase that still waits for a declaration.
    pub(crate) fn new(xml_declaration_allowed: bool) -> Self {
        Self {
            state: State::Target,
            name: NameParser::new(),
            target: String::new(),
            data: String::new(),
            xml_declaration_allowed,
            token: None,
        }
    }

    /// The produced item. Meaningful only after [`parse`][Self::parse]
    /// returned [`Outcome::Success`].
    pub(crate) fn take_token(&mut self) -> Option<PiToken> {
        self.token.take()
    }

    pub(crate) fn parse(&mut self, buffer: &mut ParsingBuffer) -> Outcome {
        loop {
            match self.state {
                State::Target => match self.name.parse(buffer) {
                    Outcome::Success => {
                        self.target = self.name.take_name();
                        self.state = State::AfterTarget;
                    }
                    outcome => return outcome,
                },
                State::AfterTarget => {
                    let Some(ch) = buffer.at(0) else {
                        return Outcome::NeedMoreData;
                    };
                    if syntax::is_whitespace(ch) {
                        buffer.advance(1);
                        self.state = State::Separator;
                    } else if ch == '?' {
                        match buffer.at(1) {
                            None => return Outcome::NeedMoreData,
                            Some('>') => {
                                buffer.advance(2);
                                return self.finish();
                            }
                            Some(_) => return Outcome::Failed(Error::SyntaxError),
                        }
                    } else {
                        return Outcome::Failed(Error::SyntaxError);
                    }
                }
                State::Separator => {
                    let Some(ch) = buffer.at(0) else {
                        return Outcome::NeedMoreData;
                    };
                    if syntax::is_whitespace(ch) {
                        buffer.advance(1);
                    } else {
                        self.state = State::Data;
                    }
                }
                State::Data => {
                    let Some(ch) = buffer.at(0) else {
                        return Outcome::NeedMoreData;
                    };
                    if ch == '?' {
                        match buffer.at(1) {
                            None => return Outcome::NeedMoreData,
                            Some('>') => {
                                buffer.advance(2);
                                return self.finish();
                            }
                            Some(_) => {
                                self.data.push('?');
                                buffer.advance(1);
                            }
                        }
                    } else if syntax::is_char(ch) {
                        self.data.push(ch);
                        buffer.advance(1);
                    } else {
                        return Outcome::Failed(Error::IllegalCharacter);
                    }
                }
            }
        }
    }

    fn finish(&mut self) -> Outcome {
        let target = core::mem::take(&mut self.target);
        let data = core::mem::take(&mut self.data);

        if self.xml_declaration_allowed && target == "xml" {
            let Some(declaration) = parse_declaration(&data) else {
                return Outcome::Failed(Error::SyntaxError);
            };
            if !declaration.is_valid() {
                return Outcome::Failed(Error::SyntaxError);
            }
            self.token = Some(PiToken::XmlDeclaration(declaration));
            return Outcome::Success;
        }

        if target.eq_ignore_ascii_case("xml") {
            return Outcome::Failed(Error::WellFormednessError);
        }

        let instruction = ProcessingInstruction::new(target, data);
        if !instruction.is_valid() {
            return Outcome::Failed(Error::WellFormednessError);
        }
        self.token = Some(PiToken::ProcessingInstruction(instruction));
        Outcome::Success
    }
}

/// Parses `VersionInfo EncodingDecl? SDDecl? S?` out of the collected
/// declaration data. The whole value is buffered by the time this runs, so
/// no resumability is needed here.
fn parse_declaration(data: &str) -> Option<XmlDeclaration> {
    let mut cursor = Cursor::new(data);

    cursor.skip_whitespace();
    cursor.expect_keyword("version")?;
    cursor.expect_eq()?;
    let version = cursor.expect_quoted()?;
    if !syntax::is_valid_version_num(&version) {
        return None;
    }
    let minor: u8 = version[2..].parse().ok()?;

    let mut encoding = String::new();
    let mut standalone = Standalone::Unset;

    if cursor.at_keyword_after_whitespace("encoding") {
        cursor.skip_whitespace();
        cursor.expect_keyword("encoding")?;
        cursor.expect_eq()?;
        encoding = cursor.expect_quoted()?;
        if !syntax::is_valid_enc_name(&encoding) {
            return None;
        }
    }

    if cursor.at_keyword_after_whitespace("standalone") {
        cursor.skip_whitespace();
        cursor.expect_keyword("standalone")?;
        cursor.expect_eq()?;
        standalone = match cursor.expect_quoted()?.as_str() {
            "yes" => Standalone::Yes,
            "no" => Standalone::No,
            _ => return None,
        };
    }

    cursor.skip_whitespace();
    if !cursor.at_end() {
        return None;
    }

    Some(XmlDeclaration::new((1, minor), encoding, standalone))
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a str) -> Self {
        Self { rest: data }
    }

    fn at_end(&self) -> bool {
        self.rest.is_empty()
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start_matches(syntax::is_whitespace);
    }

    fn at_keyword_after_whitespace(&self, keyword: &str) -> bool {
        let trimmed = self.rest.trim_start_matches(syntax::is_whitespace);
        trimmed.len() < self.rest.len() && trimmed.starts_with(keyword)
    }

    fn expect_keyword(&mut self, keyword: &str) -> Option<()> {
        self.rest = self.rest.strip_prefix(keyword)?;
        Some(())
    }

    fn expect_eq(&mut self) -> Option<()> {
        self.skip_whitespace();
        self.rest = self.rest.strip_prefix('=')?;
        self.skip_whitespace();
        Some(())
    }

    fn expect_quoted(&mut self) -> Option<String> {
        let quote = self.rest.chars().next().filter(|&ch| matches!(ch, '\'' | '"'))?;
        let rest = &self.rest[1..];
        let end = rest.find(quote)?;
        let value = String::from(&rest[..end]);
        self.rest = &rest[end + 1..];
        Some(value)
    }
}
