//! Character data recognition inside element content.

use alloc::string::String;

use crate::buffer::ParsingBuffer;
use crate::error::Error;
use crate::parser::Outcome;
use crate::syntax;

const MAX_REFERENCE_LEN: usize = 16;

#[derive(Copy, Clone, Debug)]
enum State {
    Content,
    Reference,
}

/// Accumulates character data until the next `<`, which is left in the
/// buffer for the classifier.
///
/// Whitespace is ordinary character data here. The five predefined entity
/// references and numeric character references are expanded; a bare `&` is
/// rejected, and the `]]>` sequence is not allowed to appear in character
/// data.
#[derive(Clone, Debug)]
pub(crate) struct TextNodeParser {
    state: State,
    text: String,
    reference: String,
}

impl TextNodeParser {
    pub(crate) fn new() -> Self {
        Self {
            state: State::Content,
            text: String::new(),
            reference: String::new(),
        }
    }

    /// The expanded character data. Meaningful only after
    /// [`parse`][Self::parse] returned [`Outcome::Success`].
    pub(crate) fn take_text(&mut self) -> String {
        core::mem::take(&mut self.text)
    }

    pub(crate) fn parse(&mut self, buffer: &mut ParsingBuffer) -> Outcome {
        loop {
            match self.state {
                State::Content => {
                    let Some(ch) = buffer.at(0) else {
                        return Outcome::NeedMoreData;
                    };
                    match ch {
                        '<' => return Outcome::Success,
                        '&' => {
                            buffer.advance(1);
                            self.reference.clear();
                            self.state = State::Reference;
                        }
                        ']' => match buffer.at(1) {
                            None => return Outcome::NeedMoreData,
                            Some(']') => match buffer.at(2) {
                                None => return Outcome::NeedMoreData,
                                Some('>') => {
                                    return Outcome::Failed(Error::WellFormednessError);
                                }
                                Some(_) => {
                                    self.text.push(']');
                                    buffer.advance(1);
                                }
                            },
                            Some(_) => {
                                self.text.push(']');
                                buffer.advance(1);
                            }
                        },
                        ch if syntax::is_char(ch) => {
                            self.text.push(ch);
                            buffer.advance(1);
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
                            self.text.push(expanded);
                            self.state = State::Content;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::buffer_with;

    fn parse_text(input: &str) -> (Outcome, String) {
        let mut buffer = buffer_with(input);
        let mut parser = TextNodeParser::new();
        let outcome = parser.parse(&mut buffer);
        (outcome, parser.take_text())
    }

    #[test]
    fn reads_until_markup() {
        let (outcome, text) = parse_text("Hello world!</a>");
        assert_eq!(Outcome::Success, outcome);
        assert_eq!("Hello world!", text);
    }

    #[test]
    fn whitespace_is_content() {
        let (outcome, text) = parse_text(" \t\n<");
        assert_eq!(Outcome::Success, outcome);
        assert_eq!(" \t\n", text);
    }

    #[test]
    fn expands_references() {
        let (outcome, text) = parse_text("1 &lt; 2 &amp;&amp; 3 &gt;= &#x33;<");
        assert_eq!(Outcome::Success, outcome);
        assert_eq!("1 < 2 && 3 >= 3", text);
    }

    #[test]
    fn rejects_bare_ampersand() {
        let (outcome, _) = parse_text("fish & chips<");
        assert_eq!(Outcome::Failed(Error::SyntaxError), outcome);
    }

    #[test]
    fn rejects_cdata_end_in_content() {
        let (outcome, _) = parse_text("a]]>b<");
        assert_eq!(Outcome::Failed(Error::WellFormednessError), outcome);
    }

    #[test]
    fn lone_brackets_are_content() {
        let (outcome, text) = parse_text("a]b]c<");
        assert_eq!(Outcome::Success, outcome);
        assert_eq!("a]b]c", text);
    }

    #[test]
    fn suspends_until_markup_follows() {
        let mut buffer = buffer_with("Hello");
        let mut parser = TextNodeParser::new();
        assert_eq!(Outcome::NeedMoreData, parser.parse(&mut buffer));
        buffer.write_data(b" world<");
        buffer.pump();
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!("Hello world", parser.take_text());
    }
}
