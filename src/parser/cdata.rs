//! CDATA section recognition.

use alloc::string::String;

use crate::buffer::ParsingBuffer;
use crate::error::Error;
use crate::parser::Outcome;
use crate::syntax;

/// Parses CDATA content up to and including `]]>`, entered after the
/// classifier consumed the opening `<![CDATA[`.
#[derive(Clone, Debug, Default)]
pub(crate) struct CdataParser {
    data: String,
}

impl CdataParser {
    pub(crate) fn new() -> Self {
        Self {
            data: String::new(),
        }
    }

    /// The section content. Meaningful only after [`parse`][Self::parse]
    /// returned [`Outcome::Success`].
    pub(crate) fn take_data(&mut self) -> String {
        core::mem::take(&mut self.data)
    }

    pub(crate) fn parse(&mut self, buffer: &mut ParsingBuffer) -> Outcome {
        loop {
            let Some(ch) = buffer.at(0) else {
                return Outcome::NeedMoreData;
            };

            if ch == ']' {
                match buffer.at(1) {
                    None => return Outcome::NeedMoreData,
                    Some(']') => match buffer.at(2) {
                        None => return Outcome::NeedMoreData,
                        Some('>') => {
                            buffer.advance(3);
                            return Outcome::Success;
                        }
                        Some(_) => {
                            self.data.push(']');
                            buffer.advance(1);
                        }
                    },
                    Some(_) => {
                        self.data.push(']');
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::buffer_with;

    #[test]
    fn markup_is_plain_content() {
        let mut buffer = buffer_with(" <greeting> & </greeting> ]]>");
        let mut parser = CdataParser::new();
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!(" <greeting> & </greeting> ", parser.take_data());
    }

    #[test]
    fn brackets_before_the_terminator() {
        // "]]]>" is one ']' of content followed by the terminator.
        let mut buffer = buffer_with("a]]]>");
        let mut parser = CdataParser::new();
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!("a]", parser.take_data());
    }

    #[test]
    fn lone_brackets_are_content() {
        let mut buffer = buffer_with("a]b]>c]]>");
        let mut parser = CdataParser::new();
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!("a]b]>c", parser.take_data());
    }

    #[test]
    fn suspends_inside_the_terminator() {
        let mut buffer = buffer_with("data]]");
        let mut parser = CdataParser::new();
        assert_eq!(Outcome::NeedMoreData, parser.parse(&mut buffer));
        buffer.write_data(b">rest");
        buffer.pump();
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!("data", parser.take_data());
        assert_eq!(Some('r'), buffer.at(0));
    }
}
