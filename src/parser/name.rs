//! The `Name` building block shared by the tag, attribute, doctype and
//! processing instruction parsers.

use alloc::string::String;

use crate::buffer::ParsingBuffer;
use crate::error::Error;
use crate::parser::Outcome;
use crate::syntax;

/// Reads one `Name` from the cursor.
///
/// The first scalar has to satisfy `NameStartChar`, every following one
/// `NameChar`. The name ends at the first non-`NameChar` scalar, which is
/// left in the buffer for the surrounding parser; recognizing the end
/// therefore always requires one scalar of lookahead.
#[derive(Clone, Debug, Default)]
pub(crate) struct NameParser {
    name: String,
}

impl NameParser {
    pub(crate) fn new() -> Self {
        Self {
            name: String::new(),
        }
    }

    pub(crate) fn parse(&mut self, buffer: &mut ParsingBuffer) -> Outcome {
        loop {
            let Some(ch) = buffer.at(0) else {
                return Outcome::NeedMoreData;
            };

            if self.name.is_empty() {
                if !syntax::is_name_start_char(ch) {
                    return Outcome::Failed(Error::SyntaxError);
                }
            } else if !syntax::is_name_char(ch) {
                return Outcome::Success;
            }

            self.name.push(ch);
            buffer.advance(1);
        }
    }

    /// The recognized name. Meaningful only after [`parse`][Self::parse]
    /// returned [`Outcome::Success`].
    pub(crate) fn take_name(&mut self) -> String {
        core::mem::take(&mut self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::buffer_with;

    #[test]
    fn reads_until_terminator() {
        let mut buffer = buffer_with("greeting>");
        let mut parser = NameParser::new();
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!("greeting", parser.take_name());
        assert_eq!(Some('>'), buffer.at(0));
    }

    #[test]
    fn suspends_without_terminator() {
        let mut buffer = buffer_with("gree");
        let mut parser = NameParser::new();
        assert_eq!(Outcome::NeedMoreData, parser.parse(&mut buffer));
        buffer.write_data(b"ting ");
        buffer.pump();
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!("greeting", parser.take_name());
    }

    #[test]
    fn rejects_invalid_start() {
        let mut buffer = buffer_with("1abc ");
        let mut parser = NameParser::new();
        assert_eq!(Outcome::Failed(Error::SyntaxError), parser.parse(&mut buffer));
    }
}
