//! Comment recognition.

use alloc::string::String;

use crate::buffer::ParsingBuffer;
use crate::error::Error;
use crate::parser::Outcome;
use crate::syntax;

/// Parses comment text up to and including `-->`, entered after the
/// classifier consumed the opening `<!--`.
///
/// A `--` that is not immediately followed by `>` is forbidden inside a
/// comment, which the two-scalar sliding check below rejects as soon as the
/// third scalar is known.
#[derive(Clone, Debug, Default)]
pub(crate) struct CommentParser {
    text: String,
}

impl CommentParser {
    pub(crate) fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// The comment text. Meaningful only after [`parse`][Self::parse]
    /// returned [`Outcome::Success`].
    pub(crate) fn take_text(&mut self) -> String {
        core::mem::take(&mut self.text)
    }

    pub(crate) fn parse(&mut self, buffer: &mut ParsingBuffer) -> Outcome {
        loop {
            let Some(ch) = buffer.at(0) else {
                return Outcome::NeedMoreData;
            };

            if ch == '-' {
                match buffer.at(1) {
                    None => return Outcome::NeedMoreData,
                    Some('-') => match buffer.at(2) {
                        None => return Outcome::NeedMoreData,
                        Some('>') => {
                            buffer.advance(3);
                            return Outcome::Success;
                        }
                        Some(_) => return Outcome::Failed(Error::WellFormednessError),
                    },
                    Some(_) => {
                        self.text.push('-');
                        buffer.advance(1);
                    }
                }
            } else if syntax::is_char(ch) {
                self.text.push(ch);
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
    fn plain_comment() {
        let mut buffer = buffer_with(" a comment -->x");
        let mut parser = CommentParser::new();
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!(" a comment ", parser.take_text());
        assert_eq!(Some('x'), buffer.at(0));
    }

    #[test]
    fn single_dashes_are_allowed() {
        let mut buffer = buffer_with("a - b - c-->");
        let mut parser = CommentParser::new();
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!("a - b - c", parser.take_text());
    }

    #[test]
    fn double_dash_inside_is_rejected() {
        let mut buffer = buffer_with("a -- b -->");
        let mut parser = CommentParser::new();
        assert_eq!(
            Outcome::Failed(Error::WellFormednessError),
            parser.parse(&mut buffer)
        );
    }

    #[test]
    fn trailing_dash_before_terminator_is_rejected() {
        // "a--->" contains "--" followed by "-", not ">".
        let mut buffer = buffer_with("a--->");
        let mut parser = CommentParser::new();
        assert_eq!(
            Outcome::Failed(Error::WellFormednessError),
            parser.parse(&mut buffer)
        );
    }

    #[test]
    fn suspends_inside_the_terminator() {
        let mut buffer = buffer_with("text--");
        let mut parser = CommentParser::new();
        assert_eq!(Outcome::NeedMoreData, parser.parse(&mut buffer));
        buffer.write_data(b">");
        buffer.pump();
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!("text", parser.take_text());
    }
}
