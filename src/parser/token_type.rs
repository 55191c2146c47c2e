//! Lookahead classification of the next item.

use crate::buffer::ParsingBuffer;
use crate::error::Error;
use crate::parser::Outcome;
use crate::syntax;

/// What the classifier decided the next item is.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum TokenTy {
    /// A whitespace scalar at the cursor. Reported without consuming it so
    /// the reader can decide between silently skipping it (prolog, epilog)
    /// and treating it as character data (element content).
    Whitespace,
    /// `<?`
    ProcessingInstruction,
    /// `<!DOCTYPE`
    DocumentType,
    /// `<!--`
    Comment,
    /// `<![CDATA[`
    Cdata,
    /// `<` followed by a name start character.
    StartOfElement,
    /// `</`
    EndOfElement,
    /// Any other scalar: character data at the cursor, also reported without
    /// consuming it.
    TextNode,
}

/// Peeks a short lookahead to classify the next item without committing to a
/// sub-parser.
///
/// The classifier consumes the recognized markup prefix (`<?`, `<!--`,
/// `<![CDATA[`, `<!DOCTYPE`, `<`, `</`) so the follow-up parser starts right
/// behind it; the `Whitespace` and `TextNode` classifications leave the
/// cursor untouched.
#[derive(Clone, Debug)]
pub(crate) struct TokenTypeParser {
    ignore_leading_whitespace: bool,
    token: Option<TokenTy>,
    token_start: u64,
}

impl TokenTypeParser {
    pub(crate) fn new(ignore_leading_whitespace: bool) -> Self {
        Self {
            ignore_leading_whitespace,
            token: None,
            token_start: 0,
        }
    }

    /// Reconfigures a running classifier to skip whitespace from now on.
    pub(crate) fn set_ignore_leading_whitespace(&mut self, ignore: bool) {
        self.ignore_leading_whitespace = ignore;
    }

    /// The classification. Meaningful only after [`parse`][Self::parse]
    /// returned [`Outcome::Success`].
    pub(crate) fn token_found(&self) -> Option<TokenTy> {
        self.token
    }

    /// Document offset, in scalars, of the first scalar of the classified
    /// token.
    pub(crate) fn token_start(&self) -> u64 {
        self.token_start
    }

    pub(crate) fn parse(&mut self, buffer: &mut ParsingBuffer) -> Outcome {
        loop {
            let Some(ch) = buffer.at(0) else {
                return Outcome::NeedMoreData;
            };

            if syntax::is_whitespace(ch) {
                if self.ignore_leading_whitespace {
                    buffer.advance(1);
                    continue;
                }
                return self.found(TokenTy::Whitespace, buffer);
            }

            if ch != '<' {
                return self.found(TokenTy::TextNode, buffer);
            }

            self.token_start = buffer.absolute_position();
            let Some(second) = buffer.at(1) else {
                return Outcome::NeedMoreData;
            };
            return match second {
                '?' => {
                    buffer.advance(2);
                    self.classified(TokenTy::ProcessingInstruction)
                }
                '/' => {
                    buffer.advance(2);
                    self.classified(TokenTy::EndOfElement)
                }
                '!' => self.classify_exclamation_mark(buffer),
                ch if syntax::is_name_start_char(ch) => {
                    buffer.advance(1);
                    self.classified(TokenTy::StartOfElement)
                }
                _ => Outcome::Failed(Error::SyntaxError),
            };
        }
    }

    /// Distinguishes `<!--`, `<![CDATA[` and `<!DOCTYPE`, the only items a
    /// `<!` may open.
    fn classify_exclamation_mark(&mut self, buffer: &mut ParsingBuffer) -> Outcome {
        let Some(third) = buffer.at(2) else {
            return Outcome::NeedMoreData;
        };
        match third {
            '-' => match buffer.at(3) {
                None => Outcome::NeedMoreData,
                Some('-') => {
                    buffer.advance(4);
                    self.classified(TokenTy::Comment)
                }
                Some(_) => Outcome::Failed(Error::SyntaxError),
            },
            '[' => self.classify_keyword(buffer, "[CDATA[", TokenTy::Cdata),
            'D' => self.classify_keyword(buffer, "DOCTYPE", TokenTy::DocumentType),
            _ => Outcome::Failed(Error::SyntaxError),
        }
    }

    fn classify_keyword(
        &mut self,
        buffer: &mut ParsingBuffer,
        keyword: &str,
        token: TokenTy,
    ) -> Outcome {
        let needed = 2 + keyword.len();
        let available = buffer.read_ahead(needed);
        for (index, expected) in keyword.chars().take(available.saturating_sub(2)).enumerate() {
            match buffer.at(2 + index) {
                Some(ch) if ch == expected => {}
                _ => return Outcome::Failed(Error::SyntaxError),
            }
        }
        if available < needed {
            return Outcome::NeedMoreData;
        }
        buffer.advance(needed);
        self.classified(token)
    }

    fn found(&mut self, token: TokenTy, buffer: &ParsingBuffer) -> Outcome {
        self.token_start = buffer.absolute_position();
        self.classified(token)
    }

    fn classified(&mut self, token: TokenTy) -> Outcome {
        self.token = Some(token);
        Outcome::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::buffer_with;

    fn classify(input: &str) -> (Outcome, Option<TokenTy>) {
        let mut buffer = buffer_with(input);
        let mut parser = TokenTypeParser::new(false);
        let outcome = parser.parse(&mut buffer);
        (outcome, parser.token_found())
    }

    #[test]
    fn classifies_markup_prefixes() {
        assert_eq!(
            (Outcome::Success, Some(TokenTy::ProcessingInstruction)),
            classify("<?pi?>")
        );
        assert_eq!(
            (Outcome::Success, Some(TokenTy::DocumentType)),
            classify("<!DOCTYPE r>")
        );
        assert_eq!((Outcome::Success, Some(TokenTy::Comment)), classify("<!-- c -->"));
        assert_eq!(
            (Outcome::Success, Some(TokenTy::Cdata)),
            classify("<![CDATA[x]]>")
        );
        assert_eq!(
            (Outcome::Success, Some(TokenTy::StartOfElement)),
            classify("<root>")
        );
        assert_eq!(
            (Outcome::Success, Some(TokenTy::EndOfElement)),
            classify("</root>")
        );
    }

    #[test]
    fn consumes_the_classified_prefix() {
        let mut buffer = buffer_with("<![CDATA[x]]>");
        let mut parser = TokenTypeParser::new(false);
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!(Some('x'), buffer.at(0));
    }

    #[test]
    fn whitespace_and_text_are_not_consumed() {
        let mut buffer = buffer_with(" <a>");
        let mut parser = TokenTypeParser::new(false);
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!(Some(TokenTy::Whitespace), parser.token_found());
        assert_eq!(Some(' '), buffer.at(0));

        let mut buffer = buffer_with("abc<");
        let mut parser = TokenTypeParser::new(false);
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!(Some(TokenTy::TextNode), parser.token_found());
        assert_eq!(Some('a'), buffer.at(0));
    }

    #[test]
    fn skips_whitespace_when_configured() {
        let mut buffer = buffer_with("  \t\r\n<a>");
        let mut parser = TokenTypeParser::new(true);
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!(Some(TokenTy::StartOfElement), parser.token_found());
        assert_eq!(5, parser.token_start());
    }

    #[test]
    fn suspends_on_partial_prefixes() {
        for partial in ["<", "<!", "<!-", "<![CD", "<!DOCTY"] {
            let mut buffer = buffer_with(partial);
            let mut parser = TokenTypeParser::new(false);
            assert_eq!(Outcome::NeedMoreData, parser.parse(&mut buffer), "{partial}");
        }
    }

    #[test]
    fn rejects_unknown_markup() {
        let (outcome, _) = classify("<!ENTITY x>");
        assert_eq!(Outcome::Failed(Error::SyntaxError), outcome);
        let (outcome, _) = classify("<!DOCTYP x>");
        assert_eq!(Outcome::Failed(Error::SyntaxError), outcome);
        let (outcome, _) = classify("<1bad>");
        assert_eq!(Outcome::Failed(Error::SyntaxError), outcome);
    }

    #[test]
    fn reconfigures_while_running() {
        let mut buffer = buffer_with("  <a>");
        let mut parser = TokenTypeParser::new(false);
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!(Some(TokenTy::Whitespace), parser.token_found());

        parser.set_ignore_leading_whitespace(true);
        assert_eq!(Outcome::Success, parser.parse(&mut buffer));
        assert_eq!(Some(TokenTy::StartOfElement), parser.token_found());
    }
}
