//! Decoded scalar window with a read cursor.

use alloc::vec::Vec;

use crate::decode::{Decoded, Utf8Decoder};
use crate::error::Error;

/// Smallest usable window: the longest fixed lookahead any parser performs is
/// the 9 scalars of `<!DOCTYPE`, with room to spare.
const MIN_SCALAR_CAPACITY: usize = 16;

/// An append-only window of decoded scalars over the byte stream.
///
/// Scalars before the cursor have been examined by the active item parser;
/// scalars at and after it are the unread lookahead. Once a token has been
/// fully recognized, [`erase_to_current_position`][Self::erase_to_current_position]
/// reclaims the examined prefix, which is the only point at which memory is
/// recycled.
///
/// Parsers confirm availability (through [`at`][Self::at] or
/// [`read_ahead`][Self::read_ahead]) before calling [`advance`][Self::advance];
/// the cursor never moves past the decoded length.
#[derive(Clone, Debug)]
pub(crate) struct ParsingBuffer {
    decoder: Utf8Decoder,
    scalars: Vec<char>,
    position: usize,
    capacity: usize,
    erased: u64,
    decoded_any: bool,
    decode_failed: Option<Error>,
}

impl ParsingBuffer {
    pub(crate) fn new(byte_capacity: usize, scalar_capacity: usize) -> Self {
        let capacity = usize::max(scalar_capacity, MIN_SCALAR_CAPACITY);
        Self {
            decoder: Utf8Decoder::new(usize::max(byte_capacity, MIN_SCALAR_CAPACITY)),
            scalars: Vec::with_capacity(capacity),
            position: 0,
            capacity,
            erased: 0,
            decoded_any: false,
            decode_failed: None,
        }
    }

    pub(crate) fn write_data(&mut self, bytes: &[u8]) -> usize {
        self.decoder.write_data(bytes)
    }

    /// Decodes buffered bytes into the window until it is full or the decoder
    /// runs out of complete sequences.
    ///
    /// A decoding failure is latched rather than surfaced immediately: the
    /// scalars decoded before it stay readable, so events already completed
    /// by them are still emitted before the error is reported (through
    /// [`decode_error`][Self::decode_error]) at the point a parser actually
    /// needs the undecodable input.
    ///
    /// A byte order mark decoded at the very start of the document is
    /// discarded here, before any parser can observe it, and does not count
    /// towards the document offset.
    pub(crate) fn pump(&mut self) {
        if self.decode_failed.is_some() {
            return;
        }
        while self.scalars.len() < self.capacity {
            match self.decoder.decode_next() {
                Ok(Decoded::Scalar(scalar)) => {
                    if !self.decoded_any {
                        self.decoded_any = true;
                        if scalar == '\u{FEFF}' {
                            continue;
                        }
                    }
                    self.scalars.push(scalar);
                }
                Ok(Decoded::NeedMore) => break,
                Err(error) => {
                    self.decode_failed = Some(error);
                    break;
                }
            }
        }
    }

    /// The latched decoding failure, if any.
    pub(crate) fn decode_error(&self) -> Option<Error> {
        self.decode_failed
    }

    /// The scalar at `offset` positions after the cursor, if decoded.
    pub(crate) fn at(&self, offset: usize) -> Option<char> {
        self.scalars.get(self.position + offset).copied()
    }

    /// How many scalars, up to `count`, are available from the cursor on.
    pub(crate) fn read_ahead(&self, count: usize) -> usize {
        usize::min(count, self.available())
    }

    pub(crate) fn available(&self) -> usize {
        self.scalars.len() - self.position
    }

    /// Moves the cursor forward by `count` scalars, clamped to the decoded
    /// length.
    pub(crate) fn advance(&mut self, count: usize) {
        debug_assert!(count <= self.available());
        self.position += usize::min(count, self.available());
    }

    /// Discards the examined prefix `[0, cursor)` and resets the cursor.
    pub(crate) fn erase_to_current_position(&mut self) {
        self.erased += self.position as u64;
        self.scalars.drain(..self.position);
        self.position = 0;
    }

    /// Offset of the cursor from the start of the document, in scalars.
    pub(crate) fn absolute_position(&self) -> u64 {
        self.erased + self.position as u64
    }

    /// The window can no longer grow; a token still incomplete at this point
    /// will never complete.
    pub(crate) fn is_full(&self) -> bool {
        self.scalars.len() >= self.capacity
    }

    /// True while any input is waiting to be examined: unread scalars in the
    /// window, undecoded bytes, a partial UTF-8 sequence, or a latched
    /// decoding failure still to be reported.
    pub(crate) fn has_pending_input(&self) -> bool {
        self.available() > 0 || self.decoder.has_pending() || self.decode_failed.is_some()
    }

    /// Live content length, for the bounded-memory invariant.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.scalars.len()
    }

    pub(crate) fn clear(&mut self) {
        self.decoder.clear();
        self.scalars.clear();
        self.position = 0;
        self.erased = 0;
        self.decoded_any = false;
        self.decode_failed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(input: &str) -> ParsingBuffer {
        let mut buffer = ParsingBuffer::new(256, 256);
        assert_eq!(input.len(), buffer.write_data(input.as_bytes()));
        buffer.pump();
        buffer
    }

    #[test]
    fn peek_and_advance() {
        let mut buffer = filled("ab");
        assert_eq!(Some('a'), buffer.at(0));
        assert_eq!(Some('b'), buffer.at(1));
        assert_eq!(None, buffer.at(2));
        assert_eq!(2, buffer.read_ahead(8));
        buffer.advance(1);
        assert_eq!(Some('b'), buffer.at(0));
        assert_eq!(1, buffer.available());
    }

    #[test]
    fn erase_resets_cursor_and_tracks_offset() {
        let mut buffer = filled("abcd");
        buffer.advance(3);
        assert_eq!(3, buffer.absolute_position());
        buffer.erase_to_current_position();
        assert_eq!(Some('d'), buffer.at(0));
        assert_eq!(3, buffer.absolute_position());
        buffer.advance(1);
        assert_eq!(4, buffer.absolute_position());
    }

    #[test]
    fn window_stops_growing_at_capacity() {
        let mut buffer = ParsingBuffer::new(256, 16);
        buffer.write_data("x".repeat(64).as_bytes());
        buffer.pump();
        assert_eq!(16, buffer.len());
        assert!(buffer.is_full());
        buffer.advance(16);
        buffer.erase_to_current_position();
        buffer.pump();
        assert_eq!(16, buffer.len());
    }

    #[test]
    fn byte_order_mark_is_discarded_at_document_start() {
        let mut buffer = ParsingBuffer::new(256, 256);
        buffer.write_data("\u{FEFF}<a".as_bytes());
        buffer.pump();
        assert_eq!(Some('<'), buffer.at(0));
        assert_eq!(0, buffer.absolute_position());
    }

    #[test]
    fn byte_order_mark_elsewhere_is_kept() {
        let mut buffer = filled("a\u{FEFF}b");
        assert_eq!(Some('\u{FEFF}'), buffer.at(1));
    }

    #[test]
    fn pending_input_reflects_partial_sequences() {
        let mut buffer = ParsingBuffer::new(256, 256);
        let euro = "\u{20AC}".as_bytes();
        buffer.write_data(&euro[..2]);
        buffer.pump();
        assert_eq!(0, buffer.available());
        assert!(buffer.has_pending_input());
        buffer.write_data(&euro[2..]);
        buffer.pump();
        assert_eq!(Some('\u{20AC}'), buffer.at(0));
    }
}
