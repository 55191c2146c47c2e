//! Incremental UTF-8 decoding on top of the byte sink.

use crate::error::Error;
use crate::sink::ByteSink;

/// Outcome of asking the decoder for the next scalar.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Decoded {
    /// A complete Unicode scalar value.
    Scalar(char),
    /// The remaining bytes do not complete a sequence; more input is needed.
    NeedMore,
}

/// Decodes the pushed byte stream into Unicode scalar values.
///
/// A multi-byte sequence may be split across `write_data` calls at any point.
/// The bytes of an incomplete sequence are kept in a small scratch register so
/// that decoding resumes exactly where it stopped once more bytes arrive.
///
/// Every malformed sequence is reported as [`Error::InvalidEncoding`]:
/// unexpected continuation bytes, overlong encodings, surrogates
/// (U+D800..=U+DFFF) and values above U+10FFFF.
#[derive(Clone, Debug)]
pub(crate) struct Utf8Decoder {
    sink: ByteSink,
    pending: [u8; 4],
    pending_len: u8,
    pending_need: u8,
}

impl Utf8Decoder {
    pub(crate) fn new(byte_capacity: usize) -> Self {
        Self {
            sink: ByteSink::new(byte_capacity),
            pending: [0; 4],
            pending_len: 0,
            pending_need: 0,
        }
    }

    pub(crate) fn write_data(&mut self, bytes: &[u8]) -> usize {
        self.sink.write_data(bytes)
    }

    /// True while undecoded bytes are buffered, including a partial sequence
    /// in the scratch register.
    pub(crate) fn has_pending(&self) -> bool {
        self.pending_len > 0 || self.sink.used() > 0
    }

    pub(crate) fn clear(&mut self) {
        self.sink.clear();
        self.pending_len = 0;
        self.pending_need = 0;
    }

    /// Decodes the next scalar, pulling bytes from the sink.
    pub(crate) fn decode_next(&mut self) -> Result<Decoded, Error> {
        loop {
            let Some(byte) = self.sink.read_byte() else {
                return Ok(Decoded::NeedMore);
            };
            self.sink.consume(1);

            if self.pending_len == 0 {
                match byte {
                    0x00..=0x7F => {
                        return char::from_u32(u32::from(byte))
                            .map(Decoded::Scalar)
                            .ok_or(Error::InvalidEncoding);
                    }
                    0xC2..=0xDF => self.start_sequence(byte, 2),
                    0xE0..=0xEF => self.start_sequence(byte, 3),
                    0xF0..=0xF4 => self.start_sequence(byte, 4),
                    // Stray continuation bytes and the overlong/out of range
                    // lead bytes 0xC0, 0xC1 and 0xF5..=0xFF.
                    _ => return Err(Error::InvalidEncoding),
                }
                continue;
            }

            if !self.accepts_continuation(byte) {
                return Err(Error::InvalidEncoding);
            }
            self.pending[usize::from(self.pending_len)] = byte;
            self.pending_len += 1;

            if self.pending_len == self.pending_need {
                return self.compose().map(Decoded::Scalar);
            }
        }
    }

    fn start_sequence(&mut self, lead: u8, need: u8) {
        self.pending[0] = lead;
        self.pending_len = 1;
        self.pending_need = need;
    }

    /// Range checks for the byte following the lead byte reject overlong
    /// encodings, surrogates and values above U+10FFFF up front; later
    /// continuation bytes only have to be in 0x80..=0xBF.
    fn accepts_continuation(&self, byte: u8) -> bool {
        if self.pending_len == 1 {
            match self.pending[0] {
                0xE0 => matches!(byte, 0xA0..=0xBF),
                0xED => matches!(byte, 0x80..=0x9F),
                0xF0 => matches!(byte, 0x90..=0xBF),
                0xF4 => matches!(byte, 0x80..=0x8F),
                _ => matches!(byte, 0x80..=0xBF),
            }
        } else {
            matches!(byte, 0x80..=0xBF)
        }
    }

    fn compose(&mut self) -> Result<char, Error> {
        let len = usize::from(self.pending_len);
        let mut value = match len {
            2 => u32::from(self.pending[0] & 0b0001_1111),
            3 => u32::from(self.pending[0] & 0b0000_1111),
            _ => u32::from(self.pending[0] & 0b0000_0111),
        };
        for &byte in &self.pending[1..len] {
            value = (value << 6) | u32::from(byte & 0b0011_1111);
        }
        self.pending_len = 0;
        self.pending_need = 0;
        char::from_u32(value).ok_or(Error::InvalidEncoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(decoder: &mut Utf8Decoder) -> Result<alloc::string::String, Error> {
        let mut out = alloc::string::String::new();
        loop {
            match decoder.decode_next()? {
                Decoded::Scalar(ch) => out.push(ch),
                Decoded::NeedMore => return Ok(out),
            }
        }
    }

    #[test]
    fn ascii() {
        let mut decoder = Utf8Decoder::new(16);
        decoder.write_data(b"abc");
        assert_eq!(Ok(alloc::string::String::from("abc")), decode_all(&mut decoder));
    }

    #[test]
    fn multi_byte_scalars() {
        let mut decoder = Utf8Decoder::new(32);
        let input = "å\u{1F600}\u{4E16}";
        decoder.write_data(input.as_bytes());
        assert_eq!(Ok(alloc::string::String::from(input)), decode_all(&mut decoder));
    }

    #[test]
    fn sequence_split_across_writes() {
        let mut decoder = Utf8Decoder::new(16);
        let bytes = "\u{20AC}".as_bytes();
        decoder.write_data(&bytes[..1]);
        assert_eq!(Ok(Decoded::NeedMore), decoder.decode_next());
        decoder.write_data(&bytes[1..2]);
        assert_eq!(Ok(Decoded::NeedMore), decoder.decode_next());
        assert!(decoder.has_pending());
        decoder.write_data(&bytes[2..]);
        assert_eq!(Ok(Decoded::Scalar('\u{20AC}')), decoder.decode_next());
        assert!(!decoder.has_pending());
    }

    #[test]
    fn rejects_stray_continuation_byte() {
        let mut decoder = Utf8Decoder::new(16);
        decoder.write_data(&[0x80]);
        assert_eq!(Err(Error::InvalidEncoding), decoder.decode_next());
    }

    #[test]
    fn rejects_overlong_two_byte_encoding() {
        let mut decoder = Utf8Decoder::new(16);
        // 0xC0 0xAF would be an overlong encoding of '/'.
        decoder.write_data(&[0xC0, 0xAF]);
        assert_eq!(Err(Error::InvalidEncoding), decoder.decode_next());
    }

    #[test]
    fn rejects_overlong_three_byte_encoding() {
        let mut decoder = Utf8Decoder::new(16);
        // 0xE0 0x80 0x80 would be an overlong encoding of U+0000.
        decoder.write_data(&[0xE0, 0x80, 0x80]);
        assert_eq!(Err(Error::InvalidEncoding), decoder.decode_next());
    }

    #[test]
    fn rejects_surrogates() {
        let mut decoder = Utf8Decoder::new(16);
        // 0xED 0xA0 0x80 would encode the surrogate U+D800.
        decoder.write_data(&[0xED, 0xA0, 0x80]);
        assert_eq!(Err(Error::InvalidEncoding), decoder.decode_next());
    }

    #[test]
    fn rejects_values_above_u10ffff() {
        let mut decoder = Utf8Decoder::new(16);
        // 0xF4 0x90 0x80 0x80 would encode U+110000.
        decoder.write_data(&[0xF4, 0x90, 0x80, 0x80]);
        assert_eq!(Err(Error::InvalidEncoding), decoder.decode_next());
    }

    #[test]
    fn rejects_truncated_sequence_followed_by_ascii() {
        let mut decoder = Utf8Decoder::new(16);
        // Lead byte of a 2-byte sequence followed by ASCII.
        decoder.write_data(&[0xC3, b'a']);
        assert_eq!(Err(Error::InvalidEncoding), decoder.decode_next());
    }
}
