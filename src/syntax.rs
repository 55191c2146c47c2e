//! The XML 1.0 lexical contract: character classes, production validators and
//! escaping.
//!
//! Everything in this module is a pure function over scalars or strings. The
//! item parsers and any producer of XML (for instance a writer emitting
//! attribute values via [`escape_att_value`]) share these definitions so that
//! both sides agree on exactly the same character sets.

use alloc::string::String;

use crate::event::QuotationMark;

/// The `S` production: space, tab, carriage return or line feed.
#[inline]
#[must_use]
pub const fn is_whitespace(ch: char) -> bool {
    matches!(ch, '\u{20}' | '\u{9}' | '\u{D}' | '\u{A}')
}

/// The `Char` production.
#[inline]
#[must_use]
pub const fn is_char(ch: char) -> bool {
    matches!(ch,
        '\u{9}'
        | '\u{A}'
        | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{1_0000}'..='\u{10_FFFF}')
}

/// The `NameStartChar` production.
#[inline]
#[must_use]
pub const fn is_name_start_char(ch: char) -> bool {
    matches!(ch,
        ':'
        | 'A'..='Z'
        | '_'
        | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{1_0000}'..='\u{E_FFFF}')
}

/// The `NameChar` production.
#[inline]
#[must_use]
pub const fn is_name_char(ch: char) -> bool {
    is_name_start_char(ch)
        || matches!(ch,
            '-'
            | '.'
            | '0'..='9'
            | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// Whether `value` matches the `Name` production.
#[must_use]
pub fn is_valid_name(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

/// Whether `value` is usable as a processing instruction target: a `Name`
/// which is not the reserved `xml` in any casing.
#[must_use]
pub fn is_valid_pi_target(value: &str) -> bool {
    is_valid_name(value) && !value.eq_ignore_ascii_case("xml")
}

/// Whether `value` matches the `EncName` production.
#[must_use]
pub fn is_valid_enc_name(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'))
        }
        _ => false,
    }
}

/// Whether `value` matches the `VersionNum` production (`1.` followed by
/// digits).
#[must_use]
pub fn is_valid_version_num(value: &str) -> bool {
    match value.strip_prefix("1.") {
        Some(minor) => !minor.is_empty() && minor.chars().all(|ch| ch.is_ascii_digit()),
        None => false,
    }
}

/// Whether `value` matches the `AttValue` production in its escaped form:
/// no literal `<`, and `&` only as a resolvable reference.
#[must_use]
pub fn is_valid_att_value(value: &str) -> bool {
    references_resolve(value) && !value.contains('<') && value.chars().all(is_char)
}

/// Whether `value` is acceptable as escaped character data in element
/// content: the `AttValue` rules plus the `]]>` exclusion.
#[must_use]
pub fn is_valid_text_node(value: &str) -> bool {
    is_valid_att_value(value) && !value.contains("]]>")
}

/// Whether `value` is acceptable as comment text: `Char`s only, no `--`, and
/// no trailing `-` (which would form `--` with the terminator).
#[must_use]
pub fn is_valid_comment_text(value: &str) -> bool {
    value.chars().all(is_char) && !value.contains("--") && !value.ends_with('-')
}

fn references_resolve(value: &str) -> bool {
    let mut rest = value;
    while let Some(index) = rest.find('&') {
        let after = &rest[index + 1..];
        let Some(end) = after.find(';') else {
            return false;
        };
        if resolve_reference(&after[..end]).is_none() {
            return false;
        }
        rest = &after[end + 1..];
    }
    true
}

/// Resolves the body of a reference (the text between `&` and `;`): one of
/// the five predefined entities, or a decimal/hexadecimal character
/// reference whose value satisfies `Char`.
#[must_use]
pub(crate) fn resolve_reference(body: &str) -> Option<char> {
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => {
            let digits = body.strip_prefix('#')?;
            let value = if let Some(hex) = digits.strip_prefix('x') {
                if hex.is_empty() || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
                    return None;
                }
                u32::from_str_radix(hex, 16).ok()?
            } else {
                if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
                    return None;
                }
                digits.parse::<u32>().ok()?
            };
            let ch = char::from_u32(value)?;
            if is_char(ch) {
                Some(ch)
            } else {
                None
            }
        }
    }
}

/// Escapes `value` for use as an attribute value delimited by `quotation`.
///
/// `<` and `&` are always escaped; of the two quote characters only the one
/// acting as the delimiter is.
#[must_use]
pub fn escape_att_value(value: &str, quotation: QuotationMark) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '&' => escaped.push_str("&amp;"),
            '"' if matches!(quotation, QuotationMark::Quote) => escaped.push_str("&quot;"),
            '\'' if matches!(quotation, QuotationMark::Apostrophe) => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
