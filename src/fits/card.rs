//! Fixed-width 80-byte header cards.
//!
//! A card is an 8-byte label followed by an optional `"= "` indicator and a
//! value. Numeric values are read from columns 11–30 (right-justified), string
//! values are enclosed in single quotes starting at column 11.
//!
//! This module provides:
//! * [`Card`] – a normalized 80-byte card (label uppercased, NUL/newline blanked),
//! * value decoders ([`Card::int_value`], [`Card::real_value`], [`Card::string_value`]),
//! * card builders matching the classic fixed formats
//!   (`"%-8.8s= %20d"`, `"%-8.8s= %20.7e"`, `"%-8.8s= '%-1.68s'"`).
use std::fmt;

use nom::{
    character::complete::{i64 as nom_i64, space0},
    number::complete::double,
    sequence::preceded,
    IResult,
};

use crate::constants::{CARD_LEN, LABEL_LEN};

/// Column (0-based) where the value field starts.
const VALUE_START: usize = 10;
/// Column (0-based, exclusive) where the numeric value field stops.
const VALUE_END: usize = 30;

/// One 80-byte header card.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Card([u8; CARD_LEN]);

impl Card {
    /// Build a card from free text.
    ///
    /// The text is truncated (or blank padded) to 80 bytes. A NUL or newline
    /// byte blanks the rest of the card, and the 8-byte label is uppercased.
    pub fn new(text: &str) -> Self {
        let mut bytes = [b' '; CARD_LEN];
        for (slot, &b) in bytes.iter_mut().zip(text.as_bytes()) {
            if b == 0 || b == b'\n' {
                break;
            }
            *slot = b;
        }
        bytes[..LABEL_LEN].make_ascii_uppercase();
        Card(bytes)
    }

    /// Wrap raw bytes read from a file, with the same normalization as [`Card::new`].
    pub fn from_raw(raw: &[u8; CARD_LEN]) -> Self {
        let mut bytes = *raw;
        if let Some(cut) = bytes.iter().position(|&b| b == 0 || b == b'\n') {
            bytes[cut..].fill(b' ');
        }
        bytes[..LABEL_LEN].make_ascii_uppercase();
        Card(bytes)
    }

    pub fn blank() -> Self {
        Card([b' '; CARD_LEN])
    }

    pub fn end() -> Self {
        Card::new("END")
    }

    /// `label = integer`
    pub fn int(label: &str, value: i64) -> Self {
        Card::new(&format!("{:<8.8}= {:>20}", label, value))
    }

    /// `label = real`, written as a 7-digit exponential.
    pub fn real(label: &str, value: f64) -> Self {
        Card::new(&format!("{:<8.8}= {:>20}", label, c_exponential(value, 7)))
    }

    /// `label = 'string'`, the string is cut at 68 characters.
    pub fn string(label: &str, value: &str) -> Self {
        let value: String = value.chars().take(68).collect();
        Card::new(&format!("{:<8.8}= '{}'", label, value))
    }

    pub fn comment(text: &str) -> Self {
        let text: String = text.chars().take(72).collect();
        Card::new(&format!("COMMENT {text}"))
    }

    pub fn history(text: &str) -> Self {
        let text: String = text.chars().take(72).collect();
        Card::new(&format!("HISTORY {text}"))
    }

    pub fn as_bytes(&self) -> &[u8; CARD_LEN] {
        &self.0
    }

    /// The 8-byte label, blank padded.
    pub fn label_bytes(&self) -> &[u8] {
        &self.0[..LABEL_LEN]
    }

    /// The label without its trailing blanks.
    pub fn label(&self) -> String {
        String::from_utf8_lossy(self.label_bytes())
            .trim_end()
            .to_string()
    }

    /// `true` if the label matches `label` over the full 8 columns.
    pub fn has_label(&self, label: &str) -> bool {
        self.label_bytes() == padded_label(label).as_slice()
    }

    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|&b| b == b' ')
    }

    pub fn has_blank_label(&self) -> bool {
        self.label_bytes().iter().all(|&b| b == b' ')
    }

    pub fn is_end(&self) -> bool {
        self.has_label("END")
    }

    fn numeric_field(&self) -> String {
        String::from_utf8_lossy(&self.0[VALUE_START..VALUE_END]).to_string()
    }

    /// Integer value in columns 11–30.
    ///
    /// A real-valued field is truncated toward zero.
    pub fn int_value(&self) -> Option<i64> {
        let field = self.numeric_field();
        if let Ok((_, v)) = parse_int(&field) {
            return Some(v);
        }
        self.real_value().map(|v| v as i64)
    }

    /// Real value in columns 11–30.
    pub fn real_value(&self) -> Option<f64> {
        let field = self.numeric_field().replace(|c: char| c == 'D' || c == 'd', "E");
        parse_real(&field).ok().map(|(_, v)| v)
    }

    /// String value enclosed in single quotes from column 11.
    ///
    /// The text runs to the closing quote or to the end of the card, trailing
    /// blanks are trimmed. `None` if column 11 does not hold a quote.
    pub fn string_value(&self) -> Option<String> {
        if self.0[VALUE_START] != b'\'' {
            return None;
        }
        let rest = &self.0[VALUE_START + 1..];
        let stop = rest.iter().position(|&b| b == b'\'').unwrap_or(rest.len());
        Some(
            String::from_utf8_lossy(&rest[..stop])
                .trim_end()
                .to_string(),
        )
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({:?})", String::from_utf8_lossy(&self.0).trim_end())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Label uppercased and blank padded (or truncated) to 8 bytes.
pub fn padded_label(label: &str) -> [u8; LABEL_LEN] {
    let mut out = [b' '; LABEL_LEN];
    for (slot, b) in out.iter_mut().zip(label.bytes()) {
        *slot = b.to_ascii_uppercase();
    }
    out
}

fn parse_int(input: &str) -> IResult<&str, i64> {
    let (rest, v) = preceded(space0, nom_i64)(input)?;
    // a trailing '.', 'E' or digit means the field is not an integer
    match rest.chars().next() {
        Some(c) if c == '.' || c.eq_ignore_ascii_case(&'e') => Err(nom::Err::Error(
            nom::error::Error::new(rest, nom::error::ErrorKind::Digit),
        )),
        _ => Ok((rest, v)),
    }
}

fn parse_real(input: &str) -> IResult<&str, f64> {
    preceded(space0, double)(input)
}

/// Format `value` like C's `%.{prec}e` (mantissa, `e`, sign, at least two exponent digits).
pub(crate) fn c_exponential(value: f64, prec: usize) -> String {
    let formatted = format!("{:.*e}", prec, value);
    match formatted.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}
