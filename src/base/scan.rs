//! Parsing of data from its representation format.
//!
//! This module provides the traits that connect the zone file scanner with
//! the record data types. A [`Scanner`] hands out the tokens of a single
//! entry and a type implementing [`Scan`] knows how to build itself from
//! them.

use core::fmt;
use core::str::FromStr;
use std::net::{Ipv4Addr, Ipv6Addr};

use bytes::Bytes;

use super::name::Name;
use super::ttl::Ttl;

//============ Scanning Traits ===============================================

//------------ Scan ---------------------------------------------------------

/// A type that can be scanned from its representation format.
pub trait Scan<S: Scanner>: Sized {
    fn scan(scanner: &mut S) -> Result<Self, S::Error>;
}

macro_rules! impl_scan_unsigned {
    ( $type:ident) => {
        impl<S: Scanner> Scan<S> for $type {
            fn scan(scanner: &mut S) -> Result<Self, S::Error> {
                let mut res: $type = 0;
                scanner.scan_symbols(|ch| {
                    res = res.checked_mul(10).ok_or_else(|| {
                        S::Error::custom("decimal number overflow")
                    })?;
                    res = res
                        .checked_add(ch.into_digit(10).map_err(|_| {
                            S::Error::custom("expected decimal number")
                        })? as $type)
                        .ok_or_else(|| {
                            S::Error::custom("decimal number overflow")
                        })?;
                    Ok(())
                })?;
                Ok(res)
            }
        }
    };
}

impl_scan_unsigned!(u8);
impl_scan_unsigned!(u16);
impl_scan_unsigned!(u32);

impl<S: Scanner> Scan<S> for Ipv4Addr {
    fn scan(scanner: &mut S) -> Result<Self, S::Error> {
        scanner.scan_ascii_str(|s| {
            Ipv4Addr::from_str(s)
                .map_err(|_| S::Error::custom("expected IPv4 address"))
        })
    }
}

impl<S: Scanner> Scan<S> for Ipv6Addr {
    fn scan(scanner: &mut S) -> Result<Self, S::Error> {
        scanner.scan_ascii_str(|s| {
            Ipv6Addr::from_str(s)
                .map_err(|_| S::Error::custom("expected IPv6 address"))
        })
    }
}

impl<S: Scanner> Scan<S> for Ttl {
    /// Scans a time value, allowing a single unit suffix.
    fn scan(scanner: &mut S) -> Result<Self, S::Error> {
        scanner.scan_ascii_str(|s| {
            Ttl::from_str(s).map_err(|err| S::Error::custom(err.as_str()))
        })
    }
}

impl<S: Scanner> Scan<S> for Name {
    fn scan(scanner: &mut S) -> Result<Self, S::Error> {
        scanner.scan_name()
    }
}

//------------ Scanner -------------------------------------------------------

/// A type that can produce tokens of data in representation format.
///
/// A scanner covers exactly one entry. The methods consume one token each,
/// except for [`scan_charstr_entry`][Self::scan_charstr_entry] which
/// consumes all remaining tokens.
pub trait Scanner {
    type Error: ScannerError;

    /// Returns whether the next token is preceded by white space.
    fn has_space(&self) -> bool;

    /// Returns whether there are more tokens in the entry.
    fn continues(&mut self) -> bool;

    /// Scans a token into a sequence of symbols.
    ///
    /// Each symbol is passed to `op` in turn.
    fn scan_symbols<F>(&mut self, op: F) -> Result<(), Self::Error>
    where
        F: FnMut(Symbol) -> Result<(), Self::Error>;

    /// Scans a token that must consist of ASCII characters only.
    ///
    /// The token, with escape sequences resolved, is passed to `op`.
    fn scan_ascii_str<F, T>(&mut self, op: F) -> Result<T, Self::Error>
    where
        F: FnOnce(&str) -> Result<T, Self::Error>;

    /// Scans a token into an octets sequence.
    fn scan_octets(&mut self) -> Result<Bytes, Self::Error>;

    /// Scans a token into a domain name.
    ///
    /// Relative names are completed with the current origin.
    fn scan_name(&mut self) -> Result<Name, Self::Error>;

    /// Scans a token into a single character string.
    ///
    /// Fails if the token is longer than 255 octets.
    fn scan_charstr(&mut self) -> Result<Bytes, Self::Error>;

    /// Scans the remaining tokens of the entry as character strings.
    ///
    /// How tokens longer than 255 octets are treated is up to the scanner.
    /// It may split them into several character strings or fail.
    fn scan_charstr_entry(&mut self) -> Result<Vec<Bytes>, Self::Error>;

    /// Skips over the `\#` marker of the generic record data format.
    ///
    /// Returns whether the marker was present.
    fn scan_opt_unknown_marker(&mut self) -> Result<bool, Self::Error>;
}

//------------ ScannerError --------------------------------------------------

/// A type providing error information for a scanner.
pub trait ScannerError: Sized + std::error::Error {
    /// Creates a new error wrapping a supplied error message.
    fn custom(msg: &'static str) -> Self;

    /// Creates an error when more tokens were expected in the entry.
    fn end_of_entry() -> Self;

    /// Creates an error when the end of the input was reached early.
    fn short_buf() -> Self;

    /// Creates an error when there are trailing tokens.
    fn trailing_tokens() -> Self;
}

//============ Zone file symbol ==============================================

//------------ Symbol --------------------------------------------------------

/// The zone file representation of a single character.
///
/// This is either a regular character or an escape sequence. See the variants
/// for more details.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Symbol {
    /// An unescaped Unicode character.
    Char(char),

    /// A character escaped via a preceding backslash.
    ///
    /// This escape sequence is only allowed for printable ASCII characters.
    SimpleEscape(u8),

    /// A raw octet escaped using the decimal escape sequence.
    ///
    /// This escape sequence consists of a backslash followed by exactly three
    /// decimal digits with the value of the octets.
    DecimalEscape(u8),
}

impl Symbol {
    /// Reads a symbol from a character source.
    ///
    /// Returns the next symbol in the source, `Ok(None)` if the source has
    /// been exhausted, or an error if there wasn’t a valid symbol.
    pub fn from_chars<C>(chars: C) -> Result<Option<Self>, SymbolCharsError>
    where
        C: IntoIterator<Item = char>,
    {
        let mut chars = chars.into_iter();
        let ch = match chars.next() {
            Some(ch) => ch,
            None => return Ok(None),
        };
        if ch != '\\' {
            return Ok(Some(Symbol::Char(ch)));
        }
        match chars.next() {
            Some(ch) if ch.is_ascii_digit() => {
                let mut value = ch as u32 - '0' as u32;
                for _ in 0..2 {
                    match chars.next() {
                        Some(ch) if ch.is_ascii_digit() => {
                            value = value * 10 + (ch as u32 - '0' as u32);
                        }
                        Some(_) => return Err(SymbolCharsError::BadEscape),
                        None => return Err(SymbolCharsError::ShortInput),
                    }
                }
                u8::try_from(value)
                    .map(|value| Some(Symbol::DecimalEscape(value)))
                    .map_err(|_| SymbolCharsError::BadEscape)
            }
            Some(ch) if ch.is_ascii() && !ch.is_ascii_control() => {
                Ok(Some(Symbol::SimpleEscape(ch as u8)))
            }
            Some(_) => Err(SymbolCharsError::BadEscape),
            None => Err(SymbolCharsError::ShortInput),
        }
    }

    /// Reads a symbol from the given position in an octets slice.
    ///
    /// Returns the symbol and the index of the octet following it if there
    /// is one, `Ok(None)` if `pos` is at the end of the slice, or an error
    /// if there wasn’t a valid symbol.
    pub fn from_slice_index(
        octets: &[u8],
        pos: usize,
    ) -> Result<Option<(Symbol, usize)>, SymbolOctetsError> {
        let c1 = match octets.get(pos) {
            Some(c1) => *c1,
            None => return Ok(None),
        };
        let pos = pos + 1;

        if c1 == b'\\' {
            // Escape sequence

            // Get the next octet.
            let c2 = match octets.get(pos) {
                Some(c2) => *c2,
                None => return Err(SymbolOctetsError::ShortInput),
            };
            let pos = pos + 1;

            if c2.is_ascii_control() || !c2.is_ascii() {
                // Only printable ASCII characters allowed.
                return Err(SymbolOctetsError::BadEscape);
            } else if !c2.is_ascii_digit() {
                // Simple escape.
                return Ok(Some((Symbol::SimpleEscape(c2), pos)));
            }

            // Get two more octets.
            let mut value = u32::from(c2 - b'0');
            for i in 0..2 {
                match octets.get(pos + i) {
                    Some(c) if c.is_ascii_digit() => {
                        value = value * 10 + u32::from(c - b'0');
                    }
                    Some(_) => return Err(SymbolOctetsError::BadEscape),
                    None => return Err(SymbolOctetsError::ShortInput),
                }
            }

            Ok(Some((
                Symbol::DecimalEscape(
                    u8::try_from(value)
                        .map_err(|_| SymbolOctetsError::BadEscape)?,
                ),
                pos + 2,
            )))
        } else if c1 < 0x80 {
            // ASCII is single byte.
            Ok(Some((Symbol::Char(c1.into()), pos)))
        } else {
            // UTF-8 encoded character. The leading octet tells us how many
            // continuation octets follow.
            let len = if c1 & 0b1110_0000 == 0b1100_0000 {
                2
            } else if c1 & 0b1111_0000 == 0b1110_0000 {
                3
            } else if c1 & 0b1111_1000 == 0b1111_0000 {
                4
            } else {
                return Err(SymbolOctetsError::BadUtf8);
            };
            let end = pos - 1 + len;
            let slice = match octets.get(pos - 1..end) {
                Some(slice) => slice,
                None => return Err(SymbolOctetsError::ShortInput),
            };
            let ch = core::str::from_utf8(slice)
                .ok()
                .and_then(|s| s.chars().next())
                .ok_or(SymbolOctetsError::BadUtf8)?;
            Ok(Some((Symbol::Char(ch), end)))
        }
    }

    /// Converts the symbol into an octet if it represents one.
    ///
    /// Both domain names and character strings operate on bytes instead of
    /// (Unicode) characters. These bytes can be represented by printable
    /// ASCII characters (that is, U+0020 to U+007E), both plain or through
    /// a simple escape, or by a decimal escape.
    pub fn into_octet(self) -> Result<u8, BadSymbol> {
        match self {
            Symbol::Char(ch) => {
                if ('\u{20}'..='\u{7E}').contains(&ch) {
                    Ok(ch as u8)
                } else {
                    Err(BadSymbol(self))
                }
            }
            Symbol::SimpleEscape(ch) | Symbol::DecimalEscape(ch) => Ok(ch),
        }
    }

    /// Appends the octets represented by the symbol to `target`.
    ///
    /// Unlike [`into_octet`][Self::into_octet], this accepts any unescaped
    /// character and appends its UTF-8 encoding.
    pub fn push_octets(self, target: &mut Vec<u8>) {
        match self {
            Symbol::Char(ch) => {
                let mut buf = [0u8; 4];
                target.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes())
            }
            Symbol::SimpleEscape(ch) | Symbol::DecimalEscape(ch) => {
                target.push(ch)
            }
        }
    }

    /// Converts the symbol into an ASCII character.
    pub fn into_ascii(self) -> Result<u8, BadSymbol> {
        match self {
            Symbol::Char(ch) if ch.is_ascii() => Ok(ch as u8),
            Symbol::SimpleEscape(ch) => Ok(ch),
            Symbol::DecimalEscape(ch) if ch.is_ascii() => Ok(ch),
            _ => Err(BadSymbol(self)),
        }
    }

    /// Converts the symbol representing a digit into its integer value.
    pub fn into_digit(self, base: u32) -> Result<u32, BadSymbol> {
        if let Symbol::Char(ch) = self {
            match ch.to_digit(base) {
                Some(ch) => Ok(ch),
                None => Err(BadSymbol(self)),
            }
        } else {
            Err(BadSymbol(self))
        }
    }

    /// Returns whether the symbol can occur as part of a word.
    ///
    /// This is true apart for unescaped ASCII space and horizontal tabs,
    /// opening and closing parantheses, the semicolon, and double quote.
    pub fn is_word_char(self) -> bool {
        match self {
            Symbol::Char(ch) => {
                ch != ' '
                    && ch != '\t'
                    && ch != '\r'
                    && ch != '\n'
                    && ch != '('
                    && ch != ')'
                    && ch != ';'
                    && ch != '"'
            }
            _ => true,
        }
    }
}

//--- From

impl From<char> for Symbol {
    fn from(ch: char) -> Symbol {
        Symbol::Char(ch)
    }
}

//--- Display

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Symbol::Char(ch) => write!(f, "{}", ch),
            Symbol::SimpleEscape(ch) => write!(f, "\\{}", ch as char),
            Symbol::DecimalEscape(ch) => write!(f, "\\{:03}", ch),
        }
    }
}

//============ Error Types ===================================================

//------------ SymbolCharsError ----------------------------------------------

/// An error happened when reading a symbol.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SymbolCharsError {
    /// An illegal escape sequence was encountered.
    BadEscape,

    /// Unexpected end of input.
    ///
    /// This can only happen in an escape sequence.
    ShortInput,
}

impl fmt::Display for SymbolCharsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SymbolCharsError::BadEscape => {
                f.write_str("illegal escape sequence")
            }
            SymbolCharsError::ShortInput => {
                f.write_str("unexpected end of input")
            }
        }
    }
}

impl std::error::Error for SymbolCharsError {}

//------------ SymbolOctetsError ---------------------------------------------

/// An error happened when reading a symbol.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SymbolOctetsError {
    /// An illegal UTF-8 sequence was encountered.
    BadUtf8,

    /// An illegal escape sequence was encountered.
    BadEscape,

    /// Unexpected end of input.
    ///
    /// This can only happen in an escape sequence or a multi-octet UTF-8
    /// character.
    ShortInput,
}

impl SymbolOctetsError {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolOctetsError::BadUtf8 => "illegal UTF-8 sequence",
            SymbolOctetsError::BadEscape => "illegal escape sequence",
            SymbolOctetsError::ShortInput => "unexpected end of input",
        }
    }
}

impl fmt::Display for SymbolOctetsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for SymbolOctetsError {}

//------------ BadSymbol -----------------------------------------------------

/// A symbol with an unexpected value was encountered.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BadSymbol(pub Symbol);

impl fmt::Display for BadSymbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "bad symbol '{}'", self.0)
    }
}

impl std::error::Error for BadSymbol {}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn symbol_from_slice_index() {
        let octets = b"a\\.\\065\\\xc3\xa4";
        let mut pos = 0;
        let mut res = Vec::new();
        while let Some((sym, next)) =
            Symbol::from_slice_index(octets, pos).unwrap()
        {
            res.push(sym);
            pos = next;
        }
        assert_eq!(
            res,
            [
                Symbol::Char('a'),
                Symbol::SimpleEscape(b'.'),
                Symbol::DecimalEscape(65),
                Symbol::SimpleEscape(b'\\'),
                Symbol::Char('ä'),
            ]
        );
    }

    #[test]
    fn symbol_errors() {
        assert_eq!(
            Symbol::from_slice_index(b"\\", 0),
            Err(SymbolOctetsError::ShortInput)
        );
        assert_eq!(
            Symbol::from_slice_index(b"\\25", 0),
            Err(SymbolOctetsError::ShortInput)
        );
        assert_eq!(
            Symbol::from_slice_index(b"\\256", 0),
            Err(SymbolOctetsError::BadEscape)
        );
        assert_eq!(
            Symbol::from_slice_index(b"\\1x3", 0),
            Err(SymbolOctetsError::BadEscape)
        );
        assert_eq!(
            Symbol::from_slice_index(b"\xff", 0),
            Err(SymbolOctetsError::BadUtf8)
        );
    }

    #[test]
    fn symbol_from_chars() {
        let mut chars = "\\046x".chars();
        assert_eq!(
            Symbol::from_chars(&mut chars),
            Ok(Some(Symbol::DecimalEscape(b'.')))
        );
        assert_eq!(
            Symbol::from_chars(&mut chars),
            Ok(Some(Symbol::Char('x')))
        );
        assert_eq!(Symbol::from_chars(&mut chars), Ok(None));
    }
}
