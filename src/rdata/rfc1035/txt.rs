//! Record data for the TXT record.
//!
//! This is a private module. It’s content is re-exported by the parent.

use crate::base::iana::Rtype;
use crate::base::scan::Scanner;
use bytes::Bytes;
use core::fmt;

/// The maximum length of a single character string.
pub const MAX_CHARSTR_LEN: usize = 255;

//------------ Txt ----------------------------------------------------------

/// TXT record data.
///
/// TXT records hold descriptive text. While it may appear as a single text,
/// it internally consists of a sequence of one or more character strings,
/// each at most 255 octets long.
///
/// The TXT record type is defined in [RFC 1035, section 3.3.14].
///
/// # Presentation format
///
/// TXT record data appears in zone files as the white-space delimited
/// sequence of its constituent character strings. Each quoted or unquoted
/// token results in at least one character string. A token longer than 255
/// octets is either split into consecutive strings of at most 255 octets or
/// rejected, depending on the scanner’s configuration.
///
/// [RFC 1035, section 3.3.14]: https://tools.ietf.org/html/rfc1035#section-3.3.14
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Txt(Vec<Bytes>);

impl Txt {
    /// The rtype of this record data type.
    pub(crate) const RTYPE: Rtype = Rtype::TXT;

    /// Creates TXT record data from a sequence of character strings.
    ///
    /// Returns `None` if the sequence is empty or any string is longer than
    /// 255 octets.
    pub fn from_charstrs(strs: Vec<Bytes>) -> Option<Self> {
        if strs.is_empty() || strs.iter().any(|s| s.len() > MAX_CHARSTR_LEN)
        {
            None
        } else {
            Some(Txt(strs))
        }
    }

    /// Returns an iterator over the character strings as slices.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.0.iter().map(AsRef::as_ref)
    }

    /// Returns the number of character strings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether there are no character strings.
    ///
    /// Scanned data always has at least one.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the concatenated content of all character strings.
    pub fn text(&self) -> Vec<u8> {
        self.0.iter().flat_map(|s| s.iter().copied()).collect()
    }

    pub fn scan<S: Scanner>(scanner: &mut S) -> Result<Self, S::Error> {
        scanner.scan_charstr_entry().map(Txt)
    }
}

//--- Display

impl fmt::Display for Txt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for slice in self.iter() {
            if !first {
                f.write_str(" ")?;
            } else {
                first = false;
            }
            fmt_quoted(slice, f)?;
        }
        Ok(())
    }
}

/// Writes a character string in its quoted representation format.
pub(crate) fn fmt_quoted(
    octets: &[u8],
    f: &mut fmt::Formatter,
) -> fmt::Result {
    f.write_str("\"")?;
    for &ch in octets {
        if ch == b'"' || ch == b'\\' {
            write!(f, "\\{}", ch as char)?;
        } else if (0x20..0x7F).contains(&ch) {
            write!(f, "{}", ch as char)?;
        } else {
            write!(f, "\\{:03}", ch)?;
        }
    }
    f.write_str("\"")
}
