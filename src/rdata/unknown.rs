//! Record data in the generic format of [RFC 3597].
//!
//! [RFC 3597]: https://tools.ietf.org/html/rfc3597

use crate::base::iana::Rtype;
use crate::base::scan::{Scan, Scanner, ScannerError};
use bytes::Bytes;
use core::fmt;

//------------ UnknownRecordData ---------------------------------------------

/// A type for record data of a type the crate has no dedicated type for.
///
/// The data is kept as the raw octets given in the generic representation
/// `\# <len> <hex>`. The hex digits may be spread over any number of
/// tokens.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct UnknownRecordData {
    /// The record type of this data.
    rtype: Rtype,

    /// The record data.
    data: Bytes,
}

impl UnknownRecordData {
    /// Creates generic record data from its components.
    pub fn from_octets(rtype: Rtype, data: Bytes) -> Self {
        UnknownRecordData { rtype, data }
    }

    /// Returns the record type this data is for.
    pub fn rtype(&self) -> Rtype {
        self.rtype
    }

    /// Returns a reference to the record data.
    pub fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Scans the record data assuming that the marker has been skipped.
    pub fn scan_without_marker<S: Scanner>(
        rtype: Rtype,
        scanner: &mut S,
    ) -> Result<Self, S::Error> {
        // First token is the rdata length.
        let len = u16::scan(scanner)?;

        // The rest is the actual data as hex digits.
        let mut data = Vec::with_capacity(usize::from(len));
        let mut high: Option<u8> = None;
        while scanner.continues() {
            scanner.scan_symbols(|sym| {
                let digit = sym.into_digit(16).map_err(|_| {
                    S::Error::custom("expected hex digit in generic data")
                })? as u8;
                match high.take() {
                    Some(high) => data.push(high << 4 | digit),
                    None => high = Some(digit),
                }
                Ok(())
            })?;
        }
        if high.is_some() {
            return Err(S::Error::custom(
                "odd number of hex digits in generic data",
            ));
        }
        if data.len() != usize::from(len) {
            return Err(S::Error::custom(
                "generic data has incorrect length",
            ));
        }

        Ok(UnknownRecordData {
            rtype,
            data: data.into(),
        })
    }
}

//--- Display

impl fmt::Display for UnknownRecordData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\\# {}", self.data.len())?;
        if !self.data.is_empty() {
            f.write_str(" ")?;
            for ch in self.data.iter() {
                write!(f, "{:02x}", ch)?;
            }
        }
        Ok(())
    }
}
