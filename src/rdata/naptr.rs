//! Record data from [RFC 3403]: NAPTR records.
//!
//! This RFC defines the NAPTR record type.
//!
//! [RFC 3403]: https://www.rfc-editor.org/rfc/rfc3403#section-4

use crate::base::iana::Rtype;
use crate::base::name::Name;
use crate::base::scan::{Scan, Scanner};
use crate::rdata::rfc1035::fmt_quoted;
use bytes::Bytes;
use core::fmt;

//------------ Naptr ---------------------------------------------------------

/// Naptr record data.
///
/// The Naptr encodes a rule which may produce a new domain. It is widely
/// used in ENUM and SIP.
///
/// The Naptr record type is defined in [RFC 3403, section 4.1][1].
///
/// [1]: https://www.rfc-editor.org/rfc/rfc3403#section-4.1
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Naptr {
    order: u16,
    preference: u16,
    flags: Bytes,
    services: Bytes,
    regexp: Bytes,
    replacement: Name,
}

impl Naptr {
    /// The rtype of this record data type.
    pub(crate) const RTYPE: Rtype = Rtype::NAPTR;

    /// Creates a new Naptr record data from content.
    pub fn new(
        order: u16,
        preference: u16,
        flags: Bytes,
        services: Bytes,
        regexp: Bytes,
        replacement: Name,
    ) -> Self {
        Naptr {
            order,
            preference,
            flags,
            services,
            regexp,
            replacement,
        }
    }

    /// The order of processing the records is from lowest to highest.
    pub fn order(&self) -> u16 {
        self.order
    }

    /// The priority of the NAPTR record among records with equal order.
    pub fn preference(&self) -> u16 {
        self.preference
    }

    /// The flags controlling the rewriting and interpretation of the fields.
    pub fn flags(&self) -> &[u8] {
        self.flags.as_ref()
    }

    /// The services available down this rewrite path.
    pub fn services(&self) -> &[u8] {
        self.services.as_ref()
    }

    /// The substitution expression applied to the original client string.
    pub fn regexp(&self) -> &[u8] {
        self.regexp.as_ref()
    }

    /// The next domain name to query for.
    pub fn replacement(&self) -> &Name {
        &self.replacement
    }

    pub fn scan<S: Scanner>(scanner: &mut S) -> Result<Self, S::Error> {
        Ok(Self::new(
            u16::scan(scanner)?,
            u16::scan(scanner)?,
            scanner.scan_charstr()?,
            scanner.scan_charstr()?,
            scanner.scan_charstr()?,
            scanner.scan_name()?,
        ))
    }
}

//--- Display

impl fmt::Display for Naptr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} ", self.order, self.preference)?;
        fmt_quoted(&self.flags, f)?;
        f.write_str(" ")?;
        fmt_quoted(&self.services, f)?;
        f.write_str(" ")?;
        fmt_quoted(&self.regexp, f)?;
        write!(f, " {}", self.replacement)
    }
}
