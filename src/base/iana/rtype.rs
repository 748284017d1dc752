//! Resource Record (RR) TYPEs

//------------ Rtype ---------------------------------------------------------

int_enum! {
    /// Resource Record Types.
    ///
    /// Each resource records has a 16 bit type value indicating what kind of
    /// information is represented by the record. Only a handful of them are
    /// understood by the zone file scanner; all other values can still be
    /// used via the generic record data syntax of [RFC 3597].
    ///
    /// The currently assigned values are maintained in an [IANA registry].
    ///
    /// [IANA registry]: http://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-4
    /// [RFC 3597]: https://tools.ietf.org/html/rfc3597
    =>
    Rtype, u16;

    /// A host address.
    (A => 1, "A")

    /// An authoritative name server.
    (NS => 2, "NS")

    /// The canonical name for an alias
    (CNAME => 5, "CNAME")

    /// Marks the start of a zone of authority.
    (SOA => 6, "SOA")

    /// A domain name pointer.
    (PTR => 12, "PTR")

    /// Host information.
    (HINFO => 13, "HINFO")

    /// Mail exchange.
    (MX => 15, "MX")

    /// Text strings.
    (TXT => 16, "TXT")

    /// IPv6 address.
    (AAAA => 28, "AAAA")

    /// Server selection.
    (SRV => 33, "SRV")

    /// Naming authority pointer.
    (NAPTR => 35, "NAPTR")

    /// Delegation signer.
    (DS => 43, "DS")

    /// SSH key fingerprint.
    (SSHFP => 44, "SSHFP")

    /// RRSIG.
    (RRSIG => 46, "RRSIG")

    /// NSEC.
    (NSEC => 47, "NSEC")

    /// DNSKEY.
    (DNSKEY => 48, "DNSKEY")

    /// A request for all records.
    (ANY => 255, "ANY")

    /// Certification Authority Restriction.
    (CAA => 257, "CAA")
}

int_enum_str_with_prefix!(Rtype, "TYPE", u16, "unknown record type");

impl Rtype {
    /// Returns whether the zone file scanner has a native syntax for this
    /// type.
    ///
    /// Record data of these types may not be given in generic syntax.
    #[must_use]
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            Rtype::A
                | Rtype::NS
                | Rtype::CNAME
                | Rtype::SOA
                | Rtype::PTR
                | Rtype::MX
                | Rtype::TXT
                | Rtype::AAAA
                | Rtype::SRV
                | Rtype::NAPTR
        )
    }

    /// Returns whether this is one of the two address types.
    #[must_use]
    pub fn is_address(self) -> bool {
        matches!(self, Rtype::A | Rtype::AAAA)
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn from_str() {
        assert_eq!(Rtype::from_str("aaaa").unwrap(), Rtype::AAAA);
        assert_eq!(Rtype::from_str("TYPE1").unwrap(), Rtype::A);
        assert_eq!(
            Rtype::from_str("type31337").unwrap(),
            Rtype::from_int(31337)
        );
        assert!(Rtype::from_str("TYPE").is_err());
        assert!(Rtype::from_str("TYPE+1").is_err());
        assert!(Rtype::from_str("TYPE70000").is_err());
        assert!(Rtype::from_str("DYNA").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Rtype::NAPTR.to_string(), "NAPTR");
        assert_eq!(Rtype::from_int(31337).to_string(), "TYPE31337");
    }
}
