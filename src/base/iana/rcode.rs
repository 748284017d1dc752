//! DNS response codes.

//------------ Rcode --------------------------------------------------------

int_enum! {
    /// DNS Response Codes.
    ///
    /// Only the codes an authoritative answer can end up with are listed.
    /// The value is handed to the message encoder unchanged.
    =>
    Rcode, u8;

    /// No error condition.
    (NOERROR => 0, "NOERROR")

    /// The server was unable to process the query.
    (SERVFAIL => 2, "SERVFAIL")

    /// The domain name referenced in the query does not exist.
    (NXDOMAIN => 3, "NXDOMAIN")

    /// The server refuses to answer for the name.
    (REFUSED => 5, "REFUSED")
}

int_enum_str_mnemonics_only!(Rcode, "unknown rcode");
