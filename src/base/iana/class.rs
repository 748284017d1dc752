//! DNS CLASSes.

//------------ Class ---------------------------------------------------------

int_enum! {
    /// DNS CLASSes.
    ///
    /// Only the Internet class is served. The other classes are recognized
    /// so that the scanner can tell a class it refuses apart from a
    /// malformed token.
    =>
    Class, u16;

    /// Internet (IN).
    (IN => 1, "IN")

    /// Chaosnet (CH).
    (CH => 3, "CH")

    /// Hesiod (HS).
    (HS => 4, "HS")
}

int_enum_str_with_prefix!(Class, "CLASS", u16, "unknown class");
