//! Macros for use in rdata definitions.
//!
//! These macros are not public but are used by the super module only. They
//! are here so that `mod.rs` doesn’t become too unwieldy.

/// Creates the enum of all record data a zone can hold.
///
/// The macro takes a list of modules and, for each, the record data types
/// defined there. Each type becomes a variant of `ZoneRecordData` with the
/// type’s name. In addition, the enum has an `Unknown` variant for data
/// given in the generic format and the two dynamic variants `Dyna` and
/// `Dync`.
macro_rules! zone_types {
    (
        $( $module:ident::{ $( $rtype:ident ),* $(,)? } )*
    ) => {
        $(
            pub use self::$module::{ $( $rtype ),* };
        )*

        //------------- ZoneRecordData ---------------------------------------

        /// Record data for all record types a zone can hold.
        ///
        /// The enum is closed: every record scanned from a zone file ends
        /// up as exactly one of these variants.
        #[derive(Clone, Debug, Eq, PartialEq)]
        pub enum ZoneRecordData {
            $( $( $rtype($rtype), )* )*
            Unknown($crate::rdata::UnknownRecordData),
            Dyna($crate::rdata::DynTarget),
            Dync($crate::rdata::DynTarget),
        }

        impl ZoneRecordData {
            /// Returns the record type of the data.
            ///
            /// Returns `None` for the dynamic variants which don’t have a
            /// record type of their own.
            pub fn rtype(&self) -> Option<$crate::base::iana::Rtype> {
                match *self {
                    $( $(
                        ZoneRecordData::$rtype(_) => Some($rtype::RTYPE),
                    )* )*
                    ZoneRecordData::Unknown(ref inner) => Some(inner.rtype()),
                    ZoneRecordData::Dyna(_) | ZoneRecordData::Dync(_) => None,
                }
            }

            /// Scans the record data of a record of the given type.
            ///
            /// This isn’t implemented via `Scan`, because we need the
            /// record type.
            pub fn scan<S: $crate::base::scan::Scanner>(
                rtype: $crate::base::iana::Rtype,
                scanner: &mut S,
            ) -> Result<Self, S::Error> {
                use $crate::base::scan::ScannerError;

                if scanner.scan_opt_unknown_marker()? {
                    if rtype.is_supported() {
                        return Err(S::Error::custom(
                            "generic record data for supported type",
                        ));
                    }
                    if rtype == $crate::base::iana::Rtype::ANY {
                        return Err(S::Error::custom(
                            "unsupported record type",
                        ));
                    }
                    return $crate::rdata::UnknownRecordData::scan_without_marker(
                        rtype, scanner,
                    )
                    .map(ZoneRecordData::Unknown);
                }

                match rtype {
                    $( $(
                        $rtype::RTYPE => {
                            $rtype::scan(scanner).map(ZoneRecordData::$rtype)
                        }
                    )* )*
                    _ => Err(S::Error::custom("unsupported record type")),
                }
            }
        }

        //--- From

        $( $(
            impl From<$rtype> for ZoneRecordData {
                fn from(value: $rtype) -> Self {
                    ZoneRecordData::$rtype(value)
                }
            }
        )* )*

        impl From<$crate::rdata::UnknownRecordData> for ZoneRecordData {
            fn from(value: $crate::rdata::UnknownRecordData) -> Self {
                ZoneRecordData::Unknown(value)
            }
        }

        //--- Display

        impl core::fmt::Display for ZoneRecordData {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                match *self {
                    $( $(
                        ZoneRecordData::$rtype(ref inner) => inner.fmt(f),
                    )* )*
                    ZoneRecordData::Unknown(ref inner) => inner.fmt(f),
                    ZoneRecordData::Dyna(ref inner) => inner.fmt(f),
                    ZoneRecordData::Dync(ref inner) => inner.fmt(f),
                }
            }
        }
    };
}
