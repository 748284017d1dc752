//! Resource data implementations.
//!
//! This module contains the record data types for all record types a zone
//! can hold. The types are named identically to the [`Rtype`] constant they
//! implement. They are grouped into submodules for the RFCs they are
//! defined in and all re-exported at the top level here.
//!
//! The enum [`ZoneRecordData`] collects all of them, plus record data given
//! in the generic format of RFC 3597 and the two dynamic record types.
//!
//! [`Rtype`]: crate::base::iana::Rtype

#[macro_use]
mod macros;

pub mod aaaa;
pub mod dynamic;
pub mod naptr;
pub mod rfc1035;
pub mod srv;
pub mod unknown;

pub use self::dynamic::{DynKind, DynTarget, TtlRange, TtlRangeError};
pub use self::unknown::UnknownRecordData;

zone_types! {
    rfc1035::{A, Cname, Mx, Ns, Ptr, Soa, Txt}
    aaaa::{Aaaa}
    srv::{Srv}
    naptr::{Naptr}
}

impl ZoneRecordData {
    /// Creates dynamic record data of the given kind.
    pub fn dynamic(kind: DynKind, target: DynTarget) -> Self {
        match kind {
            DynKind::Address => ZoneRecordData::Dyna(target),
            DynKind::CnameOrAddress => ZoneRecordData::Dync(target),
        }
    }

    /// Returns the kind and target if this is dynamic record data.
    pub fn as_dynamic(&self) -> Option<(DynKind, &DynTarget)> {
        match *self {
            ZoneRecordData::Dyna(ref target) => {
                Some((DynKind::Address, target))
            }
            ZoneRecordData::Dync(ref target) => {
                Some((DynKind::CnameOrAddress, target))
            }
            _ => None,
        }
    }

    /// Converts into kind and target if this is dynamic record data.
    ///
    /// Returns the data unchanged otherwise.
    pub fn into_dynamic(self) -> Result<(DynKind, DynTarget), Self> {
        match self {
            ZoneRecordData::Dyna(target) => Ok((DynKind::Address, target)),
            ZoneRecordData::Dync(target) => {
                Ok((DynKind::CnameOrAddress, target))
            }
            data => Err(data),
        }
    }

    /// Returns the domain name that may have additional section records.
    ///
    /// These are the targets of NS, MX, and SRV records.
    pub fn additional_target(&self) -> Option<&crate::base::name::Name> {
        match *self {
            ZoneRecordData::Ns(ref ns) => Some(ns.nsdname()),
            ZoneRecordData::Mx(ref mx) => Some(mx.exchange()),
            ZoneRecordData::Srv(ref srv) => Some(srv.target()),
            _ => None,
        }
    }
}
