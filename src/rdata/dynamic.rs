//! Dynamic record data.
//!
//! The virtual record types `DYNA` and `DYNC` never appear in answers.
//! Instead, they name a plugin and a resource which are asked for the
//! actual data whenever a query for the owner arrives. The TTL of such a
//! record is a range `MAX[/MIN]` within which the TTL of each answer is
//! chosen.

use crate::base::scan::{Scanner, ScannerError};
use crate::base::ttl::Ttl;
use core::fmt;
use core::str::FromStr;

//------------ DynKind -------------------------------------------------------

/// The kind of a dynamic record.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DynKind {
    /// A `DYNA` record resolving to addresses only.
    Address,

    /// A `DYNC` record resolving to either a CNAME or addresses.
    CnameOrAddress,
}

impl DynKind {
    /// Returns the kind for a type mnemonic, ignoring case.
    pub fn from_mnemonic(m: &[u8]) -> Option<Self> {
        if m.eq_ignore_ascii_case(b"DYNA") {
            Some(DynKind::Address)
        } else if m.eq_ignore_ascii_case(b"DYNC") {
            Some(DynKind::CnameOrAddress)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DynKind::Address => "DYNA",
            DynKind::CnameOrAddress => "DYNC",
        }
    }
}

impl fmt::Display for DynKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//------------ TtlRange ------------------------------------------------------

/// The TTL range of a dynamic record.
///
/// The range is given in the TTL field of the record as `MAX[/MIN]`. If the
/// minimum is missing, it is half the maximum.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TtlRange {
    max: Ttl,
    min: Ttl,
}

impl TtlRange {
    /// Creates a new range.
    ///
    /// Returns an error if `min` is larger than `max`.
    pub fn new(max: Ttl, min: Ttl) -> Result<Self, TtlRangeError> {
        if min > max {
            Err(TtlRangeError("TTL minimum exceeds maximum"))
        } else {
            Ok(TtlRange { max, min })
        }
    }

    /// Creates a range from the maximum only.
    pub fn from_max(max: Ttl) -> Self {
        TtlRange {
            max,
            min: max.half(),
        }
    }

    pub fn max(&self) -> Ttl {
        self.max
    }

    pub fn min(&self) -> Ttl {
        self.min
    }

    /// Limits `ttl` to the range.
    pub fn clamp(&self, ttl: Ttl) -> Ttl {
        ttl.clamp_to(self.min, self.max)
    }
}

impl FromStr for TtlRange {
    type Err = TtlRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((max, min)) => TtlRange::new(
                Ttl::from_str(max).map_err(|err| TtlRangeError(err.as_str()))?,
                Ttl::from_str(min).map_err(|err| TtlRangeError(err.as_str()))?,
            ),
            None => Ttl::from_str(s)
                .map(TtlRange::from_max)
                .map_err(|err| TtlRangeError(err.as_str())),
        }
    }
}

impl fmt::Display for TtlRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.max, self.min)
    }
}

//------------ DynTarget -----------------------------------------------------

/// The record data of a `DYNA` or `DYNC` record.
///
/// In zone files this is a single token `plugin!resource`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DynTarget {
    plugin: Box<str>,
    resource: Box<str>,
    ttl: TtlRange,
}

impl DynTarget {
    pub fn new(
        plugin: impl Into<Box<str>>,
        resource: impl Into<Box<str>>,
        ttl: TtlRange,
    ) -> Self {
        DynTarget {
            plugin: plugin.into(),
            resource: resource.into(),
            ttl,
        }
    }

    /// The name of the plugin to ask.
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// The resource name handed to the plugin.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// The range the TTL of answers has to be in.
    pub fn ttl(&self) -> TtlRange {
        self.ttl
    }

    /// Scans the `plugin!resource` token.
    pub fn scan<S: Scanner>(
        ttl: TtlRange,
        scanner: &mut S,
    ) -> Result<Self, S::Error> {
        scanner.scan_ascii_str(|s| match s.split_once('!') {
            Some((plugin, resource))
                if !plugin.is_empty() && !resource.is_empty() =>
            {
                Ok(DynTarget::new(plugin, resource, ttl))
            }
            _ => Err(S::Error::custom(
                "dynamic record data must be 'plugin!resource'",
            )),
        })
    }
}

impl fmt::Display for DynTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}!{}", self.plugin, self.resource)
    }
}

//------------ TtlRangeError -------------------------------------------------

/// A TTL range could not be parsed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TtlRangeError(&'static str);

impl TtlRangeError {
    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TtlRangeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for TtlRangeError {}

//============ Tests =========================================================
