//! The state changed by zone file directives.
//!
//! Directives such as `$ORIGIN` or `$TTL` change how the records following
//! them are interpreted. The [`DirectiveState`] holds the values currently
//! in effect. It lives only for a single pass over a zone file.

use crate::base::iana::Rtype;
use crate::base::name::Name;
use crate::base::ttl::Ttl;
use core::fmt;

//------------ AddrLimits ----------------------------------------------------

/// The maximum number of addresses returned in an answer.
///
/// A value of zero means the number isn’t limited. The limits are set with
/// the `$ADDR_LIMIT_V4` and `$ADDR_LIMIT_V6` directives and apply to all
/// A and AAAA record sets and all dynamic records that are created after
/// the directive.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct AddrLimits {
    v4: u32,
    v6: u32,
}

impl AddrLimits {
    /// No limits at all.
    pub const UNLIMITED: AddrLimits = AddrLimits { v4: 0, v6: 0 };

    pub fn new(v4: u32, v6: u32) -> Self {
        AddrLimits { v4, v6 }
    }

    /// The limit for IPv4 addresses.
    pub fn v4(self) -> u32 {
        self.v4
    }

    /// The limit for IPv6 addresses.
    pub fn v6(self) -> u32 {
        self.v6
    }

    /// Returns the limit for a record type.
    ///
    /// Types other than A and AAAA are never limited.
    pub fn for_rtype(self, rtype: Rtype) -> u32 {
        match rtype {
            Rtype::A => self.v4,
            Rtype::AAAA => self.v6,
            _ => 0,
        }
    }
}

//------------ DirectiveState ------------------------------------------------

/// The values set by directives during a pass over a zone file.
#[derive(Clone, Debug)]
pub struct DirectiveState {
    /// The apex of the zone. This never changes.
    apex: Name,

    /// The current origin for completing relative names.
    origin: Name,

    /// The TTL for records that don’t provide one.
    default_ttl: Ttl,

    /// The current address limits.
    limits: AddrLimits,
}

impl DirectiveState {
    /// Creates the initial state for a zone.
    ///
    /// The origin starts out as the apex and there are no address limits.
    pub fn new(apex: Name, default_ttl: Ttl) -> Self {
        DirectiveState {
            origin: apex.clone(),
            apex,
            default_ttl,
            limits: AddrLimits::UNLIMITED,
        }
    }

    pub fn apex(&self) -> &Name {
        &self.apex
    }

    pub fn origin(&self) -> &Name {
        &self.origin
    }

    pub fn default_ttl(&self) -> Ttl {
        self.default_ttl
    }

    pub fn limits(&self) -> AddrLimits {
        self.limits
    }

    /// Processes `$ORIGIN`.
    ///
    /// The name must already have been completed with the previous origin
    /// if it was relative. It must be at or below the apex.
    pub fn set_origin(&mut self, origin: Name) -> Result<(), DirectiveError> {
        if !origin.ends_with(&self.apex) {
            return Err(DirectiveError::OriginOutsideZone);
        }
        self.origin = origin;
        Ok(())
    }

    /// Processes `$TTL`.
    pub fn set_default_ttl(&mut self, ttl: Ttl) {
        self.default_ttl = ttl
    }

    /// Processes `$ADDR_LIMIT_V4`.
    pub fn set_limit_v4(&mut self, limit: u32) {
        self.limits.v4 = limit
    }

    /// Processes `$ADDR_LIMIT_V6`.
    pub fn set_limit_v6(&mut self, limit: u32) {
        self.limits.v6 = limit
    }

    /// Returns whether `owner` belongs to the zone.
    pub fn is_in_zone(&self, owner: &Name) -> bool {
        owner.ends_with(&self.apex)
    }
}

//------------ DirectiveError ------------------------------------------------

/// A directive could not be applied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DirectiveError {
    /// `$ORIGIN` named a name outside the zone.
    OriginOutsideZone,
}

impl DirectiveError {
    pub fn as_str(self) -> &'static str {
        match self {
            DirectiveError::OriginOutsideZone => "origin outside zone",
        }
    }
}

impl fmt::Display for DirectiveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for DirectiveError {}

//============ Tests =========================================================
