//! Zone related errors.

use crate::base::iana::Rcode;
use crate::base::name::Name;
use crate::dynamic::plugin::PluginError;
use crate::zonefile::inplace;
use std::fmt::Display;
use std::io;
use std::sync::Arc;
use std::vec::Vec;

//------------ ConflictKind --------------------------------------------------

/// The ways a record can conflict with data already at its owner name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConflictKind {
    /// A and AAAA records can’t live next to a `DYNA` record.
    AddressWithDyna,

    /// A `DYNC` record at the apex of the zone.
    DyncAtApex,

    /// A `DYNC` record can’t have any other data next to it.
    DyncNotExclusive,

    /// A CNAME record can’t have any other data next to it.
    CnameNotExclusive,

    /// There can only be one CNAME record at a name.
    MultipleCnames,

    /// All records of an RRset must have the same TTL.
    TtlMismatch,

    /// A SOA record somewhere other than the apex.
    SoaOutsideApex,

    /// There can only be one SOA record.
    MultipleSoa,

    /// There can only be one dynamic record at a name.
    MultipleDynamic,
}

impl ConflictKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictKind::AddressWithDyna => {
                "address records and DYNA at the same name"
            }
            ConflictKind::DyncAtApex => "DYNC at zone apex",
            ConflictKind::DyncNotExclusive => "DYNC must be exclusive",
            ConflictKind::CnameNotExclusive => "CNAME must be exclusive",
            ConflictKind::MultipleCnames => "multiple CNAME records",
            ConflictKind::TtlMismatch => "TTL differs from RRset TTL",
            ConflictKind::SoaOutsideApex => "SOA outside zone apex",
            ConflictKind::MultipleSoa => "multiple SOA records",
            ConflictKind::MultipleDynamic => "multiple dynamic records",
        }
    }
}

impl Display for ConflictKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

//------------ ConflictError -------------------------------------------------

/// A record can’t be added to a zone because of data already there.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConflictError {
    owner: Name,
    line: usize,
    kind: ConflictKind,
}

impl ConflictError {
    pub fn new(owner: Name, line: usize, kind: ConflictKind) -> Self {
        ConflictError { owner, line, kind }
    }

    pub fn owner(&self) -> &Name {
        &self.owner
    }

    /// The line of the offending record, starting at 1.
    ///
    /// Zero if the record didn’t come from a file.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn kind(&self) -> ConflictKind {
        self.kind
    }
}

impl Display for ConflictError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {} at '{}'", self.line, self.kind, self.owner)
    }
}

impl std::error::Error for ConflictError {}

//------------ ValidationError -----------------------------------------------

/// A zone is not complete or refers to things that don’t exist.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationError {
    /// There is no SOA record at the apex.
    MissingSoa,

    /// There are no NS records at the apex.
    MissingNs,

    /// A dynamic record refers to a plugin that isn’t registered.
    UnknownPlugin(Box<str>),

    /// The plugin of a dynamic record rejected its resource.
    InvalidResource {
        plugin: Box<str>,
        resource: Box<str>,
        err: PluginError,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ValidationError::MissingSoa => write!(f, "missing SOA at apex"),
            ValidationError::MissingNs => write!(f, "missing NS at apex"),
            ValidationError::UnknownPlugin(plugin) => {
                write!(f, "unknown plugin '{plugin}'")
            }
            ValidationError::InvalidResource {
                plugin,
                resource,
                err,
            } => write!(
                f,
                "plugin '{plugin}' rejected resource '{resource}': {err}"
            ),
        }
    }
}

//------------ ZoneErrors ----------------------------------------------------

/// A set of problems relating to a zone.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ZoneErrors {
    errors: Vec<(Name, ValidationError)>,
}

impl ZoneErrors {
    /// Add an error to the set.
    pub fn add_error(&mut self, name: Name, error: ValidationError) {
        self.errors.push((name, error))
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Name, ValidationError)> {
        self.errors.iter()
    }

    /// Returns whether any of the errors is `error`.
    pub fn contains(&self, error: &ValidationError) -> bool {
        self.errors.iter().any(|(_, item)| item == error)
    }

    /// Unwrap the set of errors.
    ///
    /// Returns the set of errors as [Result::Err(ZoneErrors)] or [Result::Ok]
    /// if the set is empty.
    pub fn unwrap(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ZoneErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "zone errors: [")?;
        for err in &self.errors {
            write!(f, "'{}': {},", err.0, err.1)?;
        }
        write!(f, "]")
    }
}

impl std::error::Error for ZoneErrors {}

//------------ LoadError -----------------------------------------------------

/// Loading a zone failed.
///
/// Every variant knows the name of the source the zone was loaded from.
#[derive(Debug)]
pub enum LoadError {
    /// The source couldn’t be read.
    Io { source: Arc<str>, err: io::Error },

    /// The zone file has a syntax error.
    Syntax(inplace::Error),

    /// A record conflicts with earlier data.
    Conflict { source: Arc<str>, err: ConflictError },

    /// The zone as a whole is invalid.
    Validation { source: Arc<str>, errors: ZoneErrors },
}

impl LoadError {
    /// The name of the source the zone was loaded from.
    pub fn source_name(&self) -> Option<&str> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Syntax(err) => err.source_name(),
            LoadError::Conflict { source, .. } => Some(source),
            LoadError::Validation { source, .. } => Some(source),
        }
    }
}

impl From<inplace::Error> for LoadError {
    fn from(err: inplace::Error) -> Self {
        LoadError::Syntax(err)
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LoadError::Io { source, err } => write!(f, "{source}: {err}"),
            LoadError::Syntax(err) => err.fmt(f),
            LoadError::Conflict { source, err } => {
                write!(f, "{source}:{err}")
            }
            LoadError::Validation { source, errors } => {
                write!(f, "{source}: {errors}")
            }
        }
    }
}

impl std::error::Error for LoadError {}

//------------ QueryError ----------------------------------------------------

/// Answering a single query failed.
///
/// These errors never affect the zone itself. The next query for the same
/// name may well succeed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum QueryError {
    /// The name is not in the zone.
    OutOfZone,

    /// The plugin of a dynamic record failed.
    Plugin(PluginError),

    /// The plugin of a dynamic record took too long.
    Timeout,

    /// The plugin of a dynamic record isn’t registered anymore.
    UnknownPlugin(Box<str>),

    /// The plugin of a `DYNA` record answered with a CNAME.
    CnameFromAddressPlugin,
}

impl QueryError {
    /// Returns the response code for the failure.
    pub fn rcode(&self) -> Rcode {
        match self {
            QueryError::OutOfZone => Rcode::REFUSED,
            _ => Rcode::SERVFAIL,
        }
    }

    /// Returns whether the error indicates a broken plugin.
    pub fn is_fatal(&self) -> bool {
        matches!(self, QueryError::CnameFromAddressPlugin)
    }
}

impl From<PluginError> for QueryError {
    fn from(err: PluginError) -> Self {
        QueryError::Plugin(err)
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            QueryError::OutOfZone => write!(f, "out of zone"),
            QueryError::Plugin(err) => write!(f, "plugin failed: {err}"),
            QueryError::Timeout => write!(f, "plugin timed out"),
            QueryError::UnknownPlugin(plugin) => {
                write!(f, "unknown plugin '{plugin}'")
            }
            QueryError::CnameFromAddressPlugin => {
                write!(f, "plugin returned CNAME for DYNA record")
            }
        }
    }
}

impl std::error::Error for QueryError {}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn conflict_display() {
        let err = ConflictError::new(
            Name::from_str("www.example.com.").unwrap(),
            7,
            ConflictKind::CnameNotExclusive,
        );
        assert_eq!(
            err.to_string(),
            "7: CNAME must be exclusive at 'www.example.com.'"
        );
        let err = LoadError::Conflict {
            source: "example.com.zone".into(),
            err,
        };
        assert_eq!(err.source_name(), Some("example.com.zone"));
        assert_eq!(
            err.to_string(),
            "example.com.zone:7: CNAME must be exclusive at 'www.example.com.'"
        );
    }

    #[test]
    fn zone_errors() {
        let apex = Name::from_str("example.com.").unwrap();
        let errors = ZoneErrors::default();
        assert!(errors.clone().unwrap().is_ok());
        let mut errors = errors;
        errors.add_error(apex.clone(), ValidationError::MissingSoa);
        errors.add_error(apex, ValidationError::MissingNs);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::MissingNs));
        assert_eq!(
            errors.to_string(),
            "zone errors: ['example.com.': missing SOA at apex,\
             'example.com.': missing NS at apex,]"
        );
    }

    #[test]
    fn query_rcodes() {
        assert_eq!(QueryError::OutOfZone.rcode(), Rcode::REFUSED);
        assert_eq!(QueryError::Timeout.rcode(), Rcode::SERVFAIL);
        assert_eq!(
            QueryError::from(PluginError::new("down")).rcode(),
            Rcode::SERVFAIL
        );
        assert!(QueryError::CnameFromAddressPlugin.is_fatal());
    }
}
