//! Building, querying, and publishing zones.
//!
//! Records scanned from a zone file are collected by a [`ZoneBuilder`]
//! which checks that the data at each name fits together. The result is an
//! immutable [`Zone`]. Zones answer queries via [`Zone::query`], asking a
//! [`DynResolver`] for the data of dynamic records.
//!
//! The zones currently in service are kept in a [`ZoneTree`] published
//! through [`LiveZones`]. Replacing a zone swaps in a new tree while
//! queries in flight keep using the old one.
//!
//! [`DynResolver`]: crate::dynamic::DynResolver

mod builder;
mod load;
mod nodes;
mod tree;
mod types;
mod zone;

pub mod answer;
pub mod error;

pub use self::answer::{Answer, AnswerAuthority, AnswerContent, AnswerRrset};
pub use self::builder::ZoneBuilder;
pub use self::error::{
    ConflictError, ConflictKind, LoadError, QueryError, ValidationError,
    ZoneErrors,
};
pub use self::load::ZoneLoader;
pub use self::nodes::NameNode;
pub use self::tree::{LiveZones, ZoneTree, ZoneTreeModificationError};
pub use self::types::{DynRecord, RotationCursor, Rrset};
pub use self::zone::Zone;
