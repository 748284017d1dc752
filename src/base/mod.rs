//! Basics.
//!
//! This module provides the fundamental types for working with zone data:
//! domain names, TTLs, the IANA registries for record types, classes, and
//! response codes, and the traits for scanning values from the
//! presentation format.

pub use self::iana::{Class, Rcode, Rtype};
pub use self::name::Name;
pub use self::ttl::Ttl;

pub mod iana;
pub mod name;
pub mod scan;
pub mod ttl;
