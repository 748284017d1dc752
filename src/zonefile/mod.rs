//! Reading zone files.
//!
//! The [`inplace`] module scans the text of a zone file into records, the
//! [`directive`] module holds the state directives change along the way.

pub mod directive;
pub mod inplace;
