//! Zone data and dynamic answers for authoritative DNS servers.
//!
//! This crate provides the part of an authoritative name server between
//! the zone files on disk and the answers handed to the wire layer. It
//! reads zone files in the master file format of RFC 1035 with a few
//! extensions, checks and stores their content in memory, and answers
//! queries from it.
//!
//! Next to the usual static records, zones can contain the dynamic record
//! types `DYNA` and `DYNC`. Their answers are produced at query time by
//! plugins, which typically select addresses based on the client and the
//! health of monitored services.
//!
//! # Modules
//!
//! * [base] contains the fundamental types such as domain names and TTLs,
//! * [rdata] contains the record data of all types a zone can hold,
//! * [zonefile] reads zone files into records,
//! * [zonetree] builds zones from records, answers queries from them, and
//!   publishes the zones in service,
//! * [dynamic] defines the interface to plugins and resolves dynamic
//!   records, and
//! * [config] holds the settings affecting all of the above.
//!
//! # Zone file extensions
//!
//! In addition to `$ORIGIN` and `$TTL`, zone files may contain the
//! directives `$ADDR_LIMIT_V4` and `$ADDR_LIMIT_V6`. They limit the number
//! of addresses included in answers for all A and AAAA record sets and
//! dynamic records that follow. The addresses are rotated before the limit
//! is applied, so every address gets its turn.
//!
//! Dynamic records look like this:
//!
//! ```text
//! www  300/60  DYNA  weighted!web-pool
//! ftp  600     DYNC  geoip!ftp
//! ```
//!
//! The TTL field gives the maximum and, optionally, the minimum TTL of the
//! answers. If the minimum is missing, it is half the maximum. The plugin
//! reports how long its answer will stay valid and the resulting TTL is
//! limited to this range.
//!
//! # Reference of Feature Flags
//!
//! * `logging`: Adds [`logging::init_logging`] which installs a
//!   `tracing-subscriber` based log subscriber.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod base;
pub mod config;
pub mod dynamic;
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;
pub mod rdata;
pub mod zonefile;
pub mod zonetree;
