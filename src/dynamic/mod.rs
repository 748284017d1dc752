//! Dynamic records.
//!
//! The records `DYNA` and `DYNC` don’t carry data of their own. Instead,
//! they name a plugin and a resource and the plugin decides the answer
//! for each query, usually based on the client and on the health of the
//! monitored services behind the resource.
//!
//! This module contains the [`Plugin`] trait plugins implement, the
//! [`DynResolver`] that calls them with a timeout and clamps the TTL of
//! their answers, and a few helpers for plugins dealing with monitored
//! services.

pub mod monitor;
pub mod plugin;
pub mod resolve;

pub use self::plugin::{
    AddressSet, ClientInfo, ClientSubnet, Plugin, PluginAnswer, PluginError,
    PluginResult, Plugins,
};
pub use self::resolve::{DynAnswer, DynResolver};
