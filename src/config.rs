//! Configuration of zone loading and dynamic resolution.
//!
//! Reading configuration files is left to the application. The [`Config`]
//! type can be deserialized from any format supported by serde and every
//! field has a default, so an empty document is a valid configuration.

use crate::base::ttl::Ttl;
use serde::Deserialize;
use std::time::Duration;

/// The default timeout for a single plugin invocation in milliseconds.
pub const DEFAULT_PLUGIN_TIMEOUT_MS: u64 = 1000;

//------------ Config --------------------------------------------------------

/// Settings for loading zones and resolving dynamic records.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The TTL of records without a TTL before the first `$TTL`.
    pub zones_default_ttl: Ttl,

    /// Whether TXT strings longer than 255 octets are split.
    ///
    /// If disabled, such strings are an error.
    pub txt_autosplit: bool,

    /// How long a plugin may take to answer, in milliseconds.
    #[serde(rename = "plugin_timeout")]
    pub plugin_timeout_ms: u64,
}

impl Config {
    /// Returns the plugin timeout.
    pub fn plugin_timeout(&self) -> Duration {
        Duration::from_millis(self.plugin_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            zones_default_ttl: Ttl::DAY,
            txt_autosplit: true,
            plugin_timeout_ms: DEFAULT_PLUGIN_TIMEOUT_MS,
        }
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.zones_default_ttl, Ttl::from_secs(86400));
        assert!(config.txt_autosplit);
        assert_eq!(config.plugin_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn from_yaml() {
        let config: Config = serde_yaml::from_str(
            "zones_default_ttl: 3600\n\
             txt_autosplit: false\n\
             plugin_timeout: 250\n",
        )
        .unwrap();
        assert_eq!(config.zones_default_ttl, Ttl::from_secs(3600));
        assert!(!config.txt_autosplit);
        assert_eq!(config.plugin_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn unknown_field() {
        assert!(serde_yaml::from_str::<Config>("zone_ttl: 5\n").is_err());
    }
}
