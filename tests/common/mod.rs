//! Helpers shared by the integration tests.
#![allow(dead_code)]

use std::net::IpAddr;
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;

use dynzone::base::{Name, Ttl};
use dynzone::config::Config;
use dynzone::dynamic::{
    ClientInfo, DynResolver, Plugin, PluginAnswer, PluginError, Plugins,
};
use dynzone::zonetree::{LoadError, Zone, ZoneLoader};

//------------ TestPlugin ----------------------------------------------------

/// A plugin with canned answers, registered as `test`.
///
/// The resource decides the answer:
///
/// * `pool`: four IPv4 and two IPv6 addresses, changing in 30 seconds,
/// * `stable`: one IPv4 address that never changes,
/// * `alias`: a CNAME to `target.example.net.`, changing in two minutes,
/// * `fail`: an error,
/// * `hang`: never answers in time.
///
/// The resource `rejected` fails validation.
#[derive(Debug, Default)]
pub struct TestPlugin {
    calls: AtomicUsize,
}

impl TestPlugin {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Plugin for TestPlugin {
    fn name(&self) -> &str {
        "test"
    }

    fn validate_resource(&self, resource: &str) -> Result<(), PluginError> {
        if resource == "rejected" {
            Err(PluginError::new("resource not configured"))
        } else {
            Ok(())
        }
    }

    fn resolve<'a>(
        &'a self,
        resource: &'a str,
        _client: &'a ClientInfo,
    ) -> BoxFuture<'a, Result<PluginAnswer, PluginError>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Box::pin(async move {
            match resource {
                "pool" => Ok(PluginAnswer::addresses(
                    [
                        "192.0.2.10",
                        "192.0.2.11",
                        "192.0.2.12",
                        "192.0.2.13",
                        "2001:db8::10",
                        "2001:db8::11",
                    ]
                    .iter()
                    .map(|addr| IpAddr::from_str(addr).unwrap())
                    .collect(),
                )
                .with_ttl(Ttl::from_secs(30))),
                "stable" => Ok(PluginAnswer::addresses(
                    [IpAddr::from_str("192.0.2.20").unwrap()]
                        .into_iter()
                        .collect(),
                )),
                "alias" => Ok(PluginAnswer::cname(name("target.example.net."))
                    .with_ttl(Ttl::from_secs(120))),
                "hang" => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(PluginError::new("woke up"))
                }
                _ => Err(PluginError::new("backend unavailable")),
            }
        })
    }
}

//------------ Helper Functions ----------------------------------------------

pub fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

/// Returns a plugin registry containing the test plugin.
pub fn plugins() -> (Arc<Plugins>, Arc<TestPlugin>) {
    let plugin = Arc::new(TestPlugin::default());
    let plugins = Plugins::new();
    plugins.register(plugin.clone());
    (Arc::new(plugins), plugin)
}

pub fn loader() -> ZoneLoader {
    ZoneLoader::new(Config::default(), plugins().0)
}

pub fn resolver(plugins: Arc<Plugins>) -> DynResolver {
    DynResolver::new(plugins, Duration::from_millis(500))
}

/// Loads a zone from text with the default configuration.
pub fn load(apex: &str, text: &str) -> Result<Zone, LoadError> {
    loader().load_str(name(apex), "test.zone", text)
}

/// Loads the example.com zone from the test data.
pub fn example_zone(loader: &ZoneLoader) -> Zone {
    loader
        .load_file(
            name("example.com."),
            Path::new("test-data/zones/example.com.zone"),
        )
        .unwrap()
}

/// The records every test zone needs.
pub const ZONE_HEAD: &str = "\
@ 3600 SOA ns hostmaster 1 1H 15M 1W 5M
@ 3600 NS ns
ns 3600 A 192.0.2.53
";

/// Installs a log subscriber honouring RUST_LOG.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}
