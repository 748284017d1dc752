//! The interface between zones and address-selection plugins.
//!
//! A dynamic record names a plugin and a resource. When a query hits such a
//! record, the plugin is asked for the answer, given information about the
//! client. Plugins are registered by name in a [`Plugins`] registry.

use crate::base::name::Name;
use crate::base::ttl::Ttl;
use core::fmt;
use futures_util::future::BoxFuture;
use parking_lot::RwLock;
use std::borrow::Cow;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

//------------ Plugin --------------------------------------------------------

/// A source of dynamic answers.
pub trait Plugin: fmt::Debug + Send + Sync {
    /// The name the plugin is referred to by in zone files.
    fn name(&self) -> &str;

    /// Checks a resource name when a zone is loaded.
    ///
    /// The default implementation accepts every resource.
    fn validate_resource(&self, resource: &str) -> Result<(), PluginError> {
        let _ = resource;
        Ok(())
    }

    /// Produces the answer for a resource.
    fn resolve<'a>(
        &'a self,
        resource: &'a str,
        client: &'a ClientInfo,
    ) -> BoxFuture<'a, Result<PluginAnswer, PluginError>>;
}

//------------ ClientInfo ----------------------------------------------------

/// What is known about the client that sent a query.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ClientInfo {
    /// The source address of the query.
    addr: Option<IpAddr>,

    /// The edns-client-subnet option of the query.
    subnet: Option<ClientSubnet>,
}

impl ClientInfo {
    pub fn new(addr: Option<IpAddr>, subnet: Option<ClientSubnet>) -> Self {
        ClientInfo { addr, subnet }
    }

    /// Creates client info for a plain source address.
    pub fn from_addr(addr: IpAddr) -> Self {
        ClientInfo {
            addr: Some(addr),
            subnet: None,
        }
    }

    pub fn addr(&self) -> Option<IpAddr> {
        self.addr
    }

    pub fn subnet(&self) -> Option<ClientSubnet> {
        self.subnet
    }

    /// Returns the address a plugin should base its decision on.
    ///
    /// This is the subnet address if present, otherwise the source address.
    pub fn effective_addr(&self) -> Option<IpAddr> {
        self.subnet.map(|subnet| subnet.addr()).or(self.addr)
    }
}

//------------ ClientSubnet --------------------------------------------------

/// The content of an edns-client-subnet option.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClientSubnet {
    addr: IpAddr,
    source_prefix_len: u8,
}

impl ClientSubnet {
    pub fn new(addr: IpAddr, source_prefix_len: u8) -> Self {
        ClientSubnet {
            addr,
            source_prefix_len,
        }
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn source_prefix_len(&self) -> u8 {
        self.source_prefix_len
    }
}

//------------ AddressSet ----------------------------------------------------

/// The addresses a plugin selected.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AddressSet {
    v4: Vec<Ipv4Addr>,
    v6: Vec<Ipv6Addr>,
}

impl AddressSet {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, addr: IpAddr) {
        match addr {
            IpAddr::V4(addr) => self.v4.push(addr),
            IpAddr::V6(addr) => self.v6.push(addr),
        }
    }

    pub fn v4(&self) -> &[Ipv4Addr] {
        &self.v4
    }

    pub fn v6(&self) -> &[Ipv6Addr] {
        &self.v6
    }

    pub fn is_empty(&self) -> bool {
        self.v4.is_empty() && self.v6.is_empty()
    }
}

impl FromIterator<IpAddr> for AddressSet {
    fn from_iter<I: IntoIterator<Item = IpAddr>>(iter: I) -> Self {
        let mut res = AddressSet::new();
        for addr in iter {
            res.push(addr)
        }
        res
    }
}

//------------ PluginResult --------------------------------------------------

/// What a plugin answered with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PluginResult {
    /// A set of addresses.
    Addresses(AddressSet),

    /// An alias for the queried name.
    ///
    /// Only acceptable for `DYNC` records.
    Cname(Name),
}

//------------ PluginAnswer --------------------------------------------------

/// The answer of a plugin.
///
/// Next to the result itself, the answer carries the minimum time until
/// the result may change. The resolver turns this into the TTL of the
/// answer by clamping it to the range of the record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PluginAnswer {
    result: PluginResult,
    ttl: Ttl,
}

impl PluginAnswer {
    /// Creates an answer with addresses.
    ///
    /// The time to change starts out as the maximum and can be lowered via
    /// [`limit_ttl`][Self::limit_ttl].
    pub fn addresses(addrs: AddressSet) -> Self {
        PluginAnswer {
            result: PluginResult::Addresses(addrs),
            ttl: Ttl::MAX,
        }
    }

    /// Creates an answer with an alias.
    pub fn cname(target: Name) -> Self {
        PluginAnswer {
            result: PluginResult::Cname(target),
            ttl: Ttl::MAX,
        }
    }

    /// Sets the time to change.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = ttl;
        self
    }

    /// Lowers the time to change to `ttl` if that is smaller.
    ///
    /// Plugins that combine several monitored resources call this once for
    /// each of them.
    pub fn limit_ttl(&mut self, ttl: Ttl) {
        if ttl < self.ttl {
            self.ttl = ttl
        }
    }

    pub fn result(&self) -> &PluginResult {
        &self.result
    }

    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    pub fn into_parts(self) -> (PluginResult, Ttl) {
        (self.result, self.ttl)
    }
}

//------------ Plugins -------------------------------------------------------

/// The registry of all plugins.
#[derive(Debug, Default)]
pub struct Plugins {
    plugins: RwLock<HashMap<String, Arc<dyn Plugin>>>,
}

impl Plugins {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a plugin under its own name.
    ///
    /// Returns the plugin previously registered under that name, if any.
    pub fn register(
        &self,
        plugin: Arc<dyn Plugin>,
    ) -> Option<Arc<dyn Plugin>> {
        let name = plugin.name().to_string();
        self.plugins.write().insert(name, plugin)
    }

    pub fn unregister(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.write().remove(name)
    }

    /// Returns the plugin with the given name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.plugins.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.read().is_empty()
    }
}

//------------ PluginError ---------------------------------------------------

/// A plugin failed to produce an answer or rejected a resource.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PluginError {
    message: Cow<'static, str>,
}

impl PluginError {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        PluginError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PluginError {}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug)]
    struct Fixed;

    impl Plugin for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn resolve<'a>(
            &'a self,
            _resource: &'a str,
            _client: &'a ClientInfo,
        ) -> BoxFuture<'a, Result<PluginAnswer, PluginError>> {
            Box::pin(async move {
                Ok(PluginAnswer::addresses(AddressSet::new()))
            })
        }
    }

    #[test]
    fn registry() {
        let plugins = Plugins::new();
        assert!(plugins.is_empty());
        assert!(plugins.register(Arc::new(Fixed)).is_none());
        assert!(plugins.contains("fixed"));
        assert!(plugins.get("fixed").is_some());
        assert!(plugins.get("weighted").is_none());
        assert!(plugins.register(Arc::new(Fixed)).is_some());
        assert_eq!(plugins.len(), 1);
        assert!(plugins.unregister("fixed").is_some());
        assert!(!plugins.contains("fixed"));
    }

    #[test]
    fn default_validation_accepts() {
        assert!(Fixed.validate_resource("anything").is_ok());
    }

    #[test]
    fn limit_ttl_keeps_minimum() {
        let mut answer = PluginAnswer::addresses(AddressSet::new())
            .with_ttl(Ttl::from_secs(300));
        answer.limit_ttl(Ttl::from_secs(600));
        assert_eq!(answer.ttl(), Ttl::from_secs(300));
        answer.limit_ttl(Ttl::from_secs(30));
        assert_eq!(answer.ttl(), Ttl::from_secs(30));
    }

    #[test]
    fn address_set_split() {
        let set: AddressSet = [
            "192.0.2.1".parse::<IpAddr>().unwrap(),
            "2001:db8::1".parse().unwrap(),
            "192.0.2.2".parse().unwrap(),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.v4().len(), 2);
        assert_eq!(set.v6().len(), 1);
        assert!(!set.is_empty());
    }

    #[test]
    fn effective_addr() {
        let addr: IpAddr = "192.0.2.1".parse().unwrap();
        let subnet: IpAddr = "198.51.100.0".parse().unwrap();
        assert_eq!(ClientInfo::from_addr(addr).effective_addr(), Some(addr));
        assert_eq!(
            ClientInfo::new(Some(addr), Some(ClientSubnet::new(subnet, 24)))
                .effective_addr(),
            Some(subnet)
        );
        assert_eq!(ClientInfo::default().effective_addr(), None);
    }
}
