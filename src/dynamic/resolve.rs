//! Resolving dynamic records.

use super::plugin::{ClientInfo, PluginResult, Plugins};
use crate::base::ttl::Ttl;
use crate::config::Config;
use crate::rdata::{DynKind, DynTarget};
use crate::zonetree::error::QueryError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{trace, warn};

//------------ DynResolver ---------------------------------------------------

/// Asks plugins for the answers to dynamic records.
///
/// The resolver bounds every plugin call by a timeout and turns the time
/// to change reported by the plugin into the TTL of the answer.
#[derive(Clone, Debug)]
pub struct DynResolver {
    plugins: Arc<Plugins>,
    timeout: Duration,
}

impl DynResolver {
    pub fn new(plugins: Arc<Plugins>, timeout: Duration) -> Self {
        DynResolver { plugins, timeout }
    }

    pub fn from_config(plugins: Arc<Plugins>, config: &Config) -> Self {
        Self::new(plugins, config.plugin_timeout())
    }

    pub fn plugins(&self) -> &Arc<Plugins> {
        &self.plugins
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves a dynamic record for a client.
    pub async fn resolve(
        &self,
        kind: DynKind,
        target: &DynTarget,
        client: &ClientInfo,
    ) -> Result<DynAnswer, QueryError> {
        let plugin = self
            .plugins
            .get(target.plugin())
            .ok_or_else(|| QueryError::UnknownPlugin(target.plugin().into()))?;
        let answer = match tokio::time::timeout(
            self.timeout,
            plugin.resolve(target.resource(), client),
        )
        .await
        {
            Ok(Ok(answer)) => answer,
            Ok(Err(err)) => {
                warn!(
                    "plugin '{}' failed for '{}': {err}",
                    target.plugin(),
                    target.resource()
                );
                return Err(err.into());
            }
            Err(_) => {
                warn!(
                    "plugin '{}' timed out for '{}'",
                    target.plugin(),
                    target.resource()
                );
                return Err(QueryError::Timeout);
            }
        };
        let (result, time_to_change) = answer.into_parts();
        if kind == DynKind::Address {
            if let PluginResult::Cname(ref cname) = result {
                warn!(
                    "plugin '{}' returned CNAME '{cname}' for DYNA \
                     resource '{}'",
                    target.plugin(),
                    target.resource()
                );
                return Err(QueryError::CnameFromAddressPlugin);
            }
        }
        let ttl = target.ttl().clamp(time_to_change);
        trace!(
            "plugin '{}' answered for '{}' with TTL {ttl}",
            target.plugin(),
            target.resource()
        );
        Ok(DynAnswer { result, ttl })
    }
}

//------------ DynAnswer -----------------------------------------------------

/// The resolved answer of a dynamic record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DynAnswer {
    result: PluginResult,
    ttl: Ttl,
}

impl DynAnswer {
    pub fn result(&self) -> &PluginResult {
        &self.result
    }

    /// The TTL for the answer, already clamped to the record’s range.
    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    pub fn into_parts(self) -> (PluginResult, Ttl) {
        (self.result, self.ttl)
    }
}

//============ Tests =========================================================
