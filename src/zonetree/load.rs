//! Loading zones from zone files.

use super::builder::ZoneBuilder;
use super::error::LoadError;
use super::zone::Zone;
use crate::base::name::Name;
use crate::config::Config;
use crate::dynamic::plugin::Plugins;
use crate::zonefile::inplace::Zonefile;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

//------------ ZoneLoader ----------------------------------------------------

/// Turns zone files into zones.
///
/// The loader knows the configuration that affects parsing and the plugins
/// that dynamic records are checked against.
#[derive(Clone, Debug)]
pub struct ZoneLoader {
    config: Config,
    plugins: Arc<Plugins>,
}

impl ZoneLoader {
    pub fn new(config: Config, plugins: Arc<Plugins>) -> Self {
        ZoneLoader { config, plugins }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn plugins(&self) -> &Arc<Plugins> {
        &self.plugins
    }

    /// Loads a zone from a file.
    ///
    /// The path is used as the source name in errors.
    pub fn load_file(
        &self,
        apex: Name,
        path: impl AsRef<Path>,
    ) -> Result<Zone, LoadError> {
        let path = path.as_ref();
        let source: Arc<str> = path.display().to_string().into();
        let mut file = File::open(path).map_err(|err| LoadError::Io {
            source: source.clone(),
            err,
        })?;
        self.load_reader(apex, source, &mut file)
    }

    /// Loads a zone from a reader.
    pub fn load_reader(
        &self,
        apex: Name,
        source: impl Into<Arc<str>>,
        read: &mut impl io::Read,
    ) -> Result<Zone, LoadError> {
        let source = source.into();
        let mut zonefile =
            Zonefile::load(read, apex).map_err(|err| LoadError::Io {
                source: source.clone(),
                err,
            })?;
        zonefile.apply_config(&self.config);
        zonefile.set_source_name(source.clone());
        self.build(zonefile, source)
    }

    /// Loads a zone from text.
    pub fn load_str(
        &self,
        apex: Name,
        source: impl Into<Arc<str>>,
        text: &str,
    ) -> Result<Zone, LoadError> {
        let source = source.into();
        let mut zonefile = Zonefile::with_config(apex, &self.config);
        zonefile.set_source_name(source.clone());
        zonefile.extend_from_slice(text.as_bytes());
        self.build(zonefile, source)
    }

    fn build(
        &self,
        mut zonefile: Zonefile,
        source: Arc<str>,
    ) -> Result<Zone, LoadError> {
        let mut builder = ZoneBuilder::new(zonefile.apex().clone());
        while let Some(record) = zonefile.next_record()? {
            builder.insert(record).map_err(|err| LoadError::Conflict {
                source: source.clone(),
                err,
            })?;
        }
        let zone = builder.build(&self.plugins).map_err(|errors| {
            LoadError::Validation {
                source: source.clone(),
                errors,
            }
        })?;
        debug!("loaded zone '{}' from {source}", zone.apex());
        Ok(zone)
    }
}
