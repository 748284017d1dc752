//! The known set of zones and their publication.

use super::answer::Answer;
use super::error::LoadError;
use super::zone::Zone;
use crate::base::iana::Rtype;
use crate::base::name::Name;
use crate::dynamic::plugin::ClientInfo;
use crate::dynamic::resolve::DynResolver;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::vec::Vec;
use tracing::{debug, info, warn};

//------------ ZoneTree ------------------------------------------------------

/// The hierarchy of zones we are authoritative for.
///
/// Zones are kept behind arcs so that cloning the tree for an update
/// doesn’t copy the zones themselves.
#[derive(Clone, Debug, Default)]
pub struct ZoneTree {
    root: ZoneSetNode,
    count: usize,
}

impl ZoneTree {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the zone with exactly the given apex.
    pub fn get_zone(&self, apex_name: &Name) -> Option<&Arc<Zone>> {
        self.root.get_zone(label_keys(apex_name).into_iter())
    }

    /// Adds a zone.
    ///
    /// Fails if there already is a zone with the same apex.
    pub fn insert_zone(
        &mut self,
        zone: Arc<Zone>,
    ) -> Result<(), ZoneTreeModificationError> {
        let keys = label_keys(zone.apex());
        self.root.insert_zone(keys.into_iter(), zone)?;
        self.count += 1;
        Ok(())
    }

    /// Adds a zone, replacing an existing zone with the same apex.
    ///
    /// Returns the replaced zone.
    pub fn replace_zone(&mut self, zone: Arc<Zone>) -> Option<Arc<Zone>> {
        let keys = label_keys(zone.apex());
        let old = self.root.replace_zone(keys.into_iter(), zone);
        if old.is_none() {
            self.count += 1;
        }
        old
    }

    /// Returns the zone a name belongs to.
    ///
    /// This is the zone with the longest apex the name ends in.
    pub fn find_zone(&self, qname: &Name) -> Option<&Arc<Zone>> {
        self.root.find_zone(label_keys(qname).into_iter())
    }

    pub fn remove_zone(
        &mut self,
        apex_name: &Name,
    ) -> Result<Arc<Zone>, ZoneTreeModificationError> {
        let zone = self
            .root
            .remove_zone(label_keys(apex_name).into_iter())
            .ok_or(ZoneTreeModificationError::ZoneDoesNotExist)?;
        self.count -= 1;
        Ok(zone)
    }

    pub fn iter_zones(&self) -> impl Iterator<Item = &Arc<Zone>> {
        let mut res = Vec::new();
        self.root.collect_zones(&mut res);
        res.into_iter()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Returns the lowercased labels of a name starting at the root.
fn label_keys(name: &Name) -> Vec<Box<[u8]>> {
    let mut res: Vec<Box<[u8]>> = name
        .labels()
        .map(|label| label.to_ascii_lowercase().into_boxed_slice())
        .collect();
    res.reverse();
    res
}

//------------ ZoneSetNode ---------------------------------------------------

#[derive(Clone, Debug, Default)]
struct ZoneSetNode {
    zone: Option<Arc<Zone>>,
    children: HashMap<Box<[u8]>, ZoneSetNode>,
}

impl ZoneSetNode {
    fn get_zone(
        &self,
        mut apex_name: impl Iterator<Item = Box<[u8]>>,
    ) -> Option<&Arc<Zone>> {
        match apex_name.next() {
            Some(label) => self.children.get(&label)?.get_zone(apex_name),
            None => self.zone.as_ref(),
        }
    }

    fn find_zone(
        &self,
        mut qname: impl Iterator<Item = Box<[u8]>>,
    ) -> Option<&Arc<Zone>> {
        if let Some(label) = qname.next() {
            if let Some(node) = self.children.get(&label) {
                if let Some(zone) = node.find_zone(qname) {
                    return Some(zone);
                }
            }
        }
        self.zone.as_ref()
    }

    fn insert_zone(
        &mut self,
        mut apex_name: impl Iterator<Item = Box<[u8]>>,
        zone: Arc<Zone>,
    ) -> Result<(), ZoneTreeModificationError> {
        if let Some(label) = apex_name.next() {
            self.children
                .entry(label)
                .or_default()
                .insert_zone(apex_name, zone)
        } else if self.zone.is_some() {
            Err(ZoneTreeModificationError::ZoneExists)
        } else {
            self.zone = Some(zone);
            Ok(())
        }
    }

    fn replace_zone(
        &mut self,
        mut apex_name: impl Iterator<Item = Box<[u8]>>,
        zone: Arc<Zone>,
    ) -> Option<Arc<Zone>> {
        match apex_name.next() {
            Some(label) => self
                .children
                .entry(label)
                .or_default()
                .replace_zone(apex_name, zone),
            None => self.zone.replace(zone),
        }
    }

    fn remove_zone(
        &mut self,
        mut apex_name: impl Iterator<Item = Box<[u8]>>,
    ) -> Option<Arc<Zone>> {
        match apex_name.next() {
            Some(label) => {
                let child = self.children.get_mut(&label)?;
                let res = child.remove_zone(apex_name);
                if child.zone.is_none() && child.children.is_empty() {
                    self.children.remove(&label);
                }
                res
            }
            None => self.zone.take(),
        }
    }

    fn collect_zones<'a>(&'a self, target: &mut Vec<&'a Arc<Zone>>) {
        if let Some(zone) = self.zone.as_ref() {
            target.push(zone)
        }
        for child in self.children.values() {
            child.collect_zones(target)
        }
    }
}

//------------ LiveZones -----------------------------------------------------

/// The set of zones currently answering queries.
///
/// Queries work on a snapshot of the tree. Updates build a new tree next
/// to the current one and swap it in, so a query in flight never sees a
/// partially updated zone.
#[derive(Debug, Default)]
pub struct LiveZones {
    tree: ArcSwap<ZoneTree>,
}

impl LiveZones {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the current tree.
    pub fn snapshot(&self) -> Arc<ZoneTree> {
        self.tree.load_full()
    }

    /// Publishes a zone, replacing a zone with the same apex.
    pub fn publish(&self, zone: Zone) {
        let zone = Arc::new(zone);
        let apex = zone.apex().clone();
        self.tree.rcu(|tree| {
            let mut tree = ZoneTree::clone(tree);
            tree.replace_zone(zone.clone());
            tree
        });
        info!("published zone '{apex}'");
    }

    /// Stops answering for a zone.
    ///
    /// Returns whether the zone was present.
    pub fn withdraw(&self, apex: &Name) -> bool {
        let mut found = false;
        self.tree.rcu(|tree| {
            let mut tree = ZoneTree::clone(tree);
            found = tree.remove_zone(apex).is_ok();
            tree
        });
        if found {
            info!("withdrew zone '{apex}'");
        }
        found
    }

    /// Publishes the result of reloading a zone.
    ///
    /// If loading failed, the zone currently published for `apex`, if any,
    /// stays in place and the error is returned.
    pub fn reload(
        &self,
        apex: &Name,
        result: Result<Zone, LoadError>,
    ) -> Result<(), LoadError> {
        match result {
            Ok(zone) => {
                self.publish(zone);
                Ok(())
            }
            Err(err) => {
                if self.tree.load().get_zone(apex).is_some() {
                    warn!(
                        "reloading zone '{apex}' failed, keeping old data: \
                         {err}"
                    );
                } else {
                    warn!("loading zone '{apex}' failed: {err}");
                }
                Err(err)
            }
        }
    }

    /// Answers a query from the published zones.
    ///
    /// Names outside all zones are refused. Query failures become
    /// SERVFAIL.
    pub async fn answer(
        &self,
        qname: &Name,
        qtype: Rtype,
        client: &ClientInfo,
        resolver: &DynResolver,
    ) -> Answer {
        let tree = self.tree.load_full();
        let zone = match tree.find_zone(qname) {
            Some(zone) => zone,
            None => {
                debug!("refusing query for '{qname}'");
                return Answer::refused();
            }
        };
        match zone.query(qname, qtype, client, resolver).await {
            Ok(answer) => answer,
            Err(err) => {
                debug!("query for '{qname}' {qtype} failed: {err}");
                Answer::new(err.rcode())
            }
        }
    }
}

//------------ ZoneTreeModificationError -------------------------------------

/// An attempt to modify a [`ZoneTree`] failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ZoneTreeModificationError {
    /// The specified zone already exists.
    ZoneExists,

    /// The specified zone does not exist.
    ZoneDoesNotExist,
}

impl Display for ZoneTreeModificationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ZoneTreeModificationError::ZoneExists => {
                write!(f, "zone already exists")
            }
            ZoneTreeModificationError::ZoneDoesNotExist => {
                write!(f, "zone does not exist")
            }
        }
    }
}

impl std::error::Error for ZoneTreeModificationError {}
