//! The data stored at a single name of a zone.

use super::types::{DynRecord, Rrset};
use crate::base::iana::Rtype;
use std::collections::BTreeMap;

//------------ NameNode ------------------------------------------------------

/// Everything a zone has for one owner name.
///
/// A node without any RRsets and without a dynamic record is an empty
/// non-terminal: it exists only because there are names below it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NameNode {
    rrsets: BTreeMap<Rtype, Rrset>,
    dynamic: Option<DynRecord>,
}

impl NameNode {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns whether the node holds no data at all.
    pub fn is_empty(&self) -> bool {
        self.rrsets.is_empty() && self.dynamic.is_none()
    }

    pub fn get(&self, rtype: Rtype) -> Option<&Rrset> {
        self.rrsets.get(&rtype)
    }

    pub fn get_mut(&mut self, rtype: Rtype) -> Option<&mut Rrset> {
        self.rrsets.get_mut(&rtype)
    }

    /// Returns all static RRsets ordered by type.
    pub fn rrsets(&self) -> impl Iterator<Item = &Rrset> {
        self.rrsets.values()
    }

    pub fn dynamic(&self) -> Option<&DynRecord> {
        self.dynamic.as_ref()
    }

    pub fn has_cname(&self) -> bool {
        self.rrsets.contains_key(&Rtype::CNAME)
    }

    pub fn has_address(&self) -> bool {
        self.rrsets.contains_key(&Rtype::A)
            || self.rrsets.contains_key(&Rtype::AAAA)
    }

    /// Returns whether there is data other than a CNAME RRset.
    pub fn has_non_cname_data(&self) -> bool {
        self.dynamic.is_some()
            || self.rrsets.keys().any(|rtype| *rtype != Rtype::CNAME)
    }

    /// Inserts an RRset, replacing one of the same type.
    pub fn insert_rrset(&mut self, rrset: Rrset) {
        self.rrsets.insert(rrset.rtype(), rrset);
    }

    pub fn set_dynamic(&mut self, dynamic: DynRecord) {
        self.dynamic = Some(dynamic)
    }

    pub fn rrset_count(&self) -> usize {
        self.rrsets.len()
    }
}
