//! Building a zone from records.
//!
//! The [`ZoneBuilder`] receives records in file order and checks each of
//! them against the data already present at its owner name. Once all
//! records are in, [`ZoneBuilder::build`] checks the zone as a whole and
//! produces an immutable [`Zone`].

use super::answer::AnswerAuthority;
use super::error::{ConflictError, ConflictKind, ValidationError, ZoneErrors};
use super::nodes::NameNode;
use super::types::{DynRecord, Rrset};
use super::zone::Zone;
use crate::base::iana::Rtype;
use crate::base::name::Name;
use crate::dynamic::plugin::Plugins;
use crate::rdata::{DynKind, ZoneRecordData};
use crate::zonefile::inplace::ScannedRecord;
use std::collections::HashMap;
use tracing::{debug, trace};

//------------ ZoneBuilder ---------------------------------------------------

/// Collects the records of a zone.
#[derive(Clone, Debug)]
pub struct ZoneBuilder {
    apex: Name,
    nodes: HashMap<Name, NameNode>,
    records: usize,
}

impl ZoneBuilder {
    pub fn new(apex: Name) -> Self {
        ZoneBuilder {
            apex,
            nodes: HashMap::new(),
            records: 0,
        }
    }

    pub fn apex(&self) -> &Name {
        &self.apex
    }

    /// Returns the node for a name if it exists.
    pub fn node(&self, name: &Name) -> Option<&NameNode> {
        self.nodes.get(name)
    }

    /// Returns the number of records accepted so far.
    pub fn record_count(&self) -> usize {
        self.records
    }

    /// Adds a record.
    ///
    /// Records outside the zone are rejected by the scanner already and
    /// are ignored here.
    pub fn insert(
        &mut self,
        record: ScannedRecord,
    ) -> Result<(), ConflictError> {
        let ScannedRecord {
            owner,
            ttl,
            data,
            limits,
            line,
        } = record;
        if !owner.ends_with(&self.apex) {
            debug!("ignoring out of zone record at '{owner}'");
            return Ok(());
        }
        let is_apex = owner == self.apex;
        let conflict = |kind| ConflictError::new(owner.clone(), line, kind);

        for name in owner.ancestors_to(&self.apex) {
            self.nodes.entry(name).or_default();
        }
        let node = match self.nodes.get_mut(&owner) {
            Some(node) => node,
            None => return Ok(()),
        };

        let dynamic = data.as_dynamic().map(|(kind, _)| kind);
        let rtype = data.rtype();

        // Addresses vs DYNA.
        if dynamic == Some(DynKind::Address) && node.has_address() {
            return Err(conflict(ConflictKind::AddressWithDyna));
        }
        if rtype.map(Rtype::is_address).unwrap_or(false)
            && node.dynamic().map(|dynamic| dynamic.kind())
                == Some(DynKind::Address)
        {
            return Err(conflict(ConflictKind::AddressWithDyna));
        }

        // DYNC is alone.
        if dynamic == Some(DynKind::CnameOrAddress) {
            if is_apex {
                return Err(conflict(ConflictKind::DyncAtApex));
            }
            if !node.is_empty() {
                return Err(conflict(ConflictKind::DyncNotExclusive));
            }
        }
        if node.dynamic().map(|dynamic| dynamic.kind())
            == Some(DynKind::CnameOrAddress)
        {
            return Err(conflict(ConflictKind::DyncNotExclusive));
        }

        // CNAME is alone, too.
        if rtype == Some(Rtype::CNAME) {
            if node.has_cname() {
                return Err(conflict(ConflictKind::MultipleCnames));
            }
            if node.has_non_cname_data() {
                return Err(conflict(ConflictKind::CnameNotExclusive));
            }
        } else if node.has_cname() {
            return Err(conflict(ConflictKind::CnameNotExclusive));
        }

        if rtype == Some(Rtype::SOA) {
            if !is_apex {
                return Err(conflict(ConflictKind::SoaOutsideApex));
            }
            if node.get(Rtype::SOA).is_some() {
                return Err(conflict(ConflictKind::MultipleSoa));
            }
        }

        let data = match data.into_dynamic() {
            Ok((kind, target)) => {
                if node.dynamic().is_some() {
                    return Err(conflict(ConflictKind::MultipleDynamic));
                }
                trace!("added {kind} record at '{owner}'");
                node.set_dynamic(DynRecord::new(kind, target, limits));
                self.records += 1;
                return Ok(());
            }
            Err(data) => data,
        };
        let rtype = match rtype {
            Some(rtype) => rtype,
            None => return Ok(()),
        };

        match node.get_mut(rtype) {
            Some(rrset) => {
                if rrset.ttl() != ttl {
                    return Err(conflict(ConflictKind::TtlMismatch));
                }
                if !rrset.push_data(data) {
                    debug!(
                        "dropping duplicate {rtype} record at '{owner}', \
                         line {line}"
                    );
                    return Ok(());
                }
            }
            None => {
                let mut rrset =
                    Rrset::with_limit(rtype, ttl, limits.for_rtype(rtype));
                rrset.push_data(data);
                node.insert_rrset(rrset);
            }
        }
        trace!("added {rtype} record at '{owner}'");
        self.records += 1;
        Ok(())
    }

    /// Checks the zone as a whole and finishes it.
    ///
    /// All problems are collected so they can be reported at once.
    pub fn build(self, plugins: &Plugins) -> Result<Zone, ZoneErrors> {
        let mut errors = ZoneErrors::default();

        let apex_node = self.nodes.get(&self.apex);
        let authority = apex_node
            .and_then(|node| node.get(Rtype::SOA))
            .and_then(|rrset| match (rrset.first(), rrset.ttl()) {
                (Some(ZoneRecordData::Soa(soa)), ttl) => {
                    Some(AnswerAuthority::new(
                        self.apex.clone(),
                        ttl.min(soa.minimum()),
                        soa.clone(),
                    ))
                }
                _ => None,
            });
        if authority.is_none() {
            errors.add_error(self.apex.clone(), ValidationError::MissingSoa);
        }
        if apex_node.and_then(|node| node.get(Rtype::NS)).is_none() {
            errors.add_error(self.apex.clone(), ValidationError::MissingNs);
        }

        let mut dynamic: Vec<_> = self
            .nodes
            .iter()
            .filter_map(|(name, node)| Some((name, node.dynamic()?)))
            .collect();
        dynamic.sort_by(|left, right| left.0.cmp(right.0));
        for (name, record) in dynamic {
            let target = record.target();
            match plugins.get(target.plugin()) {
                None => errors.add_error(
                    name.clone(),
                    ValidationError::UnknownPlugin(target.plugin().into()),
                ),
                Some(plugin) => {
                    if let Err(err) = plugin.validate_resource(target.resource())
                    {
                        errors.add_error(
                            name.clone(),
                            ValidationError::InvalidResource {
                                plugin: target.plugin().into(),
                                resource: target.resource().into(),
                                err,
                            },
                        )
                    }
                }
            }
        }

        // A missing authority has been recorded as an error above.
        match authority {
            Some(authority) if errors.is_empty() => {
                debug!(
                    "zone '{}' built with {} names and {} records",
                    self.apex,
                    self.nodes.len(),
                    self.records
                );
                Ok(Zone::new(self.apex, self.nodes, authority))
            }
            _ => Err(errors),
        }
    }
}

//============ Tests =========================================================
