//! A single zone and how queries are answered from it.

use super::answer::{Answer, AnswerAuthority, AnswerRrset};
use super::error::QueryError;
use super::nodes::NameNode;
use super::types::{DynRecord, Rrset};
use crate::base::iana::{Rcode, Rtype};
use crate::base::name::Name;
use crate::base::ttl::Ttl;
use crate::dynamic::plugin::{AddressSet, ClientInfo, PluginResult};
use crate::dynamic::resolve::DynResolver;
use crate::rdata::{Aaaa, Cname, DynKind, ZoneRecordData, A};
use std::collections::HashMap;
use tracing::warn;

//------------ Zone ----------------------------------------------------------

/// A single DNS zone.
///
/// A zone is immutable once built. Loading the zone again produces a new
/// value. The only state that changes while answering queries are the
/// rotation cursors of address sets, which are not considered when
/// comparing zones.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Zone {
    apex: Name,
    nodes: HashMap<Name, NameNode>,

    /// The SOA record for negative answers.
    authority: AnswerAuthority,
}

impl Zone {
    pub(super) fn new(
        apex: Name,
        nodes: HashMap<Name, NameNode>,
        authority: AnswerAuthority,
    ) -> Self {
        Zone {
            apex,
            nodes,
            authority,
        }
    }

    pub fn apex(&self) -> &Name {
        &self.apex
    }

    pub fn node(&self, name: &Name) -> Option<&NameNode> {
        self.nodes.get(name)
    }

    pub fn rrset(&self, name: &Name, rtype: Rtype) -> Option<&Rrset> {
        self.nodes.get(name)?.get(rtype)
    }

    /// Returns all names of the zone, including empty non-terminals.
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.nodes.keys()
    }

    /// Returns the number of names in the zone.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the authority section included with negative answers.
    pub fn negative_authority(&self) -> &AnswerAuthority {
        &self.authority
    }

    /// Answers a query.
    ///
    /// Failures of plugins while resolving a dynamic name in the answer
    /// section fail the query. Failures while collecting additional records
    /// only drop those records.
    pub async fn query(
        &self,
        qname: &Name,
        qtype: Rtype,
        client: &ClientInfo,
        resolver: &DynResolver,
    ) -> Result<Answer, QueryError> {
        if !qname.ends_with(&self.apex) {
            return Err(QueryError::OutOfZone);
        }
        let node = match self.nodes.get(qname) {
            Some(node) => node,
            None => {
                return Ok(Answer::with_authority(
                    Rcode::NXDOMAIN,
                    self.authority.clone(),
                ))
            }
        };

        let mut answer = Answer::new(Rcode::NOERROR);

        if let Some(cname) = node.get(Rtype::CNAME) {
            answer.add_cname(static_rrset(qname, cname));
            return Ok(answer);
        }

        if let Some(dynamic) = node.dynamic() {
            let wanted = dynamic.kind() == DynKind::CnameOrAddress
                || qtype.is_address()
                || qtype == Rtype::ANY;
            if wanted {
                let (result, ttl) = resolver
                    .resolve(dynamic.kind(), dynamic.target(), client)
                    .await?
                    .into_parts();
                match result {
                    PluginResult::Cname(target) => {
                        answer.add_cname(AnswerRrset::new(
                            qname.clone(),
                            Rtype::CNAME,
                            ttl,
                            vec![Cname::new(target).into()],
                        ));
                        return Ok(answer);
                    }
                    PluginResult::Addresses(addrs) => {
                        for rrset in
                            dynamic_rrsets(qname, qtype, dynamic, &addrs, ttl)
                        {
                            answer.add_answer(rrset)
                        }
                    }
                }
            }
        }

        if qtype == Rtype::ANY {
            for rrset in node.rrsets() {
                answer.add_answer(static_rrset(qname, rrset))
            }
        } else if let Some(rrset) = node.get(qtype) {
            answer.add_answer(static_rrset(qname, rrset))
        }

        if answer.answer_rrsets().is_empty() {
            answer.add_authority(self.authority.clone());
            return Ok(answer);
        }

        self.add_additional(&mut answer, client, resolver).await;
        Ok(answer)
    }

    /// Adds address records for in-zone targets of NS, MX, and SRV records.
    async fn add_additional(
        &self,
        answer: &mut Answer,
        client: &ClientInfo,
        resolver: &DynResolver,
    ) {
        let mut targets: Vec<Name> = Vec::new();
        for rrset in answer.answer_rrsets() {
            for data in rrset.data() {
                if let Some(target) = data.additional_target() {
                    if target.ends_with(&self.apex) && !targets.contains(target)
                    {
                        targets.push(target.clone())
                    }
                }
            }
        }

        for target in targets {
            let node = match self.nodes.get(&target) {
                Some(node) => node,
                None => continue,
            };
            if node.has_cname() {
                continue;
            }
            for rtype in [Rtype::A, Rtype::AAAA] {
                if let Some(rrset) = node.get(rtype) {
                    answer.add_additional(static_rrset(&target, rrset))
                }
            }
            let dynamic = match node.dynamic() {
                Some(dynamic) if dynamic.kind() == DynKind::Address => dynamic,
                _ => continue,
            };
            match resolver
                .resolve(dynamic.kind(), dynamic.target(), client)
                .await
            {
                Ok(resolved) => {
                    let (result, ttl) = resolved.into_parts();
                    if let PluginResult::Addresses(addrs) = result {
                        for rrset in dynamic_rrsets(
                            &target,
                            Rtype::ANY,
                            dynamic,
                            &addrs,
                            ttl,
                        ) {
                            answer.add_additional(rrset)
                        }
                    }
                }
                Err(err) => {
                    warn!("skipping additional records for '{target}': {err}")
                }
            }
        }
    }
}

//------------ Helper Functions ----------------------------------------------

/// Returns the answer form of a static RRset.
fn static_rrset(owner: &Name, rrset: &Rrset) -> AnswerRrset {
    AnswerRrset::new(
        owner.clone(),
        rrset.rtype(),
        rrset.ttl(),
        rrset.answer_data(),
    )
}

/// Returns the address RRsets for plugin addresses matching `qtype`.
fn dynamic_rrsets(
    owner: &Name,
    qtype: Rtype,
    record: &DynRecord,
    addrs: &AddressSet,
    ttl: Ttl,
) -> Vec<AnswerRrset> {
    let mut res = Vec::new();
    if matches!(qtype, Rtype::A | Rtype::ANY) && !addrs.v4().is_empty() {
        res.push(AnswerRrset::new(
            owner.clone(),
            Rtype::A,
            ttl,
            record
                .select(Rtype::A, addrs.v4())
                .into_iter()
                .map(|addr| ZoneRecordData::from(A::new(addr)))
                .collect(),
        ));
    }
    if matches!(qtype, Rtype::AAAA | Rtype::ANY) && !addrs.v6().is_empty() {
        res.push(AnswerRrset::new(
            owner.clone(),
            Rtype::AAAA,
            ttl,
            record
                .select(Rtype::AAAA, addrs.v6())
                .into_iter()
                .map(|addr| ZoneRecordData::from(Aaaa::new(addr)))
                .collect(),
        ));
    }
    res
}
