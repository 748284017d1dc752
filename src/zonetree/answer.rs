//! The answer to a query and the policy for assembling it.

use crate::base::iana::{Rcode, Rtype};
use crate::base::name::Name;
use crate::base::ttl::Ttl;
use crate::rdata::{Soa, ZoneRecordData};
use core::fmt;
use std::vec::Vec;

//------------ rotate_and_limit ----------------------------------------------

/// Returns the items of a set starting at `offset` and wrapping around.
///
/// The offset is taken modulo the length of the set. The rotated set is
/// then truncated to `limit` items unless `limit` is zero. Rotation always
/// happens first so that, over many calls with increasing offsets, every
/// item appears in answers equally often.
pub fn rotate_and_limit<T: Clone>(
    data: &[T],
    offset: usize,
    limit: u32,
) -> Vec<T> {
    if data.is_empty() {
        return Vec::new();
    }
    let len = data.len();
    let take = match usize::try_from(limit) {
        Ok(0) | Err(_) => len,
        Ok(limit) => limit.min(len),
    };
    data.iter()
        .cycle()
        .skip(offset % len)
        .take(take)
        .cloned()
        .collect()
}

//------------ AnswerRrset ---------------------------------------------------

/// A set of records in one section of an answer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnswerRrset {
    owner: Name,
    rtype: Rtype,
    ttl: Ttl,
    data: Vec<ZoneRecordData>,
}

impl AnswerRrset {
    pub fn new(
        owner: Name,
        rtype: Rtype,
        ttl: Ttl,
        data: Vec<ZoneRecordData>,
    ) -> Self {
        AnswerRrset {
            owner,
            rtype,
            ttl,
            data,
        }
    }

    pub fn owner(&self) -> &Name {
        &self.owner
    }

    pub fn rtype(&self) -> Rtype {
        self.rtype
    }

    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    pub fn data(&self) -> &[ZoneRecordData] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

//--- Display

impl fmt::Display for AnswerRrset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, data) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{} {} {} {}", self.owner, self.ttl, self.rtype, data)?;
        }
        Ok(())
    }
}

//------------ Answer --------------------------------------------------------

/// The answer to a query.
///
/// Turning this into a DNS message is up to the wire layer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Answer {
    /// The response code of the answer.
    rcode: Rcode,

    /// The content of the answer.
    content: AnswerContent,

    /// The optional authority section to be included in the answer.
    authority: Option<AnswerAuthority>,

    /// Address records for names mentioned in the answer.
    additional: Vec<AnswerRrset>,
}

impl Answer {
    pub fn new(rcode: Rcode) -> Self {
        Answer {
            rcode,
            content: AnswerContent::NoData,
            authority: Default::default(),
            additional: Vec::new(),
        }
    }

    pub fn with_authority(rcode: Rcode, authority: AnswerAuthority) -> Self {
        Answer {
            rcode,
            content: AnswerContent::NoData,
            authority: Some(authority),
            additional: Vec::new(),
        }
    }

    pub fn refused() -> Self {
        Answer::new(Rcode::REFUSED)
    }

    pub fn servfail() -> Self {
        Answer::new(Rcode::SERVFAIL)
    }

    pub fn add_cname(&mut self, cname: AnswerRrset) {
        self.content = AnswerContent::Cname(cname);
    }

    /// Adds an RRset to the answer section.
    pub fn add_answer(&mut self, answer: AnswerRrset) {
        match self.content {
            AnswerContent::Data(ref mut data) => data.push(answer),
            _ => self.content = AnswerContent::Data(vec![answer]),
        }
    }

    pub fn add_authority(&mut self, authority: AnswerAuthority) {
        self.authority = Some(authority)
    }

    pub fn add_additional(&mut self, additional: AnswerRrset) {
        self.additional.push(additional)
    }

    pub fn rcode(&self) -> Rcode {
        self.rcode
    }

    pub fn content(&self) -> &AnswerContent {
        &self.content
    }

    pub fn authority(&self) -> Option<&AnswerAuthority> {
        self.authority.as_ref()
    }

    pub fn additional(&self) -> &[AnswerRrset] {
        &self.additional
    }

    /// Returns the RRsets of the answer section.
    pub fn answer_rrsets(&self) -> &[AnswerRrset] {
        match self.content {
            AnswerContent::Data(ref data) => data,
            AnswerContent::Cname(ref cname) => std::slice::from_ref(cname),
            AnswerContent::NoData => &[],
        }
    }

    /// Returns the answer RRset of the given type.
    pub fn rrset(&self, rtype: Rtype) -> Option<&AnswerRrset> {
        self.answer_rrsets()
            .iter()
            .find(|rrset| rrset.rtype() == rtype)
    }

    /// Returns whether this is an answer without records for an existing name.
    pub fn is_nodata(&self) -> bool {
        self.rcode == Rcode::NOERROR
            && matches!(self.content, AnswerContent::NoData)
    }
}

//------------ AnswerContent -------------------------------------------------

/// The content of the answer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AnswerContent {
    Data(Vec<AnswerRrset>),
    Cname(AnswerRrset),
    NoData,
}

//------------ AnswerAuthority -----------------------------------------------

/// The authority section of a negative answer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnswerAuthority {
    /// The owner name of the SOA record, i.e., the apex.
    owner: Name,

    /// The TTL of the SOA record.
    ///
    /// This is the smaller of the SOA’s own TTL and its minimum field.
    ttl: Ttl,

    soa: Soa,
}

impl AnswerAuthority {
    pub fn new(owner: Name, ttl: Ttl, soa: Soa) -> Self {
        AnswerAuthority { owner, ttl, soa }
    }

    pub fn owner(&self) -> &Name {
        &self.owner
    }

    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    pub fn soa(&self) -> &Soa {
        &self.soa
    }
}

//============ Tests =========================================================
