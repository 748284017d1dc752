use super::answer::rotate_and_limit;
use crate::base::iana::Rtype;
use crate::base::ttl::Ttl;
use crate::rdata::{DynKind, DynTarget, ZoneRecordData};
use crate::zonefile::directive::AddrLimits;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::vec::Vec;

//------------ RotationCursor ------------------------------------------------

/// A counter that moves on by one every time it is used.
///
/// The cursor decides which element of a set of addresses comes first in
/// an answer. It is shared by all queries and is the only part of a zone
/// that changes after the zone was built. Its position is not part of the
/// data of a zone: cloning copies the current position and any two cursors
/// compare equal.
#[derive(Debug)]
pub struct RotationCursor(AtomicUsize);

impl RotationCursor {
    /// Creates a cursor starting at a random position.
    pub fn new() -> Self {
        Self::starting_at(rand::random())
    }

    pub fn starting_at(pos: usize) -> Self {
        RotationCursor(AtomicUsize::new(pos))
    }

    /// Returns the current position and moves on.
    pub fn advance(&self) -> usize {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for RotationCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RotationCursor {
    fn clone(&self) -> Self {
        Self::starting_at(self.0.load(Ordering::Relaxed))
    }
}

impl PartialEq for RotationCursor {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for RotationCursor {}

//------------ Rrset ---------------------------------------------------------

/// The records of one type at one name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rrset {
    rtype: Rtype,
    ttl: Ttl,
    data: Vec<ZoneRecordData>,

    /// The maximum number of records in an answer, zero for no limit.
    ///
    /// Only ever non-zero for A and AAAA.
    limit: u32,

    cursor: RotationCursor,
}

impl Rrset {
    pub fn new(rtype: Rtype, ttl: Ttl) -> Self {
        Self::with_limit(rtype, ttl, 0)
    }

    /// Creates an RRset with an address limit.
    ///
    /// The limit is ignored for types other than A and AAAA.
    pub fn with_limit(rtype: Rtype, ttl: Ttl, limit: u32) -> Self {
        Rrset {
            rtype,
            ttl,
            data: Vec::new(),
            limit: if rtype.is_address() { limit } else { 0 },
            cursor: RotationCursor::new(),
        }
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

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn first(&self) -> Option<&ZoneRecordData> {
        self.data.first()
    }

    pub fn contains(&self, data: &ZoneRecordData) -> bool {
        self.data.contains(data)
    }

    /// Adds record data to the set.
    ///
    /// Returns `false` and leaves the set unchanged if the data is already
    /// present.
    pub fn push_data(&mut self, data: ZoneRecordData) -> bool {
        debug_assert_eq!(data.rtype(), Some(self.rtype));
        if self.contains(&data) {
            return false;
        }
        self.data.push(data);
        true
    }

    /// Returns the data to include in an answer.
    ///
    /// Address records are rotated and then limited. Everything else is
    /// returned in file order.
    pub fn answer_data(&self) -> Vec<ZoneRecordData> {
        if self.rtype.is_address() {
            rotate_and_limit(&self.data, self.cursor.advance(), self.limit)
        } else {
            self.data.clone()
        }
    }
}

//------------ DynRecord -----------------------------------------------------

/// A `DYNA` or `DYNC` record stored at a name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DynRecord {
    kind: DynKind,
    target: DynTarget,

    /// The address limits in effect when the record was read.
    limits: AddrLimits,

    v4_cursor: RotationCursor,
    v6_cursor: RotationCursor,
}

impl DynRecord {
    pub fn new(kind: DynKind, target: DynTarget, limits: AddrLimits) -> Self {
        DynRecord {
            kind,
            target,
            limits,
            v4_cursor: RotationCursor::new(),
            v6_cursor: RotationCursor::new(),
        }
    }

    pub fn kind(&self) -> DynKind {
        self.kind
    }

    pub fn target(&self) -> &DynTarget {
        &self.target
    }

    pub fn limits(&self) -> AddrLimits {
        self.limits
    }

    /// Rotates and limits addresses returned by the plugin.
    ///
    /// `rtype` selects which of the two limits and cursors is used.
    pub fn select<T: Clone>(&self, rtype: Rtype, addrs: &[T]) -> Vec<T> {
        let cursor = match rtype {
            Rtype::AAAA => &self.v6_cursor,
            _ => &self.v4_cursor,
        };
        rotate_and_limit(addrs, cursor.advance(), self.limits.for_rtype(rtype))
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::rdata::A;

    fn a(last: u8) -> ZoneRecordData {
        A::from_octets(192, 0, 2, last).into()
    }

    #[test]
    fn cursor_equality_and_clone() {
        let one = RotationCursor::starting_at(3);
        let two = RotationCursor::starting_at(9);
        assert_eq!(one, two);
        assert_eq!(one.advance(), 3);
        let three = one.clone();
        assert_eq!(three.advance(), 4);
        assert_eq!(one.advance(), 4);
    }

    #[test]
    fn duplicates_are_dropped() {
        let mut rrset = Rrset::new(Rtype::A, Ttl::from_secs(300));
        assert!(rrset.push_data(a(1)));
        assert!(rrset.push_data(a(2)));
        assert!(!rrset.push_data(a(1)));
        assert_eq!(rrset.len(), 2);
    }

    #[test]
    fn limit_only_for_addresses() {
        assert_eq!(Rrset::with_limit(Rtype::A, Ttl::DAY, 2).limit(), 2);
        assert_eq!(Rrset::with_limit(Rtype::MX, Ttl::DAY, 2).limit(), 0);
    }

    #[test]
    fn answer_data_rotates() {
        let mut rrset = Rrset::with_limit(Rtype::A, Ttl::DAY, 2);
        for i in 1..=3 {
            rrset.push_data(a(i));
        }
        let first = rrset.answer_data();
        let second = rrset.answer_data();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_ne!(first, second);
        assert_eq!(first[1], second[0]);
    }
}
