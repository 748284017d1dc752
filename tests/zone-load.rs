//! Loading zones from zone files.

mod common;

use std::sync::Arc;

use rstest::rstest;

use common::{example_zone, load, loader, name, plugins, ZONE_HEAD};
use dynzone::base::{Rtype, Ttl};
use dynzone::config::Config;
use dynzone::rdata::{DynKind, ZoneRecordData};
use dynzone::zonetree::{
    ConflictKind, LoadError, ValidationError, Zone, ZoneLoader,
};

fn zone(body: &str) -> Result<Zone, LoadError> {
    load("example.com.", &format!("{ZONE_HEAD}{body}"))
}

fn ttl(zone: &Zone, owner: &str, rtype: Rtype) -> Ttl {
    zone.rrset(&name(owner), rtype).unwrap().ttl()
}

//------------ Whole zones ---------------------------------------------------

#[test]
fn example_zone_loads() {
    common::init_logging();
    let zone = example_zone(&loader());
    assert_eq!(zone.apex(), &name("example.com."));
    let www = zone.rrset(&name("www.example.com."), Rtype::A).unwrap();
    assert_eq!(www.len(), 4);
    assert_eq!(www.limit(), 2);
    assert_eq!(
        zone.rrset(&name("www.example.com."), Rtype::AAAA)
            .unwrap()
            .limit(),
        0
    );
    assert_eq!(
        zone.node(&name("dyn.example.com."))
            .unwrap()
            .dynamic()
            .unwrap()
            .kind(),
        DynKind::Address
    );
    assert!(zone.rrset(&name("dyn.example.com."), Rtype::MX).is_some());
    assert!(zone.node(&name("deep.example.com.")).unwrap().is_empty());
    assert!(zone.node(&name("b.deep.example.com.")).unwrap().is_empty());
}

#[test]
fn loading_is_deterministic() {
    let loader = loader();
    let one = example_zone(&loader);
    let two = example_zone(&loader);
    assert_eq!(one, two);
}

#[test]
fn origin_is_idempotent() {
    let plain = zone("www A 192.0.2.1\nsub.www A 192.0.2.2\n").unwrap();
    let repeated = zone(
        "$ORIGIN example.com.\n\
         $ORIGIN example.com.\n\
         www A 192.0.2.1\n\
         $ORIGIN www.example.com.\n\
         $ORIGIN www.example.com.\n\
         sub A 192.0.2.2\n",
    )
    .unwrap();
    assert_eq!(plain, repeated);
}

#[test]
fn origin_outside_zone() {
    let err = zone("$ORIGIN example.org.\n").unwrap_err();
    match err {
        LoadError::Syntax(err) => {
            assert_eq!(err.message(), "origin outside zone");
            assert_eq!(err.line(), 4);
        }
        err => panic!("unexpected error {err}"),
    }
}

//------------ TTLs ----------------------------------------------------------

#[test]
fn default_ttl_scoping() {
    let zone = zone(
        "a A 192.0.2.1\n\
         $TTL 300\n\
         b A 192.0.2.2\n\
         c 60 A 192.0.2.3\n\
         d A 192.0.2.4\n\
         $TTL 2H\n\
         e A 192.0.2.5\n",
    )
    .unwrap();
    assert_eq!(ttl(&zone, "a.example.com.", Rtype::A), Ttl::DAY);
    assert_eq!(ttl(&zone, "b.example.com.", Rtype::A), Ttl::from_secs(300));
    assert_eq!(ttl(&zone, "c.example.com.", Rtype::A), Ttl::from_secs(60));
    assert_eq!(ttl(&zone, "d.example.com.", Rtype::A), Ttl::from_secs(300));
    assert_eq!(ttl(&zone, "e.example.com.", Rtype::A), Ttl::from_secs(7200));
}

#[test]
fn configured_default_ttl() {
    let config = Config {
        zones_default_ttl: Ttl::from_secs(42),
        ..Default::default()
    };
    let loader = ZoneLoader::new(config, plugins().0);
    let zone = loader
        .load_str(
            name("example.com."),
            "test.zone",
            &format!("{ZONE_HEAD}a A 192.0.2.1\n"),
        )
        .unwrap();
    assert_eq!(ttl(&zone, "a.example.com.", Rtype::A), Ttl::from_secs(42));
}

#[rstest]
#[case("300", 300, 150)]
#[case("300/60", 300, 60)]
#[case("1H/5M", 3600, 300)]
#[case("60/60", 60, 60)]
#[case("", 600, 300)]
fn dynamic_ttl_ranges(
    #[case] range: &str,
    #[case] max: u32,
    #[case] min: u32,
) {
    let zone =
        zone(&format!("$TTL 600\nwww {range} DYNA test!pool\n")).unwrap();
    let record = zone
        .node(&name("www.example.com."))
        .unwrap()
        .dynamic()
        .unwrap()
        .target()
        .ttl();
    assert_eq!(record.max(), Ttl::from_secs(max));
    assert_eq!(record.min(), Ttl::from_secs(min));
}

#[rstest]
#[case("www 60/300 DYNA test!pool\n")]
#[case("www 300/ DYNA test!pool\n")]
#[case("www 300/60 A 192.0.2.1\n")]
fn bad_ttl_ranges(#[case] body: &str) {
    assert!(matches!(zone(body), Err(LoadError::Syntax(_))));
}

#[test]
fn soa_time_units() {
    let zone = zone("").unwrap();
    let soa = match zone
        .rrset(&name("example.com."), Rtype::SOA)
        .unwrap()
        .first()
    {
        Some(ZoneRecordData::Soa(soa)) => soa.clone(),
        other => panic!("unexpected SOA data {other:?}"),
    };
    assert_eq!(soa.refresh(), Ttl::from_secs(3600));
    assert_eq!(soa.retry(), Ttl::from_secs(900));
    assert_eq!(soa.expire(), Ttl::from_secs(604800));
    assert_eq!(soa.minimum(), Ttl::from_secs(300));
    assert_eq!(zone.negative_authority().ttl(), Ttl::from_secs(300));
}

//------------ Conflicts -----------------------------------------------------

#[rstest]
#[case("www A 192.0.2.1\nwww DYNA test!pool\n", ConflictKind::AddressWithDyna)]
#[case("www DYNA test!pool\nwww AAAA 2001:db8::1\n", ConflictKind::AddressWithDyna)]
#[case("@ DYNC test!pool\n", ConflictKind::DyncAtApex)]
#[case("www DYNC test!pool\nwww TXT hello\n", ConflictKind::DyncNotExclusive)]
#[case("www TXT hello\nwww DYNC test!pool\n", ConflictKind::DyncNotExclusive)]
#[case("www DYNA test!pool\nwww DYNC test!pool\n", ConflictKind::DyncNotExclusive)]
#[case("www CNAME a.example.\nwww TXT hello\n", ConflictKind::CnameNotExclusive)]
#[case("www TXT hello\nwww CNAME a.example.\n", ConflictKind::CnameNotExclusive)]
#[case("www DYNA test!pool\nwww CNAME a.example.\n", ConflictKind::CnameNotExclusive)]
#[case("www CNAME a.example.\nwww CNAME b.example.\n", ConflictKind::MultipleCnames)]
#[case("www 60 A 192.0.2.1\nwww 120 A 192.0.2.2\n", ConflictKind::TtlMismatch)]
#[case("www SOA a b 1 2 3 4 5\n", ConflictKind::SoaOutsideApex)]
#[case("@ SOA a b 1 2 3 4 5\n", ConflictKind::MultipleSoa)]
#[case("www DYNA test!pool\nwww DYNA test!stable\n", ConflictKind::MultipleDynamic)]
fn conflicts(#[case] body: &str, #[case] kind: ConflictKind) {
    match zone(body) {
        Err(LoadError::Conflict { source, err }) => {
            assert_eq!(&*source, "test.zone");
            assert_eq!(err.kind(), kind);
        }
        Err(err) => panic!("unexpected error {err}"),
        Ok(_) => panic!("conflict not detected"),
    }
}

#[test]
fn conflict_position() {
    let err = zone("www A 192.0.2.1\n\nwww DYNA test!pool\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "test.zone:6: address records and DYNA at the same name \
         at 'www.example.com.'"
    );
}

#[test]
fn dyna_coexists_with_other_data() {
    let zone = zone(
        "www DYNA test!pool\n\
         www MX 10 mail\n\
         www TXT hello\n",
    )
    .unwrap();
    let node = zone.node(&name("www.example.com.")).unwrap();
    assert!(node.dynamic().is_some());
    assert_eq!(node.rrset_count(), 2);
}

#[test]
fn duplicates_are_dropped() {
    let zone = zone("www A 192.0.2.1\nwww A 192.0.2.1\n").unwrap();
    let www = zone.rrset(&name("www.example.com."), Rtype::A).unwrap();
    assert_eq!(www.len(), 1);
}

//------------ Record data ---------------------------------------------------

fn txt_at(zone: &Zone, owner: &str) -> dynzone::rdata::Txt {
    match zone.rrset(&name(owner), Rtype::TXT).unwrap().first() {
        Some(ZoneRecordData::Txt(txt)) => txt.clone(),
        other => panic!("unexpected TXT data {other:?}"),
    }
}

#[test]
fn txt_autosplit() {
    let long = "x".repeat(300);
    let zone = zone(&format!("txt TXT \"{long}\" short\n")).unwrap();
    let txt = txt_at(&zone, "txt.example.com.");
    let lens: Vec<_> = txt.iter().map(<[u8]>::len).collect();
    assert_eq!(lens, [255, 45, 5]);
    assert_eq!(txt.text().len(), 305);
}

#[test]
fn txt_autosplit_keeps_content() {
    let long: String = (0..600u32)
        .map(|i| char::from(b'a' + (i % 26) as u8))
        .collect();
    let zone = zone(&format!("txt TXT \"{long}\"\n")).unwrap();
    let txt = txt_at(&zone, "txt.example.com.");
    let lens: Vec<_> = txt.iter().map(<[u8]>::len).collect();
    assert_eq!(lens, [255, 255, 90]);
    assert_eq!(txt.text(), long.as_bytes());
}

#[test]
fn txt_without_autosplit() {
    let config = Config {
        txt_autosplit: false,
        ..Default::default()
    };
    let loader = ZoneLoader::new(config, plugins().0);
    let long = "x".repeat(300);
    let err = loader
        .load_str(
            name("example.com."),
            "test.zone",
            &format!("{ZONE_HEAD}txt TXT \"{long}\"\n"),
        )
        .unwrap_err();
    assert!(matches!(err, LoadError::Syntax(_)));
}

#[test]
fn generic_record_data() {
    let generic =
        zone("opaque TYPE65534 \\# 4 0A000001\nempty TYPE65535 \\# 0\n")
            .unwrap();
    match generic
        .rrset(&name("opaque.example.com."), Rtype::from_int(65534))
        .unwrap()
        .first()
    {
        Some(ZoneRecordData::Unknown(data)) => {
            assert_eq!(data.data(), &[10, 0, 0, 1]);
        }
        other => panic!("unexpected data {other:?}"),
    }
    assert!(generic
        .rrset(&name("empty.example.com."), Rtype::from_int(65535))
        .is_some());

    let private = zone("x TYPE31337 \\# 4 DEADBEEF\n").unwrap();
    let rrset = private
        .rrset(&name("x.example.com."), Rtype::from_int(31337))
        .unwrap();
    assert_eq!(rrset.len(), 1);
    match rrset.first() {
        Some(ZoneRecordData::Unknown(data)) => {
            assert_eq!(data.rtype(), Rtype::from_int(31337));
            assert_eq!(data.data(), &[0xde, 0xad, 0xbe, 0xef]);
        }
        other => panic!("unexpected data {other:?}"),
    }
}

#[rstest]
#[case("a A \\# 4 c0000201\n")]
#[case("a TYPE65534 \\# 4 0a0000\n")]
#[case("a TYPE65534 \\# 2 0g00\n")]
#[case("a HINFO cpu os\n")]
#[case("a CH A 192.0.2.1\n")]
fn rejected_records(#[case] body: &str) {
    assert!(matches!(zone(body), Err(LoadError::Syntax(_))));
}

#[test]
fn syntax_error_position() {
    let err = zone("www A 192.0.2.300\n").unwrap_err();
    assert_eq!(err.source_name(), Some("test.zone"));
    match err {
        LoadError::Syntax(err) => {
            assert_eq!(err.line(), 4);
            assert_eq!(err.col(), 7);
            assert_eq!(err.token(), "192.0.2.300");
        }
        err => panic!("unexpected error {err}"),
    }
}

//------------ Validation ----------------------------------------------------

#[test]
fn missing_apex_records() {
    match load("example.com.", "www A 192.0.2.1\n") {
        Err(LoadError::Validation { errors, .. }) => {
            assert!(errors.contains(&ValidationError::MissingSoa));
            assert!(errors.contains(&ValidationError::MissingNs));
        }
        Err(err) => panic!("unexpected error {err}"),
        Ok(_) => panic!("invalid zone accepted"),
    }
}

#[test]
fn plugin_validation() {
    match zone(
        "a DYNA geoip!pool\n\
         b DYNC test!rejected\n\
         c DYNA test!pool\n",
    ) {
        Err(LoadError::Validation { errors, .. }) => {
            assert_eq!(errors.len(), 2);
            assert!(errors
                .contains(&ValidationError::UnknownPlugin("geoip".into())));
            assert!(errors.iter().any(|(owner, err)| {
                owner == &name("b.example.com.")
                    && matches!(err, ValidationError::InvalidResource { .. })
            }));
        }
        Err(err) => panic!("unexpected error {err}"),
        Ok(_) => panic!("invalid zone accepted"),
    }
}

#[test]
fn unregistered_plugin() {
    let (plugins, _) = plugins();
    let loader = ZoneLoader::new(Config::default(), Arc::clone(&plugins));
    plugins.unregister("test");
    assert!(loader
        .load_str(
            name("example.com."),
            "test.zone",
            &format!("{ZONE_HEAD}a DYNA test!pool\n"),
        )
        .is_err());
}

#[test]
fn missing_file() {
    let err = loader()
        .load_file(name("example.com."), "test-data/zones/missing.zone")
        .unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert_eq!(err.source_name(), Some("test-data/zones/missing.zone"));
}
