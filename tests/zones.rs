use almanac::{Error, Instant, LocalDateTime, TimeZone, TimeZoneRegion, ZoneDatabase};

// These need the host's compiled zone files; without them there is nothing to check.
fn database() -> Option<&'static ZoneDatabase> {
    let db = ZoneDatabase::global();
    if db.contains("Europe/Paris") {
        Some(db)
    } else {
        eprintln!("no time-zone database at {}, skipping", db.dir().display());
        None
    }
}

#[test]
fn paris_winter_and_summer() {
    let Some(db) = database() else { return };
    let paris = db.region("Europe/Paris").unwrap();

    // 2010-01-15T12:00:00Z and 2010-07-15T12:00:00Z.
    let winter = Instant::of(1_263_556_800, 0).unwrap();
    let summer = Instant::of(1_279_195_200, 0).unwrap();
    assert_eq!(paris.offset_at(winter), 3600);
    assert_eq!(paris.offset_at(summer), 7200);
    assert_eq!(
        LocalDateTime::of_instant(summer, &paris).unwrap().to_string(),
        "2010-07-15T14:00"
    );
}

#[test]
fn summer_time_continues_past_2037() {
    let Some(db) = database() else { return };
    let new_york = db.region("America/New_York").unwrap();
    // July 1st, 12:00 UTC, in 2025, 2038 and 2100.
    for second in [1_751_371_200, 2_161_598_400, 4_118_126_400] {
        let instant = Instant::of(second, 0).unwrap();
        assert_eq!(new_york.offset_at(instant), -14_400, "at {}", instant);
    }
    // 2040-01-15T12:00:00Z.
    assert_eq!(new_york.offset_at(Instant::of(2_210_241_600, 0).unwrap()), -18_000);

    let sydney = db.region("Australia/Sydney").unwrap();
    assert_eq!(sydney.offset_at(Instant::of(2_210_241_600, 0).unwrap()), 39_600);
    // 2040-07-15T12:00:00Z.
    assert_eq!(sydney.offset_at(Instant::of(2_225_966_400, 0).unwrap()), 36_000);
}

#[test]
fn utc_is_a_region() {
    let Some(db) = database() else { return };
    let utc = db.region("UTC").unwrap();
    assert_eq!(utc.offset_at(Instant::EPOCH), 0);
    assert_eq!(utc.offset_at(Instant::MAX), 0);
    assert_eq!(utc.id(), "UTC");
}

#[test]
fn unknown_regions() {
    let Some(db) = database() else { return };
    assert!(!db.contains("Europe/Atlantis"));
    assert!(!db.contains("Europe"));
    assert!(!db.contains("zone.tab"));
    assert_eq!(
        TimeZoneRegion::of("Europe/Atlantis"),
        Err(Error::UnknownTimeZoneRegion("Europe/Atlantis".to_string()))
    );
}

#[test]
fn identifiers() {
    let Some(db) = database() else { return };
    let all = db.all_identifiers();
    if all.len() <= 1 {
        return;
    }
    assert!(all.iter().any(|id| id == "Europe/Paris"));
    assert!(all.iter().any(|id| id == "UTC"));
    assert!(all.windows(2).all(|pair| pair[0] < pair[1]));

    let french = db.identifiers_for_country("FR");
    assert!(french.iter().any(|id| id == "Europe/Paris"));
    assert_eq!(french, db.identifiers_for_country("fr"));
    assert!(db.identifiers_for_country("XX").is_empty());
}

#[test]
fn regions_are_cached() {
    let Some(db) = database() else { return };
    let first = db.region("Europe/Paris").unwrap();
    let second = TimeZoneRegion::of("Europe/Paris").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_native(), ":Europe/Paris");
}
