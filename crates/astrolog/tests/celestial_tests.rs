mod common;

use astrolog::celestial::{second_focus, MARS, MOON, NOVILE, SEPTENER, SE_MARS, SE_MOON, SE_SUN, SUN};
use astrolog::ephemeris::{
    Frame, NodeMode, OrbitalMethod, OrbitalPoints, Origin, RawPosition, SnapshotTarget, TransitKind,
};
use astrolog::{AstrologError, Celestial, OrbitalPoint, Transits, Zodiac};
use chrono::NaiveTime;
use common::{berlin, birth, jd_at, snapshot, JD_DAY_START};

#[test]
fn test_planet_ecliptic_and_equatorial() {
    let provider = snapshot();
    let ecl = SUN.ecl_coord(&provider, birth(), &berlin(), false).unwrap();
    assert_eq!(ecl.longitude.degrees(), 280.37);
    assert_eq!(ecl.distance, None);

    let equ = SUN.equator_coord(&provider, birth(), &berlin(), false).unwrap();
    assert_eq!(equ.ra.degrees(), 281.29);
    assert_eq!(equ.decl.degrees(), -23.03);

    let spd = MOON.ecl_speed(&provider, birth(), &berlin(), false).unwrap();
    assert_eq!(spd.longitude_speed.deg_per_day(), 13.1);
    assert_eq!(spd.longitude.degrees(), 160.37);
}

#[test]
fn test_heliocentric_position() {
    let provider = snapshot();
    let helio = SUN.helio_coord(&provider, birth(), &berlin()).unwrap();
    assert_eq!(helio.longitude.degrees(), 100.37);
    assert_eq!(helio.distance.au(), 0.983);
}

#[test]
fn test_mean_position_unsupported_for_planets_and_stars() {
    let provider = snapshot();
    assert!(matches!(
        SUN.ecl_coord(&provider, birth(), &berlin(), true),
        Err(AstrologError::UnsupportedOption { .. })
    ));
    let regulus = Celestial::fixed("Regulus", "Regulus");
    assert!(matches!(
        regulus.equator_coord(&provider, birth(), &berlin(), true),
        Err(AstrologError::UnsupportedOption { .. })
    ));
}

#[test]
fn test_unknown_identifiers() {
    let provider = snapshot();
    assert_eq!(
        MARS.ecl_coord(&provider, birth(), &berlin(), false),
        Err(AstrologError::UnknownBody(4))
    );
    let regulus = Celestial::fixed("Regulus", "Regulus");
    assert_eq!(
        regulus.ecl_coord(&provider, birth(), &berlin(), false),
        Err(AstrologError::UnknownStar("Regulus".to_string()))
    );
    assert!(matches!(
        Celestial::planet_named("Vulcan"),
        Err(AstrologError::UnknownBodyName(_))
    ));
}

#[test]
fn test_second_focus_selects_fourth_slot() {
    let provider = snapshot();
    let focus = second_focus::MOON.ecl_coord(&provider, birth(), &berlin(), false).unwrap();
    assert_eq!(focus.longitude.degrees(), 263.0);
    assert_eq!(focus.latitude.degrees(), 1.2);
}

#[test]
fn test_focal_point_has_no_transits() {
    let provider = snapshot()
        .with_event(SnapshotTarget::Body(1), TransitKind::Rise, jd_at(9, 0));
    let node = Celestial::apsis_node("North Node", 1, OrbitalPoint::AscendingNode);
    let transits = node.transits(&provider, birth().date_naive(), &berlin()).unwrap();
    assert_eq!(transits, Transits::default());
    assert!(transits.iter().all(|(_, time)| time.is_none()));
}

#[test]
fn test_transits_on_requested_day() {
    let provider = snapshot()
        .with_event(SnapshotTarget::Body(0), TransitKind::Rise, jd_at(7, 12))
        .with_event(SnapshotTarget::Body(0), TransitKind::UpperTransit, jd_at(11, 48))
        .with_event(SnapshotTarget::Body(0), TransitKind::Set, jd_at(15, 3));
    let transits = SUN.transits(&provider, birth().date_naive(), &berlin()).unwrap();
    assert_eq!(transits.rise, NaiveTime::from_hms_opt(7, 12, 0));
    assert_eq!(transits.mc, NaiveTime::from_hms_opt(11, 48, 0));
    assert_eq!(transits.set, NaiveTime::from_hms_opt(15, 3, 0));
    assert_eq!(transits.ic, None);
    assert_eq!(
        SUN.sets(&provider, birth().date_naive(), &berlin()).unwrap(),
        transits.get(TransitKind::Set)
    );
}

#[test]
fn test_event_on_following_day_is_dropped() {
    // First rise after 0h falls at 00:30 the next day
    let provider = snapshot().with_event(
        SnapshotTarget::Body(1),
        TransitKind::Rise,
        astrolog::ephemeris::JulianDay(JD_DAY_START + 1.0 + 0.5 / 24.0),
    );
    assert_eq!(MOON.rises(&provider, birth().date_naive(), &berlin()).unwrap(), None);
}

#[test]
fn test_registry_groups() {
    assert_eq!(SEPTENER.len(), 7);
    assert!(std::ptr::eq(SEPTENER[1], &MARS));
    assert_eq!(NOVILE.len(), 9);
    assert_eq!(NOVILE[8].name(), "Neptune");
    assert!(std::ptr::eq(Celestial::by_name("SUN").unwrap(), &SUN));
    assert_eq!(second_focus::MOON.name(), "BE Moon");
}

#[test]
fn test_transits_serialize_by_key() {
    let transits = Transits {
        rise: NaiveTime::from_hms_opt(6, 1, 2),
        ..Transits::default()
    };
    let value = serde_json::to_value(transits).unwrap();
    assert_eq!(value["rise"], "06:01:02");
    assert!(value["ic"].is_null());
}

fn lunar_points(offset: f64) -> OrbitalPoints {
    OrbitalPoints {
        ascending_node: RawPosition::new(10.0 + offset, 0.0),
        descending_node: RawPosition::new(190.0 + offset, 0.0),
        periapsis: RawPosition::new(40.0 + offset, -0.5),
        apoapsis: RawPosition::new(220.0 + offset, 0.5),
    }
}

#[test]
fn test_orbital_points_map_to_their_slots() {
    let provider = snapshot().with_orbital(SE_MOON, Frame::Ecliptic, OrbitalMethod::default(), lunar_points(0.0));
    let cases = [
        (OrbitalPoint::AscendingNode, 10.0, 0.0),
        (OrbitalPoint::DescendingNode, 190.0, 0.0),
        (OrbitalPoint::Periapsis, 40.0, -0.5),
        (OrbitalPoint::Apoapsis, 220.0, 0.5),
    ];
    for (point, lon, lat) in cases {
        let body = Celestial::apsis_node("Lunar point", SE_MOON, point);
        let coord = body.ecl_coord(&provider, birth(), &berlin(), false).unwrap();
        assert_eq!(coord.longitude.degrees(), lon, "{:?}", point);
        assert_eq!(coord.latitude.degrees(), lat, "{:?}", point);
    }

    // The second focus comes from its own query, not the plain apoapsis
    let focus = second_focus::MOON.ecl_coord(&provider, birth(), &berlin(), false).unwrap();
    assert_eq!(focus.longitude.degrees(), 263.0);
}

#[test]
fn test_mean_request_on_orbital_point() {
    let mean = OrbitalMethod {
        mode: NodeMode::Mean,
        second_focus: false,
    };
    let provider = snapshot()
        .with_orbital(SE_MOON, Frame::Ecliptic, OrbitalMethod::default(), lunar_points(0.0))
        .with_orbital(SE_MOON, Frame::Ecliptic, mean, lunar_points(2.5));
    let node = Celestial::apsis_node("North Node", SE_MOON, OrbitalPoint::AscendingNode);

    let true_node = node.ecl_coord(&provider, birth(), &berlin(), false).unwrap();
    let mean_node = node.ecl_coord(&provider, birth(), &berlin(), true).unwrap();
    assert_eq!(true_node.longitude.degrees(), 10.0);
    assert_eq!(mean_node.longitude.degrees(), 12.5);

    // No mean equatorial record
    assert_eq!(
        node.equator_coord(&provider, birth(), &berlin(), true),
        Err(AstrologError::UnknownBody(SE_MOON))
    );
}

#[test]
fn test_fixed_star_position() {
    let regulus = Celestial::fixed("Regulus", "Regulus");
    let provider = snapshot()
        .with_position(
            SnapshotTarget::Star("Regulus".to_string()),
            Frame::Ecliptic,
            Origin::Topocentric,
            RawPosition::new(149.83, 0.46),
        )
        .with_position(
            SnapshotTarget::Star("Regulus".to_string()),
            Frame::Equatorial,
            Origin::Topocentric,
            RawPosition::new(152.09, 11.97),
        );

    let ecl = regulus.ecl_coord(&provider, birth(), &berlin(), false).unwrap();
    assert_eq!(ecl.longitude.degrees(), 149.83);
    assert_eq!(ecl.latitude.degrees(), 0.46);
    assert_eq!(ecl.sign_pos().0, Zodiac::Leo);

    let equ = regulus.equator_coord(&provider, birth(), &berlin(), false).unwrap();
    assert_eq!(equ.ra.degrees(), 152.09);
    assert_eq!(equ.decl.degrees(), 11.97);
}

#[test]
fn test_equatorial_speed() {
    let provider = snapshot().with_position(
        SnapshotTarget::Body(SE_MOON),
        Frame::Equatorial,
        Origin::Topocentric,
        RawPosition::new(162.5, 7.9).with_speed(13.4, -0.3),
    );
    let spd = MOON.equator_speed(&provider, birth(), &berlin(), false).unwrap();
    assert_eq!(spd.ra.degrees(), 162.5);
    assert_eq!(spd.decl.degrees(), 7.9);
    assert_eq!(spd.ra_speed.deg_per_day(), 13.4);
    assert_eq!(spd.decl_speed.deg_per_day(), -0.3);

    // The plain coordinate drops the motion
    let equ = MOON.equator_coord(&provider, birth(), &berlin(), false).unwrap();
    assert_eq!(equ.ra.degrees(), 162.5);
}

#[test]
fn test_barycentric_position_and_speed() {
    let provider = snapshot().with_position(
        SnapshotTarget::Body(SE_SUN),
        Frame::Ecliptic,
        Origin::Barycentric,
        RawPosition::new(95.0, 0.01)
            .with_speed(0.004, 0.0)
            .with_distance(0.0071, 0.00002),
    );
    let bary = SUN.bary_coord(&provider, birth(), &berlin()).unwrap();
    assert_eq!(bary.longitude.degrees(), 95.0);
    assert_eq!(bary.latitude.degrees(), 0.01);
    assert_eq!(bary.distance.au(), 0.0071);

    let spd = SUN.bary_speed(&provider, birth(), &berlin()).unwrap();
    assert_eq!(spd.longitude.degrees(), 95.0);
    assert_eq!(spd.longitude_speed.deg_per_day(), 0.004);
    assert_eq!(spd.distance_speed.au_per_day(), 0.00002);

    // Mars has no record at all
    assert!(matches!(
        MARS.bary_coord(&provider, birth(), &berlin()),
        Err(AstrologError::UnknownBody(SE_MARS))
    ));
}

#[test]
fn test_heliocentric_speed() {
    let provider = snapshot().with_position(
        SnapshotTarget::Body(SE_MARS),
        Frame::Ecliptic,
        Origin::Heliocentric,
        RawPosition::new(359.2, -1.4)
            .with_speed(0.52, 0.01)
            .with_distance(1.39, -0.0003),
    );
    let spd = MARS.helio_speed(&provider, birth(), &berlin()).unwrap();
    assert_eq!(spd.longitude.degrees(), 359.2);
    assert_eq!(spd.distance.au(), 1.39);
    assert_eq!(spd.longitude_speed.deg_per_day(), 0.52);
    assert_eq!(spd.latitude_speed.deg_per_day(), 0.01);
    assert_eq!(spd.distance_speed.au_per_day(), -0.0003);

    let helio = MARS.helio_coord(&provider, birth(), &berlin()).unwrap();
    assert_eq!(helio.distance.au(), 1.39);
}
