use astrolog::{Angle, Aspect, BaryCoord, EclCoord, EclSpeed, EquatorCoord, EquatorSpeed, HorCoord};
use serde_json::json;

fn sample_coords() -> Vec<EclCoord> {
    vec![
        EclCoord::new(0.0, 0.0),
        EclCoord::new(10.0, 2.0),
        EclCoord::new(130.0, -5.0),
        EclCoord::new(359.5, 0.3),
        EclCoord::new(200.25, 7.1),
    ]
}

#[test]
fn test_self_separation_is_zero() {
    for c in sample_coords() {
        assert_eq!((c ^ c).degrees(), 0.0);
    }
}

#[test]
fn test_separation_ignores_distance() {
    let near = EclCoord::with_distance(42.0, 1.0, 0.9);
    let far = EclCoord::with_distance(42.0, 1.0, 30.0);
    assert_eq!(near, far);
    assert_eq!((near ^ far).degrees(), 0.0);
}

#[test]
fn test_separation_is_symmetric() {
    let coords = sample_coords();
    for a in &coords {
        for b in &coords {
            let ab = (a ^ b).degrees();
            let ba = (b ^ a).degrees();
            assert!((ab - ba).abs() < 1e-9, "{a:?} {b:?}");
            assert!((0.0..=180.0).contains(&ab));
        }
    }
}

#[test]
fn test_separation_along_ecliptic() {
    let a = EclCoord::new(10.0, 0.0);
    let b = EclCoord::new(130.0, 0.0);
    assert!(((a ^ b).degrees() - 120.0).abs() < 1e-9);

    // Across 0° the short way round
    let c = EclCoord::new(350.0, 0.0);
    assert!(((a ^ c).degrees() - 20.0).abs() < 1e-9);
}

#[test]
fn test_separation_of_nearly_equal_coords() {
    // Unequal by a few ulps, so the cosine can round to just above 1
    let pairs = [
        (EclCoord::new(123.0, 2.5), EclCoord::new(123.0 + 1e-13, 2.5)),
        (EclCoord::new(45.0, 60.0), EclCoord::new(45.0, 60.0 + 1e-13)),
        (EclCoord::new(359.9, -12.0), EclCoord::new(359.9 - 1e-12, -12.0)),
    ];
    for (a, b) in pairs {
        assert_ne!(a, b);
        let sep = (a ^ b).degrees();
        assert!(sep.is_finite(), "separation of {:?} and {:?} is {}", a, b, sep);
        assert!(sep < 1e-6);
        assert!(((b ^ a).degrees() - sep).abs() < 1e-12);
        assert_eq!((a ^ b).classify_aspect(1.01), Some(Aspect::CONJUNCTION));
    }
}

#[test]
fn test_house_pos_sectors() {
    let (house, pos) = HorCoord::new(180.0, 0.0).house_pos();
    // atan2(0, -1) = 180 -> 90 -> 90 * 13 / 360 = 3.25
    assert_eq!(house, 4);
    assert!((pos - 0.25 * 180.0 / std::f64::consts::PI).abs() < 1e-9);
    for az in [0.0, 45.0, 135.0, 270.0] {
        for alt in [-30.0, 0.0, 30.0, 60.0] {
            let (house, _) = HorCoord::new(az, alt).house_pos();
            assert!((1..=13).contains(&house), "{az} {alt}");
        }
    }
}

#[test]
fn test_speed_variants_expose_base_fields() {
    let spd = EquatorSpeed::new(101.5, -16.7, 0.01, -0.002);
    assert_eq!(spd.ra, Angle::from_degrees(101.5));
    assert_eq!(spd.decl, Angle::from_degrees(-16.7));
    assert_eq!(spd.ra_speed.deg_per_day(), 0.01);

    let direct = EclSpeed::new(45.0, 0.0, 1.0, 0.0);
    assert!(!direct.is_retrograde());
    assert_eq!(direct.longitude, Angle::from_degrees(45.0));
}

#[test]
fn test_json_keys() {
    assert_eq!(
        serde_json::to_value(EclCoord::new(10.0, 2.0)).unwrap(),
        json!({"long": 10.0, "lat": 2.0})
    );
    assert_eq!(
        serde_json::to_value(EclCoord::with_distance(10.0, 2.0, 1.5)).unwrap(),
        json!({"long": 10.0, "lat": 2.0, "dist": 1.5})
    );
    assert_eq!(
        serde_json::to_value(EquatorCoord::new(88.8, 7.4)).unwrap(),
        json!({"ra": 88.8, "decl": 7.4})
    );
    assert_eq!(
        serde_json::to_value(HorCoord::new(120.0, 33.0)).unwrap(),
        json!({"azimuth": 120.0, "alt": 33.0})
    );
    assert_eq!(
        serde_json::to_value(EclSpeed::new(10.0, 2.0, 0.98, -0.01)).unwrap(),
        json!({"long": 10.0, "lat": 2.0, "long_spd": 0.98, "lat_spd": -0.01})
    );
    assert_eq!(
        serde_json::to_value(BaryCoord::new(1.0, 0.5, 5.2)).unwrap(),
        json!({"long": 1.0, "lat": 0.5, "dist": 5.2})
    );
}
