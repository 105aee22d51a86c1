use std::f64::consts::PI;

use approx::assert_relative_eq;
use marble_geo::{
    Coordinates, MERCATOR_MAX_LATITUDE, MapProjection as _, ProjectionKind, ScreenSize,
    ViewportParams,
};

#[test]
fn constructor_and_setters_agree() {
    let _ = env_logger::builder().is_test(true).try_init();

    let size = ScreenSize::new(640, 480);
    let lon = 205f64.to_radians();

    for kind in [
        ProjectionKind::Mercator,
        ProjectionKind::Equirectangular,
        ProjectionKind::Spherical,
    ] {
        let lat = kind.projection().max_valid_lat() + 1.0;

        let constructed = ViewportParams::new(kind, lon, lat, 300.0, size);

        let mut assembled = ViewportParams::default();
        assembled.set_projection(kind);
        assembled.set_radius(300.0);
        assembled.set_size(size);
        assembled.center_on(lon, lat);

        assert_eq!(constructed.projection(), kind);
        assert_eq!(constructed.center_longitude(), assembled.center_longitude(), "{kind}");
        assert_eq!(constructed.center_latitude(), assembled.center_latitude(), "{kind}");
        assert_eq!(constructed.radius(), assembled.radius());
        assert_eq!(constructed.size(), assembled.size());
    }
}

#[test]
fn flat_maps_stop_at_their_edges() {
    let lon = 205f64.to_radians();

    let mercator = ViewportParams::new(
        ProjectionKind::Mercator,
        lon,
        MERCATOR_MAX_LATITUDE + 1.0,
        300.0,
        ScreenSize::new(640, 480),
    );
    assert_relative_eq!(mercator.center_longitude(), -155f64.to_radians(), epsilon = 1e-12);
    assert_eq!(mercator.center_latitude(), MERCATOR_MAX_LATITUDE);

    let equirect = ViewportParams::new(
        ProjectionKind::Equirectangular,
        lon,
        PI / 2.0 + 1.0,
        300.0,
        ScreenSize::new(640, 480),
    );
    assert_relative_eq!(equirect.center_longitude(), -155f64.to_radians(), epsilon = 1e-12);
    assert_eq!(equirect.center_latitude(), PI / 2.0);
}

#[test]
fn globe_turns_over_the_pole() {
    let globe = ViewportParams::new(
        ProjectionKind::Spherical,
        205f64.to_radians(),
        PI / 2.0 + 1.0,
        300.0,
        ScreenSize::new(640, 480),
    );

    // One radian past the north pole, on the opposite meridian.
    assert_relative_eq!(globe.center_latitude(), PI / 2.0 - 1.0, epsilon = 1e-9);
    assert_relative_eq!(globe.center_longitude(), 25f64.to_radians(), epsilon = 1e-9);

    let pixels = globe
        .screen_coordinates(&Coordinates::new(
            globe.center_longitude(),
            globe.center_latitude(),
            0.0,
        ))
        .pixels()
        .unwrap();
    assert_relative_eq!(pixels.x(), 320.0, epsilon = 1e-6);
    assert_relative_eq!(pixels.y(), 240.0, epsilon = 1e-6);
}

#[test]
fn switching_projections_keeps_the_center() {
    let mut viewport = ViewportParams::new(
        ProjectionKind::Spherical,
        0.4,
        0.6,
        500.0,
        ScreenSize::new(300, 200),
    );
    let place = Coordinates::new(0.4, 0.6, 0.0);

    for kind in ProjectionKind::ALL {
        viewport.set_projection(kind);
        assert_eq!(viewport.center_longitude(), 0.4);
        assert_eq!(viewport.center_latitude(), 0.6);

        let pixels = viewport.screen_coordinates(&place).pixels().unwrap();
        assert_relative_eq!(pixels.x(), 150.0, epsilon = 1e-6);
        assert_relative_eq!(pixels.y(), 100.0, epsilon = 1e-6);
    }
}

#[test]
fn view_box_follows_the_view() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut viewport = ViewportParams::new(
        ProjectionKind::Equirectangular,
        0.0,
        0.0,
        1000.0,
        ScreenSize::new(400, 400),
    );
    let warsaw = Coordinates::from_degrees(21.0, 52.2, 0.0);
    assert!(!viewport.view_lat_lon_alt_box().contains(&warsaw));

    viewport.center_on(21f64.to_radians(), 52f64.to_radians());
    assert!(viewport.view_lat_lon_alt_box().contains(&warsaw));

    // Across the date line the box wraps around.
    viewport.center_on(PI, 0.0);
    let bbox = viewport.view_lat_lon_alt_box();
    assert!(bbox.crosses_date_line());
    assert!(bbox.contains(&Coordinates::from_degrees(179.0, 0.0, 0.0)));
    assert!(bbox.contains(&Coordinates::from_degrees(-179.0, 0.0, 0.0)));
    assert!(!bbox.contains(&Coordinates::from_degrees(0.0, 0.0, 0.0)));
}
