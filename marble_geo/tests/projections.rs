use approx::assert_relative_eq;
use marble_geo::{
    Coordinates, LineString, MERCATOR_MAX_LATITUDE, MapProjection as _, Pixels, ProjectionKind,
    ScreenPosition, ScreenSize, ViewportParams,
};

fn viewport(projection: ProjectionKind) -> ViewportParams {
    ViewportParams::new(
        projection,
        10f64.to_radians(),
        20f64.to_radians(),
        150.0,
        ScreenSize::new(400, 300),
    )
}

/// Pixels spread over the viewport, none of them exactly on the horizon of a globe.
fn pixel_grid() -> impl Iterator<Item = Pixels> {
    let step = |i: usize| 15.0 + 40.0 * i as f64;
    (0..10).flat_map(move |i| (0..8).map(move |j| Pixels::new(step(i), step(j))))
}

#[test]
fn screen_to_geo_and_back() {
    let _ = env_logger::builder().is_test(true).try_init();

    for kind in ProjectionKind::ALL {
        let viewport = viewport(kind);
        let mut checked = 0;
        for pixels in pixel_grid() {
            let Some(coordinates) = viewport.geo_coordinates(pixels) else {
                continue;
            };
            let ScreenPosition::Visible(back) = viewport.screen_coordinates(&coordinates) else {
                panic!("{kind}: {pixels:?} is not visible after the round trip");
            };
            assert_relative_eq!(back.x(), pixels.x(), epsilon = 1e-3);
            assert_relative_eq!(back.y(), pixels.y(), epsilon = 1e-3);
            checked += 1;
        }
        assert!(checked > 40, "{kind}: only {checked} pixels show the map");
    }
}

#[test]
fn geo_to_screen_and_back() {
    let _ = env_logger::builder().is_test(true).try_init();

    let points = [(10.0, 20.0), (5.0, 25.0), (20.0, 15.0), (0.0, 20.0), (14.0, 27.0)];
    for kind in ProjectionKind::ALL {
        let viewport = viewport(kind);
        for (lon, lat) in points {
            let coordinates = Coordinates::from_degrees(lon, lat, 0.0);
            let pixels = viewport
                .screen_coordinates(&coordinates)
                .pixels()
                .unwrap_or_else(|| panic!("{kind}: ({lon}, {lat}) is hidden"));
            let back = viewport.geo_coordinates(pixels).unwrap();
            assert_relative_eq!(back.longitude().to_degrees(), lon, epsilon = 1e-6);
            assert_relative_eq!(back.latitude().to_degrees(), lat, epsilon = 1e-6);
        }
    }
}

#[test]
fn view_center_is_in_the_middle_of_the_screen() {
    for kind in ProjectionKind::ALL {
        let viewport = viewport(kind);
        let center = Coordinates::new(viewport.center_longitude(), viewport.center_latitude(), 0.0);
        let pixels = viewport.screen_coordinates(&center).pixels().unwrap();
        assert_relative_eq!(pixels.x(), 200.0, epsilon = 1e-6);
        assert_relative_eq!(pixels.y(), 150.0, epsilon = 1e-6);
    }
}

#[test]
fn view_box_contains_what_is_shown() {
    let _ = env_logger::builder().is_test(true).try_init();

    for kind in ProjectionKind::ALL {
        let viewport = viewport(kind);
        let bbox = viewport.view_lat_lon_alt_box();
        for pixels in pixel_grid() {
            if let Some(coordinates) = viewport.geo_coordinates(pixels) {
                assert!(bbox.contains(&coordinates), "{kind}: {coordinates:?} outside {bbox:?}");
            }
        }
    }
}

#[test]
fn mercator_never_goes_past_its_edges() {
    let _ = env_logger::builder().is_test(true).try_init();

    let viewport = ViewportParams::new(
        ProjectionKind::Mercator,
        0.0,
        0.0,
        50.0,
        ScreenSize::new(400, 400),
    );
    let projection = viewport.current_projection();
    assert_eq!(projection.max_valid_lat(), MERCATOR_MAX_LATITUDE);
    assert_eq!(projection.min_valid_lat(), -MERCATOR_MAX_LATITUDE);

    let mut shown = 0;
    for y in 0..400 {
        if let Some(coordinates) = viewport.geo_coordinates(Pixels::new(200.0, y as f64 + 0.5)) {
            assert!(coordinates.latitude().to_radians().abs() <= MERCATOR_MAX_LATITUDE);
            shown += 1;
        }
    }
    // The square map is four radii tall.
    assert_eq!(shown, 200);

    // Points beyond the edges are placed onto them, but never counted as visible.
    for lat in [86.0, 89.9, 90.0, -88.0] {
        let beyond = Coordinates::from_degrees(0.0, lat, 0.0);
        assert!(matches!(viewport.screen_coordinates(&beyond), ScreenPosition::OffScreen(_)));
        assert!(viewport.screen_positions(&beyond).is_empty());
    }
}

#[test]
fn cylindrical_maps_show_every_copy() {
    for kind in [ProjectionKind::Equirectangular, ProjectionKind::Mercator] {
        // Four radii are a full turn, so a 1000 pixel wide view shows the map two and a half
        // times.
        let viewport = ViewportParams::new(kind, 0.0, 0.0, 100.0, ScreenSize::new(1000, 400));
        let positions = viewport.screen_positions(&Coordinates::from_degrees(90.0, 0.0, 0.0));
        assert_eq!(positions.len(), 2, "{kind}");
        assert_relative_eq!(positions[0].x(), 200.0, epsilon = 1e-9);
        assert_relative_eq!(positions[1].x(), 600.0, epsilon = 1e-9);
        assert_relative_eq!(positions[1].y(), 200.0, epsilon = 1e-9);
    }

    let globe = ViewportParams::new(
        ProjectionKind::Spherical,
        0.0,
        0.0,
        100.0,
        ScreenSize::new(1000, 400),
    );
    assert_eq!(globe.screen_positions(&Coordinates::from_degrees(0.0, 0.0, 0.0)).len(), 1);
}

#[test]
fn short_line_stays_in_one_piece() {
    let _ = env_logger::builder().is_test(true).try_init();

    let line = LineString::tessellated(vec![
        Coordinates::from_degrees(0.0, 20.0, 0.0),
        Coordinates::from_degrees(20.0, 20.0, 0.0),
    ]);
    for kind in ProjectionKind::ALL {
        let polygons = viewport(kind).line_string_polygons(&line);
        assert_eq!(polygons.len(), 1, "{kind}");
        assert!(polygons[0].coords().count() > 2, "{kind}");
    }
}
