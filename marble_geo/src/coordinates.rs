//! Geographic coordinates and the spherical geometry working on them.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use glam::DQuat;

use crate::angle::{Angle, DEG2RAD, Latitude, Longitude};
use crate::quaternion::QuaternionExt as _;

/// Mean planet radius (meters) used to scale altitudes into projected pixels.
pub const EARTH_RADIUS: f64 = 6_378_000.0;

/// Which pole [`Coordinates::is_pole`] should look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pole {
    Any,
    North,
    South,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BearingKind {
    /// Direction when leaving the start point.
    #[default]
    Initial,
    /// Direction when arriving at the destination.
    Final,
}

/// A point on (or above) the planet: longitude, latitude, altitude in meters and a detail
/// level. Points with a detail level above the one a viewport resolves are skipped when
/// converting geometries to screen polygons.
///
/// Constructors keep the angles as given; call [`Coordinates::normalize`] to bring them into
/// `[-π, π] × [-π/2, π/2]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Coordinates {
    longitude: Longitude,
    latitude: Latitude,
    altitude: f64,
    detail: u8,
}

impl Coordinates {
    /// Construct from radians.
    pub fn new(lon: f64, lat: f64, altitude: f64) -> Self {
        Self {
            longitude: Longitude::from_radians(lon),
            latitude: Latitude::from_radians(lat),
            altitude,
            detail: 0,
        }
    }

    /// Construct from degrees.
    pub fn from_degrees(lon: f64, lat: f64, altitude: f64) -> Self {
        Self::new(lon * DEG2RAD, lat * DEG2RAD, altitude)
    }

    pub fn from_angles(longitude: Longitude, latitude: Latitude, altitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude,
            detail: 0,
        }
    }

    pub fn with_detail(self, detail: u8) -> Self {
        Self { detail, ..self }
    }

    pub fn longitude(&self) -> Longitude {
        self.longitude
    }

    pub fn latitude(&self) -> Latitude {
        self.latitude
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn detail(&self) -> u8 {
        self.detail
    }

    /// Longitude and latitude in radians.
    pub fn lon_lat(&self) -> (f64, f64) {
        (self.longitude.to_radians(), self.latitude.to_radians())
    }

    pub fn set_altitude(&mut self, altitude: f64) {
        self.altitude = altitude;
    }

    /// Wrap the longitude into `[-π, π]`.
    pub fn normalize_lon(lon: f64) -> f64 {
        if lon > PI {
            let cycles = ((lon + PI) / (2.0 * PI)).trunc();
            return lon - cycles * 2.0 * PI;
        }
        if lon < -PI {
            let cycles = ((lon - PI) / (2.0 * PI)).trunc();
            return lon - cycles * 2.0 * PI;
        }
        lon
    }

    /// Fold the latitude into `[-π/2, π/2]`. Going past a pole continues down the other side
    /// of the sphere, so 100° becomes 80° rather than -80°.
    pub fn normalize_lat(lat: f64) -> f64 {
        fold_latitude(lat).0
    }

    /// Normalize both angles. Every time the latitude is folded over a pole the point moves to
    /// the opposite meridian, which shifts the longitude by π.
    pub fn normalize_lon_lat(lon: f64, lat: f64) -> (f64, f64) {
        let mut lon = Self::normalize_lon(lon);
        let (lat, crossed_pole) = fold_latitude(lat);
        if crossed_pole {
            lon = if lon > 0.0 { lon - PI } else { lon + PI };
        }
        (lon, lat)
    }

    pub fn normalize(&mut self) {
        let (lon, lat) =
            Self::normalize_lon_lat(self.longitude.to_radians(), self.latitude.to_radians());
        self.longitude = Longitude::from_radians(lon);
        self.latitude = Latitude::from_radians(lat);
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn is_pole(&self, pole: Pole) -> bool {
        let lat = self.latitude.to_radians();

        // The common case: a normalized latitude which is not at a pole.
        if (2.0 * lat).abs() < PI {
            return false;
        }

        if (2.0 * lat).abs() == PI {
            return matches_pole(lat, pole);
        }

        log::debug!("Coordinates {self} are not normalized.");

        let lat = Self::normalize_lat(lat);
        if (2.0 * lat).abs() < PI {
            false
        } else {
            matches_pole(lat, pole)
        }
    }

    /// Pure unit quaternion of this point, see [`QuaternionExt::from_spherical`].
    ///
    /// [`QuaternionExt::from_spherical`]: crate::QuaternionExt::from_spherical
    pub fn quaternion(&self) -> DQuat {
        DQuat::from_spherical(self.longitude.to_radians(), self.latitude.to_radians())
    }

    fn from_quaternion(quaternion: DQuat, altitude: f64) -> Self {
        let (lon, lat) = quaternion.spherical();
        Self::new(lon, lat, altitude)
    }

    /// Great circle bearing towards `other`. The final bearing is the reverse of the initial
    /// bearing from `other` back to `self`.
    pub fn bearing(&self, other: &Coordinates, kind: BearingKind) -> Angle {
        match kind {
            BearingKind::Initial => {
                let (lon1, lat1) = self.lon_lat();
                let (lon2, lat2) = other.lon_lat();
                let delta = lon2 - lon1;
                Angle::from_radians(
                    (delta.sin() * lat2.cos())
                        .atan2(lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta.cos()),
                )
            }
            BearingKind::Final => {
                Angle::from_radians(PI) + other.bearing(self, BearingKind::Initial)
            }
        }
    }

    /// Destination after travelling `distance` (radians of arc) from here along `bearing`.
    pub fn move_by_bearing(&self, bearing: Angle, distance: Angle) -> Self {
        let (lon, lat) = self.lon_lat();
        let (bearing, distance) = (bearing.to_radians(), distance.to_radians());

        let new_lat =
            (lat.sin() * distance.cos() + lat.cos() * distance.sin() * bearing.cos()).asin();
        let new_lon = lon
            + (bearing.sin() * distance.sin() * lat.cos())
                .atan2(distance.cos() - lat.sin() * new_lat.sin());

        Self::new(new_lon, new_lat, self.altitude)
    }

    /// Central angle between the two points (haversine).
    pub fn angular_distance(&self, other: &Coordinates) -> Angle {
        let (lon1, lat1) = self.lon_lat();
        let (lon2, lat2) = other.lon_lat();

        let h1 = (0.5 * (lat2 - lat1)).sin();
        let h2 = (0.5 * (lon2 - lon1)).sin();
        let d = h1 * h1 + lat1.cos() * lat2.cos() * h2 * h2;

        Angle::from_radians(2.0 * d.sqrt().atan2((1.0 - d).sqrt()))
    }

    /// Surface distance on a sphere of the given radius.
    pub fn distance(&self, other: &Coordinates, planet_radius: f64) -> f64 {
        self.angular_distance(other).to_radians() * planet_radius
    }

    /// Point at fraction `t` (clamped to `[0, 1]`) of the great circle arc towards `target`.
    pub fn interpolate(&self, target: &Coordinates, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let q = self.quaternion().slerp_arc(target.quaternion(), t);
        Self::from_quaternion(q, (1.0 - t) * self.altitude + t * target.altitude)
    }

    /// Smooth interpolation between `self` and `target` which also takes the neighbouring
    /// points into account, giving a curve without kinks through a sequence of points.
    pub fn interpolate_spline(
        &self,
        before: &Coordinates,
        target: &Coordinates,
        after: &Coordinates,
        t: f64,
    ) -> Self {
        let t = t.clamp(0.0, 1.0);
        let b1 = base_point(before.quaternion(), self.quaternion(), target.quaternion());
        let a2 = base_point(self.quaternion(), target.quaternion(), after.quaternion());
        let a = self.quaternion().slerp_arc(target.quaternion(), t);
        let b = b1.slerp_arc(a2, t);
        let c = a.slerp_arc(b, 2.0 * t * (1.0 - t));

        // Altitude is interpolated linearly.
        Self::from_quaternion(c, (1.0 - t) * self.altitude + t * target.altitude)
    }

    /// Rotate this point by `angle` around the axis through `axis` and the planet's center.
    pub fn rotate_around(&self, axis: &Coordinates, angle: Angle) -> Self {
        let quat_axis = DQuat::from_pitch_yaw_roll(
            -axis.latitude.to_radians(),
            axis.longitude.to_radians(),
            0.0,
        );
        let rotation = DQuat::from_pitch_yaw_roll(0.0, 0.0, angle.to_radians());
        let result_axis = quat_axis * rotation * quat_axis.planetary_inverse();

        Self::from_quaternion(
            self.quaternion().rotate_around_axis(result_axis),
            self.altitude,
        )
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.longitude, self.latitude)
    }
}

/// Fold a latitude into `[-π/2, π/2]`, reporting whether it ended up on the opposite meridian.
fn fold_latitude(lat: f64) -> (f64, bool) {
    if lat > FRAC_PI_2 {
        let cycles = ((lat + PI) / (2.0 * PI)).trunc();
        return fold_remainder(lat - cycles * 2.0 * PI);
    }
    if lat < -FRAC_PI_2 {
        let cycles = ((lat - PI) / (2.0 * PI)).trunc();
        return fold_remainder(lat - cycles * 2.0 * PI);
    }
    (lat, false)
}

/// `temp` lies in `[-π, π]` once full turns are removed.
fn fold_remainder(temp: f64) -> (f64, bool) {
    if temp > FRAC_PI_2 {
        (PI - temp, true)
    } else if temp < -FRAC_PI_2 {
        (-PI - temp, true)
    } else {
        (temp, false)
    }
}

fn matches_pole(lat: f64, pole: Pole) -> bool {
    match pole {
        Pole::Any => true,
        Pole::North => 2.0 * lat == PI,
        Pole::South => 2.0 * lat == -PI,
    }
}

/// Control point of the spline segment at `q2`, offset along the tangent given by its
/// neighbours.
fn base_point(q1: DQuat, q2: DQuat, q3: DQuat) -> DQuat {
    let inverse = q2.planetary_inverse();
    let a = (inverse * q3).logarithm();
    let b = (inverse * q1).logarithm();
    q2 * ((a + b) * -0.25).exponential()
}
