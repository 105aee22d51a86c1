//! Strongly typed angles. Every value is stored in radians; degrees only show up when
//! constructing or converting at the API boundary.

use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::coordinates::Coordinates;

/// Multiply degrees by this to get radians.
pub const DEG2RAD: f64 = PI / 180.0;

/// Multiply radians by this to get degrees.
pub const RAD2DEG: f64 = 180.0 / PI;

macro_rules! angle_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
        #[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
        pub struct $name(f64);

        impl $name {
            pub const ZERO: Self = Self(0.0);

            pub const fn from_radians(radians: f64) -> Self {
                Self(radians)
            }

            pub fn from_degrees(degrees: f64) -> Self {
                Self(degrees * DEG2RAD)
            }

            pub const fn to_radians(self) -> f64 {
                self.0
            }

            pub fn to_degrees(self) -> f64 {
                self.0 * RAD2DEG
            }

            /// The angle itself if it is not negative, its negation otherwise.
            pub fn abs(self) -> Self {
                if self.0 >= 0.0 { self } else { -self }
            }

            pub fn sin(self) -> f64 {
                self.0.sin()
            }

            pub fn cos(self) -> f64 {
                self.0.cos()
            }

            pub fn tan(self) -> f64 {
                self.0.tan()
            }
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl Neg for $name {
            type Output = Self;

            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;

            fn mul(self, rhs: f64) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Mul<$name> for f64 {
            type Output = $name;

            fn mul(self, rhs: $name) -> $name {
                $name(self * rhs.0)
            }
        }

        impl Div<f64> for $name {
            type Output = Self;

            fn div(self, rhs: f64) -> Self {
                Self(self.0 / rhs)
            }
        }

        /// Two angles of the same kind divide into a plain ratio.
        impl Div for $name {
            type Output = f64;

            fn div(self, rhs: Self) -> f64 {
                self.0 / rhs.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.6}°", self.to_degrees())
            }
        }
    };
}

angle_type!(
    /// A generic angle, e.g. a bearing or an angular distance.
    Angle
);

angle_type!(
    /// Longitude. May hold any value, e.g. an accumulated rotation, until normalized.
    Longitude
);

angle_type!(
    /// Latitude. May lie beyond the poles until normalized.
    Latitude
);

impl Longitude {
    /// Wrap into `[-π, π]`.
    pub fn normalized(self) -> NormalizedLongitude {
        NormalizedLongitude(Self(Coordinates::normalize_lon(self.0)))
    }
}

impl Latitude {
    /// Fold into `[-π/2, π/2]`. Note that folding a latitude alone loses the longitude flip
    /// which crossing a pole implies; use [`Coordinates::normalize_lon_lat`] for points.
    pub fn normalized(self) -> NormalizedLatitude {
        NormalizedLatitude(Self(Coordinates::normalize_lat(self.0)))
    }
}

/// Longitude guaranteed to lie in `[-π, π]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct NormalizedLongitude(Longitude);

/// Latitude guaranteed to lie in `[-π/2, π/2]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct NormalizedLatitude(Latitude);

impl NormalizedLongitude {
    pub fn get(self) -> Longitude {
        self.0
    }

    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }

    pub fn to_degrees(self) -> f64 {
        self.0.to_degrees()
    }
}

impl NormalizedLatitude {
    pub fn get(self) -> Latitude {
        self.0
    }

    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }

    pub fn to_degrees(self) -> f64 {
        self.0.to_degrees()
    }
}

impl From<NormalizedLongitude> for Longitude {
    fn from(value: NormalizedLongitude) -> Self {
        value.0
    }
}

impl From<NormalizedLatitude> for Latitude {
    fn from(value: NormalizedLatitude) -> Self {
        value.0
    }
}
