//! Spherical-earth constants and compass headings.
//!
//! Distances, bearings and lengths come from [`geo::Haversine`].
//!
//! All points follow the `geo` convention: `x` is longitude, `y` is latitude.

use std::fmt;

use geo::Haversine;
use serde::Serialize;

/// Sphere radius in meters used by [`Haversine`], for converting meters to
/// degrees when sizing lookup envelopes
pub const EARTH_RADIUS_M: f64 = Haversine.radius();

/// Eight-wind compass rose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Compass {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Compass {
    const ROSE: [Compass; 8] = [
        Compass::North,
        Compass::NorthEast,
        Compass::East,
        Compass::SouthEast,
        Compass::South,
        Compass::SouthWest,
        Compass::West,
        Compass::NorthWest,
    ];

    /// Nearest compass direction for a bearing in degrees
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_bearing(bearing: f64) -> Self {
        let normalized = bearing.rem_euclid(360.0);
        let sector = (normalized / 45.0).round() as usize % 8;
        Self::ROSE[sector]
    }
}

impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compass::North => "north",
            Compass::NorthEast => "northeast",
            Compass::East => "east",
            Compass::SouthEast => "southeast",
            Compass::South => "south",
            Compass::SouthWest => "southwest",
            Compass::West => "west",
            Compass::NorthWest => "northwest",
        };
        f.write_str(name)
    }
}
