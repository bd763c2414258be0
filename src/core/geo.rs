//! Geographic Primitives
//!
//! Locations in degrees and great-circle distance via the haversine
//! formula. Distances are reported in whole kilometers, which is the
//! resolution the scoring formula and the results screen work at.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the globe, in degrees.
///
/// Immutable value type: latitude in `[-90, 90]`, longitude in
/// `[-180, 180]`. The engine never mutates a location after creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees (positive = north)
    pub lat: f64,
    /// Longitude in degrees (positive = east)
    pub lng: f64,
}

impl Location {
    /// Create a new location from degrees.
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lng)
    }
}

/// Great-circle distance between two locations, in whole kilometers.
///
/// Haversine formula over a sphere of radius [`EARTH_RADIUS_KM`],
/// rounded to the nearest kilometer. Symmetric in its arguments, and
/// zero for identical (or near-identical, sub-0.5 km) inputs.
pub fn distance_km(actual: Location, guessed: Location) -> u32 {
    let d_lat = (guessed.lat - actual.lat).to_radians();
    let d_lng = (guessed.lng - actual.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + actual.lat.to_radians().cos()
            * guessed.lat.to_radians().cos()
            * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    (EARTH_RADIUS_KM * c).round() as u32
}
