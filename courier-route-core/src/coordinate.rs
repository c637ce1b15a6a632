//! Geographic coordinates and their validation.
//!
//! Coordinates are WGS84 latitude/longitude pairs in degrees. The pair
//! `(0.0, 0.0)` doubles as the "unset" sentinel emitted by upstream forms
//! and geolocation failures, so it is never considered valid.

use geo::Coord;

/// A WGS84 position in degrees.
///
/// The type is a plain value: nothing enforces validity at construction,
/// because callers routinely hand over unset or corrupted positions and the
/// resolver must still answer. Use [`Coordinate::is_valid`] (or the free
/// function [`is_valid`]) to check before trusting one.
///
/// # Examples
/// ```
/// use courier_route_core::Coordinate;
///
/// let pickup = Coordinate::new(36.8065, 10.1815);
/// assert!(pickup.is_valid());
/// assert!(!Coordinate::new(0.0, 0.0).is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Latitude in degrees, `[-90, 90]` when valid.
    pub latitude: f64,
    /// Longitude in degrees, `[-180, 180]` when valid.
    pub longitude: f64,
}

impl Coordinate {
    /// Construct a coordinate from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Construct a coordinate from a longitude-first pair, as emitted by
    /// GeoJSON geometries.
    #[must_use]
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        let [longitude, latitude] = pair;
        Self::new(latitude, longitude)
    }

    /// Whether the coordinate is usable for routing.
    ///
    /// See [`is_valid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid(*self)
    }

    /// Linear interpolation towards `other`; `t = 0` yields `self` and
    /// `t = 1` yields `other`.
    ///
    /// Longitude follows the shorter way round, so a pair straddling the
    /// antimeridian interpolates across it rather than through Greenwich.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let mut delta_lon = other.longitude - self.longitude;
        if delta_lon > 180.0 {
            delta_lon -= 360.0;
        } else if delta_lon < -180.0 {
            delta_lon += 360.0;
        }
        Self {
            latitude: self.latitude + (other.latitude - self.latitude) * t,
            longitude: wrap_longitude(self.longitude + delta_lon * t),
        }
    }

    /// Clamp the latitude into `[-90, 90]` and wrap the longitude into
    /// `[-180, 180]`. Non-finite components are left untouched.
    #[must_use]
    pub fn normalized(self) -> Self {
        let latitude = if self.latitude.is_finite() {
            self.latitude.clamp(-90.0, 90.0)
        } else {
            self.latitude
        };
        Self::new(latitude, wrap_longitude(self.longitude))
    }
}

fn wrap_longitude(longitude: f64) -> f64 {
    if !longitude.is_finite() || (-180.0..=180.0).contains(&longitude) {
        longitude
    } else {
        (longitude + 180.0).rem_euclid(360.0) - 180.0
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Self {
            x: value.longitude,
            y: value.latitude,
        }
    }
}

impl From<Coord<f64>> for Coordinate {
    fn from(value: Coord<f64>) -> Self {
        Self::new(value.y, value.x)
    }
}

/// Check that a coordinate can be sent to a routing provider.
///
/// Returns `false` when either component is NaN or infinite, when the
/// latitude lies outside `[-90, 90]` or the longitude outside `[-180, 180]`,
/// and when both components are exactly zero.
///
/// # Examples
/// ```
/// use courier_route_core::{Coordinate, is_valid};
///
/// assert!(is_valid(Coordinate::new(-33.9, 18.4)));
/// assert!(!is_valid(Coordinate::new(91.0, 0.5)));
/// assert!(!is_valid(Coordinate::new(f64::NAN, 10.0)));
/// ```
#[must_use]
pub fn is_valid(coordinate: Coordinate) -> bool {
    let Coordinate {
        latitude,
        longitude,
    } = coordinate;
    if !latitude.is_finite() || !longitude.is_finite() {
        return false;
    }
    if latitude == 0.0 && longitude == 0.0 {
        return false;
    }
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}
