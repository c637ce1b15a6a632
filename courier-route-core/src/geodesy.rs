//! Great-circle distances and human-readable units.
//!
//! Distances use a spherical earth of radius [`EARTH_RADIUS_M`] and the
//! haversine form, which stays accurate for the very short legs typical of
//! urban deliveries.

use std::time::Duration;

use crate::Coordinate;

/// Mean earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in metres.
///
/// The result is exactly zero for identical inputs and symmetric in its
/// arguments.
///
/// # Examples
/// ```
/// use courier_route_core::{Coordinate, distance_meters};
///
/// let a = Coordinate::new(36.8065, 10.1815);
/// let b = Coordinate::new(36.8066, 10.1816);
/// let d = distance_meters(a, b);
/// assert!(d > 0.0 && d < 1000.0);
/// assert_eq!(distance_meters(a, a), 0.0);
/// ```
#[must_use]
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    // Rounding can push `h` a hair above one for antipodal points.
    2.0 * EARTH_RADIUS_M * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Sum of the segment lengths of a polyline in metres.
#[must_use]
pub fn polyline_length_meters(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| match pair {
            [a, b] => distance_meters(*a, *b),
            _ => 0.0,
        })
        .sum()
}

/// Format a distance for display: whole metres below one kilometre,
/// kilometres with one decimal otherwise.
///
/// Negative and non-finite inputs are shown as `"0 m"`.
///
/// # Examples
/// ```
/// use courier_route_core::format_distance;
///
/// assert_eq!(format_distance(850.4), "850 m");
/// assert_eq!(format_distance(1234.0), "1.2 km");
/// ```
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if !meters.is_finite() || meters <= 0.0 {
        return "0 m".to_owned();
    }
    let rounded = meters.round();
    if rounded < 1000.0 {
        format!("{rounded:.0} m")
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

/// Format a duration for display as minutes, or hours and minutes from one
/// hour upwards. Partial minutes round up so a short trip never reads as
/// zero.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use courier_route_core::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(30)), "1 min");
/// assert_eq!(format_duration(Duration::from_secs(754)), "13 min");
/// assert_eq!(format_duration(Duration::from_secs(3900)), "1 h 05 min");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    let minutes = if duration.subsec_nanos() > 0 {
        seconds / 60 + 1
    } else {
        seconds.div_ceil(60)
    };
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{} h {:02} min", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn same_point_is_zero() {
        let point = Coordinate::new(36.8065, 10.1815);
        assert_eq!(distance_meters(point, point), 0.0);
    }

    #[rstest]
    fn nearby_pair_is_short() {
        let a = Coordinate::new(36.8065, 10.1815);
        let b = Coordinate::new(36.8066, 10.1816);
        let d = distance_meters(a, b);
        assert!(d > 0.0 && d < 1000.0, "got {d}");
        assert!((d - 14.3).abs() < 1.0, "got {d}");
    }

    #[rstest]
    fn one_degree_of_latitude() {
        let d = distance_meters(Coordinate::new(45.0, 5.0), Coordinate::new(46.0, 5.0));
        assert!((d - 111_195.0).abs() < 10.0, "got {d}");
    }

    #[rstest]
    fn paris_to_london() {
        let paris = Coordinate::new(48.8566, 2.3522);
        let london = Coordinate::new(51.5074, -0.1278);
        let d = distance_meters(paris, london);
        assert!((d - 343_500.0).abs() < 5_000.0, "got {d}");
    }

    #[rstest]
    fn antipodes_do_not_overflow() {
        let d = distance_meters(Coordinate::new(0.0, 10.0), Coordinate::new(0.0, -170.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_M).abs() < 1.0);
    }

    #[rstest]
    fn polyline_length_sums_segments() {
        let a = Coordinate::new(45.0, 5.0);
        let b = Coordinate::new(45.01, 5.0);
        let c = Coordinate::new(45.01, 5.01);
        let expected = distance_meters(a, b) + distance_meters(b, c);
        assert!((polyline_length_meters(&[a, b, c]) - expected).abs() < 1e-9);
        assert_eq!(polyline_length_meters(&[a]), 0.0);
        assert_eq!(polyline_length_meters(&[]), 0.0);
    }

    #[rstest]
    #[case(0.0, "0 m")]
    #[case(-5.0, "0 m")]
    #[case(f64::NAN, "0 m")]
    #[case(12.4, "12 m")]
    #[case(999.4, "999 m")]
    #[case(999.6, "1.0 km")]
    #[case(5000.0, "5.0 km")]
    #[case(12_345.0, "12.3 km")]
    fn formats_distance(#[case] meters: f64, #[case] expected: &str) {
        assert_eq!(format_distance(meters), expected);
    }

    #[rstest]
    #[case(Duration::ZERO, "0 min")]
    #[case(Duration::from_millis(1), "1 min")]
    #[case(Duration::from_secs(60), "1 min")]
    #[case(Duration::from_secs(61), "2 min")]
    #[case(Duration::from_secs(59 * 60), "59 min")]
    #[case(Duration::from_secs(3600), "1 h 00 min")]
    #[case(Duration::from_secs(2 * 3600 + 7 * 60), "2 h 07 min")]
    fn formats_duration(#[case] duration: Duration, #[case] expected: &str) {
        assert_eq!(format_duration(duration), expected);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn valid_coordinate() -> impl Strategy<Value = Coordinate> {
            (-90.0..=90.0, -180.0..=180.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
        }

        proptest! {
            #[test]
            fn distance_is_non_negative(a in valid_coordinate(), b in valid_coordinate()) {
                prop_assert!(distance_meters(a, b) >= 0.0);
            }

            #[test]
            fn distance_is_symmetric(a in valid_coordinate(), b in valid_coordinate()) {
                prop_assert!((distance_meters(a, b) - distance_meters(b, a)).abs() < 1e-6);
            }

            #[test]
            fn distance_to_self_is_zero(a in valid_coordinate()) {
                prop_assert_eq!(distance_meters(a, a), 0.0);
            }

            #[test]
            fn distance_bounded_by_half_circumference(
                a in valid_coordinate(),
                b in valid_coordinate(),
            ) {
                let max = std::f64::consts::PI * EARTH_RADIUS_M;
                prop_assert!(distance_meters(a, b) <= max + 1e-6);
            }
        }
    }
}
