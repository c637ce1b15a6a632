//! Polyline densification for smooth marker animation.

use std::cmp::Ordering;

use crate::{Coordinate, distance_meters};

/// Return a polyline with exactly `target_count` points.
///
/// Original vertices are kept, in order, and the extra points are spread
/// over the segments in proportion to their great-circle length, each
/// segment's share placed at equal fractions along it. Polylines that
/// already have `target_count` points or more, and polylines with fewer
/// than two points, are returned unchanged.
///
/// # Examples
/// ```
/// use courier_route_core::{Coordinate, densify};
///
/// let line = [Coordinate::new(36.80, 10.18), Coordinate::new(36.82, 10.16)];
/// let dense = densify(&line, 10);
/// assert_eq!(dense.len(), 10);
/// assert_eq!(dense.first(), line.first());
/// assert_eq!(dense.last(), line.last());
/// assert_eq!(densify(&line, 2), line.to_vec());
/// ```
#[must_use]
pub fn densify(polyline: &[Coordinate], target_count: usize) -> Vec<Coordinate> {
    if polyline.len() < 2 || target_count <= polyline.len() {
        return polyline.to_vec();
    }
    let extra = target_count - polyline.len();
    let lengths: Vec<f64> = polyline
        .windows(2)
        .map(|pair| match pair {
            [a, b] => distance_meters(*a, *b),
            _ => 0.0,
        })
        .collect();
    let allocation = allocate_extra_points(extra, &lengths);

    let mut dense = Vec::with_capacity(target_count);
    for (pair, inserted) in polyline.windows(2).zip(allocation) {
        let [a, b] = pair else { continue };
        dense.push(*a);
        let divisions = (inserted + 1) as f64;
        dense.extend((1..=inserted).map(|step| a.lerp(*b, step as f64 / divisions)));
    }
    dense.extend(polyline.last().copied());
    dense
}

/// Split `extra` points across segments using largest-remainder rounding.
///
/// Degenerate polylines (zero or non-finite total length) share the points
/// evenly.
fn allocate_extra_points(extra: usize, lengths: &[f64]) -> Vec<usize> {
    let total: f64 = lengths.iter().sum();
    let segments = lengths.len() as f64;
    let ideal: Vec<f64> = if total.is_finite() && total > 0.0 {
        lengths
            .iter()
            .map(|length| length / total * extra as f64)
            .collect()
    } else {
        vec![extra as f64 / segments; lengths.len()]
    };

    let mut counts: Vec<usize> = ideal.iter().map(|share| share.floor() as usize).collect();
    let assigned: usize = counts.iter().sum();
    let remaining = extra.saturating_sub(assigned);

    let mut by_remainder: Vec<(usize, f64)> = ideal
        .iter()
        .map(|share| share - share.floor())
        .enumerate()
        .collect();
    by_remainder.sort_by(|(i, a), (j, b)| {
        b.partial_cmp(a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| i.cmp(j))
    });
    for (index, _) in by_remainder.into_iter().cycle().take(remaining) {
        if let Some(count) = counts.get_mut(index) {
            *count += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn route() -> Vec<Coordinate> {
        vec![
            Coordinate::new(36.8065, 10.1815),
            Coordinate::new(36.8100, 10.1815),
            Coordinate::new(36.8100, 10.2000),
        ]
    }

    #[rstest]
    #[case(4)]
    #[case(10)]
    #[case(101)]
    fn yields_exact_count(route: Vec<Coordinate>, #[case] target: usize) {
        let dense = densify(&route, target);
        assert_eq!(dense.len(), target);
        assert_eq!(dense.first(), route.first());
        assert_eq!(dense.last(), route.last());
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(3)]
    fn short_targets_return_input(route: Vec<Coordinate>, #[case] target: usize) {
        assert_eq!(densify(&route, target), route);
    }

    #[rstest]
    fn keeps_original_vertices_in_order(route: Vec<Coordinate>) {
        let dense = densify(&route, 25);
        let mut cursor = dense.iter();
        for vertex in &route {
            assert!(cursor.any(|point| point == vertex), "missing {vertex:?}");
        }
    }

    #[rstest]
    fn longer_segments_receive_more_points(route: Vec<Coordinate>) {
        // The second leg is roughly four times longer than the first.
        let dense = densify(&route, 23);
        let corner = dense
            .iter()
            .position(|point| *point == route[1])
            .expect("corner retained");
        let first_leg = corner - 1;
        let second_leg = dense.len() - corner - 2;
        assert_eq!(first_leg + second_leg, 20);
        assert!(second_leg > first_leg * 3, "{first_leg} vs {second_leg}");
    }

    #[rstest]
    fn zero_length_polyline_spreads_evenly() {
        let point = Coordinate::new(36.8, 10.2);
        let dense = densify(&[point, point, point], 9);
        assert_eq!(dense.len(), 9);
        assert!(dense.iter().all(|p| *p == point));
    }

    #[rstest]
    fn single_point_is_returned_unchanged() {
        let point = vec![Coordinate::new(36.8, 10.2)];
        assert_eq!(densify(&point, 10), point);
        assert!(densify(&[], 10).is_empty());
    }

    #[rstest]
    fn inserted_points_lie_between_vertices() {
        let a = Coordinate::new(36.0, 10.0);
        let b = Coordinate::new(37.0, 10.0);
        let dense = densify(&[a, b], 5);
        let latitudes: Vec<f64> = dense.iter().map(|p| p.latitude).collect();
        assert_eq!(latitudes, vec![36.0, 36.25, 36.5, 36.75, 37.0]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn polyline() -> impl Strategy<Value = Vec<Coordinate>> {
            prop::collection::vec(
                (36.0..37.0_f64, 10.0..11.0_f64).prop_map(|(lat, lon)| Coordinate::new(lat, lon)),
                2..12,
            )
        }

        proptest! {
            #[test]
            fn densified_length_matches_target(line in polyline(), extra in 0_usize..200) {
                let target = line.len() + extra;
                let dense = densify(&line, target);
                prop_assert_eq!(dense.len(), target);
                prop_assert_eq!(dense.first(), line.first());
                prop_assert_eq!(dense.last(), line.last());
            }

            #[test]
            fn densify_is_deterministic(line in polyline(), extra in 0_usize..50) {
                let target = line.len() + extra;
                prop_assert_eq!(densify(&line, target), densify(&line, target));
            }
        }
    }
}
