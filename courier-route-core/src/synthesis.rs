//! Locally generated fallback routes.
//!
//! When no provider answers, the resolver still owes the caller a path. The
//! [`FallbackSynthesizer`] draws a gently curving line between the two
//! endpoints so the map shows something road-like, and estimates distance
//! and duration from the straight-line gap.

use std::f64::consts::PI;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::provider::duration_from_secs;
use crate::{Coordinate, RouteResult, TravelMode, distance_meters};

/// Stand-in for an invalid endpoint: central Tunis.
pub const DEFAULT_REFERENCE: Coordinate = Coordinate::new(36.8065, 10.1815);

/// Tuning knobs for [`FallbackSynthesizer`].
///
/// # Examples
/// ```
/// use courier_route_core::SynthesisConfig;
///
/// let config = SynthesisConfig::default().with_seed(7);
/// assert_eq!(config.seed, Some(7));
/// assert_eq!(config.detour_factor, 1.4);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SynthesisConfig {
    /// Amplitude of the curve offsets in degrees.
    pub curve_intensity_deg: f64,
    /// Ratio of road distance to straight-line distance.
    pub detour_factor: f64,
    /// Straight-line distances above this are treated as bad input.
    pub ceiling_m: f64,
    /// Road distance reported when the ceiling is exceeded.
    pub clamp_distance_m: f64,
    /// Replacement for invalid endpoints.
    pub reference: Coordinate,
    /// Total point count bounds, endpoints included.
    pub min_points: usize,
    /// See [`SynthesisConfig::min_points`].
    pub max_points: usize,
    /// Fixed jitter seed. `None` derives one from the request.
    pub seed: Option<u64>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            curve_intensity_deg: 0.002,
            detour_factor: 1.4,
            ceiling_m: 50_000.0,
            clamp_distance_m: 5_000.0,
            reference: DEFAULT_REFERENCE,
            min_points: 5,
            max_points: 15,
            seed: None,
        }
    }
}

impl SynthesisConfig {
    /// Use a fixed jitter seed for every request.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the curve amplitude in degrees.
    #[must_use]
    pub fn with_curve_intensity(mut self, degrees: f64) -> Self {
        self.curve_intensity_deg = degrees;
        self
    }

    /// Set the road-to-straight-line distance ratio.
    #[must_use]
    pub fn with_detour_factor(mut self, factor: f64) -> Self {
        self.detour_factor = factor;
        self
    }

    /// Set the reference coordinate substituted for invalid endpoints.
    #[must_use]
    pub fn with_reference(mut self, reference: Coordinate) -> Self {
        self.reference = reference;
        self
    }
}

/// Builds approximate routes without any network access.
///
/// Output is a pure function of the configuration and the request: the
/// jitter generator is seeded from the effective endpoints and the mode
/// unless [`SynthesisConfig::seed`] is set.
///
/// # Examples
/// ```
/// use courier_route_core::{Coordinate, FallbackSynthesizer, TravelMode};
///
/// let synthesizer = FallbackSynthesizer::default();
/// let start = Coordinate::new(36.90272, 10.18749);
/// let end = Coordinate::new(36.8065, 10.1815);
/// let route = synthesizer.synthesize(start, end, TravelMode::Driving);
///
/// assert!(!route.is_authoritative());
/// assert_eq!(route.polyline().first(), Some(&start));
/// assert_eq!(route.polyline().last(), Some(&end));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackSynthesizer {
    config: SynthesisConfig,
}

impl FallbackSynthesizer {
    /// Create a synthesizer with explicit configuration.
    #[must_use]
    pub const fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Replace `coordinate` with the reference point when it is unusable.
    #[must_use]
    pub fn effective_endpoint(&self, coordinate: Coordinate) -> Coordinate {
        if coordinate.is_valid() {
            coordinate
        } else {
            self.config.reference
        }
    }

    /// Generate a non-authoritative route from `start` to `end`.
    ///
    /// Invalid endpoints are replaced by [`SynthesisConfig::reference`]; the
    /// returned polyline starts and ends exactly on the effective endpoints.
    #[must_use]
    pub fn synthesize(&self, start: Coordinate, end: Coordinate, mode: TravelMode) -> RouteResult {
        let start = self.effective_endpoint(start);
        let end = self.effective_endpoint(end);
        let straight_m = distance_meters(start, end);
        let road_m = self.road_distance(straight_m);

        let count = self.point_count(straight_m);
        let seed = self
            .config
            .seed
            .unwrap_or_else(|| derive_seed(start, end, mode));
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let k = self.config.curve_intensity_deg;
        let jitter = k.abs() * 0.3;
        let last = (count - 1) as f64;

        let mut polyline = Vec::with_capacity(count);
        polyline.push(start);
        for i in 1..count - 1 {
            let p = i as f64 / last;
            let base = start.lerp(end, p);
            let lat_jitter = rng.gen_range(-1.0_f64..=1.0) * jitter;
            let lon_jitter = rng.gen_range(-1.0_f64..=1.0) * jitter;
            // Offsets can push polar or antimeridian routes out of range.
            polyline.push(
                Coordinate::new(
                    base.latitude + (p * 3.0 * PI).sin() * k + lat_jitter,
                    base.longitude + (p * 2.0 * PI).cos() * k * 0.5 + lon_jitter,
                )
                .normalized(),
            );
        }
        polyline.push(end);

        let hours = road_m / 1000.0 / mode.average_speed_kmh();
        let duration = duration_from_secs(hours * 3600.0).unwrap_or_default();
        debug!(
            "synthesized {} point route over {straight_m:.0} m straight line ({mode})",
            polyline.len()
        );
        RouteResult::synthesized(polyline, road_m, duration)
    }

    fn road_distance(&self, straight_m: f64) -> f64 {
        if straight_m > self.config.ceiling_m {
            self.config.clamp_distance_m
        } else {
            straight_m * self.config.detour_factor
        }
    }

    /// Total points including endpoints; roughly one per kilometre.
    fn point_count(&self, straight_m: f64) -> usize {
        let min = self.config.min_points.max(2);
        let max = self.config.max_points.max(min);
        ((straight_m / 1000.0).floor() as usize).clamp(min, max)
    }
}

/// Synthesise a route with the default configuration.
#[must_use]
pub fn synthesize(start: Coordinate, end: Coordinate, mode: TravelMode) -> RouteResult {
    FallbackSynthesizer::default().synthesize(start, end, mode)
}

fn derive_seed(start: Coordinate, end: Coordinate, mode: TravelMode) -> u64 {
    // SplitMix64 finaliser folded over the coordinate bits.
    fn mix(mut z: u64) -> u64 {
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
    [
        start.latitude.to_bits(),
        start.longitude.to_bits(),
        end.latitude.to_bits(),
        end.longitude.to_bits(),
        mode as u64,
    ]
    .into_iter()
    .fold(0x9e37_79b9_7f4a_7c15, |acc, bits| {
        mix(acc.rotate_left(5) ^ bits)
    })
}
