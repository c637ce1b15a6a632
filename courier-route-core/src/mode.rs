//! Modes of transport understood by the resolver.
//!
//! # Examples
//! ```
//! use courier_route_core::TravelMode;
//!
//! assert_eq!(TravelMode::Cycling.as_str(), "cycling");
//! assert_eq!("walking".parse::<TravelMode>(), Ok(TravelMode::Walking));
//! ```

/// How the courier travels between pickup and drop-off.
///
/// Each provider maps the mode onto its own profile vocabulary; the
/// synthesizer uses it to pick an average speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TravelMode {
    /// Motor vehicle.
    #[default]
    Driving,
    /// Bicycle or cargo bike.
    Cycling,
    /// On foot.
    Walking,
}

impl TravelMode {
    /// Every supported mode, in declaration order.
    pub const ALL: [Self; 3] = [Self::Driving, Self::Cycling, Self::Walking];

    /// Return the mode as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Cycling => "cycling",
            Self::Walking => "walking",
        }
    }

    /// Assumed average speed in km/h for urban delivery conditions.
    #[must_use]
    pub const fn average_speed_kmh(&self) -> f64 {
        match self {
            Self::Driving => 25.0,
            Self::Cycling => 15.0,
            Self::Walking => 5.0,
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "driving" | "car" => Ok(Self::Driving),
            "cycling" | "bike" => Ok(Self::Cycling),
            "walking" | "foot" => Ok(Self::Walking),
            _ => Err(format!("unknown travel mode '{s}'")),
        }
    }
}
