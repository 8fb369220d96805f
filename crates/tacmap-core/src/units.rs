//! Unit conversion utilities
//!
//! All measurement math runs in kilometres. These helpers convert to the
//! operator's display unit for label text and parse typed distances (radius
//! entry) back into kilometres.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Largest usable circle radius. At half the circumference the ring
/// collapses onto the antipode.
pub const MAX_CIRCLE_RADIUS_KM: f64 = std::f64::consts::PI * EARTH_RADIUS_KM;

/// Kilometres in one statute mile.
pub const KM_PER_MILE: f64 = 1.609_344;

/// Kilometres in one nautical mile.
pub const KM_PER_NAUTICAL_MILE: f64 = 1.852;

/// Display unit for distances and areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    /// Kilometres
    #[default]
    Kilometers,
    /// Statute miles
    Miles,
    /// Nautical miles
    NauticalMiles,
}

impl DistanceUnit {
    /// Abbreviation used in label text.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Kilometers => "km",
            Self::Miles => "mi",
            Self::NauticalMiles => "nmi",
        }
    }

    fn km_per_unit(&self) -> f64 {
        match self {
            Self::Kilometers => 1.0,
            Self::Miles => KM_PER_MILE,
            Self::NauticalMiles => KM_PER_NAUTICAL_MILE,
        }
    }

    /// Converts a length in kilometres to this unit.
    pub fn from_km(&self, km: f64) -> f64 {
        km / self.km_per_unit()
    }

    /// Converts a length in this unit to kilometres.
    pub fn to_km(&self, value: f64) -> f64 {
        value * self.km_per_unit()
    }

    /// Converts an area in square kilometres to this unit squared.
    pub fn area_from_km2(&self, km2: f64) -> f64 {
        km2 / (self.km_per_unit() * self.km_per_unit())
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kilometers => write!(f, "Kilometers"),
            Self::Miles => write!(f, "Miles"),
            Self::NauticalMiles => write!(f, "Nautical miles"),
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "km" | "kilometers" | "kilometres" => Ok(Self::Kilometers),
            "mi" | "miles" => Ok(Self::Miles),
            "nmi" | "nm" | "nautical_miles" | "nautical miles" => Ok(Self::NauticalMiles),
            _ => Err(format!("Unknown distance unit: {}", s)),
        }
    }
}

/// Format a length for label text
///
/// * `km` - Value in kilometres
/// * `unit` - Display unit
/// * `decimals` - Digits after the decimal point
pub fn format_distance(km: f64, unit: DistanceUnit, decimals: usize) -> String {
    format!("{:.*} {}", decimals, unit.from_km(km), unit.symbol())
}

/// Format an area for label text
///
/// * `km2` - Value in square kilometres
/// * `unit` - Display unit (squared)
/// * `decimals` - Digits after the decimal point
pub fn format_area(km2: f64, unit: DistanceUnit, decimals: usize) -> String {
    format!("{:.*} {}²", decimals, unit.area_from_km2(km2), unit.symbol())
}

/// Parse a typed distance into kilometres
///
/// Accepts a bare number (interpreted in `default_unit`) or a number with a
/// unit suffix such as `"12.5 nmi"` or `"3mi"`.
pub fn parse_distance(input: &str, default_unit: DistanceUnit) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Distance is empty".to_string());
    }

    let split = input
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(input.len());
    let (number, suffix) = input.split_at(split);

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| format!("Invalid distance: {}", input))?;
    if !value.is_finite() {
        return Err(format!("Invalid distance: {}", input));
    }

    let unit = if suffix.trim().is_empty() {
        default_unit
    } else {
        suffix.parse()?
    };

    Ok(unit.to_km(value))
}
