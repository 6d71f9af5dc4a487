//! Physical dimensions
//!
//! Units convert freely within one dimension. Volume and mass are the only
//! pair that may be bridged, and only through a density.

use std::fmt;
use serde::{Deserialize, Serialize};

/// Category a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Length,
    Volume,
    Mass,
    Temperature,
    Area,
    Speed,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Length,
        Dimension::Volume,
        Dimension::Mass,
        Dimension::Temperature,
        Dimension::Area,
        Dimension::Speed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Length => "length",
            Dimension::Volume => "volume",
            Dimension::Mass => "mass",
            Dimension::Temperature => "temperature",
            Dimension::Area => "area",
            Dimension::Speed => "speed",
        }
    }

    /// Canonical symbol every unit of this dimension converts through
    pub fn base_symbol(&self) -> &'static str {
        match self {
            Dimension::Length => "m",
            Dimension::Volume => "L",
            Dimension::Mass => "kg",
            Dimension::Temperature => "C",
            Dimension::Area => "m2",
            Dimension::Speed => "m/s",
        }
    }

    /// Temperature scales are offset from each other, so a ratio is meaningless
    pub fn is_affine(&self) -> bool {
        matches!(self, Dimension::Temperature)
    }

    /// True for the volume/mass pair that a density can bridge
    pub fn is_density_bridge(&self, other: &Dimension) -> bool {
        matches!(
            (self, other),
            (Dimension::Volume, Dimension::Mass) | (Dimension::Mass, Dimension::Volume)
        )
    }

    pub fn parse(name: &str) -> Option<Dimension> {
        let name = name.trim().to_lowercase();
        Dimension::ALL.iter().copied().find(|d| d.name() == name)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_bridge() {
        assert!(Dimension::Volume.is_density_bridge(&Dimension::Mass));
        assert!(Dimension::Mass.is_density_bridge(&Dimension::Volume));
        assert!(!Dimension::Volume.is_density_bridge(&Dimension::Volume));
        assert!(!Dimension::Length.is_density_bridge(&Dimension::Mass));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Dimension::parse(" Volume "), Some(Dimension::Volume));
        assert_eq!(Dimension::parse("time"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Dimension::Temperature), "temperature");
        assert!(Dimension::Temperature.is_affine());
        assert!(!Dimension::Speed.is_affine());
    }
}
