//! Scroll direction and flag values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Direction the user is scrolling in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Content moving up, scroll offset growing.
    #[default]
    Down,
    /// Scroll offset shrinking.
    Up,
}

impl Direction {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
        }
    }

    /// Pick the position furthest along this direction.
    ///
    /// `Down` keeps the high-water mark, `Up` the low-water mark.
    pub fn furthest(self, a: f64, b: f64) -> f64 {
        match self {
            Direction::Down => a.max(b),
            Direction::Up => a.min(b),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::Up => "up",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown direction name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scroll direction {0:?}, expected \"down\" or \"up\"")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "down" => Ok(Direction::Down),
            "up" => Ok(Direction::Up),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Value written to the external flag attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagValue {
    Down,
    Up,
    Off,
}

impl FlagValue {
    pub fn as_str(self) -> &'static str {
        match self {
            FlagValue::Down => "down",
            FlagValue::Up => "up",
            FlagValue::Off => "off",
        }
    }
}

impl From<Direction> for FlagValue {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Down => FlagValue::Down,
            Direction::Up => FlagValue::Up,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_furthest_tracks_water_marks() {
        assert_eq!(Direction::Down.furthest(100.0, 140.0), 140.0);
        assert_eq!(Direction::Up.furthest(100.0, 140.0), 100.0);
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!("down".parse::<Direction>(), Ok(Direction::Down));
        assert_eq!(" UP ".parse::<Direction>(), Ok(Direction::Up));
        assert!("left".parse::<Direction>().is_err());
    }

    #[test]
    fn test_flag_strings() {
        assert_eq!(FlagValue::from(Direction::Up).to_string(), "up");
        assert_eq!(FlagValue::Off.as_str(), "off");
        assert_eq!(Direction::Down.reversed(), Direction::Up);
    }

    #[test]
    fn test_direction_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Up).unwrap(), "\"up\"");
        let parsed: Direction = serde_json::from_str("\"down\"").unwrap();
        assert_eq!(parsed, Direction::Down);
    }
}
