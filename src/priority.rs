//! Priority levels, shared by calendar tasks and board tasks

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use csscolorparser::Color;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// The color this priority is displayed with
    pub fn color(&self) -> Color {
        match self {
            Priority::Low => Color::from_rgb_u8(0x10, 0xB9, 0x81),
            Priority::Medium => Color::from_rgb_u8(0xF5, 0x9E, 0x0B),
            Priority::High => Color::from_rgb_u8(0xEF, 0x44, 0x44),
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown priority {:?}", s).into())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_match_the_palette() {
        assert_eq!(Priority::Low.color().to_hex_string(), "#10b981");
        assert_eq!(Priority::Medium.color().to_hex_string(), "#f59e0b");
        assert_eq!(Priority::High.color().to_hex_string(), "#ef4444");
    }

    #[test]
    fn parse_priority() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }
}
