//! LED palette and strip colour orderings.
//!
//! The palette is intentionally dim (channel values of `0x10`/`0x20`): these
//! LEDs sit a few centimetres from the player's eyes, and a full-intensity
//! strip is both blinding and a heavy load on a small power supply.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Color
// ════════════════════════════════════════════════════════════════════════════

/// A named LED colour.
///
/// [`Color::rgb`] gives the packed `0x00RRGGBB` value written to the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    LightBlue,
    Blue,
    Purple,
    Pink,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown color '{name}' (available: {})", Color::names())]
pub struct ColorError {
    pub name: String,
}

impl Color {
    pub const ALL: [Color; 8] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::LightBlue,
        Color::Blue,
        Color::Purple,
        Color::Pink,
    ];

    /// Packed `0x00RRGGBB` value.
    pub fn rgb(self) -> u32 {
        match self {
            Color::Red       => 0x0020_0000,
            Color::Orange    => 0x0020_1000,
            Color::Yellow    => 0x0020_2000,
            Color::Green     => 0x0000_2000,
            Color::LightBlue => 0x0000_2020,
            Color::Blue      => 0x0000_0020,
            Color::Purple    => 0x0010_0010,
            Color::Pink      => 0x0020_0010,
        }
    }

    /// `(r, g, b)` components.
    pub fn components(self) -> (u8, u8, u8) {
        let v = self.rgb();
        ((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Red       => "RED",
            Color::Orange    => "ORANGE",
            Color::Yellow    => "YELLOW",
            Color::Green     => "GREEN",
            Color::LightBlue => "LIGHTBLUE",
            Color::Blue      => "BLUE",
            Color::Purple    => "PURPLE",
            Color::Pink      => "PINK",
        }
    }

    /// Space-separated list of every colour name, for error messages.
    pub fn names() -> String {
        Self::ALL.iter().map(|c| c.name()).collect::<Vec<_>>().join(" ")
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ColorError { name: s.to_string() })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// StripType — byte order the strip's controller expects
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StripType {
    Rgb,
    Rbg,
    Grb,
    Gbr,
    Brg,
    Bgr,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strip type '{name}' (available: {})", StripType::names())]
pub struct StripTypeError {
    pub name: String,
}

impl StripType {
    pub const ALL: [StripType; 6] = [
        StripType::Rgb,
        StripType::Rbg,
        StripType::Grb,
        StripType::Gbr,
        StripType::Brg,
        StripType::Bgr,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StripType::Rgb => "RGB",
            StripType::Rbg => "RBG",
            StripType::Grb => "GRB",
            StripType::Gbr => "GBR",
            StripType::Brg => "BRG",
            StripType::Bgr => "BGR",
        }
    }

    pub fn names() -> String {
        Self::ALL.iter().map(|t| t.name()).collect::<Vec<_>>().join(" ")
    }
}

impl FromStr for StripType {
    type Err = StripTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| StripTypeError { name: s.to_string() })
    }
}

impl fmt::Display for StripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("lightblue".parse::<Color>(), Ok(Color::LightBlue));
        assert_eq!("Red".parse::<Color>(), Ok(Color::Red));
        assert_eq!(" PINK ".parse::<Color>(), Ok(Color::Pink));
    }

    #[test]
    fn every_name_parses_back() {
        for c in Color::ALL {
            assert_eq!(c.name().parse::<Color>(), Ok(c));
        }
        for t in StripType::ALL {
            assert_eq!(t.name().parse::<StripType>(), Ok(t));
        }
    }

    #[test]
    fn unknown_color_lists_palette() {
        let err = "magenta".parse::<Color>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("magenta"));
        assert!(msg.contains("RED ORANGE YELLOW GREEN LIGHTBLUE BLUE PURPLE PINK"));
    }

    #[test]
    fn palette_values() {
        assert_eq!(Color::Red.rgb(), 0x200000);
        assert_eq!(Color::Orange.components(), (0x20, 0x10, 0x00));
        assert_eq!(Color::LightBlue.components(), (0x00, 0x20, 0x20));
    }

    #[test]
    fn unknown_strip_type_lists_orders() {
        let msg = "RGBW".parse::<StripType>().unwrap_err().to_string();
        assert!(msg.contains("RGB RBG GRB GBR BRG BGR"));
    }
}
