//! Keyboard geometry: where each key's LED sits on the strip.
//!
//! The strip is laid along the keyboard, so the LED index is a linear
//! function of the note number.  `leds_per_key` is the slope (a strip with
//! 144 LEDs/m under keys ~23 mm wide gives roughly 3.3), and the order says
//! which end of the keyboard the strip's first LED sits under.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// LedOrder
// ════════════════════════════════════════════════════════════════════════════

/// Direction of the strip relative to the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedOrder {
    /// LED 0 under the lowest key; index grows with pitch.
    Direct,
    /// LED 0 under the highest key; index shrinks with pitch.
    Inverted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown LED order '{name}' (available: DIR INV)")]
pub struct OrderError {
    pub name: String,
}

impl LedOrder {
    pub fn name(self) -> &'static str {
        match self {
            LedOrder::Direct   => "DIR",
            LedOrder::Inverted => "INV",
        }
    }
}

impl FromStr for LedOrder {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DIR" => Ok(LedOrder::Direct),
            "INV" => Ok(LedOrder::Inverted),
            _     => Err(OrderError { name: s.to_string() }),
        }
    }
}

impl fmt::Display for LedOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// KeyboardGeometry
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("keyboard min note ({min}) must be below max note ({max})")]
    EmptyRange { min: u8, max: u8 },
    #[error("LEDs per key must be a positive number, got {0}")]
    BadLedsPerKey(f64),
}

/// Linear note → LED index relationship, validated once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardGeometry {
    min_note:     u8,
    max_note:     u8,
    leds_per_key: f64,
    order:        LedOrder,
}

impl KeyboardGeometry {
    pub fn new(
        min_note:     u8,
        max_note:     u8,
        leds_per_key: f64,
        order:        LedOrder,
    ) -> Result<Self, GeometryError> {
        if min_note >= max_note {
            return Err(GeometryError::EmptyRange { min: min_note, max: max_note });
        }
        if !(leds_per_key.is_finite() && leds_per_key > 0.0) {
            return Err(GeometryError::BadLedsPerKey(leds_per_key));
        }
        Ok(KeyboardGeometry { min_note, max_note, leds_per_key, order })
    }

    pub fn min_note(&self)     -> u8       { self.min_note }
    pub fn max_note(&self)     -> u8       { self.max_note }
    pub fn leds_per_key(&self) -> f64      { self.leds_per_key }
    pub fn order(&self)        -> LedOrder { self.order }

    /// LED index for `note`.
    ///
    /// Notes outside `[min_note, max_note]` are not clamped: they produce
    /// negative indices or indices past the keyboard's far end, and it is up
    /// to the caller to decide what to do with them.
    ///
    /// ```rust
    /// use strip_map::{KeyboardGeometry, LedOrder};
    /// let g = KeyboardGeometry::new(36, 96, 0.5, LedOrder::Direct).unwrap();
    /// assert_eq!(g.index_for(38), 1);
    /// ```
    pub fn index_for(&self, note: u8) -> i32 {
        let offset = match self.order {
            LedOrder::Direct   => i32::from(note) - i32::from(self.min_note),
            LedOrder::Inverted => i32::from(self.max_note) - i32::from(note),
        };
        // f64::round rounds half away from zero
        (f64::from(offset) * self.leds_per_key).round() as i32
    }

    /// Whether `note` lies on the configured keyboard.
    pub fn contains(&self, note: u8) -> bool {
        (self.min_note..=self.max_note).contains(&note)
    }

    /// Number of keys on the keyboard, both ends included.
    pub fn key_count(&self) -> u16 {
        u16::from(self.max_note - self.min_note) + 1
    }

    /// Index of the LED under the key at the far end from LED 0.
    pub fn span(&self) -> i32 {
        match self.order {
            LedOrder::Direct   => self.index_for(self.max_note),
            LedOrder::Inverted => self.index_for(self.min_note),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(lpk: f64, order: LedOrder) -> KeyboardGeometry {
        KeyboardGeometry::new(36, 96, lpk, order).unwrap()
    }

    #[test]
    fn direct_one_led_per_key() {
        let g = geom(1.0, LedOrder::Direct);
        assert_eq!(g.index_for(36), 0);
        assert_eq!(g.index_for(37), 1);
        assert_eq!(g.index_for(96), 60);
    }

    #[test]
    fn inverted_one_led_per_key() {
        let g = geom(1.0, LedOrder::Inverted);
        assert_eq!(g.index_for(96), 0);
        assert_eq!(g.index_for(36), 60);
    }

    #[test]
    fn half_led_per_key_rounds() {
        let g = geom(0.5, LedOrder::Direct);
        assert_eq!(g.index_for(38), 1);
        // 1 * 0.5 = 0.5 rounds away from zero
        assert_eq!(g.index_for(37), 1);
        assert_eq!(g.index_for(39), 2);
    }

    #[test]
    fn fractional_slope_rounds_to_nearest() {
        let g = geom(3.3, LedOrder::Direct);
        assert_eq!(g.index_for(37), 3); // 3.3
        assert_eq!(g.index_for(38), 7); // 6.6
        assert_eq!(g.index_for(41), 17); // 16.5
    }

    #[test]
    fn origin_is_zero_for_both_orders() {
        for lpk in [0.25, 0.5, 1.0, 1.7, 3.3] {
            assert_eq!(geom(lpk, LedOrder::Direct).index_for(36), 0);
            assert_eq!(geom(lpk, LedOrder::Inverted).index_for(96), 0);
        }
    }

    #[test]
    fn direct_is_monotone_non_decreasing() {
        for lpk in [0.1, 0.5, 1.0, 2.5] {
            let g = geom(lpk, LedOrder::Direct);
            for n in 36..96u8 {
                assert!(g.index_for(n) <= g.index_for(n + 1), "lpk={lpk} n={n}");
            }
        }
    }

    #[test]
    fn inverted_is_monotone_non_increasing() {
        for lpk in [0.1, 0.5, 1.0, 2.5] {
            let g = geom(lpk, LedOrder::Inverted);
            for n in 36..96u8 {
                assert!(g.index_for(n) >= g.index_for(n + 1), "lpk={lpk} n={n}");
            }
        }
    }

    #[test]
    fn notes_off_the_keyboard_are_not_clamped() {
        let g = geom(1.0, LedOrder::Direct);
        assert_eq!(g.index_for(30), -6);
        assert_eq!(g.index_for(100), 64);
        let g = geom(1.0, LedOrder::Inverted);
        assert_eq!(g.index_for(100), -4);
        assert!(!g.contains(100));
        assert!(g.contains(36) && g.contains(96));
    }

    #[test]
    fn rejects_empty_or_reversed_range() {
        assert_eq!(
            KeyboardGeometry::new(60, 60, 1.0, LedOrder::Direct),
            Err(GeometryError::EmptyRange { min: 60, max: 60 })
        );
        assert!(KeyboardGeometry::new(61, 60, 1.0, LedOrder::Direct).is_err());
    }

    #[test]
    fn rejects_non_positive_slope() {
        for lpk in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                KeyboardGeometry::new(36, 96, lpk, LedOrder::Direct),
                Err(GeometryError::BadLedsPerKey(_))
            ));
        }
    }

    #[test]
    fn span_and_key_count() {
        let g = geom(2.0, LedOrder::Inverted);
        assert_eq!(g.key_count(), 61);
        assert_eq!(g.span(), 120);
    }

    #[test]
    fn order_names() {
        assert_eq!("dir".parse::<LedOrder>(), Ok(LedOrder::Direct));
        assert_eq!("INV".parse::<LedOrder>(), Ok(LedOrder::Inverted));
        assert!("reverse".parse::<LedOrder>().is_err());
    }
}
