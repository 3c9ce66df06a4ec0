//! Validated strip settings.

use std::path::Path;

use strip_map::{
    note_to_midi, Color, HandColors, KeyMapper, KeyboardGeometry, LedOrder, StripType,
};

use crate::error::ConfigError;
use crate::keyvalue::KeyValueFile;

/// Configuration key names.
pub mod keys {
    pub const FREQUENCY:         &str = "FREQUENCY";
    pub const GPIO_PIN:          &str = "GPIO_PIN";
    pub const DMA_CHANNEL:       &str = "DMA_CHANNEL";
    pub const LED_COUNT:         &str = "LED_COUNT";
    pub const LED_ORDER:         &str = "LED_ORDER";
    pub const LED_TYPE:          &str = "LED_TYPE";
    pub const LED_PER_KEY:       &str = "LED_PER_KEY";
    pub const COLOR_RIGHT_HAND:  &str = "COLOR_RIGHT_HAND";
    pub const COLOR_LEFT_HAND:   &str = "COLOR_LEFT_HAND";
    pub const KEYBOARD_MIN_NOTE: &str = "KEYBOARD_MIN_NOTE";
    pub const KEYBOARD_MAX_NOTE: &str = "KEYBOARD_MAX_NOTE";
    pub const BRIGHTNESS:        &str = "BRIGHTNESS";
}

/// Everything the bridge needs to know, checked and typed.
#[derive(Debug, Clone, PartialEq)]
pub struct StripSettings {
    /// Strip signal frequency in Hz (800 kHz for WS2812).
    pub frequency:   u32,
    pub gpio_pin:    u16,
    pub dma_channel: u16,
    pub led_count:   u16,
    pub strip_type:  StripType,
    /// Global strip brightness, 0–255.  Optional, defaults to 255.
    pub brightness:  u8,
    pub geometry:    KeyboardGeometry,
    pub hand_colors: HandColors,
}

impl StripSettings {
    /// Read `path` and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_file(&KeyValueFile::load(path)?)
    }

    pub fn from_file(file: &KeyValueFile) -> Result<Self, ConfigError> {
        let frequency   = positive::<u32>(file, keys::FREQUENCY)?;
        let gpio_pin    = positive::<u16>(file, keys::GPIO_PIN)?;
        let dma_channel = positive::<u16>(file, keys::DMA_CHANNEL)?;
        let led_count   = positive::<u16>(file, keys::LED_COUNT)?;

        let leds_per_key = parse_f64(file, keys::LED_PER_KEY)?;
        if !(leds_per_key.is_finite() && leds_per_key > 0.0) {
            return Err(ConfigError::NotPositive {
                key:   keys::LED_PER_KEY,
                value: leds_per_key.to_string(),
            });
        }

        let min_note = note(file, keys::KEYBOARD_MIN_NOTE)?;
        let max_note = note(file, keys::KEYBOARD_MAX_NOTE)?;

        let order = file
            .require(keys::LED_ORDER)?
            .parse::<LedOrder>()
            .map_err(|source| ConfigError::Order { key: keys::LED_ORDER, source })?;
        let strip_type = file
            .require(keys::LED_TYPE)?
            .parse::<StripType>()
            .map_err(|source| ConfigError::StripType { key: keys::LED_TYPE, source })?;

        let right = color(file, keys::COLOR_RIGHT_HAND)?;
        let left  = color(file, keys::COLOR_LEFT_HAND)?;

        let brightness = match file.get(keys::BRIGHTNESS).filter(|v| !v.is_empty()) {
            None    => u8::MAX,
            Some(v) => v.parse::<u8>().map_err(|_| ConfigError::InvalidValue {
                key:      keys::BRIGHTNESS,
                value:    v.to_string(),
                expected: "brightness (0-255)",
            })?,
        };

        let geometry = KeyboardGeometry::new(min_note, max_note, leds_per_key, order)?;

        Ok(StripSettings {
            frequency,
            gpio_pin,
            dma_channel,
            led_count,
            strip_type,
            brightness,
            geometry,
            hand_colors: HandColors::new(right, left),
        })
    }

    /// The mapping engine these settings describe.
    pub fn mapper(&self) -> KeyMapper {
        KeyMapper::new(self.geometry, self.hand_colors)
    }

    /// True when some key on the keyboard would light an LED past the strip's end.
    pub fn strip_shorter_than_keyboard(&self) -> bool {
        self.geometry.span() >= i32::from(self.led_count)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field parsers
// ────────────────────────────────────────────────────────────────────────────

fn positive<T: TryFrom<i64>>(file: &KeyValueFile, key: &'static str) -> Result<T, ConfigError> {
    let raw = file.require(key)?;
    let n: i64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value:    raw.to_string(),
        expected: "integer",
    })?;
    if n <= 0 {
        return Err(ConfigError::NotPositive { key, value: raw.to_string() });
    }
    T::try_from(n).map_err(|_| ConfigError::InvalidValue {
        key,
        value:    raw.to_string(),
        expected: "value in range",
    })
}

fn parse_f64(file: &KeyValueFile, key: &'static str) -> Result<f64, ConfigError> {
    let raw = file.require(key)?;
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value:    raw.to_string(),
        expected: "number",
    })
}

fn note(file: &KeyValueFile, key: &'static str) -> Result<u8, ConfigError> {
    note_to_midi(file.require(key)?).map_err(|source| ConfigError::Note { key, source })
}

fn color(file: &KeyValueFile, key: &'static str) -> Result<Color, ConfigError> {
    file.require(key)?
        .parse::<Color>()
        .map_err(|source| ConfigError::Color { key, source })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use strip_map::GeometryError;

    const SAMPLE: &str = "\
# 61-key keyboard
FREQUENCY         = 800000
GPIO_PIN          = 18
DMA_CHANNEL       = 10
LED_COUNT         = 61
LED_TYPE          = grb
LED_ORDER         = DIR
LED_PER_KEY       = 1.0
COLOR_RIGHT_HAND  = blue
COLOR_LEFT_HAND   = green   # left hand
KEYBOARD_MIN_NOTE = C2
KEYBOARD_MAX_NOTE = C7
";

    fn with(key: &str, value: &str) -> KeyValueFile {
        KeyValueFile::parse(&format!("{SAMPLE}\n{key} = {value}\n"))
    }

    fn without(key: &str) -> KeyValueFile {
        let text: String = SAMPLE
            .lines()
            .filter(|l| !l.starts_with(key))
            .map(|l| format!("{l}\n"))
            .collect();
        KeyValueFile::parse(&text)
    }

    #[test]
    fn sample_parses() {
        let s = StripSettings::from_file(&KeyValueFile::parse(SAMPLE)).unwrap();
        assert_eq!(s.frequency, 800_000);
        assert_eq!(s.gpio_pin, 18);
        assert_eq!(s.dma_channel, 10);
        assert_eq!(s.led_count, 61);
        assert_eq!(s.strip_type, StripType::Grb);
        assert_eq!(s.brightness, 255);
        assert_eq!(s.geometry.min_note(), 36);
        assert_eq!(s.geometry.max_note(), 96);
        assert_eq!(s.geometry.order(), LedOrder::Direct);
        assert_eq!(s.hand_colors, HandColors::new(Color::Blue, Color::Green));
        assert!(!s.strip_shorter_than_keyboard());
    }

    #[test]
    fn mapper_follows_settings() {
        let s = StripSettings::from_file(&with(keys::LED_ORDER, "INV")).unwrap();
        let m = s.mapper();
        assert_eq!(m.geometry().index_for(96), 0);
        assert_eq!(m.geometry().index_for(36), 60);
    }

    #[test]
    fn every_required_key_is_required() {
        for key in [
            keys::FREQUENCY, keys::GPIO_PIN, keys::DMA_CHANNEL, keys::LED_COUNT,
            keys::LED_ORDER, keys::LED_TYPE, keys::LED_PER_KEY, keys::COLOR_RIGHT_HAND,
            keys::COLOR_LEFT_HAND, keys::KEYBOARD_MIN_NOTE, keys::KEYBOARD_MAX_NOTE,
        ] {
            match StripSettings::from_file(&without(key)) {
                Err(ConfigError::MissingKey(k)) => assert_eq!(k, key),
                other => panic!("{key}: expected MissingKey, got {other:?}"),
            }
        }
    }

    #[test]
    fn zero_and_negative_counts_rejected() {
        assert!(matches!(
            StripSettings::from_file(&with(keys::LED_COUNT, "0")),
            Err(ConfigError::NotPositive { key: "LED_COUNT", .. })
        ));
        assert!(matches!(
            StripSettings::from_file(&with(keys::GPIO_PIN, "-4")),
            Err(ConfigError::NotPositive { key: "GPIO_PIN", .. })
        ));
    }

    #[test]
    fn non_numeric_and_overflowing_values_rejected() {
        assert!(matches!(
            StripSettings::from_file(&with(keys::FREQUENCY, "fast")),
            Err(ConfigError::InvalidValue { key: "FREQUENCY", .. })
        ));
        assert!(matches!(
            StripSettings::from_file(&with(keys::LED_COUNT, "70000")),
            Err(ConfigError::InvalidValue { key: "LED_COUNT", .. })
        ));
    }

    #[test]
    fn leds_per_key_must_be_positive() {
        assert!(matches!(
            StripSettings::from_file(&with(keys::LED_PER_KEY, "0")),
            Err(ConfigError::NotPositive { key: "LED_PER_KEY", .. })
        ));
        assert!(matches!(
            StripSettings::from_file(&with(keys::LED_PER_KEY, "one")),
            Err(ConfigError::InvalidValue { key: "LED_PER_KEY", .. })
        ));
    }

    #[test]
    fn bad_names_report_alternatives() {
        let err = StripSettings::from_file(&with(keys::COLOR_LEFT_HAND, "teal")).unwrap_err();
        assert!(err.to_string().contains("PURPLE"), "{err}");

        let err = StripSettings::from_file(&with(keys::LED_TYPE, "RGBW")).unwrap_err();
        assert!(err.to_string().contains("BGR"), "{err}");

        let err = StripSettings::from_file(&with(keys::LED_ORDER, "LTR")).unwrap_err();
        assert!(err.to_string().contains("DIR INV"), "{err}");
    }

    #[test]
    fn bad_note_names_rejected() {
        assert!(matches!(
            StripSettings::from_file(&with(keys::KEYBOARD_MIN_NOTE, "H2")),
            Err(ConfigError::Note { key: "KEYBOARD_MIN_NOTE", .. })
        ));
    }

    #[test]
    fn reversed_keyboard_is_a_geometry_error() {
        assert!(matches!(
            StripSettings::from_file(&with(keys::KEYBOARD_MIN_NOTE, "C8")),
            Err(ConfigError::Geometry(GeometryError::EmptyRange { min: 108, max: 96 }))
        ));
    }

    #[test]
    fn optional_brightness() {
        let s = StripSettings::from_file(&with(keys::BRIGHTNESS, "64")).unwrap();
        assert_eq!(s.brightness, 64);
        assert!(matches!(
            StripSettings::from_file(&with(keys::BRIGHTNESS, "300")),
            Err(ConfigError::InvalidValue { key: "BRIGHTNESS", .. })
        ));
    }

    #[test]
    fn short_strip_is_detected() {
        let s = StripSettings::from_file(&with(keys::LED_PER_KEY, "2")).unwrap();
        assert!(s.strip_shorter_than_keyboard());
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strip.conf");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(StripSettings::load(&path).unwrap().led_count, 61);
    }
}
