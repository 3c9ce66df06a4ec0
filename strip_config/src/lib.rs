//! # strip_config
//!
//! Reads the strip's configuration file and turns it into [`StripSettings`].
//!
//! The file is a list of `KEY = VALUE` lines.  `#` starts a comment, either
//! on its own line or after a value:
//!
//! ```text
//! # Raspberry Pi, 61-key keyboard, 1 LED per key
//! FREQUENCY         = 800000
//! GPIO_PIN          = 18
//! DMA_CHANNEL       = 10
//! LED_COUNT         = 61
//! LED_TYPE          = GRB
//! LED_ORDER         = DIR      # LED 0 under the lowest key
//! LED_PER_KEY       = 1.0
//! COLOR_RIGHT_HAND  = blue
//! COLOR_LEFT_HAND   = green
//! KEYBOARD_MIN_NOTE = C2
//! KEYBOARD_MAX_NOTE = C7
//! ```
//!
//! Reading ([`KeyValueFile`]) never fails on content, only on I/O; all of the
//! rules about which keys must exist and what they may hold live in
//! [`StripSettings::from_file`].

pub mod error;
pub mod keyvalue;
pub mod settings;

pub use error::ConfigError;
pub use keyvalue::KeyValueFile;
pub use settings::{keys, StripSettings};
