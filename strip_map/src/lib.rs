//! # strip_map
//!
//! Value types and the pure mapping engine behind a keyboard-driven LED strip:
//! every key pressed on a MIDI keyboard lights one LED (or a group of LEDs)
//! in the colour of the hand that played it, and releasing the key turns the
//! LED off again.
//!
//! * [`note`] — MIDI note numbers ⇄ note names (`C4`, `F#2`, …)
//! * [`color`] — the named LED palette and strip colour orderings
//! * [`geometry`] — the linear note → LED index relationship
//! * [`mapping`] — `(note, hand, kind)` → [`LedCommand`]
//!
//! No I/O happens here; devices and configuration files live in the sibling
//! crates `strip_config` and `midi_strip`.
//!
//! ## Quick start
//!
//! ```rust
//! use strip_map::{
//!     Color, Hand, HandColors, KeyMapper, KeyboardGeometry, LedOrder, NoteEvent,
//! };
//!
//! let geometry = KeyboardGeometry::new(36, 96, 1.0, LedOrder::Direct).unwrap();
//! let mapper   = KeyMapper::new(geometry, HandColors::new(Color::Blue, Color::Green));
//!
//! let cmd = mapper.map(&NoteEvent::pressed(37, Hand::Right)).unwrap();
//! assert_eq!(cmd.index, 1);
//! assert_eq!(cmd.color, Some(Color::Blue));
//!
//! let cmd = mapper.map(&NoteEvent::released(37, Hand::Right)).unwrap();
//! assert_eq!(cmd.color, None);
//! ```

pub mod color;
pub mod geometry;
pub mod mapping;
pub mod note;

pub use color::{Color, ColorError, StripType, StripTypeError};
pub use geometry::{GeometryError, KeyboardGeometry, LedOrder, OrderError};
pub use mapping::{EventKind, Hand, HandColors, KeyMapper, LedCommand, NoteEvent};
pub use note::{midi_to_note, note_to_midi, NoteNameError};
