//! # midi_strip
//!
//! Lights the LED under every key you play on a MIDI keyboard, in the colour
//! of the hand that played it, and switches it off again on release.
//!
//! ## Pipeline
//!
//! ```text
//!  EventSource ──poll──▶ KeyMapper ──LedCommand──▶ LedOutput ──commit──▶ strip
//!       ▲                                                      │
//!       └───────────── sleep 10 ms, check RunFlag ◀────────────┘
//! ```
//!
//! | Stage | Module |
//! |---|---|
//! | MIDI / simulated key events | [`source`] |
//! | note → LED command | `strip_map::KeyMapper` |
//! | LED buffers with explicit commit | [`output`], [`window`], `ws281x` |
//! | polling loop and shutdown | [`control`], [`run_flag`] |
//! | startup and error-to-exit-code dispatch | [`app`], [`error`] |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the strip is drawn in a window and the
//!   computer keyboard plays notes.
//! * `midi` — read key events from a real MIDI input port (midir).
//! * `ws281x` — drive a real WS281x strip (Raspberry Pi).
//!
//! ### Simulation keyboard
//!
//! | Keys | Hand | Notes |
//! |---|---|---|
//! | `Z S X D C V G B H N J M` | Left | one octave below the keyboard's middle |
//! | `Q 2 W 3 E R 5 T 6 Y 7 U` | Right | one octave from the keyboard's middle |

pub mod app;
pub mod control;
pub mod error;
pub mod output;
pub mod run_flag;
pub mod source;
pub mod window;
#[cfg(feature = "ws281x")]
pub mod ws281x;

pub use control::{ControlLoop, LoopStats, Step};
pub use error::{AppError, DeviceError};
pub use output::{LedOutput, MemoryOutput};
pub use run_flag::RunFlag;
pub use source::{ChannelSource, EventSource};
