//! Device errors and the top-level error → exit code dispatch.

use strip_config::ConfigError;
use thiserror::Error;

/// Failures of the two devices: the key event source and the LED output.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("cannot open the MIDI system: {0}")]
    MidiInit(String),
    #[error("no MIDI input ports found (is the keyboard plugged in?)")]
    NoMidiPorts,
    #[error("no MIDI input port matching '{0}'")]
    MidiPortNotFound(String),
    #[error("cannot connect to MIDI port: {0}")]
    MidiConnect(String),
    #[error("the computer-keyboard input needs the window output")]
    KeyboardNeedsWindow,
    #[error("cannot initialise the LED strip: {0}")]
    LedInit(String),
    #[error("cannot render the LED strip: {0}")]
    LedRender(String),
    #[error("strip window error: {0}")]
    Window(String),
    #[error("the {backend} backend is not compiled in (rebuild with --features {feature})")]
    BackendUnavailable {
        backend: &'static str,
        feature: &'static str,
    },
}

impl DeviceError {
    /// True for errors on the input side (MIDI or simulated keyboard).
    pub fn is_input(&self) -> bool {
        match self {
            DeviceError::MidiInit(_)
            | DeviceError::NoMidiPorts
            | DeviceError::MidiPortNotFound(_)
            | DeviceError::MidiConnect(_)
            | DeviceError::KeyboardNeedsWindow => true,
            DeviceError::BackendUnavailable { backend, .. } => *backend == "midi",
            DeviceError::LedInit(_) | DeviceError::LedRender(_) | DeviceError::Window(_) => false,
        }
    }
}

/// Anything that stops the bridge from starting or keeps it from running.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("cannot install the interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

impl AppError {
    /// Process exit status for this error.
    ///
    /// | Code | Meaning |
    /// |---|---|
    /// | 1 | configuration file unreadable |
    /// | 2 | configuration file invalid |
    /// | 3 | MIDI / key input device |
    /// | 4 | LED output device |
    /// | 5 | interrupt handler |
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(e) if e.is_open_file() => 1,
            AppError::Config(_)                     => 2,
            AppError::Device(e) if e.is_input()     => 3,
            AppError::Device(_)                     => 4,
            AppError::Signal(_)                     => 5,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
