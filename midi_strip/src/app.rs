//! Startup, device wiring and shutdown.
//!
//! `run` loads the settings, opens the LED output before the key input (a
//! strip that cannot start is the more common failure), blanks the strip,
//! then hands both to the [`ControlLoop`] until Ctrl-C or a device error.
//! Devices are dropped on the way out, which leaves the strip dark.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use strip_config::StripSettings;

use crate::control::{ControlLoop, LoopStats, DEFAULT_INTERVAL};
use crate::error::{AppError, DeviceError};
use crate::output::{LedOutput, MemoryOutput};
use crate::run_flag::RunFlag;
use crate::source::{ChannelSource, EventSource, PortChoice};
use crate::window::{SimKeyboard, WindowOutput};

/// Name the bridge registers under with the MIDI system, and the window title.
pub const CLIENT_NAME: &str = "midi_strip";

// ════════════════════════════════════════════════════════════════════════════
// Device choices
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputKind {
    /// A MIDI keyboard.
    Midi,
    /// The computer keyboard, typed into the strip window.
    Keys,
}

impl Default for InputKind {
    fn default() -> Self {
        if cfg!(feature = "midi") { InputKind::Midi } else { InputKind::Keys }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputKind {
    /// No display; lit LEDs only show up in the logs.
    Memory,
    /// The strip drawn in a window.
    Window,
    /// A WS281x strip on the Pi's GPIO.
    Ws281x,
}

impl Default for OutputKind {
    fn default() -> Self {
        if cfg!(feature = "ws281x") { OutputKind::Ws281x } else { OutputKind::Window }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub config_file: PathBuf,
    pub input:       InputKind,
    pub output:      OutputKind,
    pub port:        PortChoice,
    pub interval:    Duration,
}

impl AppConfig {
    pub fn new(config_file: impl Into<PathBuf>) -> Self {
        AppConfig {
            config_file: config_file.into(),
            input:       InputKind::default(),
            output:      OutputKind::default(),
            port:        PortChoice::Auto,
            interval:    DEFAULT_INTERVAL,
        }
    }

    /// Reject device combinations that can never start.
    pub fn validate(&self) -> Result<(), DeviceError> {
        if self.output == OutputKind::Ws281x && !cfg!(feature = "ws281x") {
            return Err(DeviceError::BackendUnavailable { backend: "ws281x", feature: "ws281x" });
        }
        if self.input == InputKind::Keys && self.output != OutputKind::Window {
            return Err(DeviceError::KeyboardNeedsWindow);
        }
        if self.input == InputKind::Midi && !cfg!(feature = "midi") {
            return Err(DeviceError::BackendUnavailable { backend: "midi", feature: "midi" });
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run
// ════════════════════════════════════════════════════════════════════════════

pub fn run(cfg: &AppConfig) -> Result<LoopStats, AppError> {
    let settings = StripSettings::load(&cfg.config_file)?;
    let geometry = settings.geometry;
    tracing::info!(
        file  = %cfg.config_file.display(),
        leds  = settings.led_count,
        keys  = geometry.key_count(),
        order = geometry.order().name(),
        right = %settings.hand_colors.right,
        left  = %settings.hand_colors.left,
        "configuration loaded"
    );
    if settings.strip_shorter_than_keyboard() {
        tracing::warn!(
            leds   = settings.led_count,
            needed = geometry.span() + 1,
            "strip is shorter than the keyboard, the outermost keys will not light"
        );
    }
    cfg.validate()?;

    let flag = RunFlag::new();
    flag.install_interrupt_handler()?;

    let (kb_tx, kb_source) = ChannelSource::pair();
    let len = usize::from(settings.led_count);

    let mut output: Box<dyn LedOutput> = match cfg.output {
        OutputKind::Memory => Box::new(MemoryOutput::new(len)),
        OutputKind::Window => {
            let mut window = WindowOutput::new(len, CLIENT_NAME)?.stop_on_close(flag.clone());
            if cfg.input == InputKind::Keys {
                window = window.with_keyboard(SimKeyboard::centred(
                    kb_tx,
                    geometry.min_note(),
                    geometry.max_note(),
                ));
            }
            Box::new(window)
        }
        OutputKind::Ws281x => open_ws281x(&settings)?,
    };

    let mut source: Box<dyn EventSource> = match cfg.input {
        InputKind::Keys => Box::new(kb_source),
        InputKind::Midi => open_midi(&cfg.port)?,
    };

    output.clear_all();
    output.commit()?;
    tracing::info!(input = ?cfg.input, output = ?cfg.output, "running, Ctrl-C to stop");

    let stats = ControlLoop::new(settings.mapper())
        .with_interval(cfg.interval)
        .run(&mut source, &mut output, &flag)?;

    tracing::info!(
        iterations = stats.iterations,
        applied    = stats.applied,
        dropped    = stats.dropped,
        "stopped"
    );
    Ok(stats)
}

/// Names of the MIDI input ports the `midi` input can connect to.
pub fn list_midi_ports() -> Result<Vec<String>, DeviceError> {
    #[cfg(feature = "midi")]
    {
        crate::source::list_input_ports(CLIENT_NAME)
    }
    #[cfg(not(feature = "midi"))]
    {
        Err(DeviceError::BackendUnavailable { backend: "midi", feature: "midi" })
    }
}

#[cfg(feature = "midi")]
fn open_midi(port: &PortChoice) -> Result<Box<dyn EventSource>, DeviceError> {
    Ok(Box::new(crate::source::MidirSource::open(CLIENT_NAME, port)?))
}

#[cfg(not(feature = "midi"))]
fn open_midi(_port: &PortChoice) -> Result<Box<dyn EventSource>, DeviceError> {
    Err(DeviceError::BackendUnavailable { backend: "midi", feature: "midi" })
}

#[cfg(feature = "ws281x")]
fn open_ws281x(settings: &StripSettings) -> Result<Box<dyn LedOutput>, DeviceError> {
    Ok(Box::new(crate::ws281x::Ws281xOutput::new(settings)?))
}

#[cfg(not(feature = "ws281x"))]
fn open_ws281x(_settings: &StripSettings) -> Result<Box<dyn LedOutput>, DeviceError> {
    Err(DeviceError::BackendUnavailable { backend: "ws281x", feature: "ws281x" })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONF: &str = "\
FREQUENCY = 800000
GPIO_PIN = 18
DMA_CHANNEL = 10
LED_COUNT = 61
LED_ORDER = DIR
LED_TYPE = GRB
LED_PER_KEY = 1
COLOR_RIGHT_HAND = BLUE
COLOR_LEFT_HAND = GREEN
KEYBOARD_MIN_NOTE = C2
KEYBOARD_MAX_NOTE = C7
";

    fn conf_file(text: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(text.as_bytes()).unwrap();
        f
    }

    fn config(path: impl Into<PathBuf>, input: InputKind, output: OutputKind) -> AppConfig {
        AppConfig { input, output, ..AppConfig::new(path) }
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::new("strip.conf");
        assert_eq!(cfg.port, PortChoice::Auto);
        assert_eq!(cfg.interval, Duration::from_millis(10));
        if !cfg!(feature = "ws281x") {
            assert_eq!(cfg.output, OutputKind::Window);
        }
    }

    #[test]
    fn computer_keyboard_needs_the_window() {
        let cfg = config("x", InputKind::Keys, OutputKind::Memory);
        assert!(matches!(cfg.validate(), Err(DeviceError::KeyboardNeedsWindow)));
        let cfg = config("x", InputKind::Keys, OutputKind::Window);
        assert!(cfg.validate().is_ok());
    }

    #[cfg(not(feature = "ws281x"))]
    #[test]
    fn ws281x_output_needs_its_feature() {
        let cfg = config("x", InputKind::Keys, OutputKind::Ws281x);
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, DeviceError::BackendUnavailable { backend: "ws281x", .. }));
        assert_eq!(AppError::from(err).exit_code(), 4);
    }

    #[cfg(not(feature = "midi"))]
    #[test]
    fn midi_input_needs_its_feature() {
        let cfg = config("x", InputKind::Midi, OutputKind::Memory);
        let err = AppError::from(cfg.validate().unwrap_err());
        assert_eq!(err.exit_code(), 3);
        assert!(list_midi_ports().is_err());
    }

    #[test]
    fn missing_config_file_exits_1() {
        let cfg = config("/nonexistent/strip.conf", InputKind::Keys, OutputKind::Window);
        let err = run(&cfg).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn invalid_config_exits_2() {
        let f = conf_file(&CONF.replace("LED_COUNT = 61", "LED_COUNT = zero"));
        let err = run(&config(f.path(), InputKind::Keys, OutputKind::Window)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn bad_device_combination_is_caught_after_config() {
        let f = conf_file(CONF);
        let err = run(&config(f.path(), InputKind::Keys, OutputKind::Memory)).unwrap_err();
        assert!(matches!(err, AppError::Device(DeviceError::KeyboardNeedsWindow)));
        assert_eq!(err.exit_code(), 3);
    }
}
