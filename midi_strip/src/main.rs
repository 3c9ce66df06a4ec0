//! midi_strip — light the LED under every key played.
//!
//! ```text
//! midi_strip -f strip.conf                         # simulation window, type to play
//! midi_strip -f strip.conf --input midi -p Digital # a real keyboard, on screen
//! midi_strip -f strip.conf --output ws281x -v      # a real strip, debug log per key
//! midi_strip --list-ports
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use midi_strip::app::{self, AppConfig, InputKind, OutputKind};
use midi_strip::source::PortChoice;

#[derive(Parser, Debug)]
#[command(name = "midi_strip", version, about = "Light an LED strip from a MIDI keyboard")]
struct Cli {
    /// Strip configuration file (KEY = VALUE lines)
    #[arg(short = 'f', long = "file", value_name = "FILE", required_unless_present = "list_ports")]
    file: Option<PathBuf>,

    /// Where key events come from
    #[arg(long, value_enum, default_value_t = InputKind::default())]
    input: InputKind,

    /// Where the LEDs are shown
    #[arg(long, value_enum, default_value_t = OutputKind::default())]
    output: OutputKind,

    /// Connect to the first MIDI input whose name contains NAME
    #[arg(short, long, value_name = "NAME")]
    port: Option<String>,

    /// Create a virtual MIDI input for the keyboard to connect to
    #[arg(
        long,
        value_name = "NAME",
        num_args = 0..=1,
        default_missing_value = app::CLIENT_NAME,
        conflicts_with = "port",
    )]
    virtual_port: Option<String>,

    /// Pause between polls, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 10)]
    interval_ms: u64,

    /// Print the MIDI input ports and exit
    #[arg(long)]
    list_ports: bool,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list_ports {
        match app::list_midi_ports() {
            Ok(ports) if ports.is_empty() => println!("no MIDI input ports"),
            Ok(ports) => {
                for (i, name) in ports.iter().enumerate() {
                    println!("{i:>3}  {name}");
                }
            }
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(3);
            }
        }
        return;
    }

    let Some(file) = cli.file else {
        eprintln!("Error: --file is required");
        std::process::exit(2);
    };

    let port = match (cli.virtual_port, cli.port) {
        (Some(name), _) => PortChoice::Virtual(name),
        (None, Some(name)) => PortChoice::Named(name),
        (None, None) => PortChoice::Auto,
    };

    let cfg = AppConfig {
        config_file: file,
        input:       cli.input,
        output:      cli.output,
        port,
        interval:    Duration::from_millis(cli.interval_ms),
    };

    if cfg.input == InputKind::Keys {
        tracing::info!("simulation mode: play with Z..M (left hand) and Q..U (right hand)");
    }

    if let Err(e) = app::run(&cfg) {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(fmt::layer().with_target(false))
        .init();
}
