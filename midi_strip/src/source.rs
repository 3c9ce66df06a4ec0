//! Key event sources.
//!
//! The control loop polls an [`EventSource`] once per iteration and must never
//! block, so every source here buffers events on a channel and `poll` is a
//! `try_recv`.  When nothing is pending the source hands back
//! [`NoteEvent::ignorable`].

use std::sync::mpsc::{self, Receiver, Sender};

use strip_map::{Hand, NoteEvent};

// ════════════════════════════════════════════════════════════════════════════
// EventSource
// ════════════════════════════════════════════════════════════════════════════

pub trait EventSource {
    /// Next pending key event, or an ignorable one.  Never blocks.
    fn poll(&mut self) -> NoteEvent;
}

impl<T: EventSource + ?Sized> EventSource for Box<T> {
    fn poll(&mut self) -> NoteEvent {
        (**self).poll()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ChannelSource — events pushed from another thread or component
// ════════════════════════════════════════════════════════════════════════════

/// Events fed through an `mpsc` channel: the simulated keyboard in the strip
/// window, scripted input, tests.
pub struct ChannelSource {
    rx: Receiver<NoteEvent>,
}

impl ChannelSource {
    pub fn new(rx: Receiver<NoteEvent>) -> Self {
        ChannelSource { rx }
    }

    /// A source together with the sender that feeds it.
    pub fn pair() -> (Sender<NoteEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, ChannelSource { rx })
    }
}

impl EventSource for ChannelSource {
    fn poll(&mut self) -> NoteEvent {
        // A hung-up sender just means no more events.
        self.rx.try_recv().unwrap_or_else(|_| NoteEvent::ignorable())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MIDI decoding
// ════════════════════════════════════════════════════════════════════════════

const NOTE_OFF: u8 = 0x80;
const NOTE_ON:  u8 = 0x90;

/// Decode a raw MIDI message into a key event.
///
/// * `9n kk vv` with `vv > 0` → pressed
/// * `8n kk vv`, or `9n kk 00` → released
/// * channel `n == 0` → right hand, any other channel → left hand
///
/// Anything else (controllers, clock, sysex, running status) yields `None`.
pub fn decode_message(message: &[u8]) -> Option<NoteEvent> {
    let (&status, data) = message.split_first()?;
    let &[note, velocity, ..] = data else { return None };
    if note > 0x7F {
        return None;
    }
    let hand = Hand::from_channel(status & 0x0F);

    match status & 0xF0 {
        NOTE_ON if velocity > 0 => Some(NoteEvent::pressed(note, hand)),
        NOTE_ON | NOTE_OFF      => Some(NoteEvent::released(note, hand)),
        _                       => None,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MidirSource — real MIDI input (feature = "midi")
// ════════════════════════════════════════════════════════════════════════════

/// Which MIDI input to listen on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortChoice {
    /// First port that is not a loopback "Through" port.
    Auto,
    /// First port whose name contains this text (case-insensitive).
    Named(String),
    /// Register our own input port under this name and let the keyboard
    /// (or `aconnect`) connect to it.  ALSA / CoreMIDI only.
    Virtual(String),
}

#[cfg(feature = "midi")]
pub use self::midi::{list_input_ports, MidirSource};

#[cfg(feature = "midi")]
mod midi {
    use std::sync::mpsc::{self, Receiver};

    use midir::{Ignore, MidiInput, MidiInputConnection, MidiInputPort};
    use strip_map::NoteEvent;

    use super::{decode_message, EventSource, PortChoice};
    use crate::error::DeviceError;

    const CONNECTION_NAME: &str = "midi_strip input";

    /// Key events from a MIDI input port.
    ///
    /// midir calls back on its own thread; decoded events cross to the
    /// control loop over a channel.  Dropping the source closes the port.
    pub struct MidirSource {
        conn: Option<MidiInputConnection<()>>,
        rx:   Receiver<NoteEvent>,
        port: String,
    }

    impl MidirSource {
        pub fn open(client_name: &str, choice: &PortChoice) -> Result<Self, DeviceError> {
            let mut input = MidiInput::new(client_name)
                .map_err(|e| DeviceError::MidiInit(e.to_string()))?;
            input.ignore(Ignore::All);

            let (tx, rx) = mpsc::channel();
            let callback = move |_stamp: u64, message: &[u8], _: &mut ()| {
                if let Some(event) = decode_message(message) {
                    let _ = tx.send(event);
                }
            };

            let (conn, port) = match choice {
                PortChoice::Virtual(name) => (open_virtual(input, name, callback)?, name.clone()),
                PortChoice::Auto | PortChoice::Named(_) => {
                    let port = pick_port(&input, choice)?;
                    let name = input.port_name(&port).unwrap_or_else(|_| "Unknown".to_string());
                    let conn = input
                        .connect(&port, CONNECTION_NAME, callback, ())
                        .map_err(|e| DeviceError::MidiConnect(e.to_string()))?;
                    (conn, name)
                }
            };

            tracing::info!(port = %port, "listening for MIDI key events");
            Ok(MidirSource { conn: Some(conn), rx, port })
        }

        pub fn port_name(&self) -> &str {
            &self.port
        }
    }

    impl EventSource for MidirSource {
        fn poll(&mut self) -> NoteEvent {
            self.rx.try_recv().unwrap_or_else(|_| NoteEvent::ignorable())
        }
    }

    impl Drop for MidirSource {
        fn drop(&mut self) {
            if let Some(conn) = self.conn.take() {
                tracing::debug!(port = %self.port, "closing MIDI input");
                let _ = conn.close();
            }
        }
    }

    /// Names of every MIDI input port, in system order.
    pub fn list_input_ports(client_name: &str) -> Result<Vec<String>, DeviceError> {
        let input = MidiInput::new(client_name)
            .map_err(|e| DeviceError::MidiInit(e.to_string()))?;
        Ok(input
            .ports()
            .iter()
            .map(|p| input.port_name(p).unwrap_or_else(|_| "Unknown".to_string()))
            .collect())
    }

    fn pick_port(input: &MidiInput, choice: &PortChoice) -> Result<MidiInputPort, DeviceError> {
        let ports = input.ports();
        if ports.is_empty() {
            return Err(DeviceError::NoMidiPorts);
        }
        let name_of = |p: &MidiInputPort| input.port_name(p).unwrap_or_default().to_lowercase();

        let found = match choice {
            PortChoice::Named(wanted) => {
                let wanted = wanted.to_lowercase();
                ports.iter().find(|p| name_of(*p).contains(&wanted))
            }
            _ => ports
                .iter()
                .find(|p| !name_of(*p).contains("through"))
                .or_else(|| ports.first()),
        };

        match (found, choice) {
            (Some(p), _)                      => Ok(p.clone()),
            (None, PortChoice::Named(wanted)) => Err(DeviceError::MidiPortNotFound(wanted.clone())),
            (None, _)                         => Err(DeviceError::NoMidiPorts),
        }
    }

    #[cfg(unix)]
    fn open_virtual<F>(input: MidiInput, name: &str, callback: F)
        -> Result<MidiInputConnection<()>, DeviceError>
    where
        F: FnMut(u64, &[u8], &mut ()) + Send + 'static,
    {
        use midir::os::unix::VirtualInput;
        input
            .create_virtual(name, callback, ())
            .map_err(|e| DeviceError::MidiConnect(e.to_string()))
    }

    #[cfg(not(unix))]
    fn open_virtual<F>(_input: MidiInput, _name: &str, _callback: F)
        -> Result<MidiInputConnection<()>, DeviceError>
    where
        F: FnMut(u64, &[u8], &mut ()) + Send + 'static,
    {
        Err(DeviceError::MidiConnect(
            "virtual ports are only available with ALSA or CoreMIDI".to_string(),
        ))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use strip_map::EventKind;

    #[test]
    fn note_on_channel_0_is_right_hand_press() {
        assert_eq!(decode_message(&[0x90, 60, 100]), Some(NoteEvent::pressed(60, Hand::Right)));
    }

    #[test]
    fn note_on_other_channel_is_left_hand() {
        assert_eq!(decode_message(&[0x91, 48, 64]), Some(NoteEvent::pressed(48, Hand::Left)));
        assert_eq!(decode_message(&[0x9F, 48, 64]), Some(NoteEvent::pressed(48, Hand::Left)));
    }

    #[test]
    fn note_off_and_zero_velocity_note_on_release() {
        assert_eq!(decode_message(&[0x80, 60, 40]), Some(NoteEvent::released(60, Hand::Right)));
        assert_eq!(decode_message(&[0x90, 60, 0]), Some(NoteEvent::released(60, Hand::Right)));
        assert_eq!(decode_message(&[0x81, 60, 0]), Some(NoteEvent::released(60, Hand::Left)));
    }

    #[test]
    fn other_messages_are_dropped() {
        assert_eq!(decode_message(&[0xB0, 64, 127]), None); // sustain pedal
        assert_eq!(decode_message(&[0xF8]), None);          // clock
        assert_eq!(decode_message(&[0x90, 60]), None);      // truncated
        assert_eq!(decode_message(&[]), None);
        assert_eq!(decode_message(&[0x90, 0x80, 10]), None);
    }

    #[test]
    fn channel_source_is_non_blocking() {
        let (tx, mut src) = ChannelSource::pair();
        assert_eq!(src.poll().kind, EventKind::Ignorable);
        tx.send(NoteEvent::pressed(64, Hand::Left)).unwrap();
        assert_eq!(src.poll(), NoteEvent::pressed(64, Hand::Left));
        assert!(src.poll().is_ignorable());
    }

    #[test]
    fn channel_source_survives_hang_up() {
        let (tx, mut src) = ChannelSource::pair();
        drop(tx);
        assert!(src.poll().is_ignorable());
    }
}
