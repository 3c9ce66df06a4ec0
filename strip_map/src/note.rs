//! Conversions between MIDI note numbers and scientific pitch names.
//!
//! Names are a letter `A`–`G`, an optional sharp (`#`) and a single octave
//! digit, matched case-insensitively.  Middle C is `C4` = MIDI 60, so the
//! lowest nameable note is `C0` = 12 and the highest is `G9` = 127.

use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Pitch-class table
// ════════════════════════════════════════════════════════════════════════════

const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteNameError {
    /// Not of the form `<letter>[#]<octave>`.
    #[error("'{0}' is not a note name (expected something like C2 or F#3)")]
    Malformed(String),
    /// Well-formed but above MIDI 127.
    #[error("'{0}' is above the MIDI range (highest note is G9)")]
    OutOfRange(String),
}

/// Parse a note name into its MIDI number.
///
/// ```rust
/// use strip_map::note_to_midi;
/// assert_eq!(note_to_midi("C4"), Ok(60));
/// assert_eq!(note_to_midi("a#0"), Ok(22));
/// ```
pub fn note_to_midi(name: &str) -> Result<u8, NoteNameError> {
    let malformed = || NoteNameError::Malformed(name.to_string());
    let upper = name.trim().to_ascii_uppercase();
    let bytes = upper.as_bytes();

    let (pitch, octave) = match bytes {
        [letter, b'#', octave] if matches!(letter, b'A' | b'C' | b'D' | b'F' | b'G') => {
            (&upper[..2], *octave)
        }
        [letter, octave] if (b'A'..=b'G').contains(letter) => (&upper[..1], *octave),
        _ => return Err(malformed()),
    };
    if !octave.is_ascii_digit() {
        return Err(malformed());
    }

    let semitone = PITCH_CLASSES
        .iter()
        .position(|p| *p == pitch)
        .ok_or_else(malformed)? as u32;
    let midi = semitone + (u32::from(octave - b'0') + 1) * 12;

    u8::try_from(midi)
        .ok()
        .filter(|m| *m <= 127)
        .ok_or_else(|| NoteNameError::OutOfRange(name.to_string()))
}

/// Name a MIDI note, e.g. `60` → `"C4"`.  Notes below C0 get octave `-1`.
pub fn midi_to_note(midi: u8) -> String {
    let pitch  = PITCH_CLASSES[usize::from(midi % 12)];
    let octave = i32::from(midi / 12) - 1;
    format!("{}{}", pitch, octave)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
