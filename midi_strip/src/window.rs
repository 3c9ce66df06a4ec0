//! Software-rendered strip using `minifb`.
//!
//! Each LED is drawn as a cell in a single row, LED 0 on the left:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ ▢ ▢ ▢ ■ ▢ ▢ ▢ ▢ ▢ ▢ ■ ▢ ▢ ▢ ▢ ▢ ▢ ▢ ▢ ▢ ▢ ▢ ▢ ▢ ▢ ▢ ▢ ▢ ▢ ▢ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The window doubles as the simulated keyboard: key presses in it are
//! turned into [`NoteEvent`]s and sent to a channel that a
//! [`ChannelSource`](crate::source::ChannelSource) reads from, the same way
//! a MIDI callback would.

use std::sync::mpsc::Sender;

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use strip_map::{Color, Hand, NoteEvent};

use crate::error::DeviceError;
use crate::output::LedOutput;
use crate::run_flag::RunFlag;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const MAX_WIN_W: usize = 1600;
const MAX_CELL:  usize = 16;
const MIN_CELL:  usize = 3;
const WIN_H:     usize = 40;
const MARGIN:    usize = 8;
const BG_COLOR:  u32   = 0xFF10_1010;
const OFF_COLOR: u32   = 0xFF2A_2A2A;

/// Scale applied to the (deliberately dim) LED palette so it reads on a monitor.
const SCREEN_GAIN: u32 = 7;

// ════════════════════════════════════════════════════════════════════════════
// Simulated keyboard
// ════════════════════════════════════════════════════════════════════════════

/// Bottom letter row, one octave C..B, left hand.
const LEFT_ROW: [Key; 12] = [
    Key::Z, Key::S, Key::X, Key::D, Key::C, Key::V,
    Key::G, Key::B, Key::H, Key::N, Key::J, Key::M,
];

/// Top letter row plus digits for the black keys, right hand.
const RIGHT_ROW: [Key; 12] = [
    Key::Q, Key::Key2, Key::W, Key::Key3, Key::E, Key::R,
    Key::Key5, Key::T, Key::Key6, Key::Y, Key::Key7, Key::U,
];

/// Where the two simulated octaves start, and where their events go.
pub struct SimKeyboard {
    pub tx:         Sender<NoteEvent>,
    pub left_base:  u8,
    pub right_base: u8,
}

impl SimKeyboard {
    /// Centre the two octaves on the middle of `min_note..=max_note`.
    pub fn centred(tx: Sender<NoteEvent>, min_note: u8, max_note: u8) -> Self {
        let middle = min_note + (max_note - min_note) / 2;
        SimKeyboard {
            tx,
            left_base:  middle.saturating_sub(12),
            right_base: middle.min(127 - 11),
        }
    }

    fn note_for(&self, key: Key) -> Option<(u8, Hand)> {
        if let Some(i) = LEFT_ROW.iter().position(|k| *k == key) {
            return Some((self.left_base + i as u8, Hand::Left));
        }
        RIGHT_ROW
            .iter()
            .position(|k| *k == key)
            .map(|i| (self.right_base + i as u8, Hand::Right))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// WindowOutput
// ════════════════════════════════════════════════════════════════════════════

pub struct WindowOutput {
    window:   Window,
    buf:      Vec<u32>,
    width:    usize,
    cell:     usize,
    pending:  Vec<Option<Color>>,
    keyboard: Option<SimKeyboard>,
    stop:     Option<RunFlag>,
}

impl WindowOutput {
    pub fn new(len: usize, title: &str) -> Result<Self, DeviceError> {
        let cell  = (MAX_WIN_W / len.max(1)).clamp(MIN_CELL, MAX_CELL);
        let width = cell * len + 2 * MARGIN;

        let window = Window::new(
            title,
            width, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| DeviceError::Window(e.to_string()))?;

        Ok(WindowOutput {
            window,
            buf: vec![BG_COLOR; width * WIN_H],
            width,
            cell,
            pending: vec![None; len],
            keyboard: None,
            stop: None,
        })
    }

    /// Turn key presses in the window into note events.
    pub fn with_keyboard(mut self, keyboard: SimKeyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    /// Clear `flag` when the window is closed (or Escape is pressed).
    pub fn stop_on_close(mut self, flag: RunFlag) -> Self {
        self.stop = Some(flag);
        self
    }

    fn draw(&mut self) {
        self.buf.fill(BG_COLOR);
        let gap = usize::from(self.cell > 4);
        for (i, led) in self.pending.iter().enumerate() {
            let color = led.map_or(OFF_COLOR, screen_color);
            let x0 = MARGIN + i * self.cell;
            for row in MARGIN..WIN_H - MARGIN {
                let line = row * self.width;
                self.buf[line + x0..line + x0 + self.cell - gap].fill(color);
            }
        }
    }

    fn forward_keys(&self) {
        let Some(kb) = &self.keyboard else { return };
        let pressed  = self.window.get_keys_pressed(KeyRepeat::No);
        let released = self.window.get_keys_released();

        let events = pressed.into_iter()
            .filter_map(|k| kb.note_for(k).map(|(n, h)| NoteEvent::pressed(n, h)))
            .chain(released.into_iter()
                .filter_map(|k| kb.note_for(k).map(|(n, h)| NoteEvent::released(n, h))));
        for event in events {
            let _ = kb.tx.send(event);
        }
    }
}

impl LedOutput for WindowOutput {
    fn len(&self) -> usize { self.pending.len() }

    fn set(&mut self, index: usize, color: Option<Color>) {
        if let Some(slot) = self.pending.get_mut(index) {
            *slot = color;
        }
    }

    fn clear_all(&mut self) {
        self.pending.fill(None);
    }

    fn commit(&mut self) -> Result<(), DeviceError> {
        self.draw();
        self.window
            .update_with_buffer(&self.buf, self.width, WIN_H)
            .map_err(|e| DeviceError::Window(e.to_string()))?;
        // Every update resets the pressed/released sets, so read them now.
        self.forward_keys();
        Ok(())
    }

    fn idle(&mut self) -> Result<(), DeviceError> {
        if !self.window.is_open() || self.window.is_key_down(Key::Escape) {
            if let Some(flag) = &self.stop {
                flag.stop();
            }
            return Ok(());
        }
        self.window.update();
        self.forward_keys();
        Ok(())
    }
}

impl Drop for WindowOutput {
    fn drop(&mut self) {
        if self.window.is_open() {
            self.clear_all();
            let _ = self.commit();
        }
    }
}

/// Brighten a palette colour for display, keeping its hue.
fn screen_color(color: Color) -> u32 {
    let (r, g, b) = color.components();
    let gain = |c: u8| (u32::from(c) * SCREEN_GAIN).min(0xFF);
    0xFF00_0000 | (gain(r) << 16) | (gain(g) << 8) | gain(b)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn keyboard_rows_cover_one_octave_each() {
        let (tx, _rx) = mpsc::channel();
        let kb = SimKeyboard { tx, left_base: 48, right_base: 60 };
        assert_eq!(kb.note_for(Key::Z), Some((48, Hand::Left)));
        assert_eq!(kb.note_for(Key::M), Some((59, Hand::Left)));
        assert_eq!(kb.note_for(Key::Q), Some((60, Hand::Right)));
        assert_eq!(kb.note_for(Key::Key2), Some((61, Hand::Right)));
        assert_eq!(kb.note_for(Key::U), Some((71, Hand::Right)));
        assert_eq!(kb.note_for(Key::P), None);
    }

    #[test]
    fn centred_keyboard_sits_in_the_middle() {
        let (tx, _rx) = mpsc::channel();
        let kb = SimKeyboard::centred(tx, 36, 96);
        assert_eq!(kb.right_base, 66);
        assert_eq!(kb.left_base, 54);
    }

    #[test]
    fn centred_keyboard_stays_in_midi_range() {
        let (tx, _rx) = mpsc::channel();
        let kb = SimKeyboard::centred(tx, 120, 127);
        assert!(kb.right_base + 11 <= 127);
        let (tx, _rx) = mpsc::channel();
        let kb = SimKeyboard::centred(tx, 0, 10);
        assert_eq!(kb.left_base, 0);
    }

    #[test]
    fn screen_color_keeps_hue() {
        assert_eq!(screen_color(Color::Red), 0xFFE0_0000);
        assert_eq!(screen_color(Color::Orange), 0xFFE0_7000);
        assert_eq!(screen_color(Color::Purple), 0xFF70_0070);
    }
}
