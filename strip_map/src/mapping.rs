//! The mapping engine: key events in, LED commands out.
//!
//! [`KeyMapper::map`] is a pure function of its inputs.  It holds only the
//! immutable [`KeyboardGeometry`] and [`HandColors`] built at startup, so the
//! same event always yields the same command.

use crate::color::Color;
use crate::geometry::KeyboardGeometry;

// ════════════════════════════════════════════════════════════════════════════
// NoteEvent
// ════════════════════════════════════════════════════════════════════════════

/// Which hand played the key.  Keyboards with a split or a dual-channel
/// output report the right hand on MIDI channel 0 and the left hand on any
/// other channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Right,
    Left,
}

impl Hand {
    pub fn from_channel(channel: u8) -> Self {
        if channel == 0 { Hand::Right } else { Hand::Left }
    }

    pub fn initial(self) -> char {
        match self {
            Hand::Right => 'R',
            Hand::Left  => 'L',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Pressed,
    Released,
    /// Nothing pending, or an event with no meaning for the strip.
    Ignorable,
}

/// One polled key event.  Lives for a single loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteEvent {
    pub note: u8,
    pub hand: Hand,
    pub kind: EventKind,
}

impl NoteEvent {
    pub fn pressed(note: u8, hand: Hand) -> Self {
        NoteEvent { note, hand, kind: EventKind::Pressed }
    }

    pub fn released(note: u8, hand: Hand) -> Self {
        NoteEvent { note, hand, kind: EventKind::Released }
    }

    pub fn ignorable() -> Self {
        NoteEvent { note: 0, hand: Hand::Right, kind: EventKind::Ignorable }
    }

    pub fn is_ignorable(&self) -> bool {
        self.kind == EventKind::Ignorable
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LedCommand
// ════════════════════════════════════════════════════════════════════════════

/// Set one LED to a colour, or switch it off when `color` is `None`.
///
/// `index` is signed because notes off the configured keyboard map outside
/// the strip; see [`KeyboardGeometry::index_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LedCommand {
    pub index: i32,
    pub color: Option<Color>,
}

impl LedCommand {
    /// The index as a strip position, if it falls on a strip of `len` LEDs.
    pub fn position(&self, len: usize) -> Option<usize> {
        usize::try_from(self.index).ok().filter(|i| *i < len)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandColors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandColors {
    pub right: Color,
    pub left:  Color,
}

impl HandColors {
    pub fn new(right: Color, left: Color) -> Self {
        HandColors { right, left }
    }

    pub fn for_hand(&self, hand: Hand) -> Color {
        match hand {
            Hand::Right => self.right,
            Hand::Left  => self.left,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// KeyMapper
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyMapper {
    geometry: KeyboardGeometry,
    colors:   HandColors,
}

impl KeyMapper {
    pub fn new(geometry: KeyboardGeometry, colors: HandColors) -> Self {
        KeyMapper { geometry, colors }
    }

    pub fn geometry(&self) -> &KeyboardGeometry { &self.geometry }
    pub fn colors(&self)   -> &HandColors       { &self.colors }

    /// Translate a key event into the LED command it calls for.
    ///
    /// Returns `None` only for [`EventKind::Ignorable`], which the control
    /// loop filters out before getting here.
    pub fn map(&self, event: &NoteEvent) -> Option<LedCommand> {
        let color = match event.kind {
            EventKind::Pressed   => Some(self.colors.for_hand(event.hand)),
            EventKind::Released  => None,
            EventKind::Ignorable => return None,
        };
        Some(LedCommand { index: self.geometry.index_for(event.note), color })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LedOrder;

    fn mapper(order: LedOrder) -> KeyMapper {
        KeyMapper::new(
            KeyboardGeometry::new(36, 96, 1.0, order).unwrap(),
            HandColors::new(Color::Blue, Color::Green),
        )
    }

    #[test]
    fn right_hand_press_uses_right_color() {
        let cmd = mapper(LedOrder::Direct).map(&NoteEvent::pressed(40, Hand::Right));
        assert_eq!(cmd, Some(LedCommand { index: 4, color: Some(Color::Blue) }));
    }

    #[test]
    fn left_hand_press_uses_left_color() {
        let cmd = mapper(LedOrder::Direct).map(&NoteEvent::pressed(40, Hand::Left));
        assert_eq!(cmd, Some(LedCommand { index: 4, color: Some(Color::Green) }));
    }

    #[test]
    fn release_turns_off_regardless_of_hand() {
        let m = mapper(LedOrder::Direct);
        for hand in [Hand::Right, Hand::Left] {
            let cmd = m.map(&NoteEvent::released(50, hand)).unwrap();
            assert_eq!(cmd.color, None);
            assert_eq!(cmd.index, 14);
        }
    }

    #[test]
    fn press_release_round_trip_addresses_same_led() {
        let m = mapper(LedOrder::Inverted);
        for note in 36..=96u8 {
            for hand in [Hand::Right, Hand::Left] {
                let on  = m.map(&NoteEvent::pressed(note, hand)).unwrap();
                let off = m.map(&NoteEvent::released(note, hand)).unwrap();
                assert_eq!(on.index, off.index);
                assert!(on.color.is_some());
                assert!(off.color.is_none());
            }
        }
    }

    #[test]
    fn mapping_is_deterministic() {
        let m = mapper(LedOrder::Direct);
        let ev = NoteEvent::pressed(61, Hand::Left);
        assert_eq!(m.map(&ev), m.map(&ev));
        assert_eq!(m.map(&ev), mapper(LedOrder::Direct).map(&ev));
    }

    #[test]
    fn ignorable_maps_to_nothing() {
        assert_eq!(mapper(LedOrder::Direct).map(&NoteEvent::ignorable()), None);
    }

    #[test]
    fn out_of_range_index_passes_through() {
        let cmd = mapper(LedOrder::Direct).map(&NoteEvent::pressed(21, Hand::Right)).unwrap();
        assert_eq!(cmd.index, -15);
        assert_eq!(cmd.position(61), None);
    }

    #[test]
    fn position_checks_strip_bounds() {
        let cmd = LedCommand { index: 60, color: None };
        assert_eq!(cmd.position(61), Some(60));
        assert_eq!(cmd.position(60), None);
    }

    #[test]
    fn hand_from_channel() {
        assert_eq!(Hand::from_channel(0), Hand::Right);
        assert_eq!(Hand::from_channel(1), Hand::Left);
        assert_eq!(Hand::from_channel(15), Hand::Left);
    }
}
