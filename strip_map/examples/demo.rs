//! Demonstrates strip_map: geometry in both orders and the mapping engine.

use strip_map::{
    midi_to_note, Color, Hand, HandColors, KeyMapper, KeyboardGeometry, LedOrder, NoteEvent,
};

fn main() {
    println!("\n=== Strip Map Demo ===\n");

    // ── 1. 61-key keyboard, one LED per key ────────────────────────────────
    println!("1. C2..C7, 1 LED/key, DIR");
    let direct = KeyboardGeometry::new(36, 96, 1.0, LedOrder::Direct).unwrap();
    for note in [36u8, 37, 60, 96] {
        println!("   {:>3} → LED {}", midi_to_note(note), direct.index_for(note));
    }

    // ── 2. Same keyboard, strip mounted the other way round ───────────────
    println!("\n2. C2..C7, 1 LED/key, INV");
    let inverted = KeyboardGeometry::new(36, 96, 1.0, LedOrder::Inverted).unwrap();
    for note in [36u8, 60, 95, 96] {
        println!("   {:>3} → LED {}", midi_to_note(note), inverted.index_for(note));
    }

    // ── 3. Mapping a short two-handed phrase ──────────────────────────────
    println!("\n3. Two hands, right=BLUE left=GREEN, 0.5 LED/key");
    let geometry = KeyboardGeometry::new(36, 96, 0.5, LedOrder::Direct).unwrap();
    let mapper = KeyMapper::new(geometry, HandColors::new(Color::Blue, Color::Green));
    let phrase = [
        NoteEvent::pressed(48, Hand::Left),
        NoteEvent::pressed(64, Hand::Right),
        NoteEvent::released(64, Hand::Right),
        NoteEvent::released(48, Hand::Left),
    ];
    for ev in &phrase {
        if let Some(cmd) = mapper.map(ev) {
            let what = cmd.color.map_or("off".to_string(), |c| c.to_string());
            println!("   [{}] {:>3} {:?} → LED {} {}",
                ev.hand.initial(), midi_to_note(ev.note), ev.kind, cmd.index, what);
        }
    }
    println!();
}
