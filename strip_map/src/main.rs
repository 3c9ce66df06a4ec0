//! Interactive calibration table: prints which LED each key will light for a
//! given keyboard geometry, before anything is soldered.

use strip_map::{midi_to_note, note_to_midi, KeyboardGeometry, LedOrder};
use std::io::{self, Write};

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║          Keyboard → LED Strip Calibration            ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let min_note = pick_note("  Lowest key (default A0): ", 21);
    let max_note = pick_note("  Highest key (default C8): ", 108);

    let leds_per_key: f64 = read_line("  LEDs per key (default 1.0): ")
        .trim().parse().unwrap_or(1.0);

    let order = match read_line("  Order DIR/INV (default DIR): ").trim() {
        "" => LedOrder::Direct,
        s  => s.parse().unwrap_or_else(|e| {
            println!("  ⚠  {} — using DIR", e);
            LedOrder::Direct
        }),
    };

    let geometry = match KeyboardGeometry::new(min_note, max_note, leds_per_key, order) {
        Ok(g)  => g,
        Err(e) => {
            eprintln!("  ⚠  {}", e);
            std::process::exit(2);
        }
    };

    println!();
    println!("  ┌─ {} keys, {} LED(s)/key, order {} ─",
        geometry.key_count(), leds_per_key, order);
    for note in min_note..=max_note {
        println!("  │  {:>4} ({:>3})  →  LED {:>4}",
            midi_to_note(note), note, geometry.index_for(note));
    }
    println!("  └─ strip needs at least {} LEDs", geometry.span() + 1);
    println!();
}

fn pick_note(prompt: &str, default: u8) -> u8 {
    loop {
        let s = read_line(prompt);
        if s.trim().is_empty() { return default; }
        match note_to_midi(&s) {
            Ok(n)  => return n,
            Err(e) => println!("  ⚠  {}", e),
        }
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
