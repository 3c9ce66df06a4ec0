//! check_config — validate a strip configuration file without touching hardware.
//!
//! ```text
//! check_config strip.conf
//! ```

use strip_config::StripSettings;
use strip_map::midi_to_note;

fn main() {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: check_config <FILE>");
        std::process::exit(2);
    };

    let settings = match StripSettings::load(&path) {
        Ok(s)  => s,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(if e.is_open_file() { 1 } else { 2 });
        }
    };

    let g = settings.geometry;
    println!("✓ {}", path);
    println!("  strip     : {} LEDs, {} order, {} Hz, GPIO {}, DMA {}, brightness {}",
        settings.led_count, settings.strip_type, settings.frequency,
        settings.gpio_pin, settings.dma_channel, settings.brightness);
    println!("  keyboard  : {} – {} ({} keys), {} LED(s)/key, {}",
        midi_to_note(g.min_note()), midi_to_note(g.max_note()),
        g.key_count(), g.leds_per_key(), g.order());
    println!("  colors    : right {}, left {}",
        settings.hand_colors.right, settings.hand_colors.left);

    if settings.strip_shorter_than_keyboard() {
        println!("  ⚠  keys beyond LED {} will not light (furthest key maps to LED {})",
            settings.led_count - 1, g.span());
    }
}
