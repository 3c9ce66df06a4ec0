//! WS281x strips on a Raspberry Pi, through `rs_ws281x` (PWM + DMA).

use rs_ws281x::{ChannelBuilder, Controller, ControllerBuilder};
use strip_config::StripSettings;
use strip_map::{Color, StripType};

use crate::error::DeviceError;
use crate::output::LedOutput;

const CHANNEL: usize = 0;

pub struct Ws281xOutput {
    controller: Controller,
    pending:    Vec<Option<Color>>,
}

impl Ws281xOutput {
    pub fn new(settings: &StripSettings) -> Result<Self, DeviceError> {
        let channel = ChannelBuilder::new()
            .pin(i32::from(settings.gpio_pin))
            .count(i32::from(settings.led_count))
            .strip_type(strip_type(settings.strip_type))
            .brightness(settings.brightness)
            .build();

        let controller = ControllerBuilder::new()
            .freq(settings.frequency)
            .dma(i32::from(settings.dma_channel))
            .channel(CHANNEL, channel)
            .build()
            .map_err(|e| DeviceError::LedInit(format!("{e:?}")))?;

        tracing::info!(
            leds = settings.led_count,
            pin  = settings.gpio_pin,
            dma  = settings.dma_channel,
            "WS281x strip ready"
        );
        Ok(Ws281xOutput {
            controller,
            pending: vec![None; usize::from(settings.led_count)],
        })
    }
}

fn strip_type(t: StripType) -> rs_ws281x::StripType {
    use rs_ws281x::StripType as Hw;
    match t {
        StripType::Rgb => Hw::Ws2811Rgb,
        StripType::Rbg => Hw::Ws2811Rbg,
        StripType::Grb => Hw::Ws2811Grb,
        StripType::Gbr => Hw::Ws2811Gbr,
        StripType::Brg => Hw::Ws2811Brg,
        StripType::Bgr => Hw::Ws2811Bgr,
    }
}

impl LedOutput for Ws281xOutput {
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
        // The driver's LED word is 0x00RRGGBB, stored little-endian.
        let leds = self.controller.leds_mut(CHANNEL);
        for (led, color) in leds.iter_mut().zip(&self.pending) {
            *led = color.map_or(0, Color::rgb).to_le_bytes();
        }
        self.controller
            .render()
            .map_err(|e| DeviceError::LedRender(format!("{e:?}")))
    }
}

impl Drop for Ws281xOutput {
    fn drop(&mut self) {
        self.clear_all();
        if let Err(e) = self.commit() {
            tracing::warn!(error = %e, "could not switch the strip off");
        }
    }
}
