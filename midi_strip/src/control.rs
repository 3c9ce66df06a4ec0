//! The polling loop: event in, LED out, sleep, repeat.

use std::thread;
use std::time::Duration;

use strip_map::{midi_to_note, KeyMapper, LedCommand};

use crate::error::DeviceError;
use crate::output::LedOutput;
use crate::run_flag::RunFlag;
use crate::source::EventSource;

/// Pause between polls.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(10);

/// What one iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing pending.
    Idle,
    /// The command was applied and committed.
    Applied(LedCommand),
    /// The command addressed an LED off the strip and was discarded.
    Dropped(LedCommand),
}

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub iterations: u64,
    pub applied:    u64,
    pub ignored:    u64,
    pub dropped:    u64,
}

impl LoopStats {
    fn record(&mut self, step: Step) {
        self.iterations += 1;
        match step {
            Step::Idle       => self.ignored += 1,
            Step::Applied(_) => self.applied += 1,
            Step::Dropped(_) => self.dropped += 1,
        }
    }
}

pub struct ControlLoop {
    mapper:   KeyMapper,
    interval: Duration,
}

impl ControlLoop {
    pub fn new(mapper: KeyMapper) -> Self {
        ControlLoop { mapper, interval: DEFAULT_INTERVAL }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration { self.interval }

    /// Poll once and apply whatever came in.  Does not sleep.
    pub fn step<S, O>(&self, source: &mut S, output: &mut O) -> Result<Step, DeviceError>
    where
        S: EventSource + ?Sized,
        O: LedOutput + ?Sized,
    {
        let event = source.poll();
        let Some(command) = self.mapper.map(&event) else {
            return Ok(Step::Idle);
        };

        let Some(position) = command.position(output.len()) else {
            tracing::warn!(
                note  = %midi_to_note(event.note),
                index = command.index,
                len   = output.len(),
                "note falls outside the strip, ignored"
            );
            return Ok(Step::Dropped(command));
        };

        tracing::debug!(
            "[{}] {} {}",
            event.hand.initial(),
            midi_to_note(event.note),
            if command.color.is_some() { "ON" } else { "OFF" }
        );
        output.set(position, command.color);
        output.commit()?;
        Ok(Step::Applied(command))
    }

    /// Run until `flag` is cleared or a device fails.
    pub fn run<S, O>(
        &self,
        source: &mut S,
        output: &mut O,
        flag:   &RunFlag,
    ) -> Result<LoopStats, DeviceError>
    where
        S: EventSource + ?Sized,
        O: LedOutput + ?Sized,
    {
        let mut stats = LoopStats::default();
        while flag.is_running() {
            let step = self.step(source, output)?;
            stats.record(step);
            output.idle()?;
            if !self.interval.is_zero() {
                thread::sleep(self.interval);
            }
        }
        Ok(stats)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
