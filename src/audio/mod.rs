//! Audio cues raised by the locomotion controller.
//!
//! The controller never talks to an audio device. It returns the cues it wants
//! played; the app forwards them as `AudioCueEvent`s and `log_audio_cues`
//! hands them to whatever sink is installed. Repeating cues (sword whoosh,
//! phoenix cry) are throttled with `CueCooldown`.

use crate::settings::Settings;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Jump,
    Land,
    SwordWhoosh,
    PhoenixCry,
}

impl AudioCue {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AudioCue::Jump => "jump",
            AudioCue::Land => "land",
            AudioCue::SwordWhoosh => "sword_whoosh",
            AudioCue::PhoenixCry => "phoenix_cry",
        }
    }
}

/// Fire-and-forget cue consumer.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Minimum-interval gate keyed on a monotonic clock in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueCooldown {
    pub interval: f64,
    last: Option<f64>,
}

impl CueCooldown {
    #[must_use]
    pub fn new(interval: f64) -> Self {
        Self { interval, last: None }
    }

    #[must_use]
    pub fn ready(&self, now: f64) -> bool {
        self.last.map_or(true, |last| now - last >= self.interval)
    }

    /// Fire if the interval has elapsed. Returns whether it fired.
    pub fn trigger(&mut self, now: f64) -> bool {
        if !self.ready(now) {
            return false;
        }
        self.last = Some(now);
        true
    }

    /// Record a trigger at `now` regardless of readiness.
    pub fn force(&mut self, now: f64) {
        self.last = Some(now);
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioCueEvent(pub AudioCue);

/// Sink that logs cues with the effective effects volume. Stands in for a
/// real mixer; there are no sound assets in this build.
pub struct LogSink {
    pub volume: f32,
}

impl AudioSink for LogSink {
    fn play(&mut self, cue: AudioCue) {
        if self.volume <= 0.0 {
            return;
        }
        debug!("audio cue: {} (volume {:.2})", cue.name(), self.volume);
    }
}

/// Drain cue events into the log sink.
#[allow(clippy::needless_pass_by_value)]
pub fn log_audio_cues(mut events: EventReader<AudioCueEvent>, settings: Res<Settings>) {
    let mut sink = LogSink {
        volume: settings.audio.master_volume * settings.audio.effects_volume,
    };
    for AudioCueEvent(cue) in events.read() {
        sink.play(*cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_fires_once_per_interval() {
        let mut gate = CueCooldown::new(0.5);
        assert!(gate.trigger(10.0));
        assert!(!gate.trigger(10.2));
        assert!(!gate.trigger(10.49));
        assert!(gate.trigger(10.5));
    }

    #[test]
    fn forced_trigger_starts_interval() {
        let mut gate = CueCooldown::new(2.0);
        gate.force(1.0);
        assert!(!gate.ready(2.5));
        assert!(gate.ready(3.0));
    }
}
