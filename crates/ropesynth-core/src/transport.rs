//! Wall-clock driven beat/sub-beat timers and the fixed physics cadence.
//!
//! The transport runs on the frame context and is advanced by the host's
//! frame delta, not by the audio sample clock. The two clocks drift; that is
//! accepted.

use crate::constants::{
    DEFAULT_BPM, MAX_BPM, MAX_SUB_BEATS_PER_BEAT, MIN_BPM, PHYSICS_STEP_SEC, SUB_BEATS_PER_BEAT,
};
use crate::error::{CoreError, CoreResult};
use crate::voice::ArpMode;

#[derive(Clone, Copy, Debug)]
pub struct TransportParams {
    pub bpm: u32,
    pub sub_beats_per_beat: u32,
    pub physics_step_sec: f32,
    pub arp_mode: ArpMode,
}

impl Default for TransportParams {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            sub_beats_per_beat: SUB_BEATS_PER_BEAT,
            physics_step_sec: PHYSICS_STEP_SEC,
            arp_mode: ArpMode::UpDown,
        }
    }
}

/// What one `advance` call produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransportTick {
    pub beat: bool,
    pub sub_beat: bool,
    pub physics_step: bool,
}

#[derive(Clone, Debug)]
pub struct Transport {
    bpm: u32,
    sub_beats_per_beat: u32,
    physics_step_sec: f32,
    pub physics_time: f32,
    pub beat_time: f32,
    pub sub_beat_time: f32,
    beat_triggered: bool,
    sub_beat_triggered: bool,
    pub arp_mode: ArpMode,
}

impl Transport {
    pub fn new(params: TransportParams) -> CoreResult<Self> {
        if !(MIN_BPM..=MAX_BPM).contains(&params.bpm) {
            return Err(CoreError::InvalidBpm(params.bpm));
        }
        if !(1..=MAX_SUB_BEATS_PER_BEAT).contains(&params.sub_beats_per_beat) {
            return Err(CoreError::InvalidSubBeats(params.sub_beats_per_beat));
        }
        if !params.physics_step_sec.is_finite() || params.physics_step_sec <= 0.0 {
            return Err(CoreError::InvalidPhysicsStep(params.physics_step_sec));
        }
        Ok(Self {
            bpm: params.bpm,
            sub_beats_per_beat: params.sub_beats_per_beat,
            physics_step_sec: params.physics_step_sec,
            physics_time: 0.0,
            beat_time: 0.0,
            sub_beat_time: 0.0,
            beat_triggered: false,
            sub_beat_triggered: false,
            arp_mode: params.arp_mode,
        })
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn set_bpm(&mut self, bpm: u32) {
        self.bpm = bpm.clamp(MIN_BPM, MAX_BPM);
    }

    pub fn sub_beats_per_beat(&self) -> u32 {
        self.sub_beats_per_beat
    }

    pub fn physics_step_sec(&self) -> f32 {
        self.physics_step_sec
    }

    pub fn beat_period(&self) -> f32 {
        60.0 / self.bpm as f32
    }

    pub fn sub_beat_period(&self) -> f32 {
        60.0 / (self.bpm as f32 * self.sub_beats_per_beat as f32)
    }

    /// Fractional position within the current beat.
    pub fn beat_phase(&self) -> f32 {
        (self.beat_time / self.beat_period()).clamp(0.0, 1.0)
    }

    pub fn sub_beat_phase(&self) -> f32 {
        (self.sub_beat_time / self.sub_beat_period()).clamp(0.0, 1.0)
    }

    pub fn beat_triggered(&self) -> bool {
        self.beat_triggered
    }

    pub fn sub_beat_triggered(&self) -> bool {
        self.sub_beat_triggered
    }

    /// Clear and return the beat flag.
    pub fn consume_beat(&mut self) -> bool {
        std::mem::take(&mut self.beat_triggered)
    }

    pub fn consume_sub_beat(&mut self) -> bool {
        std::mem::take(&mut self.sub_beat_triggered)
    }

    /// Accumulate a frame delta. Non-positive or non-finite `dt` does nothing.
    pub fn advance(&mut self, dt: f32) -> TransportTick {
        let mut tick = TransportTick::default();
        if !(dt.is_finite() && dt > 0.0) {
            return tick;
        }
        self.physics_time += dt;
        self.beat_time += dt;
        self.sub_beat_time += dt;

        if self.beat_time >= self.beat_period() {
            self.beat_time = 0.0;
            self.beat_triggered = true;
            tick.beat = true;
        }
        if self.sub_beat_time >= self.sub_beat_period() {
            self.sub_beat_time = 0.0;
            self.sub_beat_triggered = true;
            tick.sub_beat = true;
        }
        if self.physics_time >= self.physics_step_sec {
            self.physics_time = 0.0;
            tick.physics_step = true;
        }
        tick
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            sub_beats_per_beat: SUB_BEATS_PER_BEAT,
            physics_step_sec: PHYSICS_STEP_SEC,
            physics_time: 0.0,
            beat_time: 0.0,
            sub_beat_time: 0.0,
            beat_triggered: false,
            sub_beat_triggered: false,
            arp_mode: ArpMode::UpDown,
        }
    }
}
