//! FM voices and their per-slot behaviors.
//!
//! Every voice shares the same carrier/modulator oscillator pair. What differs
//! per slot is how the carrier frequency is chosen and what happens to the raw
//! sample afterwards; that lives in [`VoiceBehavior`].

use std::f32::consts::TAU;

use rand::prelude::*;

use crate::constants::{
    HISTORY_SIZE, MAX_CUTOFF_HZ, MAX_RESONANT_CUTOFF_HZ, MAX_ROPE_LENGTH, MIN_CUTOFF_HZ,
    MIN_RESONANT_CUTOFF_HZ,
};
use crate::envelope::Envelope;
use crate::error::{CoreError, CoreResult};
use crate::filter::{OnePoleLowpass, ResonantLowpass};
use crate::mapping::{cutoff_from_length, frequency_from_direction, modulator_from_length, RopeGeometry};
use crate::scales::midi_to_hz;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl Waveform {
    /// Raw oscillator output for `phase` in `[0, 1)`.
    #[inline]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            Waveform::Sawtooth => 2.0 * phase - 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArpMode {
    Up,
    Down,
    UpDown,
    DownUp,
    Random,
}

impl ArpMode {
    pub const ALL: [ArpMode; 5] = [
        ArpMode::Up,
        ArpMode::Down,
        ArpMode::UpDown,
        ArpMode::DownUp,
        ArpMode::Random,
    ];

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    fn starts_descending(self) -> bool {
        matches!(self, ArpMode::Down | ArpMode::DownUp)
    }

    pub fn label(self) -> &'static str {
        match self {
            ArpMode::Up => "up",
            ArpMode::Down => "down",
            ArpMode::UpDown => "up-down",
            ArpMode::DownUp => "down-up",
            ArpMode::Random => "random",
        }
    }
}

/// Fixed-size circular store of recent raw samples for the waveform view.
#[derive(Clone, Debug)]
pub struct SampleHistory {
    samples: Box<[f32; HISTORY_SIZE]>,
}

impl Default for SampleHistory {
    fn default() -> Self {
        Self {
            samples: Box::new([0.0; HISTORY_SIZE]),
        }
    }
}

impl SampleHistory {
    #[inline]
    pub fn record(&mut self, running_index: u64, sample: f32) {
        let slot = (running_index % HISTORY_SIZE as u64) as usize;
        self.samples[slot] = sample;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples[..]
    }
}

/// Everything a voice reads from outside itself for one sample.
#[derive(Clone, Copy, Debug)]
pub struct VoiceContext {
    pub rope: RopeGeometry,
    pub beat_triggered: bool,
    pub sub_beat_triggered: bool,
    /// Fractional position within the current beat, `[0, 1]`.
    pub beat_phase: f32,
    /// Fractional position within the current sub-beat, `[0, 1]`.
    pub sub_beat_phase: f32,
    pub sample_rate: f32,
}

#[derive(Clone, Debug)]
pub enum VoiceBehavior {
    /// Carrier follows the rope direction; rope length drives a one-pole
    /// low-pass and the (sub-audio) modulator rate.
    Lead {
        filter: OnePoleLowpass,
        modulator_offset_hz: f32,
    },
    /// Random note per beat, enveloped over the beat, resonant low-pass.
    Rhythmic {
        envelope: Envelope,
        filter: ResonantLowpass,
    },
    /// Steps through the sequence once per sub-beat.
    Arpeggio {
        mode: ArpMode,
        descending: bool,
        envelope: Envelope,
        filter: ResonantLowpass,
    },
    /// Random note per beat, unfiltered drone.
    Constant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceKind {
    Lead,
    Rhythmic,
    Arpeggio(ArpMode),
    Constant,
}

#[derive(Clone, Debug)]
pub struct VoiceConfig {
    pub kind: VoiceKind,
    pub shape: Waveform,
    pub carrier_hz: f32,
    pub modulator_hz: f32,
    pub modulation_index: f32,
    /// Note sequence; for the lead voice this is the direction scale.
    pub sequence: &'static [i32],
    pub resonance: f32,
    pub volume: f32,
    pub color_rgb: [f32; 3],
}

#[derive(Clone, Debug)]
pub struct FmVoice {
    pub carrier_hz: f32,
    pub shape: Waveform,
    pub modulator_hz: f32,
    pub modulation_index: f32,
    pub phase: f32,
    pub modulator_phase: f32,
    pub sequence: &'static [i32],
    pub current_note: usize,
    pub resonance: f32,
    pub volume: f32,
    pub behavior: VoiceBehavior,
    history: SampleHistory,
    rng: StdRng,
}

#[inline]
fn wrap_unit(x: f32) -> f32 {
    let w = x.rem_euclid(1.0);
    if w.is_finite() && w < 1.0 {
        w
    } else {
        0.0
    }
}

impl FmVoice {
    pub fn new(slot: usize, config: &VoiceConfig, seed: u64) -> CoreResult<Self> {
        if config.sequence.is_empty() {
            return Err(CoreError::EmptySequence(slot));
        }
        let behavior = match config.kind {
            VoiceKind::Lead => VoiceBehavior::Lead {
                filter: OnePoleLowpass::new(1.0),
                modulator_offset_hz: 0.0,
            },
            VoiceKind::Rhythmic => VoiceBehavior::Rhythmic {
                envelope: Envelope::pluck(),
                filter: ResonantLowpass::new(),
            },
            VoiceKind::Arpeggio(mode) => VoiceBehavior::Arpeggio {
                mode,
                descending: mode.starts_descending(),
                envelope: Envelope::gate(),
                filter: ResonantLowpass::new(),
            },
            VoiceKind::Constant => VoiceBehavior::Constant,
        };
        let current_note = match config.kind {
            VoiceKind::Arpeggio(mode) if mode.starts_descending() => config.sequence.len() - 1,
            _ => 0,
        };
        Ok(Self {
            carrier_hz: config.carrier_hz,
            shape: config.shape,
            modulator_hz: config.modulator_hz,
            modulation_index: config.modulation_index.max(0.0),
            phase: 0.0,
            modulator_phase: 0.0,
            sequence: config.sequence,
            current_note,
            resonance: config.resonance.max(0.0),
            volume: config.volume.clamp(0.0, 1.0),
            behavior,
            history: SampleHistory::default(),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn kind(&self) -> VoiceKind {
        match &self.behavior {
            VoiceBehavior::Lead { .. } => VoiceKind::Lead,
            VoiceBehavior::Rhythmic { .. } => VoiceKind::Rhythmic,
            VoiceBehavior::Arpeggio { mode, .. } => VoiceKind::Arpeggio(*mode),
            VoiceBehavior::Constant => VoiceKind::Constant,
        }
    }

    pub fn history(&self) -> &[f32] {
        self.history.as_slice()
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Switch the arpeggio stepping mode; restarts from the mode's first note.
    /// No effect on other behaviors.
    pub fn set_arp_mode(&mut self, new_mode: ArpMode) {
        let last = self.sequence.len() - 1;
        if let VoiceBehavior::Arpeggio {
            mode, descending, ..
        } = &mut self.behavior
        {
            *mode = new_mode;
            *descending = new_mode.starts_descending();
            self.current_note = if *descending { last } else { 0 };
        }
    }

    pub fn arp_mode(&self) -> Option<ArpMode> {
        match &self.behavior {
            VoiceBehavior::Arpeggio { mode, .. } => Some(*mode),
            _ => None,
        }
    }

    /// Lead only: user offset added on top of the rope-derived modulator rate.
    pub fn nudge_modulator(&mut self, delta_hz: f32) {
        if let VoiceBehavior::Lead {
            modulator_offset_hz,
            ..
        } = &mut self.behavior
        {
            *modulator_offset_hz += delta_hz;
        } else {
            self.modulator_hz = (self.modulator_hz + delta_hz).max(0.0);
        }
    }

    pub fn nudge_modulation_index(&mut self, delta: f32) {
        self.modulation_index = (self.modulation_index + delta).max(0.0);
    }

    pub fn toggle_volume(&mut self, on_volume: f32) {
        self.volume = if self.volume == 0.0 { on_volume } else { 0.0 };
    }

    fn lead_modulator_offset(&self) -> f32 {
        match &self.behavior {
            VoiceBehavior::Lead {
                modulator_offset_hz,
                ..
            } => *modulator_offset_hz,
            _ => 0.0,
        }
    }

    fn reroll_note(&mut self) {
        self.current_note = self.rng.gen_range(0..self.sequence.len());
    }

    fn step_arpeggio(&mut self) {
        let len = self.sequence.len();
        let idx = self.current_note.min(len - 1);
        let VoiceBehavior::Arpeggio {
            mode, descending, ..
        } = &mut self.behavior
        else {
            return;
        };
        if len == 1 {
            self.current_note = 0;
            return;
        }
        self.current_note = match *mode {
            ArpMode::Up => (idx + 1) % len,
            ArpMode::Down => (idx + len - 1) % len,
            ArpMode::UpDown | ArpMode::DownUp => {
                if *descending {
                    if idx == 0 {
                        *descending = false;
                        1
                    } else {
                        idx - 1
                    }
                } else if idx + 1 >= len {
                    *descending = true;
                    len - 2
                } else {
                    idx + 1
                }
            }
            ArpMode::Random => self.rng.gen_range(0..len),
        };
    }

    fn sequence_hz(&self) -> f32 {
        let idx = self.current_note.min(self.sequence.len() - 1);
        midi_to_hz(self.sequence[idx] as f32)
    }

    /// Shared FM oscillator: advances both phases, records the pre-filter
    /// sample and returns it (already scaled by volume).
    #[inline]
    fn oscillate(&mut self, running_index: u64, sample_rate: f32) -> f32 {
        let mod_signal = (TAU * self.modulator_phase).sin() * self.modulation_index;
        let instantaneous_hz = self.carrier_hz + mod_signal * self.carrier_hz;
        self.phase = wrap_unit(self.phase + instantaneous_hz / sample_rate);

        let sample = self.shape.sample(self.phase) * self.volume;

        self.modulator_phase = wrap_unit(self.modulator_phase + self.modulator_hz / sample_rate);
        self.history.record(running_index, sample);
        sample
    }

    /// Produce this voice's next output sample. Must be called once per
    /// output frame, in slot order.
    pub fn generate_sample(&mut self, running_index: u64, ctx: &VoiceContext) -> f32 {
        if ctx.sample_rate.is_nan() || ctx.sample_rate <= 0.0 {
            return 0.0;
        }
        let rope_length = ctx.rope.length();

        match self.kind() {
            VoiceKind::Lead => {
                let offset = self.lead_modulator_offset();
                self.carrier_hz = frequency_from_direction(&ctx.rope, self.sequence);
                self.modulator_hz = (modulator_from_length(rope_length) + offset).max(0.0);
            }
            VoiceKind::Rhythmic | VoiceKind::Constant => {
                if ctx.beat_triggered {
                    self.reroll_note();
                }
                self.carrier_hz = self.sequence_hz();
            }
            VoiceKind::Arpeggio(_) => {
                if ctx.sub_beat_triggered {
                    self.step_arpeggio();
                }
                self.carrier_hz = self.sequence_hz();
            }
        }

        let raw = self.oscillate(running_index, ctx.sample_rate);
        let resonance = self.resonance;

        match &mut self.behavior {
            VoiceBehavior::Lead { filter, .. } => {
                let cutoff =
                    cutoff_from_length(rope_length, MIN_CUTOFF_HZ, MAX_CUTOFF_HZ, MAX_ROPE_LENGTH);
                filter.set_cutoff(cutoff, ctx.sample_rate);
                filter.process(raw)
            }
            VoiceBehavior::Rhythmic { envelope, filter } => {
                let cutoff = cutoff_from_length(
                    rope_length,
                    MIN_RESONANT_CUTOFF_HZ,
                    MAX_RESONANT_CUTOFF_HZ,
                    MAX_ROPE_LENGTH,
                );
                let filtered = filter.process(raw, cutoff, resonance, ctx.sample_rate);
                envelope.apply(filtered, ctx.beat_phase)
            }
            VoiceBehavior::Arpeggio {
                envelope, filter, ..
            } => {
                let cutoff = cutoff_from_length(
                    rope_length,
                    MIN_RESONANT_CUTOFF_HZ,
                    MAX_RESONANT_CUTOFF_HZ,
                    MAX_ROPE_LENGTH,
                );
                let filtered = filter.process(raw, cutoff, resonance, ctx.sample_rate);
                envelope.apply(filtered, ctx.sub_beat_phase)
            }
            VoiceBehavior::Constant => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_unit_keeps_phase_in_range() {
        assert_eq!(wrap_unit(0.25), 0.25);
        assert!((wrap_unit(1.25) - 0.25).abs() < 1e-6);
        assert!((wrap_unit(-0.25) - 0.75).abs() < 1e-6);
        assert_eq!(wrap_unit(f32::NAN), 0.0);
        assert_eq!(wrap_unit(f32::INFINITY), 0.0);
        // rem_euclid can round up to exactly 1.0 for tiny negatives
        assert!(wrap_unit(-1e-10) < 1.0);
    }

    #[test]
    fn arp_mode_cycles_through_all() {
        let mut m = ArpMode::Up;
        for _ in 0..ArpMode::ALL.len() {
            m = m.next();
        }
        assert_eq!(m, ArpMode::Up);
        assert!(ArpMode::DownUp.starts_descending());
        assert!(!ArpMode::UpDown.starts_descending());
    }
}
