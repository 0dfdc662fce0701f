//! Voice bank and the audio callback body.

use crate::constants::{DEFAULT_VOICE_COLORS, SAMPLE_RATE, VOICE_COUNT, VOICE_ON_VOLUME};
use crate::error::{CoreError, CoreResult};
use crate::link::{AudioLink, FrameSnapshot, SynthCommand};
use crate::mapping::RopeGeometry;
use crate::scales::{ARPEGGIO_SEQUENCE, BASS_SEQUENCE, CONST_SEQUENCE, PENTATONIC_SCALE};
use crate::voice::{ArpMode, FmVoice, VoiceConfig, VoiceContext, VoiceKind, Waveform};

#[derive(Clone, Debug)]
pub struct EngineParams {
    pub sample_rate: u32,
    pub seed: u64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            seed: 42,
        }
    }
}

/// Slot layout: lead, rhythmic bass, arpeggio, constant drone. All start muted.
pub fn default_voice_configs() -> Vec<VoiceConfig> {
    vec![
        VoiceConfig {
            kind: VoiceKind::Lead,
            shape: Waveform::Sawtooth,
            carrier_hz: 440.0,
            modulator_hz: 4.0,
            modulation_index: 0.01,
            sequence: PENTATONIC_SCALE,
            resonance: 0.0,
            volume: 0.0,
            color_rgb: DEFAULT_VOICE_COLORS[0],
        },
        VoiceConfig {
            kind: VoiceKind::Rhythmic,
            shape: Waveform::Square,
            carrier_hz: 660.0,
            modulator_hz: 440.0,
            modulation_index: 0.0,
            sequence: BASS_SEQUENCE,
            resonance: 1.5,
            volume: 0.0,
            color_rgb: DEFAULT_VOICE_COLORS[1],
        },
        VoiceConfig {
            kind: VoiceKind::Arpeggio(ArpMode::UpDown),
            shape: Waveform::Sawtooth,
            carrier_hz: 60.0,
            modulator_hz: 440.0,
            modulation_index: 0.0,
            sequence: ARPEGGIO_SEQUENCE,
            resonance: 0.7,
            volume: 0.0,
            color_rgb: DEFAULT_VOICE_COLORS[2],
        },
        VoiceConfig {
            kind: VoiceKind::Constant,
            shape: Waveform::Sine,
            carrier_hz: 220.0,
            modulator_hz: 440.0,
            modulation_index: 0.0,
            sequence: CONST_SEQUENCE,
            resonance: 0.0,
            volume: 0.0,
            color_rgb: DEFAULT_VOICE_COLORS[3],
        },
    ]
}

/// Per-buffer inputs latched once at the top of the callback.
#[derive(Clone, Copy, Debug)]
pub struct BufferInput {
    pub rope: RopeGeometry,
    pub beat: bool,
    pub sub_beat: bool,
    pub beat_period: f32,
    pub sub_beat_period: f32,
}

impl BufferInput {
    pub fn from_snapshot(snapshot: &FrameSnapshot, beat: bool, sub_beat: bool) -> Self {
        Self {
            rope: snapshot.rope,
            beat,
            sub_beat,
            beat_period: snapshot.beat_period(),
            sub_beat_period: snapshot.sub_beat_period(),
        }
    }
}

pub struct Mixer {
    voices: Vec<FmVoice>,
    sample_rate: f32,
    running_index: u64,
    beat_elapsed: f32,
    sub_beat_elapsed: f32,
}

impl Mixer {
    pub fn new(configs: &[VoiceConfig], params: &EngineParams) -> CoreResult<Self> {
        if params.sample_rate == 0 {
            return Err(CoreError::InvalidSampleRate(params.sample_rate));
        }
        if configs.is_empty() || configs.len() > VOICE_COUNT {
            return Err(CoreError::VoiceCount {
                expected: VOICE_COUNT,
                got: configs.len(),
            });
        }
        // Derive per-voice RNG seeds from the base seed so voices re-roll independently
        let voices = configs
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let mix = params.seed ^ (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                FmVoice::new(i, c, mix)
            })
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self {
            voices,
            sample_rate: params.sample_rate as f32,
            running_index: 0,
            beat_elapsed: 0.0,
            sub_beat_elapsed: 0.0,
        })
    }

    pub fn voices(&self) -> &[FmVoice] {
        &self.voices
    }

    pub fn running_index(&self) -> u64 {
        self.running_index
    }

    pub fn apply(&mut self, command: SynthCommand) {
        match command {
            SynthCommand::ToggleVoice(i) => {
                if let Some(v) = self.voices.get_mut(i) {
                    v.toggle_volume(VOICE_ON_VOLUME);
                }
            }
            SynthCommand::SetVolume { voice, volume } => {
                if let Some(v) = self.voices.get_mut(voice) {
                    v.volume = volume.clamp(0.0, 1.0);
                }
            }
            SynthCommand::NudgeModulator { voice, delta_hz } => {
                if let Some(v) = self.voices.get_mut(voice) {
                    v.nudge_modulator(delta_hz);
                }
            }
            SynthCommand::NudgeModIndex { voice, delta } => {
                if let Some(v) = self.voices.get_mut(voice) {
                    v.nudge_modulation_index(delta);
                }
            }
            SynthCommand::SetArpMode(mode) => {
                for v in &mut self.voices {
                    v.set_arp_mode(mode);
                }
            }
            SynthCommand::Reseed { voice, seed } => {
                if let Some(v) = self.voices.get_mut(voice) {
                    v.reseed(seed);
                }
            }
        }
    }

    /// Mix one frame: every voice once, in slot order, averaged.
    fn next_frame(&mut self, ctx: &VoiceContext) -> f32 {
        let mut acc = 0.0f32;
        for voice in &mut self.voices {
            acc += voice.generate_sample(self.running_index, ctx);
        }
        self.running_index = self.running_index.wrapping_add(1);
        acc / self.voices.len() as f32
    }

    /// Fill an interleaved buffer with `out.len() / channels` frames.
    ///
    /// Triggers in `input` are delivered to every voice on the buffer's first
    /// frame; each voice therefore sees a latched trigger exactly once.
    pub fn render(&mut self, out: &mut [f32], channels: usize, input: &BufferInput) {
        if channels == 0 {
            return;
        }
        if input.beat {
            self.beat_elapsed = 0.0;
        }
        if input.sub_beat {
            self.sub_beat_elapsed = 0.0;
        }
        let whole = out.len() - out.len() % channels;
        out[whole..].fill(0.0);
        let dt = 1.0 / self.sample_rate;
        let beat_period = input.beat_period.max(f32::EPSILON);
        let sub_beat_period = input.sub_beat_period.max(f32::EPSILON);

        for (n, frame) in out[..whole].chunks_exact_mut(channels).enumerate() {
            let ctx = VoiceContext {
                rope: input.rope,
                beat_triggered: input.beat && n == 0,
                sub_beat_triggered: input.sub_beat && n == 0,
                beat_phase: (self.beat_elapsed / beat_period).min(1.0),
                sub_beat_phase: (self.sub_beat_elapsed / sub_beat_period).min(1.0),
                sample_rate: self.sample_rate,
            };
            let sample = self.next_frame(&ctx);
            frame.fill(sample);
            self.beat_elapsed += dt;
            self.sub_beat_elapsed += dt;
        }
    }

    /// Full audio callback: apply queued commands, latch triggers and rope
    /// geometry, render, then clear the triggers the buffer consumed.
    pub fn process(&mut self, link: &mut AudioLink, out: &mut [f32], channels: usize) {
        if channels == 0 || out.len() < channels {
            out.fill(0.0);
            return;
        }
        while let Some(command) = link.pop_command() {
            self.apply(command);
        }
        let snapshot = link.snapshot();
        let (beat, sub_beat) = link.peek_triggers();
        let input = BufferInput::from_snapshot(&snapshot, beat, sub_beat);

        self.render(out, channels, &input);

        link.clear_triggers(beat, sub_beat);
        link.publish_scope(&self.voices, self.running_index);
    }
}
