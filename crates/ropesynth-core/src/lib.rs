//! Core of the rope instrument: a pinned particle rope whose geometry steers
//! a bank of four FM voices.
//!
//! The frame context owns a [`FrameContext`] (rope + transport); the audio
//! callback owns a [`Mixer`] (voice bank). They talk only through the
//! [`link`] pair built at startup.

pub mod constants;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod frame;
pub mod link;
pub mod mapping;
pub mod mixer;
pub mod rope;
pub mod scales;
pub mod transport;
pub mod visual;
pub mod voice;

pub static LINES_WGSL: &str = include_str!("../shaders/lines.wgsl");

pub use constants::*;
pub use envelope::Envelope;
pub use error::{CoreError, CoreResult};
pub use filter::{alpha_from_cutoff, OnePoleLowpass, ResonantLowpass};
pub use frame::{FrameContext, FrameInput};
pub use link::{link, AudioLink, FrameLink, FrameSnapshot, Scope, SynthCommand, VoiceScope};
pub use mapping::{
    cutoff_from_length, frequency_from_direction, lerp, lerp_vec2, modulator_from_length,
    sector_index, RopeGeometry,
};
pub use mixer::{default_voice_configs, BufferInput, EngineParams, Mixer};
pub use rope::{Bounds, PointerState, Rope, RopeParams};
pub use scales::{midi_to_hz, note_name};
pub use transport::{Transport, TransportParams, TransportTick};
pub use visual::{LineBatch, LineVertex, NoteGrid, WaveformView};
pub use voice::{ArpMode, FmVoice, VoiceBehavior, VoiceConfig, VoiceContext, VoiceKind, Waveform};
