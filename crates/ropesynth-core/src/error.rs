use thiserror::Error;

/// Construction-time validation failures.
///
/// Real-time entry points (rope stepping, sample generation, mixing) never
/// return these; they early-return on bad input instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("rope needs at least 2 points, got {0}")]
    TooFewRopePoints(usize),
    #[error("rope rest length must be positive and finite, got {0}")]
    InvalidRestLength(f32),
    #[error("{name} must be in (0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f32 },
    #[error("sequence for voice {0} is empty")]
    EmptySequence(usize),
    #[error("sample rate must be positive, got {0}")]
    InvalidSampleRate(u32),
    #[error("bpm must be in {min}..={max}, got {0}", min = crate::constants::MIN_BPM, max = crate::constants::MAX_BPM)]
    InvalidBpm(u32),
    #[error("sub-beats per beat must be in 1..={max}, got {0}", max = crate::constants::MAX_SUB_BEATS_PER_BEAT)]
    InvalidSubBeats(u32),
    #[error("physics step must be positive and finite, got {0}")]
    InvalidPhysicsStep(f32),
    #[error("expected {expected} voice configs, got {got}")]
    VoiceCount { expected: usize, got: usize },
}

pub type CoreResult<T> = Result<T, CoreError>;
