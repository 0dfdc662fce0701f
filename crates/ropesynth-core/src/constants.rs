use glam::Vec2;

// Shared audio/physics/visual tuning constants used by the core and the native frontend.

// Audio
pub const SAMPLE_RATE: u32 = 44_100;
pub const CHANNELS: u16 = 2;
pub const VOICE_COUNT: usize = 4; // simultaneous FM voices
pub const HISTORY_SIZE: usize = 400; // per-voice samples kept for the waveform view
pub const SEQ_SIZE: usize = 8;
pub const SCALE_SIZE: usize = 10;
pub const COMMAND_QUEUE_CAPACITY: usize = 64;

// Default palette for the four voices (lead, rhythm, arpeggio, drone)
pub const DEFAULT_VOICE_COLORS: [[f32; 3]; VOICE_COUNT] = [
    [0.9, 0.3, 0.3], // red-ish
    [0.3, 0.9, 0.4], // green-ish
    [0.3, 0.5, 0.9], // blue-ish
    [0.7, 0.4, 0.9], // purple-ish
];

// Transport
pub const DEFAULT_BPM: u32 = 60;
pub const MIN_BPM: u32 = 20;
pub const MAX_BPM: u32 = 300;
pub const SUB_BEATS_PER_BEAT: u32 = 4;
pub const MAX_SUB_BEATS_PER_BEAT: u32 = 16;
pub const PHYSICS_STEP_SEC: f32 = 1.0 / 60.0; // fixed rope step, independent of host frame rate

// Window (world space is in these pixel units)
pub const WINDOW_WIDTH: f32 = 800.0;
pub const WINDOW_HEIGHT: f32 = 800.0;

// Rope
pub const ROPE_POINTS: usize = 15;
pub const ROPE_REST_LENGTH: f32 = 100.0;
pub const ROPE_ITERATIONS: usize = 10;
pub const ROPE_DAMPING: f32 = 0.99; // velocity kept per step
pub const ROPE_STIFFNESS: f32 = 1.0;
pub const ROPE_GRAB_RADIUS: f32 = 100.0;
pub const ROPE_GRAVITY: Vec2 = Vec2::new(0.0, 800.0); // +y points down the screen
pub const ROPE_DISTANCE_EPSILON: f32 = 1e-4;
pub const ROPE_WALL_RESTITUTION: f32 = 0.6;
pub const MAX_ROPE_LENGTH: f32 = 400.0;

// Rope -> synth mapping
pub const MIN_CUTOFF_HZ: f32 = 100.0;
pub const MAX_CUTOFF_HZ: f32 = 4000.0;
pub const MIN_RESONANT_CUTOFF_HZ: f32 = 100.0;
pub const MAX_RESONANT_CUTOFF_HZ: f32 = 10_000.0;
pub const MIN_MOD_HZ: f32 = 0.0;
pub const MAX_MOD_HZ: f32 = 6.0; // sub-audio: slow vibrato on the lead
pub const MIN_FILTER_HZ: f32 = 20.0;

// Controls
pub const LEAD_SLOT: usize = 0; // voice the W/S/A/D keys adjust
pub const VOICE_ON_VOLUME: f32 = 0.5;
pub const MOD_FREQ_STEP_HZ: f32 = 1.0; // per frame while held
pub const MOD_INDEX_STEP: f32 = 0.1;
pub const BPM_STEP: u32 = 5;

// Circular waveform view
pub const MIN_WAVEFORM_RADIUS: f32 = 100.0;
pub const MAX_WAVEFORM_RADIUS: f32 = 250.0;
pub const WAVEFORM_AMPLITUDE_MULTIPLIER: f32 = 20.0;
pub const MIN_WAVEFORM_SEPARATION: f32 = 30.0;
pub const MAX_WAVEFORM_SEPARATION: f32 = 50.0;
pub const GRAPHICS_LERP_SPEED: f32 = 4.0;
pub const MIN_BRIGHTNESS: f32 = 100.0 / 255.0;
pub const MAX_BRIGHTNESS: f32 = 200.0 / 255.0;

// Note grid
pub const MIN_GRIDLINE_RADIUS: f32 = 60.0;
pub const MAX_GRIDLINE_RADIUS: f32 = 110.0;
pub const NOTE_DISPLAY_RADIUS: f32 = 80.0;

#[inline]
pub fn window_center() -> Vec2 {
    Vec2::new(WINDOW_WIDTH * 0.5, WINDOW_HEIGHT * 0.5)
}
