//! Low-pass filters used by the voices.
//!
//! [`OnePoleLowpass`] is the cheap smoothing filter on the lead voice.
//! [`ResonantLowpass`] is a two-pole RBJ biquad with a resonance control used
//! by the rhythmic and arpeggio voices. They share no state or coefficients.

use std::f32::consts::PI;

use crate::constants::MIN_FILTER_HZ;

/// Smoothing coefficient for a one-pole low-pass at `cutoff_hz`.
///
/// `alpha = dt / (RC + dt)` with `RC = 1 / (2π·fc)` and `dt = 1 / sample_rate`.
pub fn alpha_from_cutoff(cutoff_hz: f32, sample_rate: f32) -> f32 {
    if !(cutoff_hz > 0.0 && sample_rate > 0.0) {
        return 0.0;
    }
    let dt = 1.0 / sample_rate;
    let rc = 1.0 / (2.0 * PI * cutoff_hz);
    dt / (rc + dt)
}

/// `y[n] = y[n-1] + alpha·(x[n] − y[n-1])`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OnePoleLowpass {
    pub alpha: f32,
    prev_output: f32,
}

impl OnePoleLowpass {
    pub fn new(alpha: f32) -> Self {
        Self::with_state(alpha, 0.0)
    }

    pub fn with_state(alpha: f32, initial_output: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            prev_output: initial_output,
        }
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32, sample_rate: f32) {
        self.alpha = alpha_from_cutoff(cutoff_hz, sample_rate);
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let y = self.prev_output + self.alpha * (input - self.prev_output);
        self.prev_output = y;
        y
    }

    pub fn output(&self) -> f32 {
        self.prev_output
    }

    pub fn reset(&mut self) {
        self.prev_output = 0.0;
    }
}

/// Two-pole/two-zero resonant low-pass (RBJ cookbook form).
///
/// Coefficients are derived per sample because the cutoff follows the rope.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResonantLowpass {
    prev_input: f32,
    prev_input2: f32,
    prev_output1: f32,
    prev_output2: f32,
}

impl ResonantLowpass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter one sample. `cutoff_hz` is clamped to `[20, sample_rate / 2]`,
    /// negative resonance is treated as 0.
    pub fn process(&mut self, input: f32, cutoff_hz: f32, resonance: f32, sample_rate: f32) -> f32 {
        if sample_rate.is_nan() || sample_rate <= 0.0 {
            return input;
        }
        let nyquist = sample_rate * 0.5;
        let cutoff = if cutoff_hz.is_finite() {
            cutoff_hz.clamp(MIN_FILTER_HZ, nyquist)
        } else {
            nyquist
        };
        let resonance = resonance.max(0.0);

        let w0 = 2.0 * PI * cutoff / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * (1.0 + resonance));

        let a0 = 1.0 + alpha;
        let b0 = (1.0 - cos_w0) * 0.5 / a0;
        let b1 = (1.0 - cos_w0) / a0;
        let b2 = b0;
        let a1 = -2.0 * cos_w0 / a0;
        let a2 = (1.0 - alpha) / a0;

        let y = b0 * input + b1 * self.prev_input + b2 * self.prev_input2
            - a1 * self.prev_output1
            - a2 * self.prev_output2;
        if !y.is_finite() {
            self.reset();
            return 0.0;
        }

        self.prev_input2 = self.prev_input;
        self.prev_input = input;
        self.prev_output2 = self.prev_output1;
        self.prev_output1 = y;
        y
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
