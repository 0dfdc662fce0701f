use crate::error::{CoreError, CoreResult};
use crate::mapping::lerp;

/// Attack/decay/sustain/release shape over one cycle.
///
/// `attack`, `decay` and `release` are fractions of the cycle (a beat or a
/// sub-beat); `sustain` is a level. The phase is supplied by the caller from
/// the transport clock every sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Envelope {
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> CoreResult<Self> {
        let parts = [attack, decay, release];
        if let Some(bad) = parts.into_iter().find(|p| !(p.is_finite() && *p >= 0.0)) {
            return Err(CoreError::OutOfUnitRange {
                name: "envelope segment",
                value: bad,
            });
        }
        let total = attack + decay + release;
        if total > 1.0 {
            return Err(CoreError::OutOfUnitRange {
                name: "attack + decay + release",
                value: total,
            });
        }
        Ok(Self {
            attack,
            decay,
            sustain: sustain.clamp(0.0, 1.0),
            release,
        })
    }

    /// Percussive pluck: quick rise, decay to silence across the beat.
    pub const fn pluck() -> Self {
        Self {
            attack: 0.1,
            decay: 0.9,
            sustain: 0.0,
            release: 0.0,
        }
    }

    /// Short gate for arpeggio steps.
    pub const fn gate() -> Self {
        Self {
            attack: 0.05,
            decay: 0.25,
            sustain: 0.6,
            release: 0.3,
        }
    }

    /// Gain at `phase` in `[0, 1]` (clamped).
    pub fn gain(&self, phase: f32) -> f32 {
        let phase = if phase.is_finite() { phase.clamp(0.0, 1.0) } else { 0.0 };
        if phase < self.attack {
            phase / self.attack
        } else if phase < self.attack + self.decay {
            lerp(1.0, self.sustain, (phase - self.attack) / self.decay)
        } else if phase < 1.0 - self.release || self.release <= 0.0 {
            self.sustain
        } else {
            let t = (phase - (1.0 - self.release)) / self.release;
            lerp(self.sustain, 0.0, t.min(1.0))
        }
    }

    #[inline]
    pub fn apply(&self, sample: f32, phase: f32) -> f32 {
        sample * self.gain(phase)
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::pluck()
    }
}
