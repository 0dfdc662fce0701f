//! Rope geometry → synth parameters.

use glam::Vec2;

use crate::constants::{MAX_MOD_HZ, MAX_ROPE_LENGTH, MIN_MOD_HZ};
use crate::scales::midi_to_hz;

/// The part of the rope the audio thread needs: anchor and free end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RopeGeometry {
    pub start: Vec2,
    pub end: Vec2,
}

impl Default for RopeGeometry {
    fn default() -> Self {
        Self {
            start: Vec2::ZERO,
            end: Vec2::new(0.0, 100.0),
        }
    }
}

impl RopeGeometry {
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    /// Start-to-end Euclidean distance.
    pub fn length(&self) -> f32 {
        self.end.distance(self.start)
    }

    /// Direction angle in degrees, `atan2` convention (−180, 180].
    pub fn angle_degrees(&self) -> f32 {
        let d = self.direction();
        d.y.atan2(d.x).to_degrees()
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Which of `sectors` equal slices of the circle an `atan2`-style angle falls in.
///
/// The angle is shifted by +180° so a direction pointing along −x lands on
/// sector 0; boundaries sit exactly on multiples of `360 / sectors`.
pub fn sector_index(angle_degrees: f32, sectors: usize) -> usize {
    if sectors == 0 || !angle_degrees.is_finite() {
        return 0;
    }
    let step = 360.0 / sectors as f32;
    let normalized = (angle_degrees + 180.0).rem_euclid(360.0);
    (normalized / step) as usize % sectors
}

/// Lead voice carrier: the scale entry for the rope's direction sector.
pub fn frequency_from_direction(rope: &RopeGeometry, scale: &[i32]) -> f32 {
    if scale.is_empty() {
        return 0.0;
    }
    let index = sector_index(rope.angle_degrees(), scale.len());
    midi_to_hz(scale[index] as f32)
}

/// Linear map of rope length in `[0, max_rope_length]` onto `[min_cut, max_cut]`.
pub fn cutoff_from_length(rope_length: f32, min_cut: f32, max_cut: f32, max_rope_length: f32) -> f32 {
    if max_rope_length.is_nan() || max_rope_length <= 0.0 {
        return min_cut;
    }
    let t = (rope_length / max_rope_length).clamp(0.0, 1.0);
    lerp(min_cut, max_cut, t)
}

/// Lead modulator rate from rope length (sub-audio vibrato).
pub fn modulator_from_length(rope_length: f32) -> f32 {
    cutoff_from_length(rope_length, MIN_MOD_HZ, MAX_MOD_HZ, MAX_ROPE_LENGTH)
}
