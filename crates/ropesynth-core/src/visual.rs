//! Renderer-side geometry built from rope state and voice scopes.
//!
//! Everything here is platform independent; the native frontend uploads the
//! resulting [`LineVertex`] list as a line-list and draws it in one call.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::constants::{
    GRAPHICS_LERP_SPEED, MAX_BRIGHTNESS, MAX_GRIDLINE_RADIUS, MAX_ROPE_LENGTH,
    MAX_WAVEFORM_RADIUS, MAX_WAVEFORM_SEPARATION, MIN_BRIGHTNESS, MIN_GRIDLINE_RADIUS,
    MIN_WAVEFORM_RADIUS, MIN_WAVEFORM_SEPARATION, NOTE_DISPLAY_RADIUS, VOICE_COUNT,
    WAVEFORM_AMPLITUDE_MULTIPLIER, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::mapping::{lerp, sector_index, RopeGeometry};
use crate::scales::note_name;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

/// World (window pixel, +y down) → clip space.
#[inline]
pub fn world_to_clip(p: Vec2) -> [f32; 2] {
    [p.x / WINDOW_WIDTH * 2.0 - 1.0, 1.0 - p.y / WINDOW_HEIGHT * 2.0]
}

/// Accumulates line segments as a line-list.
#[derive(Default)]
pub struct LineBatch {
    pub vertices: Vec<LineVertex>,
}

impl LineBatch {
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn segment(&mut self, a: Vec2, b: Vec2, color: [f32; 4]) {
        self.vertices.push(LineVertex {
            pos: world_to_clip(a),
            color,
        });
        self.vertices.push(LineVertex {
            pos: world_to_clip(b),
            color,
        });
    }

    pub fn polyline(&mut self, points: &[Vec2], color: [f32; 4], closed: bool) {
        for w in points.windows(2) {
            self.segment(w[0], w[1], color);
        }
        if closed && points.len() > 2 {
            self.segment(points[points.len() - 1], points[0], color);
        }
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        const SEGMENTS: usize = 16;
        let pts: Vec<Vec2> = (0..SEGMENTS)
            .map(|i| {
                let a = i as f32 / SEGMENTS as f32 * TAU;
                center + Vec2::new(a.cos(), a.sin()) * radius
            })
            .collect();
        self.polyline(&pts, color, true);
    }
}

/// Grey level for a voice ring, graded from dim (slot 0) to bright.
pub fn voice_brightness(slot: usize) -> f32 {
    (slot as f32 / VOICE_COUNT as f32) * (MAX_BRIGHTNESS - MIN_BRIGHTNESS) + MIN_BRIGHTNESS
}

/// Smoothed layout of the circular waveform rings. Radius and spacing follow
/// the rope length.
#[derive(Clone, Copy, Debug)]
pub struct WaveformView {
    pub center: Vec2,
    pub radius: f32,
    pub separation: f32,
}

impl WaveformView {
    pub fn new(center: Vec2) -> Self {
        Self {
            center,
            radius: MIN_WAVEFORM_RADIUS,
            separation: MIN_WAVEFORM_SEPARATION,
        }
    }

    pub fn update(&mut self, rope_length: f32, dt: f32) {
        let t = rope_length / MAX_ROPE_LENGTH;
        let target_radius = lerp(MIN_WAVEFORM_RADIUS, MAX_WAVEFORM_RADIUS, t);
        let target_separation = lerp(MIN_WAVEFORM_SEPARATION, MAX_WAVEFORM_SEPARATION, t);
        let k = (GRAPHICS_LERP_SPEED * dt).clamp(0.0, 1.0);
        self.radius = lerp(self.radius, target_radius, k);
        self.separation = lerp(self.separation, target_separation, k);
    }

    /// Closed loop of one voice's history wrapped around the centre.
    pub fn ring(&self, slot: usize, history: &[f32]) -> Vec<Vec2> {
        let base = self.radius + slot as f32 * self.separation;
        let n = history.len().max(1) as f32;
        history
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let angle = i as f32 / n * TAU;
                let r = base + s * WAVEFORM_AMPLITUDE_MULTIPLIER;
                self.center + Vec2::new(angle.cos(), angle.sin()) * r
            })
            .collect()
    }
}

/// Alternate layout: one horizontal trace per voice across the window.
pub fn horizontal_trace(slot: usize, history: &[f32]) -> Vec<Vec2> {
    let y = WINDOW_HEIGHT / 2.0 + slot as f32 * 100.0 - 150.0;
    let step = WINDOW_WIDTH / history.len().max(1) as f32;
    history
        .iter()
        .enumerate()
        .map(|(i, s)| Vec2::new(i as f32 * step, y + s * 100.0))
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoteLabel {
    pub position: Vec2,
    pub active: bool,
}

/// Sector spokes and label anchors matching the lead voice's direction mapping.
#[derive(Clone, Debug)]
pub struct NoteGrid {
    pub center: Vec2,
    pub scale: &'static [i32],
}

impl NoteGrid {
    fn step_degrees(&self) -> f32 {
        360.0 / self.scale.len().max(1) as f32
    }

    /// `atan2`-convention angle of sector boundary `k`.
    fn boundary_degrees(&self, k: usize) -> f32 {
        k as f32 * self.step_degrees() - 180.0
    }

    pub fn spokes(&self) -> Vec<(Vec2, Vec2)> {
        (0..self.scale.len())
            .map(|k| {
                let a = self.boundary_degrees(k).to_radians();
                let dir = Vec2::new(a.cos(), a.sin());
                (
                    self.center + dir * MIN_GRIDLINE_RADIUS,
                    self.center + dir * MAX_GRIDLINE_RADIUS,
                )
            })
            .collect()
    }

    pub fn active_sector(&self, rope: &RopeGeometry) -> usize {
        sector_index(rope.angle_degrees(), self.scale.len())
    }

    /// Name of the note the lead voice currently plays, if the grid has any.
    pub fn active_note(&self, rope: &RopeGeometry) -> Option<String> {
        self.scale
            .get(self.active_sector(rope))
            .map(|midi| note_name(*midi))
    }

    pub fn labels(&self, rope: &RopeGeometry) -> Vec<NoteLabel> {
        let active = self.active_sector(rope);
        let half = self.step_degrees() * 0.5;
        self.scale
            .iter()
            .enumerate()
            .map(|(k, _)| {
                let a = (self.boundary_degrees(k) + half).to_radians();
                NoteLabel {
                    position: self.center + Vec2::new(a.cos(), a.sin()) * NOTE_DISPLAY_RADIUS,
                    active: k == active,
                }
            })
            .collect()
    }
}
