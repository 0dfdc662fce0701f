//! Verlet-style constrained particle chain pinned at one end.
//!
//! The rope is stepped at a fixed cadence by the frame context. Each step
//! integrates gravity, relaxes the distance constraints, recovers velocities
//! from the actual displacement and applies pointer dragging. The anchor
//! (`points[0]`) always equals `start` after a step.

use glam::Vec2;

use crate::constants::{
    ROPE_DAMPING, ROPE_DISTANCE_EPSILON, ROPE_GRAB_RADIUS, ROPE_ITERATIONS, ROPE_POINTS,
    ROPE_REST_LENGTH, ROPE_STIFFNESS, ROPE_WALL_RESTITUTION,
};
use crate::error::{CoreError, CoreResult};
use crate::mapping::RopeGeometry;

/// Axis-aligned box the free points bounce off when enabled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

#[derive(Clone, Copy, Debug)]
pub struct RopeParams {
    pub points: usize,
    pub rest_length: f32,
    pub iterations: usize,
    pub damping: f32,
    pub stiffness: f32,
    pub grab_radius: f32,
    pub bounds: Option<Bounds>,
    pub restitution: f32,
    pub color_rgb: [f32; 3],
}

impl Default for RopeParams {
    fn default() -> Self {
        Self {
            points: ROPE_POINTS,
            rest_length: ROPE_REST_LENGTH,
            iterations: ROPE_ITERATIONS,
            damping: ROPE_DAMPING,
            stiffness: ROPE_STIFFNESS,
            grab_radius: ROPE_GRAB_RADIUS,
            bounds: None,
            restitution: ROPE_WALL_RESTITUTION,
            color_rgb: [0.5, 0.5, 0.5],
        }
    }
}

/// Pointer position plus the primary button state, in world (window pixel) units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub pressed: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct DragState {
    active: bool,
    last_position: Vec2,
}

#[derive(Clone, Debug)]
pub struct Rope {
    start: Vec2,
    end: Vec2,
    end_prev: Vec2,
    points: Vec<Vec2>,
    velocities: Vec<Vec2>,
    pub damping: f32,
    pub stiffness: f32,
    pub color_rgb: [f32; 3],
    rest_length: f32,
    iterations: usize,
    grab_radius: f32,
    bounds: Option<Bounds>,
    restitution: f32,
    drag: DragState,
}

fn check_unit(name: &'static str, value: f32) -> CoreResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(CoreError::OutOfUnitRange { name, value })
    }
}

impl Rope {
    /// Lay the chain out from `start` towards `end` at rest spacing, so the
    /// rope begins tension-free. `end` gives the direction only: the free end
    /// lands `rest_length` from `start`, wherever `end` was. A zero-length
    /// `start → end` hangs straight down.
    pub fn new(start: Vec2, end: Vec2, params: RopeParams) -> CoreResult<Self> {
        if params.points < 2 {
            return Err(CoreError::TooFewRopePoints(params.points));
        }
        if !(params.rest_length.is_finite() && params.rest_length > 0.0) {
            return Err(CoreError::InvalidRestLength(params.rest_length));
        }
        check_unit("damping", params.damping)?;
        check_unit("stiffness", params.stiffness)?;

        let dir = (end - start).try_normalize().unwrap_or(Vec2::Y);
        let spacing = params.rest_length / (params.points - 1) as f32;
        let points: Vec<Vec2> = (0..params.points)
            .map(|i| start + dir * spacing * i as f32)
            .collect();
        let last = points[points.len() - 1];

        Ok(Self {
            start,
            end: last,
            end_prev: last,
            velocities: vec![Vec2::ZERO; points.len()],
            points,
            damping: params.damping,
            stiffness: params.stiffness,
            color_rgb: params.color_rgb,
            rest_length: params.rest_length,
            iterations: params.iterations,
            grab_radius: params.grab_radius,
            bounds: params.bounds,
            restitution: params.restitution,
            drag: DragState::default(),
        })
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn end(&self) -> Vec2 {
        self.end
    }

    /// Free end position before the most recent step.
    pub fn end_prev(&self) -> Vec2 {
        self.end_prev
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn velocities(&self) -> &[Vec2] {
        &self.velocities
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.active
    }

    pub fn geometry(&self) -> RopeGeometry {
        RopeGeometry {
            start: self.start,
            end: self.end,
        }
    }

    /// Sum of the distances between adjacent points.
    pub fn chain_length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    fn segment_target(&self) -> f32 {
        self.rest_length / (self.points.len() - 1) as f32
    }

    /// One constraint relaxation pass over every adjacent pair.
    pub fn relax(&mut self) {
        self.points[0] = self.start;
        let target = self.segment_target();
        for i in 0..self.points.len() - 1 {
            let delta = self.points[i + 1] - self.points[i];
            let dist = delta.length();
            if dist <= ROPE_DISTANCE_EPSILON {
                continue;
            }
            let correction = delta * (0.5 * self.stiffness * (dist - target) / dist);
            if i > 0 {
                self.points[i] += correction;
            }
            self.points[i + 1] -= correction;
        }
    }

    /// Advance the rope by `dt` seconds. Non-positive or non-finite `dt` is ignored.
    pub fn step(
        &mut self,
        gravity: Vec2,
        damping_override: Option<f32>,
        dt: f32,
        pointer: PointerState,
    ) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        self.end_prev = self.end;
        let old_points = self.points.clone();

        for (p, v) in self.points.iter_mut().zip(self.velocities.iter_mut()).skip(1) {
            *v += gravity * dt;
            *p += *v * dt;
        }

        for _ in 0..self.iterations {
            self.relax();
        }

        let damping = damping_override.unwrap_or(self.damping);
        for ((v, p), old) in self
            .velocities
            .iter_mut()
            .zip(self.points.iter())
            .zip(old_points.iter())
        {
            *v = (*p - *old) * (damping / dt);
        }

        if let Some(bounds) = self.bounds {
            self.bounce(bounds);
        }

        self.apply_pointer(pointer, dt);

        let last = self.points.len() - 1;
        self.end = self.points[last];
        self.points[0] = self.start;
        self.velocities[0] = Vec2::ZERO;
    }

    fn bounce(&mut self, bounds: Bounds) {
        let restitution = self.restitution;
        for (p, v) in self.points.iter_mut().zip(self.velocities.iter_mut()).skip(1) {
            if p.x < bounds.min.x || p.x > bounds.max.x {
                p.x = p.x.clamp(bounds.min.x, bounds.max.x);
                v.x = -v.x * restitution;
            }
            if p.y < bounds.min.y || p.y > bounds.max.y {
                p.y = p.y.clamp(bounds.min.y, bounds.max.y);
                v.y = -v.y * restitution;
            }
        }
    }

    fn apply_pointer(&mut self, pointer: PointerState, dt: f32) {
        let last = self.points.len() - 1;
        if pointer.pressed {
            let in_reach = pointer.position.distance(self.points[last]) <= self.grab_radius;
            if self.drag.active || in_reach {
                if !self.drag.active {
                    log::debug!(
                        "[rope] grab at ({:.1},{:.1})",
                        pointer.position.x,
                        pointer.position.y
                    );
                }
                self.points[last] = pointer.position;
                self.velocities[last] = Vec2::ZERO;
                self.drag = DragState {
                    active: true,
                    last_position: pointer.position,
                };
            }
        } else if self.drag.active {
            let flick = (pointer.position - self.drag.last_position) / dt;
            self.velocities[last] = flick;
            self.drag.active = false;
            log::debug!("[rope] release v=({:.1},{:.1})", flick.x, flick.y);
        }
    }
}
