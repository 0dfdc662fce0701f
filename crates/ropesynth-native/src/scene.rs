use ropesynth_core::visual::{horizontal_trace, voice_brightness};
use ropesynth_core::{LineBatch, NoteGrid, Rope, Scope, WaveformView};

const ROPE_COLOR_ALPHA: f32 = 1.0;
const GRID_COLOR: [f32; 4] = [0.55, 0.55, 0.55, 1.0];
const ACTIVE_NOTE_COLOR: [f32; 4] = [0.9, 0.3, 0.3, 1.0];
const ENDPOINT_RADIUS: f32 = 6.0;
const LABEL_RADIUS: f32 = 3.0;
const ACTIVE_LABEL_RADIUS: f32 = 7.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    Circular,
    Horizontal,
}

impl Layout {
    pub fn toggled(self) -> Self {
        match self {
            Layout::Circular => Layout::Horizontal,
            Layout::Horizontal => Layout::Circular,
        }
    }
}

fn grey(level: f32) -> [f32; 4] {
    [level, level, level, 1.0]
}

/// Rebuild the whole frame's line list.
pub fn build_scene(
    batch: &mut LineBatch,
    rope: &Rope,
    scope: &Scope,
    view: &WaveformView,
    grid: &NoteGrid,
    layout: Layout,
) {
    batch.clear();

    match layout {
        Layout::Circular => {
            for (slot, voice) in scope.voices.iter().enumerate() {
                let ring = view.ring(slot, &voice.history);
                batch.polyline(&ring, grey(voice_brightness(slot)), true);
            }
        }
        Layout::Horizontal => {
            for (slot, voice) in scope.voices.iter().enumerate() {
                let trace = horizontal_trace(slot, &voice.history);
                batch.polyline(&trace, grey(voice_brightness(slot)), false);
            }
        }
    }

    for (a, b) in grid.spokes() {
        batch.segment(a, b, GRID_COLOR);
    }
    let geometry = rope.geometry();
    for label in grid.labels(&geometry) {
        if label.active {
            batch.circle(label.position, ACTIVE_LABEL_RADIUS, ACTIVE_NOTE_COLOR);
        } else {
            batch.circle(label.position, LABEL_RADIUS, GRID_COLOR);
        }
    }

    let [r, g, b] = rope.color_rgb;
    let rope_color = [r, g, b, ROPE_COLOR_ALPHA];
    batch.polyline(rope.points(), rope_color, false);
    batch.circle(rope.start(), ENDPOINT_RADIUS, rope_color);
    batch.circle(rope.end(), ENDPOINT_RADIUS, rope_color);

    // start -> end vector that steers the lead voice
    batch.segment(geometry.start, geometry.end, grey(0.2));
}
