use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use ropesynth_core::{FrameInput, PointerState, VOICE_COUNT, WINDOW_HEIGHT, WINDOW_WIDTH};

const VOICE_KEYS: [KeyCode; VOICE_COUNT] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
];

/// Collects window events between frames and hands them over as one
/// [`FrameInput`].
#[derive(Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
    cursor_px: Vec2,
    mouse_down: bool,
}

impl InputState {
    pub fn on_key(&mut self, code: KeyCode, state: ElementState, repeat: bool) {
        match state {
            ElementState::Pressed => {
                if !repeat {
                    self.pressed.insert(code);
                }
                self.held.insert(code);
            }
            ElementState::Released => {
                self.held.remove(&code);
            }
        }
    }

    pub fn on_cursor(&mut self, x: f64, y: f64) {
        self.cursor_px = Vec2::new(x as f32, y as f32);
    }

    pub fn on_mouse(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.mouse_down = state == ElementState::Pressed;
        }
    }

    /// Edge-triggered check that does not consume the press.
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    /// Build this frame's input, mapping the cursor from a `surface`-sized
    /// window into world units, and clear the edge-triggered presses.
    pub fn take_frame(&mut self, surface: (u32, u32)) -> FrameInput {
        let scale = Vec2::new(
            WINDOW_WIDTH / surface.0.max(1) as f32,
            WINDOW_HEIGHT / surface.1.max(1) as f32,
        );
        let mut toggle_voice = [false; VOICE_COUNT];
        for (slot, key) in VOICE_KEYS.iter().enumerate() {
            toggle_voice[slot] = self.pressed.contains(key);
        }
        let input = FrameInput {
            pointer: PointerState {
                position: self.cursor_px * scale,
                pressed: self.mouse_down,
            },
            toggle_voice,
            modulator_up: self.held.contains(&KeyCode::KeyW),
            modulator_down: self.held.contains(&KeyCode::KeyS),
            index_up: self.held.contains(&KeyCode::KeyA),
            index_down: self.held.contains(&KeyCode::KeyD),
            cycle_arp_mode: self.pressed.contains(&KeyCode::Space),
            bpm_up: self.pressed.contains(&KeyCode::ArrowUp),
            bpm_down: self.pressed.contains(&KeyCode::ArrowDown),
        };
        self.pressed.clear();
        input
    }
}
