//! Frame-context driver: owns the rope and the transport, turns host input
//! into synth commands and publishes state for the audio callback.

use glam::Vec2;

use crate::constants::{
    BPM_STEP, LEAD_SLOT, MOD_FREQ_STEP_HZ, MOD_INDEX_STEP, ROPE_GRAVITY, VOICE_COUNT,
};
use crate::link::{FrameLink, FrameSnapshot, SynthCommand};
use crate::rope::{PointerState, Rope};
use crate::transport::{Transport, TransportTick};

/// Input gathered by the host for one frame.
///
/// `toggle_voice`, `cycle_arp_mode`, `bpm_up` and `bpm_down` are edge
/// triggered (pressed this frame); the modulator fields are level triggered
/// (held).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub pointer: PointerState,
    pub toggle_voice: [bool; VOICE_COUNT],
    pub modulator_up: bool,
    pub modulator_down: bool,
    pub index_up: bool,
    pub index_down: bool,
    pub cycle_arp_mode: bool,
    pub bpm_up: bool,
    pub bpm_down: bool,
}

pub struct FrameContext {
    rope: Rope,
    transport: Transport,
    link: FrameLink,
    pub gravity: Vec2,
    physics_steps: u64,
}

impl FrameContext {
    pub fn new(rope: Rope, transport: Transport, link: FrameLink) -> Self {
        let ctx = Self {
            rope,
            transport,
            link,
            gravity: ROPE_GRAVITY,
            physics_steps: 0,
        };
        ctx.publish();
        ctx
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn link(&self) -> &FrameLink {
        &self.link
    }

    pub fn physics_steps(&self) -> u64 {
        self.physics_steps
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            rope: self.rope.geometry(),
            bpm: self.transport.bpm(),
            sub_beats_per_beat: self.transport.sub_beats_per_beat(),
        }
    }

    fn publish(&self) {
        self.link.publish(self.snapshot());
    }

    fn handle_keys(&mut self, input: &FrameInput) -> bool {
        for (voice, pressed) in input.toggle_voice.iter().enumerate() {
            if *pressed {
                log::info!("[keys] toggle voice {}", voice);
                self.link.send(SynthCommand::ToggleVoice(voice));
            }
        }

        let mod_delta = match (input.modulator_up, input.modulator_down) {
            (true, false) => MOD_FREQ_STEP_HZ,
            (false, true) => -MOD_FREQ_STEP_HZ,
            _ => 0.0,
        };
        if mod_delta != 0.0 {
            self.link.send(SynthCommand::NudgeModulator {
                voice: LEAD_SLOT,
                delta_hz: mod_delta,
            });
        }
        let index_delta = match (input.index_up, input.index_down) {
            (true, false) => MOD_INDEX_STEP,
            (false, true) => -MOD_INDEX_STEP,
            _ => 0.0,
        };
        if index_delta != 0.0 {
            self.link.send(SynthCommand::NudgeModIndex {
                voice: LEAD_SLOT,
                delta: index_delta,
            });
        }

        if input.cycle_arp_mode {
            self.transport.arp_mode = self.transport.arp_mode.next();
            log::info!("[keys] arp mode -> {}", self.transport.arp_mode.label());
            self.link
                .send(SynthCommand::SetArpMode(self.transport.arp_mode));
        }

        let old_bpm = self.transport.bpm();
        if input.bpm_up {
            self.transport.set_bpm(old_bpm.saturating_add(BPM_STEP));
        }
        if input.bpm_down {
            self.transport.set_bpm(old_bpm.saturating_sub(BPM_STEP));
        }
        let bpm_changed = self.transport.bpm() != old_bpm;
        if bpm_changed {
            log::info!("[transport] bpm {}", self.transport.bpm());
        }
        bpm_changed
    }

    /// Advance one host frame of `dt` seconds.
    pub fn advance_frame(&mut self, dt: f32, input: &FrameInput) -> TransportTick {
        let bpm_changed = self.handle_keys(input);

        let tick = self.transport.advance(dt);
        if self.transport.consume_beat() {
            self.link.raise_beat();
        }
        if self.transport.consume_sub_beat() {
            self.link.raise_sub_beat();
        }

        if tick.physics_step {
            let step = self.transport.physics_step_sec();
            self.rope.step(self.gravity, None, step, input.pointer);
            self.physics_steps += 1;
        }
        if tick.physics_step || bpm_changed {
            self.publish();
        }
        tick
    }
}
