//! The explicit sharing boundary between the frame context and the audio
//! callback.
//!
//! - rope geometry and tempo: atomic pointer swap ([`ArcSwap`]), published
//!   by the frame side after each physics step, loaded once per buffer;
//! - beat/sub-beat triggers: atomic flags raised by the frame side and
//!   cleared by the audio side after a whole buffer has observed them;
//! - control changes: lock-free SPSC queue of [`SynthCommand`]s;
//! - waveform/status data for the renderer: a mutex the audio side only
//!   ever `try_lock`s, skipping the update when the renderer holds it.
//!
//! Nothing on the audio side blocks or sleeps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::ArcSwap;
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

use crate::constants::{COMMAND_QUEUE_CAPACITY, DEFAULT_BPM, HISTORY_SIZE, SUB_BEATS_PER_BEAT, VOICE_COUNT};
use crate::mapping::RopeGeometry;
use crate::voice::{ArpMode, FmVoice};

/// Frame-side state the audio callback reads once per buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub rope: RopeGeometry,
    pub bpm: u32,
    pub sub_beats_per_beat: u32,
}

impl Default for FrameSnapshot {
    fn default() -> Self {
        Self {
            rope: RopeGeometry::default(),
            bpm: DEFAULT_BPM,
            sub_beats_per_beat: SUB_BEATS_PER_BEAT,
        }
    }
}

impl FrameSnapshot {
    pub fn beat_period(&self) -> f32 {
        60.0 / self.bpm.max(1) as f32
    }

    pub fn sub_beat_period(&self) -> f32 {
        60.0 / (self.bpm.max(1) as f32 * self.sub_beats_per_beat.max(1) as f32)
    }
}

/// Control changes applied by the audio side at the top of a buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SynthCommand {
    ToggleVoice(usize),
    SetVolume { voice: usize, volume: f32 },
    NudgeModulator { voice: usize, delta_hz: f32 },
    NudgeModIndex { voice: usize, delta: f32 },
    SetArpMode(ArpMode),
    Reseed { voice: usize, seed: u64 },
}

/// Per-voice data the renderer and HUD read.
#[derive(Clone, Debug)]
pub struct VoiceScope {
    pub history: [f32; HISTORY_SIZE],
    pub volume: f32,
    pub carrier_hz: f32,
    pub modulator_hz: f32,
    pub modulation_index: f32,
    pub current_note: usize,
}

impl Default for VoiceScope {
    fn default() -> Self {
        Self {
            history: [0.0; HISTORY_SIZE],
            volume: 0.0,
            carrier_hz: 0.0,
            modulator_hz: 0.0,
            modulation_index: 0.0,
            current_note: 0,
        }
    }
}

impl VoiceScope {
    fn capture(&mut self, voice: &FmVoice) {
        self.history.copy_from_slice(voice.history());
        self.volume = voice.volume;
        self.carrier_hz = voice.carrier_hz;
        self.modulator_hz = voice.modulator_hz;
        self.modulation_index = voice.modulation_index;
        self.current_note = voice.current_note;
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scope {
    pub voices: [VoiceScope; VOICE_COUNT],
    pub arp_mode: Option<ArpMode>,
    /// Audio-side running sample counter at capture time.
    pub running_index: u64,
}

#[derive(Debug, Default)]
struct TriggerLatch {
    beat: AtomicBool,
    sub_beat: AtomicBool,
}

struct Shared {
    snapshot: ArcSwap<FrameSnapshot>,
    triggers: TriggerLatch,
    scope: Mutex<Scope>,
}

/// Frame-context end of the link.
pub struct FrameLink {
    shared: Arc<Shared>,
    commands: HeapProd<SynthCommand>,
}

/// Audio-callback end of the link. Moved into the stream callback.
pub struct AudioLink {
    shared: Arc<Shared>,
    commands: HeapCons<SynthCommand>,
}

/// Build both ends of the link around an initial snapshot.
pub fn link(initial: FrameSnapshot) -> (FrameLink, AudioLink) {
    let shared = Arc::new(Shared {
        snapshot: ArcSwap::from_pointee(initial),
        triggers: TriggerLatch::default(),
        scope: Mutex::new(Scope::default()),
    });
    let (commands_tx, commands_rx) = HeapRb::<SynthCommand>::new(COMMAND_QUEUE_CAPACITY).split();
    (
        FrameLink {
            shared: Arc::clone(&shared),
            commands: commands_tx,
        },
        AudioLink {
            shared,
            commands: commands_rx,
        },
    )
}

impl FrameLink {
    pub fn publish(&self, snapshot: FrameSnapshot) {
        self.shared.snapshot.store(Arc::new(snapshot));
    }

    pub fn raise_beat(&self) {
        self.shared.triggers.beat.store(true, Ordering::Release);
    }

    pub fn raise_sub_beat(&self) {
        self.shared.triggers.sub_beat.store(true, Ordering::Release);
    }

    /// Queue a command; returns false (and drops it) when the queue is full.
    pub fn send(&mut self, command: SynthCommand) -> bool {
        match self.commands.try_push(command) {
            Ok(()) => true,
            Err(dropped) => {
                log::warn!("[link] command queue full, dropping {:?}", dropped);
                false
            }
        }
    }

    /// Latest scope published by the audio side.
    pub fn scope(&self) -> MutexGuard<'_, Scope> {
        self.shared
            .scope
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether the audio side has yet to clear the beat trigger.
    pub fn beat_pending(&self) -> bool {
        self.shared.triggers.beat.load(Ordering::Acquire)
    }

    pub fn sub_beat_pending(&self) -> bool {
        self.shared.triggers.sub_beat.load(Ordering::Acquire)
    }
}

impl AudioLink {
    pub fn snapshot(&self) -> FrameSnapshot {
        **self.shared.snapshot.load()
    }

    /// Read both trigger flags without clearing them.
    pub fn peek_triggers(&self) -> (bool, bool) {
        (
            self.shared.triggers.beat.load(Ordering::Acquire),
            self.shared.triggers.sub_beat.load(Ordering::Acquire),
        )
    }

    /// Clear the flags that were observed for the buffer just rendered.
    pub fn clear_triggers(&self, beat: bool, sub_beat: bool) {
        if beat {
            self.shared.triggers.beat.store(false, Ordering::Release);
        }
        if sub_beat {
            self.shared.triggers.sub_beat.store(false, Ordering::Release);
        }
    }

    pub fn pop_command(&mut self) -> Option<SynthCommand> {
        self.commands.try_pop()
    }

    /// Copy voice state for the renderer unless it currently holds the scope.
    pub fn publish_scope(&self, voices: &[FmVoice], running_index: u64) -> bool {
        let Ok(mut scope) = self.shared.scope.try_lock() else {
            return false;
        };
        for (slot, voice) in scope.voices.iter_mut().zip(voices) {
            slot.capture(voice);
        }
        scope.arp_mode = voices.iter().find_map(|v| v.arp_mode());
        scope.running_index = running_index;
        true
    }
}
