mod audio;
mod gpu;
mod input;
mod scene;

use std::time::Instant;

use anyhow::Context;
use glam::Vec2;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

use ropesynth_core::scales::PENTATONIC_SCALE;
use ropesynth_core::{
    default_voice_configs, link, window_center, Bounds, EngineParams, FrameContext, LineBatch,
    Mixer, NoteGrid, Rope, RopeParams, Scope, Transport, TransportParams, WaveformView,
    LEAD_SLOT, ROPE_REST_LENGTH, WINDOW_HEIGHT, WINDOW_WIDTH,
};

use gpu::GpuState;
use input::InputState;
use scene::{build_scene, Layout};

fn hud_line(scope: &Scope, bpm: u32, note: Option<&str>) -> String {
    let lead = &scope.voices[LEAD_SLOT];
    let arp = scope.arp_mode.map(|m| m.label()).unwrap_or("-");
    format!(
        "ropesynth | note {} | mod {:.1} Hz | index {:.2} | {} bpm | arp {}",
        note.unwrap_or("-"),
        lead.modulator_hz,
        lead.modulation_index,
        bpm,
        arp
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let center = window_center();
    let rope = Rope::new(
        center,
        center + Vec2::Y * ROPE_REST_LENGTH,
        RopeParams {
            bounds: Some(Bounds {
                min: Vec2::ZERO,
                max: Vec2::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            }),
            ..RopeParams::default()
        },
    )
    .context("build rope")?;
    let transport = Transport::new(TransportParams::default()).context("build transport")?;
    let mixer = Mixer::new(&default_voice_configs(), &EngineParams::default())
        .context("build voice bank")?;

    let (frame_link, audio_link) = link(Default::default());
    let mut frame = FrameContext::new(rope, transport, frame_link);

    // Audio failure is fatal: no retry, non-zero exit.
    let stream = match audio::start_audio(mixer, audio_link) {
        Ok(stream) => stream,
        Err(err) => {
            log::error!("[audio] failed to start: {err:#}");
            return Err(err);
        }
    };
    let mut audio_stream = Some(stream);

    let event_loop = EventLoop::new().context("event loop")?;
    let window = WindowBuilder::new()
        .with_title("ropesynth")
        .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
        .build(&event_loop)
        .context("window")?;

    let mut state = pollster::block_on(GpuState::new(&window)).context("gpu")?;
    let mut input = InputState::default();
    let mut batch = LineBatch::default();
    let mut view = WaveformView::new(center);
    let grid = NoteGrid {
        center,
        scale: PENTATONIC_SCALE,
    };
    let mut layout = Layout::Circular;
    let mut hud = String::new();
    let mut last_frame = Instant::now();

    log::info!("[app] keys: 1-4 voices, W/S mod Hz, A/D mod index, Space arp, Up/Down bpm, H layout");

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::Resized(size) => state.resize(size),
                WindowEvent::CloseRequested => {
                    // stop audio before the window goes away
                    drop(audio_stream.take());
                    log::info!("[app] shutdown");
                    elwt.exit();
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(code),
                            state: key_state,
                            repeat,
                            ..
                        },
                    ..
                } => {
                    if code == KeyCode::Escape && key_state == ElementState::Pressed {
                        drop(audio_stream.take());
                        elwt.exit();
                    } else {
                        input.on_key(code, key_state, repeat);
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input.on_cursor(position.x, position.y)
                }
                WindowEvent::MouseInput { state: btn, button, .. } => {
                    input.on_mouse(button, btn)
                }
                _ => {}
            },
            Event::AboutToWait => {
                let now = Instant::now();
                let dt = (now - last_frame).as_secs_f32();
                last_frame = now;

                if input.was_pressed(KeyCode::KeyH) {
                    layout = layout.toggled();
                    log::info!("[keys] layout -> {:?}", layout);
                }
                let frame_input = input.take_frame(state.size());
                frame.advance_frame(dt, &frame_input);
                view.update(frame.rope().geometry().length(), dt);

                {
                    let scope = frame.link().scope();
                    build_scene(&mut batch, frame.rope(), &scope, &view, &grid, layout);
                    let note = grid.active_note(&frame.rope().geometry());
                    let line = hud_line(&scope, frame.transport().bpm(), note.as_deref());
                    if line != hud {
                        log::info!("[hud] {}", line);
                        state.window.set_title(&line);
                        hud = line;
                    }
                }

                match state.render(&batch.vertices) {
                    Ok(_) => state.window.request_redraw(),
                    Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("[gpu] out of memory");
                        drop(audio_stream.take());
                        elwt.exit();
                    }
                    Err(_) => {}
                }
            }
            _ => {}
        })
        .context("event loop run")?;
    Ok(())
}
