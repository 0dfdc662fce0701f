use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};

use ropesynth_core::{AudioLink, Mixer, CHANNELS, SAMPLE_RATE};

/// Open the default output device at 44.1 kHz stereo and start rendering
/// `mixer` into it. The returned stream must outlive playback.
pub fn start_audio(mixer: Mixer, link: AudioLink) -> anyhow::Result<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("no default output device"))?;
    let supported = device
        .default_output_config()
        .context("query default output config")?;
    let config = cpal::StreamConfig {
        channels: CHANNELS,
        sample_rate: cpal::SampleRate(SAMPLE_RATE),
        buffer_size: cpal::BufferSize::Default,
    };
    log::info!(
        "[audio] device={} format={:?} rate={} channels={}",
        device.name().unwrap_or_else(|_| "unknown".into()),
        supported.sample_format(),
        SAMPLE_RATE,
        CHANNELS
    );

    let stream = match supported.sample_format() {
        cpal::SampleFormat::F32 => build_stream_f32(&device, &config, mixer, link)?,
        cpal::SampleFormat::I16 => build_stream_converted::<i16>(&device, &config, mixer, link)?,
        cpal::SampleFormat::U16 => build_stream_converted::<u16>(&device, &config, mixer, link)?,
        other => return Err(anyhow!("unsupported sample format {other:?}")),
    };
    stream.play().context("start output stream")?;
    Ok(stream)
}

fn err_fn(err: cpal::StreamError) {
    log::error!("[audio] stream error: {err}");
}

fn build_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut mixer: Mixer,
    mut link: AudioLink,
) -> anyhow::Result<cpal::Stream> {
    let channels = config.channels as usize;
    device
        .build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                mixer.process(&mut link, data, channels);
            },
            err_fn,
            None,
        )
        .context("build f32 output stream")
}

/// Integer devices render through an f32 scratch buffer sized on first use.
fn build_stream_converted<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut mixer: Mixer,
    mut link: AudioLink,
) -> anyhow::Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut scratch: Vec<f32> = Vec::new();
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                if scratch.len() < data.len() {
                    scratch.resize(data.len(), 0.0);
                }
                let buf = &mut scratch[..data.len()];
                mixer.process(&mut link, buf, channels);
                for (dst, src) in data.iter_mut().zip(buf.iter()) {
                    *dst = T::from_sample(*src);
                }
            },
            err_fn,
            None,
        )
        .context("build integer output stream")
}
