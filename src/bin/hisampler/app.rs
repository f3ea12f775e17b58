//! Hisampler - audio stream setup and runner

use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use tracing::{error, info};

use hisampler::{synth::message::NoteEvent, AudioProcessor, SamplerConfig, MAX_BLOCK_SIZE};

use super::ui::{Status, UiApp};

// Tunables
const NOTE_QUEUE_CAPACITY: usize = 256; // Key events UI→audio
const STATUS_QUEUE_CAPACITY: usize = 32; // Status snapshots audio→UI

/// Main application builder
pub struct Hisampler {
    config: SamplerConfig,
    sample: Option<PathBuf>,
}

impl Hisampler {
    pub fn new() -> Self {
        Self {
            config: SamplerConfig::default(),
            sample: None,
        }
    }

    /// Sample file to load before playback starts
    pub fn sample(mut self, path: Option<PathBuf>) -> Self {
        self.sample = path;
        self
    }

    /// Run the application (takes over the terminal, plays audio)
    pub fn run(self) -> EyreResult<()> {
        // --- Set up CPAL ---
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        info!(sample_rate, channels, "Opened output device");

        // --- Engine ---
        let (mut processor, mut handle) = hisampler::new(self.config, sample_rate);
        processor.prepare(sample_rate, MAX_BLOCK_SIZE);

        if let Some(path) = &self.sample {
            handle
                .load_path(path)
                .wrap_err_with(|| format!("failed to load {}", path.display()))?;
        }

        // --- Cross-thread rings ---
        let (note_tx, mut note_rx) = RingBuffer::<NoteEvent>::new(NOTE_QUEUE_CAPACITY);
        let (mut status_tx, status_rx) = RingBuffer::<Status>::new(STATUS_QUEUE_CAPACITY);

        // Planar buffers reused by audio callback. Stereo at most; further
        // device channels repeat the pair.
        let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut right = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut events: Vec<NoteEvent> = Vec::with_capacity(NOTE_QUEUE_CAPACITY);
        let planes = channels.min(2);

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                events.clear();
                while let Ok(event) = note_rx.pop() {
                    events.push(event);
                }

                let total_frames = data.len() / channels;
                let mut frames_written = 0;
                let mut peak = 0.0f32;

                while frames_written < total_frames {
                    let frames_remaining = total_frames - frames_written;
                    let frames_to_render = frames_remaining.min(MAX_BLOCK_SIZE);

                    let mut buffers: [&mut [f32]; 2] = [
                        &mut left[..frames_to_render],
                        &mut right[..frames_to_render],
                    ];
                    // Key events land at the start of the callback
                    let block_events: &[NoteEvent] = if frames_written == 0 {
                        &events[..]
                    } else {
                        &[]
                    };
                    processor.render(&mut buffers[..planes], block_events);

                    // Interleave to device
                    let out_off = frames_written * channels;
                    for i in 0..frames_to_render {
                        for ch in 0..channels {
                            let s = buffers[ch % planes][i];
                            peak = peak.max(s.abs());
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    frames_written += frames_to_render;
                }

                // UI only wants the latest snapshot; drop when it lags
                let _ = status_tx.push(Status {
                    model: processor.editor_model(),
                    peak,
                });
            },
            |err| error!(%err, "Audio stream error"),
            None,
        )?;

        stream.play()?;

        // --- UI ---
        let mut terminal = ratatui::init();
        let result = UiApp::new(handle, note_tx, status_rx, sample_rate).run(&mut terminal);
        ratatui::restore();

        result
    }
}

impl Default for Hisampler {
    fn default() -> Self {
        Self::new()
    }
}
