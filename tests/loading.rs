use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};
use tempfile::tempdir;

use hisampler::{
    synth::message::NoteEvent, AudioProcessor, EnvelopeParameters, LoadError, SamplerConfig,
    SamplerHandle, SamplerProcessor,
};

const SAMPLE_RATE: u32 = 44_100;

fn engine(config: SamplerConfig) -> (SamplerProcessor, SamplerHandle) {
    hisampler::new(config, SAMPLE_RATE as f32)
}

fn plain_config() -> SamplerConfig {
    SamplerConfig {
        attack_fade_secs: 0.0,
        release_fade_secs: 0.0,
        ..SamplerConfig::default()
    }
    .with_envelope(EnvelopeParameters::new(0.0, 0.0, 1.0, 0.0))
}

/// Write a 16-bit mono WAV holding `frames` copies of `value`.
fn write_mono_i16(path: &Path, value: i16, frames: usize) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for _ in 0..frames {
        writer.write_sample(value).unwrap();
    }
    writer.finalize().unwrap();
}

/// Write a 32-bit float stereo WAV with constant `left` and `right`.
fn write_stereo_f32(path: &Path, left: f32, right: f32, frames: usize) {
    let spec = WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for _ in 0..frames {
        writer.write_sample(left).unwrap();
        writer.write_sample(right).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn loads_mono_wav() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kick.wav");
    write_mono_i16(&path, 16_384, 4_410);

    let (_processor, mut handle) = engine(plain_config());
    let info = handle.load_path(&path).unwrap();

    assert_eq!(info.channels, 1);
    assert_eq!(info.frames, 4_410);
    assert_eq!(info.sample_rate, SAMPLE_RATE);
    assert!((info.duration_secs() - 0.1).abs() < 1e-9);

    let peaks = handle.waveform(32);
    assert_eq!(peaks.len(), 32);
    assert!(peaks.iter().all(|p| (p.max - 0.5).abs() < 1e-3));
}

#[test]
fn stereo_wav_keeps_channels_apart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pad.WAV");
    write_stereo_f32(&path, 0.25, -0.25, 4_410);

    let (mut processor, mut handle) = engine(plain_config());
    handle.load_path(&path).unwrap();

    let mut left = vec![0.0f32; 256];
    let mut right = vec![0.0f32; 256];
    processor.render(
        &mut [&mut left[..], &mut right[..]],
        &[NoteEvent::note_on(0, 60, 127)],
    );

    assert!((left[100] - 0.25).abs() < 1e-6);
    assert!((right[100] + 0.25).abs() < 1e-6);
}

#[test]
fn long_files_are_truncated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("drone.wav");
    write_mono_i16(&path, 1_000, SAMPLE_RATE as usize);

    let config = SamplerConfig {
        max_sample_secs: 0.5,
        ..plain_config()
    };
    let (_processor, mut handle) = engine(config);
    let info = handle.load_path(&path).unwrap();

    assert_eq!(info.frames, SAMPLE_RATE as usize / 2);
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, b"not audio").unwrap();

    let (_processor, mut handle) = engine(plain_config());
    let err = handle.load_path(&path).unwrap_err();

    assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "txt"));
    assert!(handle.current_sample().is_none());
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempdir().unwrap();
    let path: PathBuf = dir.path().join("gone.wav");

    let (_processor, mut handle) = engine(plain_config());
    let err = handle.load_path(&path).unwrap_err();

    assert!(matches!(err, LoadError::NotFound(p) if p == path));
}

#[test]
fn corrupt_file_keeps_previous_sample() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.wav");
    let bad = dir.path().join("bad.wav");
    write_mono_i16(&good, 8_000, 1_000);
    std::fs::write(&bad, [0x13u8; 512]).unwrap();

    let (mut processor, mut handle) = engine(plain_config());
    let first = handle.load_path(&good).unwrap();
    assert!(handle.load_path(&bad).is_err());

    let mut left = vec![0.0f32; 16];
    processor.render(&mut [&mut left[..]], &[NoteEvent::note_on(0, 60, 127)]);

    assert_eq!(handle.current_sample().map(|s| s.id), Some(first.id));
    assert_eq!(processor.editor_model().sample.map(|s| s.id), Some(first.id));
    assert!(left[8] > 0.0);
}

#[test]
fn empty_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("silence.wav");
    write_mono_i16(&path, 0, 0);

    let (_processor, mut handle) = engine(plain_config());

    assert!(handle.load_path(&path).is_err());
    assert!(handle.current_sample().is_none());
}
