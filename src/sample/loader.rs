//! Turning files on disk into [`SampleAsset`]s.
//!
//! Decoding is delegated to a [`SampleDecoder`]. The default implementation
//! uses symphonia, which covers every format the sampler accepts. Loading is
//! all-or-nothing: the asset is only handed out once every frame has been
//! decoded and validated.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, info, warn};

use super::{DecodedAudio, SampleAsset};
use crate::{config::SamplerConfig, error::LoadError};

/// File extensions the sampler will attempt to decode.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "aif", "aiff", "mp3", "flac"];

/// Codec collaborator: produces flat interleaved PCM from a file.
pub trait SampleDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedAudio, LoadError>;
}

/// Default decoder backed by symphonia's format registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaDecoder;

impl SampleDecoder for SymphoniaDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedAudio, LoadError> {
        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(extension);
        }

        let probed = symphonia::default::get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;
        let mut format_reader = probed.format;

        let track = format_reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| LoadError::Decode("no audio track found".to_string()))?;

        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| LoadError::Decode("sample rate not specified".to_string()))?;
        let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);

        let mut decoder =
            symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

        let mut samples = Vec::new();
        let mut buffer: Option<SampleBuffer<f32>> = None;

        loop {
            let packet = match format_reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    // Corrupt packets are skipped, the rest of the stream is still usable.
                    debug!(error = e, "Skipping undecodable packet");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let spec = *decoded.spec();
            channels = spec.channels.count();

            let buf = buffer.get_or_insert_with(|| {
                SampleBuffer::<f32>::new(decoded.capacity() as u64, spec)
            });
            if buf.capacity() < decoded.capacity() * spec.channels.count() {
                *buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            }
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }

        Ok(DecodedAudio {
            channels,
            sample_rate,
            samples,
        })
    }
}

/// Check that `path` exists and has an extension the sampler accepts.
pub fn check_path(path: &Path) -> Result<(), LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(LoadError::UnsupportedFormat(if extension.is_empty() {
            path.display().to_string()
        } else {
            extension
        }));
    }

    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    Ok(())
}

/// Decode `path` and build an asset from it.
pub fn load_sample(
    path: &Path,
    decoder: &dyn SampleDecoder,
    config: &SamplerConfig,
) -> Result<Arc<SampleAsset>, LoadError> {
    if let Err(e) = check_path(path) {
        warn!(path = ?path, error = %e, "Rejected sample file");
        return Err(e);
    }

    let decoded = decoder.decode(path).inspect_err(|e| {
        warn!(path = ?path, error = %e, "Failed to decode sample");
    })?;

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let asset = SampleAsset::from_decoded(name, decoded, config)?;

    info!(
        path = ?path,
        channels = asset.channels(),
        frames = asset.frames(),
        sample_rate = asset.sample_rate(),
        "Loaded sample"
    );

    Ok(Arc::new(asset))
}
