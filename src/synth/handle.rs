//! Control-path side of the engine.
//!
//! The handle lives on a UI or loader thread. It talks to the render path
//! through two single-producer/single-consumer rings and never waits on it:
//!
//! ```text
//!   SamplerHandle ──ControlMessage──▶ SamplerProcessor
//!                 ◀──retired assets──
//! ```
//!
//! Retired assets travel back so the last reference to old sample data is
//! always dropped here, never on the audio thread.

use std::path::Path;
use std::sync::Arc;

use rtrb::{Consumer, Producer};
use tracing::{debug, warn};

use crate::{
    config::SamplerConfig,
    error::LoadError,
    sample::{load_sample, DecodedAudio, Peak, SampleAsset, SampleDecoder, SampleInfo},
    synth::{message::ControlMessage, params::EnvelopeParameters},
};

pub struct SamplerHandle {
    tx: Producer<ControlMessage>,
    retired: Consumer<Arc<SampleAsset>>,
    config: SamplerConfig,
    decoder: Box<dyn SampleDecoder + Send>,
    current: Option<Arc<SampleAsset>>,
    envelope: EnvelopeParameters,
    pending_envelope: Option<EnvelopeParameters>,
}

impl SamplerHandle {
    pub(crate) fn new(
        tx: Producer<ControlMessage>,
        retired: Consumer<Arc<SampleAsset>>,
        config: SamplerConfig,
        decoder: Box<dyn SampleDecoder + Send>,
    ) -> Self {
        let envelope = config.initial_envelope.clamped();
        Self {
            tx,
            retired,
            config,
            decoder,
            current: None,
            envelope,
            pending_envelope: None,
        }
    }

    /// Publish new envelope parameters, returning the clamped values that
    /// will be used.
    ///
    /// Never blocks. If the control ring is full the update is kept and
    /// re-sent by the next call to [`flush`](Self::flush) or any other
    /// handle method.
    pub fn set_envelope(&mut self, params: EnvelopeParameters) -> EnvelopeParameters {
        let params = params.clamped();
        self.envelope = params;
        self.pending_envelope = Some(params);
        self.flush();
        params
    }

    /// The last envelope parameters published through this handle.
    pub fn envelope(&self) -> EnvelopeParameters {
        self.envelope
    }

    /// Re-send a pending envelope update. Returns true when nothing is pending.
    pub fn flush(&mut self) -> bool {
        if let Some(params) = self.pending_envelope {
            if self.tx.push(ControlMessage::SetEnvelope(params)).is_ok() {
                self.pending_envelope = None;
            } else {
                warn!("Control queue full, envelope update deferred");
            }
        }
        self.pending_envelope.is_none()
    }

    /// Decode the file at `path` and hand it to the render path.
    ///
    /// On any error the engine keeps its current sample.
    pub fn load_path(&mut self, path: &Path) -> Result<SampleInfo, LoadError> {
        self.ensure_capacity()?;
        let asset = load_sample(path, self.decoder.as_ref(), &self.config)?;
        self.submit(asset)
    }

    /// Build an asset from already-decoded PCM and hand it to the render path.
    pub fn load_decoded(
        &mut self,
        name: &str,
        decoded: DecodedAudio,
    ) -> Result<SampleInfo, LoadError> {
        self.ensure_capacity()?;
        let asset = Arc::new(SampleAsset::from_decoded(name, decoded, &self.config)?);
        self.submit(asset)
    }

    /// Release every sounding voice.
    pub fn all_notes_off(&mut self) -> bool {
        self.flush();
        self.tx.push(ControlMessage::AllNotesOff).is_ok()
    }

    /// Drop assets the render path has finished with. Returns how many.
    pub fn collect_garbage(&mut self) -> usize {
        let mut dropped = 0;
        while let Ok(asset) = self.retired.pop() {
            debug!(asset = asset.id(), "Dropping retired sample");
            drop(asset);
            dropped += 1;
        }
        dropped
    }

    /// Metadata of the most recently submitted sample.
    pub fn current_sample(&self) -> Option<SampleInfo> {
        self.current.as_ref().map(|asset| asset.info())
    }

    /// Decimated view of the most recently submitted sample, `width` peaks
    /// wide. Empty when nothing is loaded.
    ///
    /// Reads the handle's own reference to the immutable data, so it never
    /// contends with the render path.
    pub fn waveform(&self, width: usize) -> Vec<Peak> {
        self.current
            .as_ref()
            .map(|asset| asset.waveform(width))
            .unwrap_or_default()
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    fn ensure_capacity(&mut self) -> Result<(), LoadError> {
        self.collect_garbage();
        self.flush();
        if self.tx.slots() == 0 {
            warn!("Control queue full, sample load refused");
            return Err(LoadError::EngineBusy);
        }
        Ok(())
    }

    fn submit(&mut self, asset: Arc<SampleAsset>) -> Result<SampleInfo, LoadError> {
        let info = asset.info();
        self.tx
            .push(ControlMessage::LoadSample(asset.clone()))
            .map_err(|_| LoadError::EngineBusy)?;
        self.current = Some(asset);
        Ok(info)
    }
}
