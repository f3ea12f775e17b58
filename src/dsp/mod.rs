//! Low-level DSP primitives used by the voices.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Fractional sample reads and boundary fades.
pub mod interpolate;

pub use envelope::{EnvelopeGenerator, EnvelopeStage};
