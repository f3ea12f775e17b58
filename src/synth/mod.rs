// Purpose: Voice management, polyphony, note events
// This layer sits above the DSP primitives and owns everything the render
// path touches per block.

pub mod handle; // Control-side half: parameter updates and sample loads
pub mod message; // Note events and control messages
pub mod params; // Envelope parameters and their legal ranges
pub mod pool; // Fixed-capacity voice pool and stealing
pub mod synthesizer; // Render-side engine
pub mod voice; // Single sample-playback voice
