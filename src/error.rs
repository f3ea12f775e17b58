use std::path::PathBuf;

/// Failure to produce a [`SampleAsset`](crate::sample::SampleAsset).
///
/// Returned only on the control path. When a load fails the engine keeps
/// playing whatever asset it already had.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Sample file not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sample contains no audio frames")]
    EmptySample,

    #[error("Sample data does not match its channel layout")]
    InvalidLayout,

    #[error("Invalid sample rate: {0}Hz")]
    InvalidSampleRate(u32),

    #[error("Engine control queue is full, try again")]
    EngineBusy,
}

impl From<symphonia::core::errors::Error> for LoadError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        use symphonia::core::errors::Error;

        match err {
            Error::IoError(e) => LoadError::Io(e),
            Error::Unsupported(what) => LoadError::UnsupportedFormat(what.to_string()),
            other => LoadError::Decode(other.to_string()),
        }
    }
}
