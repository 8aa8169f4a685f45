use thiserror::Error;

/// Failures inside the spectrogram pipeline.
///
/// None of these reach the callers of [`crate::Spectrogram`]: they are logged,
/// counted and the display is left as it was.
#[derive(Debug, Error)]
pub enum SpectrogramError {
    #[error("malformed sweep history: {0}")]
    MalformedSweep(&'static str),
    #[error("the plot surface has been closed")]
    ClosedSurface,
    #[error("render backend failed: {0}")]
    RenderBackend(String),
}
