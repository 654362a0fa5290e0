use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    /// Every input the frame needs but was never supplied, reported together.
    #[error("missing render bindings: {}", .0.join(", "))]
    MissingBindings(Vec<&'static str>),

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("noise texture must be {expected}x{expected}, got {width}x{height}")]
    NoiseTableSize {
        expected: u32,
        width: u32,
        height: u32,
    },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
