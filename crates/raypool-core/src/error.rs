use std::io;
use thiserror::Error;

/// Failure raised by a pixel sampler for a single pixel.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct SampleError {
    message: String,
}

impl SampleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("worker count must be at least 1")]
    ZeroWorkers,

    #[error("column block {start}..{end} overlaps another block or exceeds image width {width}")]
    InvalidBlock { start: u32, end: u32, width: u32 },

    #[error("failed to spawn render worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: io::Error,
    },

    #[error("render worker {worker} failed at pixel ({x}, {y}): {source}")]
    Sample {
        worker: usize,
        x: u32,
        y: u32,
        #[source]
        source: SampleError,
    },

    #[error("render worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },
}
