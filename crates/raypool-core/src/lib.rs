//! Parallel render orchestration: column partitioning, per-render worker
//! threads and a shared image buffer split into exclusive views.

pub mod color;
pub mod coordinator;
pub mod error;
pub mod image;
pub mod partition;
pub mod sampler;
pub mod worker;

pub use color::Color;
pub use coordinator::{render, RenderJob, RenderOutput, TaskGroup, WorkerResult};
pub use error::{RenderError, SampleError};
pub use image::{ColumnsMut, Image};
pub use partition::{dropped_columns, partition, Block};
pub use sampler::PixelSampler;
pub use worker::{RenderWorker, WorkerReport};
