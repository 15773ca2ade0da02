use crate::error::RenderError;
use crate::image::ColumnsMut;
use crate::partition::Block;
use crate::sampler::PixelSampler;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct WorkerReport {
    pub index: usize,
    pub block: Block,
    pub pixels: u64,
    pub elapsed: Duration,
}

/// One worker's share of a render: its column view plus read-only access to
/// the scene and sampler.
pub struct RenderWorker<'a, S: ?Sized, P: ?Sized> {
    index: usize,
    scene: &'a S,
    sampler: &'a P,
    samples: u32,
    target: ColumnsMut<'a>,
}

impl<'a, S, P> RenderWorker<'a, S, P>
where
    S: ?Sized,
    P: PixelSampler<S> + ?Sized,
{
    pub fn new(index: usize, scene: &'a S, sampler: &'a P, samples: u32, target: ColumnsMut<'a>) -> Self {
        Self {
            index,
            scene,
            sampler,
            samples,
            target,
        }
    }

    /// Samples every pixel of the block once. The first sampler failure
    /// stops the worker.
    pub fn run(mut self) -> Result<WorkerReport, RenderError> {
        let block = self.target.block();
        let height = self.target.height();
        let start = Instant::now();
        let mut pixels = 0u64;

        for x in block.columns() {
            for y in 0..height {
                let color = self
                    .sampler
                    .sample(self.scene, x, y, self.samples)
                    .map_err(|source| RenderError::Sample {
                        worker: self.index,
                        x,
                        y,
                        source,
                    })?;
                self.target.set(x, y, color);
                pixels += 1;
            }
        }

        let elapsed = start.elapsed();
        debug!(
            worker = self.index,
            start = block.start,
            end = block.end,
            pixels,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "worker finished"
        );

        Ok(WorkerReport {
            index: self.index,
            block,
            pixels,
            elapsed,
        })
    }
}
