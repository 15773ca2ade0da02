use crate::error::RenderError;
use crate::image::Image;
use crate::partition::{dropped_columns, partition};
use crate::sampler::PixelSampler;
use crate::worker::{RenderWorker, WorkerReport};
use std::any::Any;
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Parameters of one render invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderJob {
    workers: u32,
    width: u32,
    height: u32,
    samples: u32,
}

impl RenderJob {
    pub fn new(workers: u32, width: u32, height: u32, samples: u32) -> Result<Self, RenderError> {
        if workers == 0 {
            return Err(RenderError::ZeroWorkers);
        }
        Ok(Self {
            workers,
            width,
            height,
            samples,
        })
    }

    pub fn workers(&self) -> u32 {
        self.workers
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }
}

#[derive(Debug)]
pub struct RenderOutput {
    pub image: Image,
    pub elapsed: Duration,
    pub workers: Vec<WorkerReport>,
}

impl RenderOutput {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

pub type WorkerResult = Result<WorkerReport, RenderError>;

/// Worker threads bound to a [`thread::scope`]. No handle can outlive the
/// scope, and [`TaskGroup::await_all`] joins every launched thread.
pub struct TaskGroup<'scope, 'env: 'scope> {
    scope: &'scope Scope<'scope, 'env>,
    handles: Vec<(usize, ScopedJoinHandle<'scope, WorkerResult>)>,
}

impl<'scope, 'env> TaskGroup<'scope, 'env> {
    pub fn new(scope: &'scope Scope<'scope, 'env>) -> Self {
        Self {
            scope,
            handles: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn launch<F>(&mut self, index: usize, task: F) -> Result<(), RenderError>
    where
        F: FnOnce() -> WorkerResult + Send + 'scope,
    {
        let handle = thread::Builder::new()
            .name(format!("render-{index}"))
            .spawn_scoped(self.scope, task)
            .map_err(|source| RenderError::Spawn {
                worker: index,
                source,
            })?;
        self.handles.push((index, handle));
        Ok(())
    }

    /// Joins every worker, in launch order, and returns their reports. When
    /// any worker failed the first failure is returned instead.
    pub fn await_all(self) -> Result<Vec<WorkerReport>, RenderError> {
        let mut reports = Vec::with_capacity(self.handles.len());
        let mut failure = None;

        for (index, handle) in self.handles {
            let outcome = match handle.join() {
                Ok(result) => result,
                Err(payload) => Err(RenderError::WorkerPanicked {
                    worker: index,
                    message: panic_message(payload.as_ref()),
                }),
            };

            match outcome {
                Ok(report) => reports.push(report),
                Err(err) => {
                    warn!(worker = index, error = %err, "render worker failed");
                    if failure.is_none() {
                        failure = Some(err);
                    }
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(reports),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Joins the workers that did start after a later launch failed. Their
/// failures are logged; the launch error is what the caller sees.
fn abandon_launch(group: TaskGroup<'_, '_>, launch_error: RenderError) -> RenderError {
    let launched = group.len();
    if let Err(err) = group.await_all() {
        warn!(
            launched,
            error = %err,
            "workers started before the launch failure also failed"
        );
    }
    launch_error
}

/// Renders `scene` through `sampler` on `job.workers()` fresh threads, one
/// per column block, and returns the image once every worker has joined.
pub fn render<S, P>(scene: &S, sampler: &P, job: &RenderJob) -> Result<RenderOutput, RenderError>
where
    S: Sync + ?Sized,
    P: PixelSampler<S> + ?Sized,
{
    let mut image = Image::new(job.width, job.height);
    let blocks = partition(job.width, job.workers)?;

    let dropped = dropped_columns(job.width, &blocks);
    if !dropped.is_empty() {
        warn!(
            width = job.width,
            workers = job.workers,
            first = dropped.start,
            count = dropped.len(),
            "width is not a multiple of the worker count; right-edge columns are not rendered"
        );
    }

    let views = image.split_columns(&blocks)?;

    let start = Instant::now();
    let reports = thread::scope(|scope| {
        let mut group = TaskGroup::new(scope);
        for (index, view) in views.into_iter().enumerate() {
            let worker = RenderWorker::new(index, scene, sampler, job.samples, view);
            if let Err(err) = group.launch(index, move || worker.run()) {
                return Err(abandon_launch(group, err));
            }
        }
        group.await_all()
    })?;
    let elapsed = start.elapsed();

    info!(
        workers = job.workers,
        width = job.width,
        height = job.height,
        samples = job.samples,
        elapsed_secs = elapsed.as_secs_f64(),
        "render finished"
    );

    Ok(RenderOutput {
        image,
        elapsed,
        workers: reports,
    })
}
