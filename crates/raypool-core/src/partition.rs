use crate::error::RenderError;
use std::ops::Range;

/// Half-open column range `[start, end)` owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start: u32,
    pub end: u32,
}

impl Block {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, x: u32) -> bool {
        x >= self.start && x < self.end
    }

    pub fn columns(&self) -> Range<u32> {
        self.start..self.end
    }
}

/// Splits `[0, width)` into `workers` equal column blocks.
///
/// The block size is `width / workers`, so when the division has a remainder
/// the rightmost `width % workers` columns belong to no block and keep their
/// initial color. See [`dropped_columns`].
pub fn partition(width: u32, workers: u32) -> Result<Vec<Block>, RenderError> {
    if workers == 0 {
        return Err(RenderError::ZeroWorkers);
    }

    let size = width / workers;
    Ok((0..workers)
        .map(|i| Block::new(i * size, (i + 1) * size))
        .collect())
}

/// Right-edge columns of `[0, width)` that no block covers.
pub fn dropped_columns(width: u32, blocks: &[Block]) -> Range<u32> {
    let covered = blocks.iter().map(|block| block.end).max().unwrap_or(0);
    covered.min(width)..width
}
