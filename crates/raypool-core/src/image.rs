use crate::color::Color;
use crate::error::RenderError;
use crate::partition::Block;

/// Render target stored column-major so that a run of columns is one
/// contiguous slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Image {
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::default())
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    /// Panics if `(x, y)` is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        match self.get(x, y) {
            Some(color) => color,
            None => panic!(
                "pixel ({x}, {y}) is outside a {}x{} image",
                self.width, self.height
            ),
        }
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) is outside a {}x{} image",
            self.width,
            self.height
        );
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// Yields `(x, y, color)` scanline by scanline, the order encoders expect.
    pub fn pixels_row_major(&self) -> impl Iterator<Item = (u32, u32, Color)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y, self.pixels[self.index(x, y)])))
    }

    /// Hands out one exclusive view per block.
    ///
    /// Non-empty blocks must be sorted by start, must not overlap and must lie
    /// inside `[0, width)`. Empty blocks get an empty view.
    pub fn split_columns(&mut self, blocks: &[Block]) -> Result<Vec<ColumnsMut<'_>>, RenderError> {
        let width = self.width;
        let height = self.height;
        let column_len = height as usize;

        let mut rest: &mut [Color] = &mut self.pixels;
        let mut cursor = 0u32;
        let mut views = Vec::with_capacity(blocks.len());

        for &block in blocks {
            let out_of_range = block.end < block.start || block.end > width;
            let overlaps = !block.is_empty() && block.start < cursor;
            if out_of_range || overlaps {
                return Err(RenderError::InvalidBlock {
                    start: block.start,
                    end: block.end,
                    width,
                });
            }

            if block.is_empty() {
                views.push(ColumnsMut {
                    block,
                    height,
                    pixels: &mut [],
                });
                continue;
            }

            let skip = (block.start - cursor) as usize * column_len;
            let len = block.len() as usize * column_len;
            let (_, tail) = std::mem::take(&mut rest).split_at_mut(skip);
            let (pixels, tail) = tail.split_at_mut(len);
            rest = tail;
            cursor = block.end;

            views.push(ColumnsMut {
                block,
                height,
                pixels,
            });
        }

        Ok(views)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        x as usize * self.height as usize + y as usize
    }
}

/// Exclusive write access to the full-height columns of one [`Block`].
/// Coordinates stay absolute image coordinates.
#[derive(Debug)]
pub struct ColumnsMut<'a> {
    block: Block,
    height: u32,
    pixels: &'a mut [Color],
}

impl ColumnsMut<'_> {
    pub fn block(&self) -> Block {
        self.block
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if self.block.contains(x) && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    /// Panics if `x` is outside the block or `y` outside the image height.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        assert!(
            self.block.contains(x) && y < self.height,
            "pixel ({x}, {y}) is outside column block {}..{}",
            self.block.start,
            self.block.end
        );
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (x - self.block.start) as usize * self.height as usize + y as usize
    }
}
