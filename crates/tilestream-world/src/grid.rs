use tilestream_geom::{Rect, Vec2};

use crate::chunk_coord::{CellCoord, ChunkKey, chunk_origin};

/// Backend cell quantization: how continuous world positions map onto tile cells.
pub trait CellGrid {
    fn world_to_cell(&self, position: Vec2) -> CellCoord;
    fn cell_center(&self, cell: CellCoord) -> Vec2;
}

/// Square cells of `cell_size` world units, cell (0, 0) starting at `origin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformGrid {
    pub cell_size: f32,
    pub origin: Vec2,
}

impl UniformGrid {
    #[inline]
    pub const fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            origin: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn with_origin(self, origin: Vec2) -> Self {
        Self { origin, ..self }
    }

    #[inline]
    pub fn cell_min(&self, cell: CellCoord) -> Vec2 {
        self.origin + Vec2::new(cell.x as f32, cell.y as f32) * self.cell_size
    }

    /// World-space footprint of a chunk.
    pub fn chunk_world_rect(&self, key: ChunkKey, chunk_size: i32) -> Rect {
        let min = self.cell_min(chunk_origin(key, chunk_size));
        Rect::from_origin_size(min, Vec2::splat(chunk_size as f32 * self.cell_size))
    }
}

impl Default for UniformGrid {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl CellGrid for UniformGrid {
    #[inline]
    fn world_to_cell(&self, position: Vec2) -> CellCoord {
        let local = (position - self.origin) / self.cell_size;
        CellCoord::new(local.x.floor() as i32, local.y.floor() as i32)
    }

    #[inline]
    fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.cell_min(cell) + Vec2::splat(self.cell_size * 0.5)
    }
}

/// World position -> cell (through the grid) -> chunk.
#[inline]
pub fn world_to_chunk<G: CellGrid + ?Sized>(grid: &G, position: Vec2, chunk_size: i32) -> ChunkKey {
    grid.world_to_cell(position).to_chunk(chunk_size)
}
