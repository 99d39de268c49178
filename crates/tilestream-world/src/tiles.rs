use serde::{Deserialize, Serialize};

use crate::chunk_coord::{CellCoord, ChunkKey, chunk_cells};
use crate::noise::NoiseField;
use crate::worldgen::WorldConfig;

/// One surface write: a cell and its tile, `None` clearing the cell.
pub type TileWrite = (CellCoord, Option<TileVariant>);

/// The three terrain classes produced by thresholding the noise field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileVariant {
    A,
    B,
    C,
}

impl TileVariant {
    pub const ALL: [TileVariant; 3] = [TileVariant::A, TileVariant::B, TileVariant::C];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// `noise < a` is A, `a <= noise < b` is B, everything else C.
///
/// With `a > b` the B band is empty and the result degenerates to A/C split at `a`.
#[inline]
pub fn classify(noise: f32, threshold_a: f32, threshold_b: f32) -> TileVariant {
    if noise < threshold_a {
        TileVariant::A
    } else if noise < threshold_b {
        TileVariant::B
    } else {
        TileVariant::C
    }
}

/// Appends a chunk's classified cells to `out` in row-major order.
pub fn fill_chunk_tiles(
    noise: &NoiseField,
    key: ChunkKey,
    config: &WorldConfig,
    out: &mut Vec<TileWrite>,
) {
    out.reserve(config.cells_per_chunk());
    out.extend(chunk_cells(key, config.chunk_size).map(|cell| {
        let n = noise.sample(cell.x, cell.y);
        (cell, Some(classify(n, config.threshold_a, config.threshold_b)))
    }));
}

/// Appends a clear write for every cell of the chunk.
pub fn fill_chunk_clears(key: ChunkKey, chunk_size: i32, out: &mut Vec<TileWrite>) {
    out.extend(chunk_cells(key, chunk_size).map(|cell| (cell, None)));
}
