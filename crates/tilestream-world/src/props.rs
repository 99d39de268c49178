//! Deterministic per-chunk prop scatter.
//!
//! Every chunk draws from its own generator seeded from the world seed and the
//! chunk key, so a chunk's props come out identical no matter which chunks were
//! generated before it or how often it has been evicted and re-entered.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tilestream_geom::Vec2;

use crate::chunk_coord::{CellCoord, ChunkKey, chunk_cells};
use crate::grid::CellGrid;
use crate::worldgen::WorldConfig;

const CHUNK_MIX_X: i32 = 73_856_093;
const CHUNK_MIX_Y: i32 = 19_349_663;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropPlacement {
    pub cell: CellCoord,
    /// Index into the configured palette; always refers to an assigned slot.
    pub prefab_index: usize,
    /// Offset from the cell center, each axis in `[-jitter/2, jitter/2)`.
    pub jitter: Vec2,
}

impl PropPlacement {
    #[inline]
    pub fn world_position<G: CellGrid + ?Sized>(&self, grid: &G) -> Vec2 {
        grid.cell_center(self.cell) + self.jitter
    }
}

/// `seed ^ (cx * 73856093) ^ (cy * 19349663)` with wrapping multiplies.
#[inline]
pub fn chunk_seed(seed: i32, key: ChunkKey) -> i32 {
    seed ^ key.cx.wrapping_mul(CHUNK_MIX_X) ^ key.cy.wrapping_mul(CHUNK_MIX_Y)
}

#[inline]
fn chunk_rng(seed: i32, key: ChunkKey) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(u64::from(chunk_seed(seed, key) as u32))
}

/// Scatter props over a chunk's cells in row-major order.
///
/// Each cell draws one roll; rolls under `prop_chance` draw a palette index and
/// a jitter pair. Unassigned palette slots consume their draws but emit
/// nothing. Output is capped at `max_props_per_chunk`.
pub fn generate_props(key: ChunkKey, config: &WorldConfig) -> Vec<PropPlacement> {
    let palette = &config.palette;
    let cap = config.max_props_per_chunk;
    if palette.is_empty() || cap == 0 || config.prop_chance <= 0.0 {
        return Vec::new();
    }

    let mut rng = chunk_rng(config.seed, key);
    let jitter = config.prop_jitter;
    let mut out = Vec::new();
    for cell in chunk_cells(key, config.chunk_size) {
        let roll: f32 = rng.random();
        if roll >= config.prop_chance {
            continue;
        }
        let prefab_index = rng.random_range(0..palette.len());
        let jx = (rng.random::<f32>() - 0.5) * jitter;
        let jy = (rng.random::<f32>() - 0.5) * jitter;
        if palette[prefab_index].is_none() {
            continue;
        }
        out.push(PropPlacement {
            cell,
            prefab_index,
            jitter: Vec2::new(jx, jy),
        });
        if out.len() >= cap {
            break;
        }
    }
    out
}
