use serde::{Deserialize, Serialize};

/// Chunk address on the infinite 2D chunk grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkKey {
    pub cx: i32,
    pub cy: i32,
}

impl ChunkKey {
    #[inline]
    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
        }
    }

    /// Largest per-axis distance; the view window is a Chebyshev ball.
    #[inline]
    pub fn chebyshev_distance(self, other: ChunkKey) -> i64 {
        let dx = (i64::from(self.cx) - i64::from(other.cx)).abs();
        let dy = (i64::from(self.cy) - i64::from(other.cy)).abs();
        dx.max(dy)
    }
}

impl From<(i32, i32)> for ChunkKey {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkKey> for (i32, i32) {
    fn from(value: ChunkKey) -> Self {
        (value.cx, value.cy)
    }
}

/// Integer tile cell in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_chunk(self, chunk_size: i32) -> ChunkKey {
        ChunkKey::new(floor_div(self.x, chunk_size), floor_div(self.y, chunk_size))
    }
}

impl From<(i32, i32)> for CellCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

/// Floor division for a positive divisor.
///
/// Rust's `/` truncates toward zero, so `-1 / 32 == 0`; cells left of or below
/// the origin would land in chunk 0 instead of chunk -1. The quotient is
/// stepped down when the remainder is non-zero and its sign differs from the
/// divisor's.
#[inline]
pub fn floor_div(a: i32, b: i32) -> i32 {
    let q = a / b;
    let r = a % b;
    if r != 0 && ((r > 0) != (b > 0)) { q - 1 } else { q }
}

/// Minimum cell of a chunk.
#[inline]
pub fn chunk_origin(key: ChunkKey, chunk_size: i32) -> CellCoord {
    CellCoord::new(key.cx * chunk_size, key.cy * chunk_size)
}

/// Every cell of a chunk in row-major order (y outer, x inner).
pub fn chunk_cells(key: ChunkKey, chunk_size: i32) -> impl Iterator<Item = CellCoord> {
    let origin = chunk_origin(key, chunk_size);
    (0..chunk_size)
        .flat_map(move |y| (0..chunk_size).map(move |x| CellCoord::new(origin.x + x, origin.y + y)))
}

/// Chunks within Chebyshev distance `radius` of `center`, rows bottom to top.
pub fn view_window(center: ChunkKey, radius: i32) -> impl Iterator<Item = ChunkKey> {
    let r = radius.max(0);
    (-r..=r).flat_map(move |dy| (-r..=r).map(move |dx| center.offset(dx, dy)))
}
