use proptest::prelude::*;
use tilestream_geom::Vec2;
use tilestream_world::{CellGrid, ChunkKey, UniformGrid, chunk_cells, chunk_origin, floor_div, world_to_chunk};

fn divisor() -> impl Strategy<Value = i32> {
    1i32..=4096
}

fn small_i32() -> impl Strategy<Value = i32> {
    -1_000_000i32..=1_000_000
}

#[test]
fn floor_div_fixed_points() {
    assert_eq!(floor_div(-1, 32), -1);
    assert_eq!(floor_div(-32, 32), -1);
    assert_eq!(floor_div(-33, 32), -2);
    assert_eq!(floor_div(31, 32), 0);
    assert_eq!(floor_div(i32::MIN, 1), i32::MIN);
    assert_eq!(floor_div(i32::MAX, 2), i32::MAX / 2);
}

proptest! {
    // q*b + r == a with 0 <= r < b
    #[test]
    fn floor_div_law(a in any::<i32>(), b in divisor()) {
        let q = floor_div(a, b);
        let r = i64::from(a) - i64::from(q) * i64::from(b);
        prop_assert!(r >= 0 && r < i64::from(b));
    }

    // Matches the standard library's Euclidean division for positive divisors
    #[test]
    fn floor_div_matches_div_euclid(a in any::<i32>(), b in divisor()) {
        prop_assert_eq!(floor_div(a, b), a.div_euclid(b));
    }

    // Every cell of a chunk maps back to that chunk
    #[test]
    fn chunk_cells_round_trip(cx in -10_000i32..10_000, cy in -10_000i32..10_000, size in 1i32..=16) {
        let key = ChunkKey::new(cx, cy);
        let mut count = 0usize;
        for cell in chunk_cells(key, size) {
            prop_assert_eq!(cell.to_chunk(size), key);
            count += 1;
        }
        prop_assert_eq!(count, (size * size) as usize);
        prop_assert_eq!(chunk_origin(key, size).to_chunk(size), key);
    }

    // Positions inside a chunk's world rect resolve to that chunk
    #[test]
    fn world_positions_resolve_to_containing_chunk(x in small_i32(), y in small_i32(), fx in 0.0f32..0.99, fy in 0.0f32..0.99, size in 1i32..=64) {
        let grid = UniformGrid::new(1.0);
        let pos = Vec2::new(x as f32 + fx, y as f32 + fy);
        let key = world_to_chunk(&grid, pos, size);
        prop_assert_eq!(key, grid.world_to_cell(pos).to_chunk(size));
        prop_assert!(grid.chunk_world_rect(key, size).contains(grid.cell_center(grid.world_to_cell(pos))));
    }
}
