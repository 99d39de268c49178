use proptest::prelude::*;
use tilestream_world::{ChunkKey, PropArchetype, WorldConfig, generate_props};

fn palette(len: usize, holes: bool) -> Vec<Option<PropArchetype>> {
    (0..len)
        .map(|i| {
            if holes && i % 2 == 1 {
                None
            } else {
                Some(PropArchetype::new(format!("prop{}", i)))
            }
        })
        .collect()
}

fn prop_config(seed: i32, chance: f32, cap: usize, jitter: f32, pal: Vec<Option<PropArchetype>>) -> WorldConfig {
    WorldConfig {
        seed,
        chunk_size: 16,
        prop_chance: chance,
        max_props_per_chunk: cap,
        prop_jitter: jitter,
        palette: pal,
        ..WorldConfig::default()
    }
}

fn chunk_key() -> impl Strategy<Value = ChunkKey> {
    (-5_000i32..5_000, -5_000i32..5_000).prop_map(|(cx, cy)| ChunkKey::new(cx, cy))
}

#[test]
fn seed_12345_with_zero_chance_is_always_empty() {
    let cfg = WorldConfig {
        seed: 12345,
        chunk_size: 32,
        prop_chance: 0.0,
        palette: palette(4, false),
        ..WorldConfig::default()
    };
    for cy in -4..=4 {
        for cx in -4..=4 {
            assert!(generate_props(ChunkKey::new(cx, cy), &cfg).is_empty());
        }
    }
}

#[test]
fn empty_palette_or_zero_cap_is_empty() {
    let empty = prop_config(1, 1.0, 10, 0.0, Vec::new());
    assert!(generate_props(ChunkKey::new(0, 0), &empty).is_empty());
    let capped = prop_config(1, 1.0, 0, 0.0, palette(2, false));
    assert!(generate_props(ChunkKey::new(0, 0), &capped).is_empty());
}

#[test]
fn full_chance_stops_at_cap_in_scan_order() {
    let cfg = prop_config(3, 1.0, 5, 0.0, palette(1, false));
    let props = generate_props(ChunkKey::new(2, -1), &cfg);
    let cells: Vec<(i32, i32)> = props.iter().map(|p| (p.cell.x, p.cell.y)).collect();
    assert_eq!(cells, vec![(32, -16), (33, -16), (34, -16), (35, -16), (36, -16)]);
    assert!(props.iter().all(|p| p.jitter.x == 0.0 && p.jitter.y == 0.0));
}

proptest! {
    // Same chunk, same result, regardless of what was generated in between
    #[test]
    fn generation_is_order_independent(
        seed in any::<i32>(),
        key in chunk_key(),
        others in prop::collection::vec(chunk_key(), 0..6),
        chance in 0.0f32..=1.0,
        jitter in 0.0f32..2.0,
    ) {
        let cfg = prop_config(seed, chance, 25, jitter, palette(3, true));
        let first = generate_props(key, &cfg);
        for other in &others {
            let _ = generate_props(*other, &cfg);
        }
        let second = generate_props(key, &cfg);
        prop_assert_eq!(first, second);
    }

    // Placements stay inside their chunk, under the cap, on assigned slots, inside the jitter box
    #[test]
    fn placements_respect_bounds(
        seed in any::<i32>(),
        key in chunk_key(),
        chance in 0.0f32..=1.0,
        cap in 0usize..40,
        jitter in 0.0f32..4.0,
        len in 0usize..6,
    ) {
        let pal = palette(len, true);
        let cfg = prop_config(seed, chance, cap, jitter, pal.clone());
        let props = generate_props(key, &cfg);
        prop_assert!(props.len() <= cap);
        let half = jitter / 2.0;
        let mut last_cell: Option<(i32, i32)> = None;
        for p in &props {
            prop_assert_eq!(p.cell.to_chunk(cfg.chunk_size), key);
            prop_assert!(p.prefab_index < pal.len());
            prop_assert!(pal[p.prefab_index].is_some());
            prop_assert!(p.jitter.x >= -half && p.jitter.x <= half);
            prop_assert!(p.jitter.y >= -half && p.jitter.y <= half);
            // Row-major scan emits at most one prop per cell, in increasing order
            let order = (p.cell.y, p.cell.x);
            if let Some(prev) = last_cell {
                prop_assert!(order > prev);
            }
            last_cell = Some(order);
        }
    }
}
