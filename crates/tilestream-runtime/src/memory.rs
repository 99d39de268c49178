//! In-memory collaborators for headless hosts and tests.

use hashbrown::HashMap;
use tilestream_geom::Vec2;
use tilestream_world::{CellCoord, PropArchetype, TileVariant, TileWrite};

use crate::{PropSink, TileSurface};

/// Sparse tile map that records how it was written to.
#[derive(Clone, Debug, Default)]
pub struct MemoryTileSurface {
    tiles: HashMap<CellCoord, TileVariant>,
    pub batches: u64,
    pub writes: u64,
}

impl MemoryTileSurface {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn tile(&self, cell: CellCoord) -> Option<TileVariant> {
        self.tiles.get(&cell).copied()
    }

    #[inline]
    pub fn painted_cells(&self) -> usize {
        self.tiles.len()
    }

    /// Painted cell count per variant, indexed by [`TileVariant::index`].
    pub fn histogram(&self) -> [usize; 3] {
        let mut counts = [0usize; 3];
        for v in self.tiles.values() {
            counts[v.index()] += 1;
        }
        counts
    }
}

impl TileSurface for MemoryTileSurface {
    fn set_tiles(&mut self, writes: &[TileWrite]) {
        self.batches += 1;
        self.writes += writes.len() as u64;
        for &(cell, tile) in writes {
            match tile {
                Some(v) => {
                    self.tiles.insert(cell, v);
                }
                None => {
                    self.tiles.remove(&cell);
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnedProp {
    pub prefab_index: usize,
    pub archetype: String,
    pub position: Vec2,
}

/// Prop sink that hands out sequential ids and tracks which are still alive.
#[derive(Clone, Debug, Default)]
pub struct RecordingPropSink {
    next_id: u64,
    live: HashMap<PropId, SpawnedProp>,
    pub spawned_total: u64,
    pub destroyed: Vec<PropId>,
    pub unknown_destroys: u64,
}

impl RecordingPropSink {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn get(&self, id: PropId) -> Option<&SpawnedProp> {
        self.live.get(&id)
    }

    #[inline]
    pub fn is_live(&self, id: PropId) -> bool {
        self.live.contains_key(&id)
    }
}

impl PropSink for RecordingPropSink {
    type Handle = PropId;

    fn instantiate(&mut self, prefab_index: usize, archetype: &PropArchetype, position: Vec2) -> PropId {
        let id = PropId(self.next_id);
        self.next_id += 1;
        self.spawned_total += 1;
        self.live.insert(
            id,
            SpawnedProp {
                prefab_index,
                archetype: archetype.name.clone(),
                position,
            },
        );
        id
    }

    fn destroy(&mut self, handle: PropId) {
        if self.live.remove(&handle).is_none() {
            log::warn!(target: "stream", "destroy of unknown prop {:?}", handle);
            self.unknown_destroys += 1;
        }
        self.destroyed.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_sets_and_clears() {
        let mut s = MemoryTileSurface::new();
        let a = CellCoord::new(-1, 2);
        let b = CellCoord::new(3, 3);
        s.set_tiles(&[(a, Some(TileVariant::A)), (b, Some(TileVariant::C))]);
        assert_eq!(s.tile(a), Some(TileVariant::A));
        assert_eq!(s.histogram(), [1, 0, 1]);
        s.set_tiles(&[(a, None)]);
        assert_eq!(s.tile(a), None);
        assert_eq!(s.painted_cells(), 1);
        assert_eq!((s.batches, s.writes), (2, 3));
    }

    #[test]
    fn sink_tracks_live_handles() {
        let mut sink = RecordingPropSink::new();
        let bush = PropArchetype::new("bush");
        let h0 = sink.instantiate(0, &bush, Vec2::new(0.5, 0.5));
        let h1 = sink.instantiate(0, &bush, Vec2::new(1.5, 0.5));
        assert_ne!(h0, h1);
        assert_eq!(sink.live_count(), 2);
        assert_eq!(sink.get(h1).map(|p| p.archetype.as_str()), Some("bush"));
        sink.destroy(h0);
        assert!(!sink.is_live(h0));
        sink.destroy(h0);
        assert_eq!(sink.unknown_destroys, 1);
        assert_eq!(sink.live_count(), 1);
    }
}
