use hashbrown::{HashMap, HashSet};
use tilestream_geom::Vec2;
use tilestream_world::{
    CellGrid, ChunkKey, NoiseField, TileWrite, UniformGrid, WorldConfig, fill_chunk_clears,
    fill_chunk_tiles, generate_props, view_window, world_to_chunk,
};

use crate::{PositionProvider, PropSink, StreamerError, TileSurface};

/// Work performed by one streaming pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub loaded: usize,
    pub repainted: usize,
    pub evicted: usize,
    pub props_spawned: usize,
    pub props_destroyed: usize,
}

impl ReconcileReport {
    #[inline]
    pub fn is_noop(&self) -> bool {
        *self == ReconcileReport::default()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub passes: u64,
    pub chunks_loaded: u64,
    pub chunks_repainted: u64,
    pub chunks_evicted: u64,
    pub props_spawned: u64,
    pub props_destroyed: u64,
    pub resident: usize,
    pub live_props: usize,
}

pub struct ChunkStreamerBuilder<S, P, G = UniformGrid> {
    config: WorldConfig,
    grid: G,
    surface: Option<S>,
    sink: Option<P>,
}

impl<S, P> ChunkStreamerBuilder<S, P, UniformGrid> {
    pub fn new(config: WorldConfig) -> Self {
        let grid = UniformGrid::new(config.cell_size);
        Self {
            config,
            grid,
            surface: None,
            sink: None,
        }
    }
}

impl<S, P, G> ChunkStreamerBuilder<S, P, G> {
    pub fn tile_surface(mut self, surface: S) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn prop_sink(mut self, sink: P) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replace the default uniform grid built from `config.cell_size`.
    pub fn grid<G2: CellGrid>(self, grid: G2) -> ChunkStreamerBuilder<S, P, G2> {
        ChunkStreamerBuilder {
            config: self.config,
            grid,
            surface: self.surface,
            sink: self.sink,
        }
    }

    /// Validate and assemble. Nothing is streamed until the first observer update.
    pub fn build(self) -> Result<ChunkStreamer<S, P, G>, StreamerError>
    where
        S: TileSurface,
        P: PropSink,
        G: CellGrid,
    {
        self.config.validate()?;
        let surface = self.surface.ok_or(StreamerError::MissingTileSurface)?;
        let sink = self.sink.ok_or(StreamerError::MissingPropSink)?;
        let config = self.config;
        if !config.palette.is_empty() && config.palette.iter().all(Option::is_none) {
            log::warn!(
                target: "stream",
                "prop palette has {} slot(s) but none assigned; chunks will spawn no props",
                config.palette.len()
            );
        }
        log::info!(
            target: "stream",
            "streamer ready: chunk_size={} view_distance={} seed={} window={} chunks props={}",
            config.chunk_size,
            config.view_distance_chunks,
            config.seed,
            config.window_chunk_count(),
            if config.props_enabled() { "on" } else { "off" }
        );
        Ok(ChunkStreamer {
            noise: NoiseField::new(config.seed, config.noise_scale),
            batch: Vec::with_capacity(config.cells_per_chunk()),
            config,
            grid: self.grid,
            surface,
            sink,
            observer: None,
            resident: HashSet::new(),
            props: HashMap::new(),
            stats: StreamStats::default(),
        })
    }
}

/// Keeps the Chebyshev window of chunks around the observer painted and populated.
///
/// A chunk is resident iff its tiles were committed to the surface and its prop
/// handles were recorded; the two maps are only changed together.
pub struct ChunkStreamer<S, P: PropSink, G = UniformGrid> {
    config: WorldConfig,
    grid: G,
    noise: NoiseField,
    surface: S,
    sink: P,
    observer: Option<ChunkKey>,
    resident: HashSet<ChunkKey>,
    props: HashMap<ChunkKey, Vec<P::Handle>>,
    // Reused for every tile and clear batch.
    batch: Vec<TileWrite>,
    stats: StreamStats,
}

impl<S: TileSurface, P: PropSink> ChunkStreamer<S, P, UniformGrid> {
    pub fn builder(config: WorldConfig) -> ChunkStreamerBuilder<S, P> {
        ChunkStreamerBuilder::new(config)
    }
}

impl<S: TileSurface, P: PropSink, G: CellGrid> ChunkStreamer<S, P, G> {
    /// Poll the provider once and stream around its position.
    pub fn step<O: PositionProvider + ?Sized>(&mut self, provider: &O) -> ReconcileReport {
        self.on_observer_moved(provider.position())
    }

    /// Streams only when the observer's chunk changed; the first call always
    /// runs a forced pass.
    pub fn on_observer_moved(&mut self, position: Vec2) -> ReconcileReport {
        let chunk = world_to_chunk(&self.grid, position, self.config.chunk_size);
        let initial = self.observer.is_none();
        if self.observer == Some(chunk) {
            return ReconcileReport::default();
        }
        if let Some(prev) = self.observer {
            log::debug!(
                target: "stream",
                "observer chunk ({}, {}) -> ({}, {})",
                prev.cx,
                prev.cy,
                chunk.cx,
                chunk.cy
            );
        }
        self.observer = Some(chunk);
        self.reconcile(initial)
    }

    /// Repaint every chunk in the current window without touching props.
    pub fn refresh(&mut self) -> ReconcileReport {
        self.reconcile(true)
    }

    /// Diff the window around the observer chunk against the resident set.
    ///
    /// Evictions run first so that every destroy of a chunk completes before it
    /// could be loaded again. With `force`, chunks already resident are
    /// repainted; their props are left alone since a record already exists.
    pub fn reconcile(&mut self, force: bool) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let Some(center) = self.observer else {
            return report;
        };
        let radius = self.config.view_distance_chunks;

        let mut victims: Vec<ChunkKey> = self
            .resident
            .iter()
            .copied()
            .filter(|key| key.chebyshev_distance(center) > i64::from(radius))
            .collect();
        victims.sort_unstable();
        for key in victims {
            if let Some(destroyed) = self.evict_chunk(key) {
                report.evicted += 1;
                report.props_destroyed += destroyed;
            }
        }

        for key in view_window(center, radius) {
            let was_resident = self.resident.contains(&key);
            if was_resident && !force {
                continue;
            }
            report.props_spawned += self.load_chunk(key);
            if was_resident {
                report.repainted += 1;
            } else {
                report.loaded += 1;
            }
        }

        self.stats.passes += 1;
        self.stats.chunks_loaded += report.loaded as u64;
        self.stats.chunks_repainted += report.repainted as u64;
        self.stats.chunks_evicted += report.evicted as u64;
        self.stats.props_spawned += report.props_spawned as u64;
        self.stats.props_destroyed += report.props_destroyed as u64;
        log::info!(
            target: "stream",
            "[pass {}] center=({}, {}) loaded={} repainted={} evicted={} props +{} -{} resident={}",
            self.stats.passes,
            center.cx,
            center.cy,
            report.loaded,
            report.repainted,
            report.evicted,
            report.props_spawned,
            report.props_destroyed,
            self.resident.len()
        );
        report
    }

    /// Evict every resident chunk. The next observer update starts a fresh forced pass.
    pub fn unload_all(&mut self) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut keys: Vec<ChunkKey> = self.resident.iter().copied().collect();
        keys.sort_unstable();
        for key in keys {
            if let Some(destroyed) = self.evict_chunk(key) {
                report.evicted += 1;
                report.props_destroyed += destroyed;
            }
        }
        self.stats.chunks_evicted += report.evicted as u64;
        self.stats.props_destroyed += report.props_destroyed as u64;
        self.observer = None;
        log::info!(
            target: "stream",
            "unloaded {} chunk(s), destroyed {} prop(s)",
            report.evicted,
            report.props_destroyed
        );
        report
    }

    // Paint tiles, spawn props if the chunk has no record yet, mark resident.
    // Returns the number of props spawned.
    fn load_chunk(&mut self, key: ChunkKey) -> usize {
        self.batch.clear();
        fill_chunk_tiles(&self.noise, key, &self.config, &mut self.batch);
        self.surface.set_tiles(&self.batch);

        let mut spawned = 0;
        if !self.props.contains_key(&key) {
            let placements = generate_props(key, &self.config);
            let mut handles = Vec::with_capacity(placements.len());
            for placement in &placements {
                let Some(archetype) = self
                    .config
                    .palette
                    .get(placement.prefab_index)
                    .and_then(Option::as_ref)
                else {
                    continue;
                };
                let position = placement.world_position(&self.grid);
                handles.push(self.sink.instantiate(placement.prefab_index, archetype, position));
            }
            spawned = handles.len();
            self.props.insert(key, handles);
        } else if !self.resident.contains(&key) {
            log::warn!(
                target: "stream",
                "chunk ({}, {}) has a prop record but was not resident; keeping existing props",
                key.cx,
                key.cy
            );
        }

        self.resident.insert(key);
        log::trace!(target: "stream", "loaded chunk ({}, {}) props={}", key.cx, key.cy, spawned);
        spawned
    }

    // Clear tiles, destroy every tracked handle, then drop the record.
    // Returns the number of props destroyed, or None if the chunk was not resident.
    fn evict_chunk(&mut self, key: ChunkKey) -> Option<usize> {
        if !self.resident.contains(&key) {
            log::warn!(target: "stream", "evict of non-resident chunk ({}, {}) ignored", key.cx, key.cy);
            return None;
        }

        self.batch.clear();
        fill_chunk_clears(key, self.config.chunk_size, &mut self.batch);
        self.surface.set_tiles(&self.batch);

        let mut destroyed = 0;
        if let Some(handles) = self.props.get_mut(&key) {
            for handle in handles.drain(..) {
                self.sink.destroy(handle);
                destroyed += 1;
            }
        } else {
            log::warn!(
                target: "stream",
                "resident chunk ({}, {}) had no prop record",
                key.cx,
                key.cy
            );
        }
        self.props.remove(&key);
        self.resident.remove(&key);
        log::trace!(target: "stream", "evicted chunk ({}, {}) props={}", key.cx, key.cy, destroyed);
        Some(destroyed)
    }

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[inline]
    pub fn grid(&self) -> &G {
        &self.grid
    }

    #[inline]
    pub fn observer_chunk(&self) -> Option<ChunkKey> {
        self.observer
    }

    #[inline]
    pub fn is_resident(&self, key: ChunkKey) -> bool {
        self.resident.contains(&key)
    }

    #[inline]
    pub fn resident_count(&self) -> usize {
        self.resident.len()
    }

    /// Resident chunk keys in ascending order.
    pub fn resident_keys(&self) -> Vec<ChunkKey> {
        let mut keys: Vec<ChunkKey> = self.resident.iter().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub fn prop_handles(&self, key: ChunkKey) -> Option<&[P::Handle]> {
        self.props.get(&key).map(Vec::as_slice)
    }

    pub fn live_prop_count(&self) -> usize {
        self.props.values().map(Vec::len).sum()
    }

    pub fn stats(&self) -> StreamStats {
        StreamStats {
            resident: self.resident.len(),
            live_props: self.live_prop_count(),
            ..self.stats
        }
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn sink(&self) -> &P {
        &self.sink
    }

    /// Hand the collaborators back. Props still live are not destroyed; call
    /// [`ChunkStreamer::unload_all`] first to release them.
    pub fn into_parts(self) -> (S, P) {
        (self.surface, self.sink)
    }
}
