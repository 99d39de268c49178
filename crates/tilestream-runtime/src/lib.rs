//! Chunk streaming around a moving observer (single-threaded, step-driven).
#![forbid(unsafe_code)]

mod error;
pub mod memory;
mod streamer;

use std::fmt;

use tilestream_geom::Vec2;
use tilestream_world::{PropArchetype, TileWrite};

pub use error::StreamerError;
pub use streamer::{ChunkStreamer, ChunkStreamerBuilder, ReconcileReport, StreamStats};

/// Source of the observer's world position, polled once per step.
pub trait PositionProvider {
    fn position(&self) -> Vec2;
}

impl PositionProvider for Vec2 {
    #[inline]
    fn position(&self) -> Vec2 {
        *self
    }
}

/// Tile backend. Each call commits one whole chunk; `None` clears a cell.
pub trait TileSurface {
    fn set_tiles(&mut self, writes: &[TileWrite]);
}

/// Creates and destroys prop instances on behalf of the streamer.
///
/// Every handle returned by `instantiate` must be accepted by `destroy`.
pub trait PropSink {
    type Handle: fmt::Debug;

    fn instantiate(
        &mut self,
        prefab_index: usize,
        archetype: &PropArchetype,
        position: Vec2,
    ) -> Self::Handle;

    fn destroy(&mut self, handle: Self::Handle);
}
