//! Chunk coordinates, terrain sampling, prop placement, and world configuration.
#![forbid(unsafe_code)]

pub mod chunk_coord;
pub mod grid;
pub mod noise;
pub mod props;
pub mod tiles;
pub mod worldgen;

pub use chunk_coord::{CellCoord, ChunkKey, chunk_cells, chunk_origin, floor_div, view_window};
pub use grid::{CellGrid, UniformGrid, world_to_chunk};
pub use noise::NoiseField;
pub use props::{PropPlacement, chunk_seed, generate_props};
pub use tiles::{TileVariant, TileWrite, classify, fill_chunk_clears, fill_chunk_tiles};
pub use worldgen::{ConfigError, PropArchetype, WorldConfig, WorldGenConfig, load_config_from_path};
