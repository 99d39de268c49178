use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default)]
    pub chunks: Chunks,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub props: Props,
    #[serde(default)]
    pub grid: Grid,
}

fn default_seed() -> i32 {
    12345
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            chunks: Chunks::default(),
            terrain: Terrain::default(),
            props: Props::default(),
            grid: Grid::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Chunks {
    #[serde(default = "default_chunk_size")]
    pub size: i32,
    #[serde(default = "default_view_distance")]
    pub view_distance: i32,
}
fn default_chunk_size() -> i32 {
    32
}
// 2 => (2*2+1)^2 = 25 resident chunks
fn default_view_distance() -> i32 {
    2
}
impl Default for Chunks {
    fn default() -> Self {
        Self {
            size: default_chunk_size(),
            view_distance: default_view_distance(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Terrain {
    /// Bigger = larger patches, smaller = more speckle.
    #[serde(default = "default_noise_scale")]
    pub noise_scale: f32,
    #[serde(default = "default_threshold_a")]
    pub threshold_a: f32,
    #[serde(default = "default_threshold_b")]
    pub threshold_b: f32,
}
fn default_noise_scale() -> f32 {
    18.0
}
fn default_threshold_a() -> f32 {
    0.65
}
fn default_threshold_b() -> f32 {
    0.9
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            noise_scale: default_noise_scale(),
            threshold_a: default_threshold_a(),
            threshold_b: default_threshold_b(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Props {
    /// Per-cell spawn probability.
    #[serde(default = "default_prop_chance")]
    pub chance: f32,
    #[serde(default = "default_max_per_chunk")]
    pub max_per_chunk: i64,
    /// Full width of the jitter square around the cell center, in world units.
    #[serde(default = "default_prop_jitter")]
    pub jitter: f32,
    #[serde(default)]
    pub palette: Vec<PaletteSlot>,
}
fn default_prop_chance() -> f32 {
    0.03
}
fn default_max_per_chunk() -> i64 {
    25
}
fn default_prop_jitter() -> f32 {
    0.25
}
impl Default for Props {
    fn default() -> Self {
        Self {
            chance: default_prop_chance(),
            max_per_chunk: default_max_per_chunk(),
            jitter: default_prop_jitter(),
            palette: Vec::new(),
        }
    }
}

/// One palette entry; a slot without a name is left unassigned.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PaletteSlot {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Grid {
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
}
fn default_cell_size() -> f32 {
    1.0
}
impl Default for Grid {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropArchetype {
    pub name: String,
}

impl PropArchetype {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// Flattened params used by generation and streaming (snapshot of config)
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    pub chunk_size: i32,
    pub view_distance_chunks: i32,
    pub seed: i32,
    pub noise_scale: f32,
    pub threshold_a: f32,
    pub threshold_b: f32,
    pub prop_chance: f32,
    pub max_props_per_chunk: usize,
    pub prop_jitter: f32,
    pub palette: Vec<Option<PropArchetype>>,
    pub cell_size: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }
}

impl WorldConfig {
    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        Self {
            chunk_size: cfg.chunks.size,
            view_distance_chunks: cfg.chunks.view_distance,
            seed: cfg.seed,
            noise_scale: cfg.terrain.noise_scale,
            threshold_a: cfg.terrain.threshold_a,
            threshold_b: cfg.terrain.threshold_b,
            prop_chance: cfg.props.chance,
            max_props_per_chunk: usize::try_from(cfg.props.max_per_chunk.max(0)).unwrap_or(usize::MAX),
            prop_jitter: cfg.props.jitter,
            palette: cfg
                .props
                .palette
                .iter()
                .map(|slot| slot.name.as_ref().map(PropArchetype::new))
                .collect(),
            cell_size: cfg.grid.cell_size,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size <= 0 {
            return Err(ConfigError::ChunkSize(self.chunk_size));
        }
        if self.view_distance_chunks < 0 {
            return Err(ConfigError::ViewDistance(self.view_distance_chunks));
        }
        if !(self.noise_scale.is_finite() && self.noise_scale > 0.0) {
            return Err(ConfigError::NoiseScale(self.noise_scale));
        }
        for (name, value) in [("threshold_a", self.threshold_a), ("threshold_b", self.threshold_b)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdRange { name, value });
            }
        }
        if self.threshold_a > self.threshold_b {
            return Err(ConfigError::ThresholdOrder {
                a: self.threshold_a,
                b: self.threshold_b,
            });
        }
        if !(0.0..=1.0).contains(&self.prop_chance) {
            return Err(ConfigError::PropChance(self.prop_chance));
        }
        if !(self.prop_jitter.is_finite() && self.prop_jitter >= 0.0) {
            return Err(ConfigError::PropJitter(self.prop_jitter));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::CellSize(self.cell_size));
        }
        Ok(())
    }

    /// Whether chunk generation can emit any props at all.
    pub fn props_enabled(&self) -> bool {
        self.prop_chance > 0.0
            && self.max_props_per_chunk > 0
            && self.palette.iter().any(Option::is_some)
    }

    #[inline]
    pub fn cells_per_chunk(&self) -> usize {
        let edge = self.chunk_size.max(0) as usize;
        edge * edge
    }

    /// `(2r + 1)^2`, the resident chunk bound.
    #[inline]
    pub fn window_chunk_count(&self) -> usize {
        let edge = 2 * self.view_distance_chunks.max(0) as usize + 1;
        edge * edge
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldGenConfig = toml::from_str(s)?;
        let params = Self::from_config(&cfg);
        params.validate()?;
        Ok(params)
    }
}

pub fn load_config_from_path(path: &Path) -> Result<WorldConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg = WorldConfig::from_toml_str(&s)?;
    log::debug!(
        "world config {}: seed={} chunk_size={} palette={} slot(s)",
        path.display(),
        cfg.seed,
        cfg.chunk_size,
        cfg.palette.len()
    );
    Ok(cfg)
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    ChunkSize(i32),
    ViewDistance(i32),
    NoiseScale(f32),
    ThresholdRange { name: &'static str, value: f32 },
    ThresholdOrder { a: f32, b: f32 },
    PropChance(f32),
    PropJitter(f32),
    CellSize(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ChunkSize(v) => write!(f, "chunk size must be positive, got {}", v),
            ConfigError::ViewDistance(v) => {
                write!(f, "view distance must be non-negative, got {}", v)
            }
            ConfigError::NoiseScale(v) => write!(f, "noise scale must be positive, got {}", v),
            ConfigError::ThresholdRange { name, value } => {
                write!(f, "{} must lie in [0, 1], got {}", name, value)
            }
            ConfigError::ThresholdOrder { a, b } => {
                write!(f, "threshold_a ({}) must not exceed threshold_b ({})", a, b)
            }
            ConfigError::PropChance(v) => write!(f, "prop chance must lie in [0, 1], got {}", v),
            ConfigError::PropJitter(v) => write!(f, "prop jitter must be non-negative, got {}", v),
            ConfigError::CellSize(v) => write!(f, "cell size must be positive, got {}", v),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_world() {
        let cfg = WorldConfig::default();
        assert_eq!(cfg.chunk_size, 32);
        assert_eq!(cfg.view_distance_chunks, 2);
        assert_eq!(cfg.seed, 12345);
        assert_eq!(cfg.noise_scale, 18.0);
        assert_eq!((cfg.threshold_a, cfg.threshold_b), (0.65, 0.9));
        assert_eq!(cfg.max_props_per_chunk, 25);
        assert!(cfg.palette.is_empty());
        assert!(!cfg.props_enabled());
        assert_eq!(cfg.window_chunk_count(), 25);
        assert_eq!(cfg.cells_per_chunk(), 1024);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parses_sections_and_palette_slots() {
        let cfg = WorldConfig::from_toml_str(
            r#"
            seed = -7
            [chunks]
            size = 16
            view_distance = 1
            [terrain]
            threshold_a = 0.4
            [props]
            chance = 0.1
            max_per_chunk = -3
            [[props.palette]]
            name = "bush"
            [[props.palette]]
            [[props.palette]]
            name = "rock"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, -7);
        assert_eq!(cfg.chunk_size, 16);
        assert_eq!(cfg.view_distance_chunks, 1);
        assert_eq!(cfg.threshold_a, 0.4);
        assert_eq!(cfg.threshold_b, 0.9);
        assert_eq!(cfg.max_props_per_chunk, 0);
        assert_eq!(
            cfg.palette,
            vec![Some(PropArchetype::new("bush")), None, Some(PropArchetype::new("rock"))]
        );
        assert!(!cfg.props_enabled());
    }

    #[test]
    fn rejects_invalid_values() {
        let bad = [
            ("[chunks]\nsize = 0", ConfigError::ChunkSize(0)),
            ("[chunks]\nview_distance = -1", ConfigError::ViewDistance(-1)),
            ("[terrain]\nnoise_scale = 0.0", ConfigError::NoiseScale(0.0)),
            ("[props]\nchance = 1.5", ConfigError::PropChance(1.5)),
            ("[props]\njitter = -1.0", ConfigError::PropJitter(-1.0)),
            ("[grid]\ncell_size = 0.0", ConfigError::CellSize(0.0)),
            (
                "[terrain]\nthreshold_b = 1.2",
                ConfigError::ThresholdRange { name: "threshold_b", value: 1.2 },
            ),
            (
                "[terrain]\nthreshold_a = 0.95",
                ConfigError::ThresholdOrder { a: 0.95, b: 0.9 },
            ),
        ];
        for (src, expected) in bad {
            let cfg = WorldConfig::from_config(&toml::from_str::<WorldGenConfig>(src).unwrap());
            assert_eq!(cfg.validate(), Err(expected), "{}", src);
            assert!(WorldConfig::from_toml_str(src).is_err());
        }
    }

    #[test]
    fn bundled_config_is_valid() {
        let cfg = WorldConfig::from_toml_str(include_str!("../../../config/world.toml")).unwrap();
        assert_eq!(cfg.chunk_size, 32);
        assert_eq!(cfg.palette.len(), 4);
        assert_eq!(cfg.palette[2], None);
        assert!(cfg.props_enabled());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config_from_path(Path::new("/nonexistent/tilestream.toml")).is_err());
    }
}
