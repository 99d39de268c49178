use fastnoise_lite::{FastNoiseLite, NoiseType};

// Distinct per-axis seed offsets keep the field from mirroring across x == y.
const SEED_OFFSET_X: f32 = 0.0137;
const SEED_OFFSET_Y: f32 = 0.0271;

/// Seeded 2D Perlin field sampled at integer cells, remapped to [0, 1].
pub struct NoiseField {
    noise: FastNoiseLite,
    seed: i32,
    scale: f32,
}

impl NoiseField {
    pub fn new(seed: i32, noise_scale: f32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::Perlin));
        // Coordinates are pre-divided by the scale, so the sampler runs at unit frequency.
        noise.set_frequency(Some(1.0));
        Self {
            noise,
            seed,
            scale: noise_scale,
        }
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn sample(&self, cell_x: i32, cell_y: i32) -> f32 {
        let seed = self.seed as f32;
        let sx = (cell_x as f32 + seed * SEED_OFFSET_X) / self.scale;
        let sy = (cell_y as f32 + seed * SEED_OFFSET_Y) / self.scale;
        (self.noise.get_noise_2d(sx, sy) * 0.5 + 0.5).clamp(0.0, 1.0)
    }
}

impl Clone for NoiseField {
    fn clone(&self) -> Self {
        Self::new(self.seed, self.scale)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("seed", &self.seed)
            .field("scale", &self.scale)
            .finish()
    }
}

/// One-shot sample; prefer a cached [`NoiseField`] inside loops.
pub fn sample(cell_x: i32, cell_y: i32, seed: i32, noise_scale: f32) -> f32 {
    NoiseField::new(seed, noise_scale).sample(cell_x, cell_y)
}
