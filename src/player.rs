use tilestream_geom::Vec2;
use tilestream_runtime::PositionProvider;

/// Scripted observer: moves `speed` units per step along `yaw`, turning
/// `turn_rate` degrees per step (zero walks a straight line).
#[derive(Debug, Clone)]
pub struct Walker {
    pub pos: Vec2,
    pub yaw: f32,       // degrees, counter-clockwise from +X
    pub speed: f32,     // world units per step
    pub turn_rate: f32, // degrees per step
    pub travelled: f32,
}

impl Walker {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            pos: spawn,
            yaw: 30.0,
            speed: 0.25,
            turn_rate: 0.0,
            travelled: 0.0,
        }
    }

    pub fn advance(&mut self) {
        self.pos += Vec2::from_angle_deg(self.yaw) * self.speed;
        self.travelled += self.speed.abs();
        self.yaw = (self.yaw + self.turn_rate).rem_euclid(360.0);
    }
}

impl PositionProvider for Walker {
    #[inline]
    fn position(&self) -> Vec2 {
        self.pos
    }
}
