/// Per-frame tuning snapshot for the flock.
///
/// Owned by whoever drives the simulation and handed to
/// [`Flock::update`](crate::Flock::update) by reference each frame. Values are
/// taken as given; range checks belong to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockConfig {
    pub separation_strength: f32,
    pub alignment_strength: f32,
    pub cohesion_strength: f32,
    /// Population-wide speed cap applied to every boid.
    pub max_speed: f32,
    pub population_size: usize,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            separation_strength: 1.5,
            alignment_strength: 1.0,
            cohesion_strength: 1.0,
            max_speed: 4.0,
            population_size: 100,
        }
    }
}

/// Extent of the simulation domain, `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}
