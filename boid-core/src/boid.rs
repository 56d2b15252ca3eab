use crate::config::{Bounds, FlockConfig};
use crate::vector::Vector3;

#[cfg(feature = "std")]
use rand::Rng;

pub const DEFAULT_MAX_FORCE: f32 = 0.2;
pub const DEFAULT_PERCEPTION_RADIUS: f32 = 50.0;
pub const DEFAULT_AVOIDANCE_RADIUS: f32 = 25.0;

/// Initial speed range for randomly spawned boids.
pub const SPAWN_SPEED: core::ops::Range<f32> = 2.0..4.0;

/// A single boid entity.
///
/// A boid is identified by its index in the flock, never by its state, so two
/// boids with identical fields are still distinct. The speed cap is not stored
/// here: it is a population-wide setting passed into every call that needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub position: Vector3,
    pub velocity: Vector3,
    /// Force accumulator, cleared by [`Boid::update`].
    pub acceleration: Vector3,
    pub max_force: f32,
    /// Neighbour radius for alignment and cohesion.
    pub perception_radius: f32,
    /// Neighbour radius for separation. Expected to be at most
    /// `perception_radius`.
    pub avoidance_radius: f32,
}

impl Boid {
    pub fn new(position: Vector3, velocity: Vector3) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector3::zero(),
            max_force: DEFAULT_MAX_FORCE,
            perception_radius: DEFAULT_PERCEPTION_RADIUS,
            avoidance_radius: DEFAULT_AVOIDANCE_RADIUS,
        }
    }

    pub fn with_radii(mut self, perception_radius: f32, avoidance_radius: f32) -> Self {
        self.perception_radius = perception_radius;
        self.avoidance_radius = avoidance_radius;
        self
    }

    pub fn with_max_force(mut self, max_force: f32) -> Self {
        self.max_force = max_force;
        self
    }

    /// Spawns a boid somewhere in `[0, width) x [0, height)` heading in a
    /// random direction at a speed drawn from [`SPAWN_SPEED`].
    #[cfg(feature = "std")]
    pub fn random<R: Rng + ?Sized>(bounds: &Bounds, rng: &mut R) -> Self {
        let position = Vector3::new_2d(
            rng.gen::<f32>() * bounds.width,
            rng.gen::<f32>() * bounds.height,
        );
        let speed = rng.gen_range(SPAWN_SPEED);
        let velocity = Vector3::random_unit_2d(rng).scale(speed);
        Self::new(position, velocity)
    }

    /// The larger of the two neighbour radii.
    pub fn reach(&self) -> f32 {
        self.perception_radius.max(self.avoidance_radius)
    }

    pub fn apply_force(&mut self, force: Vector3) {
        self.acceleration += force;
    }

    /// Euler step: fold the accumulated force into velocity, cap the speed,
    /// move, and clear the accumulator.
    pub fn update(&mut self, max_speed: f32) {
        self.velocity += self.acceleration;
        self.velocity = self.velocity.limit(max_speed);
        self.position += self.velocity;
        self.acceleration = Vector3::zero();
    }

    /// Teleports the boid to the opposite edge once it leaves the domain.
    pub fn wrap_edges(&mut self, bounds: &Bounds) {
        if self.position.x > bounds.width {
            self.position.x = 0.0;
        } else if self.position.x < 0.0 {
            self.position.x = bounds.width;
        }

        if self.position.y > bounds.height {
            self.position.y = 0.0;
        } else if self.position.y < 0.0 {
            self.position.y = bounds.height;
        }
    }

    /// Short-range repulsion. Each neighbour inside `avoidance_radius` pushes
    /// away along the line between the two boids, weighted by `1 / distance`.
    ///
    /// `me` is this boid's own index in the flock; `neighbors` yields
    /// `(index, boid)` candidates and may include `me`.
    pub fn separation<'a, I>(&self, me: usize, neighbors: I, max_speed: f32, strength: f32) -> Vector3
    where
        I: IntoIterator<Item = (usize, &'a Boid)>,
    {
        let mut sum = Vector3::zero();
        let mut count = 0;

        for (index, other) in neighbors {
            if index == me {
                continue;
            }
            let distance = self.position.distance(&other.position);
            if distance > 0.0 && distance < self.avoidance_radius {
                let away = (self.position - other.position).normalize();
                sum += away / distance;
                count += 1;
            }
        }

        if count == 0 {
            return Vector3::zero();
        }
        self.steer_towards(sum / count as f32, max_speed, strength)
    }

    /// Velocity matching against neighbours inside `perception_radius`.
    pub fn alignment<'a, I>(&self, me: usize, neighbors: I, max_speed: f32, strength: f32) -> Vector3
    where
        I: IntoIterator<Item = (usize, &'a Boid)>,
    {
        let mut sum = Vector3::zero();
        let mut count = 0;

        for (index, other) in neighbors {
            if self.perceives(me, index, other) {
                sum += other.velocity;
                count += 1;
            }
        }

        if count == 0 {
            return Vector3::zero();
        }
        self.steer_towards(sum / count as f32, max_speed, strength)
    }

    /// Attraction to the centroid of neighbours inside `perception_radius`.
    pub fn cohesion<'a, I>(&self, me: usize, neighbors: I, max_speed: f32, strength: f32) -> Vector3
    where
        I: IntoIterator<Item = (usize, &'a Boid)>,
    {
        let mut sum = Vector3::zero();
        let mut count = 0;

        for (index, other) in neighbors {
            if self.perceives(me, index, other) {
                sum += other.position;
                count += 1;
            }
        }

        if count == 0 {
            return Vector3::zero();
        }
        let centroid = sum / count as f32;
        self.steer_towards(centroid - self.position, max_speed, strength)
    }

    /// Combined steering force for one frame. The three behaviours are each
    /// force-limited and then simply added.
    pub fn steer<'a, I>(&self, me: usize, neighbors: I, config: &FlockConfig) -> Vector3
    where
        I: Iterator<Item = (usize, &'a Boid)> + Clone,
    {
        let separation = self.separation(
            me,
            neighbors.clone(),
            config.max_speed,
            config.separation_strength,
        );
        let alignment = self.alignment(
            me,
            neighbors.clone(),
            config.max_speed,
            config.alignment_strength,
        );
        let cohesion = self.cohesion(me, neighbors, config.max_speed, config.cohesion_strength);

        separation + alignment + cohesion
    }

    fn perceives(&self, me: usize, index: usize, other: &Boid) -> bool {
        if index == me {
            return false;
        }
        let distance = self.position.distance(&other.position);
        distance > 0.0 && distance < self.perception_radius
    }

    // steering = desired - velocity, where desired points along `direction`
    // at full speed
    fn steer_towards(&self, direction: Vector3, max_speed: f32, strength: f32) -> Vector3 {
        let desired = direction.normalize() * max_speed;
        (desired - self.velocity).limit(self.max_force) * strength
    }
}
