//! The per-frame update loop.
//!
//! Every frame runs in two phases. The first computes each boid's steering
//! force from an immutable view of the whole flock; the second applies the
//! forces, integrates and wraps. No boid ever sees another boid's state from
//! the frame in progress, whichever order (or thread) the work runs on.

use crate::boid::Boid;
use crate::config::{Bounds, FlockConfig};
use crate::vector::Vector3;

#[cfg(feature = "std")]
use crate::spatial_grid::SpatialGrid;
#[cfg(feature = "std")]
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How the flock finds neighbour candidates. Both strategies produce the same
/// frames; the grid only skips pairs that could never be in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborSearch {
    #[default]
    BruteForce,
    Grid,
}

/// Aggregate motion figures for logging and HUDs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockStats {
    pub count: usize,
    pub mean_speed: f32,
    pub top_speed: f32,
    pub centroid: Vector3,
    /// Length of the mean unit heading: 1 when every boid points the same
    /// way, near 0 when headings cancel out.
    pub polarization: f32,
}

impl FlockStats {
    pub fn from_boids(boids: &[Boid]) -> Self {
        if boids.is_empty() {
            return Self {
                count: 0,
                mean_speed: 0.0,
                top_speed: 0.0,
                centroid: Vector3::zero(),
                polarization: 0.0,
            };
        }

        let mut speed_sum = 0.0;
        let mut top_speed = 0.0f32;
        let mut position_sum = Vector3::zero();
        let mut heading_sum = Vector3::zero();

        for boid in boids {
            let speed = boid.velocity.magnitude();
            speed_sum += speed;
            top_speed = top_speed.max(speed);
            position_sum += boid.position;
            heading_sum += boid.velocity.normalize();
        }

        let count = boids.len() as f32;
        Self {
            count: boids.len(),
            mean_speed: speed_sum / count,
            top_speed,
            centroid: position_sum / count,
            polarization: (heading_sum / count).magnitude(),
        }
    }
}

/// Second phase: fold the precomputed forces in, then move and wrap.
fn commit(boids: &mut [Boid], forces: &[Vector3], max_speed: f32, bounds: &Bounds) {
    for (boid, force) in boids.iter_mut().zip(forces.iter()) {
        commit_one(boid, *force, max_speed, bounds);
    }
}

#[inline]
fn commit_one(boid: &mut Boid, force: Vector3, max_speed: f32, bounds: &Bounds) {
    boid.apply_force(force);
    boid.update(max_speed);
    boid.wrap_edges(bounds);
}

/// A collection of boids for embedded (no_std) environments
pub struct FixedFlock<const N: usize> {
    pub boids: heapless::Vec<Boid, N>,
    pub bounds: Bounds,
    forces: heapless::Vec<Vector3, N>,
}

impl<const N: usize> FixedFlock<N> {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            boids: heapless::Vec::new(),
            bounds,
            forces: heapless::Vec::new(),
        }
    }

    /// Hands the boid back when the flock is already at capacity.
    pub fn add_boid(&mut self, boid: Boid) -> Result<(), Boid> {
        self.boids.push(boid)
    }

    pub fn update(&mut self, config: &FlockConfig) {
        self.forces.clear();
        for (index, boid) in self.boids.iter().enumerate() {
            let force = boid.steer(index, self.boids.iter().enumerate(), config);
            // Same length as `boids`, so this cannot overflow
            let _ = self.forces.push(force);
        }

        commit(&mut self.boids, &self.forces, config.max_speed, &self.bounds);
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn stats(&self) -> FlockStats {
        FlockStats::from_boids(&self.boids)
    }
}

/// A collection of boids for std environments
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct Flock {
    pub boids: Vec<Boid>,
    pub bounds: Bounds,
    pub search: NeighborSearch,
}

#[cfg(feature = "std")]
impl Flock {
    pub fn new<R: Rng + ?Sized>(bounds: Bounds, count: usize, rng: &mut R) -> Self {
        let mut flock = Self::with_boids(bounds, Vec::new());
        flock.repopulate(count, rng);
        flock
    }

    pub fn with_boids(bounds: Bounds, boids: Vec<Boid>) -> Self {
        Self {
            boids,
            bounds,
            search: NeighborSearch::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    /// Throws the whole population away and spawns `count` fresh boids.
    pub fn repopulate<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        let boids: Vec<Boid> = (0..count).map(|_| Boid::random(&self.bounds, rng)).collect();
        log::debug!(
            "repopulated flock: {} -> {} boids in {}x{}",
            self.boids.len(),
            count,
            self.bounds.width,
            self.bounds.height
        );
        self.boids = boids;
    }

    /// Repopulates only when `config.population_size` differs from the
    /// current size. Returns whether the population was replaced.
    pub fn sync_population<R: Rng + ?Sized>(&mut self, config: &FlockConfig, rng: &mut R) -> bool {
        if config.population_size == self.boids.len() {
            return false;
        }
        self.repopulate(config.population_size, rng);
        true
    }

    /// Viewport change. Boids outside the new bounds wrap on the next frame.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        log::debug!("flock bounds set to {}x{}", bounds.width, bounds.height);
        self.bounds = bounds;
    }

    pub fn set_neighbor_search(&mut self, search: NeighborSearch) {
        if search != self.search {
            log::debug!("neighbor search switched to {:?}", search);
        }
        self.search = search;
    }

    /// Advances the simulation by one frame.
    pub fn update(&mut self, config: &FlockConfig) {
        let forces = self.steering_forces(config);
        log::trace!("committing {} steering forces", forces.len());

        #[cfg(feature = "parallel")]
        {
            let bounds = self.bounds;
            self.boids
                .par_iter_mut()
                .zip(forces.par_iter())
                .for_each(|(boid, force)| commit_one(boid, *force, config.max_speed, &bounds));
        }
        #[cfg(not(feature = "parallel"))]
        commit(&mut self.boids, &forces, config.max_speed, &self.bounds);
    }

    pub fn stats(&self) -> FlockStats {
        FlockStats::from_boids(&self.boids)
    }

    /// First phase: one steering force per boid, read-only over the flock.
    fn steering_forces(&self, config: &FlockConfig) -> Vec<Vector3> {
        let boids = &self.boids;

        let grid = match self.search {
            NeighborSearch::BruteForce => None,
            NeighborSearch::Grid => SpatialGrid::build(boids, &self.bounds),
        };

        match grid {
            Some(grid) => map_indices(boids.len(), |index| {
                let boid = &boids[index];
                let candidates = grid.candidates(&boid.position);
                let neighbors = candidates.iter().map(|&other| (other, &boids[other]));
                boid.steer(index, neighbors, config)
            }),
            None => map_indices(boids.len(), |index| {
                boids[index].steer(index, boids.iter().enumerate(), config)
            }),
        }
    }
}

#[cfg(feature = "parallel")]
fn map_indices<F>(len: usize, f: F) -> Vec<Vector3>
where
    F: Fn(usize) -> Vector3 + Sync + Send,
{
    (0..len).into_par_iter().map(f).collect()
}

#[cfg(all(feature = "std", not(feature = "parallel")))]
fn map_indices<F>(len: usize, f: F) -> Vec<Vector3>
where
    F: Fn(usize) -> Vector3,
{
    (0..len).map(f).collect()
}
