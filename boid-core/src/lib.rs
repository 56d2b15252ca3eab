#![cfg_attr(not(feature = "std"), no_std)]

//! Boid flocking engine.
//!
//! Each boid steers by three local rules (separation, alignment, cohesion)
//! against the boids it can perceive. A driver calls [`Flock::update`] once
//! per frame with a [`FlockConfig`] and reads positions and velocities back
//! for drawing. Builds without `std` get the fixed-capacity [`FixedFlock`].

mod math;

pub mod boid;
pub mod config;
pub mod flock;
#[cfg(feature = "std")]
pub mod spatial_grid;
pub mod vector;

pub use boid::Boid;
pub use config::{Bounds, FlockConfig};
#[cfg(feature = "std")]
pub use flock::Flock;
pub use flock::{FixedFlock, FlockStats, NeighborSearch};
#[cfg(feature = "std")]
pub use spatial_grid::SpatialGrid;
pub use vector::Vector3;
