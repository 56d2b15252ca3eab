#![cfg_attr(not(feature = "std"), no_std)]

use boid_core::{Boid, FlockConfig};
use core::ops::RangeInclusive;
use serde::{Deserialize, Serialize};

pub const SEPARATION_RANGE: RangeInclusive<f32> = 0.0..=5.0;
pub const ALIGNMENT_RANGE: RangeInclusive<f32> = 0.0..=2.0;
pub const COHESION_RANGE: RangeInclusive<f32> = 0.0..=2.0;
pub const MAX_SPEED_RANGE: RangeInclusive<f32> = 0.5..=8.0;
pub const POPULATION_RANGE: RangeInclusive<usize> = 10..=200;

/// User-facing flock settings as they travel between a control surface and
/// the simulation. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlockSettings {
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub max_speed: f32,
    pub population: usize,
}

impl Default for FlockSettings {
    fn default() -> Self {
        let config = FlockConfig::default();
        Self {
            separation_weight: config.separation_strength,
            alignment_weight: config.alignment_strength,
            cohesion_weight: config.cohesion_strength,
            max_speed: config.max_speed,
            population: config.population_size,
        }
    }
}

impl FlockSettings {
    /// Pulls every value into the range the controls allow.
    pub fn clamped(&self) -> Self {
        Self {
            separation_weight: clamp(self.separation_weight, &SEPARATION_RANGE),
            alignment_weight: clamp(self.alignment_weight, &ALIGNMENT_RANGE),
            cohesion_weight: clamp(self.cohesion_weight, &COHESION_RANGE),
            max_speed: clamp(self.max_speed, &MAX_SPEED_RANGE),
            population: self
                .population
                .clamp(*POPULATION_RANGE.start(), *POPULATION_RANGE.end()),
        }
    }

    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[cfg(feature = "std")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn clamp(value: f32, range: &RangeInclusive<f32>) -> f32 {
    value.clamp(*range.start(), *range.end())
}

impl From<FlockSettings> for FlockConfig {
    fn from(settings: FlockSettings) -> Self {
        FlockConfig {
            separation_strength: settings.separation_weight,
            alignment_strength: settings.alignment_weight,
            cohesion_strength: settings.cohesion_weight,
            max_speed: settings.max_speed,
            population_size: settings.population,
        }
    }
}

/// What a renderer needs to draw one boid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    /// Facing angle in radians, `atan2(vy, vx)`.
    pub heading: f32,
}

impl From<&Boid> for AgentState {
    fn from(boid: &Boid) -> Self {
        Self {
            position: [boid.position.x, boid.position.y],
            velocity: [boid.velocity.x, boid.velocity.y],
            heading: boid.velocity.heading(),
        }
    }
}

/// Every boid's render state for one frame.
#[cfg(feature = "std")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub agents: Vec<AgentState>,
}

#[cfg(feature = "std")]
impl FrameSnapshot {
    pub fn capture(frame: u64, boids: &[Boid]) -> Self {
        Self {
            frame,
            agents: boids.iter().map(AgentState::from).collect(),
        }
    }

    /// Single-line JSON, suitable for JSON-lines output.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
