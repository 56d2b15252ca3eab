//! Browser binding for the flock.
//!
//! The page owns the animation loop and the canvas: it calls `step()` from
//! `requestAnimationFrame`, then reads the flat position/heading buffers and
//! draws however it likes. Slider handlers call the setters, which clamp to
//! the same ranges the controls expose.

use boid_core::{Bounds, Flock, FlockConfig, NeighborSearch};
use boid_shared::FlockSettings;
use js_sys::Float32Array;
use rand::Rng;
use wasm_bindgen::prelude::*;

macro_rules! console_log {
    ($($t:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::log_1(&format_args!($($t)*).to_string().into());
        #[cfg(not(target_arch = "wasm32"))]
        log::info!($($t)*);
    }};
}

#[wasm_bindgen]
pub struct FlockSimulation {
    flock: Flock,
    settings: FlockSettings,
    frame: u64,
}

#[wasm_bindgen]
impl FlockSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, boid_count: usize) -> FlockSimulation {
        let settings = FlockSettings {
            population: boid_count,
            ..FlockSettings::default()
        };
        let simulation =
            Self::with_settings(Bounds::new(width, height), settings, &mut rand::thread_rng());
        console_log!(
            "Initializing flock with {} boids in {}x{}",
            simulation.boid_count(),
            width,
            height
        );
        simulation
    }

    /// Advances one frame.
    pub fn step(&mut self) {
        let config = FlockConfig::from(self.settings);
        self.flock.update(&config);
        self.frame += 1;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn boid_count(&self) -> usize {
        self.flock.len()
    }

    pub fn set_separation_weight(&mut self, weight: f32) {
        self.settings.separation_weight = weight;
        self.settings = self.settings.clamped();
    }

    pub fn set_alignment_weight(&mut self, weight: f32) {
        self.settings.alignment_weight = weight;
        self.settings = self.settings.clamped();
    }

    pub fn set_cohesion_weight(&mut self, weight: f32) {
        self.settings.cohesion_weight = weight;
        self.settings = self.settings.clamped();
    }

    pub fn set_max_speed(&mut self, speed: f32) {
        self.settings.max_speed = speed;
        self.settings = self.settings.clamped();
    }

    /// Replaces the whole flock when the clamped size differs from the
    /// current one.
    pub fn set_population(&mut self, count: usize) {
        self.settings.population = count;
        self.apply_population(&mut rand::thread_rng());
    }

    pub fn set_grid_search(&mut self, enabled: bool) {
        self.flock.set_neighbor_search(if enabled {
            NeighborSearch::Grid
        } else {
            NeighborSearch::BruteForce
        });
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.flock.set_bounds(Bounds::new(width, height));
        console_log!("Resized to {}x{}", width, height);
    }

    /// `[x0, y0, x1, y1, ...]`
    pub fn positions(&self) -> Float32Array {
        Float32Array::from(self.position_buffer().as_slice())
    }

    /// `[vx0, vy0, vx1, vy1, ...]`
    pub fn velocities(&self) -> Float32Array {
        Float32Array::from(self.velocity_buffer().as_slice())
    }

    /// One facing angle per boid, in radians.
    pub fn headings(&self) -> Float32Array {
        Float32Array::from(self.heading_buffer().as_slice())
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.settings
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn load_settings_json(&mut self, json: &str) -> Result<(), JsValue> {
        let settings =
            FlockSettings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.settings = settings.clamped();
        self.apply_population(&mut rand::thread_rng());
        Ok(())
    }
}

impl FlockSimulation {
    fn with_settings<R: Rng + ?Sized>(bounds: Bounds, settings: FlockSettings, rng: &mut R) -> Self {
        let settings = settings.clamped();
        Self {
            flock: Flock::new(bounds, settings.population, rng),
            settings,
            frame: 0,
        }
    }

    fn apply_population<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.settings = self.settings.clamped();
        let config = FlockConfig::from(self.settings);
        if self.flock.sync_population(&config, rng) {
            console_log!("Population reset to {} boids", self.flock.len());
        }
    }

    fn position_buffer(&self) -> Vec<f32> {
        self.flock
            .boids
            .iter()
            .flat_map(|b| [b.position.x, b.position.y])
            .collect()
    }

    fn velocity_buffer(&self) -> Vec<f32> {
        self.flock
            .boids
            .iter()
            .flat_map(|b| [b.velocity.x, b.velocity.y])
            .collect()
    }

    fn heading_buffer(&self) -> Vec<f32> {
        self.flock
            .boids
            .iter()
            .map(|b| b.velocity.heading())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn simulation(population: usize) -> FlockSimulation {
        let settings = FlockSettings {
            population,
            ..FlockSettings::default()
        };
        FlockSimulation::with_settings(
            Bounds::new(640.0, 480.0),
            settings,
            &mut StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn test_population_is_clamped() {
        assert_eq!(simulation(3).boid_count(), 10);
        assert_eq!(simulation(999).boid_count(), 200);
    }

    #[test]
    fn test_buffers_have_one_entry_per_component() {
        let sim = simulation(25);
        assert_eq!(sim.position_buffer().len(), 50);
        assert_eq!(sim.velocity_buffer().len(), 50);
        assert_eq!(sim.heading_buffer().len(), 25);
    }

    #[test]
    fn test_setters_clamp() {
        let mut sim = simulation(20);
        sim.set_separation_weight(12.0);
        sim.set_max_speed(-3.0);

        assert_eq!(sim.settings.separation_weight, 5.0);
        assert_eq!(sim.settings.max_speed, 0.5);
    }

    #[test]
    fn test_step_respects_max_speed() {
        let mut sim = simulation(40);
        sim.set_max_speed(1.0);
        sim.step();

        assert_eq!(sim.frame(), 1);
        assert!(sim
            .velocity_buffer()
            .chunks(2)
            .all(|v| (v[0] * v[0] + v[1] * v[1]).sqrt() <= 1.0 + 1e-5));
    }

    #[test]
    fn test_population_change_recreates_flock() {
        let mut sim = simulation(20);
        sim.settings.population = 60;
        sim.apply_population(&mut StdRng::seed_from_u64(2));
        assert_eq!(sim.boid_count(), 60);
    }
}
