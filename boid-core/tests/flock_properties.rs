use boid_core::{Boid, Bounds, Flock, FlockConfig, NeighborSearch, Vector3};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_flock(seed: u64, count: usize, bounds: Bounds) -> Flock {
    let mut rng = StdRng::seed_from_u64(seed);
    Flock::new(bounds, count, &mut rng)
}

#[test]
fn grid_search_matches_brute_force() {
    let bounds = Bounds::new(600.0, 400.0);
    let config = FlockConfig::default();

    let mut brute = seeded_flock(42, 150, bounds);
    let mut grid = brute.clone();
    grid.set_neighbor_search(NeighborSearch::Grid);

    for frame in 0..120 {
        brute.update(&config);
        grid.update(&config);
        assert_eq!(brute.boids, grid.boids, "diverged at frame {}", frame);
    }
}

#[test]
fn grid_search_handles_mixed_radii() {
    let bounds = Bounds::new(300.0, 300.0);
    let mut brute = seeded_flock(5, 80, bounds);
    for (i, boid) in brute.boids.iter_mut().enumerate() {
        if i % 3 == 0 {
            *boid = boid.clone().with_radii(90.0, 30.0);
        }
    }
    let mut grid = brute.clone();
    grid.set_neighbor_search(NeighborSearch::Grid);

    let config = FlockConfig {
        separation_strength: 3.0,
        cohesion_strength: 2.0,
        ..FlockConfig::default()
    };
    for _ in 0..60 {
        brute.update(&config);
        grid.update(&config);
    }
    assert_eq!(brute.boids, grid.boids);
}

#[test]
fn repopulate_yields_exact_count_in_bounds() {
    let bounds = Bounds::new(320.0, 240.0);
    let mut rng = StdRng::seed_from_u64(9);
    let mut flock = Flock::new(bounds, 10, &mut rng);

    for count in [10, 57, 200, 1] {
        flock.repopulate(count, &mut rng);
        assert_eq!(flock.len(), count);
        assert!(flock
            .boids
            .iter()
            .all(|b| bounds.contains(b.position.x, b.position.y)));
    }
}

#[test]
fn boids_stay_in_bounds_after_many_frames() {
    let bounds = Bounds::new(200.0, 150.0);
    let mut flock = seeded_flock(17, 60, bounds);
    let config = FlockConfig {
        max_speed: 8.0,
        ..FlockConfig::default()
    };

    for _ in 0..500 {
        flock.update(&config);
        assert!(flock
            .boids
            .iter()
            .all(|b| bounds.contains(b.position.x, b.position.y)));
    }
}

#[test]
fn global_speed_override_applies_to_every_boid() {
    let bounds = Bounds::new(500.0, 500.0);
    let mut flock = seeded_flock(23, 40, bounds);
    let config = FlockConfig {
        max_speed: 0.5,
        ..FlockConfig::default()
    };

    flock.update(&config);

    let stats = flock.stats();
    assert!(stats.top_speed <= 0.5 + 1e-5);
}

#[test]
fn cohesion_toward_centroid_scenario() {
    let boids = vec![
        Boid::new(Vector3::new(0.0, 0.0, 0.0), Vector3::zero()),
        Boid::new(Vector3::new(10.0, 5.0, 0.0), Vector3::zero()),
        Boid::new(Vector3::new(0.0, 5.0, 0.0), Vector3::zero()),
    ];
    let force = boids[0].cohesion(0, boids.iter().enumerate(), 4.0, 1.0);

    // Neighbour centroid is (5, 5, 0)
    assert!(force.x > 0.0 && force.y > 0.0);
    assert!((force.x - force.y).abs() < 1e-6);
    assert!(force.magnitude() <= boids[0].max_force + 1e-6);
}

fn coord() -> impl Strategy<Value = f32> {
    0.0f32..100.0
}

fn velocity() -> impl Strategy<Value = f32> {
    -10.0f32..10.0
}

proptest! {
    #[test]
    fn speed_is_capped_after_update(
        states in prop::collection::vec((coord(), coord(), velocity(), velocity()), 1..12),
        max_speed in 0.5f32..8.0,
        separation in 0.0f32..5.0,
        alignment in 0.0f32..2.0,
        cohesion in 0.0f32..2.0,
    ) {
        let boids = states
            .into_iter()
            .map(|(x, y, vx, vy)| Boid::new(Vector3::new_2d(x, y), Vector3::new_2d(vx, vy)))
            .collect();
        let mut flock = Flock::with_boids(Bounds::new(100.0, 100.0), boids);
        let config = FlockConfig {
            separation_strength: separation,
            alignment_strength: alignment,
            cohesion_strength: cohesion,
            max_speed,
            population_size: flock.len(),
        };

        flock.update(&config);

        for boid in &flock.boids {
            prop_assert!(boid.velocity.magnitude() <= max_speed * (1.0 + 1e-5));
            prop_assert_eq!(boid.acceleration, Vector3::ZERO);
        }
    }

    #[test]
    fn wrap_is_idempotent(x in -50.0f32..150.0, y in -50.0f32..150.0) {
        let bounds = Bounds::new(100.0, 100.0);
        let mut boid = Boid::new(Vector3::new_2d(x, y), Vector3::zero());

        boid.wrap_edges(&bounds);
        let once = boid.position;
        boid.wrap_edges(&bounds);

        prop_assert_eq!(boid.position, once);
        prop_assert!(bounds.contains(once.x, once.y));
    }
}
