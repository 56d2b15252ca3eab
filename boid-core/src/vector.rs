use crate::math;

#[cfg(feature = "std")]
use rand::Rng;

/// A 3D vector used for position, velocity and steering forces.
///
/// Planar simulations keep `z` at zero; every operation still carries it so
/// the same math extends to a volumetric domain.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Planar constructor, `z` is zero.
    pub fn new_2d(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Unit vector in the xy-plane pointing at `angle` radians.
    pub fn from_angle(angle: f32) -> Self {
        let (sin, cos) = math::sin_cos(angle);
        Self::new_2d(cos, sin)
    }

    /// Unit vector in the xy-plane at a uniformly random angle in `[0, 2π)`.
    #[cfg(feature = "std")]
    pub fn random_unit_2d<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_angle(rng.gen_range(0.0..core::f32::consts::TAU))
    }

    pub fn add(&self, other: &Vector3) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    pub fn sub(&self, other: &Vector3) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    pub fn scale(&self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }

    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn magnitude(&self) -> f32 {
        math::sqrt(self.magnitude_squared())
    }

    /// Returns the unit vector, or the zero vector when `self` has no length.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            self.scale(1.0 / mag)
        } else {
            Self::ZERO
        }
    }

    /// Clamps the magnitude to `max`. Vectors already within the limit are
    /// returned unchanged without taking a square root.
    pub fn limit(&self, max: f32) -> Self {
        if self.magnitude_squared() <= max * max {
            *self
        } else {
            self.normalize().scale(max)
        }
    }

    pub fn distance_squared(&self, other: &Vector3) -> f32 {
        self.sub(other).magnitude_squared()
    }

    pub fn distance(&self, other: &Vector3) -> f32 {
        math::sqrt(self.distance_squared(other))
    }

    /// Facing angle in the xy-plane, `atan2(y, x)`.
    pub fn heading(&self) -> f32 {
        math::atan2(self.y, self.x)
    }
}

impl core::ops::Add for Vector3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Vector3::add(&self, &other)
    }
}

impl core::ops::Sub for Vector3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Vector3::sub(&self, &other)
    }
}

impl core::ops::Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        self.scale(scalar)
    }
}

impl core::ops::Div<f32> for Vector3 {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector3 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl core::ops::SubAssign for Vector3 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_vector3_magnitude() {
        let v = Vector3::new(2.0, 3.0, 6.0);
        assert_eq!(v.magnitude(), 7.0);
        assert_eq!(v.magnitude_squared(), 49.0);
    }

    #[test]
    fn test_vector3_operations() {
        let v1 = Vector3::new(1.0, 2.0, 3.0);
        let v2 = Vector3::new(3.0, 4.0, 5.0);

        assert_eq!(v1 + v2, Vector3::new(4.0, 6.0, 8.0));
        assert_eq!(v2 - v1, Vector3::new(2.0, 2.0, 2.0));
        assert_eq!(v1 * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(v2 / 2.0, Vector3::new(1.5, 2.0, 2.5));

        // Method forms leave the receiver untouched
        let sum = v1.add(&v2);
        assert_eq!(sum, Vector3::new(4.0, 6.0, 8.0));
        assert_eq!(v1, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vector3::zero().normalize(), Vector3::ZERO);
    }

    #[test]
    fn test_limit_shrinks_long_vectors() {
        let v = Vector3::new_2d(30.0, 40.0).limit(5.0);
        assert_relative_eq!(v.x, 3.0, epsilon = 1e-5);
        assert_relative_eq!(v.y, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_distance() {
        let a = Vector3::new_2d(0.0, 0.0);
        let b = Vector3::new_2d(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance_squared(&a), 25.0);
    }

    #[test]
    fn test_heading() {
        assert_relative_eq!(Vector3::new_2d(0.0, 1.0).heading(), core::f32::consts::FRAC_PI_2);
        assert_relative_eq!(Vector3::new_2d(-1.0, 0.0).heading(), core::f32::consts::PI);
    }

    #[test]
    fn test_random_unit_2d_is_planar_unit() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let v = Vector3::random_unit_2d(&mut rng);
            assert_eq!(v.z, 0.0);
            assert_relative_eq!(v.magnitude(), 1.0, epsilon = 1e-5);
        }
    }

    fn component() -> impl Strategy<Value = f32> {
        -1000.0f32..1000.0
    }

    proptest! {
        #[test]
        fn limit_never_exceeds_max(x in component(), y in component(), z in component(), max in 0.01f32..100.0) {
            let v = Vector3::new(x, y, z);
            let limited = v.limit(max);
            prop_assert!(limited.magnitude() <= max * (1.0 + 1e-5));
            if v.magnitude_squared() <= max * max {
                prop_assert_eq!(limited, v);
            }
        }

        #[test]
        fn normalize_has_unit_length(x in component(), y in component(), z in component()) {
            let v = Vector3::new(x, y, z);
            prop_assume!(v.magnitude() > 1e-3);
            prop_assert!((v.normalize().magnitude() - 1.0).abs() < 1e-4);
        }
    }
}
