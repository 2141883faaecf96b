//! Compactly supported falloff shared by barriers, portals and brownian elements.

use serde::{Deserialize, Serialize};

/// Wendland C2 kernel `(1 - r)^4 (4r + 1)`, zero for `r >= 1`.
///
/// Equals 1 at `r = 0` with zero slope at `r = 1`.
pub fn wendland_2_1(r: f32) -> f32 {
    if r >= 1.0 {
        return 0.0;
    }
    let r = r.max(0.0);
    let t = 1.0 - r;
    t * t * t * t * (4.0 * r + 1.0)
}

/// Strength/radius pair turning a distance into a force magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Falloff {
    pub strength: f32,
    pub radius: f32,
}

impl Falloff {
    pub fn new(strength: f32, radius: f32) -> Self {
        Self { strength, radius }
    }

    /// Fraction of full strength at `distance` outside the shape. Points on or
    /// behind the boundary get the full value.
    pub fn factor(&self, distance: f32) -> f32 {
        if distance <= 0.0 {
            return 1.0;
        }
        if self.radius <= 0.0 {
            return 0.0;
        }
        wendland_2_1((distance / self.radius).min(1.0))
    }

    pub fn magnitude(&self, distance: f32) -> f32 {
        if distance <= 0.0 {
            return self.strength;
        }
        self.strength * self.factor(distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_endpoints() {
        assert_eq!(wendland_2_1(0.0), 1.0);
        assert_eq!(wendland_2_1(1.0), 0.0);
        assert_eq!(wendland_2_1(3.0), 0.0);
        assert!(wendland_2_1(0.99) < 1e-6);
    }

    #[test]
    fn kernel_decreases_monotonically() {
        let mut last = wendland_2_1(0.0);
        for i in 1..=100 {
            let v = wendland_2_1(i as f32 / 100.0);
            assert!(v <= last);
            last = v;
        }
    }

    #[test]
    fn falloff_is_full_inside_and_zero_at_radius() {
        let f = Falloff::new(7.0, 2.0);
        assert_eq!(f.magnitude(0.0), 7.0);
        assert_eq!(f.magnitude(-1.0), 7.0);
        assert!(f.magnitude(2.0).abs() < 1e-6);
        assert_eq!(f.magnitude(5.0), 0.0);
    }
}
