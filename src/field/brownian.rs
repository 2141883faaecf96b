// field/brownian.rs
// Brownian elements: temperature-like factor fields read by the renderer

use serde::{Deserialize, Serialize};
use ultraviolet::Vec3;

use super::barrier::box_distance;
use super::kernel::Falloff;
use super::transform::Transform;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BrownianShape {
    Plane { normal: Vec3 },
    Box { half_extent: Vec3 },
}

/// Not a force source: the factor it exposes is cosmetic and never enters integration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrownianElement {
    pub id: u64,
    pub transform: Transform,
    pub falloff: Falloff,
    pub shape: BrownianShape,
    #[serde(default)]
    pub selected: bool,
}

impl BrownianElement {
    pub fn new(id: u64, transform: Transform, falloff: Falloff, shape: BrownianShape) -> Self {
        Self { id, transform, falloff, shape, selected: false }
    }

    pub fn get_brownian_motion_factor(&self, point: Vec3) -> f32 {
        let distance = match self.shape {
            BrownianShape::Plane { normal } => {
                (point - self.transform.pos).dot(self.transform.dir_to_world(normal.normalized()))
            }
            BrownianShape::Box { half_extent } => {
                box_distance(self.transform.to_local(point), half_extent).0
            }
        };
        self.falloff.magnitude(distance)
    }
}
