// field/portal.rs
// Portals: containment predicates with a capture counter

use serde::{Deserialize, Serialize};
use ultraviolet::Vec3;

use super::barrier::box_distance;
use super::transform::Transform;

/// Points closer than this to a box portal count as inside.
pub const PORTAL_EPSILON: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PortalShape {
    Box { half_extent: Vec3 },
    /// Axis-aligned ellipsoid (local frame) with the given semi-axes.
    Sphere { radii: Vec3 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCondition {
    NotFinished,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureCondition {
    pub min_captured_molecules: u32,
    #[serde(default)]
    pub num_captured_molecules: u32,
}

impl CaptureCondition {
    pub fn new(min_captured_molecules: u32) -> Self {
        Self { min_captured_molecules, num_captured_molecules: 0 }
    }

    pub fn check(&self) -> EndCondition {
        if self.num_captured_molecules >= self.min_captured_molecules {
            EndCondition::Finished
        } else {
            EndCondition::NotFinished
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    pub id: u64,
    pub transform: Transform,
    pub shape: PortalShape,
    pub condition: CaptureCondition,
    #[serde(default = "default_score_factor")]
    pub score_factor: f32,
    /// Remove molecules as they enter. Non-destructive portals count the molecules
    /// currently inside instead of the cumulative captures.
    #[serde(default = "default_destroy_on_entering")]
    pub destroy_on_entering: bool,
    #[serde(default)]
    pub selected: bool,
}

fn default_score_factor() -> f32 {
    1.0
}

fn default_destroy_on_entering() -> bool {
    true
}

impl Portal {
    pub fn new(id: u64, transform: Transform, shape: PortalShape, min_captured_molecules: u32) -> Self {
        Self {
            id,
            transform,
            shape,
            condition: CaptureCondition::new(min_captured_molecules),
            score_factor: default_score_factor(),
            destroy_on_entering: default_destroy_on_entering(),
            selected: false,
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let local = self.transform.to_local(point);
        match self.shape {
            PortalShape::Box { half_extent } => box_distance(local, half_extent).0 < PORTAL_EPSILON,
            PortalShape::Sphere { radii } => {
                if radii.x <= 0.0 || radii.y <= 0.0 || radii.z <= 0.0 {
                    return false;
                }
                let n = Vec3::new(local.x / radii.x, local.y / radii.y, local.z / radii.z);
                n.mag_sq() <= 1.0
            }
        }
    }

    pub fn handle_molecule_entering(&mut self) {
        self.condition.num_captured_molecules += 1;
    }

    /// Called once per tick before containment is re-checked.
    pub fn start_update(&mut self) {
        if !self.destroy_on_entering {
            self.condition.num_captured_molecules = 0;
        }
    }

    /// Level reset.
    pub fn reset(&mut self) {
        self.condition.num_captured_molecules = 0;
    }

    pub fn end_condition(&self) -> EndCondition {
        self.condition.check()
    }

    pub fn score(&self) -> f32 {
        self.condition.num_captured_molecules as f32 * self.score_factor
    }
}
