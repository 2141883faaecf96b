// simulation/external.rs
// Timed external forces and the single user drag force

use serde::{Deserialize, Serialize};
use ultraviolet::Vec3;

use crate::body::Molecule;

/// One-shot or timed force on a molecule, applied at a world-space origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExternalForce {
    pub molecule_id: u64,
    pub origin: Vec3,
    pub force: Vec3,
    pub end_time: f32,
}

impl ExternalForce {
    pub fn new(molecule_id: u64, origin: Vec3, force: Vec3, end_time: f32) -> Self {
        Self { molecule_id, origin, force, end_time }
    }

    pub fn is_active(&self, time: f32) -> bool {
        self.end_time >= time
    }

    /// (force, torque about the molecule's mass center)
    pub fn load_on(&self, molecule: &Molecule) -> (Vec3, Vec3) {
        (self.force, (self.origin - molecule.pos()).cross(self.force))
    }
}

/// The force the player applies while dragging a molecule. The grab point is
/// kept in body coordinates so it follows the molecule as it turns.
#[derive(Clone, Debug, PartialEq)]
pub struct DragForce {
    pub molecule_id: u64,
    pub origin: Vec3,
    pub local_origin: Vec3,
    pub force: Vec3,
    pub plane_normal: Vec3,
    pub end_time: f32,
}

impl DragForce {
    pub fn new(molecule: &Molecule, origin: Vec3, force: Vec3, plane_normal: Vec3, end_time: f32) -> Self {
        Self {
            molecule_id: molecule.id,
            origin,
            local_origin: molecule.to_body(origin),
            force,
            plane_normal,
            end_time,
        }
    }

    pub fn is_active(&self, time: f32) -> bool {
        self.end_time >= time
    }

    pub fn load_on(&self, molecule: &Molecule) -> (Vec3, Vec3) {
        let origin = molecule.to_world(self.local_origin);
        (self.force, (origin - molecule.pos()).cross(self.force))
    }
}
