// field/releaser.rs
// Molecule releasers: emit a template molecule at a fixed interval

use serde::{Deserialize, Serialize};
use ultraviolet::Vec3;

use super::transform::Transform;
use crate::body::{Molecule, MoleculeKind, MoleculeState};
use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoleculeReleaser {
    pub id: u64,
    pub transform: Transform,
    pub kind: MoleculeKind,
    /// Simulated seconds between two releases.
    pub interval: f32,
    pub max_molecules: u32,
    #[serde(default)]
    pub initial_velocity: Vec3,
    #[serde(default)]
    pub released: u32,
    #[serde(default)]
    pub next_release: f32,
    #[serde(default)]
    pub selected: bool,
}

impl MoleculeReleaser {
    pub fn new(id: u64, transform: Transform, kind: MoleculeKind, interval: f32, max_molecules: u32) -> Self {
        Self {
            id,
            transform,
            kind,
            interval,
            max_molecules,
            initial_velocity: Vec3::zero(),
            released: 0,
            next_release: 0.0,
            selected: false,
        }
    }

    pub fn is_due(&self, time: f32) -> bool {
        self.released < self.max_molecules && time >= self.next_release
    }

    /// Build the next molecule and schedule the following release.
    pub fn release(&mut self, time: f32, mass_factor: f32) -> Result<Molecule> {
        let mut molecule = self.kind.create(self.transform.pos, self.transform.rotation)?;
        let state = MoleculeState {
            momentum: self.initial_velocity * (molecule.mass * mass_factor),
            ..molecule.state
        };
        molecule.from_state(state, mass_factor);
        self.released += 1;
        self.next_release = time + self.interval.max(0.0);
        Ok(molecule)
    }

    pub fn reset(&mut self) {
        self.released = 0;
        self.next_release = 0.0;
    }
}
