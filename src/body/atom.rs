// body/atom.rs
// Atom struct and the per-element factory functions

use ultraviolet::Vec3;

use crate::element::AtomType;
use crate::units;

/// Smallest simulated particle. Physical constants are fixed at creation; only the
/// charge (projectile variants) and the cached world position ever change.
#[derive(Clone, Debug, PartialEq)]
pub struct Atom {
    /// Position in the owning molecule's body frame, relative to its mass center
    /// once the molecule is initialized.
    pub body_pos: Vec3,
    /// World position, refreshed every integration step.
    pub pos: Vec3,
    pub mass: f32,
    pub charge: f32,
    pub radius: f32,
    pub atom_type: AtomType,
    pub parent_id: u64,
}

impl Atom {
    pub fn new(atom_type: AtomType, body_pos: Vec3, charge: f32) -> Self {
        Self {
            body_pos,
            pos: body_pos,
            mass: units::molar_weight_to_mass(atom_type.molar_weight()),
            charge,
            radius: atom_type.vdw_radius(),
            atom_type,
            parent_id: 0,
        }
    }

    pub fn with_charge(mut self, charge: f32) -> Self {
        self.charge = charge;
        self
    }

    /// Massless point charges only carry electrostatics.
    pub fn is_charge_marker(&self) -> bool {
        self.atom_type.is_charge_marker()
    }
}

pub fn create_hydrogen(body_pos: Vec3) -> Atom {
    Atom::new(AtomType::Hydrogen, body_pos, 0.0)
}

pub fn create_oxygen(body_pos: Vec3) -> Atom {
    Atom::new(AtomType::Oxygen, body_pos, 0.0)
}

pub fn create_carbon(body_pos: Vec3) -> Atom {
    Atom::new(AtomType::Carbon, body_pos, 0.0)
}

pub fn create_sulfur(body_pos: Vec3) -> Atom {
    Atom::new(AtomType::Sulfur, body_pos, 0.0)
}

pub fn create_natrium(body_pos: Vec3) -> Atom {
    Atom::new(AtomType::Natrium, body_pos, 0.0)
}

pub fn create_chlorine(body_pos: Vec3) -> Atom {
    Atom::new(AtomType::Chlorine, body_pos, 0.0)
}

pub fn create_charge(body_pos: Vec3, charge: f32) -> Atom {
    Atom::new(AtomType::Charge, body_pos, charge)
}
