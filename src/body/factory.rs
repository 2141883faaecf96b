// body/factory.rs
// Named molecule factories and the MoleculeKind tag used by levels and releasers

use serde::{Deserialize, Serialize};
use ultraviolet::{Rotor3, Vec3};

use super::atom::*;
use super::molecule::Molecule;
use crate::error::Result;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum MoleculeKind {
    Water,
    Oxygen,
    Dipole,
    ChargedNatrium,
    ChargedChlorine,
    Sulfate,
}

impl MoleculeKind {
    pub const ALL: [MoleculeKind; 6] = [
        MoleculeKind::Water,
        MoleculeKind::Oxygen,
        MoleculeKind::Dipole,
        MoleculeKind::ChargedNatrium,
        MoleculeKind::ChargedChlorine,
        MoleculeKind::Sulfate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MoleculeKind::Water => "water",
            MoleculeKind::Oxygen => "oxygen",
            MoleculeKind::Dipole => "dipole",
            MoleculeKind::ChargedNatrium => "charged_natrium",
            MoleculeKind::ChargedChlorine => "charged_chlorine",
            MoleculeKind::Sulfate => "sulfate",
        }
    }

    pub fn from_name(name: &str) -> Option<MoleculeKind> {
        MoleculeKind::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Build the molecule at rest at `pos` with `orientation`.
    pub fn create(&self, pos: Vec3, orientation: Rotor3) -> Result<Molecule> {
        let mut molecule = match self {
            MoleculeKind::Water => create_water(),
            MoleculeKind::Oxygen => create_oxygen_molecule(),
            MoleculeKind::Dipole => create_dipole(),
            MoleculeKind::ChargedNatrium => create_charged_natrium(),
            MoleculeKind::ChargedChlorine => create_charged_chlorine(),
            MoleculeKind::Sulfate => create_sulfate(),
        }?;
        molecule.place(pos, orientation, 1.0);
        Ok(molecule)
    }
}

/// H-O-H at 104.5 degrees, O-H 0.957.
pub fn create_water() -> Result<Molecule> {
    let atoms = vec![
        create_oxygen(Vec3::zero()).with_charge(-0.8),
        create_hydrogen(Vec3::new(0.757, 0.586, 0.0)).with_charge(0.4),
        create_hydrogen(Vec3::new(-0.757, 0.586, 0.0)).with_charge(0.4),
    ];
    Ok(Molecule::new(atoms)?.with_bonds(&[(0, 1), (0, 2)]))
}

/// O=O, bond length 1.21.
pub fn create_oxygen_molecule() -> Result<Molecule> {
    let atoms = vec![
        create_oxygen(Vec3::new(-0.605, 0.0, 0.0)),
        create_oxygen(Vec3::new(0.605, 0.0, 0.0)),
    ];
    Ok(Molecule::new(atoms)?.with_bonds(&[(0, 1)]))
}

/// Carbon carrier with a massless +1/-1 charge pair along x.
pub fn create_dipole() -> Result<Molecule> {
    let atoms = vec![
        create_carbon(Vec3::zero()),
        create_charge(Vec3::new(0.7, 0.0, 0.0), 1.0),
        create_charge(Vec3::new(-0.7, 0.0, 0.0), -1.0),
    ];
    Ok(Molecule::new(atoms)?.with_bonds(&[(0, 1), (0, 2)]))
}

pub fn create_charged_natrium() -> Result<Molecule> {
    Molecule::new(vec![create_natrium(Vec3::zero()).with_charge(1.0)])
}

pub fn create_charged_chlorine() -> Result<Molecule> {
    Molecule::new(vec![create_chlorine(Vec3::zero()).with_charge(-1.0)])
}

/// Tetrahedral SO4 with the -2 charge spread over the oxygens.
pub fn create_sulfate() -> Result<Molecule> {
    let d = 1.49 / 3.0f32.sqrt();
    let atoms = vec![
        create_sulfur(Vec3::zero()),
        create_oxygen(Vec3::new(d, d, d)).with_charge(-0.5),
        create_oxygen(Vec3::new(d, -d, -d)).with_charge(-0.5),
        create_oxygen(Vec3::new(-d, d, -d)).with_charge(-0.5),
        create_oxygen(Vec3::new(-d, -d, d)).with_charge(-0.5),
    ];
    Ok(Molecule::new(atoms)?.with_bonds(&[(0, 1), (0, 2), (0, 3), (0, 4)]))
}
