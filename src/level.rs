// level.rs
// Versioned level record and its conversion from/to a running Core

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ultraviolet::{Rotor3, Vec3};

use crate::atomic_force::AtomicForce;
use crate::body::{Atom, Molecule, MoleculeKind};
use crate::config::{self, ForceLawConfig, SimConfig};
use crate::element::AtomType;
use crate::error::{Error, Result};
use crate::field::transform::rotor_serde;
use crate::field::{Barrier, BrownianElement, MoleculeReleaser, Portal};
use crate::simulation::{Core, ExternalForce};

/// Version written by this build.
///
/// * 1: initial layout
/// * 2: gravity and named external forces
/// * 3: molecule releasers
pub const CURRENT_VERSION: u32 = 3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtomRecord {
    pub atom_type: AtomType,
    pub body_pos: Vec3,
    #[serde(default)]
    pub charge: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoleculeRecord {
    pub id: u64,
    pub atoms: Vec<AtomRecord>,
    #[serde(default)]
    pub bonds: Vec<(usize, usize)>,
    pub pos: Vec3,
    #[serde(with = "rotor_serde")]
    pub orientation: Rotor3,
}

impl MoleculeRecord {
    pub fn from_molecule(molecule: &Molecule) -> Self {
        Self {
            id: molecule.id,
            atoms: molecule
                .atoms
                .iter()
                .map(|a| AtomRecord { atom_type: a.atom_type, body_pos: a.body_pos, charge: a.charge })
                .collect(),
            bonds: molecule.bonds.to_vec(),
            pos: molecule.pos(),
            orientation: molecule.orientation(),
        }
    }

    /// Rebuild the molecule at rest at the recorded placement.
    pub fn build(&self, mass_factor: f32) -> Result<Molecule> {
        let atoms = self
            .atoms
            .iter()
            .map(|a| Atom::new(a.atom_type, a.body_pos, a.charge))
            .collect();
        let mut molecule = Molecule::new(atoms)?.with_bonds(&self.bonds);
        molecule.set_id(self.id);
        molecule.place(self.pos, self.orientation, mass_factor);
        Ok(molecule)
    }
}

/// External force inserted when the level starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedExternalForce {
    pub name: String,
    pub molecule_id: u64,
    pub origin: Vec3,
    pub force: Vec3,
    /// Seconds of simulated time the force stays active.
    pub duration: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub molecules: Vec<MoleculeRecord>,
    #[serde(default)]
    pub barriers: Vec<Barrier>,
    #[serde(default)]
    pub portals: Vec<Portal>,
    #[serde(default)]
    pub brownians: Vec<BrownianElement>,
    #[serde(default)]
    pub releasers: Vec<MoleculeReleaser>,
    #[serde(default)]
    pub config: SimConfig,
    #[serde(default)]
    pub force_law: ForceLawConfig,
    /// Molecule kind name -> how many the player may place.
    #[serde(default)]
    pub available_elements: BTreeMap<String, u32>,
    #[serde(default)]
    pub external_forces: Vec<NamedExternalForce>,
    /// Ids of the barriers that form the game field bounds.
    #[serde(default)]
    pub game_field: Vec<u64>,
}

impl Default for LevelData {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            name: String::new(),
            molecules: Vec::new(),
            barriers: Vec::new(),
            portals: Vec::new(),
            brownians: Vec::new(),
            releasers: Vec::new(),
            config: SimConfig::default(),
            force_law: ForceLawConfig::default(),
            available_elements: BTreeMap::new(),
            external_forces: Vec::new(),
            game_field: Vec::new(),
        }
    }
}

impl LevelData {
    /// Snapshot the current level content of `core`.
    pub fn from_core(core: &Core) -> Self {
        let external_forces = core
            .external_forces
            .iter()
            .enumerate()
            .map(|(i, f)| NamedExternalForce {
                name: format!("force_{}", i),
                molecule_id: f.molecule_id,
                origin: f.origin,
                force: f.force,
                duration: (f.end_time - core.time).max(0.0),
            })
            .collect();
        Self {
            version: CURRENT_VERSION,
            name: String::new(),
            molecules: core.molecules.iter().map(MoleculeRecord::from_molecule).collect(),
            barriers: core.barriers.clone(),
            portals: core.portals.clone(),
            brownians: core.brownians.clone(),
            releasers: core.releasers.clone(),
            config: core.config.clone(),
            force_law: core.atomic_force.to_config(),
            available_elements: BTreeMap::new(),
            external_forces,
            game_field: core.game_field().to_vec(),
        }
    }

    pub fn available(&self, kind: MoleculeKind) -> u32 {
        self.available_elements.get(kind.name()).copied().unwrap_or(0)
    }

    /// Bring an older record up to [`CURRENT_VERSION`], defaulting fields the
    /// older layout did not carry.
    pub fn migrate(&mut self) -> Result<()> {
        if self.version > CURRENT_VERSION {
            return Err(Error::UnsupportedVersion(self.version));
        }
        if self.version < 2 {
            self.config.gravity = config::GRAVITY;
            self.external_forces.clear();
        }
        if self.version < 3 {
            self.releasers.clear();
        }
        if self.version < CURRENT_VERSION {
            log::info!("migrated level '{}' from version {} to {}", self.name, self.version, CURRENT_VERSION);
            self.version = CURRENT_VERSION;
        }
        self.available_elements.retain(|name, _| {
            let known = MoleculeKind::from_name(name).is_some();
            if !known {
                log::warn!("ignoring unknown available element '{}'", name);
            }
            known
        });
        Ok(())
    }

    /// Replace the content of `core` with this level and mark it as the level start.
    ///
    /// Configuration and force law are validated first; on error `core` is untouched.
    pub fn apply_to(mut self, core: &mut Core) -> Result<()> {
        self.migrate()?;
        self.config.validate()?;
        let force = AtomicForce::from_config(&self.force_law)?;
        let mass_factor = self.config.mass_factor;
        let molecules = self
            .molecules
            .iter()
            .map(|record| record.build(mass_factor))
            .collect::<Result<Vec<_>>>()?;

        core.clear();
        core.apply_config(self.config)?;
        core.atomic_force = force;
        for barrier in self.barriers {
            core.add_barrier(barrier);
        }
        core.adopt_game_field(&self.game_field);
        for portal in self.portals {
            core.add_portal(portal);
        }
        for brownian in self.brownians {
            core.add_brownian(brownian);
        }
        for mut releaser in self.releasers {
            releaser.reset();
            core.add_releaser(releaser);
        }
        for molecule in molecules {
            core.add_molecule(molecule);
        }
        for named in self.external_forces {
            let force = ExternalForce::new(named.molecule_id, named.origin, named.force, named.duration);
            if let Err(e) = core.add_external_force(force) {
                log::warn!("skipping external force '{}': {}", named.name, e);
            }
        }
        core.begin_level();
        log::info!(
            "loaded level '{}': {} molecules, {} barriers, {} portals",
            self.name,
            core.molecules.len(),
            core.barriers.len(),
            core.portals.len()
        );
        Ok(())
    }
}
