//! Force phase of the simulation step.
//!
//! Computes the net force and torque of every molecule from the state at the start
//! of the step. Nothing here mutates a molecule: the integrator consumes the
//! returned [`Load`]s only after every molecule has been evaluated.

use rand::Rng;
use rayon::prelude::*;
use ultraviolet::Vec3;

use super::simulation::Core;
use crate::body::Molecule;
use crate::config;
use crate::profile_scope;
use crate::units::MIN_PAIR_DISTANCE;

/// Net force and torque (about the mass center) acting on one molecule.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Load {
    pub force: Vec3,
    pub torque: Vec3,
}

/// Random thermal kick of one molecule, drawn before the force phase.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Fluctuation {
    pub force: Vec3,
    pub torque: Vec3,
}

fn random_unit_cube<R: Rng>(rng: &mut R) -> Vec3 {
    Vec3::new(
        rng.random_range(-1.0f32..=1.0),
        rng.random_range(-1.0f32..=1.0),
        rng.random_range(-1.0f32..=1.0),
    )
}

/// Draw one fluctuation per molecule, in molecule order, so the result never
/// depends on how the force phase is scheduled.
pub fn draw_fluctuations<R: Rng>(rng: &mut R, count: usize, translation: f32, rotation: f32) -> Vec<Fluctuation> {
    (0..count)
        .map(|_| {
            let force = random_unit_cube(rng) * translation;
            let torque = random_unit_cube(rng) * rotation;
            Fluctuation { force, torque }
        })
        .collect()
}

/// Loads for every molecule, in storage order.
pub fn compute_all(core: &Core, fluctuations: &[Fluctuation]) -> Vec<Load> {
    profile_scope!("forces_compute_all");
    core.molecules
        .par_iter()
        .enumerate()
        .map(|(i, molecule)| {
            let kick = fluctuations.get(i).copied().unwrap_or_default();
            compute_force_and_torque(core, molecule, kick)
        })
        .collect()
}

/// Net load on `receiver` from atoms of other molecules, barriers, the whole-body
/// Van der Waals term, damping, gravity, fluctuation and external forces.
pub fn compute_force_and_torque(core: &Core, receiver: &Molecule, kick: Fluctuation) -> Load {
    let center = receiver.pos();
    let time = core.time;
    let mut load = Load::default();

    for atom in &receiver.atoms {
        let mut atom_force = Vec3::zero();
        for other in &core.molecules {
            if other.id == receiver.id {
                continue;
            }
            for other_atom in &other.atoms {
                atom_force += core.atomic_force.calc_force_between_atoms(atom, other_atom);
            }
        }
        for barrier in &core.barriers {
            atom_force += barrier.calc_force_at(atom.pos, receiver.accumulated_charge, time);
        }
        load.force += atom_force;
        load.torque += (atom.pos - center).cross(atom_force);
    }

    load.force += molecule_vdw_force(core, receiver);

    load.force -= receiver.vel * core.config.translation_damping;
    load.torque -= receiver.angular_vel * core.config.rotation_damping;

    load.force += Vec3::new(0.0, 0.0, -core.config.gravity * receiver.mass * core.config.mass_factor);

    load.force += kick.force;
    load.torque += kick.torque;

    for external in core.external_forces.iter().filter(|f| f.molecule_id == receiver.id) {
        if external.is_active(time) {
            let (force, torque) = external.load_on(receiver);
            load.force += force;
            load.torque += torque;
        }
    }
    if let Some(drag) = core.drag.as_ref().filter(|d| d.molecule_id == receiver.id) {
        if drag.is_active(time) {
            let (force, torque) = drag.load_on(receiver);
            load.force += force;
            load.torque += torque;
        }
    }

    load
}

/// Coarse Lennard-Jones-style term between molecule centers.
fn molecule_vdw_force(core: &Core, receiver: &Molecule) -> Vec3 {
    let strength = core.config.molecule_vdw_strength;
    if strength == 0.0 {
        return Vec3::zero();
    }
    let sigma = 2.0 * core.config.molecule_vdw_radius;
    let mut force = Vec3::zero();
    for other in &core.molecules {
        if other.id == receiver.id {
            continue;
        }
        let delta = receiver.pos() - other.pos();
        let distance = delta.mag();
        if distance < MIN_PAIR_DISTANCE {
            continue;
        }
        let s = (sigma / distance).min(config::MOLECULE_VDW_MAX_RATIO);
        let s6 = s * s * s * s * s * s;
        force += delta / distance * (4.0 * strength * (s6 * s6 - s6));
    }
    force
}
