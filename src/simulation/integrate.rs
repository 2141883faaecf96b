// simulation/integrate.rs
// Integration phase: explicit Euler on position, orientation and both momenta

use ultraviolet::{Rotor3, Vec3};

use super::forces::Load;
use super::simulation::{Core, StepReport};
use crate::body::{integrate_orientation, Molecule, MoleculeState};
use crate::profile_scope;

/// Next state of `molecule` under `load`, using the velocities derived at the
/// start of the step.
pub fn step_state(molecule: &Molecule, load: &Load, dt: f32) -> MoleculeState {
    let state = &molecule.state;
    MoleculeState {
        pos: state.pos + molecule.vel * dt,
        orientation: integrate_orientation(state.orientation, molecule.angular_vel, dt),
        momentum: state.momentum + load.force * dt,
        angular_momentum: state.angular_momentum + load.torque * dt,
    }
}

impl Core {
    /// Apply `loads` (one per molecule, same order) and refresh derived state.
    ///
    /// A molecule whose next state is not finite is put back where it was, at rest,
    /// and reported instead of being propagated.
    pub(super) fn integrate(&mut self, loads: &[Load], dt: f32, report: &mut StepReport) {
        profile_scope!("integrate");
        let mass_factor = self.config.mass_factor;
        for (molecule, load) in self.molecules.iter_mut().zip(loads) {
            molecule.force = load.force;
            molecule.torque = load.torque;
            let next = step_state(molecule, load, dt);
            if next.is_finite() {
                molecule.from_state(next, mass_factor);
                continue;
            }
            log::warn!(
                "molecule {} diverged at t={:.4}, resetting it to rest",
                molecule.id,
                self.time
            );
            let previous = MoleculeState::at_rest(molecule.state.pos, molecule.state.orientation);
            let rest = if previous.is_finite() {
                previous
            } else {
                MoleculeState::at_rest(Vec3::zero(), Rotor3::identity())
            };
            molecule.force = Vec3::zero();
            molecule.torque = Vec3::zero();
            molecule.from_state(rest, mass_factor);
            report.diverged.push(molecule.id);
        }
    }
}
