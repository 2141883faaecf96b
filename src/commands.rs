// commands.rs
// Handles LevelCommand messages from the editor and input layers

use std::path::PathBuf;

use ultraviolet::{Rotor3, Vec3};

use crate::body::MoleculeKind;
use crate::config::{ForceLawConfig, SimConfig};
use crate::error::{Error, Result};
use crate::field::{Barrier, BrownianElement, MoleculeReleaser, Portal};
use crate::io::{load_into, save_core, SaveOptions};
use crate::simulation::{Core, ExternalForce};

#[cfg(feature = "profiling")]
use crate::PROFILER;

#[derive(Clone, Debug)]
pub enum LevelCommand {
    AddMolecule { kind: MoleculeKind, pos: Vec3, orientation: Rotor3 },
    AddBarrier(Barrier),
    AddPortal(Portal),
    AddBrownian(BrownianElement),
    AddReleaser(MoleculeReleaser),
    DeleteLevelElement { id: u64 },
    Clear,
    SetGameField { half_extent: [f32; 3] },
    SetAtomCharge { molecule_id: u64, atom_index: usize, charge: f32 },
    /// Sent on every mouse move while a molecule is dragged.
    SetDrag { molecule_id: u64, origin: Vec3, force: Vec3, plane_normal: Vec3, end_time: f32 },
    ClearDrag,
    AddExternalForce(ExternalForce),
    ApplyForceLaw(ForceLawConfig),
    ApplyConfig(SimConfig),
    /// Advance by `count` ticks of the configured time step.
    Step { count: u32 },
    /// Record the current placement as the level start.
    BeginLevel,
    ResetLevel,
    SaveLevel { path: PathBuf, name: String, options: SaveOptions },
    LoadLevel { path: PathBuf },
}

/// Process a single LevelCommand
pub fn process_command(cmd: LevelCommand, core: &mut Core) -> Result<()> {
    match cmd {
        LevelCommand::AddMolecule { kind, pos, orientation } => {
            handle_add_molecule(core, kind, pos, orientation)?;
        }
        LevelCommand::AddBarrier(barrier) => {
            core.add_barrier(barrier);
        }
        LevelCommand::AddPortal(portal) => {
            core.add_portal(portal);
        }
        LevelCommand::AddBrownian(brownian) => {
            core.add_brownian(brownian);
        }
        LevelCommand::AddReleaser(releaser) => {
            core.add_releaser(releaser);
        }
        LevelCommand::DeleteLevelElement { id } => {
            core.delete_level_element(id)?;
        }
        LevelCommand::Clear => {
            core.clear();
        }
        LevelCommand::SetGameField { half_extent } => {
            core.set_game_field(half_extent);
        }
        LevelCommand::SetAtomCharge { molecule_id, atom_index, charge } => {
            core.molecule_mut(molecule_id)
                .ok_or(Error::UnknownMolecule(molecule_id))?
                .set_atom_charge(atom_index, charge)?;
        }
        LevelCommand::SetDrag { molecule_id, origin, force, plane_normal, end_time } => {
            core.set_drag_force(molecule_id, origin, force, plane_normal, end_time)?;
        }
        LevelCommand::ClearDrag => {
            core.clear_drag();
        }
        LevelCommand::AddExternalForce(force) => {
            core.add_external_force(force)?;
        }
        LevelCommand::ApplyForceLaw(law) => {
            core.apply_force_law(&law)?;
        }
        LevelCommand::ApplyConfig(config) => {
            core.apply_config(config)?;
        }
        LevelCommand::Step { count } => {
            handle_step(core, count)?;
        }
        LevelCommand::BeginLevel => {
            core.begin_level();
        }
        LevelCommand::ResetLevel => {
            core.reset_level();
        }
        LevelCommand::SaveLevel { path, name, options } => {
            save_core(&path, core, &name, options)?;
        }
        LevelCommand::LoadLevel { path } => {
            load_into(&path, core)?;
        }
    }
    Ok(())
}

fn handle_add_molecule(core: &mut Core, kind: MoleculeKind, pos: Vec3, orientation: Rotor3) -> Result<u64> {
    let molecule = kind.create(pos, orientation)?;
    let id = core.add_molecule(molecule);
    log::debug!("added {} molecule {} at {:?}", kind.name(), id, pos);
    Ok(id)
}

/// Runs every tick even if one diverges; the first diverged molecule is reported.
fn handle_step(core: &mut Core, count: u32) -> Result<()> {
    let mut diverged = None;
    for _ in 0..count {
        let report = core.step();
        if diverged.is_none() {
            diverged = report.diverged.first().copied();
        }
    }
    #[cfg(feature = "profiling")]
    PROFILER.lock().log_and_reset();
    match diverged {
        Some(molecule_id) => Err(Error::NumericDivergence { molecule_id }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Falloff, PortalShape, Transform};

    #[test]
    fn editor_session() {
        let mut core = Core::with_seed(5);
        process_command(
            LevelCommand::AddMolecule { kind: MoleculeKind::Water, pos: Vec3::zero(), orientation: Rotor3::identity() },
            &mut core,
        )
        .unwrap();
        let id = core.molecules[0].id;
        process_command(
            LevelCommand::AddBarrier(Barrier::plane(0, Vec3::new(0.0, 0.0, -2.0), Vec3::unit_z(), Falloff::new(2.0, 1.0))),
            &mut core,
        )
        .unwrap();
        process_command(
            LevelCommand::AddPortal(Portal::new(
                0,
                Transform::at(Vec3::new(8.0, 0.0, 0.0)),
                PortalShape::Box { half_extent: Vec3::new(1.0, 1.0, 1.0) },
                1,
            )),
            &mut core,
        )
        .unwrap();
        process_command(LevelCommand::SetAtomCharge { molecule_id: id, atom_index: 0, charge: -1.0 }, &mut core)
            .unwrap();
        assert!((core.molecules[0].accumulated_charge + 0.2).abs() < 1e-6);

        process_command(
            LevelCommand::SetDrag {
                molecule_id: id,
                origin: Vec3::zero(),
                force: Vec3::unit_x(),
                plane_normal: Vec3::unit_z(),
                end_time: 1.0,
            },
            &mut core,
        )
        .unwrap();
        process_command(LevelCommand::Step { count: 3 }, &mut core).unwrap();
        assert_eq!(core.frame, 3);

        process_command(LevelCommand::DeleteLevelElement { id }, &mut core).unwrap();
        assert!(core.molecules.is_empty());
        assert!(core.drag.is_none());
        process_command(LevelCommand::Clear, &mut core).unwrap();
        assert!(core.barriers.is_empty() && core.portals.is_empty());
    }

    #[test]
    fn reset_after_editing_restores_placed_molecules() {
        let mut core = Core::with_seed(5);
        let start = Vec3::new(1.0, -1.0, 0.5);
        process_command(
            LevelCommand::AddMolecule { kind: MoleculeKind::Water, pos: start, orientation: Rotor3::identity() },
            &mut core,
        )
        .unwrap();
        process_command(LevelCommand::Step { count: 2 }, &mut core).unwrap();
        assert_ne!(core.molecules[0].pos(), start);

        process_command(LevelCommand::ResetLevel, &mut core).unwrap();
        assert_eq!(core.molecules.len(), 1);
        assert_eq!(core.molecules[0].pos(), start);
        assert_eq!(core.molecules[0].vel, Vec3::zero());

        // A molecule added mid-run becomes part of the next level start.
        process_command(LevelCommand::Step { count: 2 }, &mut core).unwrap();
        process_command(
            LevelCommand::AddMolecule {
                kind: MoleculeKind::Oxygen,
                pos: Vec3::new(-3.0, 0.0, 0.0),
                orientation: Rotor3::identity(),
            },
            &mut core,
        )
        .unwrap();
        process_command(LevelCommand::Step { count: 2 }, &mut core).unwrap();
        process_command(LevelCommand::ResetLevel, &mut core).unwrap();
        assert_eq!(core.molecules.len(), 2);
        assert_eq!(core.molecules[1].pos(), Vec3::new(-3.0, 0.0, 0.0));
    }

    #[test]
    fn begin_level_pins_the_start() {
        let mut core = Core::with_seed(5);
        process_command(
            LevelCommand::AddMolecule { kind: MoleculeKind::ChargedNatrium, pos: Vec3::zero(), orientation: Rotor3::identity() },
            &mut core,
        )
        .unwrap();
        process_command(LevelCommand::Step { count: 3 }, &mut core).unwrap();
        let pinned = core.molecules[0].pos();
        process_command(LevelCommand::BeginLevel, &mut core).unwrap();
        assert_eq!(core.time, 0.0);
        process_command(LevelCommand::Step { count: 3 }, &mut core).unwrap();
        process_command(LevelCommand::ResetLevel, &mut core).unwrap();
        assert_eq!(core.molecules[0].pos(), pinned);
    }

    #[test]
    fn failing_commands_report_errors() {
        let mut core = Core::with_seed(5);
        assert!(matches!(
            process_command(LevelCommand::DeleteLevelElement { id: 9 }, &mut core),
            Err(Error::UnknownElement(9))
        ));
        assert!(matches!(
            process_command(
                LevelCommand::SetAtomCharge { molecule_id: 9, atom_index: 0, charge: 1.0 },
                &mut core
            ),
            Err(Error::UnknownMolecule(9))
        ));
        assert!(process_command(LevelCommand::ApplyForceLaw(ForceLawConfig::new("spring")), &mut core).is_err());
        let mut config = SimConfig::default();
        config.time_step = 5.0;
        assert!(process_command(LevelCommand::ApplyConfig(config), &mut core).is_err());
        assert_eq!(core.config, SimConfig::default());
    }

    #[test]
    fn step_reports_divergence() {
        let mut core = Core::with_seed(5);
        process_command(
            LevelCommand::AddMolecule { kind: MoleculeKind::ChargedNatrium, pos: Vec3::zero(), orientation: Rotor3::identity() },
            &mut core,
        )
        .unwrap();
        let id = core.molecules[0].id;
        let m = &mut core.molecules[0];
        let state = crate::body::MoleculeState { momentum: Vec3::new(f32::NAN, 0.0, 0.0), ..m.state };
        m.from_state(state, 1.0);
        let result = process_command(LevelCommand::Step { count: 2 }, &mut core);
        assert!(matches!(result, Err(Error::NumericDivergence { molecule_id }) if molecule_id == id));
        assert!(core.molecules[0].state.is_finite());
    }
}
