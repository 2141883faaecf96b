// Core update loop tests: scenarios, determinism and level element bookkeeping

use super::simulation::Core;
use super::external::ExternalForce;
use super::forces::{compute_force_and_torque, Fluctuation};
use crate::body::{create_charged_natrium, MoleculeKind, MoleculeState};
use crate::config::{ForceLawConfig, SimConfig};
use crate::field::{Portal, PortalShape, MoleculeReleaser, Transform};
use crate::atomic_force::AtomicForce;
use ultraviolet::{Rotor3, Vec3};

/// Core with every stochastic, dissipative and whole-body term switched off.
fn quiet_core() -> Core {
    let mut core = Core::with_seed(7);
    let mut config = SimConfig::default().without_noise_and_damping();
    config.molecule_vdw_strength = 0.0;
    core.apply_config(config).unwrap();
    core
}

fn natrium_at(pos: Vec3) -> crate::body::Molecule {
    let mut m = create_charged_natrium().unwrap();
    m.place(pos, Rotor3::identity(), 1.0);
    m
}

#[cfg(test)]
mod scenarios {
    use super::*;

    #[test]
    fn two_like_charges_repel() {
        let mut core = quiet_core();
        let a = core.add_molecule(natrium_at(Vec3::zero()));
        let b = core.add_molecule(natrium_at(Vec3::new(2.0, 0.0, 0.0)));
        core.update(0.01);

        let va = core.molecule(a).unwrap().vel;
        let vb = core.molecule(b).unwrap().vel;
        assert!(va.mag() > 0.0 && vb.mag() > 0.0);
        assert!(va.x < 0.0, "left charge should move towards -x, got {:?}", va);
        assert!(vb.x > 0.0, "right charge should move towards +x, got {:?}", vb);
        let dir_a = va.normalized();
        let dir_b = vb.normalized();
        assert!((dir_a + dir_b).mag() < 1e-5, "velocities are not opposite");
        assert!((dir_a - Vec3::new(-1.0, 0.0, 0.0)).mag() < 1e-5);
    }

    #[test]
    fn forces_are_read_before_any_molecule_moves() {
        let mut core = quiet_core();
        let a = core.add_molecule(natrium_at(Vec3::new(-0.5, 0.2, 0.0)));
        let b = core.add_molecule(natrium_at(Vec3::new(0.9, -0.1, 0.3)));
        core.update(0.05);
        let pa = core.molecule(a).unwrap().state.momentum;
        let pb = core.molecule(b).unwrap().state.momentum;
        assert!((pa + pb).mag() < 1e-6, "momentum not conserved: {:?} vs {:?}", pa, pb);
    }

    #[test]
    fn deterministic_without_fluctuation() {
        let build = || {
            let mut core = quiet_core();
            core.add_molecule(MoleculeKind::Water.create(Vec3::zero(), Rotor3::identity()).unwrap());
            core.add_molecule(
                MoleculeKind::Sulfate
                    .create(Vec3::new(2.5, 0.3, -0.4), Rotor3::from_rotation_xy(0.4))
                    .unwrap(),
            );
            core.add_molecule(MoleculeKind::Dipole.create(Vec3::new(-1.5, 1.0, 0.0), Rotor3::identity()).unwrap());
            core
        };
        let mut first = build();
        let mut second = build();
        // Different seeds must not matter when fluctuation is zero.
        second.set_rng(rand::SeedableRng::seed_from_u64(99));
        for _ in 0..25 {
            first.update(0.01);
            second.update(0.01);
        }
        for (m1, m2) in first.molecules.iter().zip(&second.molecules) {
            assert_eq!(m1.state, m2.state);
        }
    }

    #[test]
    fn same_seed_reproduces_fluctuations() {
        let build = || {
            let mut core = Core::with_seed(1234);
            core.add_molecule(MoleculeKind::Water.create(Vec3::zero(), Rotor3::identity()).unwrap());
            core.add_molecule(MoleculeKind::Oxygen.create(Vec3::new(3.0, 0.0, 0.0), Rotor3::identity()).unwrap());
            core
        };
        let mut first = build();
        let mut second = build();
        for _ in 0..10 {
            first.update(0.01);
            second.update(0.01);
        }
        for (m1, m2) in first.molecules.iter().zip(&second.molecules) {
            assert_eq!(m1.state, m2.state);
        }
        assert!(first.molecules[0].state.momentum.mag() > 0.0);
    }

    #[test]
    fn plane_barrier_pushes_molecule_back_into_field() {
        let mut core = quiet_core();
        core.apply_force_law(&ForceLawConfig::new("null")).unwrap();
        let ids = core.set_game_field([5.0, 5.0, 5.0]);
        assert_eq!(ids.len(), 6);
        let id = core.add_molecule(natrium_at(Vec3::new(4.5, 0.0, 0.0)));
        core.update(0.01);
        let vel = core.molecule(id).unwrap().vel;
        assert!(vel.x < 0.0);
        assert!(vel.y.abs() < 1e-6 && vel.z.abs() < 1e-6);

        // Re-installing the field replaces the previous walls.
        core.set_game_field([6.0, 6.0, 6.0]);
        assert_eq!(core.barriers.len(), 6);
    }
}

#[cfg(test)]
mod lifecycle {
    use super::*;

    #[test]
    fn external_force_applies_until_it_expires() {
        let mut core = quiet_core();
        let id = core.add_molecule(natrium_at(Vec3::zero()));
        let push = Vec3::new(3.0, 0.0, 0.0);
        core.add_external_force(ExternalForce::new(id, Vec3::zero(), push, 0.015)).unwrap();

        core.update(0.01);
        let p = core.molecule(id).unwrap().state.momentum;
        assert!((p - push * 0.01).mag() < 1e-6);
        assert_eq!(core.external_forces.len(), 1);

        core.update(0.01);
        assert!(core.external_forces.is_empty());
        let p2 = core.molecule(id).unwrap().state.momentum;
        assert!((p2 - p).mag() < 1e-6, "expired force still applied");
    }

    #[test]
    fn external_force_needs_existing_molecule() {
        let mut core = quiet_core();
        let err = core.add_external_force(ExternalForce::new(42, Vec3::zero(), Vec3::unit_x(), 1.0));
        assert!(err.is_err());
        assert!(core.set_drag_force(42, Vec3::zero(), Vec3::unit_x(), Vec3::unit_z(), 1.0).is_err());
    }

    #[test]
    fn off_center_drag_spins_the_molecule() {
        let mut core = quiet_core();
        core.apply_force_law(&ForceLawConfig::new("null")).unwrap();
        let id = core.add_molecule(MoleculeKind::Water.create(Vec3::zero(), Rotor3::identity()).unwrap());
        core.set_drag_force(id, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0), Vec3::unit_z(), 1.0)
            .unwrap();
        core.update(0.01);
        let m = core.molecule(id).unwrap();
        assert!(m.state.angular_momentum.z > 0.0);
        core.clear_drag();
        assert!(core.drag.is_none());
    }

    #[test]
    fn diverged_molecule_is_reset_and_reported() {
        let mut core = quiet_core();
        let id = core.add_molecule(natrium_at(Vec3::new(1.0, 2.0, 3.0)));
        {
            let m = core.molecule_mut(id).unwrap();
            let state = MoleculeState { momentum: Vec3::new(f32::INFINITY, 0.0, 0.0), ..m.state };
            m.from_state(state, 1.0);
        }
        let report = core.update(0.01);
        assert_eq!(report.diverged, vec![id]);
        let m = core.molecule(id).unwrap();
        assert!(m.state.is_finite());
        assert_eq!(m.pos(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.vel, Vec3::zero());
    }

    #[test]
    fn rejected_configuration_keeps_previous_values() {
        let mut core = quiet_core();
        core.apply_force_law(&ForceLawConfig::new("wendland").with("radius", 2.0)).unwrap();
        let law = core.atomic_force;
        assert_eq!(law, AtomicForce::wendland(1.0, 2.0));

        assert!(core.apply_force_law(&ForceLawConfig::new("magnetic")).is_err());
        assert!(core.apply_force_law(&ForceLawConfig::new("coulomb").with("charge", 1.0)).is_err());
        assert_eq!(core.atomic_force, law);

        let before = core.config.clone();
        let mut bad = before.clone();
        bad.mass_factor = 0.0;
        assert!(core.apply_config(bad).is_err());
        assert_eq!(core.config, before);
    }

    #[test]
    fn portal_captures_and_finishes_level() {
        let mut core = quiet_core();
        assert!(!core.level_finished());
        let portal = core.add_portal(Portal::new(
            0,
            Transform::at(Vec3::zero()),
            PortalShape::Box { half_extent: Vec3::new(1.0, 1.0, 1.0) },
            2,
        ));
        let inside = core.add_molecule(natrium_at(Vec3::new(0.2, 0.0, 0.0)));
        let outside = core.add_molecule(natrium_at(Vec3::new(10.0, 0.0, 0.0)));

        let report = core.update(0.001);
        assert_eq!(report.captured, vec![(portal, inside)]);
        assert!(core.molecule(inside).is_none());
        assert!(core.molecule(outside).is_some());
        assert!(!core.level_finished());

        core.add_molecule(natrium_at(Vec3::new(-0.3, 0.1, 0.0)));
        core.update(0.001);
        assert!(core.level_finished());
        assert_eq!(core.score(), 2.0);
    }

    #[test]
    fn non_destructive_portal_counts_current_occupants() {
        let mut core = quiet_core();
        core.apply_force_law(&ForceLawConfig::new("null")).unwrap();
        let mut portal = Portal::new(
            0,
            Transform::at(Vec3::zero()),
            PortalShape::Sphere { radii: Vec3::new(2.0, 2.0, 2.0) },
            1,
        );
        portal.destroy_on_entering = false;
        core.add_portal(portal);
        core.add_molecule(natrium_at(Vec3::zero()));
        for _ in 0..3 {
            core.update(0.01);
        }
        assert_eq!(core.molecules.len(), 1);
        assert_eq!(core.portals[0].condition.num_captured_molecules, 1);
    }

    #[test]
    fn releaser_emits_up_to_its_limit() {
        let mut core = quiet_core();
        core.apply_force_law(&ForceLawConfig::new("null")).unwrap();
        let mut releaser = MoleculeReleaser::new(
            0,
            Transform::at(Vec3::new(0.0, 0.0, 1.0)),
            MoleculeKind::ChargedChlorine,
            0.05,
            2,
        );
        releaser.initial_velocity = Vec3::new(0.0, 1.0, 0.0);
        core.add_releaser(releaser);

        let report = core.update(0.01);
        assert_eq!(report.released.len(), 1);
        let first = core.molecule(report.released[0]).unwrap();
        assert!((first.vel - Vec3::new(0.0, 1.0, 0.0)).mag() < 1e-5);

        for _ in 0..20 {
            core.update(0.01);
        }
        assert_eq!(core.molecules.len(), 2);
        assert_eq!(core.releasers[0].released, 2);
    }

    #[test]
    fn reset_level_restores_start_placement() {
        let mut core = quiet_core();
        let id = core.add_molecule(natrium_at(Vec3::new(1.0, 0.0, 0.0)));
        core.add_portal(Portal::new(
            0,
            Transform::at(Vec3::new(-5.0, 0.0, 0.0)),
            PortalShape::Box { half_extent: Vec3::new(1.0, 1.0, 1.0) },
            1,
        ));
        core.add_external_force(ExternalForce::new(id, Vec3::zero(), Vec3::new(5.0, 0.0, 0.0), 0.05))
            .unwrap();
        core.begin_level();

        for _ in 0..10 {
            core.update(0.01);
        }
        core.portals[0].handle_molecule_entering();
        assert!(core.molecule(id).unwrap().pos().x > 1.0);
        assert!(core.external_forces.is_empty());

        core.reset_level();
        assert_eq!(core.time, 0.0);
        assert_eq!(core.frame, 0);
        let m = core.molecule(id).unwrap();
        assert_eq!(m.pos(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(m.vel, Vec3::zero());
        assert_eq!(core.external_forces.len(), 1);
        assert_eq!(core.portals[0].condition.num_captured_molecules, 0);
    }

    #[test]
    fn reset_without_begin_level_restores_edited_molecules() {
        let mut core = quiet_core();
        let id = core.add_molecule(natrium_at(Vec3::new(1.0, 0.0, 0.0)));
        core.add_external_force(ExternalForce::new(id, Vec3::zero(), Vec3::new(5.0, 0.0, 0.0), 1.0))
            .unwrap();
        core.update(0.01);
        core.update(0.01);
        assert!(core.molecule(id).unwrap().pos().x > 1.0);

        core.reset_level();
        assert_eq!(core.molecules.len(), 1);
        let m = core.molecule(id).unwrap();
        assert_eq!(m.pos(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(m.vel, Vec3::zero());

        // Editing after a run moves the start to the edited placement.
        core.update(0.01);
        let late = core.add_molecule(natrium_at(Vec3::new(-4.0, 0.0, 0.0)));
        let moved = core.molecule(id).unwrap().pos();
        core.update(0.01);
        core.reset_level();
        assert_eq!(core.molecules.len(), 2);
        assert_eq!(core.molecule(late).unwrap().pos(), Vec3::new(-4.0, 0.0, 0.0));
        assert_eq!(core.molecule(id).unwrap().pos(), moved);
    }

    #[test]
    fn released_molecules_are_not_part_of_the_start() {
        let mut core = quiet_core();
        core.apply_force_law(&ForceLawConfig::new("null")).unwrap();
        core.add_molecule(natrium_at(Vec3::zero()));
        core.add_releaser(MoleculeReleaser::new(
            0,
            Transform::at(Vec3::new(0.0, 0.0, 3.0)),
            MoleculeKind::ChargedChlorine,
            0.05,
            1,
        ));
        core.update(0.01);
        assert_eq!(core.molecules.len(), 2);

        core.reset_level();
        assert_eq!(core.molecules.len(), 1);
        assert_eq!(core.releasers[0].released, 0);
        core.update(0.01);
        assert_eq!(core.molecules.len(), 2);
    }

    #[test]
    fn oversized_indicator_grid_is_rejected() {
        let mut core = quiet_core();
        let before = core.config.clone();
        let mut config = before.clone();
        config.show_force_indicators = true;
        config.force_indicator_resolution = 3_000_000;
        assert!(core.apply_config(config).is_err());
        assert_eq!(core.config, before);
    }

    #[test]
    fn delete_and_clear() {
        let mut core = quiet_core();
        let m = core.add_molecule(natrium_at(Vec3::zero()));
        let walls = core.set_game_field([4.0, 4.0, 4.0]);
        assert_ne!(m, walls[0]);
        core.delete_level_element(walls[0]).unwrap();
        assert_eq!(core.barriers.len(), 5);
        core.delete_level_element(m).unwrap();
        assert!(core.molecules.is_empty());
        assert!(core.delete_level_element(m).is_err());

        core.add_molecule(natrium_at(Vec3::zero()));
        core.clear();
        assert!(core.molecules.is_empty() && core.barriers.is_empty());
    }

    #[test]
    fn force_indicators_follow_config() {
        let mut core = quiet_core();
        core.add_molecule(natrium_at(Vec3::zero()));
        core.update(0.01);
        assert!(core.force_indicators.is_empty());

        let mut config = core.config.clone();
        config.show_force_indicators = true;
        config.force_indicator_resolution = 2;
        core.apply_config(config).unwrap();
        core.update(0.01);
        assert_eq!(core.force_indicators.len(), 8);
        for indicator in &core.force_indicators {
            // A positive probe is pushed away from the positive charge near the origin.
            assert!(indicator.force.dot(indicator.pos) > 0.0);
        }
    }
}

#[cfg(test)]
mod whole_body_terms {
    use super::*;

    /// Two neutral-force natrium ions with only the center-to-center term active.
    fn vdw_pair(distance: f32) -> Core {
        let mut core = Core::with_seed(3);
        let mut config = SimConfig::default().without_noise_and_damping();
        config.molecule_vdw_strength = 0.1;
        config.molecule_vdw_radius = 0.5;
        core.apply_config(config).unwrap();
        core.apply_force_law(&ForceLawConfig::new("null")).unwrap();
        core.add_molecule(natrium_at(Vec3::zero()));
        core.add_molecule(natrium_at(Vec3::new(distance, 0.0, 0.0)));
        core
    }

    fn force_on_first(core: &Core) -> Vec3 {
        compute_force_and_torque(core, &core.molecules[0], Fluctuation::default()).force
    }

    #[test]
    fn attracts_beyond_sigma() {
        let force = force_on_first(&vdw_pair(1.5));
        assert!(force.x > 0.0);
        assert!(force.y.abs() < 1e-6 && force.z.abs() < 1e-6);
    }

    #[test]
    fn repels_inside_sigma() {
        let force = force_on_first(&vdw_pair(0.8));
        assert!(force.x < 0.0);
        assert!(force.y.abs() < 1e-6 && force.z.abs() < 1e-6);
    }

    #[test]
    fn nearly_coincident_centers_stay_finite() {
        let force = force_on_first(&vdw_pair(1e-3));
        assert!(force.x.is_finite());
        // The ratio cap of 2 bounds the magnitude at 4 * 0.1 * (2^12 - 2^6).
        assert!((force.mag() - 1612.8).abs() < 0.5);
        assert!(force.x < 0.0);
    }

    #[test]
    fn disabled_strength_adds_nothing() {
        let mut core = vdw_pair(0.8);
        let mut config = core.config.clone();
        config.molecule_vdw_strength = 0.0;
        core.apply_config(config).unwrap();
        assert_eq!(force_on_first(&core), Vec3::zero());
    }

    #[test]
    fn gravity_pulls_down_by_effective_mass() {
        let mut core = quiet_core();
        core.apply_force_law(&ForceLawConfig::new("null")).unwrap();
        let mut config = core.config.clone();
        config.gravity = 2.0;
        config.mass_factor = 1.5;
        core.apply_config(config).unwrap();
        let id = core.add_molecule(natrium_at(Vec3::zero()));
        let mass = core.molecule(id).unwrap().mass;

        core.update(0.01);
        let m = core.molecule(id).unwrap();
        let expected = -2.0 * mass * 1.5 * 0.01;
        assert!((m.state.momentum.z - expected).abs() < 1e-5 * mass.max(1.0));
        assert!(m.state.momentum.x.abs() < 1e-6 && m.state.momentum.y.abs() < 1e-6);
        assert!((m.vel.z + 0.02).abs() < 1e-5);
    }
}
