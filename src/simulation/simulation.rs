// simulation/simulation.rs
// Contains the Core struct: level element storage and the fixed-step update loop

use rand::rngs::StdRng;
use rand::SeedableRng;
use ultraviolet::Vec3;

use super::external::{DragForce, ExternalForce};
use super::forces;
use super::indicators::{self, ForceIndicator};
use crate::atomic_force::AtomicForce;
use crate::body::{Molecule, MoleculeState};
use crate::config::{self, ForceLawConfig, SimConfig};
use crate::error::{Error, Result};
use crate::field::{Barrier, BrownianElement, EndCondition, Falloff, MoleculeReleaser, Portal};
use crate::profile_scope;

/// What happened during one [`Core::update`] besides ordinary motion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Molecules whose integration produced non-finite state and were reset.
    pub diverged: Vec<u64>,
    /// (portal id, molecule id) for every capture this tick.
    pub captured: Vec<(u64, u64)>,
    /// Ids of molecules emitted by releasers.
    pub released: Vec<u64>,
}

/// The simulation state and logic for one level.
pub struct Core {
    /// Simulated seconds since the level started.
    pub time: f32,
    pub frame: u64,
    pub molecules: Vec<Molecule>,
    pub atomic_force: AtomicForce,
    pub barriers: Vec<Barrier>,
    pub portals: Vec<Portal>,
    pub brownians: Vec<BrownianElement>,
    pub releasers: Vec<MoleculeReleaser>,
    pub external_forces: Vec<ExternalForce>,
    pub drag: Option<DragForce>,
    /// Probe samples from the last tick; empty unless indicators are enabled.
    pub force_indicators: Vec<ForceIndicator>,
    pub config: SimConfig,
    /// Placement restored by [`Core::reset_level`]. Editing the level drops it; it
    /// is retaken at the start of the next update.
    level_start: Option<LevelStart>,
    game_field: Vec<u64>,
    rng: StdRng,
    next_id: u64,
}

#[derive(Clone)]
struct LevelStart {
    molecules: Vec<Molecule>,
    external_forces: Vec<ExternalForce>,
}

impl Default for Core {
    fn default() -> Self {
        Self::new()
    }
}

impl Core {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Core whose fluctuation draws are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            time: 0.0,
            frame: 0,
            molecules: Vec::new(),
            atomic_force: AtomicForce::default(),
            barriers: Vec::new(),
            portals: Vec::new(),
            brownians: Vec::new(),
            releasers: Vec::new(),
            external_forces: Vec::new(),
            drag: None,
            force_indicators: Vec::new(),
            config: SimConfig::default(),
            level_start: None,
            game_field: Vec::new(),
            rng,
            next_id: 1,
        }
    }

    pub fn set_rng(&mut self, rng: StdRng) {
        self.rng = rng;
    }

    fn id_in_use(&self, id: u64) -> bool {
        self.molecules.iter().any(|m| m.id == id)
            || self.barriers.iter().any(|b| b.id == id)
            || self.portals.iter().any(|p| p.id == id)
            || self.brownians.iter().any(|b| b.id == id)
            || self.releasers.iter().any(|r| r.id == id)
    }

    /// Keep `requested` when it is non-zero and free, otherwise hand out a fresh id.
    fn claim_id(&mut self, requested: u64) -> u64 {
        let id = if requested != 0 && !self.id_in_use(requested) {
            requested
        } else {
            while self.id_in_use(self.next_id) {
                self.next_id += 1;
            }
            self.next_id
        };
        self.next_id = self.next_id.max(id + 1);
        id
    }

    /// Take ownership of `molecule`, returning the id it is stored under. This is
    /// a level edit: the next update records a new level start.
    pub fn add_molecule(&mut self, molecule: Molecule) -> u64 {
        let id = self.insert_molecule(molecule);
        self.level_start = None;
        id
    }

    /// Store a molecule produced by the running level (releasers) without
    /// touching the level start.
    pub(super) fn insert_molecule(&mut self, mut molecule: Molecule) -> u64 {
        let id = self.claim_id(molecule.id);
        molecule.set_id(id);
        molecule.from_state(molecule.state, self.config.mass_factor);
        self.molecules.push(molecule);
        id
    }

    pub fn add_barrier(&mut self, mut barrier: Barrier) -> u64 {
        barrier.id = self.claim_id(barrier.id);
        let id = barrier.id;
        self.barriers.push(barrier);
        id
    }

    pub fn add_portal(&mut self, mut portal: Portal) -> u64 {
        portal.id = self.claim_id(portal.id);
        let id = portal.id;
        self.portals.push(portal);
        id
    }

    pub fn add_brownian(&mut self, mut brownian: BrownianElement) -> u64 {
        brownian.id = self.claim_id(brownian.id);
        let id = brownian.id;
        self.brownians.push(brownian);
        id
    }

    pub fn add_releaser(&mut self, mut releaser: MoleculeReleaser) -> u64 {
        releaser.id = self.claim_id(releaser.id);
        let id = releaser.id;
        self.releasers.push(releaser);
        id
    }

    pub fn molecule(&self, id: u64) -> Option<&Molecule> {
        self.molecules.iter().find(|m| m.id == id)
    }

    pub fn molecule_mut(&mut self, id: u64) -> Option<&mut Molecule> {
        self.molecules.iter_mut().find(|m| m.id == id)
    }

    /// Remove the molecule or field element with `id`.
    pub fn delete_level_element(&mut self, id: u64) -> Result<()> {
        let before = self.element_count();
        self.molecules.retain(|m| m.id != id);
        self.barriers.retain(|b| b.id != id);
        self.portals.retain(|p| p.id != id);
        self.brownians.retain(|b| b.id != id);
        self.releasers.retain(|r| r.id != id);
        if self.element_count() == before {
            return Err(Error::UnknownElement(id));
        }
        self.external_forces.retain(|f| f.molecule_id != id);
        self.level_start = None;
        if self.drag.as_ref().is_some_and(|d| d.molecule_id == id) {
            self.drag = None;
        }
        self.game_field.retain(|&g| g != id);
        log::debug!("deleted level element {}", id);
        Ok(())
    }

    fn element_count(&self) -> usize {
        self.molecules.len()
            + self.barriers.len()
            + self.portals.len()
            + self.brownians.len()
            + self.releasers.len()
    }

    /// Drop every molecule, field element and external force. Configuration and the
    /// active force law are kept.
    pub fn clear(&mut self) {
        self.molecules.clear();
        self.barriers.clear();
        self.portals.clear();
        self.brownians.clear();
        self.releasers.clear();
        self.external_forces.clear();
        self.drag = None;
        self.force_indicators.clear();
        self.game_field.clear();
        self.level_start = None;
        self.time = 0.0;
        self.frame = 0;
        self.next_id = 1;
    }

    /// Bound the field with six inward-facing plane barriers, replacing any
    /// previously installed bounds. Returns the new barrier ids.
    pub fn set_game_field(&mut self, half_extent: [f32; 3]) -> Vec<u64> {
        let old = std::mem::take(&mut self.game_field);
        self.barriers.retain(|b| !old.contains(&b.id));

        let falloff = Falloff::new(config::GAME_FIELD_WALL_STRENGTH, config::GAME_FIELD_WALL_RADIUS);
        let axes = [Vec3::unit_x(), Vec3::unit_y(), Vec3::unit_z()];
        let mut ids = Vec::with_capacity(6);
        for (axis, &h) in axes.iter().zip(half_extent.iter()) {
            for sign in [1.0f32, -1.0] {
                let pos = *axis * (h * sign);
                let normal = *axis * -sign;
                ids.push(self.add_barrier(Barrier::plane(0, pos, normal, falloff)));
            }
        }
        self.config.game_field_half_extent = half_extent;
        self.game_field = ids.clone();
        ids
    }

    /// Ids of the barriers installed by [`Core::set_game_field`].
    pub fn game_field(&self) -> &[u64] {
        &self.game_field
    }

    /// Treat the existing barriers with `ids` as the game field walls, e.g. after
    /// loading a level. Unknown ids are ignored.
    pub fn adopt_game_field(&mut self, ids: &[u64]) {
        let walls: Vec<u64> = ids
            .iter()
            .copied()
            .filter(|id| self.barriers.iter().any(|b| b.id == *id))
            .collect();
        self.game_field = walls;
    }

    /// Install or replace the player's drag force.
    pub fn set_drag_force(&mut self, molecule_id: u64, origin: Vec3, force: Vec3, plane_normal: Vec3, end_time: f32) -> Result<()> {
        let molecule = self.molecule(molecule_id).ok_or(Error::UnknownMolecule(molecule_id))?;
        self.drag = Some(DragForce::new(molecule, origin, force, plane_normal, end_time));
        Ok(())
    }

    pub fn clear_drag(&mut self) {
        self.drag = None;
    }

    pub fn add_external_force(&mut self, force: ExternalForce) -> Result<()> {
        if self.molecule(force.molecule_id).is_none() {
            return Err(Error::UnknownMolecule(force.molecule_id));
        }
        self.external_forces.push(force);
        self.level_start = None;
        Ok(())
    }

    /// Switch the active force law. An invalid configuration leaves the current law.
    pub fn apply_force_law(&mut self, law: &ForceLawConfig) -> Result<()> {
        match AtomicForce::from_config(law) {
            Ok(force) => {
                log::info!("atomic force set to {} {:?}", force.name(), force.parameters());
                self.atomic_force = force;
                Ok(())
            }
            Err(e) => {
                log::warn!("rejected force law '{}': {}", law.kind, e);
                Err(e)
            }
        }
    }

    /// Replace the simulation configuration. An invalid configuration leaves the current one.
    pub fn apply_config(&mut self, config: SimConfig) -> Result<()> {
        if let Err(e) = config.validate() {
            log::warn!("rejected simulation config: {}", e);
            return Err(e);
        }
        let refresh = config.mass_factor != self.config.mass_factor;
        self.config = config;
        if refresh {
            let mass_factor = self.config.mass_factor;
            for molecule in &mut self.molecules {
                molecule.from_state(molecule.state, mass_factor);
            }
        }
        Ok(())
    }

    fn snapshot(&self) -> LevelStart {
        LevelStart {
            molecules: self.molecules.clone(),
            external_forces: self.external_forces.clone(),
        }
    }

    /// Remember the current placement so [`Core::reset_level`] can restore it.
    pub fn begin_level(&mut self) {
        self.level_start = Some(self.snapshot());
        self.time = 0.0;
        self.frame = 0;
    }

    /// Rewind to the recorded level start. Without a recorded start nothing has
    /// run since the last edit, so the molecules already are in place.
    pub fn reset_level(&mut self) {
        let mass_factor = self.config.mass_factor;
        if let Some(start) = self.level_start.clone() {
            self.molecules = start.molecules;
            self.external_forces = start.external_forces;
        }
        // Molecules restart at rest even when the start was taken mid-run.
        for molecule in &mut self.molecules {
            let state = molecule.state;
            molecule.apply_orientation(state.orientation);
            molecule.from_state(MoleculeState::at_rest(state.pos, state.orientation), mass_factor);
        }
        self.drag = None;
        for portal in &mut self.portals {
            portal.reset();
        }
        for releaser in &mut self.releasers {
            releaser.reset();
        }
        self.force_indicators.clear();
        self.time = 0.0;
        self.frame = 0;
        log::info!("level reset with {} molecules", self.molecules.len());
    }

    /// True once every portal is satisfied. A level without portals never finishes.
    pub fn level_finished(&self) -> bool {
        !self.portals.is_empty()
            && self.portals.iter().all(|p| p.end_condition() == EndCondition::Finished)
    }

    pub fn score(&self) -> f32 {
        self.portals.iter().map(Portal::score).sum()
    }

    /// One tick with the configured time step.
    pub fn step(&mut self) -> StepReport {
        self.update(self.config.time_step)
    }

    /// Advance the simulation by `time_step`.
    ///
    /// Every load is computed from the state at the start of the tick before any
    /// molecule is moved.
    pub fn update(&mut self, time_step: f32) -> StepReport {
        profile_scope!("core_update");
        let mut report = StepReport::default();
        if self.level_start.is_none() {
            self.level_start = Some(self.snapshot());
        }
        self.time += time_step;

        let fluctuations = forces::draw_fluctuations(
            &mut self.rng,
            self.molecules.len(),
            self.config.translation_fluctuation,
            self.config.rotation_fluctuation,
        );
        let loads = forces::compute_all(self, &fluctuations);

        let time = self.time;
        self.external_forces.retain(|f| f.is_active(time));
        if self.drag.as_ref().is_some_and(|d| !d.is_active(time)) {
            self.drag = None;
        }

        if self.config.show_force_indicators {
            self.force_indicators = indicators::sample(self);
        } else if !self.force_indicators.is_empty() {
            self.force_indicators.clear();
        }

        self.integrate(&loads, time_step, &mut report);
        self.capture_molecules(&mut report);
        self.release_molecules(&mut report);

        self.frame += 1;
        if !report.diverged.is_empty() || !report.captured.is_empty() {
            log::debug!(
                "frame {}: {} diverged, {} captured, {} released",
                self.frame,
                report.diverged.len(),
                report.captured.len(),
                report.released.len()
            );
        }
        report
    }
}
