// simulation/capture.rs
// Portal capture and molecule release, run after integration

use super::simulation::{Core, StepReport};

impl Core {
    /// Re-check portal containment for every molecule's mass center. A molecule
    /// enters at most one portal per tick; destructive portals remove it.
    pub(super) fn capture_molecules(&mut self, report: &mut StepReport) {
        if self.portals.is_empty() {
            return;
        }
        for portal in &mut self.portals {
            portal.start_update();
        }
        let mut removed = Vec::new();
        for molecule in &self.molecules {
            if let Some(portal) = self.portals.iter_mut().find(|p| p.contains(molecule.pos())) {
                portal.handle_molecule_entering();
                report.captured.push((portal.id, molecule.id));
                if portal.destroy_on_entering {
                    removed.push(molecule.id);
                }
            }
        }
        if !removed.is_empty() {
            log::debug!("portals captured molecules {:?}", removed);
            self.molecules.retain(|m| !removed.contains(&m.id));
            if self.drag.as_ref().is_some_and(|d| removed.contains(&d.molecule_id)) {
                self.drag = None;
            }
            self.external_forces.retain(|f| !removed.contains(&f.molecule_id));
        }
    }

    pub(super) fn release_molecules(&mut self, report: &mut StepReport) {
        let time = self.time;
        let mass_factor = self.config.mass_factor;
        let mut released = Vec::new();
        for releaser in self.releasers.iter_mut().filter(|r| r.is_due(time)) {
            match releaser.release(time, mass_factor) {
                Ok(molecule) => released.push(molecule),
                Err(e) => log::warn!("releaser {} failed: {}", releaser.id, e),
            }
        }
        for molecule in released {
            let id = self.insert_molecule(molecule);
            report.released.push(id);
        }
    }
}
