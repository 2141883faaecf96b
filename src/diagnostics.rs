// diagnostics.rs
// Energy and momentum bookkeeping for a running Core, with an optional
// time-averaged history that can be exported as CSV.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ultraviolet::Vec3;

use crate::simulation::Core;

/// Snapshot of the mechanical state of all molecules.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EnergySummary {
    pub translational: f32,
    pub rotational: f32,
    pub momentum: Vec3,
    pub angular_momentum: Vec3,
    /// Mean translational kinetic energy per molecule times 2/3 (unit Boltzmann constant).
    pub temperature: f32,
}

impl EnergySummary {
    pub fn kinetic(&self) -> f32 {
        self.translational + self.rotational
    }
}

/// Kinetic energies use the same effective mass as the integrator, i.e.
/// `½ P·v` and `½ L·ω`.
pub fn energy_summary(core: &Core) -> EnergySummary {
    let mut summary = EnergySummary::default();
    for molecule in &core.molecules {
        let state = &molecule.state;
        summary.translational += 0.5 * state.momentum.dot(molecule.vel);
        summary.rotational += 0.5 * state.angular_momentum.dot(molecule.angular_vel);
        summary.momentum += state.momentum;
        summary.angular_momentum += state.angular_momentum;
    }
    if !core.molecules.is_empty() {
        summary.temperature = 2.0 / 3.0 * summary.translational / core.molecules.len() as f32;
    }
    summary
}

#[derive(Clone, Debug)]
pub struct EnergyRecord {
    pub time: f32,
    pub kinetic: f32,
    pub temperature: f32,
}

/// Running window over [`energy_summary`] samples.
pub struct EnergyDiagnostics {
    window: usize,
    kinetic_history: VecDeque<f32>,
    temperature_history: VecDeque<f32>,
    pub records: Vec<EnergyRecord>,
}

impl EnergyDiagnostics {
    /// A window of 1 disables time averaging.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            kinetic_history: VecDeque::new(),
            temperature_history: VecDeque::new(),
            records: Vec::new(),
        }
    }

    pub fn update(&mut self, core: &Core) {
        let summary = energy_summary(core);
        self.kinetic_history.push_back(summary.kinetic());
        self.temperature_history.push_back(summary.temperature);
        if self.kinetic_history.len() > self.window {
            self.kinetic_history.pop_front();
        }
        if self.temperature_history.len() > self.window {
            self.temperature_history.pop_front();
        }
        let n = self.kinetic_history.len() as f32;
        self.records.push(EnergyRecord {
            time: core.time,
            kinetic: self.kinetic_history.iter().sum::<f32>() / n,
            temperature: self.temperature_history.iter().sum::<f32>() / n,
        });
    }

    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "time,kinetic,temperature")?;
        for r in &self.records {
            writeln!(writer, "{},{},{}", r.time, r.kinetic, r.temperature)?;
        }
        writer.flush()
    }
}
