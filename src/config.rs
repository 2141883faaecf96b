// Centralized configuration for simulation parameters

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parameter::ParameterSpec;

// ====================
// Timing
// ====================
/// Default fixed physics tick in simulated seconds.
pub const DEFAULT_TIME_STEP: f32 = 0.01;

// ====================
// Damping / Fluctuation
// ====================
pub const TRANSLATION_DAMPING: f32 = 0.3;
pub const ROTATION_DAMPING: f32 = 0.3;
/// Magnitude of the random force added every step.
pub const TRANSLATION_FLUCTUATION: f32 = 0.5;
/// Magnitude of the random torque added every step.
pub const ROTATION_FLUCTUATION: f32 = 0.1;

// ====================
// Mass / Gravity
// ====================
/// Global multiplier on effective mass and inertia.
pub const MASS_FACTOR: f32 = 1.0;
pub const GRAVITY: f32 = 0.0;

// ====================
// Whole-body Van der Waals term
// ====================
/// Radius assigned to every molecule for the coarse center-to-center term.
pub const MOLECULE_VDW_RADIUS: f32 = 0.5;
pub const MOLECULE_VDW_STRENGTH: f32 = 0.1;
/// Cap on sigma/distance so overlapping molecules stay finite.
pub const MOLECULE_VDW_MAX_RATIO: f32 = 2.0;

// ====================
// Force indicators
// ====================
pub const SHOW_FORCE_INDICATORS: bool = false;
/// Probe points per axis of the indicator grid.
pub const FORCE_INDICATOR_RESOLUTION: usize = 6;
pub const FORCE_INDICATOR_RESOLUTION_MIN: usize = 2;
pub const FORCE_INDICATOR_RESOLUTION_MAX: usize = 64;

// ====================
// Game field
// ====================
/// Half extents of the default game field box.
pub const GAME_FIELD_HALF_EXTENT: [f32; 3] = [20.0, 20.0, 10.0];
pub const GAME_FIELD_WALL_STRENGTH: f32 = 50.0;
pub const GAME_FIELD_WALL_RADIUS: f32 = 1.0;

/// Bounds used by the editor and by [`SimConfig::validate`].
pub const SIM_PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec::new("translation_damping", TRANSLATION_DAMPING, 0.0, 100.0),
    ParameterSpec::new("rotation_damping", ROTATION_DAMPING, 0.0, 100.0),
    ParameterSpec::new("translation_fluctuation", TRANSLATION_FLUCTUATION, 0.0, 100.0),
    ParameterSpec::new("rotation_fluctuation", ROTATION_FLUCTUATION, 0.0, 100.0),
    ParameterSpec::new("mass_factor", MASS_FACTOR, 0.01, 100.0),
    ParameterSpec::new("gravity", GRAVITY, -100.0, 100.0),
    ParameterSpec::new("molecule_vdw_strength", MOLECULE_VDW_STRENGTH, 0.0, 100.0),
    ParameterSpec::new("molecule_vdw_radius", MOLECULE_VDW_RADIUS, 0.01, 10.0),
    ParameterSpec::new("time_step", DEFAULT_TIME_STEP, 1e-4, 0.1),
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub translation_damping: f32,
    pub rotation_damping: f32,
    pub translation_fluctuation: f32,
    pub rotation_fluctuation: f32,
    pub mass_factor: f32,
    /// Acceleration along -z.
    pub gravity: f32,
    pub molecule_vdw_strength: f32,
    pub molecule_vdw_radius: f32,
    pub time_step: f32,
    pub show_force_indicators: bool,
    pub force_indicator_resolution: usize,
    pub game_field_half_extent: [f32; 3],
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            translation_damping: TRANSLATION_DAMPING,
            rotation_damping: ROTATION_DAMPING,
            translation_fluctuation: TRANSLATION_FLUCTUATION,
            rotation_fluctuation: ROTATION_FLUCTUATION,
            mass_factor: MASS_FACTOR,
            gravity: GRAVITY,
            molecule_vdw_strength: MOLECULE_VDW_STRENGTH,
            molecule_vdw_radius: MOLECULE_VDW_RADIUS,
            time_step: DEFAULT_TIME_STEP,
            show_force_indicators: SHOW_FORCE_INDICATORS,
            force_indicator_resolution: FORCE_INDICATOR_RESOLUTION,
            game_field_half_extent: GAME_FIELD_HALF_EXTENT,
        }
    }
}

impl SimConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn scalars(&self) -> [(&'static str, f32); 9] {
        [
            ("translation_damping", self.translation_damping),
            ("rotation_damping", self.rotation_damping),
            ("translation_fluctuation", self.translation_fluctuation),
            ("rotation_fluctuation", self.rotation_fluctuation),
            ("mass_factor", self.mass_factor),
            ("gravity", self.gravity),
            ("molecule_vdw_strength", self.molecule_vdw_strength),
            ("molecule_vdw_radius", self.molecule_vdw_radius),
            ("time_step", self.time_step),
        ]
    }

    /// Check every scalar against [`SIM_PARAMETERS`].
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.scalars() {
            let spec = SIM_PARAMETERS
                .iter()
                .find(|spec| spec.name == name)
                .ok_or_else(|| Error::config(format!("no bounds for '{}'", name)))?;
            spec.check(value)?;
        }
        let resolution = FORCE_INDICATOR_RESOLUTION_MIN..=FORCE_INDICATOR_RESOLUTION_MAX;
        if !resolution.contains(&self.force_indicator_resolution) {
            return Err(Error::config(format!(
                "force_indicator_resolution {} outside [{}, {}]",
                self.force_indicator_resolution, FORCE_INDICATOR_RESOLUTION_MIN, FORCE_INDICATOR_RESOLUTION_MAX
            )));
        }
        if self.game_field_half_extent.iter().any(|e| !e.is_finite() || *e <= 0.0) {
            return Err(Error::config("game field extents must be positive"));
        }
        Ok(())
    }

    /// Disable every stochastic and dissipative term. Used by deterministic scenarios.
    pub fn without_noise_and_damping(mut self) -> Self {
        self.translation_damping = 0.0;
        self.rotation_damping = 0.0;
        self.translation_fluctuation = 0.0;
        self.rotation_fluctuation = 0.0;
        self
    }
}

/// Runtime selection of the active atomic force law.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForceLawConfig {
    pub kind: String,
    #[serde(default)]
    pub params: BTreeMap<String, f32>,
}

impl ForceLawConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), params: BTreeMap::new() }
    }

    pub fn with(mut self, name: &str, value: f32) -> Self {
        self.params.insert(name.to_string(), value);
        self
    }
}

impl Default for ForceLawConfig {
    fn default() -> Self {
        Self::new("coulomb")
    }
}
