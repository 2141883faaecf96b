//! Pairwise force laws between atoms.
//!
//! Exactly one [`AtomicForce`] is active in a [`Core`](crate::simulation::Core). The
//! scalar law is evaluated at the atom distance and applied along the line between
//! the atoms, so every variant obeys Newton's third law.

use ultraviolet::Vec3;

use crate::body::Atom;
use crate::config::ForceLawConfig;
use crate::error::{Error, Result};
use crate::field::kernel::wendland_2_1;
use crate::parameter::{self, ParameterSet, ParameterSpec};
use crate::units::MIN_PAIR_DISTANCE;

pub const NULL_PARAMETERS: &[ParameterSpec] = &[];

pub const COULOMB_PARAMETERS: &[ParameterSpec] =
    &[ParameterSpec::new("strength", 1.0, 0.0, 1000.0)];

pub const WENDLAND_PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec::new("strength", 1.0, 0.0, 1000.0),
    ParameterSpec::new("radius", 4.0, 0.01, 100.0),
];

pub const LENNARD_JONES_PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec::new("strength", 0.1, 0.0, 100.0),
    ParameterSpec::new("radius_factor", 0.5, 0.01, 10.0),
];

/// Names accepted by [`AtomicForce::from_config`].
pub const FORCE_LAW_NAMES: [&str; 4] = ["null", "coulomb", "wendland", "lennard_jones"];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AtomicForce {
    /// No inter-atomic forces.
    Null,
    /// `strength * q0 * q1 / d²`
    Coulomb { strength: f32 },
    /// `q0 * q1 * strength * wendland(d / radius)`
    Wendland { strength: f32, radius: f32 },
    /// `4 * strength * (s¹² - s⁶)` with `s = (r0 + r1) * radius_factor / d`.
    LennardJones { strength: f32, radius_factor: f32 },
}

impl Default for AtomicForce {
    fn default() -> Self {
        AtomicForce::coulomb(1.0)
    }
}

impl AtomicForce {
    pub fn null() -> Self {
        AtomicForce::Null
    }

    pub fn coulomb(strength: f32) -> Self {
        AtomicForce::Coulomb { strength }
    }

    pub fn wendland(strength: f32, radius: f32) -> Self {
        AtomicForce::Wendland { strength, radius }
    }

    pub fn lennard_jones(strength: f32, radius_factor: f32) -> Self {
        AtomicForce::LennardJones { strength, radius_factor }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AtomicForce::Null => "null",
            AtomicForce::Coulomb { .. } => "coulomb",
            AtomicForce::Wendland { .. } => "wendland",
            AtomicForce::LennardJones { .. } => "lennard_jones",
        }
    }

    /// Parameter schema for a force law name.
    pub fn schema(name: &str) -> Option<&'static [ParameterSpec]> {
        match name {
            "null" => Some(NULL_PARAMETERS),
            "coulomb" => Some(COULOMB_PARAMETERS),
            "wendland" => Some(WENDLAND_PARAMETERS),
            "lennard_jones" => Some(LENNARD_JONES_PARAMETERS),
            _ => None,
        }
    }

    /// Build a force law from an editor/level configuration.
    pub fn from_config(config: &ForceLawConfig) -> Result<Self> {
        let schema = Self::schema(&config.kind)
            .ok_or_else(|| Error::config(format!("unknown force law '{}'", config.kind)))?;
        let v = parameter::resolve(schema, &config.params)?;
        Ok(match config.kind.as_str() {
            "null" => AtomicForce::Null,
            "coulomb" => AtomicForce::coulomb(v[0]),
            "wendland" => AtomicForce::wendland(v[0], v[1]),
            _ => AtomicForce::lennard_jones(v[0], v[1]),
        })
    }

    /// Current values as a [`ParameterSet`], e.g. for the editor or persistence.
    pub fn parameters(&self) -> ParameterSet {
        let mut set = ParameterSet::new();
        match *self {
            AtomicForce::Null => {}
            AtomicForce::Coulomb { strength } => {
                set.insert("strength".into(), strength);
            }
            AtomicForce::Wendland { strength, radius } => {
                set.insert("strength".into(), strength);
                set.insert("radius".into(), radius);
            }
            AtomicForce::LennardJones { strength, radius_factor } => {
                set.insert("strength".into(), strength);
                set.insert("radius_factor".into(), radius_factor);
            }
        }
        set
    }

    pub fn to_config(&self) -> ForceLawConfig {
        ForceLawConfig { kind: self.name().to_string(), params: self.parameters() }
    }

    /// Scalar law; positive values push the atoms apart.
    pub fn calc_force(&self, distance: f32, a0: &Atom, a1: &Atom) -> f32 {
        match *self {
            AtomicForce::Null => 0.0,
            AtomicForce::Coulomb { strength } => {
                strength * a0.charge * a1.charge / (distance * distance)
            }
            AtomicForce::Wendland { strength, radius } => {
                a0.charge * a1.charge * strength * wendland_2_1(distance / radius).max(0.0)
            }
            AtomicForce::LennardJones { strength, radius_factor } => {
                if a0.is_charge_marker() || a1.is_charge_marker() {
                    return 0.0;
                }
                let sigma = (a0.radius + a1.radius) * radius_factor;
                let s = sigma / distance;
                let s6 = s * s * s * s * s * s;
                4.0 * strength * (s6 * s6 - s6)
            }
        }
    }

    /// Force exerted by `a1` on `a0`. Zero when the atoms (nearly) coincide.
    pub fn calc_force_between_atoms(&self, a0: &Atom, a1: &Atom) -> Vec3 {
        let delta = a0.pos - a1.pos;
        let distance = delta.mag();
        if distance < MIN_PAIR_DISTANCE {
            return Vec3::zero();
        }
        let distance = distance.max(MIN_PAIR_DISTANCE);
        delta / distance * self.calc_force(distance, a0, a1)
    }
}

/// Plain Coulomb force on charge `q0` at `pos0` from `q1` at `pos1`.
pub fn coulomb_force(pos0: Vec3, q0: f32, pos1: Vec3, q1: f32, strength: f32) -> Vec3 {
    let delta = pos0 - pos1;
    let distance = delta.mag();
    if distance < MIN_PAIR_DISTANCE {
        return Vec3::zero();
    }
    delta / distance * (strength * q0 * q1 / (distance * distance))
}
