//! Game unit definitions.
//!
//! Base units:
//! - Length: one game-field unit (roughly one angstrom)
//! - Time: one simulation tick second
//! - Charge: elementary charge (e)
//! - Mass: molar weight (g/mol) divided by [`MOLAR_MASS_SCALE`]

/// Avogadro-like divisor turning a molar weight into a game mass.
pub const MOLAR_MASS_SCALE: f32 = 6.022;

/// Elementary charge in game units.
pub const ELEMENTARY_CHARGE: f32 = 1.0;

/// Below this atom-atom distance pairwise forces vanish.
pub const MIN_PAIR_DISTANCE: f32 = 1e-5;

/// Tolerance for the mass-center check after molecule initialization.
pub const MASS_CENTER_TOLERANCE: f32 = 1e-4;

/// Inertia tensors with |det| below this are treated as degenerate.
pub const DEGENERATE_INERTIA_DET: f32 = 1e-6;

/// Convert a molar weight (g/mol) into a game mass.
pub fn molar_weight_to_mass(molar_weight: f32) -> f32 {
    molar_weight / MOLAR_MASS_SCALE
}
