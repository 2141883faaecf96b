// body/molecule.rs
// Rigid-body molecule: mass properties, state and derived world-space quantities

use smallvec::SmallVec;
use ultraviolet::{Mat3, Rotor3, Vec3};

use super::atom::Atom;
use crate::error::{Error, Result};
use crate::units;

/// Integrated state of a rigid body. Everything else on [`Molecule`] is derived
/// from this and the body-frame mass properties.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoleculeState {
    pub pos: Vec3,
    pub orientation: Rotor3,
    pub momentum: Vec3,
    pub angular_momentum: Vec3,
}

impl MoleculeState {
    pub fn at_rest(pos: Vec3, orientation: Rotor3) -> Self {
        Self {
            pos,
            orientation,
            momentum: Vec3::zero(),
            angular_momentum: Vec3::zero(),
        }
    }

    pub fn is_finite(&self) -> bool {
        let q = self.orientation.into_quaternion_array();
        vec_is_finite(self.pos)
            && vec_is_finite(self.momentum)
            && vec_is_finite(self.angular_momentum)
            && q.iter().all(|c| c.is_finite())
    }
}

pub(crate) fn vec_is_finite(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

#[derive(Clone, Debug)]
pub struct Molecule {
    pub id: u64,
    /// Fixed after construction.
    pub atoms: Vec<Atom>,
    /// Atom index pairs, only used to draw bonds.
    pub bonds: SmallVec<[(usize, usize); 4]>,
    pub mass: f32,
    /// Body-frame inertia tensor about the mass center.
    pub inertia: Mat3,
    pub inertia_inv: Mat3,
    pub accumulated_charge: f32,

    pub state: MoleculeState,

    // Derived by `from_state`.
    pub rotation: Mat3,
    pub inertia_inv_world: Mat3,
    pub vel: Vec3,
    pub angular_vel: Vec3,

    // Written by the force phase of every step.
    pub force: Vec3,
    pub torque: Vec3,
}

impl Molecule {
    /// Build a molecule from atoms given in any body frame and initialize it.
    pub fn new(atoms: Vec<Atom>) -> Result<Self> {
        let mut molecule = Self {
            id: 0,
            atoms,
            bonds: SmallVec::new(),
            mass: 0.0,
            inertia: Mat3::identity(),
            inertia_inv: Mat3::identity(),
            accumulated_charge: 0.0,
            state: MoleculeState::at_rest(Vec3::zero(), Rotor3::identity()),
            rotation: Mat3::identity(),
            inertia_inv_world: Mat3::identity(),
            vel: Vec3::zero(),
            angular_vel: Vec3::zero(),
            force: Vec3::zero(),
            torque: Vec3::zero(),
        };
        molecule.init()?;
        Ok(molecule)
    }

    pub fn with_bonds(mut self, bonds: &[(usize, usize)]) -> Self {
        self.bonds = bonds.iter().copied().collect();
        self
    }

    /// Compute mass properties, move the mass center to the body origin and reset
    /// the state to rest at the origin with identity orientation.
    pub fn init(&mut self) -> Result<()> {
        if self.atoms.is_empty() {
            return Err(Error::InvalidMoleculeGeometry("molecule has no atoms".into()));
        }
        self.mass = self.atoms.iter().map(|a| a.mass).sum();
        if !(self.mass > 0.0) || !self.mass.is_finite() {
            return Err(Error::InvalidMoleculeGeometry(format!(
                "total mass {} is not positive",
                self.mass
            )));
        }

        let weighted = self
            .atoms
            .iter()
            .fold(Vec3::zero(), |acc, a| acc + a.body_pos * a.mass);
        let center = weighted / self.mass;
        for atom in &mut self.atoms {
            atom.body_pos -= center;
        }
        let residual = self.mass_center_offset();
        if !(residual.mag() < units::MASS_CENTER_TOLERANCE) {
            return Err(Error::InvalidMoleculeGeometry(format!(
                "mass center off by {} after recentering",
                residual.mag()
            )));
        }

        self.inertia = inertia_tensor(&self.atoms);
        self.inertia_inv = if self.inertia.determinant().abs() < units::DEGENERATE_INERTIA_DET {
            log::debug!("degenerate inertia tensor for {} atoms, using identity", self.atoms.len());
            Mat3::identity()
        } else {
            self.inertia.inversed()
        };
        self.accumulated_charge = self.atoms.iter().map(|a| a.charge).sum();

        self.force = Vec3::zero();
        self.torque = Vec3::zero();
        self.from_state(MoleculeState::at_rest(Vec3::zero(), Rotor3::identity()), 1.0);
        Ok(())
    }

    /// Mass-weighted sum of body positions; zero for an initialized molecule.
    pub fn mass_center_offset(&self) -> Vec3 {
        self.atoms
            .iter()
            .fold(Vec3::zero(), |acc, a| acc + a.body_pos * a.mass)
    }

    pub fn set_id(&mut self, id: u64) {
        self.id = id;
        for atom in &mut self.atoms {
            atom.parent_id = id;
        }
    }

    /// Adopt `state` and refresh every derived quantity.
    ///
    /// `mass_factor` scales effective mass and inertia; it only enters the velocity
    /// derivation, the stored momenta are left untouched.
    pub fn from_state(&mut self, state: MoleculeState, mass_factor: f32) {
        self.state = state;
        self.state.orientation.normalize();
        self.vel = self.state.momentum / (self.mass * mass_factor);
        self.rotation = self.state.orientation.into_matrix();
        self.inertia_inv_world = self.rotation * self.inertia_inv * self.rotation.transposed();
        self.angular_vel = (self.inertia_inv_world * self.state.angular_momentum) / mass_factor;
        self.update_atom_positions();
    }

    /// Set the orientation directly (editor placement) without touching inertia or momenta.
    pub fn apply_orientation(&mut self, orientation: Rotor3) {
        self.state.orientation = orientation.normalized();
        self.rotation = self.state.orientation.into_matrix();
        self.inertia_inv_world = self.rotation * self.inertia_inv * self.rotation.transposed();
        self.update_atom_positions();
    }

    /// Move and orient the molecule, leaving it at rest.
    pub fn place(&mut self, pos: Vec3, orientation: Rotor3, mass_factor: f32) {
        self.from_state(MoleculeState::at_rest(pos, orientation), mass_factor);
    }

    pub fn set_atom_charge(&mut self, index: usize, charge: f32) -> Result<()> {
        let atom = self.atoms.get_mut(index).ok_or_else(|| {
            Error::InvalidMoleculeGeometry(format!("atom index {} out of range", index))
        })?;
        atom.charge = charge;
        self.accumulated_charge = self.atoms.iter().map(|a| a.charge).sum();
        Ok(())
    }

    pub fn pos(&self) -> Vec3 {
        self.state.pos
    }

    pub fn orientation(&self) -> Rotor3 {
        self.state.orientation
    }

    /// World position of a point given in this molecule's body frame.
    pub fn to_world(&self, body_point: Vec3) -> Vec3 {
        self.rotation * body_point + self.state.pos
    }

    /// Body-frame coordinates of a world point.
    pub fn to_body(&self, world_point: Vec3) -> Vec3 {
        self.rotation.transposed() * (world_point - self.state.pos)
    }

    fn update_atom_positions(&mut self) {
        let rotation = self.rotation;
        let pos = self.state.pos;
        for atom in &mut self.atoms {
            atom.pos = rotation * atom.body_pos + pos;
        }
    }
}

/// `Σ m (r·r I − r rᵀ)` over body positions.
fn inertia_tensor(atoms: &[Atom]) -> Mat3 {
    let mut cols = [Vec3::zero(); 3];
    for atom in atoms {
        let r = atom.body_pos;
        let r_sq = r.mag_sq();
        let comps = [r.x, r.y, r.z];
        let units = [Vec3::unit_x(), Vec3::unit_y(), Vec3::unit_z()];
        for j in 0..3 {
            cols[j] += (units[j] * r_sq - r * comps[j]) * atom.mass;
        }
    }
    Mat3::new(cols[0], cols[1], cols[2])
}

/// Explicit Euler step of the orientation: `q += 0.5 (0, ω) ⊗ q · dt`.
///
/// The result is not normalized; [`Molecule::from_state`] does that.
pub fn integrate_orientation(orientation: Rotor3, angular_vel: Vec3, dt: f32) -> Rotor3 {
    let [x, y, z, w] = orientation.into_quaternion_array();
    let v = Vec3::new(x, y, z);
    let dw = -angular_vel.dot(v);
    let dv = angular_vel * w + angular_vel.cross(v);
    let h = 0.5 * dt;
    Rotor3::from_quaternion_array([
        x + dv.x * h,
        y + dv.y * h,
        z + dv.z * h,
        w + dw * h,
    ])
}
