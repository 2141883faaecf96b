// field/transform.rs
// Rigid placement of a level element plus the serde adapter for its rotation

use serde::{Deserialize, Serialize};
use ultraviolet::{Rotor3, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub pos: Vec3,
    #[serde(with = "rotor_serde")]
    pub rotation: Rotor3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec3::zero())
    }
}

impl Transform {
    pub fn new(pos: Vec3, rotation: Rotor3) -> Self {
        Self { pos, rotation: rotation.normalized() }
    }

    pub fn at(pos: Vec3) -> Self {
        Self { pos, rotation: Rotor3::identity() }
    }

    /// World point into the element's local frame.
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.rotation.reversed() * (world - self.pos)
    }

    /// Local direction into world space.
    pub fn dir_to_world(&self, local_dir: Vec3) -> Vec3 {
        self.rotation * local_dir
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self { pos: self.pos + offset, rotation: self.rotation }
    }
}

/// Stores a `Rotor3` as the quaternion array `[x, y, z, w]`.
pub mod rotor_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use ultraviolet::Rotor3;

    pub fn serialize<S: Serializer>(rotor: &Rotor3, serializer: S) -> Result<S::Ok, S::Error> {
        rotor.into_quaternion_array().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rotor3, D::Error> {
        let q = <[f32; 4]>::deserialize(deserializer)?;
        Ok(Rotor3::from_quaternion_array(q).normalized())
    }
}
