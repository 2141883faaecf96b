// field/barrier.rs
// Barriers: spatial fields pushing atoms away from (or along) planes and boxes

use serde::{Deserialize, Serialize};
use ultraviolet::Vec3;

use super::kernel::{wendland_2_1, Falloff};
use super::transform::Transform;
use crate::body::Molecule;
use crate::units::MIN_PAIR_DISTANCE;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BarrierKind {
    /// Half space behind `normal` (local frame).
    Plane { normal: Vec3 },
    Box { half_extent: Vec3 },
    /// Box whose repulsion is shifted by `charge * molecule charge`.
    Charged { half_extent: Vec3, charge: f32 },
    /// Pulls along local +x. Gated only by the distance along local x beyond
    /// `half_extent.x`; the y and z extents do not limit the beam.
    Tractor { half_extent: Vec3 },
    /// Box oscillating by `movement * sin(2π t / period)` around its transform.
    MovingBox { half_extent: Vec3, movement: Vec3, period: f32 },
    /// Box blowing along local +x in front of its +x face.
    Blow { half_extent: Vec3, blow_strength: f32, blow_range: f32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    pub id: u64,
    pub transform: Transform,
    pub falloff: Falloff,
    pub kind: BarrierKind,
    #[serde(default)]
    pub selected: bool,
}

/// Distance from `local` to an origin-centered box and the outward direction.
///
/// Points inside the box are at distance 0; their direction points away from the
/// center, and a point exactly at the center uses +x.
pub fn box_distance(local: Vec3, half_extent: Vec3) -> (f32, Vec3) {
    let closest = Vec3::new(
        local.x.clamp(-half_extent.x, half_extent.x),
        local.y.clamp(-half_extent.y, half_extent.y),
        local.z.clamp(-half_extent.z, half_extent.z),
    );
    let diff = local - closest;
    let distance = diff.mag();
    let dir = if distance > MIN_PAIR_DISTANCE {
        diff / distance
    } else if local.mag() > MIN_PAIR_DISTANCE {
        local.normalized()
    } else {
        Vec3::unit_x()
    };
    (distance, dir)
}

/// 1D distance along local x past the box's x extent.
fn tractor_distance(local: Vec3, half_extent: Vec3) -> f32 {
    (local.x.abs() - half_extent.x).max(0.0)
}

impl Barrier {
    pub fn new(id: u64, transform: Transform, falloff: Falloff, kind: BarrierKind) -> Self {
        Self { id, transform, falloff, kind, selected: false }
    }

    pub fn plane(id: u64, pos: Vec3, normal: Vec3, falloff: Falloff) -> Self {
        Self::new(id, Transform::at(pos), falloff, BarrierKind::Plane { normal: normal.normalized() })
    }

    pub fn cuboid(id: u64, transform: Transform, half_extent: Vec3, falloff: Falloff) -> Self {
        Self::new(id, transform, falloff, BarrierKind::Box { half_extent })
    }

    /// Transform at simulation time `time`; only moving boxes differ from the stored one.
    pub fn transform_at(&self, time: f32) -> Transform {
        match self.kind {
            BarrierKind::MovingBox { movement, period, .. } if period > 0.0 => {
                let phase = (std::f32::consts::TAU * time / period).sin();
                self.transform.translated(movement * phase)
            }
            _ => self.transform,
        }
    }

    /// Signed distance to a plane or unsigned distance to a box at `time`.
    pub fn distance(&self, point: Vec3, time: f32) -> f32 {
        let transform = self.transform_at(time);
        match self.kind {
            BarrierKind::Plane { normal } => {
                (point - transform.pos).dot(transform.dir_to_world(normal))
            }
            BarrierKind::Tractor { half_extent } => {
                tractor_distance(transform.to_local(point), half_extent)
            }
            BarrierKind::Box { half_extent }
            | BarrierKind::Charged { half_extent, .. }
            | BarrierKind::MovingBox { half_extent, .. }
            | BarrierKind::Blow { half_extent, .. } => {
                box_distance(transform.to_local(point), half_extent).0
            }
        }
    }

    /// Force on a point of an atom belonging to a molecule with `accumulated_charge`.
    pub fn calc_force_at(&self, point: Vec3, accumulated_charge: f32, time: f32) -> Vec3 {
        let transform = self.transform_at(time);
        match self.kind {
            BarrierKind::Plane { normal } => {
                let n = transform.dir_to_world(normal);
                let signed = (point - transform.pos).dot(n);
                n * self.falloff.magnitude(signed)
            }
            BarrierKind::Box { half_extent } | BarrierKind::MovingBox { half_extent, .. } => {
                let (distance, dir) = box_distance(transform.to_local(point), half_extent);
                transform.dir_to_world(dir) * self.falloff.magnitude(distance)
            }
            BarrierKind::Charged { half_extent, charge } => {
                let (distance, dir) = box_distance(transform.to_local(point), half_extent);
                let magnitude =
                    self.falloff.factor(distance) * (self.falloff.strength + charge * accumulated_charge);
                transform.dir_to_world(dir) * magnitude
            }
            BarrierKind::Tractor { half_extent } => {
                let distance = tractor_distance(transform.to_local(point), half_extent);
                transform.dir_to_world(Vec3::unit_x()) * self.falloff.magnitude(distance)
            }
            BarrierKind::Blow { half_extent, blow_strength, blow_range } => {
                let local = transform.to_local(point);
                let in_footprint = local.y.abs() <= half_extent.y && local.z.abs() <= half_extent.z;
                if in_footprint && local.x > half_extent.x && blow_range > 0.0 {
                    let r = ((local.x - half_extent.x) / blow_range).min(1.0);
                    transform.dir_to_world(Vec3::unit_x()) * (blow_strength * wendland_2_1(r))
                } else {
                    let (distance, dir) = box_distance(local, half_extent);
                    transform.dir_to_world(dir) * self.falloff.magnitude(distance)
                }
            }
        }
    }

    pub fn calc_force_on_atom(&self, molecule: &Molecule, atom_index: usize, time: f32) -> Vec3 {
        match molecule.atoms.get(atom_index) {
            Some(atom) => self.calc_force_at(atom.pos, molecule.accumulated_charge, time),
            None => Vec3::zero(),
        }
    }

    /// Sum of the per-atom forces.
    pub fn calc_force_on_molecule(&self, molecule: &Molecule, time: f32) -> Vec3 {
        molecule.atoms.iter().fold(Vec3::zero(), |acc, atom| {
            acc + self.calc_force_at(atom.pos, molecule.accumulated_charge, time)
        })
    }
}
