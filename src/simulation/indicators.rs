// simulation/indicators.rs
// Force indicator probe grid (debug visualization only, never integrated)

use ultraviolet::Vec3;

use super::simulation::Core;
use crate::body::create_charge;
use crate::config::FORCE_INDICATOR_RESOLUTION_MAX;
use crate::profile_scope;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceIndicator {
    pub pos: Vec3,
    pub force: Vec3,
}

/// Cell-centered probe positions spanning the game field. The resolution is
/// clamped to `1..=FORCE_INDICATOR_RESOLUTION_MAX` per axis.
pub fn probe_grid(half_extent: [f32; 3], resolution: usize) -> Vec<Vec3> {
    let n = resolution.clamp(1, FORCE_INDICATOR_RESOLUTION_MAX);
    let axis = |h: f32, i: usize| -h + (i as f32 + 0.5) * (2.0 * h / n as f32);
    let capacity = n.checked_mul(n).and_then(|nn| nn.checked_mul(n)).unwrap_or(0);
    let mut points = Vec::with_capacity(capacity);
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                points.push(Vec3::new(
                    axis(half_extent[0], i),
                    axis(half_extent[1], j),
                    axis(half_extent[2], k),
                ));
            }
        }
    }
    points
}

/// Force on a unit point charge at every probe from atoms and barriers.
pub fn sample(core: &Core) -> Vec<ForceIndicator> {
    profile_scope!("force_indicators");
    probe_grid(core.config.game_field_half_extent, core.config.force_indicator_resolution)
        .into_iter()
        .map(|pos| {
            let mut probe = create_charge(pos, 1.0);
            probe.pos = pos;
            let mut force = Vec3::zero();
            for molecule in &core.molecules {
                for atom in &molecule.atoms {
                    force += core.atomic_force.calc_force_between_atoms(&probe, atom);
                }
            }
            for barrier in &core.barriers {
                force += barrier.calc_force_at(pos, probe.charge, core.time);
            }
            ForceIndicator { pos, force }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_clamped_to_the_maximum_resolution() {
        let max = FORCE_INDICATOR_RESOLUTION_MAX;
        assert_eq!(probe_grid([1.0, 1.0, 1.0], 3_000_000).len(), max * max * max);
        assert_eq!(probe_grid([1.0, 1.0, 1.0], usize::MAX).len(), max * max * max);
        assert_eq!(probe_grid([1.0, 1.0, 1.0], 0).len(), 1);
    }

    #[test]
    fn grid_points_are_cell_centers() {
        let points = probe_grid([2.0, 4.0, 1.0], 2);
        assert_eq!(points.len(), 8);
        assert_eq!(points[0], Vec3::new(-1.0, -2.0, -0.5));
        assert_eq!(points[7], Vec3::new(1.0, 2.0, 0.5));
    }
}
