use itertools::iproduct;
use rayon::iter::{
    IndexedParallelIterator, IntoParallelRefIterator, IntoParallelRefMutIterator, ParallelIterator,
};

use crate::{
    agent::Agent,
    grid::FieldView,
    math::{hash_noise, wrap},
    params::SimulationParameters,
};

/// Left, center and right sector scores.
pub type SectorScores = [f32; 3];

/// Samples closer than this to the center of the agent's cell may or may not land in that cell
/// depending on the ray direction. It lies just past the circumradius of a unit cell.
const OWN_CELL_RADIUS: f32 = 0.75;

/// Sensor layout derived from one parameter snapshot. Ray directions are stored relative to the
/// agent heading, so the layout is shared by every agent in a tick.
#[derive(Debug, Clone)]
pub struct SensorGeometry {
    /// Angular offset of every ray, grouped by sector: `rays_per_sector` entries for the left
    /// sector, then the center, then the right one.
    ray_offsets: Vec<f32>,
    rays_per_sector: usize,
    /// Distances along a ray at which the field is sampled, in increasing order.
    sample_distances: Vec<f32>,
    /// How many of the leading sample distances fall within `OWN_CELL_RADIUS`.
    near_samples: usize,
    /// Heading offsets of the left and right sector midpoints.
    left_target: f32,
    right_target: f32,
}

impl SensorGeometry {
    pub fn new(params: &SimulationParameters) -> Self {
        let sensor_angle = params.sensor_angle;
        // Zero resolutions are rejected by validation; clamping here keeps the kernel itself free of
        // divisions by zero.
        let rays_per_sector = ((params.sensor_theta_resolution as f32 / 3.0).round() as usize).max(1);
        let samples = (params.sensor_length_resolution as usize).max(1);

        let start = -0.5 * sensor_angle;
        let sector_width = sensor_angle / 3.0;
        let ray_spacing = sector_width / rays_per_sector as f32;
        let ray_offsets = iproduct!(0..3, 0..rays_per_sector)
            .map(|(sector, ray)| {
                start + sector as f32 * sector_width + (ray as f32 + 0.5) * ray_spacing
            })
            .collect();

        let sample_distances: Vec<f32> = (1..=samples)
            .map(|k| params.sensor_distance * k as f32 / samples as f32)
            .collect();
        let near_samples = sample_distances
            .iter()
            .take_while(|&&d| d < OWN_CELL_RADIUS)
            .count();

        SensorGeometry {
            ray_offsets,
            rays_per_sector,
            sample_distances,
            near_samples,
            left_target: start + sensor_angle / 6.0,
            right_target: start + 5.0 * sensor_angle / 6.0,
        }
    }

    pub fn rays_per_sector(&self) -> usize {
        self.rays_per_sector
    }

    pub fn samples_per_ray(&self) -> usize {
        self.sample_distances.len()
    }

    /// Sum the field along every ray of every sector for an agent at `(x, y)` facing `angle`.
    ///
    /// Rays are cast from the center of the agent's cell. Samples within `OWN_CELL_RADIUS` of it
    /// read the agent's cell itself and every sample further out reads some other cell, so each
    /// ray sees the agent's own cell (and its fresh deposit) the same number of times.
    pub fn sense(&self, field: &FieldView<'_>, x: f32, y: f32, angle: f32) -> SectorScores {
        let (w, h) = (field.width() as f32, field.height() as f32);
        let (cx, cy) = (x.floor() + 0.5, y.floor() + 0.5);
        let own = field.intensity(cx, cy) * self.near_samples as f32;
        let far = &self.sample_distances[self.near_samples..];

        let mut scores = [0.0; 3];
        for (i, offset) in self.ray_offsets.iter().enumerate() {
            let (sin, cos) = (angle + offset).sin_cos();
            let score = &mut scores[i / self.rays_per_sector];
            *score += own;
            for d in far {
                *score += field.intensity(wrap(cx + cos * d, w), wrap(cy + sin * d, h));
            }
        }
        scores
    }

    /// Pick the heading to steer towards. Going straight wins whenever the center sector is at least
    /// as strong as both sides; otherwise the stronger side wins, with the right side taking exact
    /// ties.
    pub fn target(&self, angle: f32, [left, center, right]: SectorScores) -> f32 {
        if center >= left && center >= right {
            angle
        } else if left > right {
            angle + self.left_target
        } else {
            angle + self.right_target
        }
    }
}

/// Compute the new state of a single agent.
#[inline]
pub fn steer(
    agent: &Agent,
    field: &FieldView<'_>,
    geometry: &SensorGeometry,
    params: &SimulationParameters,
) -> Agent {
    let scores = geometry.sense(field, agent.x, agent.y, agent.angle);
    let mut target = geometry.target(agent.angle, scores);
    if params.wander_strength > 0.0 {
        target += params.wander_strength * hash_noise(agent.x, agent.y, target);
    }

    let angle = agent.angle + params.turn_speed * (target - agent.angle);
    let (sin, cos) = angle.sin_cos();
    Agent {
        x: wrap(agent.x + params.step_length * cos, field.width() as f32),
        y: wrap(agent.y + params.step_length * sin, field.height() as f32),
        angle,
    }
}

/// Sense, rotate and move every agent. `current[i]` is read and `next[i]` is written, for every i.
pub fn sense_and_steer(
    field: &FieldView<'_>,
    current: &[Agent],
    next: &mut [Agent],
    params: &SimulationParameters,
) {
    debug_assert_eq!(current.len(), next.len());
    let geometry = SensorGeometry::new(params);
    next.par_iter_mut()
        .zip(current.par_iter())
        .for_each(|(dst, agent)| *dst = steer(agent, field, &geometry, params));
}
