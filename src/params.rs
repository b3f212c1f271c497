use std::sync::{Arc, PoisonError, RwLock};

use log::debug;
use rand::Rng;

use crate::error::ConfigurationError;

/// Per-channel intensity triple used both for field cells and for the deposition colour.
pub type Color = [f32; 3];

/// Tunable coefficients of the model. The engine reads one immutable snapshot of these per tick,
/// so every agent in a tick sees the same sensor geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    /// Total width of the sensing cone, in radians.
    pub sensor_angle: f32,
    /// Length of every sensor ray.
    pub sensor_distance: f32,
    /// Total number of sensor rays, spread over the three sectors.
    pub sensor_theta_resolution: u32,
    /// Number of samples taken along each sensor ray.
    pub sensor_length_resolution: u32,
    /// Fraction of the way towards the target heading an agent turns per tick. 0 never turns, 1
    /// snaps immediately.
    pub turn_speed: f32,
    /// Bound on the random offset added to the target heading, in radians.
    pub wander_strength: f32,
    /// Per-tick decay, as a fraction of the deposition colour.
    pub evaporation_rate: f32,
    /// Amount each agent adds to its cell per tick.
    pub deposition_color: Color,
    /// Distance travelled per tick.
    pub step_length: f32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            sensor_angle: 60.0_f32.to_radians(),
            sensor_distance: 3.0,
            sensor_theta_resolution: 5,
            sensor_length_resolution: 5,
            turn_speed: 1.0,
            wander_strength: 0.0,
            evaporation_rate: 0.03,
            deposition_color: [0.4, 0.4, 0.5],
            step_length: 1.0,
        }
    }
}

impl SimulationParameters {
    pub const SENSOR_ANGLE_MIN: f32 = 0.0;
    pub const SENSOR_ANGLE_MAX: f32 = 360.0;
    pub const SENSOR_DISTANCE_MIN: f32 = 0.0;
    pub const SENSOR_DISTANCE_MAX: f32 = 15.0;
    pub const RESOLUTION_MIN: u32 = 1;
    pub const RESOLUTION_MAX: u32 = 10;
    pub const TURN_SPEED_MIN: f32 = 0.0;
    pub const TURN_SPEED_MAX: f32 = 1.0;
    pub const WANDER_STRENGTH_MIN: f32 = 0.0;
    pub const WANDER_STRENGTH_MAX: f32 = 0.5;
    pub const EVAPORATION_RATE_MIN: f32 = 0.0;
    pub const EVAPORATION_RATE_MAX: f32 = 0.1;
    pub const COLOR_MIN: f32 = 0.0;
    pub const COLOR_MAX: f32 = 1.0;

    /// Construct a random configuration. Angles are drawn in degrees, like on a control panel, and
    /// converted to radians.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        SimulationParameters {
            sensor_angle: rng
                .gen_range(Self::SENSOR_ANGLE_MIN..=Self::SENSOR_ANGLE_MAX)
                .to_radians(),
            sensor_distance: rng.gen_range(Self::SENSOR_DISTANCE_MIN..=Self::SENSOR_DISTANCE_MAX),
            sensor_theta_resolution: rng.gen_range(Self::RESOLUTION_MIN..=Self::RESOLUTION_MAX),
            sensor_length_resolution: rng.gen_range(Self::RESOLUTION_MIN..=Self::RESOLUTION_MAX),
            turn_speed: rng.gen_range(Self::TURN_SPEED_MIN..=Self::TURN_SPEED_MAX),
            wander_strength: rng.gen_range(Self::WANDER_STRENGTH_MIN..=Self::WANDER_STRENGTH_MAX),
            evaporation_rate: rng.gen_range(Self::EVAPORATION_RATE_MIN..=Self::EVAPORATION_RATE_MAX),
            deposition_color: [
                rng.gen_range(Self::COLOR_MIN..=Self::COLOR_MAX),
                rng.gen_range(Self::COLOR_MIN..=Self::COLOR_MAX),
                rng.gen_range(Self::COLOR_MIN..=Self::COLOR_MAX),
            ],
            step_length: 1.0,
        }
    }

    /// Per-channel amount subtracted from every cell each tick.
    pub fn evaporation(&self) -> Color {
        let [r, g, b] = self.deposition_color;
        let rate = self.evaporation_rate;
        [r * rate, g * rate, b * rate]
    }

    /// Check that the snapshot can be simulated. Only finiteness and sign are enforced; the
    /// `*_MIN`/`*_MAX` constants describe useful ranges, not hard limits.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        non_negative("sensor_angle", self.sensor_angle)?;
        non_negative("sensor_distance", self.sensor_distance)?;
        non_negative("wander_strength", self.wander_strength)?;
        non_negative("evaporation_rate", self.evaporation_rate)?;
        non_negative("step_length", self.step_length)?;
        for &c in self.deposition_color.iter() {
            non_negative("deposition_color", c)?;
        }
        if !(Self::TURN_SPEED_MIN..=Self::TURN_SPEED_MAX).contains(&self.turn_speed) {
            return Err(ConfigurationError::OutOfRange {
                name: "turn_speed",
                value: self.turn_speed,
            });
        }
        if self.sensor_theta_resolution == 0 {
            return Err(ConfigurationError::ZeroResolution("sensor_theta_resolution"));
        }
        if self.sensor_length_resolution == 0 {
            return Err(ConfigurationError::ZeroResolution("sensor_length_resolution"));
        }
        Ok(())
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigurationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::OutOfRange { name, value })
    }
}

/// Shared, hot-swappable home of the current parameters. Cloning the store yields another handle to
/// the same values. Writers replace the whole snapshot at once, so a reader never observes a
/// half-updated set.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    inner: Arc<RwLock<SimulationParameters>>,
}

impl ParameterStore {
    pub fn new(params: SimulationParameters) -> Result<Self, ConfigurationError> {
        params.validate()?;
        Ok(ParameterStore {
            inner: Arc::new(RwLock::new(params)),
        })
    }

    /// Copy out the current values.
    pub fn snapshot(&self) -> SimulationParameters {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the stored values. Invalid values are rejected and the previous ones are kept.
    pub fn set(&self, params: SimulationParameters) -> Result<(), ConfigurationError> {
        params.validate()?;
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = params;
        debug!("Parameters replaced: {:?}", params);
        Ok(())
    }

    /// Apply an edit to a copy of the current values and store it if it is valid.
    pub fn update<F>(&self, edit: F) -> Result<(), ConfigurationError>
    where
        F: FnOnce(&mut SimulationParameters),
    {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let mut params = *guard;
        edit(&mut params);
        params.validate()?;
        *guard = params;
        debug!("Parameters updated: {:?}", params);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn test_defaults_are_valid() {
        let params = SimulationParameters::default();
        assert!(params.validate().is_ok());
        let evap = params.evaporation();
        assert!((evap[0] - 0.012).abs() < 1e-6);
        assert!((evap[2] - 0.015).abs() < 1e-6);
    }

    #[test]
    fn test_random_within_ranges() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        for _ in 0..100 {
            let params = SimulationParameters::random(&mut rng);
            assert!(params.validate().is_ok());
            assert!(params.sensor_angle <= std::f32::consts::TAU + 1e-4);
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = SimulationParameters::default();

        let params = SimulationParameters {
            sensor_distance: -1.0,
            ..base
        };
        assert_eq!(
            params.validate(),
            Err(ConfigurationError::OutOfRange {
                name: "sensor_distance",
                value: -1.0
            })
        );

        let params = SimulationParameters {
            sensor_theta_resolution: 0,
            ..base
        };
        assert_eq!(
            params.validate(),
            Err(ConfigurationError::ZeroResolution("sensor_theta_resolution"))
        );

        let params = SimulationParameters {
            turn_speed: 1.5,
            ..base
        };
        assert!(params.validate().is_err());

        let params = SimulationParameters {
            wander_strength: f32::NAN,
            ..base
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_store_keeps_last_valid_snapshot() {
        let store = ParameterStore::default();
        let handle = store.clone();

        handle.update(|p| p.turn_speed = 0.5).unwrap();
        assert_eq!(store.snapshot().turn_speed, 0.5);

        assert!(handle.update(|p| p.sensor_length_resolution = 0).is_err());
        assert_eq!(store.snapshot().sensor_length_resolution, 5);

        let bad = SimulationParameters {
            evaporation_rate: -0.1,
            ..SimulationParameters::default()
        };
        assert!(store.set(bad).is_err());
        assert_eq!(store.snapshot().turn_speed, 0.5);
    }
}
