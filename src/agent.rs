use rand::Rng;

use crate::{buffer::DoubleBuffer, error::ConfigurationError, math::wrap};

/// A single Physarum agent. The x and y positions are continuous, hence we use floating point
/// numbers instead of integers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agent {
    pub x: f32,
    pub y: f32,
    /// Heading in radians. Not kept normalized.
    pub angle: f32,
}

impl Agent {
    pub fn new(x: f32, y: f32, angle: f32) -> Self {
        Agent { x, y, angle }
    }

    /// Construct a new agent with a uniformly random position on the grid and a random heading.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: usize, height: usize) -> Self {
        let (x, y, angle) = rng.gen::<(f32, f32, f32)>();
        Agent {
            x: wrap(x * width as f32, width as f32),
            y: wrap(y * height as f32, height as f32),
            angle: angle * std::f32::consts::TAU,
        }
    }
}

/// The fixed-size set of agents. Agents are never created or destroyed after construction and keep
/// their index for the whole run.
#[derive(Debug, Clone)]
pub struct AgentPopulation {
    agents: DoubleBuffer<Agent>,
}

impl AgentPopulation {
    /// Scatter `count` agents over a `width` x `height` grid.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        count: usize,
        width: usize,
        height: usize,
    ) -> Result<Self, ConfigurationError> {
        let agents = (0..count)
            .map(|_| Agent::random(rng, width, height))
            .collect();
        Self::from_agents(agents, width, height)
    }

    /// Take ownership of explicitly placed agents. Every agent must already lie on the grid.
    pub fn from_agents(
        agents: Vec<Agent>,
        width: usize,
        height: usize,
    ) -> Result<Self, ConfigurationError> {
        if agents.is_empty() {
            return Err(ConfigurationError::NoAgents);
        }
        let (w, h) = (width as f32, height as f32);
        if let Some((index, a)) = agents.iter().enumerate().find(|(_, a)| {
            !(a.x >= 0.0 && a.x < w && a.y >= 0.0 && a.y < h && a.angle.is_finite())
        }) {
            return Err(ConfigurationError::AgentOutOfBounds {
                index,
                x: a.x,
                y: a.y,
            });
        }
        Ok(AgentPopulation {
            agents: DoubleBuffer::from_vec(agents),
        })
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// The agents as of the last completed tick.
    pub fn current(&self) -> &[Agent] {
        self.agents.current()
    }

    pub(crate) fn split(&mut self) -> (&[Agent], &mut [Agent]) {
        self.agents.split()
    }

    pub(crate) fn swap(&mut self) {
        self.agents.swap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn test_random_population_on_grid() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let population = AgentPopulation::random(&mut rng, 1000, 30, 20).unwrap();
        assert_eq!(population.len(), 1000);
        for a in population.current() {
            assert!(a.x >= 0.0 && a.x < 30.0);
            assert!(a.y >= 0.0 && a.y < 20.0);
            assert!(a.angle >= 0.0 && a.angle < std::f32::consts::TAU + 1e-6);
        }
    }

    #[test]
    fn test_population_rejects_bad_input() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        assert_eq!(
            AgentPopulation::random(&mut rng, 0, 8, 8).unwrap_err(),
            ConfigurationError::NoAgents
        );
        let err = AgentPopulation::from_agents(vec![Agent::new(8.0, 1.0, 0.0)], 8, 8).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::AgentOutOfBounds { index: 0, .. }
        ));
    }
}
