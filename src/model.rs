use log::{debug, trace};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

use crate::{
    agent::{Agent, AgentPopulation},
    deposit::evaporate_and_deposit,
    error::{ConfigurationError, StepError},
    grid::{EnvironmentField, FieldView},
    params::{ParameterStore, SimulationParameters},
    sense::sense_and_steer,
};

/// Where the orchestrator is within a tick. Outside of `step` it is always `Idle`; any other value
/// seen at the start of `step` means the previous tick unwound half way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Depositing,
    Sensing,
    Swapped,
}

/// Top-level simulation type. Owns the field and the agents exclusively and advances both in
/// lockstep, one tick per `step` call.
#[derive(Debug, Clone)]
pub struct Simulation {
    // Physarum agents.
    agents: AgentPopulation,

    // The grid they move on.
    field: EnvironmentField,

    phase: Phase,
    tick: u64,
}

impl Simulation {
    /// Allocate both buffer pairs, scatter `agent_count` agents with positions and headings drawn
    /// from `seed`, and zero the field.
    pub fn initialize(
        agent_count: usize,
        width: usize,
        height: usize,
        seed: u64,
    ) -> Result<Self, ConfigurationError> {
        let field = EnvironmentField::new(width, height)?;
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        let agents = AgentPopulation::random(&mut rng, agent_count, width, height)?;
        debug!(
            "Initialized {} agents on a {}x{} grid (seed {})",
            agent_count, width, height, seed
        );
        Ok(Self::assemble(agents, field))
    }

    /// Start from explicitly placed agents on a zeroed field.
    pub fn from_agents(
        agents: Vec<Agent>,
        width: usize,
        height: usize,
    ) -> Result<Self, ConfigurationError> {
        let field = EnvironmentField::new(width, height)?;
        let agents = AgentPopulation::from_agents(agents, width, height)?;
        Ok(Self::assemble(agents, field))
    }

    fn assemble(agents: AgentPopulation, field: EnvironmentField) -> Self {
        Simulation {
            agents,
            field,
            phase: Phase::Idle,
            tick: 0,
        }
    }

    /// Advance the simulation by exactly one tick: deposit and evaporate into the next field, let
    /// the agents sense that fresh field and move into the next agent buffer, then flip both
    /// buffers. An invalid snapshot is rejected before anything is touched.
    pub fn step(&mut self, params: &SimulationParameters) -> Result<(), StepError> {
        if self.phase != Phase::Idle {
            return Err(StepError::Interrupted(self.phase));
        }
        params.validate()?;

        let (width, height) = (self.field.width(), self.field.height());

        self.enter(Phase::Depositing);
        {
            let (current, next) = self.field.split();
            evaporate_and_deposit(width, height, current, self.agents.current(), next, params);
        }

        self.enter(Phase::Sensing);
        {
            let fresh = self.field.next_view();
            let (current, next) = self.agents.split();
            sense_and_steer(&fresh, current, next, params);
        }

        self.enter(Phase::Swapped);
        self.field.swap();
        self.agents.swap();
        self.tick += 1;

        self.enter(Phase::Idle);
        Ok(())
    }

    /// Step `ticks` times, taking a fresh snapshot from the store before each tick.
    pub fn run(&mut self, ticks: u64, store: &ParameterStore) -> Result<(), StepError> {
        for _ in 0..ticks {
            self.step(&store.snapshot())?;
        }
        Ok(())
    }

    fn enter(&mut self, phase: Phase) {
        trace!("tick {}: {:?} -> {:?}", self.tick, self.phase, phase);
        self.phase = phase;
    }

    /// The field as of the last completed tick.
    pub fn current_field(&self) -> FieldView<'_> {
        self.field.view()
    }

    /// Seed the current field, e.g. with a base colour, before or between ticks.
    pub fn field_mut(&mut self) -> &mut EnvironmentField {
        &mut self.field
    }

    /// The agents as of the last completed tick.
    pub fn agents(&self) -> &[Agent] {
        self.agents.current()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn width(&self) -> usize {
        self.field.width()
    }

    pub fn height(&self) -> usize {
        self.field.height()
    }
}
