//! Physarum trail simulation on a toroidal grid.
//!
//! Agents sense a shared RGB trail field, steer towards the strongest of three sectors ahead of
//! them and deposit into the field, while the field evaporates. Both the field and the agents are
//! double buffered, so every tick reads one consistent snapshot and writes the other half.
//!
//! ```no_run
//! use physarum::{model::Simulation, params::SimulationParameters};
//!
//! let mut sim = Simulation::initialize(100_000, 512, 512, 42)?;
//! let params = SimulationParameters::default();
//! for _ in 0..100 {
//!     sim.step(&params)?;
//! }
//! let image = physarum::present::render(&sim.current_field());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod agent;
pub mod buffer;
pub mod deposit;
pub mod error;
pub mod grid;
pub mod math;
pub mod model;
pub mod params;
pub mod present;
pub mod sense;

pub use error::{ConfigurationError, StepError};
pub use model::Simulation;
pub use params::{ParameterStore, SimulationParameters};
