//! Monte Carlo savings and investment projections

mod params;
mod presets;
mod engine;
pub mod stats;

pub use params::{MonteCarloParameters, MonteCarloResult};
pub use presets::RiskProfile;
pub use engine::MonteCarloProjector;
