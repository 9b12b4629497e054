// imports of other modules from this crate
mod error;
pub use error::GenerationError;

mod geometry;
pub use geometry::{CityLayout, GridCoord};

mod cost_model;
pub use cost_model::{CostModel, FareFunction};

mod road_network;
pub use road_network::{generate_metropolis, Hop, RoadNetwork};

mod shortest_paths;
pub use shortest_paths::{dijkstra_with_costs, AllPairsPaths, PathCost, ShortestPathOracle};

mod customers;
pub use customers::{Customer, Taxi};

mod demand;
pub use demand::{ContinuousDemand, DemandGenerator, DemandModel, DiscreteDemand, TripCategory};

mod fleet;
pub use fleet::place_taxis;

mod problem;
pub use problem::{CityTopology, SimulationState, TaxiProblem};

mod config_utils;
pub use config_utils::{get_num_seconds_from_time_str, GenerationConfig, MetropolisConfig};

#[cfg(test)]
mod test_utils;

/// Defines the money constants every cost computation needs.
pub trait CostConfig {
    fn get_drive_cost_per_hour(&self) -> f64;
    fn get_wait_cost_per_hour(&self) -> f64;
    fn get_step_duration_s(&self) -> f64;

    fn steps_to_hours(&self, time: f64) -> f64 {
        time * self.get_step_duration_s() / 3600.0
    }
}
