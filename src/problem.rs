use rand::Rng;

use super::config_utils::{GenerationConfig, MetropolisConfig};
use super::cost_model::{CostModel, FareFunction};
use super::customers::{Customer, Taxi};
use super::demand::{ContinuousDemand, DemandGenerator, DemandModel, DiscreteDemand};
use super::error::GenerationError;
use super::fleet::place_taxis;
use super::geometry::CityLayout;
use super::road_network::{generate_metropolis, RoadNetwork};
use super::shortest_paths::{AllPairsPaths, PathCost, ShortestPathOracle};
use super::CostConfig;


/// The part of a problem that is fixed once the city is built: roads, their weights, fastest
/// paths, and the money constants.
#[derive(Debug, Clone)]
pub struct CityTopology {
    network: RoadNetwork,
    paths: AllPairsPaths,
    cost_model: CostModel,
    fare: FareFunction,
}

impl CityTopology {
    pub fn build<RR: Rng>(width: usize, num_suburbs: usize, discrete_time: bool,
                          cost_model: CostModel, fare: FareFunction, rng: &mut RR)
                          -> Result<CityTopology, GenerationError> {
        fare.validate()?;
        let layout = CityLayout::new(width, num_suburbs)?;
        let network = generate_metropolis(layout, discrete_time, &cost_model, rng)?;
        let paths = AllPairsPaths::from_network(&network);
        Ok(CityTopology {network, paths, cost_model, fare})
    }

    pub fn from_config<RR: Rng>(cfg: &MetropolisConfig, rng: &mut RR)
                                -> Result<CityTopology, GenerationError> {
        let cost_model = CostModel::from_config(cfg)?;
        CityTopology::build(cfg.width, cfg.num_suburbs, cfg.discrete_time, cost_model,
                            cfg.fare.clone(), rng)
    }

    pub fn get_network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn get_layout(&self) -> &CityLayout {
        self.network.get_layout()
    }

    pub fn get_paths(&self) -> &AllPairsPaths {
        &self.paths
    }

    pub fn get_cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    pub fn get_fare(&self) -> &FareFunction {
        &self.fare
    }

    pub fn is_discrete_time(&self) -> bool {
        self.network.is_discrete_time()
    }

    pub fn get_step_duration_s(&self) -> f64 {
        self.cost_model.get_step_duration_s()
    }

    pub fn get_path(&self, origin: usize, destination: usize) -> Option<PathCost> {
        self.paths.query(origin, destination)
    }

    pub fn path_time(&self, origin: usize, destination: usize) -> Option<f64> {
        self.paths.path_time(origin, destination)
    }

    pub fn path_cost(&self, origin: usize, destination: usize) -> Option<f64> {
        self.get_path(origin, destination).map(|pc| pc.cost)
    }
}


/// Customers, taxis and horizon of one simulation run.  Always replaced as a whole.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct SimulationState {
    pub customers: Vec<Customer>,
    pub taxis: Vec<Taxi>,
    // in time steps
    pub horizon: f64,
}


/// A complete taxi problem: a fixed city plus the current run's demand and fleet.
///
/// Cloning gives a fully independent copy, so several runs can branch from one built city.
#[derive(Debug, Clone)]
pub struct TaxiProblem {
    topology: CityTopology,
    state: SimulationState,
}

impl TaxiProblem {
    pub fn new(topology: CityTopology) -> TaxiProblem {
        TaxiProblem {topology, state: SimulationState::default()}
    }

    /// Replace customers, taxis and horizon with a fresh draw for the window between
    /// `window_start_s` and `window_end_s` (seconds after midnight).  On error, the previous
    /// state is left as it was.
    pub fn generate<RR: Rng>(&mut self, num_taxis: usize, demand_scale: f64,
                             window_start_s: f64, window_end_s: f64, rng: &mut RR)
                             -> Result<(), GenerationError> {
        if num_taxis == 0 {
            return Err(GenerationError::InvalidParameter(
                String::from("at least one taxi is needed")));
        }
        if !window_start_s.is_finite() || !window_end_s.is_finite() {
            return Err(GenerationError::InvalidParameter(format!(
                "window bounds must be finite, got {} to {}", window_start_s, window_end_s)));
        }
        let step_duration_s = self.topology.get_step_duration_s();
        let mut horizon = (window_end_s - window_start_s) / step_duration_s;
        if self.topology.is_discrete_time() {
            horizon = horizon.floor();
        }
        if !(horizon >= 1.0) {
            return Err(GenerationError::HorizonTooSmall {horizon});
        }
        let layout = *self.topology.get_layout();
        let model = DemandModel::new(layout, demand_scale)?;

        let fare = self.topology.get_fare().clone();
        let paths = self.topology.get_paths();
        let customers = if self.topology.is_discrete_time() {
            let demand = DiscreteDemand {
                horizon: horizon as usize,
                step_duration_s,
                window_start_s,
                fare,
            };
            demand.generate(&model, paths, rng)?
        } else {
            let demand = ContinuousDemand {horizon, step_duration_s, window_start_s, fare};
            demand.generate(&model, paths, rng)?
        };
        let taxis = place_taxis(&layout, num_taxis, rng)?;

        log::info!("generated {} customers and {} taxis over a horizon of {} steps",
                   customers.len(), taxis.len(), horizon);
        self.state = SimulationState {customers, taxis, horizon};
        Ok(())
    }

    pub fn generate_from_config<RR: Rng>(&mut self, cfg: &GenerationConfig, rng: &mut RR)
                                         -> Result<(), GenerationError> {
        self.generate(cfg.num_taxis, cfg.demand_scale, cfg.window_start_s, cfg.window_end_s, rng)
    }

    pub fn get_topology(&self) -> &CityTopology {
        &self.topology
    }

    pub fn get_state(&self) -> &SimulationState {
        &self.state
    }

    pub fn get_customers(&self) -> &Vec<Customer> {
        &self.state.customers
    }

    pub fn get_customers_mut(&mut self) -> &mut Vec<Customer> {
        &mut self.state.customers
    }

    pub fn get_taxis(&self) -> &Vec<Taxi> {
        &self.state.taxis
    }

    pub fn get_horizon(&self) -> f64 {
        self.state.horizon
    }
}
