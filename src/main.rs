use std::error::Error;
use std::path::PathBuf;

use rand::SeedableRng;
use rand_isaac::Isaac64Rng;

use metropolis_taxi::{CityTopology, MetropolisConfig, TaxiProblem};

static DEFAULT_CONFIG_PATH: &str = "configs/metropolis.yaml";
static RAND_SEED: u64 = 100;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let config_path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(DEFAULT_CONFIG_PATH),
    };
    let config = MetropolisConfig::from_file(&config_path)?;
    let mut rng = Isaac64Rng::seed_from_u64(config.seed.unwrap_or(RAND_SEED));

    let topology = CityTopology::from_config(&config, &mut rng)?;
    let mut problem = TaxiProblem::new(topology);
    problem.generate_from_config(&config.generation, &mut rng)?;

    let network = problem.get_topology().get_network();
    let total_fares: f64 = problem.get_customers().iter().map(|cc| cc.price).sum();
    log::info!("{} locations, {} roads", network.get_num_nodes(), network.get_num_edges());
    println!("horizon: {} steps", problem.get_horizon());
    println!("customers: {} (total fares {:.2})", problem.get_customers().len(), total_fares);
    println!("taxis: {}", problem.get_taxis().len());
    Ok(())
}
