use rand::distributions::WeightedIndex;
use rand::Rng;
use rand_distr::{Distribution, Exp, Poisson};

use super::cost_model::FareFunction;
use super::customers::Customer;
use super::error::GenerationError;
use super::geometry::CityLayout;
use super::shortest_paths::ShortestPathOracle;


#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum TripCategory {
    CityToCity,
    SubToSub,
    CityToSub,
    SubToCity,
}

static CATEGORIES: [(TripCategory, f64); 4] = [
    (TripCategory::CityToCity, 0.40),
    (TripCategory::SubToSub, 0.10),
    (TripCategory::CityToSub, 0.25),
    (TripCategory::SubToCity, 0.25),
];

// a pickup window is drawn from 1..=10 steps, and calls come up to 120 steps ahead.
static MAX_PICKUP_WINDOW: f64 = 10.0;
static MAX_NOTICE: f64 = 120.0;

impl TripCategory {
    fn needs_suburb(&self) -> bool {
        *self != TripCategory::CityToCity
    }
}


/// Where and how often trips appear.  The same model drives both time regimes.
#[derive(Debug, Clone)]
pub struct DemandModel {
    layout: CityLayout,
    demand_scale: f64,
    categories: Vec<TripCategory>,
    category_dist: WeightedIndex<f64>,
}

impl DemandModel {
    pub fn new(layout: CityLayout, demand_scale: f64) -> Result<DemandModel, GenerationError> {
        if !(demand_scale > 0.0) || !demand_scale.is_finite() {
            return Err(GenerationError::InvalidParameter(format!(
                "demand scale must be positive, got {}", demand_scale)));
        }

        // without suburbs, only city trips are possible
        let (categories, weights): (Vec<TripCategory>, Vec<f64>) = CATEGORIES.iter()
            .filter(|(cat, _)| layout.num_suburbs() > 0 || !cat.needs_suburb())
            .cloned()
            .unzip();
        if categories.len() < CATEGORIES.len() {
            log::warn!("city has no suburbs, all trips will be city to city");
        }

        for cat in &categories {
            let same_zone = match cat {
                TripCategory::CityToCity => Some(0),
                TripCategory::SubToSub => Some(1),
                _ => None,
            };
            if let Some(zone) = same_zone {
                if layout.zone_size(zone) < 2 {
                    return Err(GenerationError::DegenerateZone { zone });
                }
            }
        }

        let category_dist = WeightedIndex::new(&weights).map_err(|err|
            GenerationError::InvalidParameter(format!("bad category weights: {}", err)))?;
        Ok(DemandModel {layout, demand_scale, categories, category_dist})
    }

    pub fn get_layout(&self) -> &CityLayout {
        &self.layout
    }

    /// Expected number of trip requests per hour.
    pub fn mean_per_hour(&self) -> f64 {
        let width = self.layout.width() as f64;
        let sub_width = self.layout.sub_width() as f64;
        let num_suburbs = self.layout.num_suburbs() as f64;
        (2.0 * width.powi(2) + 0.5 * num_suburbs * sub_width.powi(2)) * self.demand_scale
    }

    pub fn sample_category<RR: Rng>(&self, rng: &mut RR) -> TripCategory {
        self.categories[self.category_dist.sample(rng)]
    }

    /// Draw a category, then an origin and a distinct destination matching it.
    pub fn sample_trip<RR: Rng>(&self, rng: &mut RR) -> (TripCategory, usize, usize) {
        let category = self.sample_category(rng);
        let layout = &self.layout;
        // new() guarantees suburbs exist whenever a suburb category can be drawn
        let (origin_zone, dest_zone) = match category {
            TripCategory::CityToCity => (0, 0),
            TripCategory::SubToSub => {
                let zone = layout.random_suburb(rng).unwrap_or(0);
                (zone, zone)
            }
            TripCategory::CityToSub => (0, layout.random_suburb(rng).unwrap_or(0)),
            TripCategory::SubToCity => (layout.random_suburb(rng).unwrap_or(0), 0),
        };

        let origin = layout.random_loc_in_zone(origin_zone, rng);
        let mut destination = layout.random_loc_in_zone(dest_zone, rng);
        while destination == origin {
            destination = layout.random_loc_in_zone(dest_zone, rng);
        }
        (category, origin, destination)
    }
}


pub trait DemandGenerator {
    /// Produce a fresh list of customers, ordered by the time they appear, ids counting from 1.
    fn generate<OO, RR>(&self, model: &DemandModel, paths: &OO, rng: &mut RR)
                        -> Result<Vec<Customer>, GenerationError>
                        where OO: ShortestPathOracle, RR: Rng;
}

fn fastest_time<OO: ShortestPathOracle>(paths: &OO, origin: usize, destination: usize)
                                        -> Result<f64, GenerationError> {
    paths.path_time(origin, destination).ok_or(GenerationError::NoPath {origin, destination})
}


/// Trips arrive in whole time steps, a Poisson-distributed number per step.
#[derive(Debug, Clone)]
pub struct DiscreteDemand {
    pub horizon: usize,
    pub step_duration_s: f64,
    // the time of day at which step 0 starts, used to evaluate the fare
    pub window_start_s: f64,
    pub fare: FareFunction,
}

impl DemandGenerator for DiscreteDemand {
    fn generate<OO, RR>(&self, model: &DemandModel, paths: &OO, rng: &mut RR)
                        -> Result<Vec<Customer>, GenerationError>
                        where OO: ShortestPathOracle, RR: Rng {
        let mean_per_step = model.mean_per_hour() * self.step_duration_s / 3600.0;
        let arrivals = Poisson::new(mean_per_step).map_err(|err|
            GenerationError::InvalidParameter(format!("arrival rate {}: {}", mean_per_step, err)))?;
        let horizon = self.horizon as f64;

        let mut customers = vec![];
        for step in 0..=self.horizon {
            let count: f64 = arrivals.sample(rng);
            let fare = self.fare.evaluate(self.window_start_s + step as f64 * self.step_duration_s);
            for _ in 0..(count as usize) {
                let (_, origin, destination) = model.sample_trip(rng);
                let travel_time = fastest_time(paths, origin, destination)?;
                let price = fare * self.step_duration_s / 3600.0 * travel_time;
                let earliest = step as f64;
                let latest = (earliest + rng.gen_range(1..=MAX_PICKUP_WINDOW as u32) as f64)
                    .min(horizon);
                let call = (earliest - rng.gen_range(1..=MAX_NOTICE as u32) as f64).max(0.0);
                customers.push(Customer::new(customers.len() + 1, origin, destination, call,
                                             earliest, latest, price));
            }
        }

        log::debug!("generated {} customers over {} steps", customers.len(), self.horizon + 1);
        Ok(customers)
    }
}


/// Trips arrive one at a time, with exponentially distributed gaps between them.
#[derive(Debug, Clone)]
pub struct ContinuousDemand {
    pub horizon: f64,
    pub step_duration_s: f64,
    pub window_start_s: f64,
    pub fare: FareFunction,
}

impl DemandGenerator for ContinuousDemand {
    fn generate<OO, RR>(&self, model: &DemandModel, paths: &OO, rng: &mut RR)
                        -> Result<Vec<Customer>, GenerationError>
                        where OO: ShortestPathOracle, RR: Rng {
        // mean gap is 3600 / mean_per_hour seconds
        let rate_per_s = model.mean_per_hour() / 3600.0;
        let gaps = Exp::new(rate_per_s).map_err(|err|
            GenerationError::InvalidParameter(format!("arrival rate {}: {}", rate_per_s, err)))?;
        let window_s = self.horizon * self.step_duration_s;

        let mut customers = vec![];
        let mut elapsed_s = 0.0;
        loop {
            let gap: f64 = gaps.sample(rng);
            elapsed_s += gap;
            if elapsed_s >= window_s {
                break;
            }
            let now = elapsed_s / self.step_duration_s;
            let fare = self.fare.evaluate(self.window_start_s + elapsed_s);

            let (_, origin, destination) = model.sample_trip(rng);
            let travel_time = fastest_time(paths, origin, destination)?;
            let price = fare / 120.0 * travel_time;
            let latest = (now + MAX_PICKUP_WINDOW * rng.gen::<f64>()).min(self.horizon);
            let call = (now - MAX_NOTICE * rng.gen::<f64>()).max(0.0);
            customers.push(Customer::new(customers.len() + 1, origin, destination, call, now,
                                         latest, price));
        }

        log::debug!("generated {} customers over {:.1} time units", customers.len(),
                    self.horizon);
        Ok(customers)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_isaac::Isaac64Rng;
    use std::collections::HashMap;

    use crate::cost_model::CostModel;
    use crate::road_network::generate_metropolis;
    use crate::shortest_paths::AllPairsPaths;
    use crate::test_utils::check_customers;

    fn city(width: usize, num_suburbs: usize, discrete_time: bool, rng: &mut Isaac64Rng)
            -> AllPairsPaths {
        let layout = CityLayout::new(width, num_suburbs).unwrap();
        let model = CostModel::new(30.0, 5.0, 60.0).unwrap();
        let network = generate_metropolis(layout, discrete_time, &model, rng).unwrap();
        AllPairsPaths::from_network(&network)
    }

    fn discrete(horizon: usize) -> DiscreteDemand {
        DiscreteDemand {
            horizon,
            step_duration_s: 60.0,
            window_start_s: 0.0,
            fare: FareFunction::default(),
        }
    }

    #[test]
    fn test_mean_per_hour() {
        let model = DemandModel::new(CityLayout::new(4, 1).unwrap(), 1.0).unwrap();
        assert_relative_eq!(model.mean_per_hour(), 34.0);
        let model = DemandModel::new(CityLayout::new(6, 3).unwrap(), 0.5).unwrap();
        assert_relative_eq!(model.mean_per_hour(), (72.0 + 0.5 * 3.0 * 9.0) * 0.5);
    }

    #[test]
    fn test_category_frequencies() {
        let model = DemandModel::new(CityLayout::new(6, 3).unwrap(), 1.0).unwrap();
        let mut rng = Isaac64Rng::seed_from_u64(1);
        let num_samples = 100000;
        let mut counts: HashMap<TripCategory, usize> = HashMap::new();
        for _ in 0..num_samples {
            *counts.entry(model.sample_category(&mut rng)).or_insert(0) += 1;
        }
        for (cat, prob) in CATEGORIES.iter() {
            let freq = counts[cat] as f64 / num_samples as f64;
            assert!((freq - prob).abs() < 0.01, "{:?} drawn with frequency {}", cat, freq);
        }
    }

    #[test]
    fn test_trip_zones_match_category() {
        let layout = CityLayout::new(6, 3).unwrap();
        let model = DemandModel::new(layout, 1.0).unwrap();
        let mut rng = Isaac64Rng::seed_from_u64(2);
        for _ in 0..2000 {
            let (cat, origin, destination) = model.sample_trip(&mut rng);
            assert_ne!(origin, destination);
            let oz = layout.zone_of(origin).unwrap();
            let dz = layout.zone_of(destination).unwrap();
            match cat {
                TripCategory::CityToCity => assert!(oz == 0 && dz == 0),
                TripCategory::SubToSub => assert!(oz > 0 && oz == dz),
                TripCategory::CityToSub => assert!(oz == 0 && dz > 0),
                TripCategory::SubToCity => assert!(oz > 0 && dz == 0),
            }
        }
    }

    #[test]
    fn test_no_suburbs_means_city_trips() {
        let layout = CityLayout::new(3, 0).unwrap();
        let model = DemandModel::new(layout, 1.0).unwrap();
        let mut rng = Isaac64Rng::seed_from_u64(4);
        for _ in 0..500 {
            let (cat, origin, destination) = model.sample_trip(&mut rng);
            assert_eq!(cat, TripCategory::CityToCity);
            assert!(origin <= 9 && destination <= 9);
        }
    }

    #[test]
    fn test_bad_models() {
        let layout = CityLayout::new(4, 1).unwrap();
        assert!(DemandModel::new(layout, 0.0).is_err());
        assert!(DemandModel::new(layout, -1.0).is_err());
        assert!(DemandModel::new(layout, f64::INFINITY).is_err());
        // one-node main grid
        assert_eq!(DemandModel::new(CityLayout::new(1, 0).unwrap(), 1.0).unwrap_err(),
                   GenerationError::DegenerateZone { zone: 0 });
        // one-node suburbs
        assert_eq!(DemandModel::new(CityLayout::new(3, 2).unwrap(), 1.0).unwrap_err(),
                   GenerationError::DegenerateZone { zone: 1 });
        // but without suburbs, that width is fine
        assert!(DemandModel::new(CityLayout::new(3, 0).unwrap(), 1.0).is_ok());
    }

    #[test]
    fn test_discrete_arrival_rate() {
        let mut rng = Isaac64Rng::seed_from_u64(5);
        let paths = city(4, 1, true, &mut rng);
        let model = DemandModel::new(CityLayout::new(4, 1).unwrap(), 1.0).unwrap();
        let horizon = 20000;
        let customers = discrete(horizon).generate(&model, &paths, &mut rng).unwrap();
        let per_step = customers.len() as f64 / (horizon + 1) as f64;
        let expected = model.mean_per_hour() * 60.0 / 3600.0;
        assert!((per_step - expected).abs() < 0.03,
                "{} arrivals per step, expected {}", per_step, expected);
    }

    #[test]
    fn test_discrete_customers() {
        let mut rng = Isaac64Rng::seed_from_u64(6);
        let paths = city(5, 2, true, &mut rng);
        let model = DemandModel::new(CityLayout::new(5, 2).unwrap(), 2.0).unwrap();
        let generator = discrete(300);
        let customers = generator.generate(&model, &paths, &mut rng).unwrap();
        assert!(customers.len() > 0);
        check_customers(&customers, 300.0);
        for cust in &customers {
            assert_eq!(cust.earliest_pickup.fract(), 0.0);
            assert_eq!(cust.latest_pickup.fract(), 0.0);
            assert_eq!(cust.call_time.fract(), 0.0);
            assert!(cust.latest_pickup - cust.earliest_pickup <= 10.0);
            assert!(cust.latest_pickup > cust.earliest_pickup ||
                    cust.latest_pickup == 300.0);
            assert!(cust.earliest_pickup - cust.call_time <= 120.0);
            let travel = paths.path_time(cust.origin, cust.destination).unwrap();
            assert_relative_eq!(cust.price, 60.0 * 60.0 / 3600.0 * travel);
        }
    }

    #[test]
    fn test_continuous_customers() {
        let mut rng = Isaac64Rng::seed_from_u64(7);
        let paths = city(4, 1, false, &mut rng);
        let model = DemandModel::new(CityLayout::new(4, 1).unwrap(), 1.0).unwrap();
        let generator = ContinuousDemand {
            horizon: 6000.0,
            step_duration_s: 60.0,
            window_start_s: 0.0,
            fare: FareFunction::default(),
        };
        let customers = generator.generate(&model, &paths, &mut rng).unwrap();
        check_customers(&customers, 6000.0);

        // 100 hours at 34 trips an hour
        let expected = model.mean_per_hour() * 100.0;
        assert!((customers.len() as f64 - expected).abs() < 0.05 * expected,
                "{} customers, expected about {}", customers.len(), expected);
        for cust in &customers {
            assert!(cust.earliest_pickup < 6000.0);
            assert!(cust.pickup_window() < 10.0);
            assert!(cust.notice() < 120.0);
            let travel = paths.path_time(cust.origin, cust.destination).unwrap();
            assert_relative_eq!(cust.price, 60.0 / 120.0 * travel);
        }
    }

    #[test]
    fn test_peak_fare_pricing() {
        let mut rng = Isaac64Rng::seed_from_u64(9);
        let paths = city(4, 0, true, &mut rng);
        let model = DemandModel::new(CityLayout::new(4, 0).unwrap(), 3.0).unwrap();
        // the window starts at 07:30, with a peak from 08:00 onwards
        let generator = DiscreteDemand {
            horizon: 60,
            step_duration_s: 60.0,
            window_start_s: 7.5 * 3600.0,
            fare: FareFunction::Peak {
                base_per_hour: 60.0, peak_per_hour: 120.0,
                peak_start_s: 8.0 * 3600.0, peak_end_s: 24.0 * 3600.0,
            },
        };
        let customers = generator.generate(&model, &paths, &mut rng).unwrap();
        for cust in &customers {
            let travel = paths.path_time(cust.origin, cust.destination).unwrap();
            let rate = if cust.earliest_pickup < 30.0 { 60.0 } else { 120.0 };
            assert_relative_eq!(cust.price, rate / 60.0 * travel);
        }
    }
}
