use rand::Rng;

use super::customers::Taxi;
use super::error::GenerationError;
use super::geometry::CityLayout;

/// Scatter `num_taxis` taxis over the city.  Each one is equally likely to start in the main
/// grid or in a random suburb, and within that zone at a uniformly random node.
pub fn place_taxis<RR: Rng>(layout: &CityLayout, num_taxis: usize, rng: &mut RR)
                            -> Result<Vec<Taxi>, GenerationError> {
    if num_taxis == 0 {
        return Err(GenerationError::InvalidParameter(
            String::from("at least one taxi is needed")));
    }

    let mut taxis = Vec::with_capacity(num_taxis);
    for id in 1..=num_taxis {
        let zone = if rng.gen_bool(0.5) {
            0
        } else {
            // cities without suburbs keep every taxi downtown
            layout.random_suburb(rng).unwrap_or(0)
        };
        taxis.push(Taxi::new(id, layout.random_loc_in_zone(zone, rng)));
    }
    log::debug!("placed {} taxis", taxis.len());
    Ok(taxis)
}
