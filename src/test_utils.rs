use std::collections::HashMap;
use std::fmt::Debug;

use super::customers::{Customer, Taxi};

/// Checks that the contents of two hashmaps are the same.
pub fn compare_hashmaps<KK, VV>(query_map: &HashMap<KK, VV>, true_map: &HashMap<KK, VV>)
    where KK: Debug + Eq + std::hash::Hash,
    VV: Debug + PartialEq,
{
    assert_eq!(query_map.len(), true_map.len());
    for (true_key, true_val) in true_map {
        match query_map.get(true_key) {
            Some(val) => assert_eq!(val, true_val),
            None => assert!(false, "Key {:?} missing!", true_key),
        }
    }
}

/// Checks every customer's time window and price, and that ids count up from 1 in the order
/// the customers appear.
pub fn check_customers(customers: &Vec<Customer>, horizon: f64) {
    let mut last_time = 0.0;
    for (ii, cust) in customers.iter().enumerate() {
        assert_eq!(cust.id, ii + 1);
        assert!(cust.is_consistent(horizon), "inconsistent customer {:?}", cust);
        assert!(cust.earliest_pickup >= last_time, "customer {} out of order", cust.id);
        last_time = cust.earliest_pickup;
    }
}

pub fn check_taxis(taxis: &Vec<Taxi>, num_taxis: usize, num_nodes: usize) {
    assert_eq!(taxis.len(), num_taxis);
    for (ii, taxi) in taxis.iter().enumerate() {
        assert_eq!(taxi.id, ii + 1);
        assert_eq!(taxi.start_time, 0.0);
        assert!(1 <= taxi.initial_location && taxi.initial_location <= num_nodes);
    }
}
