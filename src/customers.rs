/// A trip request.  Times are in time steps since the start of the simulated window.
#[derive(PartialEq, Debug, Clone)]
pub struct Customer {
    pub id: usize,
    pub origin: usize,
    pub destination: usize,
    // when the customer calls for a taxi
    pub call_time: f64,
    // the window in which the customer must be picked up
    pub earliest_pickup: f64,
    pub latest_pickup: f64,
    pub price: f64,
}

impl Customer {
    pub fn new(id: usize, origin: usize, destination: usize, call_time: f64,
               earliest_pickup: f64, latest_pickup: f64, price: f64) -> Customer {
        Customer {
            id,
            origin,
            destination,
            call_time,
            earliest_pickup,
            latest_pickup,
            price,
        }
    }

    pub fn pickup_window(&self) -> f64 {
        self.latest_pickup - self.earliest_pickup
    }

    /// How long before the earliest pickup the call comes in.
    pub fn notice(&self) -> f64 {
        self.earliest_pickup - self.call_time
    }

    /// Checks that the time fields are ordered and fit inside `[0, horizon]`.
    pub fn is_consistent(&self, horizon: f64) -> bool {
        0.0 <= self.call_time &&
            self.call_time <= self.earliest_pickup &&
            self.earliest_pickup <= self.latest_pickup &&
            self.latest_pickup <= horizon &&
            self.price >= 0.0 &&
            self.origin != self.destination
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Taxi {
    pub id: usize,
    pub initial_location: usize,
    // the time from which the taxi can be dispatched
    pub start_time: f64,
}

impl Taxi {
    pub fn new(id: usize, initial_location: usize) -> Taxi {
        Taxi {id, initial_location, start_time: 0.0}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_consistency() {
        let cust = Customer::new(1, 3, 7, 2.0, 5.0, 9.0, 4.5);
        assert!(cust.is_consistent(10.0));
        assert_eq!(cust.pickup_window(), 4.0);
        assert_eq!(cust.notice(), 3.0);
        // latest pickup past the horizon
        assert!(!cust.is_consistent(8.0));

        let mut bad = cust.clone();
        bad.destination = bad.origin;
        assert!(!bad.is_consistent(10.0));

        let mut bad = cust.clone();
        bad.call_time = 6.0;
        assert!(!bad.is_consistent(10.0));

        let mut bad = cust;
        bad.price = -1.0;
        assert!(!bad.is_consistent(10.0));
    }

    #[test]
    fn test_taxi_starts_at_zero() {
        let taxi = Taxi::new(4, 12);
        assert_eq!(taxi.start_time, 0.0);
        assert_eq!(taxi.initial_location, 12);
    }
}
