use std::error::Error;
use std::fmt;

/// Everything that can go wrong while building a city or generating a run on it.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    InvalidParameter(String),
    // the requested time window is shorter than one time step
    HorizonTooSmall { horizon: f64 },
    // a same-zone trip was requested in a zone that has only one node
    DegenerateZone { zone: usize },
    Disconnected { components: usize },
    NoPath { origin: usize, destination: usize },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
            GenerationError::HorizonTooSmall { horizon } => {
                write!(f, "time window covers {} steps, at least one is needed", horizon)
            }
            GenerationError::DegenerateZone { zone } => {
                write!(f, "zone {} has a single node, cannot draw distinct origin and destination",
                       zone)
            }
            GenerationError::Disconnected { components } => {
                write!(f, "road network has {} strongly connected components", components)
            }
            GenerationError::NoPath { origin, destination } => {
                write!(f, "no path from {} to {}", origin, destination)
            }
        }
    }
}

impl Error for GenerationError {}
