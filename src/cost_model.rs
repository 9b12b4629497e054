use super::error::GenerationError;
use super::CostConfig;

/// Turns travel times, measured in time steps, into money.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct CostModel {
    drive_cost_per_hour: f64,
    wait_cost_per_hour: f64,
    step_duration_s: f64,
}

impl CostModel {
    pub fn new(drive_cost_per_hour: f64, wait_cost_per_hour: f64, step_duration_s: f64)
               -> Result<CostModel, GenerationError> {
        if !(step_duration_s > 0.0) || !step_duration_s.is_finite() {
            return Err(GenerationError::InvalidParameter(format!(
                "step duration must be positive, got {}", step_duration_s)));
        }
        for (name, rate) in &[("drive", drive_cost_per_hour), ("wait", wait_cost_per_hour)] {
            if !(*rate >= 0.0) || !rate.is_finite() {
                return Err(GenerationError::InvalidParameter(format!(
                    "{} cost must be non-negative, got {}", name, rate)));
            }
        }
        Ok(CostModel {drive_cost_per_hour, wait_cost_per_hour, step_duration_s})
    }

    pub fn from_config<CC: CostConfig>(cfg: &CC) -> Result<CostModel, GenerationError> {
        CostModel::new(cfg.get_drive_cost_per_hour(), cfg.get_wait_cost_per_hour(),
                       cfg.get_step_duration_s())
    }

    /// Cost of driving for `time` steps.  Short and long hops are priced alike.
    pub fn drive_cost(&self, time: f64) -> f64 {
        self.steps_to_hours(time) * self.drive_cost_per_hour
    }

    pub fn wait_cost(&self, time: f64) -> f64 {
        self.steps_to_hours(time) * self.wait_cost_per_hour
    }
}

impl CostConfig for CostModel {
    fn get_drive_cost_per_hour(&self) -> f64 {
        self.drive_cost_per_hour
    }

    fn get_wait_cost_per_hour(&self) -> f64 {
        self.wait_cost_per_hour
    }

    fn get_step_duration_s(&self) -> f64 {
        self.step_duration_s
    }
}

/// What a customer pays per hour of (shortest-path) travel, as a function of the time of day.
#[derive(PartialEq, Debug, Clone)]
pub enum FareFunction {
    Flat { per_hour: f64 },
    // the peak rate applies from peak_start_s (inclusive) to peak_end_s (exclusive)
    Peak { base_per_hour: f64, peak_per_hour: f64, peak_start_s: f64, peak_end_s: f64 },
}

impl FareFunction {
    /// The hourly fare at `time_s` seconds after midnight.
    pub fn evaluate(&self, time_s: f64) -> f64 {
        match self {
            FareFunction::Flat { per_hour } => *per_hour,
            FareFunction::Peak { base_per_hour, peak_per_hour, peak_start_s, peak_end_s } => {
                if *peak_start_s <= time_s && time_s < *peak_end_s {
                    *peak_per_hour
                } else {
                    *base_per_hour
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        let rates = match self {
            FareFunction::Flat { per_hour } => vec![*per_hour],
            FareFunction::Peak { base_per_hour, peak_per_hour, .. } => {
                vec![*base_per_hour, *peak_per_hour]
            }
        };
        if rates.iter().all(|rr| *rr >= 0.0 && rr.is_finite()) {
            Ok(())
        } else {
            Err(GenerationError::InvalidParameter(format!("negative fare in {:?}", self)))
        }
    }
}

impl Default for FareFunction {
    fn default() -> Self {
        FareFunction::Flat { per_hour: 60.0 }
    }
}
