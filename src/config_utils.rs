use std::error::Error;
use std::path::Path;

use yaml_rust::{Yaml, YamlLoader};

use super::cost_model::FareFunction;
use super::CostConfig;

static DEFAULT_STEP_DURATION_S: f64 = 60.0;
static DEFAULT_DRIVE_COST_PER_HOUR: f64 = 30.0;
static DEFAULT_WAIT_COST_PER_HOUR: f64 = 5.0;

/// Parameters of one generation run on an already-built city.
#[derive(PartialEq, Debug, Clone)]
pub struct GenerationConfig {
    pub num_taxis: usize,
    pub demand_scale: f64,
    // seconds after midnight
    pub window_start_s: f64,
    pub window_end_s: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            num_taxis: 10,
            demand_scale: 1.0,
            window_start_s: 0.0,
            window_end_s: 3600.0,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct MetropolisConfig {
    // side length, in nodes, of the main grid.  Suburbs are half as wide.
    pub width: usize,
    pub num_suburbs: usize,
    // whether times are whole steps (true) or real numbers (false)
    pub discrete_time: bool,
    pub step_duration_s: f64,
    pub drive_cost_per_hour: f64,
    pub wait_cost_per_hour: f64,
    pub fare: FareFunction,
    pub generation: GenerationConfig,
    pub seed: Option<u64>,
}

impl MetropolisConfig {
    /// A config with default constants for a city of the given shape.
    pub fn new(width: usize, num_suburbs: usize, discrete_time: bool) -> MetropolisConfig {
        MetropolisConfig {
            width,
            num_suburbs,
            discrete_time,
            step_duration_s: DEFAULT_STEP_DURATION_S,
            drive_cost_per_hour: DEFAULT_DRIVE_COST_PER_HOUR,
            wait_cost_per_hour: DEFAULT_WAIT_COST_PER_HOUR,
            fare: FareFunction::default(),
            generation: GenerationConfig::default(),
            seed: None,
        }
    }

    pub fn from_file(path: &Path) -> Result<MetropolisConfig, Box<dyn Error>> {
        let file_contents = std::fs::read_to_string(path)?;
        MetropolisConfig::from_yaml_str(&file_contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<MetropolisConfig, Box<dyn Error>> {
        let yaml_cfgs = YamlLoader::load_from_str(contents)?;
        let yaml_cfg = yaml_cfgs.get(0).ok_or("config file is empty")?;
        MetropolisConfig::from_yaml(yaml_cfg)
    }

    pub fn from_yaml(yaml_cfg: &Yaml) -> Result<MetropolisConfig, Box<dyn Error>> {
        let width = get_count(&yaml_cfg["width"], "width")?.ok_or("no width")?;
        let num_suburbs = get_count(&yaml_cfg["num_suburbs"], "num_suburbs")?.unwrap_or(0);
        let discrete_time = match &yaml_cfg["discrete_time"] {
            Yaml::BadValue => false,
            value => value.as_bool().ok_or("discrete_time must be true or false")?,
        };
        let mut config = MetropolisConfig::new(width, num_suburbs, discrete_time);

        if let Some(step) = get_number(&yaml_cfg["step_duration_s"], "step_duration_s")? {
            config.step_duration_s = step;
        }
        if let Some(cost) = get_number(&yaml_cfg["drive_cost_per_hour"], "drive_cost_per_hour")? {
            config.drive_cost_per_hour = cost;
        }
        if let Some(cost) = get_number(&yaml_cfg["wait_cost_per_hour"], "wait_cost_per_hour")? {
            config.wait_cost_per_hour = cost;
        }
        if !yaml_cfg["fare"].is_badvalue() {
            config.fare = fare_from_yaml(&yaml_cfg["fare"])?;
        }
        if !yaml_cfg["generation"].is_badvalue() {
            config.generation = generation_from_yaml(&yaml_cfg["generation"])?;
        }
        config.seed = match get_count(&yaml_cfg["seed"], "seed")? {
            Some(seed) => Some(seed as u64),
            None => None,
        };

        Ok(config)
    }
}

impl CostConfig for MetropolisConfig {
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

fn generation_from_yaml(yaml_cfg: &Yaml) -> Result<GenerationConfig, Box<dyn Error>> {
    let mut generation = GenerationConfig::default();
    if let Some(num_taxis) = get_count(&yaml_cfg["num_taxis"], "num_taxis")? {
        generation.num_taxis = num_taxis;
    }
    if let Some(scale) = get_number(&yaml_cfg["demand_scale"], "demand_scale")? {
        generation.demand_scale = scale;
    }
    if let Some(start) = get_time_of_day(&yaml_cfg["window_start"])? {
        generation.window_start_s = start;
    }
    if let Some(end) = get_time_of_day(&yaml_cfg["window_end"])? {
        generation.window_end_s = end;
    }
    Ok(generation)
}

/// A fare is either a flat hourly rate, or a map with base and peak rates and peak hours.
fn fare_from_yaml(yaml_cfg: &Yaml) -> Result<FareFunction, Box<dyn Error>> {
    if let Yaml::Hash(_) = yaml_cfg {
        return Ok(FareFunction::Peak {
            base_per_hour: get_number(&yaml_cfg["base_per_hour"], "fare base_per_hour")?
                .ok_or("no base fare")?,
            peak_per_hour: get_number(&yaml_cfg["peak_per_hour"], "fare peak_per_hour")?
                .ok_or("no peak fare")?,
            peak_start_s: get_time_of_day(&yaml_cfg["peak_start"])?.ok_or("no peak start")?,
            peak_end_s: get_time_of_day(&yaml_cfg["peak_end"])?.ok_or("no peak end")?,
        });
    }
    let per_hour = get_number(yaml_cfg, "fare")?.ok_or("no fare")?;
    Ok(FareFunction::Flat { per_hour })
}

/// Numbers may be written as integers or reals.  None if the key is absent.
fn get_number(value: &Yaml, name: &str) -> Result<Option<f64>, Box<dyn Error>> {
    match value {
        Yaml::BadValue => Ok(None),
        Yaml::Integer(ii) => Ok(Some(*ii as f64)),
        Yaml::Real(_) => Ok(value.as_f64()),
        _ => Err(format!("{} must be a number", name).into()),
    }
}

fn get_count(value: &Yaml, name: &str) -> Result<Option<usize>, Box<dyn Error>> {
    match value {
        Yaml::BadValue => Ok(None),
        Yaml::Integer(ii) if *ii >= 0 => Ok(Some(*ii as usize)),
        Yaml::Integer(ii) => Err(format!("{} must not be negative, got {}", name, ii).into()),
        _ => Err(format!("{} must be a whole number", name).into()),
    }
}

/// Times of day are "HH:MM:SS" strings or plain numbers of seconds.
fn get_time_of_day(value: &Yaml) -> Result<Option<f64>, Box<dyn Error>> {
    match value {
        Yaml::String(timestr) => Ok(Some(get_num_seconds_from_time_str(timestr)? as f64)),
        other => get_number(other, "time of day"),
    }
}

pub fn get_num_seconds_from_time_str(timestr: &str) -> Result<u32, Box<dyn Error>> {
    let parts: Vec<&str> = timestr.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("time {:?} is not of the form HH:MM:SS", timestr).into());
    }
    let hours: u32 = parts[0].trim().parse()?;
    let minutes: u32 = parts[1].parse()?;
    let seconds: u32 = parts[2].parse()?;
    hours.checked_mul(3600)
        .and_then(|hh| minutes.checked_mul(60).and_then(|mm| hh.checked_add(mm)))
        .and_then(|hm| hm.checked_add(seconds))
        .ok_or_else(|| format!("time {:?} is out of range", timestr).into())
}
