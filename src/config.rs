use std::path::PathBuf;

use crate::{error::ConfigError, types::MotionMode};

pub const FRAME_HZ: f32 = 60.0;

pub const CELL_WIDTH_PX: f32 = 4.0;
pub const CELL_HEIGHT_PX: f32 = 8.0;

pub const DEFAULT_POPULATION: usize = 200;
pub const DEFAULT_FREQUENCY_MS: u64 = 10;
pub const DEFAULT_TEMPERATURE: f32 = 1.0;

pub const PROXIMITY_SIMPLE: f32 = 250.0;
pub const PROXIMITY_SOCIAL: f32 = 1000.0;

pub const COHESION_RATE: f32 = 0.05;
pub const SIMPLE_TURN: f32 = 0.4;
pub const DIRECTION_MODIFIER: f32 = 4.0;
pub const POPULATION_WEIGHT_DIVISOR: f32 = 6.0;

pub const SPEED_BASE: f32 = 0.8;
pub const SPEED_JITTER: f32 = 0.6;
pub const RADIUS_MAX: f32 = 5.0;
pub const DIRECTION_INIT_MAX: f32 = 6.0;
pub const ATTRACTIVENESS_MIN: f32 = -0.5;
pub const ATTRACTIVENESS_MAX: f32 = 1.5;
pub const ATTRACTEDNESS_MIN: f32 = 0.0;
pub const ATTRACTEDNESS_MAX: f32 = 1.0;

pub const INITIAL_BIAS: f32 = 0.05;
pub const BIAS_STEP: f32 = 0.01;

pub const FADE_INNER_ALPHA: f32 = 0.1;
pub const FADE_OUTER_ALPHA: f32 = 0.1;
pub const FADE_RGB: (u8, u8, u8) = (18, 18, 18);
pub const FADE_CUTOFF: f32 = 0.04;

/// Runtime choices for one simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub population: usize,
    pub frame_limit: Option<u64>,
    pub mode: MotionMode,
    pub frequency_ms: u64,
    pub temperature: f32,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            population: DEFAULT_POPULATION,
            frame_limit: None,
            mode: MotionMode::Social,
            frequency_ms: DEFAULT_FREQUENCY_MS,
            temperature: DEFAULT_TEMPERATURE,
            seed: None,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }
        if self.frequency_ms == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        Ok(())
    }

    pub fn proximity(&self) -> f32 {
        match self.mode {
            MotionMode::Simple => PROXIMITY_SIMPLE,
            MotionMode::Social => PROXIMITY_SOCIAL,
        }
    }

    /// Weight of the focal point in the social pull; never negative.
    pub fn population_weight(&self) -> f32 {
        self.population as f32 / POPULATION_WEIGHT_DIVISOR
    }
}
