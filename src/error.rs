//! Error types for settings validation

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("temperature must be finite and non-negative, got {0}")]
    InvalidTemperature(f32),

    #[error("spawn frequency must be at least 1 ms")]
    ZeroFrequency,
}
