use crate::error::{Constraint, ModulationError, Result};
use crate::{DURATION_SECS, SAMPLE_RATE};

/// Sampling window shared by every chart of one update pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Samples per second
    pub sample_rate: usize,
    /// Window length in seconds
    pub duration: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            duration: DURATION_SECS,
        }
    }
}

impl SimulationConfig {
    pub fn new(sample_rate: usize, duration: f64) -> Result<Self> {
        let config = Self {
            sample_rate,
            duration,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ModulationError::invalid("sample rate", Constraint::Positive));
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ModulationError::invalid("duration", Constraint::Positive));
        }
        Ok(())
    }

    /// Number of samples in the window
    ///
    /// A fractional product rounds up, so the last partial sample period
    /// still gets a sample.
    pub fn total_samples(&self) -> usize {
        (self.sample_rate as f64 * self.duration).ceil() as usize
    }

    /// Time stamp of sample `index` in seconds
    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 / self.sample_rate as f64
    }

    /// The shared time axis, `t[i] = i / sample_rate`
    pub fn time_axis(&self) -> Vec<f64> {
        (0..self.total_samples()).map(|i| self.time_at(i)).collect()
    }
}
