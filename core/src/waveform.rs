use crate::config::SimulationConfig;
use crate::error::{Constraint, ModulationError};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Trigonometric function used for a base waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveformShape {
    Sine,
    Cosine,
}

impl WaveformShape {
    const SPELLINGS: &'static [&'static str] = &["sin", "sine", "cos", "cosine"];

    /// Evaluate the shape at `phase` radians
    #[inline]
    pub fn apply(self, phase: f64) -> f64 {
        match self {
            WaveformShape::Sine => phase.sin(),
            WaveformShape::Cosine => phase.cos(),
        }
    }

    /// Short name used in formula text
    pub fn as_str(self) -> &'static str {
        match self {
            WaveformShape::Sine => "sin",
            WaveformShape::Cosine => "cos",
        }
    }
}

impl fmt::Display for WaveformShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaveformShape {
    type Err = ModulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sin" | "sine" => Ok(WaveformShape::Sine),
            "cos" | "cosine" => Ok(WaveformShape::Cosine),
            _ => Err(ModulationError::invalid(
                "waveform shape",
                Constraint::OneOf(Self::SPELLINGS),
            )),
        }
    }
}

/// Amplitude, frequency and shape of one base waveform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalParameters {
    pub amplitude: f64,
    /// Hz
    pub frequency: f64,
    pub shape: WaveformShape,
}

impl SignalParameters {
    pub fn new(amplitude: f64, frequency: f64, shape: WaveformShape) -> Self {
        Self {
            amplitude,
            frequency,
            shape,
        }
    }

    /// Sample this waveform over the configured window
    pub fn generate(&self, config: &SimulationConfig) -> Vec<f64> {
        generate(
            self.frequency,
            self.amplitude,
            self.shape,
            config.sample_rate,
            config.duration,
        )
    }

    /// `A * shape(2π * f * t)` as shown beside the charts
    pub fn formula(&self) -> String {
        format!(
            "{} * {}(2π * {} * t)",
            self.amplitude, self.shape, self.frequency
        )
    }
}

/// Sample `amplitude * shape(2π * frequency * t)` for `t = i / sample_rate`
///
/// Produces `sample_rate * duration` samples (rounded up). Parameters are
/// expected to be validated by the caller.
pub fn generate(
    frequency: f64,
    amplitude: f64,
    shape: WaveformShape,
    sample_rate: usize,
    duration: f64,
) -> Vec<f64> {
    let num_samples = (sample_rate as f64 * duration).ceil() as usize;
    let rate = sample_rate as f64;

    (0..num_samples)
        .map(|i| {
            let t = i as f64 / rate;
            amplitude * shape.apply(2.0 * PI * frequency * t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length_and_origin() {
        let cosine = generate(20.0, 2.0, WaveformShape::Cosine, 1000, 1.0);
        let sine = generate(20.0, 2.0, WaveformShape::Sine, 1000, 1.0);

        assert_eq!(cosine.len(), 1000);
        assert_eq!(sine.len(), 1000);
        assert_eq!(cosine[0], 2.0);
        assert_eq!(sine[0], 0.0);
    }

    #[test]
    fn test_generate_is_bounded_by_amplitude() {
        let samples = generate(7.0, 3.5, WaveformShape::Sine, 1000, 1.0);
        for sample in &samples {
            assert!(sample.abs() <= 3.5 + 1e-12, "Sample out of bounds: {}", sample);
        }
    }

    #[test]
    fn test_generate_quarter_period() {
        // 1 Hz sine peaks at t = 0.25 s
        let samples = generate(1.0, 1.0, WaveformShape::Sine, 1000, 1.0);
        assert!((samples[250] - 1.0).abs() < 1e-12);
        assert!(samples[500].abs() < 1e-12);
        assert!((samples[750] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_parameters_generate_matches_free_function() {
        let params = SignalParameters::new(1.5, 12.0, WaveformShape::Cosine);
        let config = SimulationConfig::default();
        assert_eq!(
            params.generate(&config),
            generate(12.0, 1.5, WaveformShape::Cosine, 1000, 1.0)
        );
    }

    #[test]
    fn test_shape_parsing() {
        assert_eq!("sin".parse::<WaveformShape>().unwrap(), WaveformShape::Sine);
        assert_eq!("Cosine".parse::<WaveformShape>().unwrap(), WaveformShape::Cosine);
        assert_eq!(" cos ".parse::<WaveformShape>().unwrap(), WaveformShape::Cosine);
        assert!("square".parse::<WaveformShape>().is_err());
    }

    #[test]
    fn test_formula_text() {
        let params = SignalParameters::new(2.0, 20.0, WaveformShape::Cosine);
        assert_eq!(params.formula(), "2 * cos(2π * 20 * t)");

        let params = SignalParameters::new(0.5, 2.5, WaveformShape::Sine);
        assert_eq!(params.formula(), "0.5 * sin(2π * 2.5 * t)");
    }
}
