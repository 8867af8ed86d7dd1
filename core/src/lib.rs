//! Signal synthesis for an educational modulation visualizer
//!
//! Generates message, carrier and modulated sample sequences for analog
//! (AM, FM, PM) and digital (ASK, FSK, BPSK) schemes over a fixed window,
//! plus the formula text shown beside each chart.

pub mod error;
pub mod config;
pub mod waveform;
pub mod validate;
pub mod analog;
pub mod digital;
pub mod explain;
pub mod scheme;
pub mod render;
pub mod simulator;

pub use config::SimulationConfig;
pub use digital::BitStream;
pub use error::{Constraint, ModulationError, Result, Violation};
pub use explain::Explanation;
pub use render::{ChartSurface, ScopedCharts, Series};
pub use scheme::{
    AmParameters, AngleParameters, FskParameters, KeyingParameters, Scheme, SchemeFamily,
    SchemeKind, Simulation,
};
pub use simulator::{Simulator, UpdateError};
pub use waveform::{generate, SignalParameters, WaveformShape};

// Sampling configuration
pub const SAMPLE_RATE: usize = 1000; // samples per second
pub const DURATION_SECS: f64 = 1.0;
pub const TOTAL_SAMPLES: usize = SAMPLE_RATE; // SAMPLE_RATE * DURATION_SECS
