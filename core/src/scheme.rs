use crate::analog::{am_modulation_index, modulate_am, modulate_fm, modulate_pm};
use crate::config::SimulationConfig;
use crate::digital::{
    bpsk_samples_per_bit, keyed_samples_per_bit, modulate_ask, modulate_bpsk, modulate_fsk,
    BitStream,
};
use crate::error::{Constraint, ModulationError, Result};
use crate::explain::{self, Explanation};
use crate::render::Series;
use crate::validate::Validator;
use crate::waveform::{SignalParameters, WaveformShape};
use log::debug;
use std::fmt;
use std::num::NonZeroUsize;

// Default parameters per scheme
pub const DEFAULT_MESSAGE_AMPLITUDE: f64 = 1.0;
pub const DEFAULT_MESSAGE_FREQUENCY: f64 = 2.0; // Hz
pub const DEFAULT_ANALOG_CARRIER_AMPLITUDE: f64 = 2.0;
pub const DEFAULT_ANALOG_CARRIER_FREQUENCY: f64 = 20.0; // Hz
pub const DEFAULT_ANGLE_MODULATION_INDEX: f64 = 5.0;
pub const DEFAULT_BIT_STREAM: &str = "1101011";
pub const DEFAULT_DIGITAL_CARRIER_AMPLITUDE: f64 = 1.0;
pub const DEFAULT_DIGITAL_CARRIER_FREQUENCY: f64 = 10.0; // Hz
pub const DEFAULT_FSK_FREQUENCY0: f64 = 10.0; // Hz, bit 0
pub const DEFAULT_FSK_FREQUENCY1: f64 = 20.0; // Hz, bit 1

// Chart colours
const MESSAGE_COLOR: &str = "blue";
const CARRIER_COLOR: &str = "green";
const MODULATED_COLOR: &str = "red";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemeFamily {
    Analog,
    Digital,
}

impl fmt::Display for SchemeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchemeFamily::Analog => "analog",
            SchemeFamily::Digital => "digital",
        })
    }
}

/// Which modulation scheme, without its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemeKind {
    Am,
    Fm,
    Pm,
    Ask,
    Fsk,
    Bpsk,
}

impl SchemeKind {
    pub const ALL: [SchemeKind; 6] = [
        SchemeKind::Am,
        SchemeKind::Pm,
        SchemeKind::Fm,
        SchemeKind::Ask,
        SchemeKind::Bpsk,
        SchemeKind::Fsk,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SchemeKind::Am => "AM",
            SchemeKind::Fm => "FM",
            SchemeKind::Pm => "PM",
            SchemeKind::Ask => "ASK",
            SchemeKind::Fsk => "FSK",
            SchemeKind::Bpsk => "BPSK",
        }
    }

    pub fn family(self) -> SchemeFamily {
        match self {
            SchemeKind::Am | SchemeKind::Fm | SchemeKind::Pm => SchemeFamily::Analog,
            SchemeKind::Ask | SchemeKind::Fsk | SchemeKind::Bpsk => SchemeFamily::Digital,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SchemeKind::Am => "Amplitude modulation: the message scales the carrier envelope",
            SchemeKind::Fm => "Frequency modulation: the message integral shifts the carrier phase",
            SchemeKind::Pm => "Phase modulation: the message directly offsets the carrier phase",
            SchemeKind::Ask => "Amplitude shift keying: carrier on for 1, off for 0",
            SchemeKind::Fsk => "Frequency shift keying: one carrier frequency per bit value",
            SchemeKind::Bpsk => "Binary phase shift keying: carrier inverted for 0",
        }
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// AM snapshot; the modulation index follows from the two amplitudes
#[derive(Debug, Clone, PartialEq)]
pub struct AmParameters {
    pub message: SignalParameters,
    pub carrier: SignalParameters,
}

impl AmParameters {
    pub fn modulation_index(&self) -> f64 {
        am_modulation_index(self.message.amplitude, self.carrier.amplitude)
    }
}

/// FM or PM snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct AngleParameters {
    pub message: SignalParameters,
    pub carrier: SignalParameters,
    pub modulation_index: f64,
}

/// ASK or BPSK snapshot; `bit_stream` is the raw user input
#[derive(Debug, Clone, PartialEq)]
pub struct KeyingParameters {
    pub bit_stream: String,
    pub carrier: SignalParameters,
}

/// FSK snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct FskParameters {
    pub bit_stream: String,
    pub carrier_amplitude: f64,
    /// Hz, sent for a 0 bit
    pub frequency0: f64,
    /// Hz, sent for a 1 bit
    pub frequency1: f64,
    pub shape: WaveformShape,
}

impl FskParameters {
    pub fn carrier0(&self) -> SignalParameters {
        SignalParameters::new(self.carrier_amplitude, self.frequency0, self.shape)
    }

    pub fn carrier1(&self) -> SignalParameters {
        SignalParameters::new(self.carrier_amplitude, self.frequency1, self.shape)
    }
}

/// Immutable parameter snapshot for one update pass
#[derive(Debug, Clone, PartialEq)]
pub enum Scheme {
    Am(AmParameters),
    Fm(AngleParameters),
    Pm(AngleParameters),
    Ask(KeyingParameters),
    Fsk(FskParameters),
    Bpsk(KeyingParameters),
}

/// Everything one pass hands to the presentation side
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub kind: SchemeKind,
    pub time_axis: Vec<f64>,
    pub series: Vec<Series>,
}

impl Simulation {
    /// The last series is always the modulated signal
    pub fn modulated(&self) -> Option<&Series> {
        self.series.last()
    }
}

impl Scheme {
    /// The parameters a freshly opened view starts with
    pub fn default_for(kind: SchemeKind) -> Scheme {
        let message = SignalParameters::new(
            DEFAULT_MESSAGE_AMPLITUDE,
            DEFAULT_MESSAGE_FREQUENCY,
            WaveformShape::Sine,
        );
        let analog_carrier = SignalParameters::new(
            DEFAULT_ANALOG_CARRIER_AMPLITUDE,
            DEFAULT_ANALOG_CARRIER_FREQUENCY,
            WaveformShape::Cosine,
        );
        let digital_carrier = SignalParameters::new(
            DEFAULT_DIGITAL_CARRIER_AMPLITUDE,
            DEFAULT_DIGITAL_CARRIER_FREQUENCY,
            WaveformShape::Cosine,
        );
        let angle = AngleParameters {
            message,
            carrier: analog_carrier,
            modulation_index: DEFAULT_ANGLE_MODULATION_INDEX,
        };
        let keying = KeyingParameters {
            bit_stream: DEFAULT_BIT_STREAM.to_string(),
            carrier: digital_carrier,
        };

        match kind {
            SchemeKind::Am => Scheme::Am(AmParameters {
                message: SignalParameters {
                    shape: WaveformShape::Cosine,
                    ..message
                },
                carrier: analog_carrier,
            }),
            SchemeKind::Fm => Scheme::Fm(angle),
            SchemeKind::Pm => Scheme::Pm(angle),
            SchemeKind::Ask => Scheme::Ask(keying),
            SchemeKind::Bpsk => Scheme::Bpsk(keying),
            SchemeKind::Fsk => Scheme::Fsk(FskParameters {
                bit_stream: DEFAULT_BIT_STREAM.to_string(),
                carrier_amplitude: DEFAULT_DIGITAL_CARRIER_AMPLITUDE,
                frequency0: DEFAULT_FSK_FREQUENCY0,
                frequency1: DEFAULT_FSK_FREQUENCY1,
                shape: WaveformShape::Cosine,
            }),
        }
    }

    pub fn kind(&self) -> SchemeKind {
        match self {
            Scheme::Am(_) => SchemeKind::Am,
            Scheme::Fm(_) => SchemeKind::Fm,
            Scheme::Pm(_) => SchemeKind::Pm,
            Scheme::Ask(_) => SchemeKind::Ask,
            Scheme::Fsk(_) => SchemeKind::Fsk,
            Scheme::Bpsk(_) => SchemeKind::Bpsk,
        }
    }

    /// Check every parameter the scheme depends on
    ///
    /// All failures are reported together. The window itself must be valid
    /// too, since bit streams may not be longer than its sample count.
    pub fn validate(&self, config: &SimulationConfig) -> Result<()> {
        config.validate()?;
        let capacity = config.total_samples();

        match self {
            Scheme::Am(p) => Validator::new()
                .non_negative("message amplitude", p.message.amplitude)
                .positive("carrier amplitude", p.carrier.amplitude)
                .positive("carrier frequency", p.carrier.frequency)
                .positive("message frequency", p.message.frequency)
                .finish(),
            // The message amplitude is a divisor for both angle schemes
            Scheme::Fm(p) | Scheme::Pm(p) => Validator::new()
                .positive("message amplitude", p.message.amplitude)
                .positive("carrier amplitude", p.carrier.amplitude)
                .positive("carrier frequency", p.carrier.frequency)
                .positive("message frequency", p.message.frequency)
                .positive("modulation index", p.modulation_index)
                .finish(),
            Scheme::Ask(p) | Scheme::Bpsk(p) => Validator::new()
                .positive("carrier amplitude", p.carrier.amplitude)
                .positive("carrier frequency", p.carrier.frequency)
                .bit_stream("bit stream", &p.bit_stream, capacity)
                .finish(),
            Scheme::Fsk(p) => Validator::new()
                .positive("carrier amplitude", p.carrier_amplitude)
                .positive("frequency 0", p.frequency0)
                .positive("frequency 1", p.frequency1)
                .bit_stream("bit stream", &p.bit_stream, capacity)
                .finish(),
        }
    }

    /// Validate, then generate every series for this scheme
    ///
    /// Series order is message (analog only), carrier(s), modulated.
    pub fn simulate(&self, config: &SimulationConfig) -> Result<Simulation> {
        self.validate(config)?;

        let series = match self {
            Scheme::Am(p) => {
                let message = p.message.generate(config);
                let carrier = p.carrier.generate(config);
                let modulated = modulate_am(&carrier, &message, p.modulation_index());
                vec![
                    Series::new("Message Signal", MESSAGE_COLOR, message),
                    Series::new("Carrier Signal", CARRIER_COLOR, carrier),
                    Series::new("AM Modulated Signal", MODULATED_COLOR, modulated),
                ]
            }
            Scheme::Fm(p) => {
                let message = p.message.generate(config);
                let carrier = p.carrier.generate(config);
                let modulated = modulate_fm(
                    &message,
                    &p.message,
                    &p.carrier,
                    p.modulation_index,
                    config.sample_rate,
                );
                vec![
                    Series::new("Message Signal", MESSAGE_COLOR, message),
                    Series::new("Carrier Signal", CARRIER_COLOR, carrier),
                    Series::new("FM Modulated Signal", MODULATED_COLOR, modulated),
                ]
            }
            Scheme::Pm(p) => {
                let message = p.message.generate(config);
                let carrier = p.carrier.generate(config);
                let modulated = modulate_pm(
                    &message,
                    p.message.amplitude,
                    &p.carrier,
                    p.modulation_index,
                    config.sample_rate,
                );
                vec![
                    Series::new("Message Signal", MESSAGE_COLOR, message),
                    Series::new("Carrier Signal", CARRIER_COLOR, carrier),
                    Series::new("PM Modulated Signal", MODULATED_COLOR, modulated),
                ]
            }
            Scheme::Ask(p) => {
                let bits = BitStream::parse(&p.bit_stream)?;
                let samples_per_bit = require_block(keyed_samples_per_bit(bits.len(), config))?;
                debug!("ASK: {} bits, {} samples per bit", bits.len(), samples_per_bit);

                let carrier = p.carrier.generate(config);
                let modulated = modulate_ask(&carrier, &bits, samples_per_bit);
                vec![
                    Series::new("Carrier Signal", CARRIER_COLOR, carrier),
                    Series::new("ASK Modulated Signal", MODULATED_COLOR, modulated),
                ]
            }
            Scheme::Fsk(p) => {
                let bits = BitStream::parse(&p.bit_stream)?;
                let samples_per_bit = require_block(keyed_samples_per_bit(bits.len(), config))?;
                debug!("FSK: {} bits, {} samples per bit", bits.len(), samples_per_bit);

                let carrier0 = p.carrier0().generate(config);
                let carrier1 = p.carrier1().generate(config);
                let modulated = modulate_fsk(&carrier0, &carrier1, &bits, samples_per_bit);
                vec![
                    Series::new("Carrier Signal (Bit 0)", MESSAGE_COLOR, carrier0),
                    Series::new("Carrier Signal (Bit 1)", CARRIER_COLOR, carrier1),
                    Series::new("FSK Modulated Signal", MODULATED_COLOR, modulated),
                ]
            }
            Scheme::Bpsk(p) => {
                let bits = BitStream::parse(&p.bit_stream)?;
                let samples_per_bit = require_block(bpsk_samples_per_bit(bits.len(), config))?;
                debug!("BPSK: {} bits, {} samples per bit", bits.len(), samples_per_bit);

                let carrier = p.carrier.generate(config);
                let modulated = modulate_bpsk(&p.carrier, &bits, samples_per_bit, config);
                vec![
                    Series::new("Carrier Signal", CARRIER_COLOR, carrier),
                    Series::new("BPSK Modulated Signal", MODULATED_COLOR, modulated),
                ]
            }
        };

        debug!(
            "{}: generated {} series over {} samples",
            self.kind(),
            series.len(),
            config.total_samples()
        );

        Ok(Simulation {
            kind: self.kind(),
            time_axis: config.time_axis(),
            series,
        })
    }

    /// Formula text shown beside the charts
    pub fn explain(&self, config: &SimulationConfig) -> Explanation {
        match self {
            Scheme::Am(p) => explain::am(p),
            Scheme::Fm(p) => explain::fm(p),
            Scheme::Pm(p) => explain::pm(p),
            Scheme::Ask(p) => explain::ask(p, config),
            Scheme::Fsk(p) => explain::fsk(p, config),
            Scheme::Bpsk(p) => explain::bpsk(p, config),
        }
    }
}

// Validation already caps the bit count at the sample count, so this only
// fires when float rounding of the bit duration lands below one sample.
fn require_block(samples_per_bit: Option<NonZeroUsize>) -> Result<NonZeroUsize> {
    samples_per_bit.ok_or_else(|| ModulationError::invalid("samples per bit", Constraint::Positive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = SimulationConfig::default();
        for kind in SchemeKind::ALL {
            let scheme = Scheme::default_for(kind);
            assert_eq!(scheme.kind(), kind);
            assert!(scheme.validate(&config).is_ok(), "{} defaults rejected", kind);
        }
    }

    #[test]
    fn test_series_layout() {
        let config = SimulationConfig::default();
        let expected = [
            (SchemeKind::Am, vec!["Message Signal", "Carrier Signal", "AM Modulated Signal"]),
            (SchemeKind::Fm, vec!["Message Signal", "Carrier Signal", "FM Modulated Signal"]),
            (SchemeKind::Pm, vec!["Message Signal", "Carrier Signal", "PM Modulated Signal"]),
            (SchemeKind::Ask, vec!["Carrier Signal", "ASK Modulated Signal"]),
            (
                SchemeKind::Fsk,
                vec!["Carrier Signal (Bit 0)", "Carrier Signal (Bit 1)", "FSK Modulated Signal"],
            ),
            (SchemeKind::Bpsk, vec!["Carrier Signal", "BPSK Modulated Signal"]),
        ];

        for (kind, labels) in expected {
            let simulation = Scheme::default_for(kind).simulate(&config).unwrap();
            let actual: Vec<_> = simulation.series.iter().map(|s| s.label).collect();
            assert_eq!(actual, labels, "Wrong series for {}", kind);
            assert_eq!(simulation.time_axis.len(), 1000);
            assert_eq!(simulation.modulated().unwrap().color, "red");
        }
    }

    #[test]
    fn test_am_allows_silent_message() {
        let config = SimulationConfig::default();
        let mut scheme = Scheme::default_for(SchemeKind::Am);
        if let Scheme::Am(p) = &mut scheme {
            p.message.amplitude = 0.0;
        }
        assert!(scheme.simulate(&config).is_ok());
    }

    #[test]
    fn test_fm_rejects_silent_message() {
        let config = SimulationConfig::default();
        let mut scheme = Scheme::default_for(SchemeKind::Fm);
        if let Scheme::Fm(p) = &mut scheme {
            p.message.amplitude = 0.0;
        }
        let err = scheme.simulate(&config).unwrap_err();
        assert_eq!(err.violations()[0].field, "message amplitude");
    }

    #[test]
    fn test_angle_schemes_reject_bad_index() {
        let config = SimulationConfig::default();
        for index in [f64::NAN, f64::INFINITY, -5.0, 0.0] {
            for kind in [SchemeKind::Fm, SchemeKind::Pm] {
                let mut scheme = Scheme::default_for(kind);
                if let Scheme::Fm(p) | Scheme::Pm(p) = &mut scheme {
                    p.modulation_index = index;
                }
                let err = scheme.simulate(&config).unwrap_err();
                assert_eq!(err.violations().len(), 1, "{} with index {}", kind, index);
                assert_eq!(err.violations()[0].field, "modulation index");
            }
        }
    }

    #[test]
    fn test_bit_stream_longer_than_window() {
        let config = SimulationConfig::default();
        let scheme = Scheme::Ask(KeyingParameters {
            bit_stream: "1".repeat(1001),
            carrier: SignalParameters::new(1.0, 10.0, WaveformShape::Cosine),
        });
        let err = scheme.simulate(&config).unwrap_err();
        assert_eq!(err.violations()[0].constraint, Constraint::AtMost(1000));
    }

    #[test]
    fn test_invalid_window_is_rejected() {
        let config = SimulationConfig {
            sample_rate: 0,
            duration: 1.0,
        };
        assert!(Scheme::default_for(SchemeKind::Am).simulate(&config).is_err());
    }

    #[test]
    fn test_kind_family() {
        assert_eq!(SchemeKind::Ask.family(), SchemeFamily::Digital);
        assert_eq!(SchemeKind::Pm.family(), SchemeFamily::Analog);
    }
}
