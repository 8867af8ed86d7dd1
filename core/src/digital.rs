use crate::config::SimulationConfig;
use crate::error::{Constraint, ModulationError, Result};
use crate::waveform::SignalParameters;
use std::f64::consts::PI;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

// Digital keying over a fixed window
//
// The window is split into one block of samples per bit. Two rounding paths
// exist and are kept apart on purpose:
// - ASK/FSK derive the block size from the bit duration:
//     floor((1 / (bits / duration)) * sample_rate)
// - BPSK divides the sample count directly:
//     floor(total_samples / bits)
// They agree whenever the bit count divides the sample count evenly.
//
// When the blocks do not fill the window the remaining tail is dropped, so
// the output holds samples_per_bit * bits samples and never more than the
// window.

/// A non-empty sequence of bits parsed from a `0`/`1` string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitStream {
    bits: Vec<bool>,
}

impl BitStream {
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(ModulationError::invalid("bit stream", Constraint::NonEmpty));
        }
        let bits = s
            .bytes()
            .map(|b| match b {
                b'0' => Ok(false),
                b'1' => Ok(true),
                _ => Err(ModulationError::invalid("bit stream", Constraint::Binary)),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { bits })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }
}

impl FromStr for BitStream {
    type Err = ModulationError;

    fn from_str(s: &str) -> Result<Self> {
        BitStream::parse(s)
    }
}

impl fmt::Display for BitStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Seconds allotted to one bit
pub fn bit_duration(bit_count: usize, config: &SimulationConfig) -> f64 {
    let bit_rate = bit_count as f64 / config.duration;
    1.0 / bit_rate
}

/// Block size for ASK and FSK, derived from the bit duration
///
/// Returns `None` when a bit would get less than one sample.
pub fn keyed_samples_per_bit(bit_count: usize, config: &SimulationConfig) -> Option<NonZeroUsize> {
    if bit_count == 0 {
        return None;
    }
    let samples = (bit_duration(bit_count, config) * config.sample_rate as f64).floor();
    NonZeroUsize::new(samples as usize)
}

/// Block size for BPSK, dividing the window's sample count by the bit count
///
/// Returns `None` when a bit would get less than one sample.
pub fn bpsk_samples_per_bit(bit_count: usize, config: &SimulationConfig) -> Option<NonZeroUsize> {
    if bit_count == 0 {
        return None;
    }
    NonZeroUsize::new(config.total_samples() / bit_count)
}

/// Amplitude shift keying: the carrier for a 1 bit, silence for a 0 bit
pub fn modulate_ask(carrier: &[f64], bits: &BitStream, samples_per_bit: NonZeroUsize) -> Vec<f64> {
    select_per_bit(carrier.len(), bits, samples_per_bit, |i, bit| {
        if bit {
            carrier[i]
        } else {
            0.0
        }
    })
}

/// Frequency shift keying: `carrier0` for a 0 bit, `carrier1` for a 1 bit
///
/// The switch is abrupt, so phase may jump at a bit boundary.
pub fn modulate_fsk(
    carrier0: &[f64],
    carrier1: &[f64],
    bits: &BitStream,
    samples_per_bit: NonZeroUsize,
) -> Vec<f64> {
    let len = carrier0.len().min(carrier1.len());
    select_per_bit(len, bits, samples_per_bit, |i, bit| {
        if bit {
            carrier1[i]
        } else {
            carrier0[i]
        }
    })
}

/// Binary phase shift keying: `Ac * (±1) * g(2π * fc * t)`
///
/// A 1 bit keeps the carrier, a 0 bit inverts it.
pub fn modulate_bpsk(
    carrier: &SignalParameters,
    bits: &BitStream,
    samples_per_bit: NonZeroUsize,
    config: &SimulationConfig,
) -> Vec<f64> {
    let total_samples = config.total_samples();
    let samples_per_bit = samples_per_bit.get();
    let w = 2.0 * PI * carrier.frequency;
    let mut signal = Vec::with_capacity(total_samples.min(samples_per_bit * bits.len()));

    for i in 0..total_samples {
        let bit = match bits.get(i / samples_per_bit) {
            Some(bit) => bit,
            None => break,
        };
        let bit_value = if bit { 1.0 } else { -1.0 };
        let t = config.time_at(i);
        signal.push(carrier.amplitude * bit_value * carrier.shape.apply(w * t));
    }

    signal
}

/// Walk `len` samples in blocks of `samples_per_bit`, letting `pick` choose
/// each output sample from the current bit
///
/// The bit index advances after every `samples_per_bit`-th sample and the
/// walk stops as soon as it runs past the last bit.
fn select_per_bit<F>(len: usize, bits: &BitStream, samples_per_bit: NonZeroUsize, pick: F) -> Vec<f64>
where
    F: Fn(usize, bool) -> f64,
{
    let samples_per_bit = samples_per_bit.get();
    let mut signal = Vec::with_capacity(len.min(samples_per_bit * bits.len()));
    let mut bit_index = 0;

    for i in 0..len {
        let bit = match bits.get(bit_index) {
            Some(bit) => bit,
            None => break,
        };
        signal.push(pick(i, bit));

        if (i + 1) % samples_per_bit == 0 {
            bit_index += 1;
        }
    }

    signal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::WaveformShape;

    fn spb(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn cosine(amplitude: f64, frequency: f64) -> SignalParameters {
        SignalParameters::new(amplitude, frequency, WaveformShape::Cosine)
    }

    #[test]
    fn test_bit_stream_parse() {
        let bits = BitStream::parse("1101011").unwrap();
        assert_eq!(bits.len(), 7);
        assert!(!bits.is_empty());
        assert_eq!(bits.get(0), Some(true));
        assert_eq!(bits.get(2), Some(false));
        assert_eq!(bits.get(7), None);
        assert_eq!(bits.to_string(), "1101011");

        assert!(BitStream::parse("").is_err());
        assert!(BitStream::parse("0120").is_err());
        assert!("10x".parse::<BitStream>().is_err());
    }

    #[test]
    fn test_samples_per_bit_paths() {
        let config = SimulationConfig::default();

        assert_eq!(keyed_samples_per_bit(2, &config), Some(spb(500)));
        assert_eq!(bpsk_samples_per_bit(2, &config), Some(spb(500)));

        assert_eq!(keyed_samples_per_bit(7, &config), Some(spb(142)));
        assert_eq!(bpsk_samples_per_bit(7, &config), Some(spb(142)));

        assert_eq!(keyed_samples_per_bit(3, &config), Some(spb(333)));
        assert_eq!(bpsk_samples_per_bit(3, &config), Some(spb(333)));

        assert_eq!(keyed_samples_per_bit(1001, &config), None);
        assert_eq!(bpsk_samples_per_bit(1001, &config), None);
        assert_eq!(bpsk_samples_per_bit(0, &config), None);
        assert_eq!(keyed_samples_per_bit(0, &config), None);
    }

    #[test]
    fn test_ask_halves() {
        let config = SimulationConfig::default();
        let carrier = cosine(1.0, 10.0).generate(&config);
        let bits = BitStream::parse("10").unwrap();

        let ask = modulate_ask(&carrier, &bits, spb(500));

        assert_eq!(ask.len(), 1000);
        assert_eq!(&ask[..500], &carrier[..500]);
        assert!(ask[500..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_ask_truncates_tail() {
        let config = SimulationConfig::default();
        let carrier = cosine(1.0, 10.0).generate(&config);
        let bits = BitStream::parse("1101011").unwrap();

        let ask = modulate_ask(&carrier, &bits, spb(142));
        assert_eq!(ask.len(), 142 * 7);
        // Last bit is '1'
        assert_eq!(ask[993], carrier[993]);
    }

    #[test]
    fn test_ask_single_sample_bits() {
        let carrier = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let bits = BitStream::parse("1010").unwrap();

        let ask = modulate_ask(&carrier, &bits, spb(1));
        assert_eq!(ask, vec![1.0, 0.0, 3.0, 0.0]);
    }

    #[test]
    fn test_fsk_halves() {
        let config = SimulationConfig::default();
        let carrier0 = cosine(1.0, 10.0).generate(&config);
        let carrier1 = cosine(1.0, 20.0).generate(&config);
        let bits = BitStream::parse("01").unwrap();

        let fsk = modulate_fsk(&carrier0, &carrier1, &bits, spb(500));

        assert_eq!(fsk.len(), 1000);
        assert_eq!(&fsk[..500], &carrier0[..500]);
        assert_eq!(&fsk[500..], &carrier1[500..]);
    }

    #[test]
    fn test_bpsk_matches_carrier_for_ones() {
        let config = SimulationConfig::default();
        let params = cosine(1.0, 10.0);
        let carrier = params.generate(&config);
        let bits = BitStream::parse("11").unwrap();

        let bpsk = modulate_bpsk(&params, &bits, spb(500), &config);
        assert_eq!(bpsk, carrier);
    }

    #[test]
    fn test_bpsk_zero_bit_negates_exactly() {
        let config = SimulationConfig::default();
        let params = cosine(1.0, 10.0);
        let ones = modulate_bpsk(&params, &BitStream::parse("11").unwrap(), spb(500), &config);
        let flipped = modulate_bpsk(&params, &BitStream::parse("10").unwrap(), spb(500), &config);

        assert_eq!(&flipped[..500], &ones[..500]);
        for (a, b) in flipped[500..].iter().zip(&ones[500..]) {
            assert_eq!(*a, -*b);
        }
    }

    #[test]
    fn test_bpsk_truncates_tail() {
        let config = SimulationConfig::default();
        let bits = BitStream::parse("101").unwrap();
        let bpsk = modulate_bpsk(&cosine(1.0, 10.0), &bits, spb(333), &config);
        assert_eq!(bpsk.len(), 999);
    }
}
