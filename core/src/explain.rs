//! Human-readable formula text for each scheme
//!
//! Parameter values are printed as entered; index-like quantities are
//! rounded to two decimals.

use crate::config::SimulationConfig;
use crate::digital::{bit_duration, bpsk_samples_per_bit, keyed_samples_per_bit};
use crate::scheme::{AmParameters, AngleParameters, FskParameters, KeyingParameters};
use std::num::NonZeroUsize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    /// Message signal, or the bit stream for digital schemes
    pub message: String,
    /// Carrier signal(s)
    pub carrier: String,
    /// Modulation index, or the per-bit timing for digital schemes
    pub index: String,
    /// The modulated signal
    pub modulated: String,
}

pub fn am(p: &AmParameters) -> Explanation {
    let index = p.modulation_index();
    Explanation {
        message: format!("Message Signal: m(t) = {}", p.message.formula()),
        carrier: format!("Carrier Signal: c(t) = {}", p.carrier.formula()),
        index: format!("Modulation Index (m): m = {:.2}", index),
        modulated: format!(
            "AM Modulated Signal: AM(t) = {} * [1 + {:.2} * {}(2π * {} * t)] * {}(2π * {} * t)",
            p.carrier.amplitude,
            index,
            p.message.shape,
            p.message.frequency,
            p.carrier.shape,
            p.carrier.frequency
        ),
    }
}

pub fn fm(p: &AngleParameters) -> Explanation {
    Explanation {
        message: format!("Message Signal: m(t) = {}", p.message.formula()),
        carrier: format!("Carrier Signal: c(t) = {}", p.carrier.formula()),
        index: format!("Modulation Index (β): β = {:.2}", p.modulation_index),
        modulated: format!(
            "FM Modulated Signal: FM(t) = {} * {}(2π * {} * t + ({:.2} * {} / {}) * ∫m(τ)dτ)",
            p.carrier.amplitude,
            p.carrier.shape,
            p.carrier.frequency,
            p.modulation_index,
            p.message.frequency,
            p.message.amplitude
        ),
    }
}

pub fn pm(p: &AngleParameters) -> Explanation {
    Explanation {
        message: format!("Message Signal: m(t) = {}", p.message.formula()),
        carrier: format!("Carrier Signal: c(t) = {}", p.carrier.formula()),
        index: format!("Modulation Index (β): β = {:.2}", p.modulation_index),
        modulated: format!(
            "PM Modulated Signal: PM(t) = {} * {}(2π * {} * t + ({:.2} / {}) * m(t))",
            p.carrier.amplitude,
            p.carrier.shape,
            p.carrier.frequency,
            p.modulation_index,
            p.message.amplitude
        ),
    }
}

pub fn ask(p: &KeyingParameters, config: &SimulationConfig) -> Explanation {
    let bits = p.bit_stream.len();
    Explanation {
        message: format!("Bit Stream: {}", p.bit_stream),
        carrier: format!("Carrier Signal: c(t) = {}", p.carrier.formula()),
        index: bit_timing(bits, keyed_samples_per_bit(bits, config), config),
        modulated: format!(
            "ASK Modulated Signal: ASK(t) = {} if bit = 1, 0 if bit = 0",
            p.carrier.formula()
        ),
    }
}

pub fn fsk(p: &FskParameters, config: &SimulationConfig) -> Explanation {
    let bits = p.bit_stream.len();
    let carrier0 = p.carrier0().formula();
    let carrier1 = p.carrier1().formula();
    Explanation {
        message: format!("Bit Stream: {}", p.bit_stream),
        carrier: format!(
            "Carrier Signal (Bit 0): c0(t) = {}; Carrier Signal (Bit 1): c1(t) = {}",
            carrier0, carrier1
        ),
        index: bit_timing(bits, keyed_samples_per_bit(bits, config), config),
        modulated: format!(
            "FSK Modulated Signal: FSK(t) = {} if bit = 0, {} if bit = 1",
            carrier0, carrier1
        ),
    }
}

pub fn bpsk(p: &KeyingParameters, config: &SimulationConfig) -> Explanation {
    let bits = p.bit_stream.len();
    let carrier = &p.carrier;
    Explanation {
        message: format!("Bit Stream: {}", p.bit_stream),
        carrier: format!("Carrier Signal: c(t) = {}", carrier.formula()),
        index: bit_timing(bits, bpsk_samples_per_bit(bits, config), config),
        modulated: format!(
            "BPSK Modulated Signal: BPSK(t) = {} if bit = 1, {} * {}(2π * {} * t) if bit = 0",
            carrier.formula(),
            -carrier.amplitude,
            carrier.shape,
            carrier.frequency
        ),
    }
}

fn bit_timing(bits: usize, samples_per_bit: Option<NonZeroUsize>, config: &SimulationConfig) -> String {
    match samples_per_bit {
        Some(samples) => format!(
            "Bit Duration: Tb = {:.2} s ({} samples per bit)",
            bit_duration(bits, config),
            samples
        ),
        None => "Bit Duration: Tb = n/a".to_string(),
    }
}
