use crate::waveform::SignalParameters;
use std::f64::consts::PI;

/// AM modulation index, message amplitude over carrier amplitude
pub fn am_modulation_index(message_amplitude: f64, carrier_amplitude: f64) -> f64 {
    message_amplitude / carrier_amplitude
}

/// Amplitude modulation: `(1 + index * m[i]) * c[i]`
///
/// The output is as long as the shorter input.
pub fn modulate_am(carrier: &[f64], message: &[f64], modulation_index: f64) -> Vec<f64> {
    carrier
        .iter()
        .zip(message)
        .map(|(&c, &m)| (1.0 + modulation_index * m) * c)
        .collect()
}

/// Frequency modulation driven by a running integral of the message
///
/// The integral uses a left Riemann sum, `integral += m[i] / sample_rate`,
/// and is updated before it is used for sample `i`. Instantaneous phase is
/// `2π * (fc * t + (β * fm / Am) * integral)`.
pub fn modulate_fm(
    message: &[f64],
    message_params: &SignalParameters,
    carrier: &SignalParameters,
    modulation_index: f64,
    sample_rate: usize,
) -> Vec<f64> {
    let rate = sample_rate as f64;
    let deviation = modulation_index * message_params.frequency / message_params.amplitude;
    let mut integral = 0.0;

    message
        .iter()
        .enumerate()
        .map(|(i, &m)| {
            let t = i as f64 / rate;
            integral += m / rate;
            let phase = 2.0 * PI * (carrier.frequency * t + deviation * integral);
            carrier.amplitude * carrier.shape.apply(phase)
        })
        .collect()
}

/// Phase modulation: phase offset proportional to the instantaneous message
///
/// `Ac * g(2π * (fc * t + (β / Am) * m[i]))`
pub fn modulate_pm(
    message: &[f64],
    message_amplitude: f64,
    carrier: &SignalParameters,
    modulation_index: f64,
    sample_rate: usize,
) -> Vec<f64> {
    let rate = sample_rate as f64;
    let sensitivity = modulation_index / message_amplitude;

    message
        .iter()
        .enumerate()
        .map(|(i, &m)| {
            let t = i as f64 / rate;
            let phase = 2.0 * PI * (carrier.frequency * t + sensitivity * m);
            carrier.amplitude * carrier.shape.apply(phase)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::waveform::WaveformShape;

    fn params(amplitude: f64, frequency: f64, shape: WaveformShape) -> SignalParameters {
        SignalParameters::new(amplitude, frequency, shape)
    }

    #[test]
    fn test_am_reference_sample() {
        let config = SimulationConfig::default();
        let carrier = params(2.0, 20.0, WaveformShape::Cosine).generate(&config);
        let message = params(1.0, 2.0, WaveformShape::Cosine).generate(&config);
        let index = am_modulation_index(1.0, 2.0);

        let am = modulate_am(&carrier, &message, index);

        assert_eq!(index, 0.5);
        assert_eq!(am.len(), 1000);
        assert_eq!(am[0], 3.0);
    }

    #[test]
    fn test_am_zero_message_is_carrier() {
        let config = SimulationConfig::default();
        let carrier = params(2.0, 20.0, WaveformShape::Sine).generate(&config);
        let message = params(0.0, 2.0, WaveformShape::Cosine).generate(&config);

        let am = modulate_am(&carrier, &message, am_modulation_index(0.0, 2.0));
        assert_eq!(am, carrier);
    }

    #[test]
    fn test_am_envelope_bound() {
        let config = SimulationConfig::default();
        let carrier = params(2.0, 20.0, WaveformShape::Cosine).generate(&config);
        let message = params(1.0, 2.0, WaveformShape::Sine).generate(&config);
        let am = modulate_am(&carrier, &message, 0.5);

        // |(1 + 0.5 m) c| <= (1 + 0.5) * 2
        for sample in &am {
            assert!(sample.abs() <= 3.0 + 1e-12);
        }
    }

    #[test]
    fn test_fm_integral_accumulates_before_use() {
        // Constant message of 1.0: after sample 0 the integral is already 1/fs
        let message = vec![1.0; 4];
        let message_params = params(1.0, 1.0, WaveformShape::Cosine);
        let carrier = params(1.0, 0.0, WaveformShape::Sine);

        let fm = modulate_fm(&message, &message_params, &carrier, 1.0, 1000);

        let expected_first = (2.0 * PI * (1.0 / 1000.0)).sin();
        assert!((fm[0] - expected_first).abs() < 1e-15);
        let expected_last = (2.0 * PI * (4.0 / 1000.0)).sin();
        assert!((fm[3] - expected_last).abs() < 1e-12);
    }

    #[test]
    fn test_fm_zero_index_is_plain_carrier() {
        let config = SimulationConfig::default();
        let message_params = params(1.0, 2.0, WaveformShape::Sine);
        let carrier = params(2.0, 20.0, WaveformShape::Cosine);
        let message = message_params.generate(&config);

        let fm = modulate_fm(&message, &message_params, &carrier, 0.0, config.sample_rate);
        let plain = carrier.generate(&config);

        for (a, b) in fm.iter().zip(&plain) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fm_preserves_carrier_amplitude() {
        let config = SimulationConfig::default();
        let message_params = params(1.0, 2.0, WaveformShape::Sine);
        let carrier = params(2.0, 20.0, WaveformShape::Cosine);
        let message = message_params.generate(&config);

        let fm = modulate_fm(&message, &message_params, &carrier, 5.0, config.sample_rate);

        assert_eq!(fm.len(), 1000);
        assert!(fm.iter().all(|s| s.abs() <= 2.0 + 1e-12));
    }

    #[test]
    fn test_pm_reference_sample() {
        // m(0) = Am for a cosine message, so phase(0) = 2π * β
        let config = SimulationConfig::default();
        let message_params = params(1.0, 2.0, WaveformShape::Cosine);
        let carrier = params(2.0, 20.0, WaveformShape::Cosine);
        let message = message_params.generate(&config);

        let pm = modulate_pm(&message, 1.0, &carrier, 0.25, config.sample_rate);

        // cos(2π * 0.25) == 0
        assert!(pm[0].abs() < 1e-12);
        assert_eq!(pm.len(), 1000);
    }

    #[test]
    fn test_pm_sine_message_starts_on_carrier() {
        let config = SimulationConfig::default();
        let message_params = params(1.0, 2.0, WaveformShape::Sine);
        let carrier = params(2.0, 20.0, WaveformShape::Cosine);
        let message = message_params.generate(&config);

        let pm = modulate_pm(&message, 1.0, &carrier, 5.0, config.sample_rate);
        assert_eq!(pm[0], 2.0);
    }
}
