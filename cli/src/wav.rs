use hound::WavSpec;
use modscope_core::Series;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Sample rate {0} Hz does not fit in a WAV header")]
    SampleRate(usize),

    #[error("Nothing to export: {0} is empty")]
    Empty(&'static str),

    #[error(transparent)]
    Wav(#[from] hound::Error),
}

/// Write `series` as 16-bit mono PCM, scaled so its peak sits at full scale
///
/// Returns the number of samples written.
pub fn export_wav(path: &Path, series: &Series, sample_rate: usize) -> Result<usize, ExportError> {
    if series.samples.is_empty() {
        return Err(ExportError::Empty(series.label));
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate: u32::try_from(sample_rate).map_err(|_| ExportError::SampleRate(sample_rate))?,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let peak = series.peak();
    let scale = if peak > 0.0 { 1.0 / peak } else { 1.0 };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in &series.samples {
        // Clamp to [-1.0, 1.0] range to avoid overflow, then scale to i16
        let clamped = (sample * scale).clamp(-1.0, 1.0);
        writer.write_sample((clamped * 32767.0) as i16)?;
    }
    writer.finalize()?;

    Ok(series.samples.len())
}
