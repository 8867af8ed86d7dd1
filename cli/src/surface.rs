use log::debug;
use modscope_core::{ChartSurface, Explanation, SchemeKind, Series, SimulationConfig};
use serde::Serialize;
use std::convert::Infallible;
use std::io::{self, Write};

const PLOT_WIDTH: usize = 72;
const PLOT_HEIGHT: usize = 9;

/// Charts drawn by one text render pass
#[derive(Debug)]
pub struct TextFrame {
    pub charts: usize,
}

/// Draws each series as a coarse ASCII plot
///
/// Columns cover equal slices of the time axis and mark the min..max span of
/// the samples in that slice, so a truncated series ends early on the plot.
pub struct TextSurface<W: Write> {
    out: W,
    width: usize,
    height: usize,
}

impl<W: Write> TextSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            width: PLOT_WIDTH,
            height: PLOT_HEIGHT,
        }
    }

    fn plot(&self, samples: &[f64], axis_len: usize, lo: f64, hi: f64) -> Vec<String> {
        let span = if hi > lo { hi - lo } else { 1.0 };
        let n = axis_len.max(samples.len()).max(1);
        let mut grid = vec![vec![' '; self.width]; self.height];

        for col in 0..self.width {
            let start = col * n / self.width;
            let end = ((col + 1) * n / self.width).max(start + 1).min(samples.len());
            let bucket = match samples.get(start..end) {
                Some(bucket) if !bucket.is_empty() => bucket,
                _ => continue,
            };

            let (bucket_min, bucket_max) = bucket
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(a, b), &s| (a.min(s), b.max(s)));
            let top = self.row_for(bucket_max, lo, span);
            let bottom = self.row_for(bucket_min, lo, span);
            for row in grid.iter_mut().take(bottom + 1).skip(top) {
                row[col] = '*';
            }
        }

        grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }

    fn row_for(&self, value: f64, lo: f64, span: f64) -> usize {
        let scaled = (value - lo) / span;
        let row = ((1.0 - scaled) * (self.height - 1) as f64).round();
        (row.max(0.0) as usize).min(self.height - 1)
    }
}

impl<W: Write> ChartSurface for TextSurface<W> {
    type Widget = TextFrame;
    type Error = io::Error;

    fn render(&mut self, series: &[Series], time_axis: &[f64]) -> io::Result<TextFrame> {
        let t_end = time_axis.last().copied().unwrap_or(0.0);

        for s in series {
            let (lo, hi) = s.range().unwrap_or((0.0, 0.0));
            writeln!(
                self.out,
                "{} [{}]: {} samples, min {:.3}, max {:.3}",
                s.label,
                s.color,
                s.samples.len(),
                lo,
                hi
            )?;
            for line in self.plot(&s.samples, time_axis.len(), lo, hi) {
                writeln!(self.out, "  |{}", line.trim_end())?;
            }
            writeln!(self.out, "  +{}", "-".repeat(self.width))?;
            writeln!(
                self.out,
                "   t = 0 s{:>width$}",
                format!("t = {:.3} s", t_end),
                width = self.width - 8
            )?;
            writeln!(self.out)?;
        }
        self.out.flush()?;

        Ok(TextFrame {
            charts: series.len(),
        })
    }

    fn destroy(&mut self, frame: TextFrame) {
        // Terminal output cannot be taken back; just account for it
        debug!("Discarding {} text charts", frame.charts);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartDocument {
    pub label: &'static str,
    pub color: &'static str,
    pub samples: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplanationDocument {
    pub message: String,
    pub carrier: String,
    pub index: String,
    pub modulated: String,
}

impl From<&Explanation> for ExplanationDocument {
    fn from(explanation: &Explanation) -> Self {
        Self {
            message: explanation.message.clone(),
            carrier: explanation.carrier.clone(),
            index: explanation.index.clone(),
            modulated: explanation.modulated.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub scheme: &'static str,
    pub family: String,
    pub sample_rate: usize,
    pub duration: f64,
    pub time_axis: &'a [f64],
    pub charts: &'a [ChartDocument],
    pub explanation: ExplanationDocument,
}

/// Keeps the live charts as serializable documents
#[derive(Debug, Default)]
pub struct JsonSurface {
    charts: Vec<ChartDocument>,
    time_axis: Vec<f64>,
}

impl JsonSurface {
    pub fn charts(&self) -> &[ChartDocument] {
        &self.charts
    }

    pub fn report(
        &self,
        kind: SchemeKind,
        config: &SimulationConfig,
        explanation: &Explanation,
    ) -> Report<'_> {
        Report {
            scheme: kind.name(),
            family: kind.family().to_string(),
            sample_rate: config.sample_rate,
            duration: config.duration,
            time_axis: &self.time_axis,
            charts: &self.charts,
            explanation: explanation.into(),
        }
    }
}

impl ChartSurface for JsonSurface {
    type Widget = usize;
    type Error = Infallible;

    fn render(&mut self, series: &[Series], time_axis: &[f64]) -> Result<usize, Infallible> {
        self.charts = series
            .iter()
            .map(|s| ChartDocument {
                label: s.label,
                color: s.color,
                samples: s.samples.clone(),
            })
            .collect();
        self.time_axis = time_axis.to_vec();
        Ok(self.charts.len())
    }

    fn destroy(&mut self, charts: usize) {
        debug!("Dropping {} JSON charts", charts);
        self.charts.clear();
        self.time_axis.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modscope_core::{Scheme, Simulator};

    #[test]
    fn test_text_surface_draws_every_series() {
        let mut simulator = Simulator::new(TextSurface::new(Vec::new()));
        simulator.update(&Scheme::default_for(SchemeKind::Am)).unwrap();
        simulator.release();

        let text = String::from_utf8(simulator.surface().out.clone()).unwrap();
        assert!(text.contains("Message Signal [blue]: 1000 samples"));
        assert!(text.contains("Carrier Signal [green]: 1000 samples"));
        assert!(text.contains("AM Modulated Signal [red]: 1000 samples"));
        assert!(text.contains("max 3.000"));
        assert!(text.contains('*'));
    }

    #[test]
    fn test_text_plot_shows_truncation() {
        let surface = TextSurface::new(Vec::new());
        let samples = vec![1.0; 500];
        let rows = surface.plot(&samples, 1000, 0.0, 1.0);

        assert_eq!(rows.len(), PLOT_HEIGHT);
        let top = &rows[0];
        assert_eq!(top.chars().filter(|&c| c == '*').count(), PLOT_WIDTH / 2);
        assert!(top.ends_with(' '));
    }

    #[test]
    fn test_json_surface_holds_live_charts() {
        let mut simulator = Simulator::new(JsonSurface::default());
        let scheme = Scheme::default_for(SchemeKind::Fsk);
        let explanation = simulator.update(&scheme).unwrap();

        let report = simulator
            .surface()
            .report(scheme.kind(), simulator.config(), &explanation);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["scheme"], "FSK");
        assert_eq!(value["family"], "digital");
        assert_eq!(value["charts"].as_array().unwrap().len(), 3);
        assert_eq!(value["charts"][2]["label"], "FSK Modulated Signal");
        assert_eq!(value["time_axis"].as_array().unwrap().len(), 1000);

        simulator.release();
        assert!(simulator.surface().charts().is_empty());
    }
}
