//! Chart lifecycle at the presentation boundary
//!
//! The numeric core never draws. A [`ChartSurface`] turns series into
//! whatever widgets the front end uses, and [`ScopedCharts`] owns the live
//! widgets: the previous set is destroyed before every re-render and when
//! the scope is dropped.

use log::debug;

/// One labelled line on a chart
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub color: &'static str,
    pub samples: Vec<f64>,
}

impl Series {
    pub fn new(label: &'static str, color: &'static str, samples: Vec<f64>) -> Self {
        Self {
            label,
            color,
            samples,
        }
    }

    /// Smallest and largest sample, `None` when empty
    pub fn range(&self) -> Option<(f64, f64)> {
        self.samples.iter().fold(None, |acc, &s| match acc {
            None => Some((s, s)),
            Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
        })
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |peak: f64, s| peak.max(s.abs()))
    }
}

/// Drawing backend for one view
pub trait ChartSurface {
    /// Handle to everything drawn by one `render` call
    type Widget;
    type Error: std::error::Error + 'static;

    fn render(&mut self, series: &[Series], time_axis: &[f64]) -> Result<Self::Widget, Self::Error>;

    /// Release a widget previously returned by `render`
    fn destroy(&mut self, widget: Self::Widget);
}

/// Owns at most one live widget on a surface
pub struct ScopedCharts<S: ChartSurface> {
    surface: S,
    current: Option<S::Widget>,
}

impl<S: ChartSurface> ScopedCharts<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            current: None,
        }
    }

    /// Destroy the live widget, then draw `series` in its place
    pub fn replace(&mut self, series: &[Series], time_axis: &[f64]) -> Result<(), S::Error> {
        self.release();
        let widget = self.surface.render(series, time_axis)?;
        self.current = Some(widget);
        Ok(())
    }

    /// Destroy the live widget, if any
    pub fn release(&mut self) {
        if let Some(widget) = self.current.take() {
            debug!("Releasing charts");
            self.surface.destroy(widget);
        }
    }

    pub fn is_displaying(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&S::Widget> {
        self.current.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: ChartSurface> Drop for ScopedCharts<S> {
    fn drop(&mut self) {
        self.release();
    }
}
