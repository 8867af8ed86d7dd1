use crate::config::SimulationConfig;
use crate::error::ModulationError;
use crate::explain::Explanation;
use crate::render::{ChartSurface, ScopedCharts};
use crate::scheme::Scheme;
use log::{debug, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateError<E> {
    /// Parameters were rejected; the previous charts are still shown
    #[error(transparent)]
    Rejected(#[from] ModulationError),

    #[error("Chart surface failure: {0}")]
    Surface(#[source] E),
}

/// Runs one view: validate, generate, redraw, explain
///
/// Each call to [`update`](Simulator::update) is a complete pass over a
/// fresh parameter snapshot. A rejected snapshot leaves the surface alone.
pub struct Simulator<S: ChartSurface> {
    config: SimulationConfig,
    charts: ScopedCharts<S>,
}

impl<S: ChartSurface> Simulator<S> {
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, SimulationConfig::default())
    }

    pub fn with_config(surface: S, config: SimulationConfig) -> Self {
        Self {
            config,
            charts: ScopedCharts::new(surface),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn update(&mut self, scheme: &Scheme) -> Result<Explanation, UpdateError<S::Error>> {
        let simulation = match scheme.simulate(&self.config) {
            Ok(simulation) => simulation,
            Err(err) => {
                warn!("{} parameters rejected: {}", scheme.kind(), err);
                return Err(err.into());
            }
        };

        self.charts
            .replace(&simulation.series, &simulation.time_axis)
            .map_err(UpdateError::Surface)?;
        debug!("{}: redrew {} charts", simulation.kind, simulation.series.len());

        Ok(scheme.explain(&self.config))
    }

    /// Tear the view down, releasing any live charts
    pub fn release(&mut self) {
        self.charts.release();
    }

    pub fn charts(&self) -> &ScopedCharts<S> {
        &self.charts
    }

    pub fn surface(&self) -> &S {
        self.charts.surface()
    }
}
