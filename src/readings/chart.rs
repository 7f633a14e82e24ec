use anyhow::Result;
use tracing::debug;

use crate::types::Reading;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Temperature,
    Humidity,
    Speed,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Self::Temperature, Self::Humidity, Self::Speed];

    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature (°C)",
            Self::Humidity => "Humidity (%)",
            Self::Speed => "Speed (m/s)",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Temperature => "rgb(255, 99, 132)",
            Self::Humidity => "rgb(54, 162, 235)",
            Self::Speed => "rgb(75, 192, 192)",
        }
    }

    fn value(self, reading: &Reading) -> f64 {
        match self {
            Self::Temperature => reading.temperature,
            Self::Humidity => reading.humidity,
            Self::Speed => reading.speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub metric: Metric,
    pub values: Vec<f64>,
}

impl Series {
    pub fn max(&self) -> Option<f64> {
        self.values
            .iter()
            .max_by(|value1, value2| value1.total_cmp(value2))
            .copied()
    }
}

/// Chronological series, oldest reading first. Every series has one value per label.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: [Series; 3],
}

impl ChartData {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.series
            .iter()
            .filter_map(Series::max)
            .max_by(f64::total_cmp)
    }
}

/// Readings come newest first from the service and are charted oldest first.
pub fn project(readings: &[Reading]) -> ChartData {
    let chronological = readings.iter().rev().collect::<Vec<_>>();
    let series = Metric::ALL.map(|metric| Series {
        metric,
        values: chronological
            .iter()
            .map(|reading| metric.value(reading))
            .collect(),
    });

    ChartData {
        labels: chronological
            .iter()
            .map(|reading| reading.timestamp.clone())
            .collect(),
        series,
    }
}

/// Somewhere a chart can be drawn. Instances must be handed back through `destroy`.
pub trait ChartSurface {
    type Chart;

    fn create(&mut self, data: &ChartData) -> Result<Self::Chart>;
    fn destroy(&mut self, chart: Self::Chart);
}

/// Owns at most one live chart on its surface and releases it before drawing the next.
pub struct ChartProjector<S: ChartSurface> {
    surface: S,
    live: Option<S::Chart>,
}

impl<S: ChartSurface> ChartProjector<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            live: None,
        }
    }

    pub fn show(&mut self, readings: &[Reading]) -> Result<&S::Chart> {
        self.release();

        let data = project(readings);
        debug!(points = data.len(), "charting readings");

        let chart = self.surface.create(&data)?;
        Ok(self.live.insert(chart))
    }

    pub fn release(&mut self) {
        if let Some(chart) = self.live.take() {
            self.surface.destroy(chart);
        }
    }

    pub fn live(&self) -> Option<&S::Chart> {
        self.live.as_ref()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S: ChartSurface> Drop for ChartProjector<S> {
    fn drop(&mut self) {
        self.release();
    }
}
