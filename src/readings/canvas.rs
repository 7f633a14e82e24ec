use std::f64::consts::PI;

use anyhow::{anyhow, bail, Result};
use tracing::{debug, error};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::chart::{ChartData, ChartSurface, Metric};

const BACKGROUND: &str = "#13171f";
const SCALE_PADDING: f64 = 16.0;
const LABEL_WIDTH: f64 = 64.0;

/// Geometry of a drawn chart, kept to answer hover queries.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnChart {
    pub data: ChartData,
    pub width: f64,
    pub height: f64,
    pub max_value: f64,
}

impl DrawnChart {
    pub fn index_at(&self, x: f64) -> Option<usize> {
        x_to_index(x, self.data.len(), self.width)
    }

    pub fn point_at(&self, x: f64) -> Option<HoverPoint> {
        let index = self.index_at(x)?;
        let label = self.data.labels.get(index)?.clone();
        let values = self
            .data
            .series
            .iter()
            .map(|series| Some((series.metric, *series.values.get(index)?)))
            .collect::<Option<Vec<_>>>()?;

        Some(HoverPoint { label, values })
    }
}

/// Values of the reading closest to the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverPoint {
    pub label: String,
    pub values: Vec<(Metric, f64)>,
}

pub struct ReadingsCanvas {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    dpr: f64,
}

impl ReadingsCanvas {
    pub fn try_new(node: &HtmlCanvasElement, width: f64, height: f64, dpr: f64) -> Result<Self> {
        #[derive(serde::Serialize)]
        struct ContextOptions {
            alpha: bool,
        }

        let ctx = node
            .get_context_with_context_options(
                "2d",
                &serde_wasm_bindgen::to_value(&ContextOptions { alpha: false })
                    .map_err(|err| anyhow!("context options serialization error: {err}"))?,
            )
            .map_err(|err| anyhow!("{err:?}"))?;
        let Some(ctx) = ctx else {
            bail!("canvas' 2d context not found");
        };

        let ctx = ctx
            .dyn_into()
            .map_err(|err| anyhow!("context dyn conversion error: {err:?}"))?;

        Ok(Self {
            ctx,
            width,
            height,
            dpr,
        })
    }

    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.width = width;
        self.height = height;
        self.dpr = dpr;
    }

    fn clear(&self) {
        self.ctx.set_fill_style(&BACKGROUND.into());
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn render_scales(&self, data: &ChartData, max_value: f64) {
        debug!("rendering scales");

        let y = self.height - y_margin(self.height);

        self.ctx.begin_path();
        self.ctx.move_to(0.0, y);
        self.ctx.line_to(self.width, y);
        self.ctx.set_stroke_style(&"white".into());
        self.ctx.stroke();

        self.ctx.set_fill_style(&"white".into());
        if let Err(err) = self.ctx.fill_text(&format!("{max_value:.1}"), 4.0, SCALE_PADDING) {
            error!("fill text error: {err:?}");
        }

        #[expect(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let every = ((data.len() as f64 * LABEL_WIDTH / self.width).ceil() as usize).max(1);

        for (index, label) in data.labels.iter().enumerate().step_by(every) {
            let x = index_to_x(index, data.len(), self.width);

            self.ctx.begin_path();
            self.ctx.move_to(x, y);
            self.ctx.line_to(x, y + SCALE_PADDING / 2.0);
            self.ctx.stroke();

            if let Err(err) = self
                .ctx
                .fill_text(label, x - LABEL_WIDTH / 2.0, y + SCALE_PADDING * 1.5)
            {
                error!("fill text error: {err:?}");
            }
        }
    }

    fn render_series(&self, data: &ChartData, max_value: f64) {
        debug!("rendering series");

        for series in &data.series {
            self.ctx.begin_path();
            self.ctx.set_stroke_style(&series.metric.color().into());

            for (index, value) in series.values.iter().enumerate() {
                let x = index_to_x(index, data.len(), self.width);
                let y = value_to_y(*value, max_value, self.height);
                self.ctx.line_to(x, y);
            }

            self.ctx.stroke();
        }
    }

    fn render_dots(&self, data: &ChartData, max_value: f64) {
        for series in &data.series {
            self.ctx.set_fill_style(&series.metric.color().into());

            for (index, value) in series.values.iter().enumerate() {
                let x = index_to_x(index, data.len(), self.width);
                let y = value_to_y(*value, max_value, self.height);

                self.ctx.begin_path();
                if let Err(err) = self.ctx.arc(x, y, 2.0, 0.0, 2.0 * PI) {
                    error!("arc drawing error: {err:?}");
                }
                self.ctx.fill();
            }
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn render_legend(&self) {
        for (index, metric) in Metric::ALL.iter().enumerate() {
            self.ctx.set_fill_style(&metric.color().into());
            if let Err(err) = self.ctx.fill_text(
                metric.label(),
                self.width - 160.0,
                SCALE_PADDING * (index as f64 + 1.0),
            ) {
                error!("fill text error: {err:?}");
            }
        }
    }
}

impl ChartSurface for ReadingsCanvas {
    type Chart = DrawnChart;

    fn create(&mut self, data: &ChartData) -> Result<DrawnChart> {
        if self.width < f64::EPSILON || self.height < f64::EPSILON {
            bail!("canvas has no size");
        }
        if data.is_empty() {
            bail!("no readings to chart");
        }

        // A flat chart still needs a non zero scale
        let max_value = data.max_value().filter(|max| *max > 0.0).unwrap_or(1.0);

        self.ctx.save();
        if let Err(err) = self.ctx.scale(self.dpr, self.dpr) {
            error!(dpr = self.dpr, "context scaling failed: {err:?}");
        };
        self.ctx.set_font("12px Arial");
        self.clear();
        self.render_scales(data, max_value);
        self.render_series(data, max_value);
        self.render_dots(data, max_value);
        self.render_legend();
        self.ctx.restore();

        Ok(DrawnChart {
            data: data.clone(),
            width: self.width,
            height: self.height,
            max_value,
        })
    }

    fn destroy(&mut self, chart: DrawnChart) {
        debug!(points = chart.data.len(), "releasing chart");
        self.ctx.save();
        if let Err(err) = self.ctx.scale(self.dpr, self.dpr) {
            error!(dpr = self.dpr, "context scaling failed: {err:?}");
        };
        self.clear();
        self.ctx.restore();
    }
}

#[expect(clippy::cast_precision_loss)]
fn index_to_x(index: usize, len: usize, width: f64) -> f64 {
    let usable = width - 2.0 * SCALE_PADDING;
    if len < 2 {
        return SCALE_PADDING + usable / 2.0;
    }
    SCALE_PADDING + usable * index as f64 / (len - 1) as f64
}

#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn x_to_index(x: f64, len: usize, width: f64) -> Option<usize> {
    if len == 0 || width <= 2.0 * SCALE_PADDING {
        return None;
    }
    if len == 1 {
        return Some(0);
    }
    let ratio = ((x - SCALE_PADDING) / (width - 2.0 * SCALE_PADDING)).clamp(0.0, 1.0);
    Some((ratio * (len - 1) as f64).round() as usize)
}

fn value_to_y(value: f64, max_value: f64, height: f64) -> f64 {
    let rev_factor = 1.0 / max_value;
    let y_margin = y_margin(height);
    height - rev_factor * value.max(0.0) * (height - 2.0 * y_margin) - y_margin
}

fn y_margin(height: f64) -> f64 {
    height / 10.0
}
