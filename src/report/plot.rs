use askama::Template;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::core::pipeline::AnalysisReport;
use crate::models::ValuationBucket;
use crate::Result;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const TICKS: usize = 5;

pub struct PlotPoint {
    pub cx: String,
    pub cy: String,
    pub color: &'static str,
    pub tooltip: String,
}

pub struct Tick {
    pub pos: String,
    pub label: String,
}

pub struct PlotLine {
    pub x1: String,
    pub y1: String,
    pub x2: String,
    pub y2: String,
}

pub struct LegendEntry {
    pub y: String,
    pub color: &'static str,
    pub label: &'static str,
}

#[derive(Template)]
#[template(path = "regression_plot.svg", escape = "html")]
pub struct PlotTemplate {
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub r_squared: String,
    pub plot_left: f64,
    pub plot_right: f64,
    pub plot_top: f64,
    pub plot_bottom: f64,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub points: Vec<PlotPoint>,
    pub line: Option<PlotLine>,
    pub legend: Vec<LegendEntry>,
}

/// Linear map from data space onto a pixel interval.
#[derive(Debug, Clone, Copy)]
struct Axis {
    min: f64,
    max: f64,
    from: f64,
    to: f64,
}

impl Axis {
    fn new(values: impl Iterator<Item = f64>, from: f64, to: f64) -> Self {
        let (mut min, mut max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        if !min.is_finite() || !max.is_finite() {
            min = 0.0;
            max = 1.0;
        }
        if max - min == 0.0 {
            min -= 1.0;
            max += 1.0;
        } else {
            let pad = (max - min) * 0.05;
            min -= pad;
            max += pad;
        }

        Self { min, max, from, to }
    }

    fn map(&self, value: f64) -> f64 {
        self.from + (value - self.min) / (self.max - self.min) * (self.to - self.from)
    }

    fn ticks(&self) -> Vec<Tick> {
        (0..TICKS)
            .map(|i| {
                let value = self.min + (self.max - self.min) * i as f64 / (TICKS - 1) as f64;
                Tick {
                    pos: px(self.map(value)),
                    label: format!("{:.0}", value),
                }
            })
            .collect()
    }
}

fn px(value: f64) -> String {
    format!("{:.1}", value)
}

pub fn plot_template(report: &AnalysisReport) -> PlotTemplate {
    let valuations = &report.valuations;
    let regression = &report.regression;

    let plot_left = MARGIN_LEFT;
    let plot_right = WIDTH - MARGIN_RIGHT;
    let plot_top = MARGIN_TOP;
    let plot_bottom = HEIGHT - MARGIN_BOTTOM;

    let x_axis = Axis::new(valuations.iter().map(|v| v.mileage as f64), plot_left, plot_right);

    // The fitted line has to stay inside the frame as well
    let line_ends = if valuations.is_empty() {
        None
    } else {
        let lo = valuations.iter().map(|v| v.mileage).min().unwrap_or(0) as f64;
        let hi = valuations.iter().map(|v| v.mileage).max().unwrap_or(0) as f64;
        Some(((lo, regression.predict(lo)), (hi, regression.predict(hi))))
    };
    let y_values = valuations
        .iter()
        .map(|v| v.price as f64)
        .chain(line_ends.iter().flat_map(|(a, b)| [a.1, b.1]));
    let y_axis = Axis::new(y_values, plot_bottom, plot_top);

    let points = valuations
        .iter()
        .map(|v| PlotPoint {
            cx: px(x_axis.map(v.mileage as f64)),
            cy: px(y_axis.map(v.price as f64)),
            color: v.bucket.color(),
            tooltip: format!(
                "{} | {} kr | {} mil | {}",
                v.url_or_missing(),
                v.price,
                v.mileage,
                v.bucket.as_str()
            ),
        })
        .collect();

    let line = line_ends.map(|((x1, y1), (x2, y2))| PlotLine {
        x1: px(x_axis.map(x1)),
        y1: px(y_axis.map(y1)),
        x2: px(x_axis.map(x2)),
        y2: px(y_axis.map(y2)),
    });

    let legend = [
        (ValuationBucket::Undervalued, "Undervalued"),
        (ValuationBucket::Normal, "Normal"),
        (ValuationBucket::Overvalued, "Overvalued"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (bucket, label))| LegendEntry {
        y: px(plot_top + 16.0 + 18.0 * i as f64),
        color: bucket.color(),
        label,
    })
    .collect();

    let r_squared = match regression.r_squared {
        Some(r2) => format!("R² = {:.2}", r2),
        None => "R² undefined".to_string(),
    };

    PlotTemplate {
        width: WIDTH,
        height: HEIGHT,
        title: format!("Regression analysis for {}", report.query.title()),
        x_label: "Mileage (mil)",
        y_label: "Price (kr)",
        r_squared,
        plot_left,
        plot_right,
        plot_top,
        plot_bottom,
        x_ticks: x_axis.ticks(),
        y_ticks: y_axis.ticks(),
        points,
        line,
        legend,
    }
}

pub fn render_svg(report: &AnalysisReport) -> Result<String> {
    Ok(plot_template(report).render()?)
}

pub fn write_svg_file(path: &Path, report: &AnalysisReport) -> Result<()> {
    fs::write(path, render_svg(report)?)?;
    info!(path = %path.display(), "Regression plot saved");
    Ok(())
}
