use crate::signal::Trace;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    pub label: Option<String>,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub fn rgb(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub width: f32,
    pub color: Color,
}

/// Isolated points drawn as circles (R-peak markers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub radius: u32,
    pub color: Color,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Series {
    Line(LineSeries),
    Markers(MarkerSeries),
}

impl Series {
    pub fn points(&self) -> &[[f64; 2]] {
        match self {
            Series::Line(line) => &line.points,
            Series::Markers(markers) => &markers.points,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub title: Option<String>,
    pub x: Axis,
    pub y: Axis,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(title: impl Into<Option<String>>) -> Self {
        Self {
            title: title.into(),
            x: Axis { label: None },
            y: Axis { label: None },
            series: Vec::new(),
        }
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }

    /// `(x_min, x_max, y_min, y_max)` over every series, `None` when the figure has no points.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut points = self.series.iter().flat_map(|s| s.points().iter());
        let first = points.next()?;
        let init = (first[0], first[0], first[1], first[1]);
        Some(points.fold(init, |(x0, x1, y0, y1), p| {
            (x0.min(p[0]), x1.max(p[0]), y0.min(p[1]), y1.max(p[1]))
        }))
    }
}

pub trait PlotBackend {
    fn draw(&mut self, fig: &Figure) -> anyhow::Result<()>;
}

/// Backend for runs that do not write a chart.
#[derive(Debug, Default)]
pub struct NullBackend;

impl PlotBackend for NullBackend {
    fn draw(&mut self, _fig: &Figure) -> anyhow::Result<()> {
        Ok(())
    }
}

pub fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points {
        return points.to_vec();
    }
    let bucket_size = points.len() as f64 / max_points as f64;
    let mut result = Vec::with_capacity(max_points);
    for i in 0..max_points {
        let start = (i as f64 * bucket_size).floor() as usize;
        if start >= points.len() {
            break;
        }
        result.push(points[start]);
    }
    result
}

/// Amplitude against time with the flagged R-peaks marked.
pub fn figure_from_trace(trace: &Trace, max_points: usize) -> Figure {
    let points: Vec<[f64; 2]> = trace
        .timestamps()
        .iter()
        .zip(trace.amplitudes())
        .map(|(&t, &a)| [t, a])
        .collect();
    let peaks: Vec<[f64; 2]> = trace.peak_indices().into_iter().map(|i| points[i]).collect();
    let mut fig = Figure::new(Some("ECG".into()));
    fig.x.label = Some("time (s)".into());
    fig.y.label = Some("amplitude".into());
    fig.add_series(Series::Line(LineSeries {
        name: "ECG".into(),
        points: decimate_points(&points, max_points),
        width: 1.4,
        color: Color(0xD62728),
    }));
    if !peaks.is_empty() {
        fig.add_series(Series::Markers(MarkerSeries {
            name: "R-peaks".into(),
            points: peaks,
            radius: 3,
            color: Color(0x1F77B4),
        }));
    }
    fig
}
