use aed_lib::plot::{Figure, PlotBackend, Series};
use anyhow::Result;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Writes each figure to a PNG file through plotters.
pub struct PngBackend {
    path: PathBuf,
    size: (u32, u32),
}

impl PngBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: (1000, 480),
        }
    }
}

impl PlotBackend for PngBackend {
    fn draw(&mut self, fig: &Figure) -> Result<()> {
        draw_plotters_figure(&self.path, self.size, fig)?;
        log::info!("wrote ECG chart to {}", self.path.display());
        Ok(())
    }
}

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

fn draw_plotters_figure(path: &Path, size: (u32, u32), fig: &Figure) -> Result<()> {
    let (x_min, x_max, y_min, y_max) = fig.bounds().unwrap_or((0.0, 1.0, 0.0, 1.0));
    let (x_min, x_max) = padded(x_min, x_max);
    let (y_min, y_max) = padded(y_min, y_max);

    let backend = BitMapBackend::new(path, size);
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(
            fig.title.clone().unwrap_or_else(|| "Plot".into()),
            ("sans-serif", 24),
        )
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_desc(fig.x.label.clone().unwrap_or_default())
        .y_desc(fig.y.label.clone().unwrap_or_default())
        .draw()?;
    for series in &fig.series {
        match series {
            Series::Line(line) => {
                let (r, g, b) = line.color.rgb();
                let style = RGBColor(r, g, b).stroke_width((line.width.round() as u32).max(1));
                chart.draw_series(plotters::series::LineSeries::new(
                    line.points.iter().map(|p| (p[0], p[1])),
                    style,
                ))?;
            }
            Series::Markers(markers) => {
                let (r, g, b) = markers.color.rgb();
                let style = RGBColor(r, g, b).filled();
                chart.draw_series(
                    markers
                        .points
                        .iter()
                        .map(|p| Circle::new((p[0], p[1]), markers.radius, style)),
                )?;
            }
        }
    }
    root.present()?;
    Ok(())
}
