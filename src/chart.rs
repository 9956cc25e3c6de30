//! Multi-panel bar chart of a repository's milestones.
//!
//! Each metric gets its own panel holding a single bar, titled with the label the
//! classifier assigns to the value. Panels fill a 3 by 2 grid row by row in the order
//! of [`Metric::ALL`].
//!
//! The image is drawn into a temporary file next to the destination and moved into
//! place once drawing succeeded, so a failed render never leaves a partial file behind.

use crate::config::AppConfig;
use crate::error::{MilestoneError, Result};
use crate::metrics::{classify, Metric, MetricSet};
use plotters::coord::Shift;
use plotters::prelude::*;
use rand::Rng;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const FIGURE_TITLE: &str = "GitHub Repository Milestones";
pub const Y_AXIS_LABEL: &str = "Count";
pub const DEFAULT_EXTENSION: &str = "png";

const GRID: (usize, usize) = (3, 2);
const FONT: &str = "sans-serif";
const FIGURE_TITLE_SIZE: f64 = 28.0;
const PANEL_TITLE_SIZE: f64 = 18.0;

/// One cell of the chart grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Panel {
    pub metric: Metric,
    pub value: u64,
    /// The classified label, shown above the bar.
    pub title: &'static str,
}

/// Pixel size of the rendered figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ChartSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            width: config.chart_width,
            height: config.chart_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFormat {
    Bitmap,
    Svg,
}

impl ImageFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "png" | "jpg" | "jpeg" | "bmp" => Ok(Self::Bitmap),
            "svg" => Ok(Self::Svg),
            other => Err(MilestoneError::Render(format!(
                "unsupported image format '{other}' for {}",
                path.display()
            ))),
        }
    }
}

/// Lays out the six panels in chart order.
pub fn panels(metrics: &MetricSet) -> Vec<Panel> {
    metrics
        .iter()
        .map(|(metric, value)| Panel {
            metric,
            value,
            title: classify(metric, value),
        })
        .collect()
}

/// Turns the user's choice of destination into the path that will be written.
///
/// An empty path is an input error, a path without an extension gets `.png`, and an
/// extension no backend can write is rejected before any work is done.
pub fn resolve_destination(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(MilestoneError::input(
            "Please choose where to save the chart.",
        ));
    }

    let path = if path.extension().is_none() {
        path.with_extension(DEFAULT_EXTENSION)
    } else {
        path.to_path_buf()
    };
    ImageFormat::from_path(&path)?;

    Ok(path)
}

/// Draws the chart for `metrics` and writes it to `destination`.
///
/// The format follows the destination's extension. Returns the panels that were drawn.
pub fn render(
    metrics: &MetricSet,
    destination: &Path,
    settings: &ChartSettings,
) -> Result<Vec<Panel>> {
    let format = ImageFormat::from_path(destination)?;
    let panels = panels(metrics);

    let directory = destination
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    // Keep the extension so the bitmap encoder picks the same format.
    let suffix = destination
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let mut builder = tempfile::Builder::new();
    builder.prefix(".milestones-").suffix(&suffix);
    // Temp files default to 0600; the saved chart should be readable like any image.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }
    let staging = builder
        .tempfile_in(directory)
        .map_err(MilestoneError::render)?;

    let size = (settings.width, settings.height);
    match format {
        ImageFormat::Bitmap => {
            let root = BitMapBackend::new(staging.path(), size).into_drawing_area();
            draw_figure(&root, &panels)?;
            root.present().map_err(MilestoneError::render)?;
        }
        ImageFormat::Svg => {
            let root = SVGBackend::new(staging.path(), size).into_drawing_area();
            draw_figure(&root, &panels)?;
            root.present().map_err(MilestoneError::render)?;
        }
    }

    staging
        .persist(destination)
        .map_err(MilestoneError::render)?;
    tracing::info!(path = %destination.display(), "Chart written");

    Ok(panels)
}

fn draw_figure<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, panels: &[Panel]) -> Result<()> {
    root.fill(&WHITE).map_err(MilestoneError::render)?;
    let body = root
        .titled(FIGURE_TITLE, (FONT, FIGURE_TITLE_SIZE))
        .map_err(MilestoneError::render)?;

    let mut rng = rand::thread_rng();
    for (area, panel) in body.split_evenly(GRID).iter().zip(panels) {
        let color = RGBColor(rng.gen(), rng.gen(), rng.gen());
        draw_panel(area, panel, color)?;
    }

    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    color: RGBColor,
) -> Result<()> {
    // Headroom above the bar; a zero value still gets a visible axis.
    let y_max = panel.value.saturating_add(panel.value / 10).max(1);
    let name = panel.metric.name();

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title, (FONT, PANEL_TITLE_SIZE))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..1u32).into_segmented(), 0u64..y_max)
        .map_err(MilestoneError::render)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc(Y_AXIS_LABEL)
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(_) => name.to_string(),
            _ => String::new(),
        })
        .draw()
        .map_err(MilestoneError::render)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(color.filled())
                .margin(40)
                .data([(0u32, panel.value)]),
        )
        .map_err(MilestoneError::render)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> MetricSet {
        MetricSet {
            stars: 10,
            forks: 5,
            open_issues: 2,
            watchers: 3,
            pull_requests: 1,
            commits: 8,
        }
    }

    #[test]
    fn test_panel_titles_in_grid_order() {
        let titles: Vec<_> = panels(&sample()).iter().map(|p| p.title).collect();
        assert_eq!(
            titles,
            [
                "Rising Star",
                "Just Started",
                "Few Issues",
                "Some Watchers",
                "Few PRs",
                "Few Commits"
            ]
        );
    }

    #[test]
    fn test_panels_carry_raw_values() {
        let metrics = MetricSet {
            stars: 250,
            pull_requests: 20,
            ..sample()
        };
        let panels = panels(&metrics);

        assert_eq!(panels.len(), GRID.0 * GRID.1);
        assert_eq!(panels[0].value, 250);
        assert_eq!(panels[0].title, "Star Struck!");
        assert_eq!(panels[4].metric, Metric::PullRequests);
        assert_eq!(panels[4].title, "24x7 Puller");
    }

    #[test]
    fn test_resolve_destination() {
        assert_eq!(
            resolve_destination(Path::new("out/chart")).unwrap(),
            PathBuf::from("out/chart.png")
        );
        assert_eq!(
            resolve_destination(Path::new("chart.SVG")).unwrap(),
            PathBuf::from("chart.SVG")
        );
        assert!(matches!(
            resolve_destination(Path::new("")),
            Err(MilestoneError::Input(_))
        ));
        assert!(matches!(
            resolve_destination(Path::new("chart.pdf")),
            Err(MilestoneError::Render(_))
        ));
    }

    #[test]
    fn test_render_unsupported_extension_writes_nothing() {
        let dir = tempdir().unwrap();
        let destination = dir.path().join("chart.txt");

        let err = render(&sample(), &destination, &ChartSettings::default()).unwrap_err();

        assert!(matches!(err, MilestoneError::Render(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_render_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let destination = dir.path().join("missing").join("chart.png");

        let err = render(&sample(), &destination, &ChartSettings::default()).unwrap_err();

        assert!(matches!(err, MilestoneError::Render(_)));
        assert!(!destination.exists());
    }

    #[test]
    fn test_render_png() {
        let dir = tempdir().unwrap();
        let destination = dir.path().join("chart.png");

        let drawn = render(&sample(), &destination, &ChartSettings::default()).unwrap();

        assert_eq!(drawn, panels(&sample()));
        let size = std::fs::metadata(&destination).unwrap().len();
        assert!(size > 0);
        // Only the chart itself is left in the directory.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_render_saves_world_readable_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let destination = dir.path().join("chart.svg");

        render(&sample(), &destination, &ChartSettings::default()).unwrap();

        let mode = std::fs::metadata(&destination).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_render_svg_contains_titles() {
        let dir = tempdir().unwrap();
        let destination = dir.path().join("chart.svg");

        render(&sample(), &destination, &ChartSettings::default()).unwrap();

        let svg = std::fs::read_to_string(&destination).unwrap();
        assert!(svg.contains(FIGURE_TITLE));
        for panel in panels(&sample()) {
            assert!(svg.contains(panel.title), "missing {}", panel.title);
        }
        assert!(svg.contains(Y_AXIS_LABEL));
    }
}
