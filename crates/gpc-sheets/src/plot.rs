//! MWD / SCB comparison plots
//!
//! [`plot`] overlays the molecular weight distribution of each selected file
//! on the primary axis and its short chain branching on a secondary axis.
//! Problems with individual files are collected as [`PlotWarning`]s; the
//! chart is only produced when at least one line was drawn.

use std::fmt;

use gpc_sheets_chart::{
    export_png, palette_color, render, Axis, AxisGroup, Chart, ChartResult, Color, DataSeries,
    Legend, LegendPosition, LineStyle, RenderOptions,
};
use gpc_sheets_core::CellValue;
use image::RgbImage;
use thiserror::Error;

use crate::extract::{MarkerColumn, MWD_LOG_M, MWD_MMD, SCB_CH3, SCB_LOG_M};
use crate::record::{FileRecord, Series};
use crate::session::Session;

/// Fixed file name of the exported figure
pub const EXPORT_FILE_NAME: &str = "gpc_comparison_plot.png";

pub const CHART_TITLE: &str = "GPC Comparison Plot";

const MMD_AXIS_COLOR: Color = Color::rgb(0x1f, 0x77, 0xb4);
const SCB_AXIS_COLOR: Color = Color::rgb(0xff, 0x7f, 0x0e);
const LINE_WIDTH: f64 = 2.0;
const LINE_ALPHA: f64 = 0.7;

/// Which files to plot and which curves to draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotRequest {
    /// File names in selection order
    pub selection: Vec<String>,
    pub show_mwd: bool,
    pub show_scb: bool,
}

impl PlotRequest {
    /// Plot both curves for `selection`
    pub fn new<I, S>(selection: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selection: selection.into_iter().map(Into::into).collect(),
            show_mwd: true,
            show_scb: true,
        }
    }

    pub fn with_mwd(mut self, show: bool) -> Self {
        self.show_mwd = show;
        self
    }

    pub fn with_scb(mut self, show: bool) -> Self {
        self.show_scb = show;
        self
    }
}

/// The two curves of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotDataset {
    Mwd,
    Scb,
}

impl fmt::Display for PlotDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlotDataset::Mwd => "MWD",
            PlotDataset::Scb => "SCB",
        })
    }
}

/// Why one curve of one file could not be drawn
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    /// The series holds a sentinel state instead of values
    #[error("{column} is \"{state}\"")]
    Sentinel {
        column: &'static str,
        state: &'static str,
    },

    /// A value that cannot be placed on a numeric axis
    #[error("{column} value '{value}' at position {index} is not numeric")]
    NonNumeric {
        column: &'static str,
        index: usize,
        value: String,
    },

    #[error("x and y must have same first dimension, but have shapes ({x_len},) and ({y_len},)")]
    LengthMismatch { x_len: usize, y_len: usize },
}

/// A non-fatal problem reported by [`plot`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlotWarning {
    #[error("No files found in GPC data!")]
    NoFiles,

    #[error("Please select at least one sample to plot!")]
    NoSelection,

    #[error("Please select at least one dataset (MWD or SCB) to plot!")]
    NoDatasetChosen,

    #[error("File {0} not found in GPC data!")]
    UnknownFile(String),

    #[error("Error plotting {dataset} for {sample}: {error}")]
    Series {
        sample: String,
        dataset: PlotDataset,
        error: SeriesError,
    },

    #[error("No data available to plot. Please check your selections and data.")]
    NoDataPlotted,
}

/// A built comparison figure
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    chart: Chart,
}

impl Figure {
    /// The chart description behind the figure
    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn into_chart(self) -> Chart {
        self.chart
    }

    /// Rasterize with custom canvas options
    pub fn render(&self, options: &RenderOptions) -> ChartResult<RgbImage> {
        render(&self.chart, options)
    }

    /// Encode as PNG at 300 DPI on an 18 x 10 inch canvas, tightly cropped.
    pub fn export_png(&self) -> ChartResult<Vec<u8>> {
        self.export_png_with(&RenderOptions::default())
    }

    pub fn export_png_with(&self, options: &RenderOptions) -> ChartResult<Vec<u8>> {
        export_png(&self.chart, options)
    }
}

/// Result of a [`plot`] call
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOutcome {
    /// The figure, when at least one line was drawn
    pub figure: Option<Figure>,
    /// Warnings in the order they arose
    pub warnings: Vec<PlotWarning>,
}

impl PlotOutcome {
    fn rejected(warning: PlotWarning) -> Self {
        Self {
            figure: None,
            warnings: vec![warning],
        }
    }
}

/// Lines drawn and warnings gathered while folding over the selection
struct PlotState {
    chart: Chart,
    plotted: bool,
    warnings: Vec<PlotWarning>,
}

impl PlotState {
    fn new(request: &PlotRequest) -> Self {
        let mut y_axis = Axis::new();
        if request.show_mwd {
            y_axis = y_axis
                .with_title("MMD")
                .with_color(MMD_AXIS_COLOR)
                .with_grid(true);
        }

        let mut chart = Chart::new()
            .with_title(CHART_TITLE)
            .with_x_axis(Axis::new().with_title("LogM"))
            .with_y_axis(y_axis)
            .with_legend(Legend::new(LegendPosition::OutsideRight).with_frame(Color::BLACK));
        if request.show_scb {
            chart = chart.with_secondary_y_axis(
                Axis::new()
                    .with_title("CH3 / 1000 TC")
                    .with_color(SCB_AXIS_COLOR),
            );
        }

        Self {
            chart,
            plotted: false,
            warnings: Vec::new(),
        }
    }

    fn add_file(mut self, session: &Session, request: &PlotRequest, index: usize, name: &str) -> Self {
        let Some(record) = session.get(name) else {
            log::warn!("selected file {name} is not loaded");
            self.warnings.push(PlotWarning::UnknownFile(name.to_string()));
            return self;
        };

        let sample = record.sample_name().unwrap_or_else(|| name.to_string());
        let color = palette_color(index);

        if request.show_mwd {
            self.add_line(record, &sample, PlotDataset::Mwd, color);
        }
        if request.show_scb {
            self.add_line(record, &sample, PlotDataset::Scb, color);
        }
        self
    }

    fn add_line(&mut self, record: &FileRecord, sample: &str, dataset: PlotDataset, color: Color) {
        let (x, y, style, axis) = match dataset {
            PlotDataset::Mwd => (
                (&MWD_LOG_M, &record.mwd.log_m),
                (&MWD_MMD, &record.mwd.mmd),
                LineStyle::Solid,
                AxisGroup::Primary,
            ),
            PlotDataset::Scb => (
                (&SCB_LOG_M, &record.scb.log_m),
                (&SCB_CH3, &record.scb.ch3_per_1000_tc),
                LineStyle::Dashed,
                AxisGroup::Secondary,
            ),
        };

        match points(x, y) {
            Ok(points) => {
                log::debug!("plotting {dataset} for {sample}: {} points", points.len());
                self.chart.add_series(
                    DataSeries::new(points)
                        .with_name(format!("{sample} - {dataset}"))
                        .with_color(color)
                        .with_line_style(style)
                        .with_width(LINE_WIDTH)
                        .with_alpha(LINE_ALPHA)
                        .on_axis(axis),
                );
                self.plotted = true;
            }
            Err(error) => {
                log::warn!("cannot plot {dataset} for {sample}: {error}");
                self.warnings.push(PlotWarning::Series {
                    sample: sample.to_string(),
                    dataset,
                    error,
                });
            }
        }
    }

    fn finish(mut self) -> PlotOutcome {
        if !self.plotted {
            self.warnings.push(PlotWarning::NoDataPlotted);
            return PlotOutcome {
                figure: None,
                warnings: self.warnings,
            };
        }
        PlotOutcome {
            figure: Some(Figure { chart: self.chart }),
            warnings: self.warnings,
        }
    }
}

fn numbers(column: &MarkerColumn, series: &Series) -> Result<Vec<f64>, SeriesError> {
    let values = match series {
        Series::Values(values) => values,
        sentinel => {
            return Err(SeriesError::Sentinel {
                column: column.label,
                state: sentinel.sentinel().unwrap_or_default(),
            })
        }
    };

    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            value.as_number().ok_or_else(|| SeriesError::NonNumeric {
                column: column.label,
                index,
                value: match value {
                    CellValue::Empty => String::new(),
                    other => other.to_string(),
                },
            })
        })
        .collect()
}

fn points(
    (x_column, x): (&MarkerColumn, &Series),
    (y_column, y): (&MarkerColumn, &Series),
) -> Result<Vec<(f64, f64)>, SeriesError> {
    let x = numbers(x_column, x)?;
    let y = numbers(y_column, y)?;
    if x.len() != y.len() {
        return Err(SeriesError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    Ok(x.into_iter().zip(y).collect())
}

/// Build the comparison figure for `request` from the records in `session`.
pub fn plot(session: &Session, request: &PlotRequest) -> PlotOutcome {
    if session.is_empty() {
        return PlotOutcome::rejected(PlotWarning::NoFiles);
    }
    if request.selection.is_empty() {
        return PlotOutcome::rejected(PlotWarning::NoSelection);
    }
    if !(request.show_mwd || request.show_scb) {
        return PlotOutcome::rejected(PlotWarning::NoDatasetChosen);
    }

    request
        .selection
        .iter()
        .enumerate()
        .fold(PlotState::new(request), |state, (index, name)| {
            state.add_file(session, request, index, name)
        })
        .finish()
}
