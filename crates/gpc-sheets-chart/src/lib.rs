//! # gpc-sheets-chart
//!
//! Line chart model and raster export for gpc-sheets.
//!
//! A [`Chart`] is a plain description: x/y series on a primary or secondary
//! value axis, axis titles and colours, and an optional legend. [`render`]
//! rasterizes it with plotters and [`export_png`] encodes the result.
//!
//! ```rust
//! use gpc_sheets_chart::{Axis, AxisGroup, Chart, Color, DataSeries, LineStyle};
//!
//! let mut chart = Chart::new()
//!     .with_title("GPC Comparison Plot")
//!     .with_x_axis(Axis::new().with_title("LogM"))
//!     .with_y_axis(Axis::new().with_title("MMD"));
//! chart.add_series(
//!     DataSeries::new(vec![(2.0, 0.1), (3.0, 0.4)])
//!         .with_name("PE-1 - MWD")
//!         .with_color(Color::from_hex("#1f77b4").unwrap())
//!         .with_line_style(LineStyle::Solid),
//! );
//! assert_eq!(chart.series_on(AxisGroup::Primary).count(), 1);
//! ```

mod axis;
mod chart;
mod color;
mod error;
mod export;
mod legend;
mod render;
mod series;

pub use axis::{padded_range, Axis, AxisGroup};
pub use chart::Chart;
pub use color::{palette_color, Color, PALETTE};
pub use error::{ChartError, ChartResult};
pub use export::{export_png, tight_crop};
pub use legend::{Legend, LegendPosition};
pub use render::{render, RenderOptions};
pub use series::{DataSeries, LineStyle};
