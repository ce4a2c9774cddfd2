//! Chart definition

use crate::axis::{Axis, AxisGroup};
use crate::legend::Legend;
use crate::series::DataSeries;

/// A line chart with a primary and an optional secondary value axis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chart {
    /// Chart title
    pub title: Option<String>,
    /// Data series, in drawing order
    pub series: Vec<DataSeries>,
    /// Shared x axis
    pub x_axis: Axis,
    /// Left value axis
    pub y_axis: Axis,
    /// Right value axis; series on it are only drawn when this is set
    pub secondary_y_axis: Option<Axis>,
    pub legend: Option<Legend>,
}

impl Chart {
    /// Create an empty chart
    pub fn new() -> Self {
        Self::default()
    }

    /// Set chart title
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_x_axis(mut self, axis: Axis) -> Self {
        self.x_axis = axis;
        self
    }

    pub fn with_y_axis(mut self, axis: Axis) -> Self {
        self.y_axis = axis;
        self
    }

    pub fn with_secondary_y_axis(mut self, axis: Axis) -> Self {
        self.secondary_y_axis = Some(axis);
        self
    }

    pub fn with_legend(mut self, legend: Legend) -> Self {
        self.legend = Some(legend);
        self
    }

    /// Add a data series
    pub fn add_series(&mut self, series: DataSeries) {
        self.series.push(series);
    }

    /// Series plotted against `axis`, in drawing order
    pub fn series_on(&self, axis: AxisGroup) -> impl Iterator<Item = &DataSeries> {
        self.series.iter().filter(move |s| s.axis == axis)
    }

    /// Legend entries: primary-axis series first, then secondary, unnamed skipped
    pub fn legend_entries(&self) -> impl Iterator<Item = &DataSeries> {
        self.series_on(AxisGroup::Primary)
            .chain(self.series_on(AxisGroup::Secondary))
            .filter(|s| s.name.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
