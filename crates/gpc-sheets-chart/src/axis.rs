//! Axis types

use std::ops::Range;

use crate::color::Color;

/// Chart axis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axis {
    /// Axis title
    pub title: Option<String>,
    /// Colour of the title and tick labels (black when unset)
    pub color: Option<Color>,
    /// Draw grid lines at the major ticks
    pub grid: bool,
    /// Minimum value
    pub minimum: Option<f64>,
    /// Maximum value
    pub maximum: Option<f64>,
}

impl Axis {
    /// Create a new axis
    pub fn new() -> Self {
        Self::default()
    }

    /// Set axis title
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_grid(mut self, grid: bool) -> Self {
        self.grid = grid;
        self
    }

    /// Set axis bounds
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.minimum = Some(min);
        self.maximum = Some(max);
        self
    }

    /// Data range for this axis, honouring explicit bounds
    pub(crate) fn range<I: IntoIterator<Item = f64>>(&self, values: I) -> Range<f64> {
        let auto = padded_range(values);
        let start = self.minimum.unwrap_or(auto.start);
        let end = self.maximum.unwrap_or(auto.end);
        if start < end {
            start..end
        } else {
            auto
        }
    }
}

/// Which value axis a series is plotted against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisGroup {
    /// Left y axis
    #[default]
    Primary,
    /// Right y axis, independent scale, shared x
    Secondary,
}

/// Range covering all finite `values` with a 5% margin on each side.
///
/// No values gives `0.0..1.0`; a single distinct value is widened by 0.5.
pub fn padded_range<I: IntoIterator<Item = f64>>(values: I) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 1.0));

    let span = max - min;
    let padding = if span < 1e-12 { 0.5 } else { span * 0.05 };
    (min - padding)..(max + padding)
}
