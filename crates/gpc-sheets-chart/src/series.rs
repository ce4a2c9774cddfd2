//! Data series types

use crate::axis::AxisGroup;
use crate::color::{Color, PALETTE};

/// Line stroke pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

/// One x/y line of a chart
#[derive(Debug, Clone, PartialEq)]
pub struct DataSeries {
    /// Series name, shown in the legend
    pub name: Option<String>,
    /// Points in drawing order
    pub points: Vec<(f64, f64)>,
    pub color: Color,
    pub line_style: LineStyle,
    /// Stroke width in points (1/72 inch)
    pub width: f64,
    /// Opacity in `0.0..=1.0`
    pub alpha: f64,
    /// Value axis the series is plotted against
    pub axis: AxisGroup,
}

impl DataSeries {
    /// Create a new data series
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self {
            name: None,
            points,
            color: PALETTE[0],
            line_style: LineStyle::Solid,
            width: 1.5,
            alpha: 1.0,
            axis: AxisGroup::Primary,
        }
    }

    /// Build a series by pairing x and y values.
    ///
    /// Returns `None` when the lengths differ.
    pub fn from_xy(x: &[f64], y: &[f64]) -> Option<Self> {
        (x.len() == y.len()).then(|| Self::new(x.iter().copied().zip(y.iter().copied()).collect()))
    }

    /// Set series name
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_line_style(mut self, line_style: LineStyle) -> Self {
        self.line_style = line_style;
        self
    }

    /// Set stroke width in points
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Set opacity, clamped to `0.0..=1.0`
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Plot against the given value axis
    pub fn on_axis(mut self, axis: AxisGroup) -> Self {
        self.axis = axis;
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
