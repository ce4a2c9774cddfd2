//! Legend types

use crate::color::Color;

/// Chart legend
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    /// Position
    pub position: LegendPosition,
    /// Frame colour; `None` draws no frame
    pub frame: Option<Color>,
    /// Label size in points
    pub font_size: f64,
}

impl Legend {
    /// Create a new legend
    pub fn new(position: LegendPosition) -> Self {
        Self {
            position,
            frame: None,
            font_size: 12.0,
        }
    }

    pub fn with_frame(mut self, color: Color) -> Self {
        self.frame = Some(color);
        self
    }
}

impl Default for Legend {
    fn default() -> Self {
        Self::new(LegendPosition::default())
    }
}

/// Legend position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    /// Inside the plot area, upper right corner
    #[default]
    UpperRight,
    /// Outside the plot area, vertically centred to its right
    OutsideRight,
}
