//! Raster rendering with plotters
//!
//! Sizes in the chart model are in points (1/72 inch) and are scaled to
//! pixels by the output DPI, so a figure keeps its proportions at any
//! resolution.

use std::fmt::Display;
use std::ops::Range;

use image::RgbImage;
use plotters::backend::BitMapBackend;
use plotters::chart::ChartBuilder;
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{PathElement, Rectangle, Text};
use plotters::series::{DashedLineSeries, LineSeries};
use plotters::style::colors::{BLACK, TRANSPARENT, WHITE};
use plotters::style::{Color as _, IntoFont, RGBColor, ShapeStyle};

use crate::axis::AxisGroup;
use crate::chart::Chart;
use crate::color::Color;
use crate::error::{ChartError, ChartResult};
use crate::legend::{Legend, LegendPosition};
use crate::series::{DataSeries, LineStyle};

const FONT_FAMILY: &str = "sans-serif";
const TITLE_PT: f64 = 18.0;
const AXIS_TITLE_PT: f64 = 14.0;
const TICK_PT: f64 = 12.0;
const AXIS_LINE_PT: f64 = 0.8;
const GRID_LINE_PT: f64 = 0.5;
const GRID_ALPHA: f64 = 0.3;
/// Dash and gap lengths, as multiples of the line width
const DASH_ON: f64 = 3.7;
const DASH_OFF: f64 = 1.6;
/// Share of the canvas width reserved for an outside legend
const OUTSIDE_LEGEND_FRACTION: f64 = 0.2;
const MAX_SIDE_PX: u32 = 32_768;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Canvas size and resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Canvas width in inches
    pub width_in: f64,
    /// Canvas height in inches
    pub height_in: f64,
    /// Pixels per inch
    pub dpi: f64,
    /// White margin kept around the content by [`crate::export_png`]
    pub tight_pad_px: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width_in: 18.0,
            height_in: 10.0,
            dpi: 300.0,
            tight_pad_px: 30,
        }
    }
}

impl RenderOptions {
    /// Canvas size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        let side = |inches: f64| (inches * self.dpi).round() as u32;
        (side(self.width_in), side(self.height_in))
    }

    fn scale(&self) -> Scale {
        Scale(self.dpi / 72.0)
    }
}

/// Point to pixel conversion
#[derive(Debug, Clone, Copy)]
struct Scale(f64);

impl Scale {
    fn px(self, pt: f64) -> u32 {
        (pt * self.0).round().max(1.0) as u32
    }

    fn font(self, pt: f64) -> f64 {
        pt * self.0
    }
}

fn render_error<E: Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

fn to_rgb(color: Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

/// Rasterize a chart onto a white canvas.
pub fn render(chart: &Chart, options: &RenderOptions) -> ChartResult<RgbImage> {
    let (width, height) = options.pixel_size();
    if width == 0 || height == 0 || width > MAX_SIDE_PX || height > MAX_SIDE_PX {
        return Err(ChartError::InvalidDimensions { width, height });
    }
    log::debug!(
        "rendering chart with {} series at {}x{} px",
        chart.series.len(),
        width,
        height
    );

    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;
        draw(&root, chart, options.scale())?;
        root.present().map_err(render_error)?;
    }

    RgbImage::from_raw(width, height, buffer).ok_or(ChartError::InvalidDimensions { width, height })
}

fn draw(root: &Area<'_>, chart: &Chart, scale: Scale) -> ChartResult<()> {
    let has_entries = chart.legend_entries().next().is_some();

    match &chart.legend {
        Some(legend) if has_entries && legend.position == LegendPosition::OutsideRight => {
            let (width, _) = root.dim_in_pixel();
            let legend_width = (width as f64 * OUTSIDE_LEGEND_FRACTION) as u32;
            let (plot_area, legend_area) = root.split_horizontally(width - legend_width);
            draw_plot(&plot_area, chart, scale)?;
            draw_legend(&legend_area, chart, legend, scale)
        }
        Some(legend) if has_entries => {
            draw_plot(root, chart, scale)?;
            draw_legend(root, chart, legend, scale)
        }
        _ => draw_plot(root, chart, scale),
    }
}

fn x_values<'a>(series: &'a [&'a DataSeries]) -> impl Iterator<Item = f64> + 'a {
    series.iter().flat_map(|s| s.points.iter().map(|&(x, _)| x))
}

fn y_values<'a>(series: &'a [&'a DataSeries]) -> impl Iterator<Item = f64> + 'a {
    series.iter().flat_map(|s| s.points.iter().map(|&(_, y)| y))
}

fn draw_plot(area: &Area<'_>, chart: &Chart, scale: Scale) -> ChartResult<()> {
    let secondary_axis = chart.secondary_y_axis.as_ref();
    let primary: Vec<&DataSeries> = chart.series_on(AxisGroup::Primary).collect();
    let secondary: Vec<&DataSeries> = match secondary_axis {
        Some(_) => chart.series_on(AxisGroup::Secondary).collect(),
        None => Vec::new(),
    };

    let x_range = chart
        .x_axis
        .range(x_values(&primary).chain(x_values(&secondary)));
    let y_range = chart.y_axis.range(y_values(&primary));
    let y2_range: Range<f64> = match secondary_axis {
        Some(axis) => axis.range(y_values(&secondary)),
        None => 0.0..1.0,
    };

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(scale.px(10.0))
        .x_label_area_size(scale.px(40.0))
        .y_label_area_size(scale.px(60.0));
    if secondary_axis.is_some() {
        builder.right_y_label_area_size(scale.px(60.0));
    }
    if let Some(title) = &chart.title {
        builder.caption(title, (FONT_FAMILY, scale.font(TITLE_PT)).into_font());
    }

    let mut ctx = builder
        .build_cartesian_2d(x_range.clone(), y_range)
        .map_err(render_error)?
        .set_secondary_coord(x_range, y2_range);

    let tick_font = (FONT_FAMILY, scale.font(TICK_PT)).into_font();
    let desc_font = (FONT_FAMILY, scale.font(AXIS_TITLE_PT)).into_font();
    let axis_line = BLACK.stroke_width(scale.px(AXIS_LINE_PT));

    // x axis and grid; the y axis is drawn separately in its own colour
    {
        let mut mesh = ctx.configure_mesh();
        mesh.x_labels(10)
            .label_style(tick_font.clone())
            .axis_desc_style(desc_font.clone())
            .axis_style(axis_line)
            .disable_y_axis();
        if let Some(title) = &chart.x_axis.title {
            mesh.x_desc(title.as_str());
        }
        if chart.y_axis.grid {
            mesh.bold_line_style(BLACK.mix(GRID_ALPHA).stroke_width(scale.px(GRID_LINE_PT)))
                .light_line_style(TRANSPARENT);
        } else {
            mesh.disable_mesh();
        }
        mesh.draw().map_err(render_error)?;
    }

    {
        let color = to_rgb(chart.y_axis.color.unwrap_or(Color::BLACK));
        let mut mesh = ctx.configure_mesh();
        mesh.y_labels(8)
            .disable_mesh()
            .disable_x_axis()
            .label_style(tick_font.color(&color))
            .axis_desc_style(desc_font.color(&color))
            .axis_style(axis_line);
        if let Some(title) = &chart.y_axis.title {
            mesh.y_desc(title.as_str());
        }
        mesh.draw().map_err(render_error)?;
    }

    if let Some(axis) = secondary_axis {
        let color = to_rgb(axis.color.unwrap_or(Color::BLACK));
        let mut mesh = ctx.configure_secondary_axes();
        mesh.y_labels(8)
            .label_style(tick_font.color(&color))
            .axis_desc_style(desc_font.color(&color))
            .axis_style(axis_line);
        if let Some(title) = &axis.title {
            mesh.y_desc(title.as_str());
        }
        mesh.draw().map_err(render_error)?;
    }

    for series in &primary {
        let style = stroke_style(series, scale);
        match series.line_style {
            LineStyle::Solid => {
                ctx.draw_series(LineSeries::new(series.points.iter().copied(), style))
                    .map_err(render_error)?;
            }
            LineStyle::Dashed => {
                let (on, off) = dash_pattern(series, scale);
                ctx.draw_series(DashedLineSeries::new(series.points.iter().copied(), on, off, style))
                    .map_err(render_error)?;
            }
        }
    }

    for series in &secondary {
        let style = stroke_style(series, scale);
        match series.line_style {
            LineStyle::Solid => {
                ctx.draw_secondary_series(LineSeries::new(series.points.iter().copied(), style))
                    .map_err(render_error)?;
            }
            LineStyle::Dashed => {
                let (on, off) = dash_pattern(series, scale);
                ctx.draw_secondary_series(DashedLineSeries::new(
                    series.points.iter().copied(),
                    on,
                    off,
                    style,
                ))
                .map_err(render_error)?;
            }
        }
    }

    Ok(())
}

fn stroke_style(series: &DataSeries, scale: Scale) -> ShapeStyle {
    to_rgb(series.color)
        .mix(series.alpha)
        .stroke_width(scale.px(series.width))
}

fn dash_pattern(series: &DataSeries, scale: Scale) -> (u32, u32) {
    (
        scale.px(series.width * DASH_ON),
        scale.px(series.width * DASH_OFF),
    )
}

fn draw_legend(area: &Area<'_>, chart: &Chart, legend: &Legend, scale: Scale) -> ChartResult<()> {
    let entries: Vec<&DataSeries> = chart.legend_entries().collect();
    let font_px = scale.font(legend.font_size);
    let text_style = (FONT_FAMILY, font_px).into_font().color(&BLACK);

    let pad = (font_px * 0.6).round() as i32;
    let row_height = (font_px * 1.6).round() as i32;
    let swatch = (font_px * 2.5).round() as i32;
    let mut text_width = 0;
    for name in entries.iter().filter_map(|s| s.name.as_deref()) {
        let (w, _) = area.estimate_text_size(name, &text_style).map_err(render_error)?;
        text_width = text_width.max(w as i32);
    }

    let (area_width, area_height) = area.dim_in_pixel();
    let (area_width, area_height) = (area_width as i32, area_height as i32);
    let box_width = (pad * 3 + swatch + text_width).min(area_width - pad * 2);
    let box_height = pad * 2 + row_height * entries.len() as i32;

    let (x0, y0) = match legend.position {
        LegendPosition::OutsideRight => (pad * 2, ((area_height - box_height) / 2).max(0)),
        LegendPosition::UpperRight => (
            (area_width - box_width - scale.px(80.0) as i32).max(0),
            scale.px(60.0) as i32,
        ),
    };
    let (x1, y1) = (x0 + box_width, y0 + box_height);

    area.draw(&Rectangle::new([(x0, y0), (x1, y1)], WHITE.filled()))
        .map_err(render_error)?;
    if let Some(frame) = legend.frame {
        area.draw(&Rectangle::new(
            [(x0, y0), (x1, y1)],
            to_rgb(frame).stroke_width(scale.px(AXIS_LINE_PT)),
        ))
        .map_err(render_error)?;
    }

    for (row, series) in entries.iter().enumerate() {
        let y = y0 + pad + row as i32 * row_height + row_height / 2;
        let start = x0 + pad;
        let end = start + swatch;
        let style = stroke_style(series, scale);

        match series.line_style {
            LineStyle::Solid => {
                area.draw(&PathElement::new(vec![(start, y), (end, y)], style))
                    .map_err(render_error)?;
            }
            LineStyle::Dashed => {
                let (on, off) = dash_pattern(series, scale);
                let mut x = start;
                while x < end {
                    let stop = (x + on as i32).min(end);
                    area.draw(&PathElement::new(vec![(x, y), (stop, y)], style))
                        .map_err(render_error)?;
                    x = stop + off as i32;
                }
            }
        }

        if let Some(name) = &series.name {
            area.draw(&Text::new(
                name.as_str(),
                (end + pad, y - (font_px / 2.0).round() as i32),
                text_style.clone(),
            ))
            .map_err(render_error)?;
        }
    }

    Ok(())
}
