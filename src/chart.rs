use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use std::path::Path;

use crate::curve::monotone_polyline;
use crate::error::RenderError;
use crate::scale::{series_color, LinearScale, TimeScale};
use crate::{min_and_max, suitable_xfmt, GenreTrends};

const X_DESC: &str = "Month";
const Y_DESC: &str = "Number of Songs";

const X_TICKS_MAX: usize = 12;
const Y_TICKS_TARGET: usize = 8;
const TICK_LEN: i32 = 5;
const CURVE_SAMPLES: usize = 16;
const LEGEND_SWATCH: i32 = 15;
const LEGEND_ROW: i32 = 20;
const LEGEND_GAP: i32 = 20;

/// Pixel margins between the plot area and the surface edges.
#[derive(Debug, Clone, Copy)]
pub struct Margin {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Default for Margin {
    fn default() -> Margin {
        Margin {
            top: 50,
            bottom: 50,
            left: 50,
            right: 50,
        }
    }
}

/// Size, margins and background of the drawing surface.
/// The scales map into the margined plot area inside `width` by `height`,
/// the surface itself is `width + legend_width` by `height` pixels so the
/// legend sits right of the plot.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    pub background: RGBColor,
    pub legend_width: u32,
}

impl Default for PlotConfig {
    fn default() -> PlotConfig {
        PlotConfig {
            width: 1000,
            height: 800,
            margin: Margin::default(),
            background: RGBColor(255, 255, 224),
            legend_width: 200,
        }
    }
}

impl PlotConfig {
    pub fn surface_size(&self) -> (u32, u32) {
        (self.width + self.legend_width, self.height)
    }
}

/// One genre line ready to draw: the points in input order and the palette
/// color assigned from the genre's first-seen index.
#[derive(Debug, Clone)]
pub struct SeriesModel {
    pub genre: String,
    pub color: RGBColor,
    pub points: Vec<(NaiveDate, f64)>,
}

/// The in-memory chart model, built before anything is drawn:
/// the grouped series plus the two shared scales.
#[derive(Debug, Clone)]
pub struct ChartModel {
    pub series: Vec<SeriesModel>,
    pub x: TimeScale,
    pub y: LinearScale,
}

impl ChartModel {
    /// Groups the rows and derives the scales.
    /// The vertical domain is pinned at zero up to the largest count, the
    /// horizontal domain spans the observed months. An empty table fails,
    /// a degenerate chart with no lines is never drawn.
    pub fn build(trends: &GenreTrends, config: &PlotConfig) -> Result<ChartModel, RenderError> {
        if trends.is_empty() {
            return Err(RenderError::EmptyData);
        }
        let (_, count_max) = min_and_max(&trends.count[..]);
        let (month_min, month_max) = min_and_max(&trends.month[..]);
        let y = LinearScale::new(
            (0.0, count_max),
            (
                (config.height - config.margin.bottom) as f64,
                config.margin.top as f64,
            ),
        );
        let x = TimeScale::new(
            (month_min, month_max),
            (
                config.margin.left as f64,
                (config.width - config.margin.right) as f64,
            ),
        );
        let series: Vec<SeriesModel> = trends
            .group_by_genre()
            .into_iter()
            .enumerate()
            .map(|(i, g)| SeriesModel {
                color: series_color(i),
                points: g
                    .month
                    .iter()
                    .copied()
                    .zip(g.count.iter().copied())
                    .collect(),
                genre: g.genre,
            })
            .collect();
        Ok(ChartModel { series, x, y })
    }
}

/// Draws the whole chart onto the given drawing area.
/// The area is an explicit parameter so callers can target any backend;
/// [`render`] and [`render_svg_string`] cover the common file and string cases.
pub fn draw<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    model: &ChartModel,
    config: &PlotConfig,
) -> Result<(), RenderError> {
    area.fill(&config.background).map_err(backend_err)?;
    draw_axes(area, model, config)?;
    draw_series(area, model)?;
    draw_legend(area, model, config)?;
    area.present().map_err(backend_err)?;
    Ok(())
}

/// Builds the model and renders it to the given path,
/// png for a `.png` extension and svg otherwise.
pub fn render(trends: &GenreTrends, config: &PlotConfig, out: &Path) -> Result<(), RenderError> {
    let model = ChartModel::build(trends, config)?;
    log::info!(
        "drawing {} genre lines to {}",
        model.series.len(),
        out.display()
    );
    match out.extension().and_then(|e| e.to_str()) {
        Some("png") => {
            let root = BitMapBackend::new(out, config.surface_size()).into_drawing_area();
            draw(&root, &model, config)
        }
        _ => {
            let root = SVGBackend::new(out, config.surface_size()).into_drawing_area();
            draw(&root, &model, config)
        }
    }
}

/// Renders into an in-memory svg string.
pub fn render_svg_string(trends: &GenreTrends, config: &PlotConfig) -> Result<String, RenderError> {
    let model = ChartModel::build(trends, config)?;
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, config.surface_size()).into_drawing_area();
        draw(&root, &model, config)?;
    }
    Ok(svg)
}

fn backend_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Backend(e.to_string())
}

fn draw_axes<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    model: &ChartModel,
    config: &PlotConfig,
) -> Result<(), RenderError> {
    let left = config.margin.left as i32;
    let right = (config.width - config.margin.right) as i32;
    let top = config.margin.top as i32;
    let bottom = (config.height - config.margin.bottom) as i32;
    let axis_style = BLACK.stroke_width(1);
    let label_font = ("sans-serif", 14).into_font();

    area.draw(&PathElement::new(
        vec![(left, bottom), (right, bottom)],
        axis_style,
    ))
    .map_err(backend_err)?;
    area.draw(&PathElement::new(
        vec![(left, top), (left, bottom)],
        axis_style,
    ))
    .map_err(backend_err)?;

    let xfmt = suitable_xfmt(model.x.domain.1 - model.x.domain.0);
    let x_label_style =
        TextStyle::from(label_font.clone()).pos(Pos::new(HPos::Center, VPos::Top));
    for tick in model.x.month_ticks(X_TICKS_MAX) {
        let px = model.x.map(tick).round() as i32;
        area.draw(&PathElement::new(
            vec![(px, bottom), (px, bottom + TICK_LEN)],
            axis_style,
        ))
        .map_err(backend_err)?;
        area.draw(&Text::new(
            tick.format(xfmt).to_string(),
            (px, bottom + TICK_LEN + 3),
            x_label_style.clone(),
        ))
        .map_err(backend_err)?;
    }

    let y_label_style =
        TextStyle::from(label_font.clone()).pos(Pos::new(HPos::Right, VPos::Center));
    for tick in model.y.ticks(Y_TICKS_TARGET) {
        let py = model.y.map(tick).round() as i32;
        area.draw(&PathElement::new(
            vec![(left - TICK_LEN, py), (left, py)],
            axis_style,
        ))
        .map_err(backend_err)?;
        area.draw(&Text::new(
            format_count(tick),
            (left - TICK_LEN - 3, py),
            y_label_style.clone(),
        ))
        .map_err(backend_err)?;
    }

    let desc_font = ("sans-serif", 16).into_font();
    let x_desc_style =
        TextStyle::from(desc_font.clone()).pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(
        X_DESC,
        ((config.width / 2) as i32, (config.height - 15) as i32),
        x_desc_style,
    ))
    .map_err(backend_err)?;
    let y_desc_style = TextStyle::from(desc_font.transform(FontTransform::Rotate270))
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(
        Y_DESC,
        (15, (config.height / 2) as i32),
        y_desc_style,
    ))
    .map_err(backend_err)?;
    Ok(())
}

fn draw_series<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    model: &ChartModel,
) -> Result<(), RenderError> {
    for series in &model.series {
        let scaled: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|&(m, c)| (model.x.map(m), model.y.map(c)))
            .collect();
        let path: Vec<(i32, i32)> = monotone_polyline(&scaled, CURVE_SAMPLES)
            .iter()
            .map(|&(x, y)| (x.round() as i32, y.round() as i32))
            .collect();
        area.draw(&PathElement::new(path, series.color.stroke_width(2)))
            .map_err(backend_err)?;
    }
    Ok(())
}

fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    model: &ChartModel,
    config: &PlotConfig,
) -> Result<(), RenderError> {
    let x0 = (config.width - config.margin.right) as i32 + LEGEND_GAP;
    let y0 = config.margin.top as i32;
    let label_style =
        TextStyle::from(("sans-serif", 12).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
    for (i, series) in model.series.iter().enumerate() {
        let y = y0 + i as i32 * LEGEND_ROW;
        area.draw(&Rectangle::new(
            [(x0, y), (x0 + LEGEND_SWATCH, y + LEGEND_SWATCH)],
            series.color.filled(),
        ))
        .map_err(backend_err)?;
        area.draw(&Text::new(
            series.genre.as_str(),
            (x0 + LEGEND_SWATCH + 5, y + LEGEND_SWATCH / 2),
            label_style.clone(),
        ))
        .map_err(backend_err)?;
    }
    Ok(())
}

fn format_count(v: f64) -> String {
    if v.fract().abs() < 1e-9 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_is_wider_than_the_plot() {
        let config = PlotConfig::default();
        assert_eq!(config.surface_size(), (1200, 800));
    }

    #[test]
    fn count_labels_drop_the_trailing_zeroes() {
        assert_eq!(format_count(10.0), "10");
        assert_eq!(format_count(2.5), "2.5");
    }
}
