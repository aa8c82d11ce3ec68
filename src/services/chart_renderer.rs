//! Performance chart for the complexity analyzer.
//!
//! Drawing happens in two steps: [`build_scene`] turns samples into an
//! ordered list of [`ChartPrimitive`]s on a fixed 600×300 logical canvas,
//! then [`render`] replays them onto whatever [`ChartSurface`] the caller
//! owns. The caller scales logical units to screen pixels.

use eframe::egui::{Color32, Pos2, Rect, pos2};
use tracing::debug;

use crate::models::Sample;

pub const CANVAS_WIDTH: f32 = 600.0;
pub const CANVAS_HEIGHT: f32 = 300.0;
pub const GRID_DIVISIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

pub const MARGINS: Margins = Margins {
    left: 50.0,
    right: 50.0,
    top: 30.0,
    bottom: 30.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text sits below the point, horizontally centered.
    CenterTop,
    /// Text ends at the point, vertically centered.
    RightCenter,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartPrimitive {
    Clear,
    VerticalGradientRect {
        rect: Rect,
        top: Color32,
        bottom: Color32,
    },
    Line {
        from: Pos2,
        to: Pos2,
        width: f32,
        color: Color32,
    },
    /// Stroke whose color runs from `start` at the leftmost x to `end` at the rightmost x.
    GradientPolyline {
        points: Vec<Pos2>,
        width: f32,
        start: Color32,
        end: Color32,
    },
    /// Area between `points` and the horizontal line `baseline_y`, shaded
    /// from `top` at `gradient_top_y` to `bottom` at `baseline_y`.
    AreaFill {
        points: Vec<Pos2>,
        baseline_y: f32,
        gradient_top_y: f32,
        top: Color32,
        bottom: Color32,
    },
    Circle {
        center: Pos2,
        radius: f32,
        color: Color32,
    },
    Text {
        pos: Pos2,
        anchor: TextAnchor,
        text: String,
        size: f32,
        color: Color32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartScene {
    pub primitives: Vec<ChartPrimitive>,
}

impl ChartScene {
    fn push(&mut self, primitive: ChartPrimitive) {
        self.primitives.push(primitive);
    }
}

/// Anything that can paint chart primitives given in logical canvas units.
pub trait ChartSurface {
    fn draw(&mut self, primitive: &ChartPrimitive);
}

/// Surface that keeps every primitive it receives.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub drawn: Vec<ChartPrimitive>,
}

impl ChartSurface for RecordingSurface {
    fn draw(&mut self, primitive: &ChartPrimitive) {
        self.drawn.push(primitive.clone());
    }
}

struct Palette;

impl Palette {
    const BACKGROUND_TOP: Color32 = Color32::from_rgb(30, 27, 75);
    const BACKGROUND_BOTTOM: Color32 = Color32::from_rgb(15, 23, 42);
    const GRID: Color32 = Color32::from_rgba_premultiplied(15, 17, 19, 26);
    const AXIS_START: Color32 = Color32::from_rgb(99, 102, 241);
    const AXIS_END: Color32 = Color32::from_rgb(168, 85, 247);
    const LABEL: Color32 = Color32::from_rgb(148, 163, 184);
    const LINE_START: Color32 = Color32::from_rgb(99, 102, 241);
    const LINE_END: Color32 = Color32::from_rgb(236, 72, 153);
    const AREA_TOP: Color32 = Color32::from_rgba_premultiplied(30, 31, 73, 77);
    const AREA_BOTTOM: Color32 = Color32::TRANSPARENT;
    const MARKER_GLOW: Color32 = Color32::from_rgba_premultiplied(71, 22, 46, 77);
    const MARKER_DOT: Color32 = Color32::from_rgb(236, 72, 153);
}

const LABEL_SIZE: f32 = 11.0;
const GRID_WIDTH: f32 = 1.0;
const AXIS_WIDTH: f32 = 2.0;
const LINE_WIDTH: f32 = 3.0;
const GLOW_RADIUS: f32 = 8.0;
const DOT_RADIUS: f32 = 4.0;

/// Inner rectangle where data is plotted.
pub fn plot_area() -> Rect {
    Rect::from_min_max(
        pos2(MARGINS.left, MARGINS.top),
        pos2(CANVAS_WIDTH - MARGINS.right, CANVAS_HEIGHT - MARGINS.bottom),
    )
}

/// Largest input size and execution time, or `None` for no samples.
pub fn data_bounds(samples: &[Sample]) -> Option<(f64, f64)> {
    if samples.is_empty() {
        return None;
    }
    let max_input = samples
        .iter()
        .map(|s| f64::from(s.input_size))
        .fold(f64::MIN, f64::max);
    let max_time = samples
        .iter()
        .map(|s| s.execution_time)
        .fold(f64::MIN, f64::max);
    Some((max_input, max_time))
}

fn safe_divisor(value: f64) -> f64 {
    if value > 0.0 { value } else { 1.0 }
}

pub fn sample_position(sample: &Sample, max_input: f64, max_time: f64, area: Rect) -> Pos2 {
    let x_ratio = f64::from(sample.input_size) / safe_divisor(max_input);
    let y_ratio = sample.execution_time / safe_divisor(max_time);
    pos2(
        area.left() + (x_ratio as f32) * area.width(),
        area.bottom() - (y_ratio as f32) * area.height(),
    )
}

pub fn build_scene(samples: &[Sample]) -> ChartScene {
    let mut scene = ChartScene::default();
    let area = plot_area();
    let bounds = data_bounds(samples);
    let (max_input, max_time) = bounds.unwrap_or((0.0, 0.0));

    scene.push(ChartPrimitive::Clear);
    scene.push(ChartPrimitive::VerticalGradientRect {
        rect: Rect::from_min_max(Pos2::ZERO, pos2(CANVAS_WIDTH, CANVAS_HEIGHT)),
        top: Palette::BACKGROUND_TOP,
        bottom: Palette::BACKGROUND_BOTTOM,
    });

    for step in 0..=GRID_DIVISIONS {
        let fraction = step as f32 / GRID_DIVISIONS as f32;
        let x = area.left() + fraction * area.width();
        let y = area.top() + fraction * area.height();
        scene.push(ChartPrimitive::Line {
            from: pos2(x, area.top()),
            to: pos2(x, area.bottom()),
            width: GRID_WIDTH,
            color: Palette::GRID,
        });
        scene.push(ChartPrimitive::Line {
            from: pos2(area.left(), y),
            to: pos2(area.right(), y),
            width: GRID_WIDTH,
            color: Palette::GRID,
        });
    }

    scene.push(ChartPrimitive::GradientPolyline {
        points: vec![area.left_bottom(), area.right_bottom()],
        width: AXIS_WIDTH,
        start: Palette::AXIS_START,
        end: Palette::AXIS_END,
    });
    scene.push(ChartPrimitive::GradientPolyline {
        points: vec![area.left_top(), area.left_bottom()],
        width: AXIS_WIDTH,
        start: Palette::AXIS_START,
        end: Palette::AXIS_END,
    });

    for step in 0..=GRID_DIVISIONS {
        let fraction = step as f64 / GRID_DIVISIONS as f64;
        let x = area.left() + fraction as f32 * area.width();
        scene.push(ChartPrimitive::Text {
            pos: pos2(x, area.bottom() + 8.0),
            anchor: TextAnchor::CenterTop,
            text: format!("{}", (max_input * fraction).round()),
            size: LABEL_SIZE,
            color: Palette::LABEL,
        });

        let y = area.top() + fraction as f32 * area.height();
        scene.push(ChartPrimitive::Text {
            pos: pos2(area.left() - 8.0, y),
            anchor: TextAnchor::RightCenter,
            text: format!("{:.1}", max_time * (1.0 - fraction)),
            size: LABEL_SIZE,
            color: Palette::LABEL,
        });
    }

    if bounds.is_none() {
        return scene;
    }

    let points: Vec<Pos2> = samples
        .iter()
        .map(|sample| sample_position(sample, max_input, max_time, area))
        .collect();

    scene.push(ChartPrimitive::AreaFill {
        points: points.clone(),
        baseline_y: area.bottom(),
        gradient_top_y: area.top(),
        top: Palette::AREA_TOP,
        bottom: Palette::AREA_BOTTOM,
    });
    scene.push(ChartPrimitive::GradientPolyline {
        points: points.clone(),
        width: LINE_WIDTH,
        start: Palette::LINE_START,
        end: Palette::LINE_END,
    });
    for center in points {
        scene.push(ChartPrimitive::Circle {
            center,
            radius: GLOW_RADIUS,
            color: Palette::MARKER_GLOW,
        });
        scene.push(ChartPrimitive::Circle {
            center,
            radius: DOT_RADIUS,
            color: Palette::MARKER_DOT,
        });
    }

    scene
}

/// Paints `samples` onto `surface`. Does nothing when there is no surface.
pub fn render<S: ChartSurface + ?Sized>(surface: Option<&mut S>, samples: &[Sample]) {
    let Some(surface) = surface else {
        debug!("Chart surface unavailable, skipping render");
        return;
    };

    let scene = build_scene(samples);
    debug!(
        "Rendering chart: samples={}, primitives={}",
        samples.len(),
        scene.primitives.len()
    );
    for primitive in &scene.primitives {
        surface.draw(primitive);
    }
}

/// Linear blend between two colors, `t` in `0..=1`.
pub fn lerp_color(from: Color32, to: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let [r0, g0, b0, a0] = from.to_srgba_unmultiplied();
    let [r1, g1, b1, a1] = to.to_srgba_unmultiplied();
    let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
    Color32::from_rgba_unmultiplied(mix(r0, r1), mix(g0, g1), mix(b0, b1), mix(a0, a1))
}
