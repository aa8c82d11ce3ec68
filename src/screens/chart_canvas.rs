use codearena::services::chart_renderer::{
    CANVAS_WIDTH, ChartPrimitive, ChartSurface, TextAnchor, lerp_color,
};
use eframe::egui;

/// Paints chart primitives into `rect`, scaling the 600×300 logical canvas to fit its width.
pub struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    rect: egui::Rect,
    scale: f32,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a egui::Painter, rect: egui::Rect) -> Self {
        Self {
            painter,
            rect,
            scale: rect.width() / CANVAS_WIDTH,
        }
    }

    fn map(&self, pos: egui::Pos2) -> egui::Pos2 {
        self.rect.min + pos.to_vec2() * self.scale
    }

    fn push_quad(
        mesh: &mut egui::Mesh,
        corners: [egui::Pos2; 4],
        colors: [egui::Color32; 4],
    ) {
        let base = mesh.vertices.len() as u32;
        for (pos, color) in corners.into_iter().zip(colors) {
            mesh.colored_vertex(pos, color);
        }
        mesh.add_triangle(base, base + 1, base + 2);
        mesh.add_triangle(base, base + 2, base + 3);
    }
}

impl ChartSurface for EguiSurface<'_> {
    fn draw(&mut self, primitive: &ChartPrimitive) {
        match primitive {
            ChartPrimitive::Clear => {
                self.painter
                    .rect_filled(self.rect, 0.0, egui::Color32::from_gray(10));
            }
            ChartPrimitive::VerticalGradientRect { rect, top, bottom } => {
                let min = self.map(rect.min);
                let max = self.map(rect.max);
                let mut mesh = egui::Mesh::default();
                Self::push_quad(
                    &mut mesh,
                    [
                        min,
                        egui::pos2(max.x, min.y),
                        max,
                        egui::pos2(min.x, max.y),
                    ],
                    [*top, *top, *bottom, *bottom],
                );
                self.painter.add(egui::Shape::mesh(mesh));
            }
            ChartPrimitive::Line {
                from,
                to,
                width,
                color,
            } => {
                self.painter.line_segment(
                    [self.map(*from), self.map(*to)],
                    egui::Stroke::new(width * self.scale, *color),
                );
            }
            ChartPrimitive::GradientPolyline {
                points,
                width,
                start,
                end,
            } => {
                let min_x = points.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
                let max_x = points.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
                let span = max_x - min_x;
                for pair in points.windows(2) {
                    let mid_x = (pair[0].x + pair[1].x) * 0.5;
                    let t = if span > 0.0 { (mid_x - min_x) / span } else { 0.0 };
                    self.painter.line_segment(
                        [self.map(pair[0]), self.map(pair[1])],
                        egui::Stroke::new(width * self.scale, lerp_color(*start, *end, t)),
                    );
                }
            }
            ChartPrimitive::AreaFill {
                points,
                baseline_y,
                gradient_top_y,
                top,
                bottom,
            } => {
                let range = baseline_y - gradient_top_y;
                let shade = |y: f32| {
                    let t = if range > 0.0 { (y - gradient_top_y) / range } else { 1.0 };
                    lerp_color(*top, *bottom, t)
                };
                let mut mesh = egui::Mesh::default();
                for pair in points.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    Self::push_quad(
                        &mut mesh,
                        [
                            self.map(a),
                            self.map(b),
                            self.map(egui::pos2(b.x, *baseline_y)),
                            self.map(egui::pos2(a.x, *baseline_y)),
                        ],
                        [shade(a.y), shade(b.y), *bottom, *bottom],
                    );
                }
                self.painter.add(egui::Shape::mesh(mesh));
            }
            ChartPrimitive::Circle {
                center,
                radius,
                color,
            } => {
                self.painter
                    .circle_filled(self.map(*center), radius * self.scale, *color);
            }
            ChartPrimitive::Text {
                pos,
                anchor,
                text,
                size,
                color,
            } => {
                let align = match anchor {
                    TextAnchor::CenterTop => egui::Align2::CENTER_TOP,
                    TextAnchor::RightCenter => egui::Align2::RIGHT_CENTER,
                };
                self.painter.text(
                    self.map(*pos),
                    align,
                    text,
                    egui::FontId::proportional(size * self.scale),
                    *color,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codearena::models::Sample;
    use codearena::services::chart_renderer::{CANVAS_HEIGHT, render};

    #[test]
    fn scales_logical_points_into_rect() {
        let ctx = egui::Context::default();
        let painter = egui::Painter::new(
            ctx,
            egui::LayerId::background(),
            egui::Rect::EVERYTHING,
        );
        let rect = egui::Rect::from_min_size(
            egui::pos2(10.0, 20.0),
            egui::vec2(CANVAS_WIDTH * 2.0, CANVAS_HEIGHT * 2.0),
        );
        let surface = EguiSurface::new(&painter, rect);
        assert_eq!(surface.map(egui::pos2(0.0, 0.0)), egui::pos2(10.0, 20.0));
        assert_eq!(
            surface.map(egui::pos2(CANVAS_WIDTH, CANVAS_HEIGHT)),
            egui::pos2(1210.0, 620.0)
        );
    }

    #[test]
    fn full_chart_paints_inside_a_frame() {
        let ctx = egui::Context::default();
        let samples: Vec<Sample> = (1..=10)
            .map(|i| Sample {
                input_size: i * 100,
                execution_time: f64::from(i),
            })
            .collect();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let (rect, _) = ui.allocate_exact_size(
                    egui::vec2(CANVAS_WIDTH, CANVAS_HEIGHT),
                    egui::Sense::hover(),
                );
                let painter = ui.painter_at(rect);
                let mut surface = EguiSurface::new(&painter, rect);
                render(Some(&mut surface), &samples);
            });
        });
        assert!(output.shapes.len() > 40);
    }
}
