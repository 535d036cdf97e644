use eframe::egui::{
    self, Align2, Color32, FontId, Mesh, Pos2, Rect, Sense, Shape, Stroke, Ui, pos2, vec2,
};

use crate::state::PlotData;
use crate::surface::{Camera, Point3};

const COLORBAR_WIDTH: f32 = 80.0;
const COLORBAR_STEPS: usize = 48;
/// Radians per dragged point.
const DRAG_SPEED: f64 = 0.01;
/// Pixels around a sample that still count as hovering it.
const HOVER_RADIUS: f64 = 10.0;

// ---------------------------------------------------------------------------
// Surface views (central panel)
// ---------------------------------------------------------------------------

/// Fixed-camera view with colour bar.
pub fn static_surface(ui: &mut Ui, plot: &PlotData) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("3D Surface Plot");
    });
    let mut camera = Camera::default();
    surface_canvas(ui, plot, &mut camera, false);
}

/// Drag to rotate, scroll to zoom, double-click to reset.
pub fn interactive_surface(ui: &mut Ui, plot: &PlotData, camera: &mut Camera) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("Interactive 3D Surface Plot");
        ui.weak("drag to rotate · scroll to zoom · double-click to reset · hover for values");
    });
    surface_canvas(ui, plot, camera, true);
}

fn surface_canvas(ui: &mut Ui, plot: &PlotData, camera: &mut Camera, interactive: bool) {
    let sense = if interactive {
        Sense::click_and_drag()
    } else {
        Sense::hover()
    };
    let (response, painter) = ui.allocate_painter(ui.available_size(), sense);

    if interactive {
        if response.dragged() {
            let d = response.drag_delta();
            camera.rotate(-d.x as f64 * DRAG_SPEED, d.y as f64 * DRAG_SPEED);
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                camera.zoom_by((scroll as f64 * 0.002).exp());
            }
        }
        if response.double_clicked() {
            *camera = Camera::default();
        }
    }

    let rect = response.rect;
    let (plot_rect, bar_rect) = rect.split_left_right_at_x(rect.right() - COLORBAR_WIDTH);
    let text_color = ui.visuals().text_color();
    let axis_color = ui.visuals().weak_text_color();

    let center = plot_rect.center();
    let scale = plot_rect.width().min(plot_rect.height()) as f64 * 0.55 * camera.zoom;
    let to_screen = |p: Point3| -> Pos2 {
        let (sx, sy) = camera.project(p);
        pos2(center.x + (sx * scale) as f32, center.y - (sy * scale) as f32)
    };

    // Axes along the low edges of the cube.
    let origin = Point3::new(-0.5, -0.5, -0.5);
    let ends = [
        Point3::new(0.5, -0.5, -0.5),
        Point3::new(-0.5, 0.5, -0.5),
        Point3::new(-0.5, -0.5, 0.5),
    ];
    let labels = [&plot.labels.x, &plot.labels.y, &plot.labels.z];
    let o = to_screen(origin);
    for ((end, label), (lo, hi)) in ends.iter().zip(labels).zip(plot.surface.ranges) {
        let e = to_screen(*end);
        painter.line_segment([o, e], Stroke::new(1.0, axis_color));
        let font = FontId::proportional(11.0);
        painter.text(o + (e - o) * 0.05, Align2::CENTER_TOP, format_tick(lo), font.clone(), axis_color);
        painter.text(e, Align2::CENTER_TOP, format_tick(hi), font, axis_color);
        painter.text(
            o + (e - o) * 1.12,
            Align2::CENTER_CENTER,
            label,
            FontId::proportional(14.0),
            text_color,
        );
    }

    let surface = &plot.surface;
    if surface.triangle_count() > 0 {
        let mut mesh = Mesh::default();
        for facet in surface.facets(camera) {
            let base = mesh.vertices.len() as u32;
            for corner in facet.corners {
                mesh.colored_vertex(to_screen(corner), facet.color);
            }
            mesh.add_triangle(base, base + 1, base + 2);
        }
        painter.add(Shape::mesh(mesh));
    } else {
        // A single row or column of samples cannot form a surface.
        for (p, color) in surface.points() {
            painter.circle_filled(to_screen(p), 4.0, color);
        }
    }

    colorbar(&painter, bar_rect, plot, text_color);

    // Readout of the sample nearest to the cursor.
    if interactive && scale > 0.0 {
        if let Some(pos) = response.hover_pos() {
            let target = (
                (pos.x - center.x) as f64 / scale,
                (center.y - pos.y) as f64 / scale,
            );
            if let Some(node) = surface.nearest(camera, target, HOVER_RADIUS / scale) {
                painter.circle_stroke(to_screen(node.pos), 5.0, Stroke::new(1.5, text_color));
                let [x, y, z] = node.value;
                let labels = &plot.labels;
                response.on_hover_text(format!(
                    "{}: {x}\n{}: {y}\n{}: {z}",
                    labels.x, labels.y, labels.z
                ));
            }
        }
    }
}

fn colorbar(painter: &egui::Painter, rect: Rect, plot: &PlotData, text_color: Color32) {
    let bar = Rect::from_min_size(
        rect.left_top() + vec2(8.0, rect.height() * 0.15),
        vec2(16.0, rect.height() * 0.7),
    );
    let entries = plot.surface.scale.legend_entries(COLORBAR_STEPS);
    let step = bar.height() / entries.len() as f32;
    for (i, (_, color)) in entries.iter().enumerate() {
        let top = bar.top() + i as f32 * step;
        let cell = Rect::from_min_max(pos2(bar.left(), top), pos2(bar.right(), top + step + 0.5));
        painter.rect_filled(cell, 0.0, *color);
    }

    let font = FontId::proportional(11.0);
    let (min, max) = (plot.surface.scale.min, plot.surface.scale.max);
    for (value, y) in [
        (max, bar.top()),
        (min / 2.0 + max / 2.0, bar.center().y),
        (min, bar.bottom()),
    ] {
        painter.text(
            pos2(bar.right() + 4.0, y),
            Align2::LEFT_CENTER,
            format_tick(value),
            font.clone(),
            text_color,
        );
    }
}

/// Short tick label: integers without decimals, everything else to 3 places.
fn format_tick(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e9 {
        format!("{v:.0}")
    } else if v.abs() >= 1e5 || (v != 0.0 && v.abs() < 1e-3) {
        format!("{v:.2e}")
    } else {
        format!("{v:.3}")
    }
}
