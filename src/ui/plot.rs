use std::f32::consts::FRAC_PI_2;

use eframe::egui::{self, epaint::TextShape, Align2, Color32, FontId, Pos2, Rect, Sense, Ui, Vec2};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::{self, ColorMap};
use crate::data::stats::Histogram;
use crate::data::summary::{CorrelationMatrix, GroupTotal};

const PLOT_HEIGHT: f32 = 360.0;

// ---------------------------------------------------------------------------
// Distribution histogram
// ---------------------------------------------------------------------------

pub fn histogram_plot(ui: &mut Ui, column: &str, histogram: &Histogram) {
    let width = histogram.bin_width();
    let bars: Vec<Bar> = histogram
        .centers()
        .into_iter()
        .zip(&histogram.counts)
        .map(|(x, &n)| Bar::new(x, n as f64).width(width))
        .collect();

    let chart = BarChart::new(bars)
        .color(Color32::LIGHT_BLUE)
        .name(format!("{column} Distribution"));

    Plot::new("distribution_plot")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label(column.to_string())
        .y_axis_label("Frequency")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

// ---------------------------------------------------------------------------
// Category bar chart
// ---------------------------------------------------------------------------

/// One bar per category at x = 0, 1, 2, … labelled with the category value.
pub fn category_plot(ui: &mut Ui, numeric: &str, groups: &[GroupTotal], colors: Option<&ColorMap>) {
    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let fill = colors.map_or(Color32::LIGHT_BLUE, |c| c.color_for(&g.category));
            Bar::new(i as f64, g.sum)
                .width(0.6)
                .name(&g.category)
                .fill(fill)
        })
        .collect();

    let labels: Vec<String> = groups.iter().map(|g| g.category.clone()).collect();

    Plot::new("category_plot")
        .height(PLOT_HEIGHT)
        .y_axis_label(numeric.to_string())
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(numeric));
        });
}

// ---------------------------------------------------------------------------
// Correlation heat-map
// ---------------------------------------------------------------------------

const LABEL_SPACE: f32 = 130.0;
const SCALE_HEIGHT: f32 = 14.0;

/// Square matrix of coloured cells with the coefficient printed in each,
/// row labels on the left, rotated column labels on top and a −1…+1 scale
/// underneath.
pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.size();
    let cell = ((ui.available_width() - LABEL_SPACE) / n as f32).clamp(28.0, 80.0);
    let grid = cell * n as f32;
    let size = Vec2::new(LABEL_SPACE + grid, LABEL_SPACE + grid + 3.0 * SCALE_HEIGHT);

    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min + Vec2::splat(LABEL_SPACE);
    let text_color = ui.visuals().text_color();
    let font = FontId::proportional(12.0);

    let cell_rect = |i: usize, j: usize| {
        Rect::from_min_size(
            origin + Vec2::new(j as f32 * cell, i as f32 * cell),
            Vec2::splat(cell),
        )
    };

    for i in 0..n {
        for j in 0..n {
            let r = matrix.get(i, j);
            let rect = cell_rect(i, j);
            painter.rect_filled(rect.shrink(0.5), 0.0, color::diverging(r));
            if cell >= 36.0 {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    format_r(r),
                    FontId::proportional(11.0),
                    Color32::BLACK,
                );
            }
        }
    }

    for (k, name) in matrix.names.iter().enumerate() {
        let mid = (k as f32 + 0.5) * cell;
        painter.text(
            Pos2::new(origin.x - 6.0, origin.y + mid),
            Align2::RIGHT_CENTER,
            name,
            font.clone(),
            text_color,
        );

        let galley = painter.layout_no_wrap(name.clone(), font.clone(), text_color);
        let pos = Pos2::new(origin.x + mid - galley.size().y / 2.0, origin.y - 6.0);
        painter.add(TextShape::new(pos, galley, text_color).with_angle(-FRAC_PI_2));
    }

    // colour scale
    let scale_top = origin.y + grid + SCALE_HEIGHT;
    let steps = 40;
    let step_w = grid / steps as f32;
    for s in 0..steps {
        let r = -1.0 + 2.0 * (s as f64 + 0.5) / steps as f64;
        let rect = Rect::from_min_size(
            Pos2::new(origin.x + s as f32 * step_w, scale_top),
            Vec2::new(step_w + 0.5, SCALE_HEIGHT),
        );
        painter.rect_filled(rect, 0.0, color::diverging(r));
    }
    for (label, align, x) in [
        ("-1", Align2::LEFT_TOP, origin.x),
        ("0", Align2::CENTER_TOP, origin.x + grid / 2.0),
        ("+1", Align2::RIGHT_TOP, origin.x + grid),
    ] {
        painter.text(
            Pos2::new(x, scale_top + SCALE_HEIGHT + 2.0),
            align,
            label,
            FontId::proportional(10.0),
            text_color,
        );
    }

    let hovered = response.hover_pos().and_then(|pos| {
        let rel = pos - origin;
        if rel.x < 0.0 || rel.y < 0.0 {
            return None;
        }
        let (i, j) = ((rel.y / cell) as usize, (rel.x / cell) as usize);
        (i < n && j < n).then_some((i, j))
    });
    if let Some((i, j)) = hovered {
        response.on_hover_text(format!(
            "{} × {}: {}",
            matrix.names[i],
            matrix.names[j],
            format_r(matrix.get(i, j))
        ));
    }
}

fn format_r(r: f64) -> String {
    if r.is_nan() {
        "n/a".to_string()
    } else {
        format!("{r:.2}")
    }
}

/// Placeholder shown instead of a chart.
pub fn info_message(ui: &mut Ui, message: impl Into<String>) {
    ui.add_space(12.0);
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.label(format!("ℹ {}", message.into()));
    });
}
