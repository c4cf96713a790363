//! Annotated correlation heatmap with a diverging colour map.

use crate::types::CorrelationMatrix;
use egui::{Align2, Color32, FontId, Painter, Rect, Stroke, pos2, vec2};

/// Anchor colours of the "coolwarm" diverging map at 0.0, 0.5 and 1.0.
const COOLWARM: [[f64; 3]; 3] = [
    [59.0, 76.0, 192.0],
    [221.0, 221.0, 221.0],
    [180.0, 4.0, 38.0],
];

/// Colour of undefined cells.
pub const NAN_COLOR: [u8; 3] = [160, 160, 160];

/// Map `t` in `[0, 1]` to blue-white-red; out-of-range values are clamped.
pub fn coolwarm(t: f64) -> [u8; 3] {
    if t.is_nan() {
        return NAN_COLOR;
    }
    let t = t.clamp(0.0, 1.0);
    let (from, to, local) = if t < 0.5 {
        (COOLWARM[0], COOLWARM[1], t * 2.0)
    } else {
        (COOLWARM[1], COOLWARM[2], (t - 0.5) * 2.0)
    };

    let mut rgb = [0u8; 3];
    for (channel, out) in rgb.iter_mut().enumerate() {
        *out = (from[channel] + (to[channel] - from[channel]) * local).round() as u8;
    }
    rgb
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
    /// Value mapped to the cold end.
    pub vmin: f64,
    /// Value mapped to the warm end.
    pub vmax: f64,
}

impl Heatmap {
    /// Correlations on a fixed -1..1 scale.
    pub fn from_matrix(matrix: &CorrelationMatrix, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            labels: matrix.labels.clone(),
            values: matrix.values.clone(),
            vmin: -1.0,
            vmax: 1.0,
        }
    }

    /// Fill colour of a cell.
    pub fn cell_color(&self, row: usize, col: usize) -> [u8; 3] {
        let value = self.values[row][col];
        coolwarm((value - self.vmin) / (self.vmax - self.vmin))
    }

    /// Text drawn in a cell.
    pub fn annotation(&self, row: usize, col: usize) -> String {
        let value = self.values[row][col];
        if value.is_nan() {
            "NaN".to_string()
        } else {
            format!("{:.2}", value)
        }
    }

    /// Draw the heatmap into `rect`.
    pub fn paint(&self, painter: &Painter, rect: Rect, text_color: Color32) {
        let n = self.labels.len();
        if n == 0 {
            return;
        }

        let font = FontId::proportional(12.0);
        painter.text(
            pos2(rect.center().x, rect.top() + 8.0),
            Align2::CENTER_TOP,
            &self.title,
            FontId::proportional(18.0),
            text_color,
        );

        let label_width = self
            .labels
            .iter()
            .map(|l| painter.layout_no_wrap(l.clone(), font.clone(), text_color).size().x)
            .fold(0.0_f32, f32::max)
            + 12.0;

        let colorbar_width = 70.0;
        let available_w = rect.width() - label_width - colorbar_width - 20.0;
        let available_h = rect.height() - 40.0 - 30.0;
        let side = available_w.min(available_h).max(0.0);
        if side <= 0.0 {
            return;
        }
        let cell = side / n as f32;
        let grid = Rect::from_min_size(
            pos2(rect.left() + label_width, rect.top() + 40.0),
            vec2(side, side),
        );

        for row in 0..n {
            for col in 0..n {
                let min = grid.min + vec2(col as f32 * cell, row as f32 * cell);
                let cell_rect = Rect::from_min_size(min, vec2(cell, cell));
                let [r, g, b] = self.cell_color(row, col);
                painter.rect_filled(cell_rect, 0.0, Color32::from_rgb(r, g, b));

                let value = self.values[row][col];
                let ink = if value.abs() > 0.6 { Color32::WHITE } else { Color32::BLACK };
                painter.text(
                    cell_rect.center(),
                    Align2::CENTER_CENTER,
                    self.annotation(row, col),
                    font.clone(),
                    ink,
                );
            }
        }

        for (i, label) in self.labels.iter().enumerate() {
            let center = i as f32 * cell + cell / 2.0;
            painter.text(
                pos2(grid.left() - 6.0, grid.top() + center),
                Align2::RIGHT_CENTER,
                label,
                font.clone(),
                text_color,
            );
            painter.text(
                pos2(grid.left() + center, grid.bottom() + 6.0),
                Align2::CENTER_TOP,
                label,
                font.clone(),
                text_color,
            );
        }

        self.paint_colorbar(painter, grid, &font, text_color);
    }

    fn paint_colorbar(&self, painter: &Painter, grid: Rect, font: &FontId, text_color: Color32) {
        const STEPS: usize = 64;
        let bar = Rect::from_min_size(
            pos2(grid.right() + 20.0, grid.top()),
            vec2(16.0, grid.height()),
        );
        let slice = bar.height() / STEPS as f32;

        for i in 0..STEPS {
            // top is the warm end
            let t = 1.0 - (i as f64 + 0.5) / STEPS as f64;
            let [r, g, b] = coolwarm(t);
            let min = pos2(bar.left(), bar.top() + i as f32 * slice);
            painter.rect_filled(
                Rect::from_min_size(min, vec2(bar.width(), slice + 0.5)),
                0.0,
                Color32::from_rgb(r, g, b),
            );
        }
        painter.rect_stroke(bar, 0.0, Stroke::new(1.0, text_color), egui::StrokeKind::Outside);

        for k in 0..=4 {
            let t = k as f64 / 4.0;
            let value = self.vmin + (self.vmax - self.vmin) * t;
            let y = bar.bottom() - t as f32 * bar.height();
            painter.text(
                pos2(bar.right() + 4.0, y),
                Align2::LEFT_CENTER,
                format!("{:.1}", value),
                font.clone(),
                text_color,
            );
        }
    }
}
