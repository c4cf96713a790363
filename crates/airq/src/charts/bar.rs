//! Grouped bar chart: one group of bars per category, one bar per series.

use super::axis::{format_tick, nice_ticks};
use crate::types::GroupAggregate;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};
use std::f32::consts::FRAC_PI_2;

/// Series colours, in series order.
pub const PALETTE: [[u8; 3]; 6] = [
    [31, 119, 180],
    [255, 127, 14],
    [44, 160, 44],
    [214, 39, 40],
    [148, 103, 189],
    [140, 86, 75],
];

/// Share of a category slot covered by its bars.
const GROUP_WIDTH: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    /// One value per category; `None` draws no bar.
    pub values: Vec<Option<f64>>,
}

/// A bar in unit space: category `i` spans `[i, i + 1)` on the x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub category: usize,
    pub series: usize,
    pub x0: f64,
    pub x1: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
    /// Draw category labels vertically.
    pub rotate_labels: bool,
}

impl GroupedBarChart {
    /// One category per aggregate row, one series per value column.
    pub fn from_aggregate(
        aggregate: &GroupAggregate,
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        let series = aggregate
            .value_columns
            .iter()
            .enumerate()
            .map(|(i, name)| BarSeries {
                name: name.clone(),
                values: aggregate.rows.iter().map(|row| row.means[i]).collect(),
            })
            .collect();

        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            categories: aggregate.rows.iter().map(|row| row.key.clone()).collect(),
            series,
            rotate_labels: false,
        }
    }

    pub fn with_rotated_labels(mut self) -> Self {
        self.rotate_labels = true;
        self
    }

    /// Bars of every present value, category-major.
    pub fn bar_layout(&self) -> Vec<BarRect> {
        let n_series = self.series.len().max(1);
        let width = GROUP_WIDTH / n_series as f64;
        let offset = (1.0 - GROUP_WIDTH) / 2.0;

        let mut bars = Vec::new();
        for category in 0..self.categories.len() {
            for (s, series) in self.series.iter().enumerate() {
                let Some(value) = series.values.get(category).copied().flatten() else {
                    continue;
                };
                let x0 = category as f64 + offset + s as f64 * width;
                bars.push(BarRect {
                    category,
                    series: s,
                    x0,
                    x1: x0 + width,
                    value,
                });
            }
        }
        bars
    }

    /// Value axis ticks; the axis always includes zero.
    pub fn ticks(&self) -> Vec<f64> {
        let values = self.series.iter().flat_map(|s| s.values.iter().flatten());
        let (min, max) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        nice_ticks(min, max, 6)
    }

    /// Draw the chart into `rect`.
    pub fn paint(&self, painter: &Painter, rect: Rect, text_color: Color32) {
        let font = FontId::proportional(12.0);
        let ticks = self.ticks();
        let (y_min, y_max) = match (ticks.first(), ticks.last()) {
            (Some(lo), Some(hi)) if hi > lo => (*lo, *hi),
            _ => (0.0, 1.0),
        };
        let step = if ticks.len() > 1 { ticks[1] - ticks[0] } else { 1.0 };

        let label_space = if self.rotate_labels {
            self.categories
                .iter()
                .map(|c| painter.layout_no_wrap(c.clone(), font.clone(), text_color).size().x)
                .fold(0.0_f32, f32::max)
                + 12.0
        } else {
            24.0
        };

        let plot = Rect::from_min_max(
            pos2(rect.left() + 80.0, rect.top() + 40.0),
            pos2(rect.right() - 20.0, rect.bottom() - label_space - 30.0),
        );
        if plot.width() <= 0.0 || plot.height() <= 0.0 {
            return;
        }

        let n_categories = self.categories.len().max(1) as f64;
        let to_x = |x: f64| plot.left() + (x / n_categories) as f32 * plot.width();
        let to_y = |v: f64| plot.bottom() - ((v - y_min) / (y_max - y_min)) as f32 * plot.height();

        painter.text(
            pos2(rect.center().x, rect.top() + 8.0),
            Align2::CENTER_TOP,
            &self.title,
            FontId::proportional(18.0),
            text_color,
        );

        // grid and value axis
        let grid = Stroke::new(1.0, text_color.gamma_multiply(0.15));
        for tick in &ticks {
            let y = to_y(*tick);
            painter.line_segment([pos2(plot.left(), y), pos2(plot.right(), y)], grid);
            painter.text(
                pos2(plot.left() - 6.0, y),
                Align2::RIGHT_CENTER,
                format_tick(*tick, step),
                font.clone(),
                text_color,
            );
        }
        for category in 0..=self.categories.len() {
            let x = to_x(category as f64);
            painter.line_segment([pos2(x, plot.top()), pos2(x, plot.bottom())], grid);
        }

        for bar in self.bar_layout() {
            let [r, g, b] = PALETTE[bar.series % PALETTE.len()];
            let (top, bottom) = if bar.value >= 0.0 {
                (to_y(bar.value), to_y(0.0))
            } else {
                (to_y(0.0), to_y(bar.value))
            };
            painter.rect_filled(
                Rect::from_min_max(pos2(to_x(bar.x0), top), pos2(to_x(bar.x1), bottom)),
                0.0,
                Color32::from_rgb(r, g, b),
            );
        }

        let axis = Stroke::new(1.0, text_color);
        painter.line_segment([plot.left_bottom(), plot.right_bottom()], axis);
        painter.line_segment([plot.left_top(), plot.left_bottom()], axis);

        for (i, category) in self.categories.iter().enumerate() {
            let center = to_x(i as f64 + 0.5);
            if self.rotate_labels {
                let galley = painter.layout_no_wrap(category.clone(), font.clone(), text_color);
                let size = galley.size();
                let anchor = pos2(center - size.y / 2.0, plot.bottom() + 6.0 + size.x);
                painter.add(
                    egui::epaint::TextShape::new(anchor, galley, text_color).with_angle(-FRAC_PI_2),
                );
            } else {
                painter.text(
                    pos2(center, plot.bottom() + 6.0),
                    Align2::CENTER_TOP,
                    category,
                    font.clone(),
                    text_color,
                );
            }
        }

        painter.text(
            pos2(plot.center().x, rect.bottom() - 8.0),
            Align2::CENTER_BOTTOM,
            &self.x_label,
            font.clone(),
            text_color,
        );

        let y_galley = painter.layout_no_wrap(self.y_label.clone(), font.clone(), text_color);
        let y_size = y_galley.size();
        let y_anchor = pos2(rect.left() + 8.0, plot.center().y + y_size.x / 2.0);
        painter.add(
            egui::epaint::TextShape::new(y_anchor, y_galley, text_color).with_angle(-FRAC_PI_2),
        );

        self.paint_legend(painter, plot, &font, text_color);
    }

    fn paint_legend(&self, painter: &Painter, plot: Rect, font: &FontId, text_color: Color32) {
        let swatch = Vec2::splat(10.0);
        let mut y = plot.top() + 8.0;
        for (i, series) in self.series.iter().enumerate() {
            let [r, g, b] = PALETTE[i % PALETTE.len()];
            let origin: Pos2 = pos2(plot.right() - 150.0, y);
            painter.rect_filled(
                Rect::from_min_size(origin, swatch),
                0.0,
                Color32::from_rgb(r, g, b),
            );
            painter.text(
                origin + vec2(16.0, swatch.y / 2.0),
                Align2::LEFT_CENTER,
                &series.name,
                font.clone(),
                text_color,
            );
            y += 18.0;
        }
    }
}
