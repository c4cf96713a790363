//! Native window that shows charts one after another.

use super::ChartSpec;
use eframe::egui;
use tracing::debug;

pub(crate) struct ChartViewer {
    charts: Vec<ChartSpec>,
    current: usize,
}

impl ChartViewer {
    pub(crate) fn new(charts: Vec<ChartSpec>) -> Self {
        Self { charts, current: 0 }
    }

    fn window_title(&self) -> String {
        match self.charts.get(self.current) {
            Some(chart) => format!(
                "{} ({}/{})",
                chart.title(),
                self.current + 1,
                self.charts.len()
            ),
            None => "airq".to_string(),
        }
    }
}

impl eframe::App for ChartViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // closing the window dismisses the current chart; the last one ends the run
        if ctx.input(|i| i.viewport().close_requested()) && self.current + 1 < self.charts.len() {
            self.current += 1;
            debug!("Showing chart {} of {}", self.current + 1, self.charts.len());
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.window_title()));
            if let Some(chart) = self.charts.get(self.current) {
                let [w, h] = chart.inner_size();
                ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(w, h)));
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(chart) = self.charts.get(self.current) else {
                return;
            };

            let available_rect = ui.available_rect_before_wrap();
            let _response = ui.allocate_rect(available_rect, egui::Sense::hover());
            if !ui.is_rect_visible(available_rect) {
                return;
            }

            let painter = ui.painter();
            let text_color = ui.visuals().text_color();
            match chart {
                ChartSpec::Bars(bars) => bars.paint(painter, available_rect, text_color),
                ChartSpec::Heatmap(heatmap) => heatmap.paint(painter, available_rect, text_color),
            }
        });
    }
}
