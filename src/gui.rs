// src/gui.rs
use eframe::egui;
use egui::Color32;
use egui_plot::{Line, Plot, PlotBounds, PlotPoints};
use std::sync::mpsc::Receiver;

use crate::config::PlotConfig;
use crate::drivers::WindowFrame;
use crate::engine::StopHandle;
use crate::types::PlotMessage;

pub struct LivePlotApp {
    plot: PlotConfig,
    window_size: f64,

    // Latest window from the acquisition thread
    frame: Option<WindowFrame>,
    frames_received: usize,
    is_running: bool,
    log_messages: Vec<String>,

    rx: Receiver<PlotMessage>,
    stop: StopHandle,
}

impl LivePlotApp {
    pub fn new(plot: PlotConfig, window_size: f64, rx: Receiver<PlotMessage>, stop: StopHandle) -> Self {
        Self {
            plot,
            window_size,
            frame: None,
            frames_received: 0,
            is_running: false,
            log_messages: Vec::new(),
            rx,
            stop,
        }
    }

    fn log(&mut self, msg: String) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > 8 {
            self.log_messages.remove(0);
        }
    }

    fn drain_messages(&mut self) {
        // Only the newest frame matters; older ones are superseded.
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                PlotMessage::Frame(frame) => {
                    self.frames_received += 1;
                    self.frame = Some(frame);
                }
                PlotMessage::Status(running) => self.is_running = running,
                PlotMessage::Log(s) => self.log(s),
            }
        }
    }

    fn x_bounds(&self) -> (f64, f64) {
        self.frame
            .as_ref()
            .map(|f| f.x_range)
            .unwrap_or((0.0, self.window_size))
    }
}

impl eframe::App for LivePlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_messages();

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let (text, color) = if self.is_running {
                    ("● RUNNING", Color32::GREEN)
                } else {
                    ("■ STOPPED", Color32::GRAY)
                };
                ui.label(egui::RichText::new(text).color(color));
                ui.separator();
                let samples = self.frame.as_ref().map(|f| f.len()).unwrap_or(0);
                ui.label(format!("{} samples in window, {} updates", samples, self.frames_received));
                if ui.button("STOP").clicked() {
                    self.stop.stop();
                }
            });
            for m in &self.log_messages {
                ui.monospace(m);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.plot.title);
            let (xmin, xmax) = self.x_bounds();
            let (ymin, ymax) = (self.plot.y_min, self.plot.y_max);
            Plot::new("live_plot")
                .x_axis_label(self.plot.x_label.clone())
                .y_axis_label(self.plot.y_label.clone())
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max([xmin, ymin], [xmax, ymax]));
                    if let Some(frame) = &self.frame {
                        let points: PlotPoints = frame
                            .xs
                            .iter()
                            .zip(&frame.ys)
                            .map(|(&x, &y)| [x, y])
                            .collect();
                        plot_ui.line(Line::new(points).color(Color32::from_rgb(80, 140, 255)));
                    }
                });
        });

        ctx.request_repaint(); // continuous streaming
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn keeps_latest_frame_and_status() {
        let (tx, rx) = channel();
        let mut app = LivePlotApp::new(PlotConfig::default(), 10.0, rx, StopHandle::new());
        assert_eq!(app.x_bounds(), (0.0, 10.0));
        tx.send(PlotMessage::Status(true)).unwrap();
        for i in 0..3 {
            tx.send(PlotMessage::Frame(WindowFrame {
                xs: vec![i as f64],
                ys: vec![1.0],
                x_range: (i as f64, 10.0 + i as f64),
            }))
            .unwrap();
        }
        tx.send(PlotMessage::Log("hello".into())).unwrap();
        app.drain_messages();
        assert!(app.is_running);
        assert_eq!(app.frames_received, 3);
        assert_eq!(app.x_bounds(), (2.0, 12.0));
        assert_eq!(app.log_messages, vec!["> hello".to_owned()]);
    }
}
