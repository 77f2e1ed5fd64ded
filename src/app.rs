use eframe::egui;

use crate::color::{ACCENT, BG_WINDOW, TABLE_BG};
use crate::config::AppConfig;
use crate::state::{AppState, Notice};
use crate::ui::{dialog, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct StudentAnalyzerApp {
    pub state: AppState,
}

impl StudentAnalyzerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        apply_theme(&cc.egui_ctx);

        let mut state = AppState::new(config);
        if !state.config.data_file.exists() {
            log::warn!("Data file {} does not exist", state.config.data_file.display());
            state.notices.push(Notice::error(
                "Error",
                format!(
                    "Spreadsheet file not found:\n{}",
                    state.config.data_file.display()
                ),
            ));
        }
        Self { state }
    }
}

fn apply_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::light();
    visuals.panel_fill = BG_WINDOW;
    visuals.window_fill = BG_WINDOW;
    visuals.faint_bg_color = TABLE_BG;
    visuals.selection.bg_fill = ACCENT;
    ctx.set_visuals(visuals);
}

impl eframe::App for StudentAnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Heading and action buttons ----
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            panels::toolbar(ui, &mut self.state);
        });

        // ---- Central panel: student table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::student_table(ui, &self.state);
        });

        // ---- Floating windows ----
        panels::stats_window(ctx, &mut self.state);
        plot::chart_window(ctx, &mut self.state);

        for notice in self.state.take_notices() {
            dialog::show(&notice);
        }
    }
}
