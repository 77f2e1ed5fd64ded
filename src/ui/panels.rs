use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{ACCENT, BG_FRAME, TABLE_FG};
use crate::data::stats::format_value;
use crate::state::{AppState, ChartKind};
use crate::ui::dialog;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / status bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!("Data: {}", state.config.data_file.display()));
        ui.separator();

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                TABLE_FG
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

pub fn open_file_dialog(state: &mut AppState) {
    if let Some(path) = dialog::pick_data_file() {
        state.set_data_file(path);
    }
}

// ---------------------------------------------------------------------------
// Toolbar – heading and action buttons
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Action {
    Load,
    Analyze,
    Report,
    ClearTable,
    Chart(ChartKind),
}

fn action_rows(top_n: usize) -> [[(String, Action); 4]; 3] {
    let s = |label: &str| label.to_string();
    [
        [
            (s("Load Data"), Action::Load),
            (s("Analyze"), Action::Analyze),
            (s("Generate Report"), Action::Report),
            (s("Clear Table"), Action::ClearTable),
        ],
        [
            (s("Scatter Plot"), Action::Chart(ChartKind::Scatter)),
            (s("Bar Chart"), Action::Chart(ChartKind::MarksBar)),
            (format!("Top {top_n}"), Action::Chart(ChartKind::TopPerformers)),
            (s("Pie Chart"), Action::Chart(ChartKind::CategoryPie)),
        ],
        [
            (s("Hist Marks"), Action::Chart(ChartKind::MarksHistogram)),
            (s("Box Study"), Action::Chart(ChartKind::StudyHoursBox)),
            (s("Heatmap"), Action::Chart(ChartKind::CorrelationHeatmap)),
            (s("Stacked Bar"), Action::Chart(ChartKind::CategoryBar)),
        ],
    ]
}

/// Render the heading and the grid of action buttons.
pub fn toolbar(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(6.0);
        ui.label(
            RichText::new("STUDENT PERFORMANCE ANALYTICS")
                .size(24.0)
                .strong()
                .color(ACCENT),
        );
        ui.add_space(4.0);

        let mut clicked = None;
        egui::Frame::group(ui.style())
            .fill(BG_FRAME)
            .show(ui, |ui: &mut Ui| {
                egui::Grid::new("actions")
                    .spacing([10.0, 10.0])
                    .show(ui, |ui: &mut Ui| {
                        for row in action_rows(state.config.top_n) {
                            for (label, action) in row {
                                let button = egui::Button::new(
                                    RichText::new(label).strong().color(Color32::WHITE),
                                )
                                .fill(ACCENT);
                                if ui.add_sized([170.0, 30.0], button).clicked() {
                                    clicked = Some(action);
                                }
                            }
                            ui.end_row();
                        }
                    });
            });
        ui.add_space(6.0);

        if let Some(action) = clicked {
            run_action(state, action);
        }
    });
}

fn run_action(state: &mut AppState, action: Action) {
    log::debug!("Action {action:?}");
    match action {
        Action::Load => state.load_table(),
        Action::Analyze => state.analyze(),
        Action::Report => state.generate_report(),
        Action::ClearTable => state.clear_table(),
        Action::Chart(kind) => state.open_chart(kind),
    }
}

// ---------------------------------------------------------------------------
// Central panel – student table
// ---------------------------------------------------------------------------

/// Render the table of students currently shown.
pub fn student_table(ui: &mut Ui, state: &AppState) {
    if state.table.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Press \"Load Data\" to view students  (File → Open… to pick a file)");
        });
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::remainder().at_least(80.0), 4)
        .header(26.0, |mut header| {
            for title in ["Roll", "Name", "Marks", "Study Hours"] {
                header.col(|ui: &mut Ui| {
                    ui.label(RichText::new(title).strong().size(15.0).color(ACCENT));
                });
            }
        })
        .body(|body| {
            body.rows(22.0, state.table.len(), |mut row| {
                let s = &state.table[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(&s.roll);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&s.name);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format_value(s.marks));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format_value(s.study_hours));
                });
            });
        });
}

// ---------------------------------------------------------------------------
// Statistics window
// ---------------------------------------------------------------------------

/// Floating window with the class statistics; closing it drops the summary.
pub fn stats_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(text) = state.summary.as_ref().map(|s| s.to_text()) else {
        return;
    };

    let mut open = true;
    egui::Window::new("Class Statistics")
        .open(&mut open)
        .default_size([420.0, 460.0])
        .show(ctx, |ui: &mut Ui| {
            ui.heading(RichText::new("Class Statistics").color(ACCENT));
            ui.separator();
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.label(RichText::new(text).size(15.0).color(TABLE_FG));
                });
        });

    if !open {
        state.summary = None;
    }
}
