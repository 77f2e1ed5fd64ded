use std::path::PathBuf;

use crate::config::AppConfig;
use crate::data::error::LoadError;
use crate::data::loader::load_file;
use crate::data::model::Student;
use crate::data::stats::{summarize, Summary};
use crate::report;

// ---------------------------------------------------------------------------
// Notices – user-facing messages shown as dialogs by the UI layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Scatter,
    MarksBar,
    TopPerformers,
    CategoryPie,
    MarksHistogram,
    StudyHoursBox,
    CorrelationHeatmap,
    CategoryBar,
}

impl ChartKind {
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Scatter => "Study Hours vs Marks (Regression)",
            ChartKind::MarksBar => "Marks of All Students",
            ChartKind::TopPerformers => "Top Performers",
            ChartKind::CategoryPie => "Performance Categories",
            ChartKind::MarksHistogram => "Distribution of Marks",
            ChartKind::StudyHoursBox => "Boxplot of Study Hours",
            ChartKind::CorrelationHeatmap => "Correlation Heatmap",
            ChartKind::CategoryBar => "Number of Students by Performance Category",
        }
    }
}

/// A chart window and the records it was opened with.
#[derive(Debug, Clone)]
pub struct OpenChart {
    pub kind: ChartKind,
    pub students: Vec<Student>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Records from the most recent load (empty after a failed load).
    pub students: Vec<Student>,

    /// Rows shown in the table; "Clear Table" empties only this.
    pub table: Vec<Student>,

    /// Statistics window content (`Some` while the window is open).
    pub summary: Option<Summary>,

    /// Chart window content (`Some` while the window is open).
    pub chart: Option<OpenChart>,

    /// Messages waiting to be shown.
    pub notices: Vec<Notice>,

    /// Short status line in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            students: Vec::new(),
            table: Vec::new(),
            summary: None,
            chart: None,
            notices: Vec::new(),
            status_message: None,
        }
    }

    /// Replace the record list with a fresh read of the data file.
    /// On failure the list is left empty and an error notice is queued.
    pub fn reload(&mut self) {
        self.students.clear();
        let path = &self.config.data_file;
        match load_file(path, &self.config.sheet_name) {
            Ok(students) => {
                self.status_message = Some(format!(
                    "{} students loaded from {}",
                    students.len(),
                    path.display()
                ));
                self.students = students;
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
                let notice = match e.downcast_ref::<LoadError>() {
                    Some(LoadError::NotFound(p)) => Notice::error(
                        "Error",
                        format!("Spreadsheet file not found:\n{}", p.display()),
                    ),
                    _ => Notice::error("Load Error", format!("Error loading spreadsheet:\n{e:#}")),
                };
                self.notices.push(notice);
            }
        }
    }

    /// "Load Data": reload and fill the table.
    pub fn load_table(&mut self) {
        self.reload();
        self.table = self.students.clone();
        if self.students.is_empty() {
            self.no_data_notice();
        }
    }

    /// "Analyze": reload and open the statistics window.
    pub fn analyze(&mut self) {
        self.reload();
        self.summary = summarize(&self.students);
        if self.summary.is_none() {
            self.no_data_notice();
        }
    }

    /// "Clear Table": empty the table, keep the loaded records.
    pub fn clear_table(&mut self) {
        self.table.clear();
    }

    /// "Generate Report": table rows plus statistics of the loaded records.
    pub fn generate_report(&mut self) {
        if self.table.is_empty() {
            self.notices
                .push(Notice::error("Error", "No data to generate report!"));
            return;
        }
        let path = self.config.report_file.clone();
        match report::generate(&path, &self.students, &self.table) {
            Ok(_) => {
                self.notices.push(Notice::info(
                    "Report Generated",
                    format!("PDF report saved as {}", path.display()),
                ));
            }
            Err(e) => {
                log::error!("Failed to write report: {e:#}");
                self.notices
                    .push(Notice::error("Report Error", format!("{e:#}")));
            }
        }
    }

    /// Reload and open a chart window.
    pub fn open_chart(&mut self, kind: ChartKind) {
        self.reload();
        if self.students.is_empty() {
            self.notices
                .push(Notice::error("No Data", "Load students first."));
            return;
        }
        log::debug!("Opening chart {kind:?} with {} students", self.students.len());
        self.chart = Some(OpenChart {
            kind,
            students: self.students.clone(),
        });
    }

    /// Point at a different data file and load it into the table.
    pub fn set_data_file(&mut self, path: PathBuf) {
        log::info!("Data file set to {}", path.display());
        self.config.data_file = path;
        self.load_table();
    }

    /// Hand over queued notices to the UI.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn no_data_notice(&mut self) {
        self.notices.push(Notice::info(
            "No Data",
            "No student data found in spreadsheet.",
        ));
    }
}
