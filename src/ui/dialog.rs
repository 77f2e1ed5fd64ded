use std::path::PathBuf;

use rfd::{MessageButtons, MessageDialog, MessageLevel};

use crate::state::{Notice, NoticeLevel};

// ---------------------------------------------------------------------------
// Native dialogs
// ---------------------------------------------------------------------------

/// Show a queued notice as a blocking message box.
pub fn show(notice: &Notice) {
    let level = match notice.level {
        NoticeLevel::Info => MessageLevel::Info,
        NoticeLevel::Error => MessageLevel::Error,
    };
    MessageDialog::new()
        .set_level(level)
        .set_title(&notice.title)
        .set_description(&notice.message)
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// Ask for a student data file.
pub fn pick_data_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open student data")
        .add_filter("Supported files", &["xlsx", "xlsm", "xls", "ods", "csv", "json"])
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file()
}
