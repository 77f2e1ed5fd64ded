use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};
use thiserror::Error;

use crate::data::model::Student;
use crate::data::stats::{format_value, summarize, Summary};

// ---------------------------------------------------------------------------
// Page geometry (PDF points, origin bottom-left)
// ---------------------------------------------------------------------------

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const TITLE: &str = "Student Performance Report";

const FONT_SIZE: f32 = 12.0;
const LINE_HEIGHT: f32 = 20.0;
const BOTTOM_MARGIN: f32 = 50.0;
const TITLE_POS: (f32, f32) = (180.0, PAGE_HEIGHT - 50.0);
const STATS_TOP: f32 = PAGE_HEIGHT - 100.0;
const STATS_GAP: f32 = 10.0;
const LEFT: f32 = 50.0;

/// Table columns: x offset and header.
const COLUMNS: [(f32, &str); 4] = [
    (50.0, "Roll No."),
    (150.0, "Name"),
    (400.0, "Marks"),
    (500.0, "Study Hours"),
];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no data to generate report")]
    NoRows,
}

// ---------------------------------------------------------------------------
// Layout – plain data, rendered by `write_pdf`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub items: Vec<TextItem>,
}

impl PageLayout {
    fn text(&mut self, x: f32, y: f32, text: impl Into<String>) {
        self.items.push(TextItem {
            x,
            y,
            text: text.into(),
        });
    }
}

/// Title, statistics block, column headers, then one line per row.
/// Rows continue on a fresh page once the cursor drops below the bottom margin.
pub fn layout(summary: Option<&Summary>, rows: &[Student]) -> Vec<PageLayout> {
    let mut pages = Vec::new();
    let mut page = PageLayout::default();
    page.text(TITLE_POS.0, TITLE_POS.1, TITLE);

    let mut y = STATS_TOP;
    if let Some(summary) = summary {
        for line in summary.report_lines() {
            page.text(LEFT, y, line);
            y -= LINE_HEIGHT;
        }
        y -= STATS_GAP;
    }

    for (x, header) in COLUMNS {
        page.text(x, y, header);
    }
    y -= LINE_HEIGHT;

    for s in rows {
        let cells = [
            s.roll.clone(),
            s.name.clone(),
            format_value(s.marks),
            format_value(s.study_hours),
        ];
        for ((x, _), cell) in COLUMNS.iter().zip(cells) {
            page.text(*x, y, cell);
        }
        y -= LINE_HEIGHT;
        if y < BOTTOM_MARGIN {
            pages.push(std::mem::take(&mut page));
            y = PAGE_HEIGHT - 50.0;
        }
    }

    if !page.items.is_empty() || pages.is_empty() {
        pages.push(page);
    }
    pages
}

// ---------------------------------------------------------------------------
// PDF output
// ---------------------------------------------------------------------------

fn pdf_error(e: printpdf::Error) -> anyhow::Error {
    anyhow::anyhow!("PDF backend error: {e:?}")
}

/// Render laid-out pages to an A4 PDF using the built-in Helvetica font.
pub fn write_pdf(path: &Path, pages: &[PageLayout]) -> Result<()> {
    let (width, height) = (Mm::from(Pt(PAGE_WIDTH)), Mm::from(Pt(PAGE_HEIGHT)));
    let (doc, first_page, first_layer) = PdfDocument::new(TITLE, width, height, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;

    let mut targets = vec![(first_page, first_layer)];
    for _ in 1..pages.len() {
        targets.push(doc.add_page(width, height, "Layer 1"));
    }

    for (page, (page_idx, layer_idx)) in pages.iter().zip(targets) {
        let layer = doc.get_page(page_idx).get_layer(layer_idx);
        for item in &page.items {
            layer.use_text(
                item.text.clone(),
                FONT_SIZE,
                Mm::from(Pt(item.x)),
                Mm::from(Pt(item.y)),
                &font,
            );
        }
    }

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    doc.save(&mut BufWriter::new(file)).map_err(pdf_error)?;
    Ok(())
}

/// Build the report for the table rows, with statistics taken from `students`.
/// Returns the number of pages written.
pub fn generate(path: &Path, students: &[Student], rows: &[Student]) -> Result<usize> {
    if rows.is_empty() {
        return Err(ReportError::NoRows.into());
    }
    let summary = summarize(students);
    let pages = layout(summary.as_ref(), rows);
    write_pdf(path, &pages)?;
    log::info!(
        "Wrote report with {} rows on {} page(s) to {}",
        rows.len(),
        pages.len(),
        path.display()
    );
    Ok(pages.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn rows(n: usize) -> Vec<Student> {
        (1..=n)
            .map(|i| Student::new(format!("N{i}"), i.to_string(), 50.0 + i as f64, 2.5))
            .collect()
    }

    fn row_names(page: &PageLayout) -> Vec<&str> {
        page.items
            .iter()
            .filter(|it| it.x == 150.0 && it.text != "Name")
            .map(|it| it.text.as_str())
            .collect()
    }

    #[test]
    fn first_page_has_title_stats_and_header() {
        let students = rows(3);
        let summary = summarize(&students);
        let pages = layout(summary.as_ref(), &students);
        assert_eq!(pages.len(), 1);

        let items = &pages[0].items;
        assert_eq!(items[0].text, TITLE);
        assert_eq!((items[0].x, items[0].y), (180.0, PAGE_HEIGHT - 50.0));
        assert!(items[1].text.starts_with("Marks: Mean="));
        assert_eq!(items[1].y, PAGE_HEIGHT - 100.0);
        assert!(items[2].text.starts_with("Study Hours: Mean="));

        let header = items.iter().find(|it| it.text == "Roll No.").unwrap();
        assert_eq!(header.y, PAGE_HEIGHT - 100.0 - 2.0 * LINE_HEIGHT - STATS_GAP);
        assert_eq!(row_names(&pages[0]), vec!["N1", "N2", "N3"]);

        let marks: Vec<_> = items.iter().filter(|it| it.x == 400.0).map(|it| it.text.as_str()).collect();
        assert_eq!(marks, vec!["Marks", "51.0", "52.0", "53.0"]);
    }

    #[test]
    fn long_tables_continue_on_new_pages() {
        let students = rows(40);
        let summary = summarize(&students);
        let pages = layout(summary.as_ref(), &students);
        assert_eq!(pages.len(), 2);
        assert_eq!(row_names(&pages[0]).len(), 32);
        assert_eq!(row_names(&pages[1]).len(), 8);
        assert_eq!(row_names(&pages[1])[0], "N33");
        assert_eq!(pages[1].items[0].y, PAGE_HEIGHT - 50.0);

        for item in pages.iter().flat_map(|p| &p.items) {
            assert!(item.y >= BOTTOM_MARGIN && item.y <= PAGE_HEIGHT, "{item:?}");
        }
    }

    #[test]
    fn missing_summary_starts_table_at_stats_position() {
        let pages = layout(None, &rows(1));
        let header = pages[0].items.iter().find(|it| it.text == "Name").unwrap();
        assert_eq!(header.y, PAGE_HEIGHT - 100.0);
    }

    #[test]
    fn generate_writes_pdf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("student_report.pdf");
        let students = rows(45);
        let pages = generate(&path, &students, &students).unwrap();
        assert_eq!(pages, 2);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn generate_refuses_empty_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("student_report.pdf");
        let err = generate(&path, &rows(2), &[]).unwrap_err();
        assert!(matches!(err.downcast_ref::<ReportError>(), Some(ReportError::NoRows)));
        assert!(!path.exists());
    }
}
