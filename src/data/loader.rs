use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{sort_by_roll, Field, Student};

const NAME: &str = "name";
const ROLL: &str = "roll";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load student records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – the sheet named `sheet`
/// * `.csv`  – header row followed by one student per line
/// * `.json` – `[{ "name": ..., "roll": ..., "marks": ..., "study_hours": ... }, ...]`
///
/// The result is sorted by roll number.
pub fn load_file(path: &Path, sheet: &str) -> Result<Vec<Student>> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()).into());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut students = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path, sheet)?,
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    };

    sort_by_roll(&mut students);
    log::info!("Loaded {} students from {}", students.len(), path.display());
    Ok(students)
}

// ---------------------------------------------------------------------------
// Cell coercion shared by every format
// ---------------------------------------------------------------------------

/// A raw cell before coercion to a [`Student`] field.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Build one student, looking cells up by normalised header.
/// `row` is 1-based and only used for error messages.
fn student_from_row<F>(row: usize, cell: F) -> Result<Student, LoadError>
where
    F: Fn(&str) -> Option<Cell>,
{
    Ok(Student {
        name: text_field(cell(NAME)),
        roll: text_field(cell(ROLL)),
        marks: number_field(cell(Field::Marks.header()), row, Field::Marks.header())?,
        study_hours: number_field(
            cell(Field::StudyHours.header()),
            row,
            Field::StudyHours.header(),
        )?,
    })
}

fn text_field(cell: Option<Cell>) -> String {
    match cell {
        Some(Cell::Text(s)) => s.trim().to_string(),
        Some(Cell::Number(n)) => number_to_text(n),
        Some(Cell::Empty) | None => String::new(),
    }
}

/// Spreadsheets store every number as a float; `12.0` in a roll column is `"12"`.
fn number_to_text(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// A missing column defaults to zero; a present but empty or unparsable cell is an error.
fn number_field(cell: Option<Cell>, row: usize, column: &'static str) -> Result<f64, LoadError> {
    match cell {
        None => Ok(0.0),
        Some(Cell::Number(n)) => Ok(n),
        Some(Cell::Text(s)) => s.trim().parse::<f64>().map_err(|_| LoadError::InvalidNumber {
            row,
            column,
            value: s,
        }),
        Some(Cell::Empty) => Err(LoadError::InvalidNumber {
            row,
            column,
            value: String::new(),
        }),
    }
}

/// Turn a header row plus data rows into students, skipping fully blank rows.
fn records_from_rows<I>(headers: &[String], rows: I) -> Result<Vec<Student>, LoadError>
where
    I: IntoIterator<Item = Vec<Cell>>,
{
    let index: BTreeMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (normalize_header(h), i))
        .rev() // first occurrence of a duplicated header wins
        .collect();

    let mut students = Vec::new();
    for (i, cells) in rows.into_iter().enumerate() {
        let row = i + 1;
        if cells.iter().all(Cell::is_blank) {
            log::debug!("Skipping blank row {row}");
            continue;
        }
        let student = student_from_row(row, |col| {
            index.get(col).map(|&c| cells.get(c).cloned().unwrap_or(Cell::Empty))
        })?;
        students.push(student);
    }
    Ok(students)
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

fn load_workbook(path: &Path, sheet: &str) -> Result<Vec<Student>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening workbook {}", path.display()))?;

    let available = workbook.sheet_names().to_vec();
    if !available.iter().any(|name| name == sheet) {
        return Err(LoadError::MissingSheet {
            sheet: sheet.to_string(),
            available,
        }
        .into());
    }

    let range = workbook
        .worksheet_range(sheet)
        .with_context(|| format!("reading sheet '{sheet}'"))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(|c| c.to_string()).collect();

    let students = records_from_rows(
        &headers,
        rows.map(|row| row.iter().map(cell_from_workbook).collect::<Vec<_>>()),
    )?;
    Ok(students)
}

fn cell_from_workbook(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one student per line.
/// Every cell is read as text and coerced like a spreadsheet text cell.
fn load_csv(path: &Path) -> Result<Vec<Student>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        rows.push(
            record
                .iter()
                .map(|value| {
                    if value.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(value.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(records_from_rows(&headers, rows)?)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "name": "Asha", "roll": 1, "marks": 88.5, "study_hours": 6 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Student>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut students = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let row = i + 1;
        let obj = rec.as_object().ok_or_else(|| LoadError::InvalidRecord {
            row,
            reason: "not a JSON object".to_string(),
        })?;

        let cells: BTreeMap<String, Cell> = obj
            .iter()
            .map(|(key, val)| (normalize_header(key), json_to_cell(val)))
            .collect();
        if cells.values().all(Cell::is_blank) {
            continue;
        }

        students.push(student_from_row(row, |col| cells.get(col).cloned())?);
    }
    Ok(students)
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
        JsonValue::Null => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_workbook(dir: &Path, sheet: &str, rows: &[(&str, &str, f64, f64)]) -> PathBuf {
        let path = dir.join("students.xlsx");
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet).unwrap();
        for (col, header) in ["Name", " Roll ", "MARKS", "Study_Hours"].iter().enumerate() {
            worksheet.write_string(0, col as u16, *header).unwrap();
        }
        for (i, (name, roll, marks, hours)) in rows.iter().enumerate() {
            let r = (i + 1) as u32;
            worksheet.write_string(r, 0, *name).unwrap();
            match roll.parse::<f64>() {
                Ok(n) => worksheet.write_number(r, 1, n).unwrap(),
                Err(_) => worksheet.write_string(r, 1, *roll).unwrap(),
            };
            worksheet.write_number(r, 2, *marks).unwrap();
            worksheet.write_number(r, 3, *hours).unwrap();
        }
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn workbook_loads_sorted_and_coerced() {
        let dir = tempdir().unwrap();
        let path = write_workbook(
            dir.path(),
            "Students",
            &[
                ("  Ravi ", "10", 72.0, 4.5),
                ("Asha", "2", 91.5, 7.0),
                ("Meera", "R-1", 55.0, 2.0),
            ],
        );

        let students = load_file(&path, "Students").unwrap();
        assert_eq!(
            students,
            vec![
                Student::new("Asha", "2", 91.5, 7.0),
                Student::new("Ravi", "10", 72.0, 4.5),
                Student::new("Meera", "R-1", 55.0, 2.0),
            ]
        );
    }

    #[test]
    fn loading_twice_yields_identical_records() {
        let dir = tempdir().unwrap();
        let path = write_workbook(
            dir.path(),
            "Students",
            &[("A", "3", 60.0, 1.0), ("B", "1", 70.0, 2.0), ("C", "2", 80.0, 3.0)],
        );
        let first = load_file(&path, "Students").unwrap();
        let second = load_file(&path, "Students").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn missing_sheet_lists_available_sheets() {
        let dir = tempdir().unwrap();
        let path = write_workbook(dir.path(), "Sheet1", &[("A", "1", 60.0, 1.0)]);
        let err = load_file(&path, "Students").unwrap_err();
        match err.downcast_ref::<LoadError>() {
            Some(LoadError::MissingSheet { sheet, available }) => {
                assert_eq!(sheet, "Students");
                assert_eq!(available, &vec!["Sheet1".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.xlsx"), "Students").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::NotFound(_))
        ));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.txt");
        fs::write(&path, "name,roll\n").unwrap();
        let err = load_file(&path, "Students").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::UnsupportedExtension(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn csv_with_blank_rows_and_extra_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.csv");
        fs::write(
            &path,
            "Roll,NAME,Marks,study_hours,section\n\
             12,Kiran,66.5,3,A\n\
             ,,,,\n\
             007,Dev, 80 ,5.25,B\n",
        )
        .unwrap();

        let students = load_file(&path, "ignored").unwrap();
        assert_eq!(
            students,
            vec![
                Student::new("Dev", "007", 80.0, 5.25),
                Student::new("Kiran", "12", 66.5, 3.0),
            ]
        );
    }

    #[test]
    fn missing_columns_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.csv");
        fs::write(&path, "name,marks\nZoe,45\n").unwrap();
        let students = load_file(&path, "Students").unwrap();
        assert_eq!(students, vec![Student::new("Zoe", "", 45.0, 0.0)]);
    }

    #[test]
    fn malformed_number_reports_row_and_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.csv");
        fs::write(&path, "name,roll,marks,study_hours\nA,1,50,2\nB,2,absent,3\n").unwrap();
        let err = load_file(&path, "Students").unwrap_err();
        match err.downcast_ref::<LoadError>() {
            Some(LoadError::InvalidNumber { row, column, value }) => {
                assert_eq!(*row, 2);
                assert_eq!(*column, "marks");
                assert_eq!(value, "absent");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_numeric_cell_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.csv");
        fs::write(&path, "name,roll,marks,study_hours\nA,1,50,\n").unwrap();
        let err = load_file(&path, "Students").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::InvalidNumber { column: "study_hours", .. })
        ));
    }

    /// Header plus data rows 1 and 3; row 2 is never written.
    fn write_gapped_workbook(dir: &Path, with_marks: bool) -> PathBuf {
        let path = dir.join("gapped.xlsx");
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Students").unwrap();
        for (col, header) in ["Name", "Roll", "Marks", "Study_Hours"].iter().enumerate() {
            worksheet.write_string(0, col as u16, *header).unwrap();
        }
        worksheet.write_string(1, 0, "Asha").unwrap();
        worksheet.write_number(1, 1, 2.0).unwrap();
        worksheet.write_number(1, 2, 91.5).unwrap();
        worksheet.write_number(1, 3, 7.0).unwrap();

        worksheet.write_string(3, 0, "Ravi").unwrap();
        worksheet.write_number(3, 1, 1.0).unwrap();
        if with_marks {
            worksheet.write_number(3, 2, 72.0).unwrap();
        }
        worksheet.write_number(3, 3, 4.5).unwrap();
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn workbook_blank_row_is_skipped() {
        let dir = tempdir().unwrap();
        let path = write_gapped_workbook(dir.path(), true);
        let students = load_file(&path, "Students").unwrap();
        assert_eq!(
            students,
            vec![
                Student::new("Ravi", "1", 72.0, 4.5),
                Student::new("Asha", "2", 91.5, 7.0),
            ]
        );
    }

    #[test]
    fn workbook_empty_marks_cell_is_malformed() {
        let dir = tempdir().unwrap();
        let path = write_gapped_workbook(dir.path(), false);
        let err = load_file(&path, "Students").unwrap_err();
        match err.downcast_ref::<LoadError>() {
            Some(LoadError::InvalidNumber { row, column, value }) => {
                assert_eq!(*row, 3);
                assert_eq!(*column, "marks");
                assert_eq!(value, "");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn json_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.json");
        fs::write(
            &path,
            r#"[
                {"Name": "Lina", "roll": 4, "marks": 77, "study_hours": "2.5"},
                {"name": "Omar", "roll": "3", "marks": 81.5, "study_hours": 4}
            ]"#,
        )
        .unwrap();
        let students = load_file(&path, "Students").unwrap();
        assert_eq!(
            students,
            vec![
                Student::new("Omar", "3", 81.5, 4.0),
                Student::new("Lina", "4", 77.0, 2.5),
            ]
        );
    }

    #[test]
    fn json_rejects_non_objects() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.json");
        fs::write(&path, "[1, 2]").unwrap();
        let err = load_file(&path, "Students").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::InvalidRecord { row: 1, .. })
        ));
    }

    #[test]
    fn fractional_roll_keeps_fraction() {
        assert_eq!(number_to_text(12.0), "12");
        assert_eq!(number_to_text(12.5), "12.5");
    }
}
