use std::fmt::{self, Write as _};

use super::model::{Field, Student};

// ---------------------------------------------------------------------------
// Descriptive measures over a slice of values
// ---------------------------------------------------------------------------

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Values sorted ascending with a total order (NaN last).
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let v = sorted(values);
    let mid = v.len() / 2;
    if v.len() % 2 == 0 {
        Some((v[mid - 1] + v[mid]) / 2.0)
    } else {
        Some(v[mid])
    }
}

/// The single most frequent value.
///
/// Returns `None` for an empty slice, and when two or more values tie for the
/// highest frequency.
pub fn mode(values: &[f64]) -> Option<f64> {
    let v = sorted(values);
    let mut best: Option<(f64, usize)> = None;
    let mut tied = false;

    let mut i = 0;
    while i < v.len() {
        let value = v[i];
        let mut j = i + 1;
        // `==` so that 0.0 and -0.0 count as one value.
        while j < v.len() && v[j] == value {
            j += 1;
        }
        let count = j - i;
        match best {
            Some((_, best_count)) if count < best_count => {}
            Some((_, best_count)) if count == best_count => tied = true,
            _ => {
                best = Some((value, count));
                tied = false;
            }
        }
        i = j;
    }

    if tied {
        None
    } else {
        best.map(|(value, _)| value)
    }
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Column of one numeric field.
pub fn column(students: &[Student], field: Field) -> Vec<f64> {
    students.iter().map(|s| s.value(field)).collect()
}

// ---------------------------------------------------------------------------
// Summary – what the statistics window and the report show
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSummary {
    pub field: Field,
    pub mean: f64,
    pub median: f64,
    /// `None` when no unique mode exists.
    pub mode: Option<f64>,
    pub max: f64,
    pub min: f64,
}

impl FieldSummary {
    fn compute(students: &[Student], field: Field) -> Option<Self> {
        let values = column(students, field);
        Some(Self {
            field,
            mean: mean(&values)?,
            median: median(&values)?,
            mode: mode(&values),
            max: max(&values)?,
            min: min(&values)?,
        })
    }

    /// One-line form used by the PDF report.
    pub fn report_line(&self) -> String {
        format!(
            "{}: Mean={}, Median={}, Mode={}, Max={}, Min={}",
            self.field,
            format_value(round2(self.mean)),
            format_value(round2(self.median)),
            ModeDisplay(self.mode),
            format_value(self.max),
            format_value(self.min),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub fields: Vec<FieldSummary>,
}

/// Compute the per-field summary; `None` for an empty list.
pub fn summarize(students: &[Student]) -> Option<Summary> {
    if students.is_empty() {
        return None;
    }
    let fields = Field::ALL
        .iter()
        .map(|&field| FieldSummary::compute(students, field))
        .collect::<Option<Vec<_>>>()?;
    Some(Summary {
        count: students.len(),
        fields,
    })
}

impl Summary {
    /// Multi-line text for the statistics window.
    pub fn to_text(&self) -> String {
        let mut out = format!("Total Students: {}\n\n", self.count);
        for f in &self.fields {
            // Writing to a String cannot fail.
            let _ = write!(
                out,
                "{}:\n  Mean = {}\n  Median = {}\n  Mode = {}\n  Max = {}\n  Min = {}\n\n",
                f.field,
                format_value(round2(f.mean)),
                format_value(round2(f.median)),
                ModeDisplay(f.mode),
                format_value(f.max),
                format_value(f.min),
            );
        }
        out
    }

    pub fn report_lines(&self) -> Vec<String> {
        self.fields.iter().map(FieldSummary::report_line).collect()
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Two decimals, exact halves to even (`75.125` → `75.12`).
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Integral values keep one decimal (`95.0`), others print as-is.
pub fn format_value(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

struct ModeDisplay(Option<f64>);

impl fmt::Display for ModeDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => f.write_str(&format_value(v)),
            None => f.write_str("No unique mode"),
        }
    }
}
