use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Student – one row of the spreadsheet
// ---------------------------------------------------------------------------

/// A single student record, coerced to its declared field types on load.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub name: String,
    /// Roll number kept as text; see [`RollKey`] for ordering.
    pub roll: String,
    pub marks: f64,
    pub study_hours: f64,
}

impl Student {
    pub fn new(name: impl Into<String>, roll: impl Into<String>, marks: f64, study_hours: f64) -> Self {
        Self {
            name: name.into(),
            roll: roll.into(),
            marks,
            study_hours,
        }
    }

    /// Value of one of the numeric fields.
    pub fn value(&self, field: Field) -> f64 {
        match field {
            Field::Marks => self.marks,
            Field::StudyHours => self.study_hours,
        }
    }

    pub fn roll_key(&self) -> RollKey<'_> {
        RollKey::from_roll(&self.roll)
    }
}

// ---------------------------------------------------------------------------
// Field – the numeric columns the aggregator works on
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Marks,
    StudyHours,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Marks, Field::StudyHours];

    /// Human-readable column label.
    pub fn label(self) -> &'static str {
        match self {
            Field::Marks => "Marks",
            Field::StudyHours => "Study Hours",
        }
    }

    /// Spreadsheet header (after normalisation).
    pub fn header(self) -> &'static str {
        match self {
            Field::Marks => "marks",
            Field::StudyHours => "study_hours",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Roll ordering
// ---------------------------------------------------------------------------

/// Sort key for roll numbers.
///
/// All-digit rolls compare numerically and come before any other roll;
/// everything else compares as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollKey<'a> {
    Numeric(&'a str),
    Text(&'a str),
}

impl<'a> RollKey<'a> {
    pub fn from_roll(roll: &'a str) -> Self {
        if !roll.is_empty() && roll.bytes().all(|b| b.is_ascii_digit()) {
            // Leading zeros carry no numeric weight.
            let trimmed = roll.trim_start_matches('0');
            RollKey::Numeric(trimmed)
        } else {
            RollKey::Text(roll)
        }
    }
}

impl Ord for RollKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // Digit strings of arbitrary length: longer means larger.
            (RollKey::Numeric(a), RollKey::Numeric(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (RollKey::Numeric(_), RollKey::Text(_)) => Ordering::Less,
            (RollKey::Text(_), RollKey::Numeric(_)) => Ordering::Greater,
            (RollKey::Text(a), RollKey::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for RollKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Stable sort by roll number.
pub fn sort_by_roll(students: &mut [Student]) {
    students.sort_by(|a, b| a.roll_key().cmp(&b.roll_key()));
}
