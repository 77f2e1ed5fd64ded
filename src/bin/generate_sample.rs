use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

const OUTPUT_PATH: &str = "student_performance_analyzer.xlsx";
const SHEET_NAME: &str = "Students";
const N_STUDENTS: u32 = 40;

const FIRST_NAMES: [&str; 12] = [
    "Aarav", "Diya", "Kabir", "Meera", "Rohan", "Sara", "Vikram", "Anaya", "Ishaan", "Zoya",
    "Arjun", "Nisha",
];
const LAST_NAMES: [&str; 8] = [
    "Patil", "Sharma", "Iyer", "Khan", "Desai", "Menon", "Joshi", "Rao",
];

/// SplitMix64: one word of state is plenty for a few hundred draws.
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in (-1, 1).
    fn signed_unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 52) as f64 - 1.0
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Normal draw via the Marsaglia polar method.
    fn normal(&mut self, mean: f64, sd: f64) -> f64 {
        loop {
            let (x, y) = (self.signed_unit(), self.signed_unit());
            let r2 = x * x + y * y;
            if r2 > 0.0 && r2 < 1.0 {
                return mean + sd * x * (-2.0 * r2.ln() / r2).sqrt();
            }
        }
    }
}

/// Marks loosely follow study hours so the regression chart has a trend.
fn student_row(rng: &mut Rng) -> (String, f64, f64) {
    let first = FIRST_NAMES[rng.below(FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.below(LAST_NAMES.len())];
    let name = format!("{first} {last}");
    let hours = (rng.normal(4.5, 1.8).clamp(0.5, 10.0) * 2.0).round() / 2.0;
    let marks = (38.0 + 6.5 * hours + rng.normal(0.0, 7.0)).clamp(0.0, 100.0).round();
    (name, marks, hours)
}

fn main() -> Result<()> {
    let mut rng = Rng(42);

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, title) in ["Name", "Roll", "Marks", "Study_Hours"].into_iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, title, &header)?;
    }

    // Rolls are written shuffled so the viewer's roll ordering is visible.
    let mut rolls: Vec<u32> = (1..=N_STUDENTS).collect();
    for i in (1..rolls.len()).rev() {
        let j = rng.below(i + 1);
        rolls.swap(i, j);
    }

    for (i, roll) in rolls.iter().enumerate() {
        let row = i as u32 + 1;
        let (name, marks, hours) = student_row(&mut rng);
        worksheet.write_string(row, 0, &name)?;
        worksheet.write_number(row, 1, *roll as f64)?;
        worksheet.write_number(row, 2, marks)?;
        worksheet.write_number(row, 3, hours)?;
    }

    workbook
        .save(OUTPUT_PATH)
        .with_context(|| format!("writing {OUTPUT_PATH}"))?;

    println!("Wrote {N_STUDENTS} students to sheet '{SHEET_NAME}' of {OUTPUT_PATH}");
    Ok(())
}
