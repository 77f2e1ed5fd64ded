//! Derived series that feed the charts.

use super::model::{Field, Student};
use super::stats::{column, max, mean, min, sorted};

// ---------------------------------------------------------------------------
// Performance categories (pie chart and category bars)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Distinction,
    FirstClass,
    Pass,
    Fail,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Distinction,
        Category::FirstClass,
        Category::Pass,
        Category::Fail,
    ];

    pub fn of(marks: f64) -> Self {
        if marks >= 85.0 {
            Category::Distinction
        } else if marks >= 70.0 {
            Category::FirstClass
        } else if marks >= 50.0 {
            Category::Pass
        } else {
            Category::Fail
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Distinction => ">=85",
            Category::FirstClass => "70-84",
            Category::Pass => "50-69",
            Category::Fail => "<50",
        }
    }
}

/// Count of students per category, in [`Category::ALL`] order.
pub fn category_counts(students: &[Student]) -> Vec<(Category, usize)> {
    let mut counts = [0usize; 4];
    for s in students {
        counts[Category::of(s.marks) as usize] += 1;
    }
    Category::ALL.iter().copied().zip(counts).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub category: Category,
    pub count: usize,
    /// Share of the whole, `0.0..=1.0`.
    pub fraction: f64,
    /// Pulled out of the pie.
    pub exploded: bool,
}

pub fn pie_slices(students: &[Student]) -> Vec<PieSlice> {
    let total = students.len();
    category_counts(students)
        .into_iter()
        .map(|(category, count)| PieSlice {
            category,
            count,
            fraction: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            },
            exploded: category == Category::FirstClass,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// The `n` students with the highest marks, best first.  Ties keep roll order.
pub fn top_n(students: &[Student], n: usize) -> Vec<&Student> {
    let mut ranked: Vec<&Student> = students.iter().collect();
    ranked.sort_by(|a, b| b.marks.total_cmp(&a.marks));
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Histogram + KDE
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    pub fn centers(&self) -> impl Iterator<Item = f64> + '_ {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0)
    }
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
/// A constant sample gets a unit-wide range centred on its value.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if bins == 0 {
        return None;
    }
    let (mut lo, mut hi) = (min(values)?, max(values)?);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram { edges, counts })
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// Gaussian kernel density estimate with Scott's bandwidth, evaluated at
/// `points` positions and multiplied by `scale` (use `n * bin_width` to
/// overlay on a count histogram).  Empty when the sample has no spread.
pub fn kde_curve(values: &[f64], points: usize, scale: f64) -> Vec<[f64; 2]> {
    let Some(std) = sample_std(values) else {
        return Vec::new();
    };
    if std == 0.0 || points < 2 {
        return Vec::new();
    }
    let n = values.len() as f64;
    let h = std * n.powf(-0.2);
    let (lo, hi) = match (min(values), max(values)) {
        (Some(lo), Some(hi)) => (lo - 3.0 * h, hi + 3.0 * h),
        _ => return Vec::new(),
    };
    let norm = 1.0 / (n * h * (2.0 * std::f64::consts::PI).sqrt());
    let step = (hi - lo) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / h).powi(2)).exp())
                .sum::<f64>()
                * norm;
            [x, density * scale]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Quantile of an already sorted slice by linear interpolation.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Tukey box: whiskers reach the furthest data within 1.5·IQR of the box.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let v = sorted(values);
    let q1 = quantile(&v, 0.25)?;
    let median = quantile(&v, 0.5)?;
    let q3 = quantile(&v, 0.75)?;
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let within = |x: &f64| (lo_fence..=hi_fence).contains(x);
    let lower_whisker = v.iter().copied().filter(within).reduce(f64::min).unwrap_or(q1);
    let upper_whisker = v.iter().copied().filter(within).reduce(f64::max).unwrap_or(q3);
    let outliers = v.iter().copied().filter(|x| !within(x)).collect();

    Some(BoxSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    })
}

// ---------------------------------------------------------------------------
// Regression and correlation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
}

impl Regression {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least squares fit of `ys` on `xs`.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Option<Regression> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let (mx, my) = (mean(xs)?, mean(ys)?);
    let sxx: f64 = xs.iter().map(|x| (x - mx).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    let slope = sxy / sxx;
    Some(Regression {
        slope,
        intercept: my - slope * mx,
    })
}

/// Pearson correlation; `NaN` when either side has no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return f64::NAN;
    }
    let (Some(mx), Some(my)) = (mean(xs), mean(ys)) else {
        return f64::NAN;
    };
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        sxy += (x - mx) * (y - my);
        sxx += (x - mx).powi(2);
        syy += (y - my).powi(2);
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    sxy / (sxx.sqrt() * syy.sqrt())
}

/// Correlation matrix over [`Field::ALL`].
pub fn correlation_matrix(students: &[Student]) -> Vec<Vec<f64>> {
    let columns: Vec<Vec<f64>> = Field::ALL.iter().map(|&f| column(students, f)).collect();
    columns
        .iter()
        .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn students(marks: &[f64]) -> Vec<Student> {
        marks
            .iter()
            .enumerate()
            .map(|(i, &m)| Student::new(format!("S{i}"), (i + 1).to_string(), m, i as f64))
            .collect()
    }

    #[test]
    fn category_boundaries() {
        assert_eq!(Category::of(85.0), Category::Distinction);
        assert_eq!(Category::of(84.99), Category::FirstClass);
        assert_eq!(Category::of(70.0), Category::FirstClass);
        assert_eq!(Category::of(69.5), Category::Pass);
        assert_eq!(Category::of(50.0), Category::Pass);
        assert_eq!(Category::of(49.9), Category::Fail);
    }

    #[test]
    fn counts_and_pie_fractions() {
        let s = students(&[95.0, 88.0, 72.0, 40.0]);
        let counts = category_counts(&s);
        assert_eq!(
            counts,
            vec![
                (Category::Distinction, 2),
                (Category::FirstClass, 1),
                (Category::Pass, 0),
                (Category::Fail, 1),
            ]
        );

        let slices = pie_slices(&s);
        assert_eq!(slices[0].fraction, 0.5);
        assert!(slices[1].exploded);
        assert!(!slices[0].exploded);
        let total: f64 = slices.iter().map(|p| p.fraction).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn top_n_is_descending_and_stable() {
        let s = students(&[60.0, 90.0, 75.0, 90.0, 30.0, 80.0]);
        let top: Vec<&str> = top_n(&s, 3).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(top, vec!["S1", "S3", "S5"]);
        assert_eq!(top_n(&s, 10).len(), 6);
    }

    #[test]
    fn histogram_bins_cover_all_values() {
        let values = [0.0, 1.0, 2.0, 5.0, 9.0, 10.0];
        let h = histogram(&values, 10).unwrap();
        assert_eq!(h.edges.len(), 11);
        assert_eq!(h.bin_width(), 1.0);
        assert_eq!(h.counts.iter().sum::<usize>(), values.len());
        // The maximum falls in the last, closed bin.
        assert_eq!(h.counts[9], 2);
        assert_eq!(h.counts[0], 1);
    }

    #[test]
    fn histogram_of_constant_sample() {
        let h = histogram(&[4.0, 4.0], 2).unwrap();
        assert_eq!(h.edges, vec![3.5, 4.0, 4.5]);
        assert_eq!(h.counts, vec![0, 2]);
        assert!(histogram(&[], 10).is_none());
    }

    #[test]
    fn kde_integrates_to_scale() {
        let values = [50.0, 55.0, 60.0, 70.0, 72.0, 90.0];
        let curve = kde_curve(&values, 400, 1.0);
        assert_eq!(curve.len(), 400);
        let step = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|p| p[1] * step).sum();
        assert!((area - 1.0).abs() < 0.01, "area = {area}");
        assert!(kde_curve(&[3.0, 3.0], 10, 1.0).is_empty());
    }

    #[test]
    fn quantiles_interpolate() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&v, 0.25), Some(1.75));
        assert_eq!(quantile(&v, 0.5), Some(2.5));
        assert_eq!(quantile(&v, 1.0), Some(4.0));
    }

    #[test]
    fn box_summary_flags_outliers() {
        let b = box_summary(&[1.0, 2.0, 3.0, 4.0, 5.0, 30.0]).unwrap();
        assert_eq!(b.q1, 2.25);
        assert_eq!(b.median, 3.5);
        assert_eq!(b.q3, 4.75);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 5.0);
        assert_eq!(b.outliers, vec![30.0]);
    }

    #[test]
    fn regression_recovers_exact_line() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|x| 5.0 * x + 40.0).collect();
        let fit = linear_regression(&xs, &ys).unwrap();
        assert!((fit.slope - 5.0).abs() < 1e-12);
        assert!((fit.intercept - 40.0).abs() < 1e-12);
        assert!((fit.predict(10.0) - 90.0).abs() < 1e-9);
        assert!(linear_regression(&[2.0, 2.0], &[1.0, 3.0]).is_none());
    }

    #[test]
    fn correlation_extremes() {
        let s = vec![
            Student::new("a", "1", 50.0, 1.0),
            Student::new("b", "2", 60.0, 2.0),
            Student::new("c", "3", 70.0, 3.0),
        ];
        let m = correlation_matrix(&s);
        assert!((m[0][1] - 1.0).abs() < 1e-12);
        assert!((m[1][0] - 1.0).abs() < 1e-12);
        assert!((m[0][0] - 1.0).abs() < 1e-12);

        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
        assert!(pearson(&[1.0, 1.0], &[1.0, 2.0]).is_nan());
    }
}
