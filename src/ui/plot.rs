use std::f32::consts::FRAC_PI_2;

use eframe::egui::{self, pos2, vec2, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints,
    Points,
};

use crate::color::{contrast_text, diverging, generate_palette, ACCENT, TABLE_FG};
use crate::data::analysis::{
    box_summary, category_counts, correlation_matrix, histogram, kde_curve, linear_regression,
    pie_slices, top_n,
};
use crate::data::model::{Field, Student};
use crate::data::stats::{column, max, min};
use crate::state::{AppState, ChartKind};

// ---------------------------------------------------------------------------
// Chart window
// ---------------------------------------------------------------------------

/// Render the open chart, if any; closing the window drops it.
pub fn chart_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(chart) = &state.chart else {
        return;
    };
    let top = state.config.top_n;
    let bins = state.config.histogram_bins;
    let title = match chart.kind {
        ChartKind::TopPerformers => format!("Top {top} Performers"),
        kind => kind.title().to_string(),
    };

    let mut open = true;
    egui::Window::new(title)
        .id(egui::Id::new("chart_window"))
        .open(&mut open)
        .default_size([760.0, 540.0])
        .resizable(true)
        .show(ctx, |ui: &mut Ui| {
            let students = &chart.students;
            match chart.kind {
                ChartKind::Scatter => scatter_plot(ui, students),
                ChartKind::MarksBar => marks_bar(ui, students),
                ChartKind::TopPerformers => top_bar(ui, students, top),
                ChartKind::CategoryPie => category_pie(ui, students),
                ChartKind::MarksHistogram => marks_histogram(ui, students, bins),
                ChartKind::StudyHoursBox => study_hours_box(ui, students),
                ChartKind::CorrelationHeatmap => correlation_heatmap(ui, students),
                ChartKind::CategoryBar => category_bar(ui, students),
            }
        });

    if !open {
        state.chart = None;
    }
}

/// Label for a categorical axis tick; blank between categories.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// egui_plot charts
// ---------------------------------------------------------------------------

fn scatter_plot(ui: &mut Ui, students: &[Student]) {
    let hours = column(students, Field::StudyHours);
    let marks = column(students, Field::Marks);
    let fit = linear_regression(&hours, &marks);
    let points: Vec<[f64; 2]> = hours.iter().zip(&marks).map(|(&x, &y)| [x, y]).collect();

    Plot::new("scatter_plot")
        .legend(Legend::default())
        .x_axis_label("Study Hours")
        .y_axis_label("Marks")
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .name("Students")
                    .color(ACCENT)
                    .radius(4.0),
            );
            if let (Some(fit), Some(lo), Some(hi)) = (fit, min(&hours), max(&hours)) {
                let line = PlotPoints::from(vec![[lo, fit.predict(lo)], [hi, fit.predict(hi)]]);
                plot_ui.line(
                    Line::new(line)
                        .name(format!(
                            "Marks = {:.2} × Hours + {:.2}",
                            fit.slope, fit.intercept
                        ))
                        .color(Color32::from_rgb(0x26, 0x6E, 0x86))
                        .width(2.0),
                );
            }
        });
}

fn marks_bar(ui: &mut Ui, students: &[Student]) {
    let names: Vec<String> = students.iter().map(|s| s.name.clone()).collect();
    let bars: Vec<Bar> = students
        .iter()
        .enumerate()
        .map(|(i, s)| Bar::new(i as f64, s.marks).name(&s.name).width(0.7))
        .collect();
    let colors = generate_palette(bars.len());
    let bars: Vec<Bar> = bars
        .into_iter()
        .zip(colors)
        .map(|(bar, color)| bar.fill(color))
        .collect();

    Plot::new("marks_bar")
        .x_axis_label("Marks")
        .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .y_axis_formatter(move |mark, _range| category_label(&names, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Marks"));
        });
}

fn top_bar(ui: &mut Ui, students: &[Student], n: usize) {
    let top = top_n(students, n);
    let names: Vec<String> = top.iter().map(|s| s.name.clone()).collect();
    let colors = generate_palette(top.len());
    let bars: Vec<Bar> = top
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (s, color))| {
            Bar::new(i as f64, s.marks)
                .name(&s.name)
                .width(0.6)
                .fill(color)
        })
        .collect();

    Plot::new("top_bar")
        .y_axis_label("Marks")
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(move |mark, _range| category_label(&names, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Marks"));
        });
}

fn marks_histogram(ui: &mut Ui, students: &[Student], bins: usize) {
    let marks = column(students, Field::Marks);
    let Some(hist) = histogram(&marks, bins) else {
        ui.label("Not enough data for a histogram.");
        return;
    };
    let width = hist.bin_width();
    let bars: Vec<Bar> = hist
        .centers()
        .zip(&hist.counts)
        .map(|(center, &count)| Bar::new(center, count as f64).width(width))
        .collect();
    let density = kde_curve(&marks, 200, marks.len() as f64 * width);

    Plot::new("marks_histogram")
        .legend(Legend::default())
        .x_axis_label("Marks")
        .y_axis_label("Number of Students")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(ACCENT).name("Students"));
            if !density.is_empty() {
                plot_ui.line(
                    Line::new(PlotPoints::from(density))
                        .color(Color32::from_rgb(0x00, 0x79, 0x6B))
                        .width(2.0)
                        .name("Density"),
                );
            }
        });
}

fn study_hours_box(ui: &mut Ui, students: &[Student]) {
    let hours = column(students, Field::StudyHours);
    let Some(b) = box_summary(&hours) else {
        ui.label("No study hours to plot.");
        return;
    };
    let outliers: Vec<[f64; 2]> = b.outliers.iter().map(|&v| [0.0, v]).collect();
    let elem = BoxElem::new(
        0.0,
        BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
    )
    .name("Study Hours")
    .box_width(0.4)
    .whisker_width(0.2)
    .fill(ACCENT.gamma_multiply(0.6))
    .stroke(Stroke::new(1.5, TABLE_FG));

    Plot::new("study_hours_box")
        .y_axis_label("Study Hours")
        .show_x(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(vec![elem]).name("Study Hours"));
            if !outliers.is_empty() {
                plot_ui.points(
                    Points::new(PlotPoints::from(outliers))
                        .name("Outliers")
                        .color(TABLE_FG)
                        .radius(3.0),
                );
            }
        });
}

fn category_bar(ui: &mut Ui, students: &[Student]) {
    let counts = category_counts(students);
    let labels: Vec<String> = counts.iter().map(|(c, _)| c.label().to_string()).collect();
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (c, n))| Bar::new(i as f64, *n as f64).name(c.label()).width(0.6))
        .collect();

    Plot::new("category_bar")
        .x_axis_label("Category")
        .y_axis_label("Number of Students")
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(ACCENT).name("Students"));
        });
}

// ---------------------------------------------------------------------------
// Painter charts
// ---------------------------------------------------------------------------

/// Screen direction of an angle measured counter-clockwise from +x.
fn dir(angle: f32) -> Vec2 {
    vec2(angle.cos(), -angle.sin())
}

/// Fill a pie wedge as convex pieces of at most a quarter turn.
fn fill_wedge(painter: &egui::Painter, center: Pos2, radius: f32, start: f32, sweep: f32, color: Color32) {
    const SEGMENTS: usize = 24;
    let pieces = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = sweep / pieces as f32;
    for p in 0..pieces {
        let a0 = start + step * p as f32;
        let mut points: Vec<Pos2> = (0..=SEGMENTS)
            .map(|k| center + radius * dir(a0 + step * k as f32 / SEGMENTS as f32))
            .collect();
        points.push(center);
        // Angles grow counter-clockwise on screen; egui wants clockwise.
        points.reverse();
        painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
    }
}

fn category_pie(ui: &mut Ui, students: &[Student]) {
    let slices = pie_slices(students);
    let colors = generate_palette(slices.len());

    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
    let rect = response.rect;
    let radius = rect.width().min(rect.height()) * 0.32;
    let center = rect.center();

    let mut angle = 140f32.to_radians();
    for (slice, color) in slices.iter().zip(colors) {
        if slice.count == 0 {
            continue;
        }
        let sweep = slice.fraction as f32 * std::f32::consts::TAU;
        let mid = dir(angle + sweep / 2.0);
        let offset = if slice.exploded { 0.2 * radius } else { 0.0 };
        let c = center + offset * mid;

        // Shadow, then the wedge itself.
        fill_wedge(&painter, c + vec2(3.0, 3.0), radius, angle, sweep, Color32::from_black_alpha(40));
        fill_wedge(&painter, c, radius, angle, sweep, color);

        painter.text(
            c + 0.6 * radius * mid,
            Align2::CENTER_CENTER,
            format!("{:.1}%", slice.fraction * 100.0),
            FontId::proportional(14.0),
            contrast_text(color),
        );
        painter.text(
            c + 1.15 * radius * mid,
            Align2::CENTER_CENTER,
            slice.category.label(),
            FontId::proportional(15.0),
            TABLE_FG,
        );
        angle += sweep;
    }
}

fn correlation_heatmap(ui: &mut Ui, students: &[Student]) {
    let matrix = correlation_matrix(students);
    let labels: Vec<&str> = Field::ALL.iter().map(|f| f.label()).collect();
    let n = labels.len() as f32;

    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
    let rect = response.rect;
    let label_width = 110.0;
    let bar_width = 70.0;
    let cell = ((rect.width() - label_width - bar_width) / n)
        .min((rect.height() - 40.0) / n)
        .max(20.0);
    let origin = rect.min + vec2(label_width, 10.0);

    for (i, row) in matrix.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            let cell_rect = Rect::from_min_size(
                origin + vec2(j as f32 * cell, i as f32 * cell),
                Vec2::splat(cell),
            );
            let fill = diverging(value);
            painter.rect_filled(cell_rect.shrink(1.0), 0.0, fill);
            let text = if value.is_nan() {
                "nan".to_string()
            } else {
                format!("{value:.2}")
            };
            painter.text(
                cell_rect.center(),
                Align2::CENTER_CENTER,
                text,
                FontId::proportional(18.0),
                contrast_text(fill),
            );
        }
        painter.text(
            pos2(origin.x - 8.0, origin.y + (i as f32 + 0.5) * cell),
            Align2::RIGHT_CENTER,
            labels[i],
            FontId::proportional(14.0),
            TABLE_FG,
        );
        painter.text(
            pos2(origin.x + (i as f32 + 0.5) * cell, origin.y + n * cell + 6.0),
            Align2::CENTER_TOP,
            labels[i],
            FontId::proportional(14.0),
            TABLE_FG,
        );
    }

    // Colour bar from -1 (bottom) to 1 (top).
    const STEPS: usize = 40;
    let bar_left = origin.x + n * cell + 20.0;
    let bar_height = n * cell;
    let step_height = bar_height / STEPS as f32;
    for k in 0..STEPS {
        let value = 1.0 - 2.0 * (k as f64 + 0.5) / STEPS as f64;
        let r = Rect::from_min_size(
            pos2(bar_left, origin.y + k as f32 * step_height),
            vec2(16.0, step_height + 0.5),
        );
        painter.rect_filled(r, 0.0, diverging(value));
    }
    for (value, y) in [("1.0", origin.y), ("0.0", origin.y + bar_height / 2.0), ("-1.0", origin.y + bar_height)] {
        painter.text(
            pos2(bar_left + 22.0, y),
            Align2::LEFT_CENTER,
            value,
            FontId::proportional(12.0),
            TABLE_FG,
        );
    }
}
