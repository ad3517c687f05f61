use eframe::egui::{self, RichText, Sense, Ui};

use super::style;
use crate::estimator::format_estimate;
use crate::pipeline::DashboardSnapshot;
use crate::report::{ColumnSummary, CorrelationMatrix, Histogram};
use crate::table::{Column, TextColumn};

const HISTOGRAM_SIZE: egui::Vec2 = egui::vec2(220.0, 90.0);
const CORRELATION_CELL: egui::Vec2 = egui::vec2(72.0, 22.0);

pub fn error_banner(ui: &mut Ui, message: &str) {
    ui.colored_label(style::palette().warning, message);
}

/// Score and estimated rating.
pub fn estimate(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    let palette = style::palette();
    match &snapshot.fit {
        Ok(report) => {
            match report.score_percent {
                Some(score) => ui.label(format!("Model score (R² on held-out rows): {score}%")),
                None => ui.colored_label(
                    palette.warning,
                    "Model score unavailable: held-out ratings do not vary",
                ),
            };
            ui.small(format!(
                "{} rows used, {} skipped, {} held out",
                report.rows_used,
                report.rows_skipped,
                report.split.test.len()
            ));
        }
        Err(err) => {
            ui.colored_label(palette.warning, err.to_string());
        }
    }
    ui.add_space(6.0);
    match &snapshot.estimate {
        Ok(value) => {
            ui.label(
                RichText::new(format!("Estimated rating: {}", format_estimate(*value)))
                    .heading()
                    .color(palette.success),
            );
        }
        Err(err) if snapshot.fit.is_ok() => {
            ui.colored_label(palette.warning, err.to_string());
        }
        Err(_) => {}
    }
}

/// Preview rows, summary statistics and missing values.
pub fn description(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    ui.heading("Preview");
    head_grid(ui, snapshot);
    ui.add_space(8.0);
    ui.heading("Summary statistics");
    summary_grid(ui, &snapshot.description.summaries);
    ui.add_space(8.0);
    ui.heading("Missing values");
    egui::Grid::new("null_counts").striped(true).show(ui, |ui| {
        for count in &snapshot.description.null_counts {
            ui.label(count.column.name());
            ui.label(count.missing.to_string());
            ui.end_row();
        }
    });
}

/// Correlation heatmap and per-column histograms.
pub fn charts(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    ui.heading("Correlation");
    correlation_grid(ui, &snapshot.description.correlation);
    ui.add_space(8.0);
    ui.heading("Distributions");
    ui.horizontal_wrapped(|ui| {
        for histogram in &snapshot.description.histograms {
            histogram_plot(ui, histogram);
        }
    });
}

fn head_grid(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    egui::Grid::new("head_rows").striped(true).show(ui, |ui| {
        for column in Column::ALL {
            ui.label(RichText::new(column.name()).strong());
        }
        ui.end_row();
        for row in snapshot.head() {
            for column in Column::ALL {
                let text = match column {
                    Column::Text(TextColumn::Url) => row
                        .url
                        .as_deref()
                        .map(|url| truncate(url, 32))
                        .unwrap_or_default(),
                    Column::Text(column) => row
                        .text(column)
                        .map(|text| truncate(text, 40))
                        .unwrap_or_default(),
                    Column::Numeric(column) => format_cell(row.numeric(column)),
                };
                ui.label(text);
            }
            ui.end_row();
        }
    });
}

fn summary_grid(ui: &mut Ui, summaries: &[ColumnSummary]) {
    egui::Grid::new("summary_stats").striped(true).show(ui, |ui| {
        for header in ["", "count", "mean", "std", "min", "25%", "50%", "75%", "max"] {
            ui.label(RichText::new(header).strong());
        }
        ui.end_row();
        for summary in summaries {
            ui.label(summary.column.name());
            ui.label(summary.count.to_string());
            for value in [
                summary.mean,
                summary.std,
                summary.min,
                summary.q25,
                summary.median,
                summary.q75,
                summary.max,
            ] {
                ui.label(format_cell(value));
            }
            ui.end_row();
        }
    });
}

fn correlation_grid(ui: &mut Ui, matrix: &CorrelationMatrix) {
    egui::Grid::new("correlation").show(ui, |ui| {
        ui.label("");
        for column in &matrix.columns {
            ui.label(RichText::new(column.name()).strong());
        }
        ui.end_row();
        for (row, column) in matrix.columns.iter().enumerate() {
            ui.label(RichText::new(column.name()).strong());
            for col in 0..matrix.columns.len() {
                let (rect, _) = ui.allocate_exact_size(CORRELATION_CELL, Sense::hover());
                ui.painter()
                    .rect_filled(rect, 0.0, style::correlation_fill(matrix.get(row, col)));
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    matrix.label(row, col),
                    egui::FontId::monospace(12.0),
                    style::correlation_text(matrix.get(row, col)),
                );
            }
            ui.end_row();
        }
    });
}

fn histogram_plot(ui: &mut Ui, histogram: &Histogram) {
    ui.vertical(|ui| {
        ui.label(histogram.column.name());
        let (rect, response) = ui.allocate_exact_size(HISTOGRAM_SIZE, Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, style::palette().bg_primary);
        let max = histogram.max_count();
        if histogram.bins.is_empty() || max == 0 {
            return;
        }
        let bar_width = rect.width() / histogram.bins.len() as f32;
        for (idx, bin) in histogram.bins.iter().enumerate() {
            let height = rect.height() * bin.count as f32 / max as f32;
            let left = rect.left() + bar_width * idx as f32;
            let bar = egui::Rect::from_min_max(
                egui::pos2(left + 1.0, rect.bottom() - height),
                egui::pos2(left + bar_width - 1.0, rect.bottom()),
            );
            painter.rect_filled(bar, 0.0, style::histogram_bar());
        }
        if let (Some(first), Some(last)) = (histogram.bins.first(), histogram.bins.last()) {
            response.on_hover_text(format!(
                "{} values from {} to {}",
                histogram.total(),
                format_cell(Some(first.lower)),
                format_cell(Some(last.upper))
            ));
        }
    });
}

fn format_cell(value: Option<f64>) -> String {
    match value {
        Some(value) if value.fract() == 0.0 && value.abs() < 1e12 => format!("{value:.0}"),
        Some(value) => format!("{value:.3}"),
        None => "-".to_string(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
