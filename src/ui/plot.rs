use eframe::egui::{self, Align2, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoint, Points, Text};

use crate::color::{viridis_at, viridis_palette};
use crate::data::aggregate::{DashboardSummary, LabelCount, WordCloud, YearCount};
use crate::data::words::WordWeight;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 300.0;
const MAX_LABEL_CHARS: usize = 40;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render every chart for the current selection.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if let Some(msg) = &state.status_message {
        load_failure(ui, msg);
        return;
    }
    if state.is_loading() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.spinner();
            ui.heading("Loading and processing data…");
        });
        return;
    }
    let Some(summary) = &state.summary else {
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label(
                "Explore CORD-19 article metadata: publication trends, \
                 leading journals, common title words and sources.",
            );
            ui.add_space(8.0);
            sections(ui, summary);
            preview_table(ui, state);
        });
}

fn sections(ui: &mut Ui, summary: &DashboardSummary) {
    ui.heading("Articles Published Over Time");
    match &summary.yearly {
        Some(yearly) => yearly_chart(ui, yearly),
        None => no_data(ui, "No articles to display for the current filter selection."),
    }
    ui.separator();

    ui.heading("Top 10 Journals by Article Count");
    match &summary.journals {
        Some(journals) => journals_chart(ui, journals),
        None => no_data(ui, "No journal data to display for the current filter selection."),
    }
    ui.separator();

    ui.heading("Word Cloud of Most Common Words in Titles");
    match &summary.cloud {
        WordCloud::Words(words) if !words.is_empty() => word_cloud(ui, words),
        _ => no_data(ui, "No titles available to generate a word cloud."),
    }
    ui.separator();

    ui.heading("Distribution of Article Counts by Source");
    match &summary.sources {
        Some(sources) => sources_chart(ui, sources),
        None => no_data(ui, "No source data to display for the current filter selection."),
    }
    ui.separator();
}

fn no_data(ui: &mut Ui, msg: &str) {
    ui.label(RichText::new(msg).italics());
}

fn load_failure(ui: &mut Ui, msg: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(40.0);
        ui.heading(RichText::new("⚠ Dataset not available").color(Color32::RED));
    });
    ui.add_space(12.0);
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.label(msg);
    });
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Axis text for category positions; blank between categories.
fn category_label(labels: &[String], value: f64) -> String {
    if value.fract() != 0.0 || value < 0.0 {
        return String::new();
    }
    labels.get(value as usize).cloned().unwrap_or_default()
}

fn shorten(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let head: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        format!("{head}…")
    }
}

fn yearly_chart(ui: &mut Ui, yearly: &[YearCount]) {
    let points: Vec<[f64; 2]> = yearly
        .iter()
        .map(|&(year, n)| [year as f64, n as f64])
        .collect();

    Plot::new("yearly_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Number of Articles")
        .x_axis_formatter(|mark: GridMark, _range| {
            if mark.value.fract() == 0.0 {
                format!("{}", mark.value as i64)
            } else {
                String::new()
            }
        })
        .include_y(0.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points.clone())
                    .name("Articles")
                    .color(viridis_at(0.35))
                    .width(2.0),
            );
            plot_ui.points(Points::new(points).radius(4.0).color(viridis_at(0.35)));
        });
}

fn journals_chart(ui: &mut Ui, journals: &[LabelCount]) {
    let n = journals.len();
    let colors = viridis_palette(n);

    // Largest count on top: position 0 is the bottom bar.
    let labels: Vec<String> = journals.iter().rev().map(|(j, _)| shorten(j)).collect();
    let bars: Vec<Bar> = journals
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(rank, ((journal, count), color))| {
            Bar::new((n - 1 - rank) as f64, *count as f64)
                .name(journal)
                .fill(color)
                .width(0.7)
        })
        .collect();

    Plot::new("journals_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Number of Articles")
        .y_axis_label("Journal")
        .y_axis_formatter(move |mark: GridMark, _range| category_label(&labels, mark.value))
        .include_x(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Articles"));
        });
}

fn sources_chart(ui: &mut Ui, sources: &[LabelCount]) {
    let colors = viridis_palette(sources.len());
    let labels: Vec<String> = sources.iter().map(|(s, _)| shorten(s)).collect();
    let max = sources.iter().map(|(_, c)| *c).max().unwrap_or(0) as f64;

    let bars: Vec<Bar> = sources
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, ((source, count), color))| {
            Bar::new(i as f64, *count as f64)
                .name(source)
                .fill(color)
                .width(0.7)
        })
        .collect();

    Plot::new("sources_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Source")
        .y_axis_label("Number of Articles")
        .x_axis_formatter(move |mark: GridMark, _range| category_label(&labels, mark.value))
        .include_y(0.0)
        .include_y(max * 1.15)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Articles"));
            // Count above each bar.
            for (i, (_, count)) in sources.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(i as f64, *count as f64), count.to_string())
                        .anchor(Align2::CENTER_BOTTOM),
                );
            }
        });
}

fn word_cloud(ui: &mut Ui, words: &[WordWeight]) {
    egui::Frame::new()
        .fill(Color32::WHITE)
        .inner_margin(12.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for w in words {
                    let size = 11.0 + 37.0 * w.weight;
                    let text = RichText::new(&w.word)
                        .size(size)
                        .color(viridis_at(1.0 - w.weight * 0.9));
                    ui.label(text).on_hover_text(format!("{} × {}", w.word, w.count));
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Selection preview
// ---------------------------------------------------------------------------

fn preview_table(ui: &mut Ui, state: &AppState) {
    let rows = state.preview();
    if rows.is_empty() {
        return;
    }

    egui::CollapsingHeader::new(RichText::new("Articles in Selection").strong())
        .id_salt("preview")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(true)
                .max_scroll_height(320.0)
                .column(Column::auto())
                .column(Column::auto().at_most(220.0))
                .column(Column::auto())
                .column(Column::remainder())
                .header(20.0, |mut header| {
                    for title in ["Date", "Journal", "Source", "Title"] {
                        header.col(|ui: &mut Ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, rows.len(), |mut row| {
                        let a = rows[row.index()];
                        row.col(|ui: &mut Ui| {
                            ui.label(a.publish_time.to_string());
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(a.journal.as_deref().unwrap_or("—"));
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(a.source.as_deref().unwrap_or("—"));
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(a.title.as_deref().unwrap_or(""));
                        });
                    });
                });
        });
}
