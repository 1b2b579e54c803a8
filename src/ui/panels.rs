use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::Selection;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let (Some(dataset), Some(filters)) = (state.dataset(), state.filters.clone()) else {
        ui.label("No dataset loaded.");
        return;
    };
    let Some((min_year, max_year)) = dataset.year_bounds() else {
        ui.label("The dataset has no articles with a valid publication date.");
        return;
    };

    // Clone what we need so we can mutate state below.
    let journals = dataset.journals.clone();
    let sources = dataset.sources.clone();
    let total = dataset.len();
    let dropped = dataset.dropped_rows;

    // ---- Year range ----
    ui.strong("Select Year Range");
    let (mut from, mut to) = filters.year_range;
    if ui
        .add(egui::Slider::new(&mut from, min_year..=max_year).text("from"))
        .changed()
    {
        state.set_year_min(from);
    }
    if ui
        .add(egui::Slider::new(&mut to, min_year..=max_year).text("to"))
        .changed()
    {
        state.set_year_max(to);
    }
    ui.add_space(6.0);

    // ---- Journal / source selectors ----
    ui.strong("Select Journal");
    if let Some(choice) = selection_combo(ui, "journal_select", &filters.journal, &journals) {
        state.set_journal(choice);
    }
    ui.add_space(6.0);

    ui.strong("Select Source");
    if let Some(choice) = selection_combo(ui, "source_select", &filters.source, &sources) {
        state.set_source(choice);
    }
    ui.add_space(6.0);

    if ui.button("Reset Filters").clicked() {
        state.reset_filters();
    }

    ui.separator();
    ui.label(RichText::new(state.data_path().display().to_string()).monospace());
    ui.label(format!("{} articles loaded", format_count(total)));
    if dropped > 0 {
        ui.label(
            RichText::new(format!("{} rows without a valid date skipped", format_count(dropped)))
                .weak(),
        );
    }
}

/// "All" plus every option.  Returns the new selection when it changed.
fn selection_combo(ui: &mut Ui, id: &str, current: &Selection, options: &[String]) -> Option<Selection> {
    let mut picked: Option<Selection> = None;

    egui::ComboBox::from_id_salt(id)
        .selected_text(current.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(*current == Selection::All, "All")
                .clicked()
            {
                picked = Some(Selection::All);
            }
            for option in options {
                let is_current = matches!(current, Selection::Only(v) if v == option);
                if ui.selectable_label(is_current, option).clicked() {
                    picked = Some(Selection::Only(option.clone()));
                }
            }
        });

    picked.filter(|p| p != current)
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title and the selection-size metric.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("CORD-19 Dataset Analysis");
        ui.separator();

        if let Some(summary) = &state.summary {
            ui.label("Total Articles in Selection");
            ui.label(
                RichText::new(format_count(summary.selection_size))
                    .size(22.0)
                    .strong(),
            );
        }

        if state.status_message.is_some() {
            ui.label(RichText::new("Dataset not available").color(Color32::RED));
        }
    });
}

/// `1234567` → `"1,234,567"`.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
