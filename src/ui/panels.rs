use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::config::RenderMode;
use crate::data::model::CsvTable;
use crate::state::AppState;

/// Rows shown in the preview table.
const PREVIEW_ROWS: usize = 200;

// ---------------------------------------------------------------------------
// Left side panel – column selection
// ---------------------------------------------------------------------------

/// Render the left setup panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Columns");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No file loaded.");
        return;
    };

    let headers = table.headers.clone();
    ScrollArea::vertical()
        .max_height(ui.available_height() * 0.4)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for (idx, header) in headers.iter().enumerate() {
                ui.label(format!("{}: {header}", idx + 1));
            }
        });
    ui.separator();

    ui.strong("Axes (column number)");
    egui::Grid::new("axis_inputs")
        .num_columns(3)
        .spacing([8.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            for (axis, i) in ["X", "Y", "Z"].into_iter().zip(0..) {
                ui.label(axis);
                let changed = ui
                    .add(egui::TextEdit::singleline(&mut state.column_inputs[i]).desired_width(40.0))
                    .changed();
                if changed {
                    state.plot = None;
                }
                let name = state.column_name(&state.column_inputs[i]).unwrap_or("–");
                ui.weak(name);
                ui.end_row();
            }
        });
    ui.separator();

    ui.strong("Plot type");
    for mode in RenderMode::ALL {
        ui.radio_value(&mut state.render_mode, mode, mode.to_string());
    }
    ui.add_space(8.0);

    if ui.button("Plot").clicked() {
        state.build_plot();
    }

    if let Some(plot) = &state.plot {
        ui.add_space(8.0);
        ui.label(plot.summary());
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(path), Some(table)) = (&state.source, &state.table) {
            ui.label(format!(
                "{}: {} rows, {} columns",
                path.display(),
                table.len(),
                table.column_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Data preview
// ---------------------------------------------------------------------------

/// Header plus the first rows of the loaded file.
pub fn table_preview(ui: &mut Ui, table: &CsvTable) {
    let n_rows = table.len().min(PREVIEW_ROWS);
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto())
        .columns(Column::auto().at_least(60.0), table.column_count())
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("#");
            });
            for (idx, name) in table.headers.iter().enumerate() {
                header.col(|ui: &mut Ui| {
                    ui.strong(format!("{}: {name}", idx + 1));
                });
            }
        })
        .body(|body| {
            body.rows(18.0, n_rows, |mut row| {
                let record = &table.rows[row.index()];
                let row_no = row.index() + 1;
                row.col(|ui: &mut Ui| {
                    ui.weak(row_no.to_string());
                });
                for c in 0..table.column_count() {
                    row.col(|ui: &mut Ui| {
                        ui.label(record.get(c).unwrap_or(""));
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Select a CSV file")
        .add_filter("CSV Files", &["csv"])
        .add_filter("All Files", &["*"])
        .pick_file();

    let Some(path) = file else {
        log::info!("No file selected");
        return;
    };

    match crate::data::loader::load_csv(&path) {
        Ok(table) => state.set_table(path, table),
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
