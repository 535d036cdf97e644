use eframe::egui;

use crate::config::RenderMode;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct SurfacePlotApp {
    pub state: AppState,
}

impl SurfacePlotApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SurfacePlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: column selection ----
        egui::SidePanel::left("setup_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: surface view(s) or data preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let AppState {
                table,
                plot: current,
                camera,
                render_mode,
                ..
            } = &mut self.state;

            match (current.as_ref(), table.as_ref()) {
                (Some(data), _) => match render_mode {
                    RenderMode::Static => plot::static_surface(ui, data),
                    RenderMode::Interactive => plot::interactive_surface(ui, data, camera),
                    RenderMode::Both => {
                        ui.columns(2, |cols| {
                            plot::static_surface(&mut cols[0], data);
                            plot::interactive_surface(&mut cols[1], data, camera);
                        });
                    }
                },
                (None, Some(table)) => panels::table_preview(ui, table),
                (None, None) => {
                    ui.centered_and_justified(|ui| {
                        ui.heading("Open a CSV file to plot  (File → Open…)");
                    });
                }
            }
        });
    }
}
