use std::path::Path;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, report};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TallerReportApp {
    pub state: AppState,
}

impl TallerReportApp {
    /// Start with `path` loaded; a failed load is shown in the window.
    pub fn new(path: &Path) -> Self {
        let mut state = AppState::default();
        state.open(path);
        Self { state }
    }
}

impl eframe::App for TallerReportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: group selection ----
        egui::SidePanel::left("group_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: report ----
        egui::CentralPanel::default().show(ctx, |ui| {
            report::central_panel(ui, &mut self.state);
        });
    }
}
