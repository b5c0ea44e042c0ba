use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::aggregate::{frequency_table, CategoricalField};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – group selection
// ---------------------------------------------------------------------------

/// Render the left panel with the group selector.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Opciones de visualización");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No hay datos cargados.");
        return;
    };
    let per_group = frequency_table(table, CategoricalField::Group);

    let mut chosen = state.selected_group.clone();
    ui.strong("Seleccione el grupo a analizar");
    egui::ComboBox::from_id_salt("group_selector")
        .selected_text(chosen.clone())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in &state.group_options {
                ui.selectable_value(&mut chosen, option.clone(), option);
            }
        });
    ui.add_space(8.0);

    ui.strong("Estudiantes por grupo");
    ScrollArea::vertical()
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("group_counts")
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for (group, count) in &per_group {
                        ui.label(group);
                        ui.label(count.to_string());
                        ui.end_row();
                    }
                });
        });

    state.select_group(chosen);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Archivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = matches!(state.view, Some(Ok(_)));
            if ui
                .add_enabled(can_export, egui::Button::new("Exportar vista…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(path) = &state.source {
            ui.label(path.display().to_string());
        }
        if let (Some(table), Some(Ok(view))) = (&state.table, &state.view) {
            ui.separator();
            ui.label(format!(
                "{} estudiantes cargados, {} visibles",
                table.len(),
                view.summary.total
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir datos del taller")
        .add_filter("CSV", &["csv", "txt"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Exportar vista actual")
        .add_filter("CSV", &["csv"])
        .set_file_name("vista_taller.csv")
        .save_file();

    if let Some(path) = file {
        match state.export_view(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export view: {e:#}");
                state.status_message = Some(format!("Error al exportar: {e:#}"));
            }
        }
    }
}
