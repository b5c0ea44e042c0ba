use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::aggregate::{build_report, NoDataAfterFiltering, ReportView};
use crate::data::export::write_table;
use crate::data::filter::group_options;
use crate::data::loader::{load, LoadError};
use crate::data::model::{Table, ALL_GROUPS};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Owns the loaded table; every derived value is recomputed from it when a
/// selection changes.
pub struct AppState {
    /// File the table came from.
    pub source: Option<PathBuf>,

    /// Cleaned table (None until a load succeeds).
    pub table: Option<Table>,

    /// Group selector entries, `Todos los Grupos` first.
    pub group_options: Vec<String>,

    pub selected_group: String,

    pub selected_student: Option<String>,

    /// View model for the current group (cached).
    pub view: Option<Result<ReportView, NoDataAfterFiltering>>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            source: None,
            table: None,
            group_options: Vec::new(),
            selected_group: ALL_GROUPS.to_string(),
            selected_student: None,
            view: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Load `path`, replacing the current table on success.
    ///
    /// On failure the previous table is dropped as well: nothing is shown
    /// that does not come from the file the user asked for.
    pub fn open(&mut self, path: &Path) {
        self.source = Some(path.to_path_buf());
        match load(path) {
            Ok(table) => self.set_table(table),
            Err(e) => self.fail(&e),
        }
    }

    /// Ingest a newly loaded table and reset the selections.
    pub fn set_table(&mut self, table: Table) {
        self.group_options = group_options(&table);
        self.selected_group = ALL_GROUPS.to_string();
        self.table = Some(table);
        self.status_message = None;
        self.refresh();
    }

    fn fail(&mut self, error: &LoadError) {
        log::error!("Failed to load data: {error}");
        self.table = None;
        self.group_options.clear();
        self.view = None;
        self.selected_student = None;
        self.status_message = Some(format!("Error al cargar los datos: {error}"));
    }

    /// Recompute the view after a group change.
    pub fn refresh(&mut self) {
        self.view = self
            .table
            .as_ref()
            .map(|table| build_report(table, &self.selected_group));

        // Keep the selected student if they are still visible.
        let names: &[String] = match &self.view {
            Some(Ok(view)) => view.student_names.as_slice(),
            _ => &[],
        };
        let still_visible = self
            .selected_student
            .as_ref()
            .is_some_and(|name| names.contains(name));
        if !still_visible {
            self.selected_student = names.first().cloned();
        }
    }

    pub fn select_group(&mut self, group: String) {
        if group != self.selected_group {
            self.selected_group = group;
            self.refresh();
        }
    }

    /// Write the currently filtered rows to `path`.
    pub fn export_view(&self, path: &Path) -> Result<()> {
        let Some(Ok(view)) = &self.view else {
            anyhow::bail!("no hay datos para exportar");
        };
        let mut buffer: Vec<u8> = Vec::new();
        write_table(&view.filtered, &mut buffer).context("serializing the filtered table")?;
        std::fs::write(path, buffer).with_context(|| format!("writing {}", path.display()))?;
        log::info!(
            "Exported {} students of group '{}' to {}",
            view.filtered.len(),
            view.group,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    fn state() -> AppState {
        let mut state = AppState::default();
        state.set_table(Table::new(vec![
            record("Ana", "1", 4.0),
            record("Beto", "2", 3.0),
            record("Carla", "1", 5.0),
        ]));
        state
    }

    #[test]
    fn loading_selects_all_groups_and_first_student() {
        let state = state();
        assert_eq!(state.group_options, [ALL_GROUPS, "1", "2"]);
        assert_eq!(state.selected_student.as_deref(), Some("Ana"));
        assert!(matches!(state.view, Some(Ok(_))));
    }

    #[test]
    fn switching_group_reselects_hidden_student() {
        let mut state = state();
        state.select_group("2".to_string());
        assert_eq!(state.selected_student.as_deref(), Some("Beto"));

        state.selected_student = Some("Beto".to_string());
        state.select_group(ALL_GROUPS.to_string());
        assert_eq!(state.selected_student.as_deref(), Some("Beto"));
    }

    #[test]
    fn empty_group_yields_no_data_view() {
        let mut state = state();
        state.select_group("9".to_string());
        assert!(matches!(state.view, Some(Err(NoDataAfterFiltering { .. }))));
        assert_eq!(state.selected_student, None);
    }

    #[test]
    fn export_writes_only_the_visible_group() {
        let mut state = state();
        state.select_group("1".to_string());
        let path = std::env::temp_dir().join(format!("taller-export-{}.csv", std::process::id()));
        state.export_view(&path).unwrap();
        let exported = load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let names: Vec<_> = exported.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Ana", "Carla"]);
    }

    #[test]
    fn failed_export_leaves_no_file() {
        let mut state = state();
        state.select_group("9".to_string());
        let path = std::env::temp_dir().join(format!("taller-empty-{}.csv", std::process::id()));
        assert!(state.export_view(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn failed_load_clears_previous_table() {
        let mut state = state();
        state.open(Path::new("no/existe.csv"));
        assert!(state.table.is_none());
        assert!(state.view.is_none());
        let msg = state.status_message.unwrap();
        assert!(msg.contains("no se encontró"), "{msg}");
    }
}
