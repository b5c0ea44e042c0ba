use eframe::egui::{self, Color32, Label, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::{AiComment, FeedbackLink, ReportView, StudentFeedback, SummaryMetrics};
use crate::data::model::Usage;
use crate::state::AppState;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Central panel – the report
// ---------------------------------------------------------------------------

/// Render the report for the current selection, or the reason there is none.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let view = match &state.view {
        Some(Ok(view)) => view,
        Some(Err(empty)) => {
            header(ui, &state.selected_group);
            ui.label(RichText::new(format!("⚠ {empty}")).color(Color32::YELLOW));
            return;
        }
        None => {
            ui.centered_and_justified(|ui: &mut Ui| match &state.status_message {
                Some(msg) => {
                    ui.heading(RichText::new(format!("🚨 {msg}")).color(Color32::RED));
                }
                None => {
                    ui.heading("Abra un archivo para ver el análisis  (Archivo → Abrir…)");
                }
            });
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            header(ui, &view.group);
            metrics_row(ui, &view.summary);
            ui.separator();
            methodology_section(ui, view);
            ui.separator();
            ai_section(ui, view);
            ui.separator();
            feedback_section(ui, view, &mut state.selected_student);
        });
}

fn header(ui: &mut Ui, group: &str) {
    ui.heading("📊 Análisis de desempeño: Taller exponenciales y logaritmos");
    ui.label(RichText::new(format!("Mostrando datos para: {group}")).strong());
    ui.separator();
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(value).size(28.0).strong());
    });
}

fn metrics_row(ui: &mut Ui, summary: &SummaryMetrics) {
    ui.columns(3, |cols: &mut [Ui]| {
        metric(
            &mut cols[0],
            "Nota promedio del grupo",
            format!("{:.2}", summary.mean_score),
        );
        metric(
            &mut cols[1],
            "% Estudiantes que usaron gráficas",
            format!("{:.1}%", summary.pct_graph_yes),
        );
        metric(
            &mut cols[2],
            "% Estudiantes que usaron IA",
            format!("{:.1}%", summary.pct_ai_yes),
        );
    });
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn methodology_section(ui: &mut Ui, view: &ReportView) {
    ui.heading("🔍 Enfoque metodológico y gráfico");
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("1. Método de despeje logarítmico");
        plot::frequency_chart(&mut cols[0], "method_chart", &view.methods);
        cols[1].strong("2. Uso y aplicación de la gráfica");
        plot::frequency_chart(&mut cols[1], "graph_usage_chart", &view.graph_usage);
    });
}

fn ai_section(ui: &mut Ui, view: &ReportView) {
    ui.heading("🤖 Análisis del uso y dificultades de la IA");
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Distribución general de notas");
        plot::score_histogram(&mut cols[0], &view.histogram);
        cols[1].strong("Nivel de uso de la IA");
        plot::frequency_chart(&mut cols[1], "ai_usage_chart", &view.ai_usage);
    });

    ui.add_space(8.0);
    ui.strong("Resumen de desventajas y dificultades al usar la IA");
    if !view.has_ai_users {
        ui.label("No hay datos de estudiantes que reportaron haber usado la IA en este grupo.");
    } else if view.ai_comments.is_empty() {
        ui.label("Los estudiantes que usaron IA no tienen comentarios registrados.");
    } else {
        ai_comments_table(ui, &view.ai_comments);
    }
}

fn ai_comments_table(ui: &mut Ui, comments: &[AiComment]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .column(Column::auto().at_least(160.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::remainder())
        .header(22.0, |mut header| {
            header.col(|ui| {
                ui.strong("Estudiante");
            });
            header.col(|ui| {
                ui.strong("Nivel de uso");
            });
            header.col(|ui| {
                ui.strong("Comentarios sobre uso de IA");
            });
        })
        .body(|mut body| {
            for comment in comments {
                body.row(20.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&comment.name);
                    });
                    row.col(|ui| {
                        ui.label(comment.level.label());
                    });
                    row.col(|ui| {
                        ui.add(Label::new(&comment.comment).truncate())
                            .on_hover_text(&comment.comment);
                    });
                });
            }
        });
}

fn feedback_section(ui: &mut Ui, view: &ReportView, selected: &mut Option<String>) {
    ui.heading("👤 Retroalimentación individual y calificación");

    egui::ComboBox::from_label("Seleccione el estudiante para ver la retroalimentación")
        .selected_text(selected.clone().unwrap_or_default())
        .show_ui(ui, |ui: &mut Ui| {
            for name in &view.student_names {
                ui.selectable_value(selected, Some(name.clone()), name);
            }
        });

    let Some(student) = selected.as_deref().and_then(|name| view.student(name)) else {
        return;
    };

    ui.add_space(6.0);
    ui.strong(format!("Resultados de {}", student.name));
    ui.columns(2, |cols: &mut [Ui]| {
        score_and_link(&mut cols[0], &student);
        explanations(&mut cols[1], &student);
    });
}

fn score_and_link(ui: &mut Ui, student: &StudentFeedback) {
    metric(ui, "Nota Final", student.final_score.to_string());
    ui.add_space(6.0);
    match &student.link {
        FeedbackLink::Hyperlink(url) => {
            ui.hyperlink_to("📄 Ver retroalimentación", url);
        }
        FeedbackLink::DocumentReference(text) => {
            ui.label(format!("📄 Documento: {text}"));
        }
        FeedbackLink::Empty => {
            ui.label(
                RichText::new("⚠ Link de retroalimentación no disponible").color(Color32::YELLOW),
            );
        }
    }
}

fn explanations(ui: &mut Ui, student: &StudentFeedback) {
    let entries = [
        (
            "Despeje Logarítmico",
            student.method.as_deref(),
            student.explanation_method.as_deref(),
        ),
        (
            "Uso Gráfico",
            student.graph_usage.as_ref().map(Usage::label),
            student.explanation_graph.as_deref(),
        ),
        (
            "Uso de IA",
            student.ai_usage.as_ref().map(Usage::label),
            student.explanation_ai.as_deref(),
        ),
    ];
    for (title, answer, explanation) in entries {
        ui.strong(format!("{title} ({}):", answer.unwrap_or("—")));
        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.label(explanation.unwrap_or("—"));
        });
        ui.add_space(4.0);
    }
}
