use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::CategoryColors;
use crate::data::aggregate::HistogramBin;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Categorical bar chart
// ---------------------------------------------------------------------------

/// One bar per category, coloured and listed in the legend.
pub fn frequency_chart(ui: &mut Ui, id: &str, counts: &[(String, usize)]) {
    if counts.is_empty() {
        ui.weak("Sin respuestas registradas.");
        return;
    }
    let colors = CategoryColors::new(counts.iter().map(|(label, _)| label.as_str()));

    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .y_axis_label("Número de estudiantes")
        .show_x(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (i, (label, count)) in counts.iter().enumerate() {
                let bar = Bar::new(i as f64, *count as f64)
                    .width(0.7)
                    .name(format!("{label}: {count}"));
                let chart = BarChart::new(vec![bar])
                    .name(label)
                    .color(colors.color_for(label));
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Score histogram
// ---------------------------------------------------------------------------

pub fn score_histogram(ui: &mut Ui, bins: &[HistogramBin]) {
    let bars: Vec<Bar> = bins
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .name(format!("{:.2} – {:.2}", bin.lower, bin.upper))
        })
        .collect();

    Plot::new("score_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Nota Final")
        .y_axis_label("Número de estudiantes")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("Frecuencia de notas finales")
                    .color(Color32::from_rgb(99, 110, 250)),
            );
        });
}
