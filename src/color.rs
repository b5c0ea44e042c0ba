use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Usage;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Category colours: frequency-table label → Color32
// ---------------------------------------------------------------------------

/// Colours for the categories of one chart.
///
/// The usage answers keep fixed colours across charts and groups, so "Sí" is
/// always green; other labels get palette colours in the order given.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    mapping: HashMap<String, Color32>,
    default_color: Color32,
}

impl CategoryColors {
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), usage_color(label).unwrap_or(c)))
            .collect();

        CategoryColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

fn usage_color(label: &str) -> Option<Color32> {
    match Usage::normalize(label)? {
        Usage::Yes => Some(Color32::from_rgb(76, 175, 80)),
        Usage::No => Some(Color32::from_rgb(229, 83, 75)),
        Usage::Regular => Some(Color32::from_rgb(255, 183, 77)),
        Usage::Other(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn usage_answers_have_fixed_colors() {
        let a = CategoryColors::new(["Sí", "No"]);
        let b = CategoryColors::new(["Regular", "No", "Sí", "Otro"]);
        assert_eq!(a.color_for("Sí"), b.color_for("Sí"));
        assert_eq!(a.color_for("No"), b.color_for("No"));
        assert_eq!(a.color_for("desconocido"), Color32::GRAY);
    }
}
