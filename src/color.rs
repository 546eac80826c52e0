use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use audio_catalog::data::CellValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// `n` distinct colours. Hues advance by the golden angle so neighbouring
/// categories stay far apart on the colour wheel.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    const GOLDEN_ANGLE: f32 = 137.507_77;

    (0..n)
        .map(|i| {
            let hue = (i as f32 * GOLDEN_ANGLE) % 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.65, 0.55).into_color();
            let [r, g, b] = [rgb.red, rgb.green, rgb.blue].map(|c| (c * 255.0).round() as u8);
            Color32::from_rgb(r, g, b)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a category column to distinct colours, so a
/// value keeps its colour while the filtered subset changes.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(unique_values: &BTreeSet<CellValue>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping = unique_values.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        let distinct: BTreeSet<[u8; 4]> = p.iter().map(|c| c.to_array()).collect();
        assert_eq!(distinct.len(), 5);
    }

    #[test]
    fn unknown_value_gets_default_colour() {
        let values: BTreeSet<CellValue> =
            ["ITE", "CIC"].iter().map(|s| CellValue::Text(s.to_string())).collect();
        let cm = ColorMap::new(&values);
        assert_ne!(cm.color_for(&CellValue::Text("ITE".into())), Color32::GRAY);
        assert_eq!(cm.color_for(&CellValue::Text("BTE".into())), Color32::GRAY);
    }
}
