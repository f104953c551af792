use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

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
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Diverging scale for correlations
// ---------------------------------------------------------------------------

/// Colour for a correlation coefficient: blue at −1, white at 0, red at +1.
/// `NaN` (undefined correlation) is grey.
pub fn diverging(r: f64) -> Color32 {
    if r.is_nan() {
        return Color32::GRAY;
    }
    let t = r.clamp(-1.0, 1.0) as f32;
    let white = LinSrgb::new(1.0, 1.0, 1.0);
    let end = if t < 0.0 {
        LinSrgb::new(0.02, 0.12, 0.60)
    } else {
        LinSrgb::new(0.70, 0.02, 0.03)
    };
    let rgb: Srgb = white.mix(end, t.abs()).into_color();
    to_color32(rgb)
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the values of the selected category column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: HashMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the category values, in display order.
    pub fn new(categories: &[String]) -> Self {
        let palette = generate_palette(categories.len());
        let mapping = categories.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given category value.
    pub fn color_for(&self, category: &str) -> Color32 {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let colors = generate_palette(5);
        assert_eq!(colors.len(), 5);
        for (i, a) in colors.iter().enumerate() {
            assert!(colors[i + 1..].iter().all(|b| a != b));
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn diverging_endpoints() {
        assert_eq!(diverging(0.0), Color32::WHITE);
        assert_eq!(diverging(f64::NAN), Color32::GRAY);
        let pos = diverging(1.0);
        let neg = diverging(-1.0);
        assert!(pos.r() > pos.b());
        assert!(neg.b() > neg.r());
    }

    #[test]
    fn unknown_category_gets_default() {
        let map = ColorMap::new(&["A".to_string(), "B".to_string()]);
        assert_ne!(map.color_for("A"), map.color_for("B"));
        assert_eq!(map.color_for("Z"), Color32::GRAY);
    }
}
