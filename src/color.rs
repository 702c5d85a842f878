use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::BechdelScore;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` colours with hues spread from red towards blue, so that
/// neighbouring scores get neighbouring colours.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let span = 240.0;
    (0..n)
        .map(|i| {
            let hue = if n == 1 {
                0.0
            } else {
                (i as f32 / (n - 1) as f32) * span
            };
            let hsl = Hsl::new(hue, 0.75, 0.55);
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
// Color mapping: Bechdel score → Color32
// ---------------------------------------------------------------------------

/// Maps each Bechdel score to a distinct colour, shared by every chart.
#[derive(Debug, Clone)]
pub struct ScoreColors {
    mapping: BTreeMap<BechdelScore, Color32>,
    default_color: Color32,
}

impl Default for ScoreColors {
    fn default() -> Self {
        let palette = generate_palette(BechdelScore::ALL.len());
        let mapping = BechdelScore::ALL.into_iter().zip(palette).collect();
        ScoreColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }
}

impl ScoreColors {
    /// Look up the colour for a score.
    pub fn color_for(&self, score: BechdelScore) -> Color32 {
        self.mapping
            .get(&score)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn palette_sizes() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(1).len(), 1);
        assert_eq!(generate_palette(4).len(), 4);
    }

    #[test]
    fn every_score_has_its_own_colour() {
        let colors = ScoreColors::default();
        let seen: BTreeSet<[u8; 3]> = BechdelScore::ALL
            .iter()
            .map(|&s| colors.color_for(s))
            .inspect(|c| assert_ne!(*c, Color32::GRAY))
            .map(|c| [c.r(), c.g(), c.b()])
            .collect();
        assert_eq!(seen.len(), 4);
    }
}
