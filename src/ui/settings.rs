use serde::{Deserialize, Serialize};
use egui::Color32;
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiSettings {
    pub ui_scale: f32,

    // Creature type → badge color
    pub badge_colors: HashMap<String, [u8; 4]>,
}

const TYPE_COLORS: [(&str, [u8; 3]); 18] = [
    ("normal", [168, 168, 120]),
    ("fire", [240, 128, 48]),
    ("water", [104, 144, 240]),
    ("electric", [248, 208, 48]),
    ("grass", [120, 200, 80]),
    ("ice", [152, 216, 216]),
    ("fighting", [192, 48, 40]),
    ("poison", [160, 64, 160]),
    ("ground", [224, 192, 104]),
    ("flying", [168, 144, 240]),
    ("psychic", [248, 88, 136]),
    ("bug", [168, 184, 32]),
    ("rock", [184, 160, 56]),
    ("ghost", [112, 88, 152]),
    ("dragon", [112, 56, 248]),
    ("dark", [112, 88, 72]),
    ("steel", [184, 184, 208]),
    ("fairy", [238, 153, 172]),
];

impl Default for UiSettings {
    fn default() -> Self {
        let badge_colors = TYPE_COLORS
            .iter()
            .map(|(name, [r, g, b])| (name.to_string(), [*r, *g, *b, 255]))
            .collect();

        Self {
            ui_scale: 1.0,
            badge_colors,
        }
    }
}

impl UiSettings {
    pub fn badge_color(&self, kind: &str) -> Color32 {
        self.badge_colors
            .get(kind)
            .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
            .unwrap_or(Color32::DARK_GRAY)
    }

    pub fn set_badge_color(&mut self, kind: &str, color: Color32) {
        self.badge_colors.insert(
            kind.to_string(),
            [color.r(), color.g(), color.b(), color.a()],
        );
    }

    /// Type names in a stable order for the settings panel.
    pub fn badge_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.badge_colors.keys().cloned().collect();
        kinds.sort();
        kinds
    }
}
