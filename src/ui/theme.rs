// CobbleLog - ui/theme.rs
//
// Colour scheme, visuals setup, and layout constants.
// No dependencies on app state or business logic.

use egui::{Color32, TextStyle};

/// Destructive action (Delete button, failed status).
pub const DANGER: Color32 = Color32::from_rgb(220, 38, 38); // Red 600

/// Warning text (malformed rows, warnings list).
pub const WARNING: Color32 = Color32::from_rgb(253, 186, 116); // Orange 300

/// Layout constants.
pub const ROW_HEIGHT: f32 = 22.0;
pub const ACTIONS_COLUMN_WIDTH: f32 = 110.0;
pub const SEARCH_BOX_WIDTH: f32 = 320.0;

/// Data column widths, in `CSV_HEADERS` order.
pub const COLUMN_WIDTHS: [f32; 10] = [
    150.0, 150.0, 110.0, 70.0, 90.0, 90.0, 90.0, 90.0, 90.0, 220.0,
];

/// Apply dark/light visuals and the configured body font size.
pub fn apply(ctx: &egui::Context, dark_mode: bool, font_size: f32) {
    ctx.set_visuals(if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });

    ctx.style_mut(|style| {
        for text_style in [TextStyle::Body, TextStyle::Button, TextStyle::Monospace] {
            if let Some(font) = style.text_styles.get_mut(&text_style) {
                font.size = font_size;
            }
        }
    });
}
