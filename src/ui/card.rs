use eframe::egui;

use crate::ui::app::UiState;
use crate::ui::settings::UiSettings;

const ART_SIZE: f32 = 256.0;

/// Draws the quiz card. Returns true when the card was clicked.
pub fn draw_card(ui: &mut egui::Ui, state: &UiState, settings: &UiSettings) -> bool {
    let frame = egui::Frame::new()
        .fill(ui.visuals().extreme_bg_color)
        .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
        .corner_radius(egui::CornerRadius::same(12))
        .inner_margin(egui::Margin::same(16));

    let shown = frame.show(ui, |ui| {
        ui.set_width(ART_SIZE + 32.0);
        ui.vertical_centered(|ui| {
            match card_art(state) {
                Some(texture) => {
                    ui.add(egui::Image::new(texture).fit_to_exact_size(egui::vec2(ART_SIZE, ART_SIZE)));
                }
                None => {
                    ui.allocate_space(egui::vec2(ART_SIZE, ART_SIZE));
                }
            }

            if let Some(failure) = &state.failure {
                ui.colored_label(ui.visuals().error_fg_color, failure);
            } else if state.sprite.is_none() && !state.sprite_alt.is_empty() {
                ui.weak(&state.sprite_alt);
            }

            if state.loading {
                ui.spinner();
            }

            ui.add_space(8.0);

            match &state.answer {
                Some(answer) => {
                    ui.heading(&answer.display_name);

                    ui.horizontal_wrapped(|ui| {
                        for kind in &answer.types {
                            badge(ui, settings.badge_color(kind), kind);
                        }
                    });

                    if let Some(score) = answer.strength_score {
                        ui.label(format!("つよさ: {score}"));
                    }
                }
                None => {
                    ui.label(egui::RichText::new("？").size(32.0));
                }
            }
        });
    });

    shown
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
        .clicked()
}

/// Creature art once a round lands, placeholder art only while a round is
/// loading. A failed round shows no image.
pub fn card_art(state: &UiState) -> Option<&egui::TextureHandle> {
    if state.failure.is_some() {
        return None;
    }
    match &state.sprite {
        Some(sprite) => Some(sprite),
        None if state.loading => state.placeholder.as_ref(),
        None => None,
    }
}

fn badge(ui: &mut egui::Ui, color: egui::Color32, text: &str) {
    egui::Frame::new()
        .fill(color)
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::symmetric(10, 4))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).color(egui::Color32::WHITE));
        });
}
