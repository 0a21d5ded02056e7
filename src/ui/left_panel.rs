use eframe::egui;
use std::sync::mpsc::Sender;

use crate::engine::protocol::EngineCommand;
use crate::ui::app::{LeftTab, UiState};
use crate::ui::settings::UiSettings;

/// Returns true when a setting changed and should be saved.
pub fn draw_left_panel(
    ctx: &egui::Context,
    ui_state: &mut UiState,
    settings: &mut UiSettings,
    cmd_tx: &Sender<EngineCommand>,
) -> bool {
    let mut changed = false;

    egui::SidePanel::left("left")
        .resizable(false)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut ui_state.left_tab, LeftTab::Stats, "Stats");
                ui.selectable_value(&mut ui_state.left_tab, LeftTab::Settings, "Settings");
            });

            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| match ui_state.left_tab {
                LeftTab::Stats => draw_stats(ui, ui_state, cmd_tx),
                LeftTab::Settings => changed = draw_settings(ui, settings),
            });
        });

    changed
}

fn draw_stats(ui: &mut egui::Ui, ui_state: &mut UiState, cmd_tx: &Sender<EngineCommand>) {
    ui.label(format!("訪問回数: {}", ui_state.counters.visits));
    ui.label(format!("クイズ回数: {}", ui_state.counters.quizzes));

    ui.separator();

    if ui.button("Save as app icons…").clicked() {
        if let Some(dir) = rfd::FileDialog::new()
            .set_title("Choose a folder for icon-192.png and icon-512.png")
            .pick_folder()
        {
            let _ = cmd_tx.send(EngineCommand::ExportIcons(dir));
            ui_state.status = Some("Exporting icons…".into());
        }
    }

    if let Some(status) = &ui_state.status {
        ui.small(status);
    }
}

fn draw_settings(ui: &mut egui::Ui, settings: &mut UiSettings) -> bool {
    let mut changed = false;

    ui.label("UI Scale");
    changed |= ui
        .add(egui::Slider::new(&mut settings.ui_scale, 0.75..=2.0))
        .changed();

    ui.collapsing("Badge colors", |ui| {
        for kind in settings.badge_kinds() {
            let mut color = settings.badge_color(&kind);
            ui.horizontal(|ui| {
                if ui.color_edit_button_srgba(&mut color).changed() {
                    settings.set_badge_color(&kind, color);
                    changed = true;
                }
                ui.label(&kind);
            });
        }
    });

    if ui.button("Reset").clicked() {
        *settings = UiSettings::default();
        changed = true;
    }

    changed
}
