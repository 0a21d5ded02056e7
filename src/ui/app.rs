use eframe::egui;
use std::sync::mpsc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::engine::controller::LOAD_FAILURE_TEXT;
use crate::engine::engine::{Engine, EngineParts};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::sprite::SpriteImage;
use crate::model::quiz_state::{CounterSnapshot, RevealedAnswer};
use crate::ui::card::draw_card;
use crate::ui::left_panel::draw_left_panel;
use crate::ui::settings::UiSettings;
use crate::ui::settings_io::{load_settings, save_settings};

/* =========================
   Tabs
   ========================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeftTab {
    #[default]
    Stats,
    Settings,
}

/* =========================
   UI State
   ========================= */

#[derive(Default)]
pub struct UiState {
    pub sprite: Option<egui::TextureHandle>,
    pub placeholder: Option<egui::TextureHandle>,
    pub sprite_alt: String,
    pub answer: Option<RevealedAnswer>,
    pub failure: Option<String>,
    pub counters: CounterSnapshot,
    pub loading: bool,
    pub status: Option<String>,
    pub left_tab: LeftTab,
}

/* =========================
   App
   ========================= */

pub struct QuizApp {
    ui: UiState,
    settings: UiSettings,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
}

impl QuizApp {
    pub fn new(config: AppConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let loopback = cmd_tx.clone();

        std::thread::spawn(move || match EngineParts::from_config(&config, resp_tx.clone()) {
            Ok(parts) => {
                let mut engine = Engine::new(cmd_rx, loopback, resp_tx, parts);
                engine.run();
            }
            Err(e) => {
                tracing::error!(error = %e, "Engine failed to start");
                let _ = resp_tx.send(EngineResponse::LoadFailed(LOAD_FAILURE_TEXT.into()));
            }
        });

        let _ = cmd_tx.send(EngineCommand::Start);

        Self {
            ui: UiState {
                loading: true,
                ..Default::default()
            },
            settings: load_settings(),
            cmd_tx,
            resp_rx,
        }
    }

    pub fn send_command(&self, cmd: EngineCommand) {
        let _ = self.cmd_tx.send(cmd);
    }

    fn apply_response(&mut self, ctx: &egui::Context, resp: EngineResponse) {
        match resp {
            EngineResponse::AnswerCleared => {
                self.ui.answer = None;
                self.ui.failure = None;
                self.ui.loading = true;
            }
            EngineResponse::SpriteShown { alt, .. } => {
                self.ui.sprite = None;
                self.ui.sprite_alt = alt;
                self.ui.failure = None;
                self.ui.loading = false;
            }
            EngineResponse::SpriteLoaded(image) => {
                self.ui.sprite = Some(texture(ctx, "sprite", &image));
            }
            EngineResponse::PlaceholderLoaded(image) => {
                self.ui.placeholder = Some(texture(ctx, "placeholder", &image));
            }
            EngineResponse::LoadFailed(message) => {
                self.ui.sprite = None;
                self.ui.sprite_alt.clear();
                self.ui.failure = Some(message);
                self.ui.loading = false;
            }
            EngineResponse::AnswerRevealed(answer) => {
                self.ui.answer = Some(answer);
            }
            EngineResponse::Counters(counters) => {
                self.ui.counters = counters;
            }
            EngineResponse::IconsExported(result) => {
                self.ui.status = Some(match result {
                    Ok(paths) => format!("Saved {} icons", paths.len()),
                    Err(e) => format!("Icon export failed: {e}"),
                });
            }
        }
    }
}

fn texture(ctx: &egui::Context, name: &str, image: &SpriteImage) -> egui::TextureHandle {
    let color = egui::ColorImage::from_rgba_unmultiplied(
        [image.width as usize, image.height as usize],
        &image.rgba,
    );
    ctx.load_texture(name, color, egui::TextureOptions::LINEAR)
}

/* =========================
   egui App
   ========================= */

impl eframe::App for QuizApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        while let Ok(resp) = self.resp_rx.try_recv() {
            self.apply_response(ctx, resp);
        }

        /* LEFT PANEL */
        if draw_left_panel(ctx, &mut self.ui, &mut self.settings, &self.cmd_tx) {
            save_settings(&self.settings);
        }

        /* CENTER */
        let mut activated = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                activated = draw_card(ui, &self.ui, &self.settings);
                ui.add_space(8.0);
                ui.weak("Click, Enter or Space: reveal / next");
            });
        });

        if !ctx.wants_keyboard_input()
            && ctx.input(|i| i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Space))
        {
            activated = true;
        }

        if activated {
            self.send_command(EngineCommand::RevealOrAdvance);
        }

        // Engine responses arrive on another thread.
        ctx.request_repaint_after(Duration::from_millis(150));
    }
}
