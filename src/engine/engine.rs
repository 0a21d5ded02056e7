use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::engine::controller::{QuizController, QuizView, RoundAcquirer, RoundOutcome, RoundStatus, RoundTicket, Transition};
use crate::engine::data_client::{http_client, CreatureApi, PokeApiClient};
use crate::engine::icons::icons_for_creature;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::selector::RandomSelector;
use crate::engine::sprite::load_sprite;
use crate::model::quiz_state::{CounterSnapshot, RevealedAnswer};
use crate::store::counters::CounterStore;
use crate::store::kv::JsonFileStore;
use crate::worker::lifecycle::WorkerRegistration;
use crate::worker::network::{HttpNetwork, Network};
use crate::worker::storage::{CacheStorage, DiskCacheStorage, MemoryCacheStorage};

/// Forwards everything the controller renders to the UI thread.
pub struct ChannelView {
    tx: Sender<EngineResponse>,
}

impl ChannelView {
    pub fn new(tx: Sender<EngineResponse>) -> Self {
        Self { tx }
    }

    fn send(&self, resp: EngineResponse) {
        let _ = self.tx.send(resp);
    }
}

impl QuizView for ChannelView {
    fn clear_answer(&mut self) {
        self.send(EngineResponse::AnswerCleared);
    }

    fn show_sprite(&mut self, url: &str, alt: &str) {
        self.send(EngineResponse::SpriteShown {
            url: url.to_string(),
            alt: alt.to_string(),
        });
    }

    fn show_load_failure(&mut self, message: &str) {
        self.send(EngineResponse::LoadFailed(message.to_string()));
    }

    fn show_answer(&mut self, answer: &RevealedAnswer) {
        self.send(EngineResponse::AnswerRevealed(answer.clone()));
    }

    fn show_counters(&mut self, counters: CounterSnapshot) {
        self.send(EngineResponse::Counters(counters));
    }
}

/// Collaborators the engine drives, built once at startup.
pub struct EngineParts {
    pub controller: QuizController,
    pub api: Arc<dyn CreatureApi>,
    /// Route for every asset download, normally the worker registration.
    pub assets: Arc<dyn Network>,
    pub placeholder_url: Option<String>,
}

impl EngineParts {
    /// Wire the production stack: PokeAPI client, disk-backed asset cache
    /// worker, file-backed counters.
    pub fn from_config(config: &AppConfig, tx: Sender<EngineResponse>) -> anyhow::Result<Self> {
        let http = http_client()?;
        let api: Arc<dyn CreatureApi> = Arc::new(PokeApiClient::new(http.clone(), &config.api_base));
        let network: Arc<dyn Network> = Arc::new(HttpNetwork::new(http));

        let storage: Arc<dyn CacheStorage> = match DiskCacheStorage::open_default() {
            Ok(disk) => Arc::new(disk),
            Err(e) => {
                tracing::warn!(error = %e, "Asset cache directory unavailable, caching in memory");
                Arc::new(MemoryCacheStorage::new())
            }
        };
        let registration = Arc::new(WorkerRegistration::new(&config.asset_scope, storage, network)?);
        if let Err(e) = registration.register(config.cache.clone()) {
            tracing::debug!(error = %e, "Asset cache worker registration failed");
        }
        let placeholder_url = registration.resolve(&config.cache.entry_point).ok();

        let acquirer = RoundAcquirer::new(
            api.clone(),
            Arc::new(RandomSelector::new(config.max_id)),
            config.max_trials,
            &config.preferred_language,
        );
        let controller = QuizController::new(
            acquirer,
            CounterStore::new(Box::new(JsonFileStore::open_default())),
            Box::new(ChannelView::new(tx)),
        );

        Ok(Self {
            controller,
            api,
            assets: registration,
            placeholder_url,
        })
    }
}

pub struct Engine {
    rx: Receiver<EngineCommand>,
    loopback: Sender<EngineCommand>,
    tx: Sender<EngineResponse>,
    controller: QuizController,
    api: Arc<dyn CreatureApi>,
    assets: Arc<dyn Network>,
    placeholder_url: Option<String>,
}

impl Engine {
    /// `loopback` must feed the same channel as `rx`; finished rounds come
    /// back through it.
    pub fn new(
        rx: Receiver<EngineCommand>,
        loopback: Sender<EngineCommand>,
        tx: Sender<EngineResponse>,
        parts: EngineParts,
    ) -> Self {
        Self {
            rx,
            loopback,
            tx,
            controller: parts.controller,
            api: parts.api,
            assets: parts.assets,
            placeholder_url: parts.placeholder_url,
        }
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::Start => {
                    self.controller.record_visit();
                    self.load_placeholder();
                    let ticket = self.controller.begin_round();
                    self.spawn_round(ticket);
                }

                EngineCommand::RevealOrAdvance => match self.controller.reveal_or_advance() {
                    Transition::Revealed(_) => {}
                    Transition::Advancing(ticket) => self.spawn_round(ticket),
                },

                EngineCommand::RoundAcquired {
                    ticket,
                    outcome,
                    sprite,
                } => {
                    let status = self.controller.finish_round(ticket, outcome);
                    if let (RoundStatus::Committed { .. }, Some(sprite)) = (status, sprite) {
                        let _ = self.tx.send(EngineResponse::SpriteLoaded(sprite));
                    }
                }

                EngineCommand::ExportIcons(dir) => self.export_icons(dir),
            }
        }
    }

    /// Run the round's trials off the engine thread and post the result back.
    fn spawn_round(&self, ticket: RoundTicket) {
        let acquirer = self.controller.acquirer();
        let assets = self.assets.clone();
        let loopback = self.loopback.clone();

        std::thread::spawn(move || {
            let outcome = acquirer.acquire();
            let sprite = match &outcome {
                RoundOutcome::Ready(round) => match load_sprite(assets.as_ref(), &round.sprite_url) {
                    Ok(sprite) => Some(sprite),
                    Err(e) => {
                        tracing::warn!(url = %round.sprite_url, error = %e, "Sprite could not be loaded");
                        None
                    }
                },
                RoundOutcome::Exhausted { .. } => None,
            };
            let _ = loopback.send(EngineCommand::RoundAcquired {
                ticket,
                outcome,
                sprite,
            });
        });
    }

    fn load_placeholder(&self) {
        let Some(url) = self.placeholder_url.clone() else {
            return;
        };
        let assets = self.assets.clone();
        let tx = self.tx.clone();

        std::thread::spawn(move || match load_sprite(assets.as_ref(), &url) {
            Ok(sprite) => {
                let _ = tx.send(EngineResponse::PlaceholderLoaded(sprite));
            }
            Err(e) => tracing::debug!(url = %url, error = %e, "Placeholder art unavailable"),
        });
    }

    fn export_icons(&self, dir: PathBuf) {
        let Some(id) = self.controller.state().current_id else {
            let _ = self
                .tx
                .send(EngineResponse::IconsExported(Err("No creature on the card yet".into())));
            return;
        };
        let api = self.api.clone();
        let assets = self.assets.clone();
        let tx = self.tx.clone();

        std::thread::spawn(move || {
            let result = icons_for_creature(api.as_ref(), assets.as_ref(), id, &dir)
                .map_err(|e| format!("{e:#}"));
            if let Err(e) = &result {
                tracing::warn!(id, error = %e, "Icon export failed");
            }
            let _ = tx.send(EngineResponse::IconsExported(result));
        });
    }
}
