// Scripted collaborators shared by the integration tests. Nothing here
// touches the live network.
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use image::{ImageFormat, Rgba, RgbaImage};

use poke_rand::engine::controller::QuizView;
use poke_rand::engine::data_client::CreatureApi;
use poke_rand::engine::error::FetchError;
use poke_rand::engine::selector::IdSelector;
use poke_rand::model::creature::{BaseStat, CreatureRecord, LocalizedName, SpeciesRecord};
use poke_rand::model::quiz_state::{CounterSnapshot, RevealedAnswer};
use poke_rand::worker::error::WorkerError;
use poke_rand::worker::network::Network;
use poke_rand::worker::request::{AssetRequest, AssetResponse};

/* =========================
   Data API
   ========================= */

#[derive(Default)]
pub struct ScriptedApi {
    creatures: HashMap<u32, CreatureRecord>,
    kana: HashMap<u32, String>,
    pub primary_calls: AtomicUsize,
    pub species_calls: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// A creature with two types, three stats and an optional sprite.
    pub fn creature(mut self, id: u32, sprite: Option<&str>, kana: Option<&str>) -> Self {
        self.creatures.insert(
            id,
            CreatureRecord {
                id,
                name: format!("creature-{id}"),
                sprite_url: sprite.map(str::to_string),
                types: vec!["water".into(), "ice".into()],
                stats: vec![
                    BaseStat { name: "hp".into(), base_value: 130 },
                    BaseStat { name: "attack".into(), base_value: 85 },
                    BaseStat { name: "speed".into(), base_value: 60 },
                ],
            },
        );
        if let Some(kana) = kana {
            self.kana.insert(id, kana.to_string());
        }
        self
    }

    pub fn primary_calls(&self) -> usize {
        self.primary_calls.load(Ordering::SeqCst)
    }

    pub fn species_calls(&self) -> usize {
        self.species_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.primary_calls() + self.species_calls()
    }
}

impl CreatureApi for ScriptedApi {
    fn fetch_primary(&self, id: u32) -> Result<CreatureRecord, FetchError> {
        self.primary_calls.fetch_add(1, Ordering::SeqCst);
        self.creatures.get(&id).cloned().ok_or(FetchError::NotFound {
            resource: "pokemon",
            id,
            status: 404,
        })
    }

    fn fetch_localized(&self, id: u32) -> Result<SpeciesRecord, FetchError> {
        self.species_calls.fetch_add(1, Ordering::SeqCst);
        let localized_names = self
            .kana
            .get(&id)
            .map(|name| {
                vec![LocalizedName {
                    language: "ja-Hrkt".into(),
                    name: name.clone(),
                }]
            })
            .unwrap_or_default();
        Ok(SpeciesRecord {
            canonical_name: format!("creature-{id}"),
            localized_names,
        })
    }
}

/* =========================
   Selector
   ========================= */

/// Hands out ids in order, repeating the last one when exhausted.
pub struct SequenceSelector {
    ids: Mutex<Vec<u32>>,
    pub draws: AtomicUsize,
}

impl SequenceSelector {
    pub fn new(ids: &[u32]) -> Self {
        Self {
            ids: Mutex::new(ids.to_vec()),
            draws: AtomicUsize::new(0),
        }
    }
}

impl IdSelector for SequenceSelector {
    fn next_id(&self) -> u32 {
        let n = self.draws.fetch_add(1, Ordering::SeqCst);
        let ids = self.ids.lock().unwrap();
        ids[n.min(ids.len() - 1)]
    }
}

/* =========================
   View
   ========================= */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Cleared,
    Sprite { url: String, alt: String },
    Failure(String),
    Answer(RevealedAnswer),
    Counters(CounterSnapshot),
}

#[derive(Clone, Default)]
pub struct RecordingView {
    pub events: Arc<Mutex<Vec<ViewEvent>>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<ViewEvent> {
        self.events.lock().unwrap().last().cloned()
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl QuizView for RecordingView {
    fn clear_answer(&mut self) {
        self.push(ViewEvent::Cleared);
    }

    fn show_sprite(&mut self, url: &str, alt: &str) {
        self.push(ViewEvent::Sprite {
            url: url.into(),
            alt: alt.into(),
        });
    }

    fn show_load_failure(&mut self, message: &str) {
        self.push(ViewEvent::Failure(message.into()));
    }

    fn show_answer(&mut self, answer: &RevealedAnswer) {
        self.push(ViewEvent::Answer(answer.clone()));
    }

    fn show_counters(&mut self, counters: CounterSnapshot) {
        self.push(ViewEvent::Counters(counters));
    }
}

/* =========================
   Network
   ========================= */

#[derive(Default)]
pub struct FakeNetwork {
    bodies: Mutex<HashMap<String, Vec<u8>>>,
    pub offline: AtomicBool,
    pub calls: AtomicUsize,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(self, url: &str, body: &[u8]) -> Self {
        self.bodies.lock().unwrap().insert(url.to_string(), body.to_vec());
        self
    }

    pub fn set_body(&self, url: &str, body: &[u8]) {
        self.bodies.lock().unwrap().insert(url.to_string(), body.to_vec());
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Network for FakeNetwork {
    fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, WorkerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(WorkerError::Network {
                url: request.url.clone(),
                reason: "unreachable".into(),
            });
        }
        let body = self.bodies.lock().unwrap().get(&request.url).cloned();
        Ok(match body {
            Some(body) => AssetResponse {
                url: request.url.clone(),
                status: 200,
                content_type: None,
                body,
            },
            None => AssetResponse {
                url: request.url.clone(),
                status: 404,
                content_type: None,
                body: Vec::new(),
            },
        })
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::new();
    RgbaImage::from_pixel(width, height, Rgba([10, 200, 30, 255]))
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}
