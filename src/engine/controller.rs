//! Round acquisition and the reveal/advance card state machine.
//!
//! A round tries up to `max_trials` random ids. A trial is abandoned when the
//! record cannot be fetched or has no image; the species lookup only happens
//! once an image is known to exist. Everything shown on reveal is captured
//! during the round, so revealing never touches the network.
//!
//! Rounds are tagged with a generation. Starting a round bumps it, and a
//! result that comes back for an older generation is dropped.

use std::sync::Arc;

use crate::engine::data_client::CreatureApi;
use crate::engine::error::TrialError;
use crate::engine::selector::IdSelector;
use crate::model::quiz_state::{CardPhase, CounterSnapshot, QuizState, RevealedAnswer};
use crate::store::counters::{CounterStore, QUIZZES, VISITS};

pub const LOAD_FAILURE_TEXT: &str = "画像を取得できませんでした";
pub const NAME_FALLBACK_TEXT: &str = "名前取得に失敗";

/// The rendering surface the controller writes into.
pub trait QuizView: Send {
    fn clear_answer(&mut self);
    fn show_sprite(&mut self, url: &str, alt: &str);
    fn show_load_failure(&mut self, message: &str);
    fn show_answer(&mut self, answer: &RevealedAnswer);
    fn show_counters(&mut self, counters: CounterSnapshot);
}

pub fn sprite_alt_text(display_name: &str) -> String {
    format!("ランダムなポケモン ({display_name})")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTicket {
    generation: u64,
}

impl RoundTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRound {
    pub id: u32,
    pub sprite_url: String,
    pub display_name: String,
    pub primary_type: Option<String>,
    pub all_types: Vec<String>,
    pub strength_score: u32,
}

#[derive(Debug)]
pub enum RoundOutcome {
    Ready(LoadedRound),
    Exhausted { failures: Vec<TrialError> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Committed { id: u32 },
    Failed,
    /// A newer round started before this one finished.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Revealed(RevealedAnswer),
    /// A new round has begun; finish it with the ticket.
    Advancing(RoundTicket),
}

/// Everything needed to run a round's trials, detached from the controller
/// so it can run on another thread.
#[derive(Clone)]
pub struct RoundAcquirer {
    api: Arc<dyn CreatureApi>,
    selector: Arc<dyn IdSelector>,
    max_trials: usize,
    language: String,
}

impl RoundAcquirer {
    pub fn new(
        api: Arc<dyn CreatureApi>,
        selector: Arc<dyn IdSelector>,
        max_trials: usize,
        language: &str,
    ) -> Self {
        Self {
            api,
            selector,
            max_trials,
            language: language.to_string(),
        }
    }

    pub fn acquire(&self) -> RoundOutcome {
        let mut failures = Vec::new();

        for trial in 1..=self.max_trials {
            let id = self.selector.next_id();
            match self.try_id(id) {
                Ok(round) => {
                    tracing::debug!(trial, id, "Round acquired");
                    return RoundOutcome::Ready(round);
                }
                Err(e) => {
                    tracing::debug!(trial, id, error = %e, "Trial abandoned");
                    failures.push(e);
                }
            }
        }

        tracing::warn!(trials = self.max_trials, "Every trial failed, giving up on this round");
        RoundOutcome::Exhausted { failures }
    }

    pub fn try_id(&self, id: u32) -> Result<LoadedRound, TrialError> {
        let creature = self.api.fetch_primary(id)?;
        let Some(sprite_url) = creature.sprite_url.clone() else {
            return Err(TrialError::NoImageAvailable(id));
        };
        let species = self.api.fetch_localized(id)?;

        Ok(LoadedRound {
            id,
            sprite_url,
            display_name: species.display_name(&self.language).to_string(),
            primary_type: creature.primary_type().map(str::to_string),
            all_types: creature.types.clone(),
            strength_score: creature.strength_score(),
        })
    }
}

pub struct QuizController {
    state: QuizState,
    generation: u64,
    acquirer: RoundAcquirer,
    counters: CounterStore,
    view: Box<dyn QuizView>,
}

impl QuizController {
    pub fn new(acquirer: RoundAcquirer, counters: CounterStore, view: Box<dyn QuizView>) -> Self {
        Self {
            state: QuizState::default(),
            generation: 0,
            acquirer,
            counters,
            view,
        }
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn acquirer(&self) -> RoundAcquirer {
        self.acquirer.clone()
    }

    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    pub fn record_visit(&mut self) -> u64 {
        let visits = self.counters.increment(VISITS);
        self.view.show_counters(self.counters.snapshot());
        visits
    }

    /// Reset to a fresh hidden card and invalidate any round in flight.
    pub fn begin_round(&mut self) -> RoundTicket {
        self.generation += 1;
        self.state = QuizState::default();
        self.view.clear_answer();
        RoundTicket {
            generation: self.generation,
        }
    }

    pub fn finish_round(&mut self, ticket: RoundTicket, outcome: RoundOutcome) -> RoundStatus {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Dropping result of superseded round"
            );
            return RoundStatus::Stale;
        }

        match outcome {
            RoundOutcome::Ready(round) => {
                let id = round.id;
                // A reveal made while loading must not outlive the commit.
                self.view.clear_answer();
                self.view
                    .show_sprite(&round.sprite_url, &sprite_alt_text(&round.display_name));
                self.state = QuizState {
                    current_id: Some(round.id),
                    revealed: false,
                    sprite_url: Some(round.sprite_url),
                    primary_type: round.primary_type,
                    all_types: round.all_types,
                    strength_score: Some(round.strength_score),
                    localized_name: Some(round.display_name),
                };
                self.counters.increment(QUIZZES);
                self.view.show_counters(self.counters.snapshot());
                RoundStatus::Committed { id }
            }
            RoundOutcome::Exhausted { .. } => {
                self.view.show_load_failure(LOAD_FAILURE_TEXT);
                RoundStatus::Failed
            }
        }
    }

    /// Run the trials for `ticket` on the calling thread.
    pub fn complete(&mut self, ticket: RoundTicket) -> RoundStatus {
        let outcome = self.acquirer.acquire();
        self.finish_round(ticket, outcome)
    }

    pub fn load_round(&mut self) -> RoundStatus {
        let ticket = self.begin_round();
        self.complete(ticket)
    }

    pub fn reveal_or_advance(&mut self) -> Transition {
        match self.state.phase() {
            CardPhase::Hidden => {
                let answer = RevealedAnswer {
                    display_name: self
                        .state
                        .localized_name
                        .clone()
                        .unwrap_or_else(|| NAME_FALLBACK_TEXT.to_string()),
                    types: self.state.all_types.clone(),
                    strength_score: self.state.strength_score,
                };
                self.state.revealed = true;
                self.view.show_answer(&answer);
                Transition::Revealed(answer)
            }
            CardPhase::Revealed => Transition::Advancing(self.begin_round()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::engine::error::FetchError;
    use crate::model::creature::{BaseStat, CreatureRecord, LocalizedName, SpeciesRecord};
    use crate::store::kv::MemoryStore;

    struct FixedIds(Mutex<Vec<u32>>);

    impl IdSelector for FixedIds {
        fn next_id(&self) -> u32 {
            let mut ids = self.0.lock().unwrap();
            if ids.len() > 1 {
                ids.remove(0)
            } else {
                ids[0]
            }
        }
    }

    #[derive(Default)]
    struct FakeApi {
        creatures: HashMap<u32, CreatureRecord>,
        species_calls: AtomicUsize,
    }

    impl FakeApi {
        fn with(mut self, id: u32, sprite: Option<&str>) -> Self {
            self.creatures.insert(
                id,
                CreatureRecord {
                    id,
                    name: format!("mon-{id}"),
                    sprite_url: sprite.map(str::to_string),
                    types: vec!["grass".into(), "poison".into()],
                    stats: vec![
                        BaseStat { name: "hp".into(), base_value: 45 },
                        BaseStat { name: "attack".into(), base_value: 49 },
                    ],
                },
            );
            self
        }
    }

    impl CreatureApi for FakeApi {
        fn fetch_primary(&self, id: u32) -> Result<CreatureRecord, FetchError> {
            self.creatures.get(&id).cloned().ok_or(FetchError::NotFound {
                resource: "pokemon",
                id,
                status: 404,
            })
        }

        fn fetch_localized(&self, id: u32) -> Result<SpeciesRecord, FetchError> {
            self.species_calls.fetch_add(1, Ordering::SeqCst);
            Ok(SpeciesRecord {
                canonical_name: format!("mon-{id}"),
                localized_names: vec![LocalizedName {
                    language: "ja-Hrkt".into(),
                    name: "フシギダネ".into(),
                }],
            })
        }
    }

    struct NullView;

    impl QuizView for NullView {
        fn clear_answer(&mut self) {}
        fn show_sprite(&mut self, _: &str, _: &str) {}
        fn show_load_failure(&mut self, _: &str) {}
        fn show_answer(&mut self, _: &RevealedAnswer) {}
        fn show_counters(&mut self, _: CounterSnapshot) {}
    }

    fn controller(api: Arc<FakeApi>, ids: Vec<u32>) -> QuizController {
        let acquirer = RoundAcquirer::new(api, Arc::new(FixedIds(Mutex::new(ids))), 5, "ja-Hrkt");
        QuizController::new(
            acquirer,
            CounterStore::new(Box::new(MemoryStore::new())),
            Box::new(NullView),
        )
    }

    #[test]
    fn missing_image_skips_species_lookup() {
        let api = Arc::new(FakeApi::default().with(1, None).with(2, Some("https://img/2.png")));
        let mut quiz = controller(api.clone(), vec![1, 2]);

        assert_eq!(quiz.load_round(), RoundStatus::Committed { id: 2 });
        assert_eq!(api.species_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn committed_round_captures_answer() {
        let api = Arc::new(FakeApi::default().with(1, Some("https://img/1.png")));
        let mut quiz = controller(api, vec![1]);

        quiz.load_round();
        let state = quiz.state();
        assert_eq!(state.current_id, Some(1));
        assert_eq!(state.primary_type.as_deref(), Some("grass"));
        assert_eq!(state.all_types.len(), 2);
        assert_eq!(state.strength_score, Some(94));
        assert_eq!(state.localized_name.as_deref(), Some("フシギダネ"));
        assert!(!state.revealed);
    }

    #[test]
    fn stale_round_is_dropped() {
        let api = Arc::new(FakeApi::default().with(1, Some("https://img/1.png")));
        let mut quiz = controller(api, vec![1]);

        let first = quiz.begin_round();
        let second = quiz.begin_round();
        let outcome = quiz.acquirer().acquire();

        assert_eq!(quiz.finish_round(first, outcome), RoundStatus::Stale);
        assert!(quiz.state().current_id.is_none());
        assert_eq!(quiz.counters().quizzes, 0);

        assert_eq!(quiz.complete(second), RoundStatus::Committed { id: 1 });
        assert_eq!(quiz.counters().quizzes, 1);
    }

    #[test]
    fn reveal_without_round_uses_fallback_name() {
        let api = Arc::new(FakeApi::default());
        let mut quiz = controller(api, vec![9]);

        assert_eq!(quiz.load_round(), RoundStatus::Failed);
        match quiz.reveal_or_advance() {
            Transition::Revealed(answer) => {
                assert_eq!(answer.display_name, NAME_FALLBACK_TEXT);
                assert!(answer.types.is_empty());
                assert_eq!(answer.strength_score, None);
            }
            other => panic!("expected reveal, got {other:?}"),
        }
    }
}
