use crate::model::quiz_state::CounterSnapshot;
use crate::store::kv::KeyValueStore;

pub const VISITS: &str = "visits";
pub const QUIZZES: &str = "quizzes";

/// Monotonic counters kept in a [`KeyValueStore`]. Durability is best-effort:
/// a rejected write is logged and the incremented value is still returned.
pub struct CounterStore {
    store: Box<dyn KeyValueStore>,
}

impl CounterStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Missing, unparsable and negative values all read as 0.
    pub fn get(&self, key: &str) -> u64 {
        self.store
            .get(key)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|v| *v >= 0)
            .map(|v| v as u64)
            .unwrap_or(0)
    }

    pub fn increment(&mut self, key: &str) -> u64 {
        let next = self.get(key).saturating_add(1);
        if let Err(e) = self.store.set(key, &next.to_string()) {
            tracing::debug!(key, error = %e, "Counter not persisted");
        }
        next
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            visits: self.get(VISITS),
            quizzes: self.get(QUIZZES),
        }
    }
}
