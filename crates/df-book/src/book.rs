//! Book: append-only record of one finalized spin

use serde::{Deserialize, Serialize};

use crate::event::Event;

/// An event with its position in the book.
///
/// The index is assigned at append time and is part of the wire format, so
/// replays can reference events by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEvent {
    pub index: u32,
    #[serde(flatten)]
    pub event: Event,
}

/// The finalized record of one logical spin (base spin plus any nested
/// free-spin run).
///
/// A book is only ever produced for an *accepted* attempt of the rejection
/// loop; rejected attempts leave no trace beyond `accepted_attempt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Request seed this book was produced from
    pub id: u64,
    /// Name of the distribution criterion the spin satisfied
    pub criterion: String,
    /// Zero-based rejection-loop attempt that was accepted
    pub accepted_attempt: u32,
    /// Ordered event log
    pub events: Vec<BookEvent>,
    /// Final win in bet multiples, capped at the configured win cap
    pub final_win: f64,
    /// Win accumulated in the base game portion
    pub base_game_win: f64,
    /// Win accumulated in the free game portion
    pub free_game_win: f64,
    /// Whether a free-spin run was entered
    pub triggered_freegame: bool,
    /// Whether the win cap was hit
    pub wincap_hit: bool,
}

impl Book {
    /// Start an empty book for one spin attempt.
    pub fn new(id: u64, criterion: impl Into<String>) -> Self {
        Self {
            id,
            criterion: criterion.into(),
            accepted_attempt: 0,
            events: Vec::new(),
            final_win: 0.0,
            base_game_win: 0.0,
            free_game_win: 0.0,
            triggered_freegame: false,
            wincap_hit: false,
        }
    }

    /// Append an event, assigning the next index.
    pub fn record(&mut self, event: Event) -> u32 {
        let index = self.events.len() as u32;
        self.events.push(BookEvent { index, event });
        index
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate events of one tag, in order.
    pub fn events_of(&self, type_name: &str) -> impl Iterator<Item = &BookEvent> {
        self.events
            .iter()
            .filter(move |e| e.event.type_name() == type_name)
    }
}
