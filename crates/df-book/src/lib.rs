//! # df-book: spin books and the canonical event language
//!
//! A *book* is the finalized record of one logical spin: an append-only,
//! ordered event log plus the aggregate outcome (final win, free-game entry,
//! win-cap flag). Downstream tooling never inspects engine internals, only
//! books.
//!
//! ## Architecture
//!
//! ```text
//! GameEngine (df-engine)
//!     │  emits
//!     v
//! Event ──> Book (ordered, indexed event log + totals)
//!     │
//!     v
//! JSON (serde) for persisted books / analytics
//! ```

pub mod book;
pub mod event;

pub use book::*;
pub use event::*;
