//! # df-sim: batch simulation over the Duel at Dawn engine
//!
//! Drives `df-engine` across many seeds on a rayon pool: quota-driven
//! criterion assignment, order-preserving parallel execution, cooperative
//! cancellation, and session statistics over the finalized books.
//!
//! ## Architecture
//!
//! ```text
//! run_batch(engine, criteria, options)
//!     │
//!     ├── assign: quota → per-seed criterion (deterministic shuffle)
//!     ├── rayon pool: one engine.run_one_with_cancel per seed
//!     │       (shared AtomicBool trips on deadline)
//!     └── BatchReport { entries (input order), stats, unresolved }
//! ```

pub mod assign;
pub mod batch;
pub mod error;
pub mod stats;

pub use assign::*;
pub use batch::*;
pub use error::*;
pub use stats::*;
