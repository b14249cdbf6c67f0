//! # df-engine: constrained outcome sampling for Duel at Dawn
//!
//! Generates statistically valid spin outcomes ("books") for a 5×5 line slot
//! with stacked stochastic features, subject to externally supplied target
//! distributions. The core is the rejection-sampling control loop: a spin is
//! redrawn until it satisfies its distribution criterion, bounded by an
//! attempt/time guard so a misconfigured criterion surfaces as an error
//! instead of a hang.
//!
//! ## Architecture
//!
//! ```text
//! GameEngine::run_one(seed, criterion, bounds)
//!     │
//!     ├── Board draw (reel set by mode, attributes by criterion tables)
//!     ├── Feature resolution (duel → outlaw → expanding wilds)
//!     ├── Line evaluation (pure, over the finished board)
//!     ├── Free-spin run (variant per criterion, retriggers, win cap)
//!     └── Criterion check → accept, or reset and retry
//!           │
//!           v
//!     Book (df-book) | CriterionUnreachable
//! ```

pub mod board;
pub mod config;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod features;
pub mod freespins;
pub mod lines;
pub mod reels;
pub mod sampler;
pub mod symbols;

pub use board::*;
pub use config::*;
pub use criteria::*;
pub use engine::*;
pub use error::*;
pub use features::*;
pub use freespins::*;
pub use lines::*;
pub use reels::*;
pub use sampler::*;
pub use symbols::*;
