//! Parallel batch runner
//!
//! One engine call per book on a rayon pool. Output order equals input
//! order regardless of worker scheduling, and every slot yields an explicit
//! entry: a finalized book, an unreachable criterion, or a cancellation.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use df_book::Book;
use df_engine::{Criterion, EngineError, GameEngine};
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::assign::assign_criteria;
use crate::error::{SimError, SimResult};
use crate::stats::SessionStats;

/// Batch execution options.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Number of books to produce
    pub num_books: u64,
    /// Seed for criterion assignment and per-book RNG derivation
    pub base_seed: u64,
    /// Worker threads; `None` uses the machine's logical CPU count
    pub num_threads: Option<usize>,
    /// Wall-clock budget for the whole batch; in-flight attempts are
    /// cancelled cooperatively once it elapses
    pub deadline: Option<Duration>,
}

impl BatchOptions {
    pub fn new(num_books: u64, base_seed: u64) -> Self {
        Self {
            num_books,
            base_seed,
            num_threads: None,
            deadline: None,
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads.max(1));
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Outcome of one batch slot. Never silently wrong: a slot that produced no
/// book says why.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BatchEntry {
    Book(Book),
    #[serde(rename_all = "camelCase")]
    Unreachable {
        criterion: String,
        attempts: u32,
    },
    Cancelled,
    #[serde(rename_all = "camelCase")]
    Failed {
        error: String,
    },
}

impl BatchEntry {
    pub fn as_book(&self) -> Option<&Book> {
        match self {
            BatchEntry::Book(book) => Some(book),
            _ => None,
        }
    }
}

/// Result of a whole batch, entries in input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub stats: SessionStats,
    /// Slots that produced no book (unreachable, cancelled, or failed)
    pub unresolved: u64,
}

impl BatchReport {
    /// Finalized books in input order.
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.entries.iter().filter_map(BatchEntry::as_book)
    }
}

/// Run a batch: assign criteria by quota, then play every slot in parallel.
pub fn run_batch(
    engine: &GameEngine,
    criteria: &[Criterion],
    options: &BatchOptions,
) -> SimResult<BatchReport> {
    // Degenerate criterion tables are fatal for the whole batch, not a
    // per-slot outcome
    for criterion in criteria {
        criterion.validate()?;
    }
    let assignment = assign_criteria(criteria, options.num_books, options.base_seed)?;
    let threads = options
        .num_threads
        .unwrap_or_else(num_cpus::get)
        .max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| SimError::ThreadPool(e.to_string()))?;

    info!(
        "batch: {} books over {} criteria on {} threads",
        options.num_books,
        criteria.len(),
        threads
    );

    let cancel = AtomicBool::new(false);
    let deadline = options.deadline.map(|d| Instant::now() + d);
    let base_seed = options.base_seed;

    let entries: Vec<BatchEntry> = pool.install(|| {
        assignment
            .par_iter()
            .enumerate()
            .map(|(slot, &criterion_idx)| {
                if let Some(deadline) = deadline {
                    if Instant::now() >= deadline {
                        cancel.store(true, Ordering::Relaxed);
                    }
                }
                let seed = splitmix64(base_seed.wrapping_add(slot as u64));
                match engine.run_one_with_cancel(
                    slot as u64,
                    seed,
                    &criteria[criterion_idx],
                    &cancel,
                ) {
                    Ok(book) => BatchEntry::Book(book),
                    Err(EngineError::Cancelled) => BatchEntry::Cancelled,
                    Err(EngineError::CriterionUnreachable {
                        criterion,
                        attempts,
                    }) => BatchEntry::Unreachable {
                        criterion,
                        attempts,
                    },
                    Err(e) => BatchEntry::Failed {
                        error: e.to_string(),
                    },
                }
            })
            .collect()
    });

    let stats = pool.install(|| {
        entries
            .par_iter()
            .filter_map(BatchEntry::as_book)
            .fold(SessionStats::default, |mut acc, book| {
                acc.record(book);
                acc
            })
            .reduce(SessionStats::default, |mut a, b| {
                a.merge(&b);
                a
            })
    });
    let unresolved = entries.iter().filter(|e| e.as_book().is_none()).count() as u64;
    if unresolved > 0 {
        warn!("batch: {} of {} slots unresolved", unresolved, entries.len());
    }

    Ok(BatchReport {
        entries,
        stats,
        unresolved,
    })
}

/// Write finalized books as JSON lines, one book per line.
pub fn write_books_jsonl<'a, W: Write>(
    writer: &mut W,
    books: impl Iterator<Item = &'a Book>,
) -> SimResult<()> {
    for book in books {
        serde_json::to_writer(&mut *writer, book)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// splitmix64 finalizer: decorrelates per-slot seeds from the linear slot
/// index so neighboring books never share an RNG stream.
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
