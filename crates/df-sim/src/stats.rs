//! Session statistics over finalized books
//!
//! Accumulated per worker and merged, so a batch pays no locking cost.
//! All wins are in bet multiples, so RTP is win-per-book directly.

use df_book::Book;
use serde::{Deserialize, Serialize};

/// Aggregate statistics for a set of finalized books.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub books: u64,
    pub total_win: f64,
    /// Books with any positive win
    pub winning_books: u64,
    /// Books that entered a free-spin run
    pub freegame_entries: u64,
    /// Books that hit the win cap
    pub wincap_hits: u64,
    pub max_win: f64,
}

impl SessionStats {
    pub fn record(&mut self, book: &Book) {
        self.books += 1;
        self.total_win += book.final_win;
        if book.final_win > 0.0 {
            self.winning_books += 1;
        }
        if book.triggered_freegame {
            self.freegame_entries += 1;
        }
        if book.wincap_hit {
            self.wincap_hits += 1;
        }
        if book.final_win > self.max_win {
            self.max_win = book.final_win;
        }
    }

    pub fn merge(&mut self, other: &SessionStats) {
        self.books += other.books;
        self.total_win += other.total_win;
        self.winning_books += other.winning_books;
        self.freegame_entries += other.freegame_entries;
        self.wincap_hits += other.wincap_hits;
        if other.max_win > self.max_win {
            self.max_win = other.max_win;
        }
    }

    /// Average return per book (bet of 1 per spin).
    pub fn rtp(&self) -> f64 {
        if self.books == 0 {
            0.0
        } else {
            self.total_win / self.books as f64
        }
    }

    /// Fraction of books with a positive win.
    pub fn hit_rate(&self) -> f64 {
        if self.books == 0 {
            0.0
        } else {
            self.winning_books as f64 / self.books as f64
        }
    }

    /// Fraction of books that entered the free game.
    pub fn feature_rate(&self) -> f64 {
        if self.books == 0 {
            0.0
        } else {
            self.freegame_entries as f64 / self.books as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(win: f64, freegame: bool) -> Book {
        let mut b = Book::new(0, "test");
        b.final_win = win;
        b.triggered_freegame = freegame;
        b
    }

    #[test]
    fn rates_over_recorded_books() {
        let mut stats = SessionStats::default();
        stats.record(&book(0.0, false));
        stats.record(&book(2.0, false));
        stats.record(&book(10.0, true));
        stats.record(&book(0.0, false));

        assert_eq!(stats.books, 4);
        assert_eq!(stats.rtp(), 3.0);
        assert_eq!(stats.hit_rate(), 0.5);
        assert_eq!(stats.feature_rate(), 0.25);
        assert_eq!(stats.max_win, 10.0);
    }

    #[test]
    fn merge_is_additive() {
        let mut a = SessionStats::default();
        a.record(&book(1.0, false));
        let mut b = SessionStats::default();
        b.record(&book(5.0, true));
        b.record(&book(0.0, false));

        a.merge(&b);
        assert_eq!(a.books, 3);
        assert_eq!(a.total_win, 6.0);
        assert_eq!(a.max_win, 5.0);
    }

    #[test]
    fn empty_stats_do_not_divide_by_zero() {
        let stats = SessionStats::default();
        assert_eq!(stats.rtp(), 0.0);
        assert_eq!(stats.hit_rate(), 0.0);
    }
}
