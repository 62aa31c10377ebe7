use serde::Serialize;

/// Points awarded per cleared row. Multiple rows in one lock score the same per row.
const POINTS_PER_ROW: usize = 100;
/// Score needed to advance one level.
const POINTS_PER_LEVEL: usize = 500;

/// Game statistics tracking score, lines cleared and piece count.
///
/// Scoring is flat: every cleared row is worth 100 points no matter how many rows
/// are cleared at once. The level is derived from the score and never stored.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_line_clear(2);
///
/// assert_eq!(stats.score(), 200);
/// assert_eq!(stats.level(), 1);
/// assert_eq!(stats.cleared_lines(), 2);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    cleared_lines: usize,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            cleared_lines: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the current level, `1 + score / 500`.
    #[must_use]
    pub const fn level(&self) -> usize {
        1 + self.score / POINTS_PER_LEVEL
    }

    /// Returns the number of pieces locked onto the board.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// Records that a piece was locked.
    pub const fn complete_piece_lock(&mut self) {
        self.completed_pieces += 1;
    }

    /// Records `rows` rows cleared by a single lock and awards their points.
    pub const fn complete_line_clear(&mut self, rows: usize) {
        self.cleared_lines += rows;
        self.score += POINTS_PER_ROW * rows;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_stats() {
        let stats = GameStats::new();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.completed_pieces(), 0);
        assert_eq!(stats.cleared_lines(), 0);
    }

    #[test]
    fn test_single_and_double_scores_are_flat() {
        let mut stats = GameStats::new();
        stats.complete_line_clear(1);
        assert_eq!(stats.score(), 100);
        stats.complete_line_clear(2);
        assert_eq!(stats.score(), 300);
        assert_eq!(stats.cleared_lines(), 3);
    }

    #[test]
    fn test_level_boundaries() {
        let mut stats = GameStats::new();
        stats.complete_line_clear(4);
        assert_eq!((stats.score(), stats.level()), (400, 1));
        stats.complete_line_clear(1);
        assert_eq!((stats.score(), stats.level()), (500, 2));
        stats.complete_line_clear(4);
        assert_eq!((stats.score(), stats.level()), (900, 2));
        stats.complete_line_clear(1);
        assert_eq!((stats.score(), stats.level()), (1000, 3));
    }

    #[test]
    fn test_piece_lock_counter() {
        let mut stats = GameStats::new();
        stats.complete_piece_lock();
        stats.complete_piece_lock();
        assert_eq!(stats.completed_pieces(), 2);
        assert_eq!(stats.score(), 0);
    }

    #[test]
    fn test_serialize() {
        let mut stats = GameStats::new();
        stats.complete_piece_lock();
        stats.complete_line_clear(1);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "score": 100, "completed_pieces": 1, "cleared_lines": 1 })
        );
    }
}
