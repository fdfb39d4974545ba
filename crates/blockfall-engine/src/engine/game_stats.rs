/// Statistics for a session: score, locked pieces, cleared rows and games started.
///
/// # Scoring
///
/// Every row cleared by a lock adds a fixed bonus, independently of how many rows
/// the same lock clears. There are no combo or multi-row multipliers.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// let gained = stats.complete_piece_drop(2, 10);
///
/// assert_eq!(gained, 20);
/// assert_eq!(stats.score(), 20);
/// assert_eq!(stats.total_cleared_rows(), 2);
/// assert_eq!(stats.completed_pieces(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: u64,
    completed_pieces: usize,
    total_cleared_rows: usize,
    games_played: usize,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates statistics for the first game of a session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_rows: 0,
            games_played: 1,
        }
    }

    /// Returns the score of the current game.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Returns the number of pieces locked in the current game.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns the number of rows cleared in the current game.
    #[must_use]
    pub const fn total_cleared_rows(&self) -> usize {
        self.total_cleared_rows
    }

    /// Returns how many games this session has started, including the current one.
    #[must_use]
    pub const fn games_played(&self) -> usize {
        self.games_played
    }

    /// Records a lock that cleared `cleared_rows` rows and returns the points gained.
    pub fn complete_piece_drop(&mut self, cleared_rows: usize, score_per_row: u64) -> u64 {
        let gained = u64::try_from(cleared_rows)
            .unwrap_or(u64::MAX)
            .saturating_mul(score_per_row);
        self.completed_pieces += 1;
        self.total_cleared_rows += cleared_rows;
        self.score = self.score.saturating_add(gained);
        gained
    }

    /// Resets the per-game counters and counts a new game.
    pub const fn start_new_game(&mut self) {
        self.score = 0;
        self.completed_pieces = 0;
        self.total_cleared_rows = 0;
        self.games_played += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_clear_scores_nothing() {
        let mut stats = GameStats::new();
        assert_eq!(stats.complete_piece_drop(0, 10), 0);
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.completed_pieces(), 1);
    }

    #[test]
    fn test_rows_score_independently() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(1, 10);
        stats.complete_piece_drop(4, 10);
        assert_eq!(stats.score(), 50);
        assert_eq!(stats.total_cleared_rows(), 5);
    }

    #[test]
    fn test_score_saturates() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(2, u64::MAX);
        assert_eq!(stats.score(), u64::MAX);
        stats.complete_piece_drop(1, 1);
        assert_eq!(stats.score(), u64::MAX);
    }

    #[test]
    fn test_start_new_game() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(3, 10);
        stats.start_new_game();
        assert_eq!(
            stats,
            GameStats {
                score: 0,
                completed_pieces: 0,
                total_cleared_rows: 0,
                games_played: 2,
            }
        );
    }
}
