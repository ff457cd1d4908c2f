use rps_types::{Outcome, ScoreBoard, SessionStats};

pub struct StatsAccumulator;

impl StatsAccumulator {
    /// Fold one settled outcome into the running tallies
    pub fn record(stats: &SessionStats, outcome: Outcome) -> SessionStats {
        let mut next = *stats;
        next.total_rounds += 1;

        match outcome {
            Outcome::Win => {
                next.wins += 1;
                next.current_streak += 1;
                next.best_streak = next.best_streak.max(next.current_streak);
            }
            Outcome::Lose => {
                next.losses += 1;
                next.current_streak = 0;
            }
            Outcome::Draw => {
                next.draws += 1;
                next.current_streak = 0;
            }
        }

        next
    }

    pub fn tally(scoreboard: &ScoreBoard, outcome: Outcome) -> ScoreBoard {
        let mut next = *scoreboard;
        match outcome {
            Outcome::Win => next.player_wins += 1,
            Outcome::Lose => next.opponent_wins += 1,
            Outcome::Draw => {}
        }
        next
    }

    pub fn win_rate(stats: &SessionStats) -> u32 {
        percentage(stats.wins, stats.total_rounds)
    }

    pub fn draw_rate(stats: &SessionStats) -> u32 {
        percentage(stats.draws, stats.total_rounds)
    }

    pub fn loss_rate(stats: &SessionStats) -> u32 {
        percentage(stats.losses, stats.total_rounds)
    }

    pub fn is_consistent(stats: &SessionStats) -> bool {
        stats.wins + stats.losses + stats.draws == stats.total_rounds
            && stats.current_streak <= stats.best_streak
    }
}

/// `100 * part / total` rounded to the nearest integer, halves up
pub fn percentage(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let part = part as u64;
    let total = total as u64;
    ((200 * part + total) / (2 * total)) as u32
}
