use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

pub type RoundId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Lose => "lose",
            Outcome::Draw => "draw",
        }
    }

    /// The banner shown once a round settles with this outcome
    pub fn banner(&self) -> &'static str {
        match self {
            Outcome::Win => "🎉 Victory! You Win!",
            Outcome::Lose => "💔 Defeat! You Lose!",
            Outcome::Draw => "🤝 It's a Draw!",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Phase {
    Ready,     // Idle, waiting for a selection
    Selecting, // Selection made, opponent still thinking
    Clash,     // Presentation beat before the reveal
    Settled,   // Outcome known, score updated
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Ready => "Ready to Play",
            Phase::Selecting => "Selection Made",
            Phase::Clash => "Battle in Progress",
            Phase::Settled => "Round Complete",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Ready => "ready",
            Phase::Selecting => "selecting",
            Phase::Clash => "clash",
            Phase::Settled => "settled",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Round {
    pub id: RoundId,
    pub player_move: Move,
    pub opponent_move: Option<Move>,
    pub outcome: Option<Outcome>,
    pub phase: Phase,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScoreBoard {
    pub player_wins: u32,
    pub opponent_wins: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionStats {
    pub total_rounds: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub current_streak: u32,
    pub best_streak: u32,
}

/// Everything a renderer needs to draw one session at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub phase_label: String,
    pub round: Option<Round>,
    pub scoreboard: ScoreBoard,
    pub stats: SessionStats,
    pub win_rate: u32,
    pub draw_rate: u32,
    pub loss_rate: u32,
    pub message: String,
    pub input_locked: bool,
    pub battle_in_progress: bool,
}
