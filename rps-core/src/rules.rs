use rps_types::{Move, Outcome};

pub struct ChoiceEngine;

impl ChoiceEngine {
    /// The move that `mv` defeats
    pub fn beats(mv: Move) -> Move {
        match mv {
            Move::Rock => Move::Scissors,
            Move::Scissors => Move::Paper,
            Move::Paper => Move::Rock,
        }
    }

    /// Outcome from the player's side of the table
    pub fn decide(player: Move, opponent: Move) -> Outcome {
        if player == opponent {
            Outcome::Draw
        } else if Self::beats(player) == opponent {
            Outcome::Win
        } else {
            Outcome::Lose
        }
    }
}
