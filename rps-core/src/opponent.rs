use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rps_types::Move;

/// Source of the computer's move for each round
pub trait Opponent: Send {
    fn choose(&mut self) -> Move;
}

/// Uniform draw over the three moves, no memory between rounds
pub struct RandomOpponent {
    rng: StdRng,
}

impl RandomOpponent {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for RandomOpponent {
    fn choose(&mut self) -> Move {
        Move::ALL[self.rng.random_range(0..Move::ALL.len())]
    }
}

/// Plays a fixed sequence of moves, wrapping around at the end
pub struct ScriptedOpponent {
    moves: Vec<Move>,
    cursor: usize,
}

impl ScriptedOpponent {
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves, cursor: 0 }
    }

    pub fn always(mv: Move) -> Self {
        Self::new(vec![mv])
    }
}

impl Opponent for ScriptedOpponent {
    fn choose(&mut self) -> Move {
        // An empty script falls back to rock
        let Some(&mv) = self.moves.get(self.cursor % self.moves.len().max(1)) else {
            return Move::Rock;
        };
        self.cursor += 1;
        mv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_scripted_opponent_cycles() {
        let mut opponent = ScriptedOpponent::new(vec![Move::Rock, Move::Paper]);
        assert_eq!(opponent.choose(), Move::Rock);
        assert_eq!(opponent.choose(), Move::Paper);
        assert_eq!(opponent.choose(), Move::Rock);
    }

    #[test]
    fn test_empty_script_does_not_panic() {
        let mut opponent = ScriptedOpponent::new(Vec::new());
        assert_eq!(opponent.choose(), Move::Rock);
    }

    #[test]
    fn test_seeded_opponent_is_deterministic() {
        let mut a = RandomOpponent::seeded(7);
        let mut b = RandomOpponent::seeded(7);
        for _ in 0..20 {
            assert_eq!(a.choose(), b.choose());
        }
    }

    #[test]
    fn test_random_opponent_covers_all_moves() {
        let mut opponent = RandomOpponent::seeded(42);
        let mut counts: HashMap<Move, u32> = HashMap::new();
        for _ in 0..3000 {
            *counts.entry(opponent.choose()).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 3);
        // Each face should land roughly a third of the time
        for count in counts.values() {
            assert!(*count > 800 && *count < 1200, "skewed count {}", count);
        }
    }
}
