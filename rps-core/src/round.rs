use rps_types::{Move, Phase, Round, RoundId, ScoreBoard, SessionSnapshot, SessionStats};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

use crate::{ChoiceEngine, Clock, Opponent, StatsAccumulator};

pub const IDLE_MESSAGE: &str = "Ready to play!";
pub const IN_PROGRESS_MESSAGE: &str = "⚡ Battle in progress...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTimings {
    pub clash_after: Duration,  // selection -> clash
    pub settle_after: Duration, // selection -> settled
    pub display_for: Duration,  // settled -> ready
}

impl Default for RoundTimings {
    fn default() -> Self {
        Self {
            clash_after: Duration::from_millis(200),
            settle_after: Duration::from_millis(1200),
            display_for: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundEvent {
    RoundStarted {
        round: Round,
    },
    ClashBegan {
        round_id: RoundId,
    },
    RoundSettled {
        round: Round,
        scoreboard: ScoreBoard,
        stats: SessionStats,
    },
    ReturnedToReady {
        round_id: RoundId,
    },
    SessionReset,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("a round is already in flight (phase: {phase})")]
    RoundInFlight { phase: Phase },
}

/// Single-session, single-flight round state machine.
///
/// Transitions after the selection are driven by [`RoundController::poll`],
/// which applies every transition whose deadline has passed on the injected
/// clock. Drivers sleep until [`RoundController::next_deadline`] between polls.
pub struct RoundController<C: Clock, O: Opponent> {
    clock: C,
    opponent: O,
    timings: RoundTimings,
    phase: Phase,
    round: Option<Round>,
    scoreboard: ScoreBoard,
    stats: SessionStats,
    message: String,
    selected_at: Option<Instant>,
    settled_at: Option<Instant>,
    next_round_id: RoundId,
}

impl<C: Clock, O: Opponent> RoundController<C, O> {
    pub fn new(clock: C, opponent: O) -> Self {
        Self::with_timings(clock, opponent, RoundTimings::default())
    }

    pub fn with_timings(clock: C, opponent: O, timings: RoundTimings) -> Self {
        Self {
            clock,
            opponent,
            timings,
            phase: Phase::Ready,
            round: None,
            scoreboard: ScoreBoard::default(),
            stats: SessionStats::default(),
            message: IDLE_MESSAGE.to_string(),
            selected_at: None,
            settled_at: None,
            next_round_id: 1,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn scoreboard(&self) -> ScoreBoard {
        self.scoreboard
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn accepts_selection(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// Start a round. Only accepted while idle.
    pub fn select_move(&mut self, player_move: Move) -> Result<RoundEvent, RoundError> {
        if !self.accepts_selection() {
            debug!("Rejected {} while {}", player_move, self.phase);
            return Err(RoundError::RoundInFlight { phase: self.phase });
        }

        let round = Round {
            id: self.next_round_id,
            player_move,
            opponent_move: None,
            outcome: None,
            phase: Phase::Selecting,
        };
        self.next_round_id += 1;

        self.selected_at = Some(self.clock.now());
        self.settled_at = None;
        self.message = IN_PROGRESS_MESSAGE.to_string();
        self.round = Some(round.clone());
        self.set_phase(Phase::Selecting);

        debug!("Round {} started with {}", round.id, player_move);
        Ok(RoundEvent::RoundStarted { round })
    }

    /// When the next timed transition is due, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Ready => None,
            Phase::Selecting => self.selected_at.map(|at| at + self.timings.clash_after),
            Phase::Clash => self.selected_at.map(|at| at + self.timings.settle_after),
            Phase::Settled => self.settled_at.map(|at| at + self.timings.display_for),
        }
    }

    /// Apply every transition that is due, in order
    pub fn poll(&mut self) -> Vec<RoundEvent> {
        let now = self.clock.now();
        let mut events = Vec::new();

        while let Some(deadline) = self.next_deadline() {
            if now < deadline {
                break;
            }
            match self.advance(deadline) {
                Some(event) => events.push(event),
                None => break,
            }
        }

        events
    }

    /// Force the session back to idle and zero every tally
    pub fn reset(&mut self) -> RoundEvent {
        self.round = None;
        self.scoreboard = ScoreBoard::default();
        self.stats = SessionStats::default();
        self.message = IDLE_MESSAGE.to_string();
        self.selected_at = None;
        self.settled_at = None;
        self.phase = Phase::Ready;

        debug!("Session reset");
        RoundEvent::SessionReset
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            phase_label: self.phase.label().to_string(),
            round: self.round.clone(),
            scoreboard: self.scoreboard,
            stats: self.stats,
            win_rate: StatsAccumulator::win_rate(&self.stats),
            draw_rate: StatsAccumulator::draw_rate(&self.stats),
            loss_rate: StatsAccumulator::loss_rate(&self.stats),
            message: self.message.clone(),
            input_locked: matches!(self.phase, Phase::Selecting | Phase::Clash),
            battle_in_progress: self.phase == Phase::Clash,
        }
    }

    fn advance(&mut self, deadline: Instant) -> Option<RoundEvent> {
        let round_id = self.round.as_ref().map(|round| round.id)?;

        match self.phase {
            Phase::Ready => None,
            Phase::Selecting => {
                self.set_phase(Phase::Clash);
                Some(RoundEvent::ClashBegan { round_id })
            }
            Phase::Clash => self.settle(deadline),
            Phase::Settled => {
                self.round = None;
                self.selected_at = None;
                self.settled_at = None;
                self.message = IDLE_MESSAGE.to_string();
                self.phase = Phase::Ready;
                Some(RoundEvent::ReturnedToReady { round_id })
            }
        }
    }

    fn settle(&mut self, deadline: Instant) -> Option<RoundEvent> {
        let opponent_move = self.opponent.choose();
        let round = self.round.as_mut()?;
        let outcome = ChoiceEngine::decide(round.player_move, opponent_move);

        round.opponent_move = Some(opponent_move);
        round.outcome = Some(outcome);
        round.phase = Phase::Settled;
        let round = round.clone();

        self.scoreboard = StatsAccumulator::tally(&self.scoreboard, outcome);
        self.stats = StatsAccumulator::record(&self.stats, outcome);
        self.message = outcome.banner().to_string();
        self.settled_at = Some(deadline);
        self.phase = Phase::Settled;

        debug!(
            "Round {} settled: {} vs {} -> {}",
            round.id, round.player_move, opponent_move, outcome
        );

        Some(RoundEvent::RoundSettled {
            round,
            scoreboard: self.scoreboard,
            stats: self.stats,
        })
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        if let Some(round) = self.round.as_mut() {
            round.phase = phase;
        }
    }
}
