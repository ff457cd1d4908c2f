use rps_core::{
    Clock, Opponent, RandomOpponent, RoundController, RoundError, RoundEvent, RoundTimings,
    SystemClock,
};
use rps_types::{Move, NewGameResult, ServerMessage, User};
use std::time::Instant;

/// One player's game: a round controller plus the account results are filed under
pub struct GameSession<C: Clock = SystemClock, O: Opponent = RandomOpponent> {
    controller: RoundController<C, O>,
    user: Option<User>,
}

/// What the connection should do after a session step
#[derive(Debug, Default)]
pub struct SessionOutput {
    pub messages: Vec<ServerMessage>,
    pub results: Vec<NewGameResult>,
}

impl GameSession {
    pub fn live(timings: RoundTimings) -> Self {
        Self::new(RoundController::with_timings(
            SystemClock,
            RandomOpponent::new(),
            timings,
        ))
    }
}

impl<C: Clock, O: Opponent> GameSession<C, O> {
    pub fn new(controller: RoundController<C, O>) -> Self {
        Self {
            controller,
            user: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn bind(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn unbind(&mut self) -> Option<User> {
        self.user.take()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.controller.next_deadline()
    }

    pub fn snapshot_message(&self) -> ServerMessage {
        ServerMessage::Snapshot {
            snapshot: self.controller.snapshot(),
        }
    }

    pub fn select(&mut self, choice: Move) -> Result<SessionOutput, RoundError> {
        let event = self.controller.select_move(choice)?;
        Ok(self.render(vec![event]))
    }

    pub fn poll(&mut self) -> SessionOutput {
        let events = self.controller.poll();
        self.render(events)
    }

    pub fn reset(&mut self) -> SessionOutput {
        let event = self.controller.reset();
        self.render(vec![event])
    }

    fn render(&self, events: Vec<RoundEvent>) -> SessionOutput {
        let mut output = SessionOutput::default();

        for event in events {
            let snapshot = self.controller.snapshot();
            match event {
                RoundEvent::RoundStarted { .. }
                | RoundEvent::ClashBegan { .. }
                | RoundEvent::ReturnedToReady { .. } => {
                    output.messages.push(ServerMessage::PhaseChanged { snapshot });
                }
                RoundEvent::RoundSettled { round, .. } => {
                    if let (Some(user), Some(opponent_move), Some(outcome)) =
                        (&self.user, round.opponent_move, round.outcome)
                    {
                        output.results.push(NewGameResult {
                            user_id: Some(user.id),
                            player_choice: round.player_move,
                            computer_choice: opponent_move,
                            result: outcome,
                        });
                    }
                    output
                        .messages
                        .push(ServerMessage::RoundSettled { round, snapshot });
                }
                RoundEvent::SessionReset => {
                    output.messages.push(ServerMessage::SessionReset { snapshot });
                }
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rps_core::{ManualClock, ScriptedOpponent};
    use rps_types::{Outcome, Phase};
    use std::time::Duration;

    fn setup(opponent: Move) -> (ManualClock, GameSession<ManualClock, ScriptedOpponent>) {
        let clock = ManualClock::new();
        let controller = RoundController::new(clock.clone(), ScriptedOpponent::always(opponent));
        (clock, GameSession::new(controller))
    }

    #[test]
    fn test_selection_renders_phase_change() {
        let (_, mut session) = setup(Move::Scissors);
        let output = session.select(Move::Rock).unwrap();

        assert_eq!(output.messages.len(), 1);
        match &output.messages[0] {
            ServerMessage::PhaseChanged { snapshot } => {
                assert_eq!(snapshot.phase, Phase::Selecting);
                assert!(snapshot.input_locked);
            }
            other => panic!("Expected PhaseChanged, got {:?}", other),
        }
        assert!(output.results.is_empty());
    }

    #[test]
    fn test_settled_round_yields_result_for_bound_user() {
        let (clock, mut session) = setup(Move::Scissors);
        session.bind(User {
            id: 7,
            username: "kate".to_string(),
        });

        session.select(Move::Rock).unwrap();
        clock.advance(Duration::from_millis(1200));
        let output = session.poll();

        // clash and settle were both due
        assert_eq!(output.messages.len(), 2);
        assert!(matches!(
            output.messages[1],
            ServerMessage::RoundSettled { ref round, .. } if round.outcome == Some(Outcome::Win)
        ));
        assert_eq!(
            output.results,
            vec![NewGameResult {
                user_id: Some(7),
                player_choice: Move::Rock,
                computer_choice: Move::Scissors,
                result: Outcome::Win,
            }]
        );
    }

    #[test]
    fn test_anonymous_session_records_nothing() {
        let (clock, mut session) = setup(Move::Rock);
        session.select(Move::Rock).unwrap();
        clock.advance(Duration::from_millis(1200));

        let output = session.poll();
        assert!(output.results.is_empty());
    }

    #[test]
    fn test_rejected_selection_mid_round() {
        let (_, mut session) = setup(Move::Paper);
        session.select(Move::Rock).unwrap();

        let err = session.select(Move::Paper).unwrap_err();
        assert_eq!(err, RoundError::RoundInFlight { phase: Phase::Selecting });
    }

    #[test]
    fn test_reset_clears_deadline() {
        let (_, mut session) = setup(Move::Paper);
        session.select(Move::Rock).unwrap();
        assert!(session.next_deadline().is_some());

        let output = session.reset();
        assert!(matches!(output.messages[0], ServerMessage::SessionReset { .. }));
        assert!(session.next_deadline().is_none());
    }

    #[test]
    fn test_unbind_returns_previous_user() {
        let (_, mut session) = setup(Move::Paper);
        let user = User {
            id: 1,
            username: "leo".to_string(),
        };
        session.bind(user.clone());
        assert_eq!(session.user(), Some(&user));
        assert_eq!(session.unbind(), Some(user));
        assert!(session.user().is_none());
    }
}
