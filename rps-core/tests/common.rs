#![allow(dead_code)]

use rps_core::{Clock, ManualClock, RoundController, RoundEvent, RoundTimings, ScriptedOpponent};
use rps_types::Move;
use std::time::Duration;

pub type TestController = RoundController<ManualClock, ScriptedOpponent>;

/// Creates a controller whose opponent plays the given moves in order
pub fn create_scripted_controller(opponent_moves: Vec<Move>) -> (ManualClock, TestController) {
    let clock = ManualClock::new();
    let controller = RoundController::new(clock.clone(), ScriptedOpponent::new(opponent_moves));
    (clock, controller)
}

/// Creates a controller with custom phase timings
pub fn create_controller_with_timings(
    opponent_moves: Vec<Move>,
    timings: RoundTimings,
) -> (ManualClock, TestController) {
    let clock = ManualClock::new();
    let controller =
        RoundController::with_timings(clock.clone(), ScriptedOpponent::new(opponent_moves), timings);
    (clock, controller)
}

/// Plays one full round, from selection back to ready, collecting every event
pub fn play_full_round(
    clock: &ManualClock,
    controller: &mut TestController,
    player_move: Move,
) -> Vec<RoundEvent> {
    let mut events = vec![
        controller
            .select_move(player_move)
            .expect("controller should be idle"),
    ];

    while let Some(deadline) = controller.next_deadline() {
        let now = clock.now();
        if deadline > now {
            clock.advance(deadline - now);
        }
        events.extend(controller.poll());
    }

    events
}

/// Advances virtual time in small steps, polling after each one
pub fn advance_in_steps(
    clock: &ManualClock,
    controller: &mut TestController,
    total: Duration,
    step: Duration,
) -> Vec<RoundEvent> {
    let mut events = Vec::new();
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        clock.advance(step);
        elapsed += step;
        events.extend(controller.poll());
    }
    events
}
