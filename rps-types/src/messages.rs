use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Move, Phase, Round, SessionSnapshot, User};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    SelectMove { choice: Move },
    ResetSession,
    BindUser { username: String, password: String },
    UnbindUser,
    GetSnapshot,
    Heartbeat,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    Snapshot { snapshot: SessionSnapshot },
    PhaseChanged { snapshot: SessionSnapshot },
    RoundSettled { round: Round, snapshot: SessionSnapshot },
    SessionReset { snapshot: SessionSnapshot },
    UserBound { user: User },
    UserUnbound,
    SelectionRejected { phase: Phase },
    Error { message: String },
}
