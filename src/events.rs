//! Notifications emitted for the host UI. The core never formats or renders
//! them; the JS side receives them as `type`-tagged JSON.

use serde::Serialize;

use crate::ranking::RankedPlayer;
use crate::scan::{ScanRequest, ScanResult};
use crate::session::Player;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    GameStarted { total_players: usize, suggested_name: String },
    GameReset,
    /// Channel display text ("000" and inactive when nothing is entered).
    ChannelDisplay { text: String, active: bool },
    /// A keypad press made by the randomize sequence (for the press animation).
    RandomDigit { digit: char },
    ChannelActionPressed,
    /// An automatic submit failed; there is no caller to hand the error to.
    ChannelRejected { reason: String },
    ScanStarted { request: ScanRequest, duration_ms: u64 },
    CatDetected { cat_index: usize, x: f64, y: f64, detected_count: u32, elapsed_ms: u64 },
    AllCatsDetected { total: u32 },
    NoCatsFound,
    ScanCompleted { result: ScanResult },
    /// The next/confirm button may be enabled.
    ConfirmReady { last_player: bool },
    TurnConfirmed { player: Player, next_player_index: Option<usize>, suggested_name: Option<String> },
    GameFinished { standings: Vec<RankedPlayer> },
}

/// Anything that wants game events pushed to it.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}
