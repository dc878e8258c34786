//! Cross-round state: who has played, which channels and images are taken,
//! and whose turn it is.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::SessionError;
use crate::round::Channel;

/// A committed turn. Immutable once pushed into the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub channel: Channel,
    pub image_id: String,
    pub cat_count: u32,
}

/// What happens after a turn is committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnAdvance {
    /// Index of the player who plays next.
    Next(usize),
    /// Everyone has played.
    Finished,
}

#[derive(Clone, Debug)]
pub struct SessionState {
    total_players: usize,
    current_player_index: usize,
    players: Vec<Player>,
    used_image_ids: HashSet<String>,
    used_channels: HashSet<Channel>,
}

impl SessionState {
    pub fn new(total_players: usize, max_players: usize) -> Result<Self, SessionError> {
        if total_players == 0 || total_players > max_players {
            return Err(SessionError::InvalidPlayerCount { count: total_players, max: max_players });
        }
        Ok(Self {
            total_players,
            current_player_index: 0,
            players: Vec::with_capacity(total_players),
            used_image_ids: HashSet::new(),
            used_channels: HashSet::new(),
        })
    }

    pub fn total_players(&self) -> usize {
        self.total_players
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    pub fn is_last_player(&self) -> bool {
        self.current_player_index + 1 == self.total_players
    }

    pub fn is_complete(&self) -> bool {
        self.players.len() == self.total_players
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn is_channel_used(&self, channel: Channel) -> bool {
        self.used_channels.contains(&channel)
    }

    pub fn is_image_used(&self, image_id: &str) -> bool {
        self.used_image_ids.contains(image_id)
    }

    /// Claimed channels in the order they were played.
    pub fn used_channels(&self) -> Vec<Channel> {
        self.players.iter().map(|p| p.channel).collect()
    }

    /// Append a finished turn, claim its channel and image, and move the turn on.
    /// Callers check `is_complete` first; committing past the roster is ignored.
    pub fn commit(&mut self, player: Player) -> TurnAdvance {
        debug_assert!(!self.is_complete(), "commit on a complete session");
        if self.is_complete() {
            return TurnAdvance::Finished;
        }
        self.used_channels.insert(player.channel);
        self.used_image_ids.insert(player.image_id.clone());
        self.players.push(player);
        if self.is_complete() {
            TurnAdvance::Finished
        } else {
            self.current_player_index += 1;
            TurnAdvance::Next(self.current_player_index)
        }
    }
}
