//! Final standings with competition ranking: tied players share a rank and the
//! next rank skips past the tied group (5, 5, 3 -> 1, 1, 3).

use serde::Serialize;

use crate::session::Player;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlayer {
    #[serde(flatten)]
    pub player: Player,
    pub rank: u32,
    /// Another player has exactly the same cat count.
    pub tied: bool,
}

/// Rank players by cat count, highest first. Equal scores keep their play order.
pub fn rank(players: &[Player]) -> Vec<RankedPlayer> {
    let mut sorted: Vec<&Player> = players.iter().collect();
    // stable: equal counts stay in play order
    sorted.sort_by(|a, b| b.cat_count.cmp(&a.cat_count));

    let mut ranked = Vec::with_capacity(sorted.len());
    let mut current_rank = 0u32;
    let mut previous: Option<u32> = None;
    for (position, player) in sorted.iter().enumerate() {
        if previous != Some(player.cat_count) {
            // everyone before this position scored strictly more
            current_rank = position as u32 + 1;
            previous = Some(player.cat_count);
        }
        let tied = sorted
            .iter()
            .filter(|other| other.cat_count == player.cat_count)
            .count()
            > 1;
        ranked.push(RankedPlayer { player: (*player).clone(), rank: current_rank, tied });
    }
    ranked
}
