//! Pure scoring helpers. No mutable state; total over their inputs.

use super::entities::{Card, Player, PlayerId};

/// Sum of the numeric rank values in a hand. Zero for an empty hand.
#[must_use]
pub fn hand_sum(hand: &[Card]) -> u32 {
    hand.iter().map(|card| card.value()).sum()
}

/// Whether any card in the hand shares the table card's rank value.
/// `false` when there is no table card yet.
#[must_use]
pub fn has_rank_match(hand: &[Card], table_card: Option<Card>) -> bool {
    match table_card {
        Some(table) => hand.iter().any(|card| card.value() == table.value()),
        None => false,
    }
}

/// The minimum hand sum at the table and the ids of every player
/// holding it, in seating order.
#[must_use]
pub fn call_contenders(players: &[Player]) -> (u32, Vec<PlayerId>) {
    let min_sum = players
        .iter()
        .map(|player| hand_sum(&player.hand))
        .min()
        .unwrap_or(0);
    let contenders = players
        .iter()
        .filter(|player| hand_sum(&player.hand) == min_sum)
        .map(|player| player.id)
        .collect();
    (min_sum, contenders)
}

/// Ids of every player tied at the maximum score, in seating order.
/// Ties produce multiple winners, all reported.
#[must_use]
pub fn top_scorers(players: &[Player]) -> Vec<PlayerId> {
    let Some(max_score) = players.iter().map(|player| player.score).max() else {
        return Vec::new();
    };
    players
        .iter()
        .filter(|player| player.score == max_score)
        .map(|player| player.id)
        .collect()
}
