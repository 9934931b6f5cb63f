use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeSet, VecDeque},
    fmt,
};

use super::constants;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Self; 4] = [Self::Hearts, Self::Diamonds, Self::Clubs, Self::Spades];

    /// Hearts and diamonds print red, clubs and spades print black.
    #[must_use]
    pub const fn is_red(self) -> bool {
        matches!(self, Self::Hearts | Self::Diamonds)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Hearts => "♥",
            Self::Diamonds => "♦",
            Self::Clubs => "♣",
            Self::Spades => "♠",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Self; 13] = [
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
        Self::Ace,
    ];

    /// Numeric value used for hand sums: ace counts 1, face cards count
    /// 11 through 13, numerals count face value.
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::Ace => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
            Self::Nine => 9,
            Self::Ten => 10,
            Self::Jack => 11,
            Self::Queen => 12,
            Self::King => 13,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Ace => "A",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            numeral => return write!(f, "{}", numeral.value()),
        };
        write!(f, "{repr}")
    }
}

/// A card is a tuple of a rank and a suit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Rank, pub Suit);

impl Card {
    #[must_use]
    pub const fn rank(self) -> Rank {
        self.0
    }

    #[must_use]
    pub const fn suit(self) -> Suit {
        self.1
    }

    /// Numeric value of this card's rank.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0.value()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = format!("{}/{}", self.0, self.1);
        write!(f, "{repr:>4}")
    }
}

/// The shared draw pile. The front card is the next to be drawn.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// All 52 cards in a fresh uniformly random permutation. Each call
    /// shuffles independently.
    #[must_use]
    pub fn shuffled() -> Self {
        let mut cards: Vec<Card> = Suit::ALL
            .into_iter()
            .flat_map(|suit| Rank::ALL.into_iter().map(move |rank| Card(rank, suit)))
            .collect();
        cards.shuffle(&mut rand::rng());
        Self {
            cards: cards.into(),
        }
    }

    /// Build a deck with an exact card order, front first.
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Remove and return the front card, if any.
    pub fn take_front(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    /// Deal up to `n` cards off the front.
    pub fn deal(&mut self, n: usize) -> Vec<Card> {
        let n = n.min(self.cards.len());
        self.cards.drain(..n).collect()
    }

    /// Draw the next card. When fewer than
    /// [`DECK_REFILL_THRESHOLD`](constants::DECK_REFILL_THRESHOLD) cards
    /// remain and the discard pile is non-empty, the pile is reshuffled
    /// under the remaining deck first. Returns `None` only when both the
    /// deck and the discard pile are empty, in which case neither is
    /// touched.
    pub fn draw(&mut self, discard: &mut Vec<Card>) -> Option<Card> {
        if self.cards.len() < constants::DECK_REFILL_THRESHOLD && !discard.is_empty() {
            discard.shuffle(&mut rand::rng());
            self.cards.extend(discard.drain(..));
        }
        self.cards.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

/// Stable player identity assigned at game creation, never reused.
/// Turn order is tracked by array position; identity (e.g. who starts
/// the next round) is always tracked by id.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vec<Card>,
    /// Cumulative score across rounds; failed calls can push it negative.
    pub score: i32,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Vec::with_capacity(constants::HAND_SIZE),
            score: 0,
        }
    }

    /// Replace this player's hand for a new round. Score persists.
    pub fn redeal(&mut self, hand: Vec<Card>) {
        self.hand = hand;
    }
}

/// Which phase of the game lifecycle a snapshot was taken in.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    PlayerTurn,
    RoundEnd,
    GameEnd,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Setup => "setup",
            Self::PlayerTurn => "player turn",
            Self::RoundEnd => "round end",
            Self::GameEnd => "game end",
        };
        write!(f, "{repr}")
    }
}

/// Public view of one player: everything except the cards themselves.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub score: i32,
    pub cards_held: usize,
}

impl From<&Player> for PlayerSnapshot {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            score: player.score,
            cards_held: player.hand.len(),
        }
    }
}

/// The acting player's private view: their own cards and turn context.
/// Only ever present for the player currently holding the device.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TurnSnapshot {
    pub player: PlayerId,
    pub name: String,
    pub hand: Vec<Card>,
    pub selected: BTreeSet<usize>,
    pub has_drawn: bool,
    pub first_of_round: bool,
}

/// Read-only snapshot of the whole game for the presentation layer.
/// Hands other than the acting player's are reported as counts only.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub round: u32,
    pub total_rounds: u32,
    pub players: Vec<PlayerSnapshot>,
    pub table_card: Option<Card>,
    pub cards_in_deck: usize,
    pub cards_in_discard: usize,
    pub turn: Option<TurnSnapshot>,
    pub round_winner: Option<PlayerId>,
    pub winners: Vec<PlayerId>,
}

impl GameSnapshot {
    /// JSON rendering for presentation layers that prefer a serialized
    /// view over the typed struct.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
