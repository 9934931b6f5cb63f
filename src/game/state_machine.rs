//! The turn state machine and round/game controller.
//!
//! A game is a typestate [`Game<T>`] wrapping shared [`GameData`] plus a
//! phase-specific state struct; [`FaduState`] is the phase enum the
//! presentation layer drives. Every mutation is validated first (the
//! `rules` module) and committed only on success, so a rejected action
//! leaves the game untouched.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt, mem};

use super::constants;
use super::entities::{
    Card, Deck, GameSnapshot, Phase, Player, PlayerId, PlayerSnapshot, TurnSnapshot,
};
use super::functional;
use super::rules::{self, ActionError, ActionResult, SelectionOutcome};
use super::states::{GameEnd, PlayerTurn, RoundEnd, Setup};

/// Narration of what just happened, for the presentation layer to show.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum GameEvent {
    RoundStarted { round: u32 },
    TurnPassed(String),
    CardDrawn(String),
    CardsPlayed { name: String, count: usize },
    HandEmptied(String),
    CallSucceeded { name: String, sum: u32 },
    CallFailed { name: String },
    RoundEnded { round: u32, winner: String },
    GameEnded(Vec<String>),
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::RoundStarted { round } => format!("round {round} started"),
            Self::TurnPassed(name) => format!("pass the device to {name}"),
            Self::CardDrawn(name) => format!("{name} drew a card"),
            Self::CardsPlayed { name, count: 1 } => format!("{name} played a card"),
            Self::CardsPlayed { name, count } => format!("{name} played {count} cards"),
            Self::HandEmptied(name) => format!("{name} emptied their hand"),
            Self::CallSucceeded { name, sum } => {
                format!(
                    "{name} called successfully on {sum}, +{} points",
                    constants::CALL_SUCCESS_SCORE
                )
            }
            Self::CallFailed { name } => {
                format!(
                    "{name} called unsuccessfully, -{} points",
                    constants::CALL_PENALTY
                )
            }
            Self::RoundEnded { round, winner } => format!("round {round} won by {winner}"),
            Self::GameEnded(names) => format!("game over: {} wins", names.join(", ")),
        };
        write!(f, "{repr}")
    }
}

/// Game configuration settings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSettings {
    /// One entry per seat; seating order is turn order.
    pub player_names: Vec<String>,
    /// Total rounds to play; 1-indexed round counter stops here.
    pub rounds: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::with_player_count(constants::DEFAULT_PLAYERS, constants::DEFAULT_ROUNDS)
    }
}

impl GameSettings {
    #[must_use]
    pub fn new(player_names: Vec<String>, rounds: u32) -> Self {
        Self {
            player_names,
            rounds,
        }
    }

    /// Settings with default seat names ("Player 1", "Player 2", ...).
    #[must_use]
    pub fn with_player_count(count: usize, rounds: u32) -> Self {
        let player_names = (1..=count).map(|n| format!("Player {n}")).collect();
        Self {
            player_names,
            rounds,
        }
    }

    pub fn validate(&self) -> ActionResult<()> {
        if self.player_names.len() < constants::MIN_PLAYERS {
            return Err(ActionError::NotEnoughPlayers);
        }
        if self.player_names.len() > constants::MAX_PLAYERS {
            return Err(ActionError::TooManyPlayers);
        }
        if self.rounds == 0 {
            return Err(ActionError::NotEnoughRounds);
        }
        Ok(())
    }
}

/// Mutable game data shared across all states.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameData {
    pub settings: GameSettings,
    /// Shared draw pile, reshuffled each round.
    pub deck: Deck,
    /// Face-up pile; recycled into the deck when it runs low.
    pub discard: Vec<Card>,
    /// Insertion order is turn order. Identity lives in [`Player::id`].
    pub players: Vec<Player>,
    /// The most recently played card, visible to everyone. `None` only
    /// before the round's first card is placed.
    pub table_card: Option<Card>,
    /// Index into `players` of whoever holds the device.
    pub turn_idx: usize,
    /// 1-indexed, bounded by `settings.rounds`.
    pub round: u32,
    pub(crate) events: VecDeque<GameEvent>,
}

impl From<GameSettings> for GameData {
    fn from(settings: GameSettings) -> Self {
        Self {
            deck: Deck::default(),
            discard: Vec::new(),
            players: Vec::new(),
            table_card: None,
            turn_idx: 0,
            round: 1,
            events: VecDeque::new(),
            settings,
        }
    }
}

impl GameData {
    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.turn_idx]
    }

    fn current_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.turn_idx]
    }

    fn push_event(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    fn take_events(&mut self) -> VecDeque<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Reshuffle a fresh deck, redeal every hand, clear the discard
    /// pile, place a new table card, and hand the turn to
    /// `starting_idx`. Scores persist.
    fn start_round(&mut self, starting_idx: usize) {
        self.deck = Deck::shuffled();
        for player in &mut self.players {
            let hand = self.deck.deal(constants::HAND_SIZE);
            player.redeal(hand);
        }
        self.discard.clear();
        self.table_card = self.deck.take_front();
        self.turn_idx = starting_idx;
    }

    fn snapshot_base(&self, phase: Phase) -> GameSnapshot {
        GameSnapshot {
            phase,
            round: self.round,
            total_rounds: self.settings.rounds,
            players: self.players.iter().map(PlayerSnapshot::from).collect(),
            table_card: self.table_card,
            cards_in_deck: self.deck.len(),
            cards_in_discard: self.discard.len(),
            turn: None,
            round_winner: None,
            winners: Vec::new(),
        }
    }
}

/// Trait for state management shared by every phase (events, views).
#[enum_dispatch]
pub trait StateManagement {
    /// Take all pending events, oldest first.
    fn drain_events(&mut self) -> VecDeque<GameEvent>;

    /// Read-only snapshot of the game for the presentation layer.
    #[must_use]
    fn snapshot(&self) -> GameSnapshot;
}

/// A game with data and the logic of its current phase.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Game<T> {
    pub data: GameData,
    pub state: T,
}

/// Result of a committed play.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayOutcome {
    pub cards_played: usize,
    /// The card now face up on the table.
    pub table_card: Card,
    /// Whether the play emptied the hand and ended the round.
    pub round_over: bool,
}

/// Result of a resolved call. The round ends either way.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CallOutcome {
    pub caller: PlayerId,
    pub successful: bool,
    pub caller_sum: u32,
    pub min_sum: u32,
}

impl Game<Setup> {
    #[must_use]
    pub fn new(settings: GameSettings) -> Self {
        Self {
            data: settings.into(),
            state: Setup::default(),
        }
    }

    /// Replace the pending settings. Validated at start.
    pub fn configure(&mut self, settings: GameSettings) {
        self.data.settings = settings;
    }

    /// Validate settings, seat the players, deal round one. On a
    /// rejection the setup state is handed back untouched.
    pub fn start(self) -> Result<Game<PlayerTurn>, (Self, ActionError)> {
        if let Err(err) = self.data.settings.validate() {
            return Err((self, err));
        }

        let mut data = self.data;
        let players: Vec<Player> = data
            .settings
            .player_names
            .iter()
            .enumerate()
            .map(|(seat, name)| Player::new(PlayerId(seat as u32), name.clone()))
            .collect();
        data.players = players;
        data.round = 1;
        data.start_round(0);

        data.push_event(GameEvent::RoundStarted { round: 1 });
        let starter = data.current_player().name.clone();
        data.push_event(GameEvent::TurnPassed(starter));

        Ok(Game {
            data,
            state: PlayerTurn::opening(),
        })
    }
}

impl Game<PlayerTurn> {
    /// Toggle a hand card in or out of the selection.
    pub fn select_card(&mut self, index: usize) -> ActionResult<SelectionOutcome> {
        let player = self.data.current_player();
        let outcome = rules::validate_selection(
            &self.state.selected,
            index,
            &player.hand,
            self.data.table_card,
            self.state.has_drawn,
            self.state.first_of_round,
        )?;
        match outcome {
            SelectionOutcome::Selected => {
                self.state.selected.insert(index);
            }
            SelectionOutcome::Deselected => {
                self.state.selected.remove(&index);
            }
        }
        Ok(outcome)
    }

    /// Draw the next card into the acting player's hand. One draw per
    /// turn; an exhausted deck rejects without touching anything.
    pub fn draw(&mut self) -> ActionResult<Card> {
        if self.state.has_drawn {
            return Err(ActionError::AlreadyDrawn);
        }
        let card = self
            .data
            .deck
            .draw(&mut self.data.discard)
            .ok_or(ActionError::DeckExhausted)?;
        self.state.has_drawn = true;
        let player = self.data.current_player_mut();
        player.hand.push(card);
        let name = player.name.clone();
        self.data.push_event(GameEvent::CardDrawn(name));
        Ok(card)
    }

    /// Play the selected cards. The old table card goes to the discard
    /// pile, the selected cards leave the hand highest index first, and
    /// the last card removed becomes the new table card. Emptying the
    /// hand scores and ends the round; otherwise the turn advances.
    pub fn play(mut self) -> (FaduState, ActionResult<PlayOutcome>) {
        let player = self.data.current_player();
        if let Err(err) = rules::validate_play(
            &self.state.selected,
            &player.hand,
            self.data.table_card,
            self.state.has_drawn,
            self.state.first_of_round,
        ) {
            return (self.into(), Err(err));
        }

        if let Some(table) = self.data.table_card.take() {
            self.data.discard.push(table);
        }

        let cards_played = self.state.selected.len();
        let mut last_removed = None;
        let turn_idx = self.data.turn_idx;
        let hand = &mut self.data.players[turn_idx].hand;
        // Highest index first so earlier removals don't shift later ones.
        for &index in self.state.selected.iter().rev() {
            last_removed = Some(hand.remove(index));
        }
        let Some(new_table) = last_removed else {
            return (self.into(), Err(ActionError::EmptySelection));
        };
        self.data.table_card = Some(new_table);

        let player = self.data.current_player();
        let name = player.name.clone();
        let emptied = player.hand.is_empty();
        self.data.push_event(GameEvent::CardsPlayed {
            name: name.clone(),
            count: cards_played,
        });

        let outcome = PlayOutcome {
            cards_played,
            table_card: new_table,
            round_over: emptied,
        };

        if emptied {
            let winner = {
                let player = self.data.current_player_mut();
                player.score += constants::EMPTY_HAND_SCORE;
                player.id
            };
            self.data.push_event(GameEvent::HandEmptied(name));
            (self.end_round(winner), Ok(outcome))
        } else {
            self.advance_turn();
            (self.into(), Ok(outcome))
        }
    }

    /// Claim the strictly lowest hand sum. A unique minimum pays the
    /// caller; otherwise the caller pays and every other player tied at
    /// the minimum collects. The round ends with the caller recorded as
    /// its winner either way.
    pub fn call(mut self) -> (FaduState, ActionResult<CallOutcome>) {
        if let Err(err) = rules::validate_call(self.state.has_drawn, self.state.first_of_round) {
            return (self.into(), Err(err));
        }

        let caller = self.data.current_player().id;
        let name = self.data.current_player().name.clone();
        let caller_sum = functional::hand_sum(&self.data.current_player().hand);
        let (min_sum, contenders) = functional::call_contenders(&self.data.players);
        let successful = contenders.len() == 1 && contenders[0] == caller;

        if successful {
            self.data.current_player_mut().score += constants::CALL_SUCCESS_SCORE;
            self.data.push_event(GameEvent::CallSucceeded {
                name,
                sum: caller_sum,
            });
        } else {
            self.data.current_player_mut().score -= constants::CALL_PENALTY;
            for player in &mut self.data.players {
                if player.id != caller && contenders.contains(&player.id) {
                    player.score += constants::CONTENDER_SCORE;
                }
            }
            self.data.push_event(GameEvent::CallFailed { name });
        }

        let outcome = CallOutcome {
            caller,
            successful,
            caller_sum,
            min_sum,
        };
        (self.end_round(caller), Ok(outcome))
    }

    fn advance_turn(&mut self) {
        self.data.turn_idx = (self.data.turn_idx + 1) % self.data.players.len();
        self.state = PlayerTurn::following();
        let next = self.data.current_player().name.clone();
        self.data.push_event(GameEvent::TurnPassed(next));
    }

    /// Record the round winner and move to [`RoundEnd`]. The round
    /// counter advances now for non-final rounds; the final round is
    /// flagged instead so advancing resolves to game end.
    fn end_round(mut self, winner: PlayerId) -> FaduState {
        let ended_round = self.data.round;
        let final_round = ended_round >= self.data.settings.rounds;
        let winner_name = self
            .data
            .players
            .iter()
            .find(|player| player.id == winner)
            .map(|player| player.name.clone())
            .unwrap_or_default();
        self.data.push_event(GameEvent::RoundEnded {
            round: ended_round,
            winner: winner_name,
        });
        if !final_round {
            self.data.round += 1;
        }
        FaduState::RoundEnd(Game {
            data: self.data,
            state: RoundEnd {
                winner,
                final_round,
            },
        })
    }
}

impl Game<RoundEnd> {
    #[must_use]
    pub fn winner(&self) -> PlayerId {
        self.state.winner
    }

    /// Acknowledge the round end: redeal the next round with last
    /// round's winner starting, or compute the final standings. The
    /// starting seat is looked up by the winner's id, never by their
    /// old array position.
    pub fn advance(mut self) -> FaduState {
        if self.state.final_round {
            let winners = functional::top_scorers(&self.data.players);
            let names = self
                .data
                .players
                .iter()
                .filter(|player| winners.contains(&player.id))
                .map(|player| player.name.clone())
                .collect();
            self.data.push_event(GameEvent::GameEnded(names));
            return FaduState::GameEnd(Game {
                data: self.data,
                state: GameEnd { winners },
            });
        }

        let starting_idx = self
            .data
            .players
            .iter()
            .position(|player| player.id == self.state.winner)
            .unwrap_or(0);
        self.data.start_round(starting_idx);
        self.data.push_event(GameEvent::RoundStarted {
            round: self.data.round,
        });
        let starter = self.data.current_player().name.clone();
        self.data.push_event(GameEvent::TurnPassed(starter));
        FaduState::PlayerTurn(Game {
            data: self.data,
            state: PlayerTurn::opening(),
        })
    }
}

impl Game<GameEnd> {
    /// Every player tied at the maximum score.
    #[must_use]
    pub fn winners(&self) -> &[PlayerId] {
        &self.state.winners
    }
}

impl StateManagement for Game<Setup> {
    fn drain_events(&mut self) -> VecDeque<GameEvent> {
        self.data.take_events()
    }

    fn snapshot(&self) -> GameSnapshot {
        self.data.snapshot_base(Phase::Setup)
    }
}

impl StateManagement for Game<PlayerTurn> {
    fn drain_events(&mut self) -> VecDeque<GameEvent> {
        self.data.take_events()
    }

    fn snapshot(&self) -> GameSnapshot {
        let player = self.data.current_player();
        let mut snapshot = self.data.snapshot_base(Phase::PlayerTurn);
        snapshot.turn = Some(TurnSnapshot {
            player: player.id,
            name: player.name.clone(),
            hand: player.hand.clone(),
            selected: self.state.selected.clone(),
            has_drawn: self.state.has_drawn,
            first_of_round: self.state.first_of_round,
        });
        snapshot
    }
}

impl StateManagement for Game<RoundEnd> {
    fn drain_events(&mut self) -> VecDeque<GameEvent> {
        self.data.take_events()
    }

    fn snapshot(&self) -> GameSnapshot {
        let mut snapshot = self.data.snapshot_base(Phase::RoundEnd);
        snapshot.round_winner = Some(self.state.winner);
        snapshot
    }
}

impl StateManagement for Game<GameEnd> {
    fn drain_events(&mut self) -> VecDeque<GameEvent> {
        self.data.take_events()
    }

    fn snapshot(&self) -> GameSnapshot {
        let mut snapshot = self.data.snapshot_base(Phase::GameEnd);
        snapshot.winners = self.state.winners.clone();
        snapshot
    }
}

/// The phase enum the presentation layer drives. Exactly one action is
/// processed at a time; each verb validates, then commits or leaves the
/// state untouched.
#[enum_dispatch(StateManagement)]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum FaduState {
    Setup(Game<Setup>),
    PlayerTurn(Game<PlayerTurn>),
    RoundEnd(Game<RoundEnd>),
    GameEnd(Game<GameEnd>),
}

impl Default for FaduState {
    fn default() -> Self {
        Self::Setup(Game::new(GameSettings::default()))
    }
}

impl FaduState {
    #[must_use]
    pub fn new(settings: GameSettings) -> Self {
        Self::Setup(Game::new(settings))
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::Setup(_) => Phase::Setup,
            Self::PlayerTurn(_) => Phase::PlayerTurn,
            Self::RoundEnd(_) => Phase::RoundEnd,
            Self::GameEnd(_) => Phase::GameEnd,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        match self {
            Self::Setup(game) => &game.data.settings,
            Self::PlayerTurn(game) => &game.data.settings,
            Self::RoundEnd(game) => &game.data.settings,
            Self::GameEnd(game) => &game.data.settings,
        }
    }

    /// Replace the pending settings. Only legal before the game starts.
    pub fn configure(&mut self, settings: GameSettings) -> ActionResult<()> {
        match self {
            Self::Setup(game) => {
                game.configure(settings);
                Ok(())
            }
            _ => Err(ActionError::GameAlreadyStarted),
        }
    }

    /// Validate settings and deal the first round.
    pub fn start_game(&mut self) -> ActionResult<()> {
        match mem::take(self) {
            Self::Setup(setup) => match setup.start() {
                Ok(turn) => {
                    *self = turn.into();
                    Ok(())
                }
                Err((setup, err)) => {
                    *self = setup.into();
                    Err(err)
                }
            },
            other => {
                *self = other;
                Err(ActionError::GameAlreadyStarted)
            }
        }
    }

    pub fn select_card(&mut self, index: usize) -> ActionResult<SelectionOutcome> {
        match self {
            Self::PlayerTurn(turn) => turn.select_card(index),
            _ => Err(ActionError::NoTurnInProgress),
        }
    }

    pub fn draw(&mut self) -> ActionResult<Card> {
        match self {
            Self::PlayerTurn(turn) => turn.draw(),
            _ => Err(ActionError::NoTurnInProgress),
        }
    }

    pub fn play(&mut self) -> ActionResult<PlayOutcome> {
        match mem::take(self) {
            Self::PlayerTurn(turn) => {
                let (next, result) = turn.play();
                *self = next;
                result
            }
            other => {
                *self = other;
                Err(ActionError::NoTurnInProgress)
            }
        }
    }

    pub fn call(&mut self) -> ActionResult<CallOutcome> {
        match mem::take(self) {
            Self::PlayerTurn(turn) => {
                let (next, result) = turn.call();
                *self = next;
                result
            }
            other => {
                *self = other;
                Err(ActionError::NoTurnInProgress)
            }
        }
    }

    /// Acknowledge a round end: next round or final standings.
    pub fn advance_round(&mut self) -> ActionResult<()> {
        match mem::take(self) {
            Self::RoundEnd(end) => {
                *self = end.advance();
                Ok(())
            }
            other => {
                *self = other;
                Err(ActionError::RoundNotEnded)
            }
        }
    }

    /// Discard all game state and return to setup. Player count and
    /// round count persist; seat names reset to their defaults.
    pub fn reset(&mut self) {
        let settings = GameSettings::with_player_count(
            self.settings().player_names.len(),
            self.settings().rounds,
        );
        *self = Self::Setup(Game::new(settings));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{Rank, Suit};

    fn card(rank: Rank) -> Card {
        Card(rank, Suit::Clubs)
    }

    fn started_game(players: usize, rounds: u32) -> FaduState {
        let mut state = FaduState::new(GameSettings::with_player_count(players, rounds));
        state.start_game().unwrap();
        state
    }

    /// Overwrite the running game with a deterministic table: one hand
    /// per player, a table card, and a stacked deck.
    fn rig(state: &mut FaduState, hands: &[&[Rank]], table: Rank, deck: &[Rank]) {
        let FaduState::PlayerTurn(turn) = state else {
            panic!("expected a turn in progress");
        };
        for (player, ranks) in turn.data.players.iter_mut().zip(hands) {
            player.hand = ranks.iter().map(|&rank| card(rank)).collect();
        }
        turn.data.table_card = Some(Card(table, Suit::Hearts));
        turn.data.deck = Deck::from_cards(deck.iter().map(|&rank| Card(rank, Suit::Diamonds)));
        turn.data.discard.clear();
    }

    fn mark_drawn(state: &mut FaduState) {
        let FaduState::PlayerTurn(turn) = state else {
            panic!("expected a turn in progress");
        };
        turn.state.has_drawn = true;
        turn.state.first_of_round = false;
    }

    /// Pretend the round opener already finished: the acting player is
    /// mid-round, nothing drawn yet.
    fn mark_midround(state: &mut FaduState) {
        let FaduState::PlayerTurn(turn) = state else {
            panic!("expected a turn in progress");
        };
        turn.state.first_of_round = false;
    }

    fn scores(state: &FaduState) -> Vec<i32> {
        state
            .snapshot()
            .players
            .iter()
            .map(|player| player.score)
            .collect()
    }

    // === Start Tests ===

    #[test]
    fn test_start_deals_five_cards_each_and_a_table_card() {
        let state = started_game(3, 5);
        let snapshot = state.snapshot();

        assert_eq!(snapshot.phase, Phase::PlayerTurn);
        assert_eq!(snapshot.round, 1);
        assert!(snapshot.table_card.is_some());
        assert_eq!(snapshot.cards_in_deck, 52 - 3 * 5 - 1);
        assert_eq!(snapshot.cards_in_discard, 0);
        for player in &snapshot.players {
            assert_eq!(player.cards_held, 5);
        }

        let turn = snapshot.turn.expect("turn context");
        assert!(turn.first_of_round);
        assert!(!turn.has_drawn);
        assert!(turn.selected.is_empty());
    }

    #[test]
    fn test_start_rejects_bad_settings() {
        let mut state = FaduState::new(GameSettings::with_player_count(1, 5));
        assert_eq!(state.start_game(), Err(ActionError::NotEnoughPlayers));
        assert_eq!(state.phase(), Phase::Setup);

        state.configure(GameSettings::with_player_count(2, 0)).unwrap();
        assert_eq!(state.start_game(), Err(ActionError::NotEnoughRounds));

        state.configure(GameSettings::with_player_count(9, 5)).unwrap();
        assert_eq!(state.start_game(), Err(ActionError::TooManyPlayers));
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut state = started_game(2, 5);
        assert_eq!(state.start_game(), Err(ActionError::GameAlreadyStarted));
        assert_eq!(state.phase(), Phase::PlayerTurn);
    }

    // === Draw Tests ===

    #[test]
    fn test_draw_once_per_turn() {
        let mut state = started_game(2, 5);

        state.draw().unwrap();
        let snapshot = state.snapshot();
        assert_eq!(snapshot.turn.as_ref().map(|t| t.hand.len()), Some(6));
        assert!(snapshot.turn.unwrap().has_drawn);

        assert_eq!(state.draw(), Err(ActionError::AlreadyDrawn));
    }

    #[test]
    fn test_draw_from_exhausted_piles_changes_nothing() {
        let mut state = started_game(2, 5);
        rig(&mut state, &[&[Rank::Two], &[Rank::Three]], Rank::King, &[]);

        let before = state.clone();
        assert_eq!(state.draw(), Err(ActionError::DeckExhausted));
        assert_eq!(state, before);
    }

    #[test]
    fn test_draw_recycles_discard_into_deck() {
        let mut state = started_game(2, 5);
        rig(
            &mut state,
            &[&[Rank::Two], &[Rank::Three]],
            Rank::King,
            &[Rank::Four],
        );
        let FaduState::PlayerTurn(turn) = &mut state else {
            panic!("expected a turn in progress");
        };
        turn.data.discard = vec![card(Rank::Five), card(Rank::Six)];

        let drawn = state.draw().unwrap();

        assert_eq!(drawn, Card(Rank::Four, Suit::Diamonds));
        let snapshot = state.snapshot();
        assert_eq!(snapshot.cards_in_discard, 0);
        assert_eq!(snapshot.cards_in_deck, 2);
    }

    // === Play Tests ===

    #[test]
    fn test_play_moves_table_card_to_discard() {
        let mut state = started_game(2, 5);
        rig(
            &mut state,
            &[&[Rank::Nine, Rank::Two], &[Rank::Three]],
            Rank::King,
            &[Rank::Four],
        );
        mark_drawn(&mut state);

        state.select_card(0).unwrap();
        let outcome = state.play().unwrap();

        assert_eq!(outcome.cards_played, 1);
        assert_eq!(outcome.table_card, card(Rank::Nine));
        assert!(!outcome.round_over);

        let snapshot = state.snapshot();
        assert_eq!(snapshot.table_card, Some(card(Rank::Nine)));
        assert_eq!(snapshot.cards_in_discard, 1);
        // Turn advanced to the other player with a clean context.
        let turn = snapshot.turn.expect("turn context");
        assert_eq!(turn.player, PlayerId(1));
        assert!(!turn.has_drawn);
        assert!(!turn.first_of_round);
        assert!(turn.selected.is_empty());
    }

    #[test]
    fn test_play_multiple_removes_by_descending_index() {
        let mut state = started_game(2, 5);
        rig(
            &mut state,
            &[
                &[Rank::King, Rank::Two, Rank::King, Rank::Five],
                &[Rank::Three],
            ],
            Rank::King,
            &[Rank::Four],
        );
        mark_midround(&mut state);

        // Matching obligation path: no draw needed for kings on a king.
        state.select_card(0).unwrap();
        state.select_card(2).unwrap();
        let outcome = state.play().unwrap();

        assert_eq!(outcome.cards_played, 2);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.players[0].cards_held, 2);
        assert_eq!(snapshot.table_card, Some(card(Rank::King)));
    }

    #[test]
    fn test_play_rejection_leaves_state_unchanged() {
        let mut state = started_game(2, 5);
        rig(
            &mut state,
            &[&[Rank::Nine, Rank::Two], &[Rank::Three]],
            Rank::King,
            &[Rank::Four],
        );

        let before = state.clone();
        // First of round, nothing drawn, nothing selected.
        assert_eq!(state.play(), Err(ActionError::EmptySelection));
        assert_eq!(state, before);
    }

    #[test]
    fn test_emptying_hand_scores_and_ends_round() {
        let mut state = started_game(2, 5);
        rig(
            &mut state,
            &[&[Rank::Nine], &[Rank::Three]],
            Rank::King,
            &[Rank::Four],
        );
        mark_drawn(&mut state);

        state.select_card(0).unwrap();
        let outcome = state.play().unwrap();

        assert!(outcome.round_over);
        assert_eq!(state.phase(), Phase::RoundEnd);
        assert_eq!(scores(&state), vec![constants::EMPTY_HAND_SCORE, 0]);
        assert_eq!(state.snapshot().round_winner, Some(PlayerId(0)));
    }

    // === Call Tests ===

    #[test]
    fn test_call_with_unique_minimum_pays_caller() {
        let mut state = started_game(3, 5);
        rig(
            &mut state,
            &[
                &[Rank::Three, Rank::Four],       // 7
                &[Rank::Four, Rank::Five],        // 9
                &[Rank::Two, Rank::Three, Rank::Four], // 9
            ],
            Rank::King,
            &[Rank::Four],
        );
        mark_midround(&mut state);

        let outcome = state.call().unwrap();

        assert!(outcome.successful);
        assert_eq!(outcome.caller_sum, 7);
        assert_eq!(outcome.min_sum, 7);
        assert_eq!(scores(&state), vec![constants::CALL_SUCCESS_SCORE, 0, 0]);
        assert_eq!(state.phase(), Phase::RoundEnd);
        assert_eq!(state.snapshot().round_winner, Some(PlayerId(0)));
    }

    #[test]
    fn test_call_with_tied_minimum_pays_the_field() {
        let mut state = started_game(3, 5);
        rig(
            &mut state,
            &[
                &[Rank::Three, Rank::Four], // 7 (caller)
                &[Rank::Seven],             // 7
                &[Rank::Nine],              // 9
            ],
            Rank::King,
            &[Rank::Four],
        );
        mark_midround(&mut state);

        let outcome = state.call().unwrap();

        assert!(!outcome.successful);
        assert_eq!(
            scores(&state),
            vec![-constants::CALL_PENALTY, constants::CONTENDER_SCORE, 0]
        );
        // The caller is recorded as round winner despite the failed call.
        assert_eq!(state.snapshot().round_winner, Some(PlayerId(0)));
    }

    #[test]
    fn test_call_after_drawing_is_rejected() {
        let mut state = started_game(2, 5);
        state.draw().unwrap();

        let before = state.clone();
        assert_eq!(state.call(), Err(ActionError::CallAfterDrawForbidden));
        assert_eq!(state, before);
    }

    // === Round and Game End Tests ===

    #[test]
    fn test_round_restart_starts_with_winner_by_id() {
        let mut state = started_game(3, 5);
        // Hand the turn to the last seat, then have them call and win.
        let FaduState::PlayerTurn(turn) = &mut state else {
            panic!("expected a turn in progress");
        };
        turn.data.turn_idx = 2;
        turn.state.first_of_round = false;
        rig(
            &mut state,
            &[&[Rank::Nine], &[Rank::Nine], &[Rank::Two]],
            Rank::King,
            &[Rank::Four],
        );

        state.call().unwrap();
        state.advance_round().unwrap();

        let snapshot = state.snapshot();
        assert_eq!(snapshot.round, 2);
        assert_eq!(snapshot.turn.as_ref().map(|t| t.player), Some(PlayerId(2)));
        assert!(snapshot.turn.unwrap().first_of_round);
        assert_eq!(snapshot.cards_in_discard, 0);
        for player in &snapshot.players {
            assert_eq!(player.cards_held, 5);
        }
    }

    #[test]
    fn test_final_round_advances_to_game_end_with_ties() {
        let mut state = started_game(3, 1);
        // Caller holds 3, the other two are tied at the minimum of 2,
        // so the call fails: caller 3-2=1, the others 9+1=10 apiece.
        rig(
            &mut state,
            &[&[Rank::Three], &[Rank::Two], &[Rank::Two]],
            Rank::King,
            &[Rank::Four],
        );
        mark_midround(&mut state);
        let FaduState::PlayerTurn(turn) = &mut state else {
            panic!("expected a turn in progress");
        };
        turn.data.players[0].score = 3;
        turn.data.players[1].score = 9;
        turn.data.players[2].score = 9;

        state.call().unwrap();
        assert_eq!(state.phase(), Phase::RoundEnd);
        assert_eq!(scores(&state), vec![1, 10, 10]);

        state.advance_round().unwrap();
        assert_eq!(state.phase(), Phase::GameEnd);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.winners, vec![PlayerId(1), PlayerId(2)]);
    }

    #[test]
    fn test_no_turns_accepted_after_game_end() {
        let mut state = started_game(2, 1);
        rig(&mut state, &[&[Rank::Two], &[Rank::Nine]], Rank::King, &[]);
        mark_midround(&mut state);
        state.call().unwrap();
        state.advance_round().unwrap();
        assert_eq!(state.phase(), Phase::GameEnd);

        assert_eq!(state.draw(), Err(ActionError::NoTurnInProgress));
        assert_eq!(state.select_card(0), Err(ActionError::NoTurnInProgress));
        assert_eq!(state.play(), Err(ActionError::NoTurnInProgress));
        assert_eq!(state.call(), Err(ActionError::NoTurnInProgress));
        assert_eq!(state.advance_round(), Err(ActionError::RoundNotEnded));
    }

    #[test]
    fn test_reset_returns_to_setup_and_keeps_shape() {
        let mut state = started_game(4, 7);
        state.reset();

        assert_eq!(state.phase(), Phase::Setup);
        assert_eq!(state.settings().player_names.len(), 4);
        assert_eq!(state.settings().rounds, 7);
        assert_eq!(state.settings().player_names[0], "Player 1");
    }

    // === Event Tests ===

    #[test]
    fn test_events_narrate_a_turn() {
        let mut state = started_game(2, 5);
        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::RoundStarted { round: 1 });
        assert!(matches!(events[1], GameEvent::TurnPassed(_)));

        state.draw().unwrap();
        let events = state.drain_events();
        assert_eq!(
            events[0],
            GameEvent::CardDrawn("Player 1".to_string())
        );
    }

    // === Conservation Tests ===

    #[test]
    fn test_all_52_cards_accounted_for_after_start() {
        let state = started_game(4, 5);
        let FaduState::PlayerTurn(turn) = &state else {
            panic!("expected a turn in progress");
        };
        let mut all: Vec<Card> = turn.data.deck.iter().copied().collect();
        all.extend(turn.data.discard.iter().copied());
        all.extend(turn.data.table_card);
        for player in &turn.data.players {
            all.extend(player.hand.iter().copied());
        }
        all.sort();
        all.dedup();
        assert_eq!(all.len(), constants::DECK_SIZE);
    }
}
