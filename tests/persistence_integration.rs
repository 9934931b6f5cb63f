//! Integration tests for saving, resuming, and storage failure.
//!
//! The in-memory game must stay authoritative and playable no matter
//! what the storage collaborator does.

use anyhow::anyhow;

use fadu::{
    FaduState, GameSession, GameSettings, MemoryStorage, NullFeedback, Phase, Rank, Storage,
    Suit, constants::SAVED_STATE_KEY, entities::Card,
};

/// Storage that refuses every operation.
#[derive(Clone, Copy, Debug, Default)]
struct BrokenStorage;

impl Storage for BrokenStorage {
    fn get(&self, _key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Err(anyhow!("storage unavailable"))
    }

    fn set(&mut self, _key: &str, _value: &[u8]) -> anyhow::Result<()> {
        Err(anyhow!("storage unavailable"))
    }

    fn remove(&mut self, _key: &str) -> anyhow::Result<()> {
        Err(anyhow!("storage unavailable"))
    }
}

/// Put the session's acting player in a mid-round spot where a call
/// wins outright.
fn stage_winning_call(session: &mut GameSession<MemoryStorage, NullFeedback>) {
    let FaduState::PlayerTurn(turn) = session.state_mut() else {
        panic!("expected a turn in progress");
    };
    turn.state.first_of_round = false;
    let acting = turn.data.turn_idx;
    for (seat, player) in turn.data.players.iter_mut().enumerate() {
        player.hand = if seat == acting {
            vec![Card(Rank::Ace, Suit::Clubs)]
        } else {
            vec![Card(Rank::King, Suit::Spades), Card(Rank::King, Suit::Hearts)]
        };
    }
}

#[test]
fn test_saved_game_resumes_mid_round() {
    let written = {
        let mut session = GameSession::new(MemoryStorage::new(), NullFeedback);
        session
            .configure(GameSettings::with_player_count(3, 4))
            .unwrap();
        session.start_game().unwrap();
        session.draw().unwrap();
        session.select_card(0).unwrap();
        session.save_now().unwrap();
        session.storage().clone()
    };

    let mut resumed = GameSession::new(written, NullFeedback);
    assert!(resumed.was_restored());
    assert_eq!(resumed.phase(), Phase::PlayerTurn);

    let snapshot = resumed.snapshot();
    assert_eq!(snapshot.players.len(), 3);
    assert_eq!(snapshot.total_rounds, 4);
    let turn = snapshot.turn.expect("turn context");
    assert!(turn.has_drawn);
    assert!(turn.first_of_round);
    assert_eq!(turn.hand.len(), 6);
    assert!(turn.selected.contains(&0));

    // The restored game is playable: finish the staged play.
    resumed.play().unwrap();
}

#[test]
fn test_no_save_means_fresh_setup() {
    let session = GameSession::new(MemoryStorage::new(), NullFeedback);
    assert!(!session.was_restored());
    assert_eq!(session.phase(), Phase::Setup);
}

#[test]
fn test_corrupt_save_is_ignored() {
    let mut storage = MemoryStorage::new();
    storage
        .set(SAVED_STATE_KEY, b"definitely not a game")
        .unwrap();

    let session = GameSession::new(storage, NullFeedback);
    assert!(!session.was_restored());
    assert_eq!(session.phase(), Phase::Setup);
}

#[test]
fn test_broken_storage_never_blocks_play() {
    let mut session = GameSession::new(BrokenStorage, NullFeedback);
    session.start_game().unwrap();

    // The save failed but is only reported, not enforced.
    assert!(session.last_save_error().is_some());
    assert_eq!(session.phase(), Phase::PlayerTurn);

    session.draw().unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.turn.expect("turn context").hand.len(), 6);
}

#[test]
fn test_game_end_clears_the_save() {
    let mut session = GameSession::new(MemoryStorage::new(), NullFeedback);
    session
        .configure(GameSettings::with_player_count(2, 1))
        .unwrap();
    session.start_game().unwrap();

    stage_winning_call(&mut session);
    session.call().unwrap();
    assert_eq!(session.phase(), Phase::RoundEnd);
    assert!(session.storage().contains(SAVED_STATE_KEY));

    session.advance_round().unwrap();
    assert_eq!(session.phase(), Phase::GameEnd);
    assert!(!session.storage().contains(SAVED_STATE_KEY));
}

#[test]
fn test_discarding_a_restored_game_clears_it() {
    let written = {
        let mut session = GameSession::new(MemoryStorage::new(), NullFeedback);
        session.start_game().unwrap();
        session.storage().clone()
    };
    assert!(written.contains(SAVED_STATE_KEY));

    let mut resumed = GameSession::new(written, NullFeedback);
    assert!(resumed.was_restored());

    resumed.discard_saved_game();
    assert!(!resumed.was_restored());
    assert_eq!(resumed.phase(), Phase::Setup);
    assert!(!resumed.storage().contains(SAVED_STATE_KEY));
}

#[test]
fn test_reset_clears_the_save() {
    let mut session = GameSession::new(MemoryStorage::new(), NullFeedback);
    session.start_game().unwrap();
    assert!(session.storage().contains(SAVED_STATE_KEY));

    session.reset();
    assert_eq!(session.phase(), Phase::Setup);
    assert!(!session.storage().contains(SAVED_STATE_KEY));
}
