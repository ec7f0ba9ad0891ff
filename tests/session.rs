// Integration tests for the session state machine. These are native-friendly:
// no browser APIs, deterministic RNG, so they run under `cargo test` on the
// host.

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use word_match::game::session::{
    Card, Difficulty, GameStatus, MATCH_REWARD, Selection, SessionState, WordPair, format_elapsed,
};

fn pair(id: &str, en: &str, zh: &str) -> WordPair {
    WordPair {
        id: id.to_owned(),
        en: en.to_owned(),
        zh: zh.to_owned(),
        explanation: String::new(),
    }
}

fn sample_words(n: usize) -> Vec<WordPair> {
    (0..n)
        .map(|i| pair(&i.to_string(), &format!("word{i}"), &format!("词{i}")))
        .collect()
}

fn playing_session(words: Vec<WordPair>) -> SessionState {
    let mut state = SessionState::new();
    state.begin_loading(Difficulty::Middle);
    let mut rng = StdRng::seed_from_u64(7);
    state.start_playing(words, &mut rng);
    state
}

/// Both cards of every pair must always agree on their matched flag.
fn assert_pairs_in_sync(cards: &[Card]) {
    for card in cards {
        let sibling = cards
            .iter()
            .find(|c| c.pair_id == card.pair_id && c.id != card.id)
            .unwrap_or_else(|| panic!("card '{}' has no sibling", card.id));
        assert_eq!(
            card.is_matched, sibling.is_matched,
            "pair '{}' has diverging matched flags",
            card.pair_id
        );
    }
}

/// Drives one pair to a resolved match, asserting the protocol on the way.
fn match_pair(state: &mut SessionState, id: &str) {
    assert_eq!(state.select(&format!("en-{id}")), Selection::Pending);
    match state.select(&format!("zh-{id}")) {
        Selection::Matched { pair_id } => {
            state.resolve_match(&pair_id);
        }
        other => panic!("expected match for pair '{id}', got {other:?}"),
    }
    assert_pairs_in_sync(&state.cards);
}

#[test]
fn deck_has_two_cards_per_pair() {
    let state = playing_session(sample_words(8));
    assert_eq!(state.cards.len(), 2 * state.words.len());
    for word in &state.words {
        let en = state
            .cards
            .iter()
            .filter(|c| c.pair_id == word.id && c.content == word.en)
            .count();
        let zh = state
            .cards
            .iter()
            .filter(|c| c.pair_id == word.id && c.content == word.zh)
            .count();
        assert_eq!((en, zh), (1, 1), "pair '{}' misdealt", word.id);
    }
}

#[test]
fn shuffle_keeps_every_card_exactly_once() {
    let state = playing_session(sample_words(8));
    let ids: HashSet<&str> = state.cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids.len(), state.cards.len(), "duplicate card ids after deal");
    for word in &state.words {
        assert!(ids.contains(format!("en-{}", word.id).as_str()));
        assert!(ids.contains(format!("zh-{}", word.id).as_str()));
    }
}

#[test]
fn single_pair_match_finishes_the_session() {
    let mut state = playing_session(vec![pair("1", "Apple", "苹果")]);
    assert_eq!(state.select("en-1"), Selection::Pending);
    let outcome = state.select("zh-1");
    let Selection::Matched { pair_id } = outcome else {
        panic!("expected a match, got {outcome:?}");
    };
    assert_eq!(pair_id, "1");
    // Both cards stay highlighted during the feedback window.
    assert!(state.is_selected("en-1"));
    assert!(state.is_selected("zh-1"));
    let finished = state.resolve_match(&pair_id);
    assert!(finished);
    assert!(state.cards.iter().all(|c| c.is_matched));
    assert_eq!(state.score, MATCH_REWARD);
    assert_eq!(state.status, GameStatus::Finished);
    assert_eq!(state.selection_len(), 0);
}

#[test]
fn same_side_cards_never_match() {
    let mut state = playing_session(vec![pair("1", "Apple", "苹果"), pair("2", "River", "河流")]);
    assert_eq!(state.select("en-1"), Selection::Pending);
    assert_eq!(state.select("en-2"), Selection::Mismatched);
    state.clear_selection();
    assert_eq!(state.score, 0);
    assert_eq!(state.status, GameStatus::Playing);
    // Both cards are selectable again after the reset.
    assert_eq!(state.select("en-1"), Selection::Pending);
}

#[test]
fn different_pairs_mismatch_without_penalty() {
    let mut state = playing_session(sample_words(3));
    assert_eq!(state.select("en-0"), Selection::Pending);
    assert_eq!(state.select("zh-1"), Selection::Mismatched);
    state.clear_selection();
    assert_eq!(state.score, 0);
    assert!(state.cards.iter().all(|c| !c.is_matched));
}

#[test]
fn third_card_is_blocked_while_resolution_is_pending() {
    let mut state = playing_session(sample_words(3));
    assert_eq!(state.select("en-0"), Selection::Pending);
    assert_eq!(state.select("zh-1"), Selection::Mismatched);
    // Two cards are locked in; nothing else may join until they clear.
    assert_eq!(state.select("en-2"), Selection::Ignored);
    assert_eq!(state.selection_len(), 2);
    state.clear_selection();
    assert_eq!(state.select("en-2"), Selection::Pending);
}

#[test]
fn matched_and_duplicate_cards_are_ignored() {
    let mut state = playing_session(sample_words(2));
    // Duplicate pick of the pending card.
    assert_eq!(state.select("en-0"), Selection::Pending);
    assert_eq!(state.select("en-0"), Selection::Ignored);
    assert_eq!(state.selection_len(), 1);
    match state.select("zh-0") {
        Selection::Matched { pair_id } => {
            state.resolve_match(&pair_id);
        }
        other => panic!("expected match, got {other:?}"),
    }
    // Matched cards never re-enter the selection.
    assert_eq!(state.select("en-0"), Selection::Ignored);
    assert_eq!(state.select("zh-0"), Selection::Ignored);
    assert_eq!(state.selection_len(), 0);
}

#[test]
fn score_equals_reward_times_pairs_after_full_clear() {
    let mut state = playing_session(sample_words(8));
    for i in 0..8 {
        match_pair(&mut state, &i.to_string());
    }
    assert_eq!(state.score, MATCH_REWARD * 8);
    assert_eq!(state.status, GameStatus::Finished);
}

#[test]
fn completion_happens_only_when_every_card_is_matched() {
    let mut state = playing_session(sample_words(2));
    match_pair(&mut state, "0");
    assert_eq!(state.status, GameStatus::Playing, "one pair left, not done");
    match_pair(&mut state, "1");
    assert_eq!(state.status, GameStatus::Finished);
}

#[test]
fn finished_session_ignores_further_input() {
    let mut state = playing_session(sample_words(1));
    match_pair(&mut state, "0");
    assert_eq!(state.status, GameStatus::Finished);
    let score = state.score;
    assert_eq!(state.select("en-0"), Selection::Ignored);
    assert!(!state.resolve_match("0"));
    state.tick();
    assert_eq!(state.score, score);
    assert_eq!(state.elapsed_seconds, 0);
}

#[test]
fn tick_accrues_time_only_while_playing() {
    let mut state = SessionState::new();
    state.tick();
    assert_eq!(state.elapsed_seconds, 0, "idle sessions have no clock");

    let mut state = playing_session(sample_words(2));
    state.tick();
    state.tick();
    assert_eq!(state.elapsed_seconds, 2);

    state.abort();
    state.tick();
    assert_eq!(state.elapsed_seconds, 0, "clock stops after abort");
}

#[test]
fn abort_discards_the_play_through() {
    let mut state = playing_session(sample_words(4));
    assert_eq!(state.select("en-0"), Selection::Pending);
    state.tick();
    state.abort();
    assert_eq!(state.status, GameStatus::Idle);
    assert!(state.cards.is_empty());
    assert!(state.words.is_empty());
    assert_eq!(state.selection_len(), 0);
    assert_eq!(state.elapsed_seconds, 0);
    assert_eq!(state.score, 0);
}

#[test]
fn selecting_while_loading_is_ignored() {
    let mut state = SessionState::new();
    state.begin_loading(Difficulty::High);
    assert_eq!(state.status, GameStatus::Loading);
    assert_eq!(state.select("en-1"), Selection::Ignored);
}

#[test]
fn replay_difficulty_survives_the_session() {
    let mut state = playing_session(sample_words(1));
    assert_eq!(state.difficulty, Difficulty::Middle);
    match_pair(&mut state, "0");
    // The finished screen re-requests with the recorded difficulty.
    assert_eq!(state.difficulty, Difficulty::Middle);
}

#[test]
fn elapsed_time_formats_as_minutes_and_padded_seconds() {
    assert_eq!(format_elapsed(0), "0:00");
    assert_eq!(format_elapsed(59), "0:59");
    assert_eq!(format_elapsed(60), "1:00");
    assert_eq!(format_elapsed(65), "1:05");
    assert_eq!(format_elapsed(600), "10:00");
}
