//! Session state machine for the matching game.
//!
//! Everything here is plain Rust with no browser imports, so the game rules
//! run under native `cargo test`. The controller in the parent module owns a
//! [`SessionState`] and drives it from DOM events and timers; the renderer
//! only reads it.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

/// Number of word pairs requested for every session.
pub const PAIR_COUNT: usize = 8;
/// Points awarded per successfully matched pair.
pub const MATCH_REWARD: u32 = 10;
/// Feedback pause before a correct pair flips to matched.
pub const MATCH_DELAY_MS: i32 = 300;
/// Feedback pause before a wrong pair deselects.
pub const MISMATCH_DELAY_MS: i32 = 800;
/// Period of the elapsed-time tick.
pub const TICK_INTERVAL_MS: i32 = 1_000;

// --- Vocabulary & deck types -------------------------------------------------

/// Difficulty tiers offered on the start screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Difficulty {
    Primary,
    Middle,
    High,
    College,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Primary,
        Difficulty::Middle,
        Difficulty::High,
        Difficulty::College,
        Difficulty::Advanced,
    ];

    /// User-facing label, also sent verbatim to the word provider.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Primary => "小学英语",
            Difficulty::Middle => "初中词汇",
            Difficulty::High => "高中必备",
            Difficulty::College => "大学四六级",
            Difficulty::Advanced => "托福/雅思/GRE",
        }
    }

    /// Short ASCII name used in DOM `data-` attributes.
    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Primary => "primary",
            Difficulty::Middle => "middle",
            Difficulty::High => "high",
            Difficulty::College => "college",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn from_key(key: &str) -> Option<Difficulty> {
        Difficulty::ALL.into_iter().find(|d| d.key() == key)
    }
}

/// One vocabulary item as delivered by the word provider.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WordPair {
    pub id: String,
    pub en: String,
    pub zh: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CardSide {
    En,
    Zh,
}

/// One face of a word pair, independently selectable on the board.
/// `id` is unique per card; `pair_id` links the two sibling cards.
#[derive(Clone, Debug)]
pub struct Card {
    pub id: String,
    pub pair_id: String,
    pub content: String,
    pub side: CardSide,
    pub is_matched: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameStatus {
    Idle,
    Loading,
    Playing,
    Finished,
}

/// Result of feeding one card click into the session.
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    /// Click ignored: matched card, duplicate, resolution pending, or the
    /// session is not in play.
    Ignored,
    /// First card of an attempt is now highlighted, awaiting a second pick.
    Pending,
    /// Second card completed the pair. Caller applies the result via
    /// [`SessionState::resolve_match`] after the feedback delay.
    Matched { pair_id: String },
    /// Second card did not pair up. Caller releases the two cards via
    /// [`SessionState::clear_selection`] after the feedback delay.
    Mismatched,
}

// --- Session state -----------------------------------------------------------

/// Whole mutable state of one play-through. Replaced wholesale when a new
/// session starts and mutated only from the browser's single event loop.
#[derive(Debug)]
pub struct SessionState {
    pub status: GameStatus,
    pub difficulty: Difficulty,
    pub words: Vec<WordPair>,
    pub cards: Vec<Card>,
    selection: Vec<String>,
    pub elapsed_seconds: u32,
    pub score: u32,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            status: GameStatus::Idle,
            difficulty: Difficulty::Middle,
            words: Vec::new(),
            cards: Vec::new(),
            selection: Vec::new(),
            elapsed_seconds: 0,
            score: 0,
        }
    }

    /// `Idle`/`Finished` -> `Loading`: records the chosen difficulty while the
    /// word provider is in flight.
    pub fn begin_loading(&mut self, difficulty: Difficulty) {
        self.status = GameStatus::Loading;
        self.difficulty = difficulty;
    }

    /// `Loading` -> `Playing`: builds both cards of every pair, shuffles the
    /// deck, and resets score, clock and selection in one step.
    pub fn start_playing<R: Rng>(&mut self, words: Vec<WordPair>, rng: &mut R) {
        let mut cards = Vec::with_capacity(words.len() * 2);
        for pair in &words {
            cards.push(Card {
                id: format!("en-{}", pair.id),
                pair_id: pair.id.clone(),
                content: pair.en.clone(),
                side: CardSide::En,
                is_matched: false,
            });
            cards.push(Card {
                id: format!("zh-{}", pair.id),
                pair_id: pair.id.clone(),
                content: pair.zh.clone(),
                side: CardSide::Zh,
                is_matched: false,
            });
        }
        cards.shuffle(rng);
        self.words = words;
        self.cards = cards;
        self.selection.clear();
        self.elapsed_seconds = 0;
        self.score = 0;
        self.status = GameStatus::Playing;
    }

    /// The single mutating operation during play. Appends the card to the
    /// selection and, on the second pick, decides match or mismatch. The two
    /// highlighted cards stay locked in the selection until the caller
    /// resolves them, so no third card can join in the meantime.
    pub fn select(&mut self, card_id: &str) -> Selection {
        if self.status != GameStatus::Playing {
            return Selection::Ignored;
        }
        if self.selection.len() >= 2 {
            // A pair is waiting on its feedback delay.
            return Selection::Ignored;
        }
        let Some(card) = self.card(card_id) else {
            return Selection::Ignored;
        };
        if card.is_matched || self.is_selected(card_id) {
            return Selection::Ignored;
        }
        let id = card.id.clone();
        self.selection.push(id);
        if self.selection.len() < 2 {
            return Selection::Pending;
        }
        let matched_pair = match (self.card(&self.selection[0]), self.card(&self.selection[1])) {
            (Some(first), Some(second)) => {
                if first.pair_id == second.pair_id && first.side != second.side {
                    Some(first.pair_id.clone())
                } else {
                    None
                }
            }
            _ => None,
        };
        match matched_pair {
            Some(pair_id) => Selection::Matched { pair_id },
            None => Selection::Mismatched,
        }
    }

    /// Applies a confirmed match: flips both cards of the pair, awards the
    /// fixed reward, and releases the selection. Returns true when this match
    /// completed the board and the session transitioned to `Finished`.
    pub fn resolve_match(&mut self, pair_id: &str) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        for card in &mut self.cards {
            if card.pair_id == pair_id {
                card.is_matched = true;
            }
        }
        self.score += MATCH_REWARD;
        self.selection.clear();
        self.check_completion()
    }

    /// Releases a mismatched pair so both cards become selectable again.
    /// No score penalty.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Runs after every card mutation. Idempotent: once `Finished`, repeated
    /// calls neither restart the clock nor touch the score.
    fn check_completion(&mut self) -> bool {
        if self.status == GameStatus::Playing
            && !self.cards.is_empty()
            && self.cards.iter().all(|c| c.is_matched)
        {
            self.status = GameStatus::Finished;
            return true;
        }
        false
    }

    /// One-second clock tick; only accrues time while in play.
    pub fn tick(&mut self) {
        if self.status == GameStatus::Playing {
            self.elapsed_seconds += 1;
        }
    }

    /// User abort: discards the play-through and returns to the start screen.
    pub fn abort(&mut self) {
        self.status = GameStatus::Idle;
        self.words.clear();
        self.cards.clear();
        self.selection.clear();
        self.elapsed_seconds = 0;
        self.score = 0;
    }

    pub fn is_selected(&self, card_id: &str) -> bool {
        self.selection.iter().any(|id| id == card_id)
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// Elapsed time as `m:ss` with zero-padded seconds.
    pub fn format_elapsed(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }

    fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_elapsed(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
