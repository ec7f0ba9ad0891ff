//! Word Match core crate.
//!
//! Browser-based English/Chinese vocabulary matching game. The player picks a
//! difficulty tier, a generative word provider supplies eight word pairs, and
//! the pairs are dealt as a shuffled deck of sixteen cards to be matched
//! against a running clock and score. Session control, the word provider and
//! the DOM renderer live in the `game` module; this crate root exposes the
//! wasm entrypoint and the built-in fallback vocabulary used when the word
//! provider is unreachable.

use wasm_bindgen::prelude::*;

pub mod game;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

// -----------------------------------------------------------------------------
// Built-in fallback vocabulary
// Tuples are (english, chinese, short explanation). The fallback deck is drawn
// by cycling this table from the top, so order is part of the contract.
// -----------------------------------------------------------------------------

pub const FALLBACK_WORDS: &[(&str, &str, &str)] = &[
    ("Apple", "苹果", "A round fruit that grows on trees."),
    ("Banana", "香蕉", "A long yellow fruit with soft flesh."),
    ("Computer", "电脑", "A machine for storing and processing data."),
    ("Science", "科学", "The systematic study of the natural world."),
    ("Nature", "自然", "Everything in the world not made by people."),
    ("Library", "图书馆", "A building where books are kept for reading."),
    ("Pencil", "铅笔", "A writing tool with a graphite core."),
    ("Mountain", "山脉", "A very high hill, often with steep sides."),
    ("River", "河流", "A large stream of water flowing to the sea."),
    ("Teacher", "老师", "A person who helps students learn."),
    ("Friend", "朋友", "A person you know well and like."),
    ("Weather", "天气", "The state of the air, such as rain or sun."),
    ("Music", "音乐", "Sounds arranged to be pleasant to hear."),
    ("Garden", "花园", "A piece of ground for growing flowers."),
    ("Doctor", "医生", "A person trained to treat sick people."),
    ("Window", "窗户", "An opening in a wall that lets light in."),
];

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

/// Mounts the game UI into the document and shows the difficulty menu.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::run()
}
