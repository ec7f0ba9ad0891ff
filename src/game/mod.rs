//! Game session controller.
//!
//! Owns the per-session runtime, schedules browser timers, and routes word
//! provider results and DOM click events into the state machine. All state
//! lives in a thread-local slot and is mutated only from the browser's single
//! event loop. Timer and feedback-delay callbacks capture the generation they
//! were scheduled under and re-check it before touching state, so a callback
//! that outlives its session discards itself instead of corrupting the next
//! one.

pub mod provider;
pub mod session;
mod view;

use std::cell::Cell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, window};

use session::{
    Difficulty, MATCH_DELAY_MS, MISMATCH_DELAY_MS, PAIR_COUNT, Selection, SessionState,
    TICK_INTERVAL_MS,
};

/// Per-mount runtime: the owned session plus the browser resources attached
/// to it. Generation 0 means "no session started yet".
struct Runtime {
    session: SessionState,
    generation: u64,
    interval_id: Option<i32>,
    // Kept alive while the interval runs; dropped on cancel so the closure
    // memory is reclaimed instead of leaking per session.
    interval_closure: Option<Closure<dyn FnMut()>>,
}

impl Runtime {
    fn new() -> Self {
        Self {
            session: SessionState::new(),
            generation: 0,
            interval_id: None,
            interval_closure: None,
        }
    }
}

thread_local! {
    static RUNTIME: std::cell::RefCell<Option<Runtime>> = std::cell::RefCell::new(None);
    // Monotonic across the whole page lifetime, never reused even if the
    // game is re-mounted.
    static NEXT_GENERATION: Cell<u64> = const { Cell::new(1) };
}

fn next_generation() -> u64 {
    NEXT_GENERATION.with(|cell| {
        let generation = cell.get();
        cell.set(generation + 1);
        generation
    })
}

/// Mounts the game: ensures the root container, wires the delegated click
/// listener, and renders the difficulty menu. Idempotent across repeated
/// calls; an already-running session is left untouched.
pub fn run() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let root = view::ensure_root(&document)?;
    install_click_listener(&root)?;
    RUNTIME.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(Runtime::new());
        }
    });
    render_current();
    Ok(())
}

// --- State access helpers ----------------------------------------------------

fn with_runtime<R>(f: impl FnOnce(&mut Runtime) -> R) -> Option<R> {
    RUNTIME.with(|cell| cell.borrow_mut().as_mut().map(f))
}

/// Runs `f` only if the runtime still belongs to `generation`; a stale
/// callback (ended or replaced session) is dropped here.
fn with_generation<R>(generation: u64, f: impl FnOnce(&mut Runtime) -> R) -> Option<R> {
    RUNTIME.with(|cell| {
        let mut slot = cell.borrow_mut();
        match slot.as_mut() {
            Some(rt) if rt.generation == generation => Some(f(rt)),
            _ => None,
        }
    })
}

fn render_current() {
    let Some(document) = window().and_then(|w| w.document()) else {
        return;
    };
    RUNTIME.with(|cell| {
        if let Some(rt) = cell.borrow().as_ref() {
            if let Err(err) = view::render(&document, &rt.session) {
                log::error!("render failed: {err:?}");
            }
        }
    });
}

fn update_clock_display() {
    let Some(document) = window().and_then(|w| w.document()) else {
        return;
    };
    RUNTIME.with(|cell| {
        if let Some(rt) = cell.borrow().as_ref() {
            view::update_clock(&document, &rt.session);
        }
    });
}

// --- Event wiring ------------------------------------------------------------

/// One delegated listener on the root handles every button the renderer
/// emits, so per-card closures never accumulate across sessions.
fn install_click_listener(root: &Element) -> Result<(), JsValue> {
    if root.get_attribute("data-wm-wired").is_some() {
        return Ok(());
    }
    let closure = Closure::wrap(Box::new(move |event: web_sys::MouseEvent| {
        let Some(target) = event.target() else {
            return;
        };
        let Ok(element) = target.dyn_into::<Element>() else {
            return;
        };
        let Ok(Some(hit)) =
            element.closest("[data-card-id], [data-difficulty], [data-action]")
        else {
            return;
        };
        if let Some(card_id) = hit.get_attribute("data-card-id") {
            on_card_selected(&card_id);
        } else if let Some(key) = hit.get_attribute("data-difficulty") {
            if let Some(difficulty) = Difficulty::from_key(&key) {
                start_session(difficulty);
            }
        } else if let Some(action) = hit.get_attribute("data-action") {
            match action.as_str() {
                // Abort mid-play and "change difficulty" from the summary
                // both discard the session and return to the menu.
                "abort" | "change" => end_session(),
                "replay" => replay(),
                _ => {}
            }
        }
    }) as Box<dyn FnMut(_)>);
    root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    root.set_attribute("data-wm-wired", "1")?;
    Ok(())
}

// --- Session lifecycle -------------------------------------------------------

/// `idle/finished -> loading -> playing`: cancels whatever the previous
/// session left running, fetches a word set, and deals the deck once the
/// provider resolves (if this session is still the current one).
fn start_session(difficulty: Difficulty) {
    let Some(generation) = with_runtime(|rt| {
        cancel_interval(rt);
        rt.generation = next_generation();
        rt.session.begin_loading(difficulty);
        rt.generation
    }) else {
        return;
    };
    render_current();
    spawn_local(async move {
        let words = provider::fetch_word_pairs(difficulty, PAIR_COUNT).await;
        let started = with_generation(generation, |rt| {
            let mut rng = rand::thread_rng();
            rt.session.start_playing(words, &mut rng);
        });
        if started.is_some() {
            start_interval(generation);
            render_current();
        }
    });
}

fn end_session() {
    with_runtime(|rt| {
        cancel_interval(rt);
        // Invalidate any feedback delay still in flight.
        rt.generation = next_generation();
        rt.session.abort();
    });
    render_current();
}

fn replay() {
    if let Some(difficulty) = with_runtime(|rt| rt.session.difficulty) {
        start_session(difficulty);
    }
}

// --- Card selection ----------------------------------------------------------

fn on_card_selected(card_id: &str) {
    let Some((generation, outcome)) = with_runtime(|rt| {
        (rt.generation, rt.session.select(card_id))
    }) else {
        return;
    };
    match outcome {
        Selection::Ignored => {}
        Selection::Pending => render_current(),
        Selection::Matched { pair_id } => {
            render_current();
            schedule_timeout(MATCH_DELAY_MS, move || {
                let resolved = with_generation(generation, |rt| {
                    let finished = rt.session.resolve_match(&pair_id);
                    if finished {
                        // No further time accrues once the board is complete.
                        cancel_interval(rt);
                    }
                });
                if resolved.is_some() {
                    render_current();
                }
            });
        }
        Selection::Mismatched => {
            render_current();
            schedule_timeout(MISMATCH_DELAY_MS, move || {
                if with_generation(generation, |rt| rt.session.clear_selection()).is_some() {
                    render_current();
                }
            });
        }
    }
}

// --- Browser timers ----------------------------------------------------------

fn start_interval(generation: u64) {
    let Some(win) = window() else {
        return;
    };
    let closure = Closure::wrap(Box::new(move || {
        if with_generation(generation, |rt| rt.session.tick()).is_some() {
            update_clock_display();
        }
    }) as Box<dyn FnMut()>);
    if let Ok(id) = win
        .set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TICK_INTERVAL_MS,
        )
    {
        with_runtime(|rt| {
            rt.interval_id = Some(id);
            rt.interval_closure = Some(closure);
        });
    }
}

fn cancel_interval(rt: &mut Runtime) {
    if let Some(id) = rt.interval_id.take() {
        if let Some(win) = window() {
            win.clear_interval_with_handle(id);
        }
    }
    rt.interval_closure = None;
}

fn schedule_timeout(delay_ms: i32, callback: impl FnOnce() + 'static) {
    let Some(win) = window() else {
        return;
    };
    // once_into_js frees the closure after its single invocation.
    let cb = Closure::once_into_js(callback);
    if let Err(err) =
        win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay_ms)
    {
        log::error!("failed to schedule timeout: {err:?}");
    }
}
