//! DOM presentation.
//!
//! Stateless renderer: every function reads the current session and rewrites
//! the `#wm-root` subtree. Interaction flows back through a single delegated
//! click listener installed by the controller, keyed off `data-` attributes
//! emitted here, so this module holds no state and no closures.

use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use super::session::{CardSide, Difficulty, GameStatus, SessionState};

pub const ROOT_ID: &str = "wm-root";
const CLOCK_ID: &str = "wm-clock";

const CARD_GRID_STYLE: &str = "display:grid; grid-template-columns:repeat(4, minmax(0,1fr)); \
     gap:14px; margin-top:18px;";
const BUTTON_STYLE: &str = "padding:12px 18px; border-radius:12px; border:2px solid #c7d2fe; \
     background:#eef2ff; color:#3730a3; font-size:16px; font-weight:600; cursor:pointer;";

/// Gets or creates the root container the whole game renders into.
pub fn ensure_root(document: &Document) -> Result<Element, JsValue> {
    if let Some(el) = document.get_element_by_id(ROOT_ID) {
        return Ok(el);
    }
    let root = document.create_element("div")?;
    root.set_id(ROOT_ID);
    root.set_attribute(
        "style",
        "max-width:920px; margin:0 auto; padding:28px 16px; \
         font-family:'Noto Sans SC', 'PingFang SC', sans-serif; color:#1e293b;",
    )?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;
    body.append_child(&root)?;
    Ok(root)
}

/// Full re-render of the screen for the session's current status.
pub fn render(document: &Document, state: &SessionState) -> Result<(), JsValue> {
    let root = ensure_root(document)?;
    let html = match state.status {
        GameStatus::Idle => idle_html(),
        GameStatus::Loading => loading_html(),
        GameStatus::Playing => playing_html(state),
        GameStatus::Finished => finished_html(state),
    };
    root.set_inner_html(&html);
    Ok(())
}

/// Cheap per-tick clock update; avoids re-rendering the whole board.
pub fn update_clock(document: &Document, state: &SessionState) {
    if let Some(el) = document.get_element_by_id(CLOCK_ID) {
        el.set_text_content(Some(&state.format_elapsed()));
    }
}

fn header_html() -> String {
    "<header style='text-align:center; margin-bottom:28px;'>\
       <h1 style='font-size:32px; color:#312e81; margin:0 0 6px;'>英语单词连连看</h1>\
       <p style='color:#64748b; margin:0;'>通过趣味匹配，轻松掌握英语词汇</p>\
     </header>"
        .to_owned()
}

fn idle_html() -> String {
    let mut buttons = String::new();
    for difficulty in Difficulty::ALL {
        buttons.push_str(&format!(
            "<button data-difficulty='{key}' style='display:block; width:100%; \
             text-align:left; padding:16px 22px; margin-bottom:10px; border-radius:14px; \
             border:2px solid #e2e8f0; background:#fff; color:#334155; font-size:17px; \
             font-weight:600; cursor:pointer;'>{label}</button>",
            key = difficulty.key(),
            label = escape(difficulty.label()),
        ));
    }
    format!(
        "{header}<section style='max-width:420px; margin:0 auto;'>\
           <h2 style='text-align:center; color:#334155;'>选择游戏难度</h2>{buttons}\
         </section>",
        header = header_html(),
    )
}

fn loading_html() -> String {
    format!(
        "{header}<section style='text-align:center; padding:60px 0; color:#4338ca; \
         font-size:18px; font-weight:600;'>正在为你准备单词...</section>",
        header = header_html(),
    )
}

fn playing_html(state: &SessionState) -> String {
    let mut cards = String::new();
    for card in &state.cards {
        cards.push_str(&card_html(
            &card.id,
            &card.content,
            card.side,
            card.is_matched,
            state.is_selected(&card.id),
        ));
    }
    format!(
        "{header}\
         <section>\
           <div style='display:flex; justify-content:space-between; align-items:center; \
                background:#fff; padding:14px 18px; border-radius:14px; \
                box-shadow:0 1px 4px rgba(0,0,0,0.08);'>\
             <div style='display:flex; gap:32px;'>\
               <div><span style='font-size:12px; color:#94a3b8;'>分数</span><br/>\
                 <span style='font-size:22px; font-weight:700; color:#4f46e5;'>{score}</span></div>\
               <div><span style='font-size:12px; color:#94a3b8;'>用时</span><br/>\
                 <span id='{clock_id}' style='font-size:22px; font-weight:700; \
                 color:#334155;'>{clock}</span></div>\
             </div>\
             <button data-action='abort' style='border:none; background:none; color:#94a3b8; \
               font-size:14px; font-weight:600; cursor:pointer;'>退出游戏</button>\
           </div>\
           <div style='{grid}'>{cards}</div>\
         </section>",
        header = header_html(),
        score = state.score,
        clock_id = CLOCK_ID,
        clock = state.format_elapsed(),
        grid = CARD_GRID_STYLE,
    )
}

fn card_html(id: &str, content: &str, side: CardSide, matched: bool, selected: bool) -> String {
    if matched {
        return format!(
            "<div style='min-height:92px; display:flex; align-items:center; \
             justify-content:center; border-radius:12px; background:#f1f5f9; opacity:0.35;'>\
             <span style='color:#94a3b8; text-decoration:line-through;'>{content}</span></div>",
            content = escape(content),
        );
    }
    let border = if selected {
        "border:2px solid #4f46e5; background:#eef2ff; transform:scale(1.04);"
    } else {
        "border:2px solid #fff; background:#fff;"
    };
    let text = match side {
        CardSide::En => "color:#3730a3; font-size:19px;",
        CardSide::Zh => "color:#334155; font-size:17px;",
    };
    format!(
        "<button data-card-id='{id}' style='min-height:92px; border-radius:12px; \
         cursor:pointer; box-shadow:0 1px 3px rgba(0,0,0,0.08); transition:all 0.2s; \
         font-weight:600; {border} {text}'>{content}</button>",
        id = escape(id),
        content = escape(content),
    )
}

fn finished_html(state: &SessionState) -> String {
    let mut rows = String::new();
    for word in &state.words {
        rows.push_str(&format!(
            "<div style='background:#f8fafc; padding:10px 14px; border-radius:10px; \
             margin-bottom:6px; text-align:left;'>\
             <span style='font-weight:700; color:#4338ca;'>{en}</span>\
             <span style='color:#94a3b8; margin:0 8px;'>|</span>\
             <span style='color:#334155;'>{zh}</span>\
             <p style='font-size:12px; color:#94a3b8; margin:4px 0 0;'>{explanation}</p>\
             </div>",
            en = escape(&word.en),
            zh = escape(&word.zh),
            explanation = escape(&word.explanation),
        ));
    }
    format!(
        "{header}\
         <section style='max-width:640px; margin:0 auto; text-align:center; background:#fff; \
           padding:28px; border-radius:18px; box-shadow:0 4px 16px rgba(0,0,0,0.10);'>\
           <h2 style='color:#1e293b; margin-top:0;'>做得好！</h2>\
           <p style='color:#64748b;'>你用了 {clock} 完成了所有匹配，得分 {score}</p>\
           <div style='max-height:260px; overflow-y:auto; margin:18px 0;'>{rows}</div>\
           <div style='display:flex; gap:14px; justify-content:center;'>\
             <button data-action='change' style='{button}'>更换难度</button>\
             <button data-action='replay' style='{button} background:#4f46e5; \
               border-color:#4f46e5; color:#fff;'>再玩一次</button>\
           </div>\
         </section>",
        header = header_html(),
        clock = state.format_elapsed(),
        score = state.score,
        button = BUTTON_STYLE,
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
