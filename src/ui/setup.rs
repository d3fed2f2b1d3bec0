use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, MouseEvent};

use crate::dom_utils::create_with_class;
use crate::messages::Message;
use crate::state::dispatch_global_message;
use crate::storage::Session;

pub fn create_base_ui(document: &Document, session: &Session) -> Result<(), JsValue> {
    ensure_styles(document)?;

    let body = document.body().ok_or_else(|| JsValue::from_str("No body found"))?;

    // Header: title, user info, level goal, logout
    let header = create_with_class(document, "div", "header")?;
    header.set_id("header");

    let title = document.create_element("h1")?;
    title.set_text_content(Some("HackBlock"));
    header.append_child(&title)?;

    let user_display = create_with_class(document, "span", "user-display")?;
    user_display.set_id("user-display");
    user_display.set_text_content(Some(&session.username));
    header.append_child(&user_display)?;

    let level_display = create_with_class(document, "span", "level-display")?;
    level_display.set_id("level-display");
    level_display.set_text_content(Some(&format!("Level {}", session.level)));
    header.append_child(&level_display)?;

    let goal = create_with_class(document, "span", "level-goal")?;
    goal.set_id("level-goal");
    header.append_child(&goal)?;

    let logout = create_with_class(document, "button", "logout-button")?;
    logout.set_id("logout-button");
    logout.set_text_content(Some("Logout"));
    header.append_child(&logout)?;

    body.append_child(&header)?;

    // Toolbar
    let toolbar = create_with_class(document, "div", "toolbar")?;
    toolbar.set_id("toolbar");
    for (id, label) in [
        ("run-all-button", "Run All"),
        ("auto-chain-button", "Auto Chain"),
        ("import-pattern-button", "Import Pattern"),
        ("clear-button", "Clear"),
    ] {
        let button = create_with_class(document, "button", "toolbar-button")?;
        button.set_id(id);
        button.set_text_content(Some(label));
        toolbar.append_child(&button)?;
    }

    let answer_input = create_with_class(document, "input", "answer-input")?;
    answer_input.set_id("answer-input");
    answer_input.set_attribute("type", "text")?;
    answer_input.set_attribute("placeholder", "Level answer...")?;
    toolbar.append_child(&answer_input)?;

    let answer_submit = create_with_class(document, "button", "toolbar-button")?;
    answer_submit.set_id("answer-submit");
    answer_submit.set_text_content(Some("Submit Answer"));
    toolbar.append_child(&answer_submit)?;

    body.append_child(&toolbar)?;

    // Main area: palette on the left, canvas surface on the right
    let main = create_with_class(document, "div", "main-area")?;
    main.set_id("main-area");

    let palette = create_with_class(document, "aside", "command-palette")?;
    palette.set_id("command-palette");
    main.append_child(&palette)?;

    let canvas_container = create_with_class(document, "div", "canvas-container")?;
    canvas_container.set_id("canvas-container");
    main.append_child(&canvas_container)?;

    body.append_child(&main)?;

    // Terminal output panel
    let terminal = create_with_class(document, "div", "terminal")?;
    let terminal_output = create_with_class(document, "div", "terminal-output")?;
    terminal_output.set_id("terminal-output");
    terminal.append_child(&terminal_output)?;
    body.append_child(&terminal)?;

    render_permissions(document, session)?;

    Ok(())
}

fn render_permissions(document: &Document, session: &Session) -> Result<(), JsValue> {
    if session.permissions.is_empty() {
        return Ok(());
    }
    let Some(palette) = document.get_element_by_id("command-palette") else {
        return Ok(());
    };

    let section = create_with_class(document, "div", "user-permissions")?;
    section.set_id("user-permissions");
    for permission in &session.permissions {
        let item = create_with_class(document, "div", "permission-item")?;

        let number = create_with_class(document, "span", "permission-number")?;
        number.set_text_content(Some(&permission.number.to_string()));
        item.append_child(&number)?;

        let description = create_with_class(document, "span", "permission-description")?;
        description.set_text_content(Some(&permission.description));
        item.append_child(&description)?;

        section.append_child(&item)?;
    }
    palette.append_child(&section)?;
    Ok(())
}

/// Show the goal text for the current level once environments have loaded.
pub fn render_goal(goal: Option<&str>) {
    if let Some(el) = goal_element() {
        el.set_inner_html("");
        el.set_text_content(Some(goal.unwrap_or("No goal description for this level.")));
    }
}

/// Inline environment-load error with a manual retry control.
pub fn render_goal_error(message: &str) {
    let Some(el) = goal_element() else { return };
    el.set_inner_html("");

    let document = match web_sys::window().and_then(|w| w.document()) {
        Some(d) => d,
        None => return,
    };
    let text = match create_with_class(&document, "span", "goal-error") {
        Ok(t) => t,
        Err(_) => return,
    };
    text.set_text_content(Some(&format!("Could not load environments: {}", message)));
    let _ = el.append_child(&text);

    if let Ok(retry) = create_with_class(&document, "button", "goal-retry") {
        retry.set_text_content(Some("Retry"));
        let click = Closure::wrap(Box::new(move |_: MouseEvent| {
            dispatch_global_message(Message::ReloadEnvironments);
        }) as Box<dyn FnMut(_)>);
        if retry
            .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())
            .is_ok()
        {
            click.forget();
            let _ = el.append_child(&retry);
        }
    }
}

fn goal_element() -> Option<web_sys::Element> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("level-goal"))
}

fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id("app-styles").is_some() {
        return Ok(());
    }

    let css = "
body{margin:0;font-family:system-ui,-apple-system,sans-serif;background:#f5f6fa;color:#1e293b}
.header{display:flex;align-items:center;gap:16px;padding:8px 16px;background:#1e293b;color:#fff}
.header h1{font-size:18px;margin:0}
.level-goal{flex:1;font-size:13px;color:#cbd5e1}
.goal-error{color:#fca5a5;font-size:13px}
.toolbar{display:flex;gap:8px;padding:8px 16px;background:#334155}
.toolbar-button{padding:4px 12px;border:none;border-radius:4px;background:#475569;color:#fff;cursor:pointer}
.toolbar-button:hover{background:#64748b}
.answer-input{margin-left:auto;padding:4px 8px;border-radius:4px;border:1px solid #475569}
.main-area{display:flex;height:60vh}
.command-palette{width:260px;overflow-y:auto;background:#fff;border-right:1px solid #e2e8f0;padding:8px}
.palette-item{padding:8px;border:1px solid #e2e8f0;border-radius:6px;margin-bottom:6px;cursor:pointer}
.palette-item:hover{background:#f1f5f9}
.palette-item-name{font-weight:600;font-size:14px}
.palette-item-description{font-size:12px;color:#64748b}
.palette-error{padding:12px;color:#dc2626;font-size:13px}
.canvas-container{position:relative;flex:1;overflow:hidden;background:#f8fafc}
#connection-canvas{position:absolute;left:0;top:0;z-index:0}
.command-block{position:absolute;background:#fff;border:1px solid #cbd5e1;border-radius:8px;box-shadow:0 2px 4px rgba(0,0,0,.1);user-select:none}
.block-header{display:flex;align-items:center;gap:6px;padding:6px 8px;background:#e2e8f0;border-radius:8px 8px 0 0;cursor:move}
.block-title{flex:1;font-weight:600;font-size:13px}
.block-header button{border:none;background:transparent;cursor:pointer;font-size:13px}
.block-params{padding:6px 8px;display:flex;flex-direction:column;gap:4px}
.param-row{display:flex;align-items:center;gap:6px;font-size:12px}
.param-name{min-width:60px;color:#64748b}
.param-input{flex:1;font-size:12px;padding:2px 4px}
.terminal{background:#0f172a;color:#e2e8f0;height:28vh;overflow:hidden}
.terminal-output{height:100%;overflow-y:auto;padding:8px 12px;font-family:monospace;font-size:12px}
.terminal-line{white-space:pre-wrap}
.terminal-timestamp{color:#64748b;margin-right:8px}
.terminal-command .terminal-text{color:#7dd3fc}
.terminal-error .terminal-text{color:#fca5a5}
.terminal-info .terminal-text{color:#a5b4fc}
.user-permissions{margin-top:12px;border-top:1px solid #e2e8f0;padding-top:8px;font-size:12px}
.permission-item{display:flex;gap:8px}
.permission-number{font-weight:600}
.hidden{display:none}
";

    let style = document.create_element("style")?;
    style.set_id("app-styles");
    style.set_text_content(Some(css));
    if let Some(head) = document.query_selector("head")? {
        head.append_child(&style)?;
    } else {
        document
            .body()
            .ok_or_else(|| JsValue::from_str("No body found"))?
            .append_child(&style)?;
    }
    Ok(())
}
