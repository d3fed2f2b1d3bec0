//! Terminal-style output log. Execution results append here in whatever
//! order their responses resolve; no ordering is enforced between
//! concurrently in-flight commands.

use web_sys::Element;

use crate::utils::log_timestamp;

pub fn append_command(command: &str) {
    append_line("terminal-command", &format!("$ {}", command));
}

pub fn append_output(output: &str) {
    append_line("terminal-output-text", output);
}

pub fn append_error(error: &str) {
    append_line("terminal-error", error);
}

pub fn append_info(info: &str) {
    append_line("terminal-info", info);
}

fn append_line(class: &str, text: &str) {
    let document = match web_sys::window().and_then(|w| w.document()) {
        Some(d) => d,
        None => return,
    };
    let container = match document.get_element_by_id("terminal-output") {
        Some(c) => c,
        None => return,
    };

    let line = match document.create_element("div") {
        Ok(el) => el,
        Err(_) => return,
    };
    line.set_class_name(&format!("terminal-line {}", class));

    if let Ok(stamp) = document.create_element("span") {
        stamp.set_class_name("terminal-timestamp");
        stamp.set_text_content(Some(&log_timestamp()));
        let _ = line.append_child(&stamp);
    }
    if let Ok(body) = document.create_element("span") {
        body.set_class_name("terminal-text");
        body.set_text_content(Some(text));
        let _ = line.append_child(&body);
    }

    let _ = container.append_child(&line);
    scroll_to_bottom(&container);
}

fn scroll_to_bottom(container: &Element) {
    container.set_scroll_top(container.scroll_height());
}
