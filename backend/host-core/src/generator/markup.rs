//! Markup helpers shared by the view generators.
//!
//! Every string that originates outside the generator (user input, producer
//! data) passes through [`escape_text`] or [`escape_attr`] before it lands in
//! markup.

use serde_json::{Value, json};

/// Envelope `type` the bridge listens for.
pub const ACTION_ENVELOPE_TYPE: &str = "resource-action";

/// Escapes text content.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes a value placed inside a double- or single-quoted attribute.
pub fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `postMessage` call posting a tool action whose params are a JS expression.
///
/// `params_js` is evaluated inside the surface, e.g. `{name: this.value}`.
/// Not escaped; compose it into a larger handler and escape the whole.
pub fn tool_call_js(tool_name: &str, params_js: &str) -> String {
    let tool = Value::String(tool_name.to_string());
    format!(
        "window.parent.postMessage({{type: '{ACTION_ENVELOPE_TYPE}', kind: 'tool', payload: {{toolName: {tool}, params: {params_js}}}}}, '*')"
    )
}

/// Attribute-escaped form of [`tool_call_js`].
pub fn tool_script(tool_name: &str, params_js: &str) -> String {
    escape_attr(&tool_call_js(tool_name, params_js))
}

/// Inline handler posting a tool action with literal params.
pub fn tool_handler(tool_name: &str, params: &Value) -> String {
    let envelope = json!({
        "type": ACTION_ENVELOPE_TYPE,
        "kind": "tool",
        "payload": { "toolName": tool_name, "params": params },
    });
    escape_attr(&format!("window.parent.postMessage({envelope}, '*')"))
}

/// Inline handler posting a prompt action.
pub fn prompt_handler(prompt: &str) -> String {
    let envelope = json!({
        "type": ACTION_ENVELOPE_TYPE,
        "kind": "prompt",
        "payload": { "prompt": prompt },
    });
    escape_attr(&format!("window.parent.postMessage({envelope}, '*')"))
}

/// Inline handler posting a link action.
pub fn link_handler(url: &str) -> String {
    let envelope = json!({
        "type": ACTION_ENVELOPE_TYPE,
        "kind": "link",
        "payload": { "url": url },
    });
    escape_attr(&format!("window.parent.postMessage({envelope}, '*')"))
}

/// `7000` → `7,000`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
