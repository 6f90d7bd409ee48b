//! One generator per view.
//!
//! Styling is inline and intentionally plain; what matters to the host is the
//! uri scheme, the metadata, and the action handlers wired into the markup.

use super::markup::{
    escape_attr, escape_text, group_thousands, link_handler, prompt_handler, tool_call_js,
    tool_handler, tool_script,
};
use crate::router::state::{
    ApplicationState, ChartState, CounterState, DashboardState, FormState, HelloState, Theme,
    TodoState, WeatherState,
};

use models::{FrameworkTag, Resource, ResourceContent, ResourceMetadata};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

/// Hex digits of content digest appended to every generated uri.
const URI_DIGEST_LEN: usize = 16;

/// `{base}/{digest}` over everything the resource shows.
///
/// Two states that render differently never share a uri; the same state always
/// yields the same one.
pub(crate) fn versioned_uri(base: &str, content: &str, description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update([0u8]);
    hasher.update(description.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{base}/{}", &digest[..URI_DIGEST_LEN])
}

fn inline(base: &str, html: String, title: &str, description: String) -> Resource {
    let uri = versioned_uri(base, &html, &description);
    Resource::from_parts(
        uri,
        ResourceContent::InlineMarkup { html },
        Some(ResourceMetadata::new(title, description)),
    )
}

fn empty_params() -> Value {
    json!({})
}

pub(crate) fn hello(state: &HelloState) -> Resource {
    let (background, color, border) = match state.theme {
        Theme::Light => ("#ffffff", "#1e293b", "1px solid #e2e8f0"),
        Theme::Dark => ("#1e293b", "#ffffff", "none"),
        Theme::Gradient => (
            "linear-gradient(135deg, #667eea 0%, #764ba2 100%)",
            "#ffffff",
            "none",
        ),
    };
    let name_text = escape_text(&state.name);
    let name_attr = escape_attr(&state.name);

    let theme_buttons: String = [
        ("light", "Light"),
        ("dark", "Dark"),
        ("gradient", "Gradient"),
    ]
    .iter()
    .map(|(theme, label)| {
        format!(
            r#"<button class="theme" onclick="{handler}">{label}</button>"#,
            handler = tool_handler("hello_theme", &json!({ "theme": theme })),
        )
    })
    .collect();

    let html = format!(
        r#"<div style="font-family: system-ui, sans-serif; padding: 32px; background: {background}; color: {color}; border: {border}; border-radius: 16px; text-align: center;">
  <h1 style="margin: 0 0 12px 0;">Hello, {name_text}!</h1>
  <p style="margin: 0 0 24px 0;">Welcome to the interactive resource playground.</p>
  <input type="text" value="{name_attr}" placeholder="Enter name" onchange="{rename}"/>
  <div style="display: flex; gap: 8px; justify-content: center; margin-top: 16px;">{theme_buttons}</div>
  <p style="margin-top: 16px;"><button onclick="{ask}">Ask the agent about this page</button></p>
</div>"#,
        rename = tool_script("hello_name", "{name: this.value}"),
        ask = prompt_handler("Explain what this greeting card can do."),
    );

    inline(
        "ui://hello/greeting",
        html,
        "Hello UI",
        format!("Personalized greeting for {}", state.name),
    )
}

pub(crate) fn counter(state: &CounterState) -> Resource {
    let html = format!(
        r#"<div style="font-family: system-ui, sans-serif; padding: 32px; background: #f8fafc; border: 1px solid #e2e8f0; border-radius: 16px; text-align: center;">
  <h2 style="margin: 0 0 24px 0; color: #1e293b;">Interactive Counter</h2>
  <div style="display: flex; align-items: center; gap: 24px; justify-content: center;">
    <button onclick="{decrement}">-</button>
    <div id="counter-value" style="font-size: 64px; font-weight: 800;">{value}</div>
    <button onclick="{increment}">+</button>
  </div>
  <div style="margin-top: 24px;"><button onclick="{reset}">Reset to Zero</button></div>
</div>"#,
        value = state.value,
        decrement = tool_handler("decrement", &empty_params()),
        increment = tool_handler("increment", &empty_params()),
        reset = tool_handler("counter_reset", &empty_params()),
    );

    inline(
        "ui://counter/interactive",
        html,
        "Counter",
        format!("Current value: {}", state.value),
    )
}

pub(crate) fn todo(state: &TodoState) -> Resource {
    let completed = state.completed_count();
    let total = state.items.len();

    let items: String = if state.items.is_empty() {
        String::from(
            r#"<li style="text-align: center; color: #94a3b8; padding: 20px;">No items yet. Add one above!</li>"#,
        )
    } else {
        state
            .items
            .iter()
            .map(|item| {
                let decoration = if item.completed { "line-through" } else { "none" };
                let checked = if item.completed { " checked" } else { "" };
                format!(
                    r#"<li data-id="{id}" style="display: flex; gap: 12px; padding: 12px;">
  <input type="checkbox"{checked} onchange="{toggle}"/>
  <span style="flex: 1; text-decoration: {decoration};">{text}</span>
  <button title="Delete" onclick="{delete}">✕</button>
</li>"#,
                    id = item.id,
                    toggle = tool_handler("toggleTodo", &json!({ "id": item.id })),
                    delete = tool_handler("deleteTodo", &json!({ "id": item.id })),
                    text = escape_text(&item.text),
                )
            })
            .collect()
    };

    let add = escape_attr(&format!(
        "const input = document.getElementById('newTodo'); if (input.value.trim()) {{ {post}; input.value = ''; }}",
        post = tool_call_js("addTodo", "{text: input.value}"),
    ));

    let html = format!(
        r#"<div style="font-family: system-ui, sans-serif; padding: 24px; background: white; border: 1px solid #e2e8f0; border-radius: 16px; max-width: 400px;">
  <div style="display: flex; justify-content: space-between; margin-bottom: 20px;">
    <h2 style="margin: 0;">Tasks</h2>
    <span class="badge">{completed}/{total} Done</span>
  </div>
  <div style="display: flex; gap: 8px; margin-bottom: 20px;">
    <input type="text" id="newTodo" placeholder="Add a new task..." onkeydown="if (event.key === 'Enter') document.getElementById('addBtn').click()"/>
    <button id="addBtn" onclick="{add}">Add</button>
  </div>
  <ul style="list-style: none; padding: 0; margin: 0;">{items}</ul>
</div>"#
    );

    inline("ui://todo/list", html, "Todo List", format!("{total} items"))
}

pub(crate) fn form(state: &FormState) -> Resource {
    if let Some(submission) = &state.submission {
        let sent = serde_json::to_string_pretty(submission).unwrap_or_default();
        let html = format!(
            r#"<div style="font-family: system-ui, sans-serif; padding: 32px; background: #f0fdf4; border: 1px solid #bbf7d0; border-radius: 16px; text-align: center;">
  <h2 style="margin: 0 0 8px 0; color: #166534;">Message Sent!</h2>
  <p style="color: #15803d;">Thanks {name}, we've received your message.</p>
  <pre style="text-align: left;">{sent}</pre>
  <button onclick="{reset}">Submit another response</button>
</div>"#,
            name = escape_text(&submission.name),
            sent = escape_text(&sent),
            reset = tool_handler("form_reset", &empty_params()),
        );
        return inline(
            "ui://form/success",
            html,
            "Form Success",
            String::from("Submission successful"),
        );
    }

    let submit = escape_attr(&format!(
        "event.preventDefault(); {post};",
        post = tool_call_js(
            "submitForm",
            "{name: this.name.value, email: this.email.value, message: this.message.value}",
        ),
    ));
    let html = format!(
        r#"<div style="font-family: system-ui, sans-serif; padding: 24px; background: white; border: 1px solid #e2e8f0; border-radius: 16px; max-width: 400px; margin: 0 auto;">
  <h2 style="margin: 0 0 8px 0;">Contact Us</h2>
  <p style="margin: 0 0 24px 0; color: #64748b;">We'd love to hear from you. Send us a message!</p>
  <form onsubmit="{submit}">
    <label>Name <input name="name" type="text" placeholder="Your name" required/></label>
    <label>Email <input name="email" type="email" placeholder="you@example.com" required/></label>
    <label>Message <textarea name="message" rows="3" placeholder="Your message..." required></textarea></label>
    <button type="submit">Send Message</button>
  </form>
</div>"#
    );

    inline(
        "ui://form/contact",
        html,
        "Contact Form",
        String::from("Send us feedback"),
    )
}

pub(crate) fn chart(state: &ChartState) -> Resource {
    let max = state.bars.iter().map(|bar| bar.value).max().unwrap_or(0).max(1);
    let total: u64 = state.bars.iter().map(|bar| bar.value).sum();

    let bars: String = state
        .bars
        .iter()
        .enumerate()
        .map(|(index, bar)| {
            let selected = state.selected == Some(index);
            let height = bar.value * 100 / max;
            let color = if selected { "#4f46e5" } else { "#818cf8" };
            let opacity = if state.selected.is_some() && !selected { "0.6" } else { "1" };
            let tooltip = if selected {
                format!(
                    r#"<div class="tooltip">${}</div>"#,
                    group_thousands(bar.value)
                )
            } else {
                String::new()
            };
            format!(
                r#"<div style="flex: 1; display: flex; flex-direction: column; align-items: center;">
  {tooltip}<div onclick="{click}" style="width: 70%; height: {height}%; background: {color}; opacity: {opacity}; cursor: pointer;"></div>
  <div style="margin-top: 8px; font-size: 12px;">{label}</div>
</div>"#,
                click = tool_handler("chart_click", &json!({ "index": index })),
                label = escape_text(&bar.label),
            )
        })
        .collect();

    let html = format!(
        r#"<div style="font-family: system-ui, sans-serif; padding: 24px; background: white; border: 1px solid #e2e8f0; border-radius: 16px;">
  <h2 style="margin: 0 0 24px 0;">Monthly Revenue</h2>
  <div style="height: 200px; display: flex; align-items: flex-end; gap: 8px;">{bars}</div>
  <div style="margin-top: 24px; display: flex; justify-content: space-between;">
    <div>Total: <span>${total}</span></div>
    <button onclick="{reset}">Reset Selection</button>
  </div>
</div>"#,
        total = group_thousands(total),
        reset = tool_handler("chart_reset", &empty_params()),
    );

    inline(
        "ui://chart/sales",
        html,
        "Sales Chart",
        String::from("Interactive bar chart"),
    )
}

pub(crate) fn weather(state: &WeatherState) -> Resource {
    let reading = &state.reading;
    let temperature = reading.temperature(state.unit);
    let unit = state.unit.symbol();
    let other_unit = state.unit.toggled().symbol();
    let overlay = if state.loading {
        r#"<div class="loading" style="position: absolute; inset: 0; display: flex; align-items: center; justify-content: center;"><div class="spinner"></div></div>"#
    } else {
        ""
    };

    let html = format!(
        r#"<div style="font-family: system-ui, sans-serif; padding: 24px; background: linear-gradient(135deg, #0ea5e9 0%, #0284c7 100%); border-radius: 16px; color: white; max-width: 320px; position: relative;">
  {overlay}
  <div style="font-size: 14px;">{city}</div>
  <div style="font-size: 64px; font-weight: 200;">{temperature}°<span style="font-size: 24px;">{unit}</span></div>
  <div style="font-size: 16px;">{condition}</div>
  <div style="display: flex; padding-top: 16px;">
    <div style="flex: 1;">Humidity <strong>{humidity}%</strong></div>
    <div style="flex: 1;">Wind <strong>{wind} mph</strong></div>
  </div>
  <div style="display: flex; gap: 8px; margin-top: 20px;">
    <button onclick="{refresh}">Refresh</button>
    <button onclick="{toggle}">°{other_unit}</button>
  </div>
</div>"#,
        city = escape_text(&reading.city),
        condition = escape_text(&reading.condition),
        humidity = reading.humidity,
        wind = reading.wind_mph,
        refresh = tool_handler("refreshWeather", &empty_params()),
        toggle = tool_handler("toggleUnits", &empty_params()),
    );

    inline(
        "ui://weather/current",
        html,
        "Weather",
        format!("Current: {temperature}°{unit}"),
    )
}

pub(crate) fn dashboard(state: &DashboardState) -> Resource {
    let description = "Embedded iframe content";
    match state.url() {
        Ok(url) => Resource::from_parts(
            versioned_uri("ui://dashboard/external", url.as_str(), description),
            ResourceContent::ExternalReference { url },
            Some(ResourceMetadata::new("External Dashboard", description)),
        ),
        Err(e) => {
            let html = format!(
                r#"<div style="font-family: system-ui, sans-serif; padding: 24px; border: 1px solid #fecaca; background: #fef2f2; border-radius: 16px;">
  <h2 style="margin: 0 0 8px 0; color: #991b1b;">Dashboard unavailable</h2>
  <p style="margin: 0; color: #b91c1c;">Cannot embed "{url}": {reason}</p>
</div>"#,
                url = escape_text(state.as_str()),
                reason = escape_text(&e.to_string()),
            );
            inline(
                "ui://dashboard/invalid",
                html,
                "External Dashboard",
                String::from("Invalid dashboard url"),
            )
        }
    }
}

/// Remote-program view summarising the other slices.
///
/// The script only calls the adapter's `ui.*` construction API; the adapter
/// bootstrap that defines `ui` is supplied by the renderer.
pub(crate) fn summary(state: &ApplicationState) -> Resource {
    let facts = json!([
        { "label": "Counter", "value": state.counter.value.to_string() },
        {
            "label": "Tasks done",
            "value": format!("{}/{}", state.todo.completed_count(), state.todo.items.len()),
        },
        {
            "label": "Weather",
            "value": format!(
                "{}°{}",
                state.weather.reading.temperature(state.weather.unit),
                state.weather.unit.symbol()
            ),
        },
    ]);

    let script = format!(
        r#"const facts = {facts};
const list = ui.create('ui-stack', {{ gap: 8 }});
for (const fact of facts) {{
  list.append(ui.create('ui-text', {{ content: fact.label + ': ' + fact.value }}));
}}
list.append(ui.create('ui-button', {{ label: 'Open docs', onPress: () => ui.emit({link}) }}));
ui.root.append(list);"#,
        link = json!({ "kind": "link", "payload": { "url": state.dashboard.as_str() } }),
    );

    let description = "Session overview";
    Resource::from_parts(
        versioned_uri("ui://summary/remote", &script, description),
        ResourceContent::RemoteProgram {
            script,
            framework: FrameworkTag::react(),
        },
        Some(ResourceMetadata::new("Summary", description)),
    )
}

/// Shown when a view key is not recognised.
pub(crate) fn fallback(requested: &str) -> Resource {
    let html = format!(
        r#"<div style="font-family: system-ui, sans-serif; padding: 24px; border: 1px dashed #94a3b8; border-radius: 16px; text-align: center;">
  <h2 style="margin: 0 0 8px 0;">Nothing to show</h2>
  <p style="margin: 0; color: #64748b;">No view named "{requested}" is available.</p>
  <p><button onclick="{docs}">Open documentation</button></p>
</div>"#,
        requested = escape_text(requested),
        docs = link_handler("https://modelcontextprotocol.io"),
    );

    inline(
        super::FALLBACK_URI_BASE,
        html,
        "Unknown View",
        format!("No view named {requested}"),
    )
}
