//! Framework adapters for remote programs.
//!
//! A remote program never touches the DOM directly. It calls a small `ui`
//! API (`ui.create`, `ui.root`, `ui.emit`, `ui.fail`) that the adapter for its
//! declared framework defines. Adapters only differ in how they turn
//! `ui-*` component names into elements.

use crate::generator::markup::ACTION_ENVELOPE_TYPE;

use models::FrameworkTag;

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FormatResult};
use std::sync::Arc;

pub trait FrameworkAdapter: Send + Sync {
    /// Tag this adapter serves, e.g. `react`.
    fn framework(&self) -> &str;

    /// Script defining the global `ui` object.
    fn bootstrap(&self) -> String;
}

/// Shared part of every bootstrap; `{factory}` builds one element.
fn bootstrap_with(factory: &str) -> String {
    format!(
        r#"(function () {{
  var root = document.getElementById('root');
  function wrap(node) {{
    return {{
      node: node,
      append: function (child) {{ node.appendChild(child.node); return this; }}
    }};
  }}
  var createElement = {factory};
  window.ui = {{
    root: wrap(root),
    create: function (component, props) {{ return wrap(createElement(component, props || {{}})); }},
    emit: function (message) {{
      var envelope = Object.assign({{type: '{ACTION_ENVELOPE_TYPE}'}}, message);
      window.parent.postMessage(envelope, '*');
    }},
    fail: function (error) {{
      root.textContent = 'Remote program failed: ' + (error && error.message ? error.message : error);
    }}
  }};
}})();"#
    )
}

/// Maps components onto plain elements with class names.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReactAdapter;

impl FrameworkAdapter for ReactAdapter {
    fn framework(&self) -> &str {
        FrameworkTag::REACT
    }

    fn bootstrap(&self) -> String {
        bootstrap_with(
            r#"function (component, props) {
    var tags = {'ui-stack': 'div', 'ui-text': 'span', 'ui-button': 'button', 'ui-image': 'img'};
    var node = document.createElement(tags[component] || 'div');
    node.className = component;
    if (component === 'ui-stack') {
      node.style.display = 'flex';
      node.style.flexDirection = 'column';
      node.style.gap = (props.gap || 0) + 'px';
    }
    if (props.content !== undefined) { node.textContent = props.content; }
    if (props.label !== undefined) { node.textContent = props.label; }
    if (props.src !== undefined) { node.src = props.src; }
    if (typeof props.onPress === 'function') { node.addEventListener('click', props.onPress); }
    return node;
  }"#,
        )
    }
}

/// Maps components onto custom elements of the same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebComponentsAdapter;

impl FrameworkAdapter for WebComponentsAdapter {
    fn framework(&self) -> &str {
        FrameworkTag::WEB_COMPONENTS
    }

    fn bootstrap(&self) -> String {
        bootstrap_with(
            r#"function (component, props) {
    if (!customElements.get(component)) {
      customElements.define(component, class extends HTMLElement {});
    }
    var node = document.createElement(component);
    Object.keys(props).forEach(function (key) {
      var value = props[key];
      if (typeof value === 'function') {
        node.addEventListener(key === 'onPress' ? 'click' : key, value);
      } else {
        node.setAttribute(key, String(value));
      }
    });
    if (props.content !== undefined) { node.textContent = props.content; }
    if (props.label !== undefined) { node.textContent = props.label; }
    return node;
  }"#,
        )
    }
}

/// Adapters by framework tag.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: BTreeMap<String, Arc<dyn FrameworkAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the `react` and `webcomponents` adapters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ReactAdapter));
        registry.register(Arc::new(WebComponentsAdapter));
        registry
    }

    pub fn register(&mut self, adapter: Arc<dyn FrameworkAdapter>) {
        self.adapters
            .insert(adapter.framework().to_string(), adapter);
    }

    pub fn get(&self, framework: &FrameworkTag) -> Option<&dyn FrameworkAdapter> {
        self.adapters.get(framework.as_str()).map(|adapter| adapter.as_ref())
    }

    pub fn frameworks(&self) -> impl Iterator<Item = &str> {
        self.adapters.keys().map(String::as_str)
    }
}

impl Debug for AdapterRegistry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter
            .debug_struct("AdapterRegistry")
            .field("frameworks", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}
