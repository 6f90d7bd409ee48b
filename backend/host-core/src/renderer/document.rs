//! Complete documents handed to sandboxed surfaces.

use crate::generator::markup::{escape_attr, escape_text, link_handler};

/// Message `type` of size reports posted by the measurement script.
pub const SIZE_CHANGE_TYPE: &str = "ui-size-change";

const MEASURE_SCRIPT: &str = r#"(function () {
  function report() {
    var body = document.body, root = document.documentElement;
    var height = Math.max(body.scrollHeight, body.offsetHeight, root.scrollHeight, root.offsetHeight);
    var width = Math.max(body.scrollWidth, root.scrollWidth);
    window.parent.postMessage({type: 'ui-size-change', payload: {width: width, height: height}}, '*');
  }
  window.addEventListener('load', report);
  new MutationObserver(report).observe(document.body, {childList: true, subtree: true, attributes: true, characterData: true});
  if (window.ResizeObserver) { new ResizeObserver(report).observe(document.body); }
})();"#;

/// Makes `script` safe to place between `<script>` tags.
pub(crate) fn escape_script(script: &str) -> String {
    script.replace("</", "<\\/")
}

fn shell(body: &str, head_extra: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<style>html, body {{ margin: 0; padding: 0; }}</style>
{head_extra}</head>
<body>
{body}
<script>{MEASURE_SCRIPT}</script>
</body>
</html>"#
    )
}

/// Wraps producer markup with the measurement script.
pub fn inline_document(html: &str) -> String {
    shell(html, "")
}

/// Document that runs `bootstrap` (adapter code) followed by `script`.
pub fn program_document(framework: &str, bootstrap: &str, script: &str) -> String {
    let body = format!(
        r#"<div id="root" data-framework="{framework}"></div>
<script>{bootstrap}</script>
<script>
try {{
{script}
}} catch (error) {{
  ui.fail(error);
}}
</script>"#,
        framework = escape_attr(framework),
        bootstrap = escape_script(bootstrap),
        script = escape_script(script),
    );
    shell(&body, "")
}

/// Shown in place of external content that refused to be embedded.
pub fn embed_refused_document(url: &str) -> String {
    let body = format!(
        r#"<div style="font-family: system-ui, sans-serif; padding: 24px; text-align: center; color: #475569;">
  <h2 style="margin: 0 0 8px 0;">This content can't be embedded</h2>
  <p style="margin: 0 0 16px 0;">{url}</p>
  <button onclick="{open}">Open in a new window</button>
</div>"#,
        url = escape_text(url),
        open = link_handler(url),
    );
    shell(&body, "")
}
