//! Widget markup
//!
//! The container carries the proxy URL and nonce as data attributes; the
//! script reads them at load time instead of relying on page globals.

use crate::session::WidgetConfig;
use crate::text::escape_html;

pub const WIDGET_TITLE: &str = "Chat Assistant";
const INPUT_PLACEHOLDER: &str = "Type your question...";

/// Container markup for the floating chat window
pub fn render_widget(config: &WidgetConfig) -> String {
    format!(
        r#"<div id="rag-chatbot-container" class="rag-chatbot-container" data-ajax-url="{ajax_url}" data-nonce="{nonce}">
    <div id="rag-chatbot-header" class="rag-chatbot-header">
        <h3>{title}</h3>
        <button id="rag-chatbot-toggle" type="button" aria-label="Toggle chat">×</button>
    </div>
    <div id="rag-chatbot-messages" class="rag-chatbot-messages" aria-live="polite"></div>
    <div id="rag-chatbot-input-container" class="rag-chatbot-input-container">
        <textarea id="rag-chatbot-input" placeholder="{placeholder}"></textarea>
        <button id="rag-chatbot-send" type="button">Send</button>
    </div>
</div>"#,
        ajax_url = escape_html(&config.ajax_url),
        nonce = escape_html(&config.nonce),
        title = escape_html(WIDGET_TITLE),
        placeholder = escape_html(INPUT_PLACEHOLDER),
    )
}

/// Minimal page hosting the widget, with its stylesheet and script
pub fn render_host_page(config: &WidgetConfig) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/assets/chatbot.css">
</head>
<body>
{widget}
<script src="/assets/chatbot.js" defer></script>
</body>
</html>
"#,
        title = escape_html(WIDGET_TITLE),
        widget = render_widget(config),
    )
}
